//! The Element Resolver: drains the `ElementRegistry` the lowerer
//! populated and emits top-level `<xsd:element>` declarations,
//! disambiguating tags that more than one underlying type occupies by
//! walking their prefix chains.

use crate::error::{JsonXsdError, Result};
use crate::lower::TypeNameMap;
use crate::registry::ElementRegistry;
use crate::typegraph::TypeRef;
use jsonxsd_codegen::XsdBuilder;
use jsonxsd_types::title_case;
use xmltree::Element;

/// Safety net beyond the informally-described loop above: a chain that
/// never grows past an empty prefix (every occurrence reached the tag
/// through zero ancestors) would otherwise retry forever. After this many
/// rounds we break ties with a numeric suffix instead of looping forever.
const MAX_DISAMBIGUATION_ROUNDS: usize = 64;

pub fn resolve_elements(schema: &mut Element, registry: &ElementRegistry, types: &TypeNameMap) -> Result<()> {
    for (tag, entries) in registry.iter_in_order() {
        if entries.len() == 1 {
            let (typeref, _chain) = &entries[0];
            emit_element(schema, tag, typeref, types)?;
            continue;
        }

        let names = disambiguate(tag, entries);
        for (name, (typeref, _chain)) in names.iter().zip(entries.iter()) {
            emit_element(schema, name, typeref, types)?;
        }
    }
    Ok(())
}

fn emit_element(schema: &mut Element, name: &str, typeref: &TypeRef, types: &TypeNameMap) -> Result<()> {
    let type_name = types.get(typeref).ok_or_else(|| {
        JsonXsdError::InternalError(format!("no lowered type recorded for element '{name}'"))
    })?;
    let el = XsdBuilder::append(schema, "element");
    XsdBuilder::set_attr(el, "name", name);
    XsdBuilder::set_attr(el, "type", type_name.clone());
    Ok(())
}

/// Implements the prefix-growing disambiguation loop: at round
/// `i`, each entry's candidate prefix is its chain's `i`-th element, or the
/// chain's last element once `i` runs past its length, or the tag itself
/// when the chain is empty. Stops at the first round where all candidates
/// are pairwise distinct.
fn disambiguate(tag: &str, entries: &[(TypeRef, Vec<String>)]) -> Vec<String> {
    let title = title_case(tag);
    for i in 0..MAX_DISAMBIGUATION_ROUNDS {
        let candidates: Vec<String> = entries
            .iter()
            .map(|(_, chain)| {
                let prefix = prefix_at(chain, tag, i);
                format!("{prefix}{title}")
            })
            .collect();
        if all_distinct(&candidates) {
            return candidates;
        }
    }
    // fallback: break remaining ties with an ordinal suffix so the
    // document never ends up with two elements sharing a name.
    entries
        .iter()
        .enumerate()
        .map(|(idx, (_, chain))| {
            let prefix = prefix_at(chain, tag, MAX_DISAMBIGUATION_ROUNDS - 1);
            format!("{prefix}{title}{idx}")
        })
        .collect()
}

fn prefix_at(chain: &[String], tag: &str, i: usize) -> String {
    if chain.is_empty() {
        return tag.to_string();
    }
    if i < chain.len() {
        chain[i].clone()
    } else {
        chain[chain.len() - 1].clone()
    }
}

fn all_distinct(candidates: &[String]) -> bool {
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            if candidates[i] == candidates[j] {
                return false;
            }
        }
    }
    true
}
