//! The element registry shared between the lowerer (C4, which populates
//! it) and the element resolver (C5, which drains it). Preserves first-seen
//! tag order so the emitted schema's element ordering matches "element
//! resolver iteration order" deterministically.

use crate::typegraph::TypeRef;
use std::collections::HashMap;

#[derive(Default)]
pub struct ElementRegistry {
    order: Vec<String>,
    entries: HashMap<String, Vec<(TypeRef, Vec<String>)>>,
}

impl ElementRegistry {
    pub fn record(&mut self, tag: &str, typeref: TypeRef, chain: Vec<String>) {
        if !self.entries.contains_key(tag) {
            self.order.push(tag.to_string());
        }
        self.entries.entry(tag.to_string()).or_default().push((typeref, chain));
    }

    pub fn iter_in_order(&self) -> impl Iterator<Item = (&str, &[(TypeRef, Vec<String>)])> {
        self.order.iter().map(move |tag| (tag.as_str(), self.entries[tag].as_slice()))
    }

    #[cfg(test)]
    pub fn contains_key(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }
}
