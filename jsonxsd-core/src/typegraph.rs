//! The type graph: a read-only, possibly cyclic tree of type nodes,
//! consumed — never constructed from scratch — by the lowerer.
//! `jsonxsd-infer` is the one crate allowed to build these; everything
//! downstream only reads them.

use jsonxsd_types::TransformFormat;
use std::cell::{Ref, RefCell};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A class property: its type and whether it may be absent.
#[derive(Clone)]
pub struct ClassProperty {
    pub ty: TypeRef,
    pub optional: bool,
}

/// The closed set of type-node kinds. `Map`, `Object`, `Enum` and
/// non-primitive `Union` members carry no further structure here: the
/// lowerer recognizes them only to no-op on them, never to lower them.
pub enum TypeNode {
    None,
    Any,
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array {
        items: TypeRef,
    },
    /// Declaration-ordered; order is preserved end to end because `<xsd:all>`
    /// content iterates properties in this order.
    Class {
        props: Vec<(String, ClassProperty)>,
    },
    Map,
    Object,
    Enum,
    Union {
        members: Vec<TypeRef>,
    },
    TransformedString {
        format: TransformFormat,
    },
}

/// Opaque, stable identity for a type node, usable as a map key. Two
/// `TypeRef`s are equal iff they point at the same
/// underlying node — structural equality of the pointed-to `TypeNode` is
/// irrelevant and, in the presence of cycles, usually undecidable anyway.
///
/// Wrapped in a `RefCell` so a graph builder can tie a recursive knot:
/// allocate a placeholder, build a subtree that clones the placeholder's
/// `TypeRef` into one of its own properties, then overwrite the
/// placeholder's content in place with [`TypeRef::backfill`]. Once a graph
/// is handed to `jsonxsd-core` it is treated as read-only; nothing under
/// `lower`/`resolve`/`index`/`convert` ever calls `backfill`.
#[derive(Clone)]
pub struct TypeRef(Rc<RefCell<TypeNode>>);

impl TypeRef {
    pub fn new(node: TypeNode) -> Self {
        TypeRef(Rc::new(RefCell::new(node)))
    }

    /// Allocates a placeholder (kind `None`) to be overwritten later via
    /// [`Self::backfill`], enabling cyclic graph construction.
    pub fn placeholder() -> Self {
        TypeRef::new(TypeNode::None)
    }

    /// Overwrites a placeholder's content. Intended for graph builders only.
    pub fn backfill(&self, node: TypeNode) {
        *self.0.borrow_mut() = node;
    }

    pub fn kind(&self) -> Ref<'_, TypeNode> {
        self.0.borrow()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as *const () as usize).hash(state);
    }
}

impl std::fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TypeRef({:p})", Rc::as_ptr(&self.0))
    }
}
