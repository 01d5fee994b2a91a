use std::fmt;
use std::sync::Arc;

/// Index into the caller's type universe.
pub type TypeId = usize;

/// One operator of a typed node inventory.
///
/// A flat tagged struct instead of a class per operator: an identifier, an
/// arity (0 = terminal), and the return type as a function of the argument
/// types. `return_type` answering `None` for an assignment means that
/// assignment is invalid at that position.
#[derive(Clone)]
pub struct TypedNode {
    name: Arc<str>,
    arity: usize,
    signature: Arc<dyn Fn(&[TypeId]) -> Option<TypeId> + Send + Sync>,
}

impl TypedNode {
    pub fn terminal(name: &str, return_type: TypeId) -> Self {
        TypedNode {
            name: name.into(),
            arity: 0,
            signature: Arc::new(move |_| Some(return_type)),
        }
    }

    /// A function node with fixed argument types.
    pub fn function(name: &str, arg_types: Vec<TypeId>, return_type: TypeId) -> Self {
        let arity = arg_types.len();
        TypedNode {
            name: name.into(),
            arity,
            signature: Arc::new(move |args| {
                if args == arg_types.as_slice() {
                    Some(return_type)
                } else {
                    None
                }
            }),
        }
    }

    /// A function node whose return type depends on its argument types.
    pub fn generic<F>(name: &str, arity: usize, signature: F) -> Self
    where
        F: Fn(&[TypeId]) -> Option<TypeId> + Send + Sync + 'static,
    {
        TypedNode {
            name: name.into(),
            arity,
            signature: Arc::new(signature),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_terminal(&self) -> bool {
        self.arity == 0
    }

    pub fn return_type(&self, arg_types: &[TypeId]) -> Option<TypeId> {
        debug_assert_eq!(arg_types.len(), self.arity);
        (self.signature)(arg_types)
    }
}

impl fmt::Debug for TypedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedNode")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

impl PartialEq for TypedNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.arity == other.arity
    }
}

impl Eq for TypedNode {}

/// Order-independent collection of typed nodes; the inventory a typed
/// builder draws from. Changing it invalidates any possibility table built
/// from it — rebuild the table explicitly.
#[derive(Debug, Clone, Default)]
pub struct NodeInventory {
    nodes: Vec<TypedNode>,
}

impl NodeInventory {
    pub fn new() -> Self {
        NodeInventory { nodes: Vec::new() }
    }

    pub fn register(&mut self, node: TypedNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypedNode> {
        self.nodes.iter()
    }

    pub fn terminals(&self) -> impl Iterator<Item = &TypedNode> {
        self.nodes.iter().filter(|n| n.is_terminal())
    }

    pub fn functions(&self) -> impl Iterator<Item = &TypedNode> {
        self.nodes.iter().filter(|n| !n.is_terminal())
    }
}

impl FromIterator<TypedNode> for NodeInventory {
    fn from_iter<I: IntoIterator<Item = TypedNode>>(iter: I) -> Self {
        NodeInventory {
            nodes: iter.into_iter().collect(),
        }
    }
}
