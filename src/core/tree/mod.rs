//! Key Tree: the structural model of a `translate(...)` declaration.
//!
//! ```typescript
//! const LABELS = translate({
//!   title: "i18n.title",                   // Leaf
//!   getDesc: ["i18n.desc", "lazy"],        // Leaf (lazy)
//!   bird: {                                // Internal
//!     size: {
//!       [SIZE.small]: "i18n.bird.small",   // Computed(Leaf)
//!     },
//!   },
//! });
//! ```
//!
//! The tree is built once per declaration by [`builder::build`], annotated in
//! place by the usage marker and consumed by the reachability rules.

pub mod builder;

pub use builder::{BuildError, KeyTreeBuild, build, build_from_call};

use crate::core::SourceContext;

/// Usage annotation of a node.
///
/// Ordered by strength: marking only ever raises an annotation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Usage {
    #[default]
    Unreached,
    /// An ancestor (or the node itself) was forwarded as a whole object.
    UsedAsSubtree,
    /// A concrete reference resolved to this node.
    Used,
}

impl Usage {
    pub fn raise(&mut self, to: Usage) {
        if to > *self {
            *self = to;
        }
    }
}

/// A declared translation id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub id: String,
    /// Declared as `[id, "lazy"]`: the value is a function that must be called.
    pub lazy: bool,
    pub usage: Usage,
}

/// A nested object literal. Children keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InternalNode {
    pub children: Vec<KeyChild>,
    pub usage: Usage,
}

/// A property whose key is a non-static expression (`[SIZE.small]`).
///
/// The body is a leaf or an internal node, never another computed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedNode {
    pub body: Box<KeyNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyNode {
    Leaf(LeafNode),
    Internal(InternalNode),
    Computed(ComputedNode),
}

/// Named edge from an internal node to one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChild {
    /// Property name, or a `[computed#n]` placeholder for computed keys.
    pub name: String,
    /// Location of the property key.
    pub context: SourceContext,
    pub node: KeyNode,
}

/// Root of one translate declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTree {
    /// Variable the translate call is bound to (e.g. "LABELS").
    pub binding: String,
    /// Location of the binding identifier.
    pub context: SourceContext,
    /// Always [`KeyNode::Internal`].
    pub root: KeyNode,
}

/// A leaf as seen by a tree walk.
#[derive(Debug, Clone)]
pub struct LeafEntry<'t> {
    pub leaf: &'t LeafNode,
    pub context: &'t SourceContext,
    /// Property names from the root, without the binding.
    pub key_path: Vec<String>,
    /// True if the leaf is a computed node or lies beneath one.
    pub under_computed: bool,
}

impl InternalNode {
    pub fn child(&self, name: &str) -> Option<&KeyChild> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut KeyChild> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn has_computed_children(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c.node, KeyNode::Computed(_)))
    }

    /// Mark this node and every descendant as forwarded.
    pub fn mark_subtree(&mut self) {
        self.raise_all(Usage::UsedAsSubtree);
    }

    /// Raise this node and every descendant to at least `to`.
    pub fn raise_all(&mut self, to: Usage) {
        self.usage.raise(to);
        for child in &mut self.children {
            child.node.raise_all(to);
        }
    }

    /// Drop the child called `name`. Returns true if there was one.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.name != name);
        self.children.len() != before
    }

    /// Insert a child, replacing a same-named one in place.
    ///
    /// Returns true when an existing child was replaced. The replaced child
    /// keeps its position, as later keys do in an evaluated object literal.
    pub fn insert(&mut self, child: KeyChild) -> bool {
        match self.child_mut(&child.name) {
            Some(existing) => {
                *existing = child;
                true
            }
            None => {
                self.children.push(child);
                false
            }
        }
    }
}

impl KeyNode {
    pub fn usage(&self) -> Usage {
        match self {
            KeyNode::Leaf(leaf) => leaf.usage,
            KeyNode::Internal(internal) => internal.usage,
            KeyNode::Computed(computed) => computed.body.usage(),
        }
    }

    /// Raise the annotation of this node only.
    pub fn raise(&mut self, to: Usage) {
        match self {
            KeyNode::Leaf(leaf) => leaf.usage.raise(to),
            KeyNode::Internal(internal) => internal.usage.raise(to),
            KeyNode::Computed(computed) => computed.body.raise(to),
        }
    }

    /// Mark this node and every descendant as forwarded.
    pub fn mark_subtree(&mut self) {
        self.raise_all(Usage::UsedAsSubtree);
    }

    pub fn raise_all(&mut self, to: Usage) {
        match self {
            KeyNode::Leaf(leaf) => leaf.usage.raise(to),
            KeyNode::Internal(internal) => internal.raise_all(to),
            KeyNode::Computed(computed) => computed.body.raise_all(to),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            KeyNode::Leaf(leaf) => Some(leaf),
            KeyNode::Computed(computed) => computed.body.as_leaf(),
            KeyNode::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            KeyNode::Internal(internal) => Some(internal),
            KeyNode::Computed(computed) => computed.body.as_internal(),
            KeyNode::Leaf(_) => None,
        }
    }
}

impl KeyTree {
    pub fn root(&self) -> Option<&InternalNode> {
        self.root.as_internal()
    }

    /// Look up a node by its property names.
    pub fn get(&self, path: &[&str]) -> Option<&KeyNode> {
        let mut node = &self.root;
        for name in path {
            node = &node.as_internal()?.child(name)?.node;
        }
        Some(node)
    }

    /// Render a key path with the binding prefix (`LABELS.a.b`).
    pub fn display_path<S: AsRef<str>>(&self, names: &[S]) -> String {
        std::iter::once(self.binding.as_str())
            .chain(names.iter().map(|n| n.as_ref()))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Every leaf in declaration order.
    pub fn leaves(&self) -> Vec<LeafEntry<'_>> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root() {
            walk_leaves(root, &mut Vec::new(), false, &mut leaves);
        }
        leaves
    }
}

fn walk_leaves<'t>(
    node: &'t InternalNode,
    path: &mut Vec<String>,
    under_computed: bool,
    leaves: &mut Vec<LeafEntry<'t>>,
) {
    for child in &node.children {
        path.push(child.name.clone());
        let (body, computed) = match &child.node {
            KeyNode::Computed(computed) => (&*computed.body, true),
            other => (other, false),
        };
        match body {
            KeyNode::Leaf(leaf) => leaves.push(LeafEntry {
                leaf,
                context: &child.context,
                key_path: path.clone(),
                under_computed: under_computed || computed,
            }),
            KeyNode::Internal(internal) => {
                walk_leaves(internal, path, under_computed || computed, leaves)
            }
            // The builder never nests computed nodes directly.
            KeyNode::Computed(_) => {}
        }
        path.pop();
    }
}
