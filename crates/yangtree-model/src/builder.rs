//! Fluent builder for structural normalized nodes.
//!
//! `NodeBuilder` is handy when a codec walks an external document and adds
//! children one at a time. For small literal trees the constructors on
//! [`NormalizedNode`] are usually shorter.

use crate::{Children, EntryKeys, NodeBody, NormalizedNode, PathArg, QName, Scalar};

/// Incrementally builds a structural node.
///
/// # Examples
///
/// ```
/// use yangtree_model::{NodeBuilder, QName};
///
/// let test = QName::new("urn:example", "test");
/// let node = NodeBuilder::container(test.clone())
///     .leaf(test.sibling("name"), "alpha")
///     .leaf(test.sibling("mtu"), 1500)
///     .build();
///
/// assert_eq!(node.children().map(|c| c.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    identifier: PathArg,
    children: Children,
}

impl NodeBuilder {
    /// Start a node with an arbitrary identifier.
    #[inline]
    pub fn new(identifier: PathArg) -> Self {
        Self {
            identifier,
            children: Children::new(),
        }
    }

    /// Start a container, list, leaf-list or choice node.
    #[inline]
    pub fn container(name: QName) -> Self {
        Self::new(PathArg::Node(name))
    }

    /// Start a keyed list entry; key leaves are added immediately.
    pub fn list_entry(name: QName, keys: impl IntoIterator<Item = (QName, Scalar)>) -> Self {
        let keys = EntryKeys::new(keys);
        let mut builder = Self::new(PathArg::Entry {
            name,
            keys: keys.clone(),
        });
        for (k, v) in keys.iter() {
            builder.push(NormalizedNode::leaf(k.clone(), v.clone()));
        }
        builder
    }

    /// Start an augmentation node.
    #[inline]
    pub fn augmentation(possible_children: impl IntoIterator<Item = QName>) -> Self {
        Self::new(PathArg::augmentation(possible_children))
    }

    /// Add or replace a child (mutating).
    #[inline]
    pub fn push(&mut self, child: NormalizedNode) -> &mut Self {
        self.children.insert(child.identifier().clone(), child);
        self
    }

    /// Add or replace a child (builder pattern).
    #[inline]
    #[must_use]
    pub fn child(mut self, child: NormalizedNode) -> Self {
        self.push(child);
        self
    }

    /// Add a leaf child.
    #[inline]
    #[must_use]
    pub fn leaf(self, name: QName, value: impl Into<Scalar>) -> Self {
        self.child(NormalizedNode::leaf(name, value))
    }

    /// Add a leaf-list entry child.
    #[inline]
    #[must_use]
    pub fn leaf_list_entry(self, name: QName, value: impl Into<Scalar>) -> Self {
        self.child(NormalizedNode::leaf_list_entry(name, value))
    }

    /// Number of children added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if no children were added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Finish the node.
    #[inline]
    pub fn build(self) -> NormalizedNode {
        NormalizedNode::new(self.identifier, NodeBody::Children(self.children))
    }
}
