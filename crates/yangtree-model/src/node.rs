//! Normalized data nodes.
//!
//! A [`NormalizedNode`] is the schema-agnostic shape exchanged with codec
//! layers: every node has an identifier and either a scalar value or an
//! ordered collection of children keyed by their identifiers.

use crate::{EntryKeys, PathArg, QName, Scalar};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Children of a structural node, keyed by identifier in insertion order.
pub type Children = IndexMap<PathArg, NormalizedNode>;

/// The payload of a normalized node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeBody {
    /// Leaf or leaf-list entry value.
    Value(Scalar),
    /// Children of a container, list, list entry, leaf-list, choice or
    /// augmentation.
    Children(#[serde(with = "children_seq")] Children),
}

// Identifiers are not string-like, so children travel as a sequence of
// nodes and are re-keyed on the way in.
mod children_seq {
    use super::{Children, NormalizedNode};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(children: &Children, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(children.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Children, D::Error> {
        let nodes = Vec::<NormalizedNode>::deserialize(deserializer)?;
        Ok(nodes
            .into_iter()
            .map(|node| (node.identifier.clone(), node))
            .collect())
    }
}

/// A data node as supplied to `write`/`merge` and returned by `read`.
///
/// # Examples
///
/// ```
/// use yangtree_model::{NormalizedNode, QName};
///
/// let test = QName::new("urn:example", "test");
/// let node = NormalizedNode::container(
///     test.clone(),
///     [NormalizedNode::leaf(test.sibling("name"), "alpha")],
/// );
/// assert_eq!(node.children().map(|c| c.len()), Some(1));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    identifier: PathArg,
    body: NodeBody,
}

impl NormalizedNode {
    /// Create a node from raw parts.
    #[inline]
    pub fn new(identifier: PathArg, body: NodeBody) -> Self {
        Self { identifier, body }
    }

    /// Create a structural node from an identifier and children.
    pub fn with_children(
        identifier: PathArg,
        children: impl IntoIterator<Item = NormalizedNode>,
    ) -> Self {
        let children = children
            .into_iter()
            .map(|child| (child.identifier.clone(), child))
            .collect();
        Self::new(identifier, NodeBody::Children(children))
    }

    /// Create a leaf.
    #[inline]
    pub fn leaf(name: QName, value: impl Into<Scalar>) -> Self {
        Self::new(PathArg::Node(name), NodeBody::Value(value.into()))
    }

    /// Create a container.
    #[inline]
    pub fn container(name: QName, children: impl IntoIterator<Item = NormalizedNode>) -> Self {
        Self::with_children(PathArg::Node(name), children)
    }

    /// Create a keyed list holding the given entries.
    #[inline]
    pub fn list(name: QName, entries: impl IntoIterator<Item = NormalizedNode>) -> Self {
        Self::with_children(PathArg::Node(name), entries)
    }

    /// Create a keyed list entry.
    ///
    /// The key leaves are added as children ahead of `children`, so callers
    /// only pass the non-key content.
    pub fn list_entry(
        name: QName,
        keys: impl IntoIterator<Item = (QName, Scalar)>,
        children: impl IntoIterator<Item = NormalizedNode>,
    ) -> Self {
        let keys = EntryKeys::new(keys);
        let key_leaves: Vec<NormalizedNode> = keys
            .iter()
            .map(|(k, v)| NormalizedNode::leaf(k.clone(), v.clone()))
            .collect();
        Self::with_children(
            PathArg::Entry { name, keys },
            key_leaves.into_iter().chain(children),
        )
    }

    /// Create a leaf-list holding the given values.
    pub fn leaf_list(name: QName, values: impl IntoIterator<Item = Scalar>) -> Self {
        let entries: Vec<NormalizedNode> = values
            .into_iter()
            .map(|v| NormalizedNode::leaf_list_entry(name.clone(), v))
            .collect();
        Self::with_children(PathArg::Node(name), entries)
    }

    /// Create a leaf-list entry.
    #[inline]
    pub fn leaf_list_entry(name: QName, value: impl Into<Scalar>) -> Self {
        let value = value.into();
        Self::new(
            PathArg::Value {
                name,
                value: value.clone(),
            },
            NodeBody::Value(value),
        )
    }

    /// Create a choice node holding the active case's children.
    #[inline]
    pub fn choice(name: QName, children: impl IntoIterator<Item = NormalizedNode>) -> Self {
        Self::with_children(PathArg::Node(name), children)
    }

    /// Create an augmentation node. Its identifier lists the names of the
    /// supplied children.
    pub fn augmentation(
        possible_children: impl IntoIterator<Item = QName>,
        children: impl IntoIterator<Item = NormalizedNode>,
    ) -> Self {
        Self::with_children(PathArg::augmentation(possible_children), children)
    }

    /// The identifier of this node.
    #[inline]
    pub fn identifier(&self) -> &PathArg {
        &self.identifier
    }

    /// The payload of this node.
    #[inline]
    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    /// Consume the node and return its parts.
    #[inline]
    pub fn into_parts(self) -> (PathArg, NodeBody) {
        (self.identifier, self.body)
    }

    /// The scalar value, if this is a leaf-shaped node.
    #[inline]
    pub fn value(&self) -> Option<&Scalar> {
        match &self.body {
            NodeBody::Value(v) => Some(v),
            NodeBody::Children(_) => None,
        }
    }

    /// The children, if this is a structural node.
    #[inline]
    pub fn children(&self) -> Option<&Children> {
        match &self.body {
            NodeBody::Value(_) => None,
            NodeBody::Children(c) => Some(c),
        }
    }

    /// Look up a direct child.
    #[inline]
    pub fn child(&self, id: &PathArg) -> Option<&NormalizedNode> {
        self.children().and_then(|c| c.get(id))
    }

    /// Follow a relative path of identifiers from this node.
    pub fn find(&self, relative: &[PathArg]) -> Option<&NormalizedNode> {
        relative
            .iter()
            .try_fold(self, |node, arg| node.child(arg))
    }

    /// Returns true if this node carries a scalar value.
    #[inline]
    pub fn is_value(&self) -> bool {
        matches!(self.body, NodeBody::Value(_))
    }
}
