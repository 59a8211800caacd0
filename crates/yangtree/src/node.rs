//! Immutable, versioned nodes of the committed tree.
//!
//! Nodes are always handled as `Arc<TreeNode>`. Rebuilding a parent copies
//! its map of child `Arc`s; untouched subtrees are shared with every
//! snapshot that already references them.

use crate::op::ChildPolicy;
use crate::version::Version;
use indexmap::IndexMap;
use std::sync::Arc;
use yangtree_model::{Children, NodeBody, NormalizedNode, PathArg, Scalar};

/// Children of a persisted node.
pub type TreeChildren = IndexMap<PathArg, Arc<TreeNode>>;

/// The payload of a persisted node.
#[derive(Debug, Clone)]
pub enum TreeData {
    /// Leaf or leaf-list entry value.
    Value(Scalar),
    /// Children of a structural node.
    Children(TreeChildren),
}

/// An immutable node of a committed (or speculative) tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    identifier: PathArg,
    identity_version: Version,
    subtree_version: Version,
    data: TreeData,
}

impl TreeNode {
    /// Build a persisted subtree from a normalized value. Every node of the
    /// subtree gets `version` as both identity and subtree version.
    pub fn from_normalized(node: &NormalizedNode, version: Version) -> Arc<TreeNode> {
        let data = match node.body() {
            NodeBody::Value(v) => TreeData::Value(v.clone()),
            NodeBody::Children(children) => TreeData::Children(
                children
                    .iter()
                    .map(|(id, child)| (id.clone(), TreeNode::from_normalized(child, version)))
                    .collect(),
            ),
        };
        Arc::new(TreeNode {
            identifier: node.identifier().clone(),
            identity_version: version,
            subtree_version: version,
            data,
        })
    }

    /// Build an empty structural node.
    pub fn empty(identifier: PathArg, version: Version) -> Arc<TreeNode> {
        Arc::new(TreeNode {
            identifier,
            identity_version: version,
            subtree_version: version,
            data: TreeData::Children(TreeChildren::new()),
        })
    }

    /// The identifier of this node within its parent.
    #[inline]
    pub fn identifier(&self) -> &PathArg {
        &self.identifier
    }

    /// Version at which this node's own value last changed.
    #[inline]
    pub fn identity_version(&self) -> Version {
        self.identity_version
    }

    /// Version at which this node or any descendant last changed.
    #[inline]
    pub fn subtree_version(&self) -> Version {
        self.subtree_version
    }

    /// The payload.
    #[inline]
    pub fn data(&self) -> &TreeData {
        &self.data
    }

    /// The scalar value, if this is a leaf-shaped node.
    #[inline]
    pub fn value(&self) -> Option<&Scalar> {
        match &self.data {
            TreeData::Value(v) => Some(v),
            TreeData::Children(_) => None,
        }
    }

    /// The children, if this is a structural node.
    #[inline]
    pub fn children(&self) -> Option<&TreeChildren> {
        match &self.data {
            TreeData::Value(_) => None,
            TreeData::Children(c) => Some(c),
        }
    }

    /// Look up a direct child.
    #[inline]
    pub fn child(&self, id: &PathArg) -> Option<&Arc<TreeNode>> {
        self.children().and_then(|c| c.get(id))
    }

    /// Follow a relative path from `node`.
    pub fn find(node: &Arc<TreeNode>, relative: &[PathArg]) -> Option<Arc<TreeNode>> {
        let mut current = node;
        for arg in relative {
            current = current.child(arg)?;
        }
        Some(Arc::clone(current))
    }

    /// Materialize this subtree as a normalized node.
    pub fn to_normalized(&self) -> NormalizedNode {
        let body = match &self.data {
            TreeData::Value(v) => NodeBody::Value(v.clone()),
            TreeData::Children(children) => NodeBody::Children(
                children
                    .iter()
                    .map(|(id, child)| (id.clone(), child.to_normalized()))
                    .collect::<Children>(),
            ),
        };
        NormalizedNode::new(self.identifier.clone(), body)
    }

    /// Compare payloads structurally, ignoring versions.
    pub fn data_eq(&self, other: &TreeNode) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.identifier != other.identifier {
            return false;
        }
        match (&self.data, &other.data) {
            (TreeData::Value(a), TreeData::Value(b)) => a == b,
            (TreeData::Children(a), TreeData::Children(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(id, child)| {
                        b.get(id)
                            .is_some_and(|o| Arc::ptr_eq(child, o) || child.data_eq(o))
                    })
            }
            _ => false,
        }
    }

    /// Start rebuilding this node. The identity version is kept; the
    /// children map is copied by reference.
    pub(crate) fn mutable(&self) -> MutableTreeNode {
        let children = match &self.data {
            TreeData::Children(c) => c.clone(),
            TreeData::Value(_) => TreeChildren::new(),
        };
        MutableTreeNode {
            identifier: self.identifier.clone(),
            identity_version: self.identity_version,
            subtree_version: self.subtree_version,
            children,
        }
    }
}

/// A structural node being rebuilt during apply.
#[derive(Debug)]
pub(crate) struct MutableTreeNode {
    identifier: PathArg,
    identity_version: Version,
    subtree_version: Version,
    children: TreeChildren,
}

impl MutableTreeNode {
    #[inline]
    pub(crate) fn set_subtree_version(&mut self, version: Version) {
        self.subtree_version = version;
    }

    #[inline]
    pub(crate) fn child(&self, id: &PathArg) -> Option<&Arc<TreeNode>> {
        self.children.get(id)
    }

    /// Insert or replace a child. Replacing keeps the child's position.
    #[inline]
    pub(crate) fn add_child(&mut self, child: Arc<TreeNode>) {
        self.children.insert(child.identifier().clone(), child);
    }

    pub(crate) fn remove_child(&mut self, id: &PathArg, policy: ChildPolicy) {
        match policy {
            ChildPolicy::Ordered => {
                self.children.shift_remove(id);
            }
            ChildPolicy::Unordered => {
                self.children.swap_remove(id);
            }
        }
    }

    pub(crate) fn retain_children(&mut self, mut keep: impl FnMut(&PathArg) -> bool) {
        self.children.retain(|id, _| keep(id));
    }

    pub(crate) fn seal(self) -> Arc<TreeNode> {
        Arc::new(TreeNode {
            identifier: self.identifier,
            identity_version: self.identity_version,
            subtree_version: self.subtree_version,
            data: TreeData::Children(self.children),
        })
    }
}
