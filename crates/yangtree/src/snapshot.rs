//! Immutable views of a data tree.

use crate::modification::DataTreeModification;
use crate::node::TreeNode;
use crate::root::RootStrategy;
use crate::version::VersionAllocator;
use std::sync::Arc;
use yangtree_model::{InstancePath, NormalizedNode};

/// A point-in-time view of a data tree.
///
/// Snapshots are cheap to clone and never change. Modifications opened on a
/// snapshot are isolated from each other and from later commits.
#[derive(Clone, Debug)]
pub struct DataTreeSnapshot {
    root: Arc<TreeNode>,
    strategy: Arc<RootStrategy>,
    allocator: Arc<VersionAllocator>,
}

impl DataTreeSnapshot {
    pub(crate) fn new(
        root: Arc<TreeNode>,
        strategy: Arc<RootStrategy>,
        allocator: Arc<VersionAllocator>,
    ) -> Self {
        Self {
            root,
            strategy,
            allocator,
        }
    }

    /// The root node of this snapshot.
    #[inline]
    pub fn root(&self) -> &Arc<TreeNode> {
        &self.root
    }

    /// Look up the persisted node at `path`.
    pub fn read_tree_node(&self, path: &InstancePath) -> Option<Arc<TreeNode>> {
        TreeNode::find(&self.root, path.args())
    }

    /// Read the data at `path`, or `None` if nothing is stored there.
    pub fn read_node(&self, path: &InstancePath) -> Option<NormalizedNode> {
        self.read_tree_node(path).map(|node| node.to_normalized())
    }

    /// Open a modification based on this snapshot.
    pub fn new_modification(&self) -> DataTreeModification {
        DataTreeModification::new(self.clone())
    }

    pub(crate) fn root_strategy(&self) -> &Arc<RootStrategy> {
        &self.strategy
    }

    pub(crate) fn allocator(&self) -> &Arc<VersionAllocator> {
        &self.allocator
    }
}
