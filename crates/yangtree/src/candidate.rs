//! Prepared changes awaiting commit.

use crate::modification::DataTreeModification;
use crate::modified::ModifiedNode;
use crate::node::TreeNode;
use crate::op::ModificationType;
use crate::version::Version;
use std::sync::Arc;
use yangtree_model::{NormalizedNode, PathArg};

/// The result of [`DataTree::prepare`](crate::DataTree::prepare): the root
/// the modification was applied to and the root it produced.
#[derive(Debug)]
pub struct DataTreeCandidate<'a> {
    modification: &'a DataTreeModification,
    before: Arc<TreeNode>,
    after: Arc<TreeNode>,
    version: Version,
}

impl<'a> DataTreeCandidate<'a> {
    pub(crate) fn new(
        modification: &'a DataTreeModification,
        before: Arc<TreeNode>,
        after: Arc<TreeNode>,
        version: Version,
    ) -> Self {
        Self {
            modification,
            before,
            after,
            version,
        }
    }

    /// The root the candidate was prepared against.
    #[inline]
    pub fn before(&self) -> &Arc<TreeNode> {
        &self.before
    }

    /// The root the candidate installs on commit.
    #[inline]
    pub fn after(&self) -> &Arc<TreeNode> {
        &self.after
    }

    /// The version changed nodes carry in [`after`](Self::after).
    ///
    /// Equal to the modification's own version unless another modification
    /// opened later was committed first.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Per-node view of what changed, starting at the root.
    pub fn root_node(&self) -> CandidateNode<'a> {
        CandidateNode {
            modification: self.modification.root_node(),
            before: Some(Arc::clone(&self.before)),
            after: Some(Arc::clone(&self.after)),
        }
    }
}

/// One changed node of a [`DataTreeCandidate`].
#[derive(Debug, Clone)]
pub struct CandidateNode<'a> {
    modification: &'a ModifiedNode,
    before: Option<Arc<TreeNode>>,
    after: Option<Arc<TreeNode>>,
}

impl<'a> CandidateNode<'a> {
    /// The identifier of this node.
    #[inline]
    pub fn identifier(&self) -> &PathArg {
        self.modification.identifier()
    }

    /// What happened to this node.
    #[inline]
    pub fn modification_type(&self) -> ModificationType {
        self.modification.modification_type()
    }

    /// The node before the change.
    #[inline]
    pub fn before(&self) -> Option<&Arc<TreeNode>> {
        self.before.as_ref()
    }

    /// The node after the change.
    #[inline]
    pub fn after(&self) -> Option<&Arc<TreeNode>> {
        self.after.as_ref()
    }

    /// The node before the change, as normalized data.
    pub fn data_before(&self) -> Option<NormalizedNode> {
        self.before.as_ref().map(|n| n.to_normalized())
    }

    /// The node after the change, as normalized data.
    pub fn data_after(&self) -> Option<NormalizedNode> {
        self.after.as_ref().map(|n| n.to_normalized())
    }

    /// Candidate nodes of the modified children.
    pub fn child_nodes(&self) -> impl Iterator<Item = CandidateNode<'a>> + '_ {
        self.modification
            .children()
            .map(move |child| self.child_node(child))
    }

    /// The candidate node of one modified child.
    pub fn child(&self, id: &PathArg) -> Option<CandidateNode<'a>> {
        self.modification.child(id).map(|child| self.child_node(child))
    }

    fn child_node(&self, child: &'a ModifiedNode) -> CandidateNode<'a> {
        let id = child.identifier();
        CandidateNode {
            modification: child,
            before: self.before.as_ref().and_then(|n| n.child(id)).cloned(),
            after: self.after.as_ref().and_then(|n| n.child(id)).cloned(),
        }
    }
}
