//! Version-based conflict detection.
//!
//! A staging node remembers the persisted node it was based on. When the
//! modification is applied to the live tree, these checks compare that
//! baseline with the node the tree holds now and reject the apply if another
//! transaction changed it in a way the operation cannot absorb.

use crate::error::{DataTreeError, DataTreeResult};
use crate::node::TreeNode;
use crate::strategy::StrategyKind;
use std::sync::Arc;
use yangtree_model::InstancePath;

/// Message for a baseline node that no longer exists.
pub const DELETED: &str = "Node was deleted by other transaction.";
/// Message for a node that appeared after the baseline was taken.
pub const CREATED: &str = "Node was created by other transaction.";
/// Message for a node whose own value was replaced.
pub const REPLACED: &str = "Node was replaced by other transaction.";
/// Message for a node whose descendants changed.
pub const CHILDREN_MODIFIED: &str = "Node children was modified by other transaction.";

/// Check that a WRITE may replace `current`.
pub fn check_write(
    path: &InstancePath,
    original: Option<&Arc<TreeNode>>,
    current: Option<&Arc<TreeNode>>,
) -> DataTreeResult<()> {
    match (original, current) {
        (Some(original), Some(current)) => check_not_conflicting(path, original, current),
        (Some(_), None) => Err(DataTreeError::conflict(path, DELETED)),
        (None, Some(_)) => Err(DataTreeError::conflict(path, CREATED)),
        (None, None) => Ok(()),
    }
}

/// Check that a MERGE may be folded into `current`.
///
/// Only applies when both baseline and current exist. Equal data is always
/// mergeable. Leaves are version-checked; structural nodes defer to the
/// checks made on their children.
pub fn check_merge(
    kind: StrategyKind,
    path: &InstancePath,
    original: Option<&Arc<TreeNode>>,
    current: &Arc<TreeNode>,
) -> DataTreeResult<()> {
    let Some(original) = original else {
        return Ok(());
    };
    if Arc::ptr_eq(original, current) || original.data_eq(current) {
        return Ok(());
    }
    if kind.is_structural() {
        return Ok(());
    }
    check_not_conflicting(path, original, current)
}

/// Check that a TOUCH has something to touch and return it.
pub fn check_touch<'a>(
    path: &InstancePath,
    original: Option<&Arc<TreeNode>>,
    current: Option<&'a Arc<TreeNode>>,
) -> DataTreeResult<&'a Arc<TreeNode>> {
    match (original, current) {
        (_, Some(current)) => Ok(current),
        (Some(_), None) => Err(DataTreeError::conflict(path, DELETED)),
        (None, None) => Err(DataTreeError::invalid_argument(format!(
            "node {path} does not exist, cannot apply modification to its children"
        ))),
    }
}

/// Fail if `current` is not the node `original` describes.
pub fn check_not_conflicting(
    path: &InstancePath,
    original: &TreeNode,
    current: &TreeNode,
) -> DataTreeResult<()> {
    if original.identity_version() != current.identity_version() {
        return Err(DataTreeError::conflict(path, REPLACED));
    }
    if original.subtree_version() != current.subtree_version() {
        return Err(DataTreeError::conflict(path, CHILDREN_MODIFIED));
    }
    Ok(())
}
