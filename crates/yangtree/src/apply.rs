//! Folding staged modifications into persisted nodes.
//!
//! Applying never mutates its inputs: the result is a new root that shares
//! every untouched subtree with `current`.

use crate::conflict;
use crate::error::{DataTreeError, DataTreeResult};
use crate::modified::ModifiedNode;
use crate::node::TreeNode;
use crate::op::{LogicalOperation, ModificationType};
use crate::strategy::{ApplyStrategy, StrategyKind};
use crate::version::Version;
use std::sync::Arc;
use yangtree_model::{InstancePath, NormalizedNode};

/// How strictly an apply treats the tree it is applied to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyMode {
    /// Conflict checks on, outcomes recorded. Used by validate and prepare.
    Enforce,
    /// Conflict checks off, outcomes recorded. Used for children folded on
    /// top of a value written in the same apply.
    Unchecked,
    /// Conflict checks off, nothing recorded. Used by reads and chaining.
    Speculative,
}

impl ApplyMode {
    #[inline]
    fn checks_conflicts(self) -> bool {
        self == ApplyMode::Enforce
    }

    #[inline]
    fn records_outcomes(self) -> bool {
        self != ApplyMode::Speculative
    }

    #[inline]
    fn unchecked(self) -> Self {
        match self {
            ApplyMode::Enforce => ApplyMode::Unchecked,
            other => other,
        }
    }
}

impl ApplyStrategy {
    /// Apply `modification` to `current`, producing the node that replaces it
    /// (`None` when the result is absent).
    pub fn apply(
        &self,
        mode: ApplyMode,
        path: &InstancePath,
        modification: &ModifiedNode,
        current: Option<&Arc<TreeNode>>,
        version: Version,
    ) -> DataTreeResult<Option<Arc<TreeNode>>> {
        let (result, outcome) = match modification.operation() {
            LogicalOperation::None => (current.cloned(), ModificationType::Unmodified),
            LogicalOperation::Delete => {
                if current.is_none() {
                    tracing::trace!(path = %path, "delete of absent node, nothing to do");
                }
                (None, ModificationType::Delete)
            }
            LogicalOperation::Touch => {
                if !self.kind().is_structural() {
                    return Err(DataTreeError::incorrect_structure(
                        path,
                        format!("{} does not allow subtree modification", self.name()),
                    ));
                }
                let current = conflict::check_touch(path, modification.original(), current)?;
                let node = self.fold_children(mode, path, modification, current, version)?;
                (Some(node), ModificationType::SubtreeModified)
            }
            LogicalOperation::Write => {
                if mode.checks_conflicts() {
                    conflict::check_write(path, modification.original(), current)?;
                }
                let node = self.apply_write(mode, path, modification, version)?;
                (Some(node), ModificationType::Write)
            }
            LogicalOperation::Merge => match current {
                None => {
                    let node = self.apply_merge_absent(mode, path, modification, version)?;
                    (Some(node), ModificationType::Write)
                }
                Some(current) => {
                    if mode.checks_conflicts() {
                        conflict::check_merge(self.kind(), path, modification.original(), current)?;
                    }
                    if self.kind().is_structural() {
                        let node = self.fold_children(mode, path, modification, current, version)?;
                        (Some(node), ModificationType::SubtreeModified)
                    } else {
                        let value = staged_value(path, modification)?;
                        (
                            Some(TreeNode::from_normalized(value, version)),
                            ModificationType::Merge,
                        )
                    }
                }
            },
        };
        if mode.records_outcomes() {
            modification.record(outcome);
        }
        Ok(result)
    }

    fn apply_write(
        &self,
        mode: ApplyMode,
        path: &InstancePath,
        modification: &ModifiedNode,
        version: Version,
    ) -> DataTreeResult<Arc<TreeNode>> {
        let node = TreeNode::from_normalized(staged_value(path, modification)?, version);
        if !modification.has_children() {
            return Ok(node);
        }
        // Children staged after the write were based on the old node
        self.fold_children(mode.unchecked(), path, modification, &node, version)
    }

    fn apply_merge_absent(
        &self,
        mode: ApplyMode,
        path: &InstancePath,
        modification: &ModifiedNode,
        version: Version,
    ) -> DataTreeResult<Arc<TreeNode>> {
        if !self.kind().is_structural() {
            return Ok(TreeNode::from_normalized(
                staged_value(path, modification)?,
                version,
            ));
        }
        // The merged children are all staged as child merges.
        let base = TreeNode::empty(modification.identifier().clone(), version);
        self.fold_children(mode, path, modification, &base, version)
    }

    /// Rebuild `base` with every child modification applied.
    fn fold_children(
        &self,
        mode: ApplyMode,
        path: &InstancePath,
        modification: &ModifiedNode,
        base: &Arc<TreeNode>,
        version: Version,
    ) -> DataTreeResult<Arc<TreeNode>> {
        let active_case = if self.kind() == StrategyKind::Choice {
            self.active_case(
                path,
                modification
                    .children()
                    .filter(|c| {
                        !matches!(
                            c.operation(),
                            LogicalOperation::None | LogicalOperation::Delete
                        )
                    })
                    .map(|c| c.identifier()),
            )?
        } else {
            None
        };

        let mut builder = base.mutable();
        builder.set_subtree_version(version);
        let policy = self.child_policy();
        for child in modification.children() {
            let id = child.identifier();
            let child_path = path.with_arg(id.clone());
            let strategy = self.child(id).ok_or_else(|| {
                DataTreeError::incorrect_structure(
                    &child_path,
                    format!("{id} is not a valid child of {}", self.name()),
                )
            })?;
            let current = builder.child(id).cloned();
            match strategy.apply(mode, &child_path, child, current.as_ref(), version)? {
                Some(node) => builder.add_child(node),
                None => builder.remove_child(id, policy),
            }
        }

        if let Some(case) = active_case {
            builder.retain_children(|id| self.in_case(case, id));
        }
        Ok(builder.seal())
    }
}

fn staged_value<'a>(
    path: &InstancePath,
    modification: &'a ModifiedNode,
) -> DataTreeResult<&'a NormalizedNode> {
    modification.value().ok_or_else(|| {
        DataTreeError::unsupported(format!(
            "{} at {path} carries no value",
            modification.operation()
        ))
    })
}
