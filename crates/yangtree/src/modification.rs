//! Modification sessions.
//!
//! A [`DataTreeModification`] records writes, merges and deletes against a
//! snapshot without touching it. Once sealed with [`ready`], it can be
//! validated, prepared and committed by the [`DataTree`], or used as the
//! base of a chained modification.
//!
//! [`ready`]: DataTreeModification::ready
//! [`DataTree`]: crate::DataTree

use crate::apply::ApplyMode;
use crate::error::{DataTreeError, DataTreeResult};
use crate::modified::ModifiedNode;
use crate::node::TreeNode;
use crate::op::LogicalOperation;
use crate::snapshot::DataTreeSnapshot;
use crate::strategy::ApplyStrategy;
use crate::version::Version;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use yangtree_model::{InstancePath, NormalizedNode};

const OPEN: u8 = 0;
const SEALED: u8 = 1;

/// An isolated set of staged changes against one snapshot.
///
/// Staging calls take `&mut self`; reading, sealing and chaining take
/// `&self`, so a sealed modification can be shared between threads.
///
/// # Examples
///
/// ```
/// use yangtree::{DataTree, DataTreeConfig};
/// use yangtree_model::{path, NormalizedNode, QName, Schema, SchemaNode};
///
/// let test = QName::new("urn:example", "test");
/// let name = test.sibling("name");
/// let schema = Schema::new()
///     .with_child(SchemaNode::container(test.clone()).with_child(SchemaNode::leaf(name.clone())));
/// let tree = DataTree::with_schema(DataTreeConfig::default(), &schema).unwrap();
///
/// let mut m = tree.take_snapshot().unwrap().new_modification();
/// m.write(&path!(test.clone()), NormalizedNode::container(test.clone(), [])).unwrap();
/// m.write(&path!(test.clone(), name.clone()), NormalizedNode::leaf(name.clone(), "a")).unwrap();
///
/// let value = m.read(&path!(test, name)).unwrap().unwrap();
/// assert_eq!(value.value().and_then(|v| v.as_str()), Some("a"));
/// ```
#[derive(Debug)]
pub struct DataTreeModification {
    snapshot: DataTreeSnapshot,
    strategy: Arc<ApplyStrategy>,
    root: ModifiedNode,
    version: Version,
    state: AtomicU8,
}

impl DataTreeModification {
    pub(crate) fn new(snapshot: DataTreeSnapshot) -> Self {
        let strategy = snapshot.root_strategy().current();
        let version = snapshot.allocator().next();
        let root = ModifiedNode::root(Arc::clone(snapshot.root()), strategy.child_policy());
        Self {
            snapshot,
            strategy,
            root,
            version,
            state: AtomicU8::new(OPEN),
        }
    }

    /// The version nodes changed by this modification will carry.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// The snapshot this modification is based on.
    #[inline]
    pub fn snapshot(&self) -> &DataTreeSnapshot {
        &self.snapshot
    }

    /// The operation recorded on the root.
    #[inline]
    pub fn root_operation(&self) -> LogicalOperation {
        self.root.operation()
    }

    /// The root of the staging tree.
    #[inline]
    pub fn root_node(&self) -> &ModifiedNode {
        &self.root
    }

    /// Returns true once [`ready`](Self::ready) has been called.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.state.load(Ordering::Acquire) == SEALED
    }

    pub(crate) fn strategy(&self) -> &Arc<ApplyStrategy> {
        &self.strategy
    }

    /// Replace the node at `path` with `value`.
    pub fn write(&mut self, path: &InstancePath, value: NormalizedNode) -> DataTreeResult<()> {
        self.check_open()?;
        self.refresh_strategy();
        let strategy = Arc::clone(&self.strategy);
        let chain = strategy.resolve(path)?;
        self.check_identifier(path, &value)?;
        chain[path.len()].verify_structure(path, &value)?;
        check_not_deleted(&self.root, path)?;

        stage(&mut self.root, path, &chain).write(value);
        self.root.prune(path.args());
        Ok(())
    }

    /// Merge `value` into whatever the tree holds at `path` when applied.
    pub fn merge(&mut self, path: &InstancePath, value: NormalizedNode) -> DataTreeResult<()> {
        self.check_open()?;
        self.refresh_strategy();
        let strategy = Arc::clone(&self.strategy);
        let chain = strategy.resolve(path)?;
        self.check_identifier(path, &value)?;
        let target = chain[path.len()];
        target.verify_structure(path, &value)?;
        check_not_deleted(&self.root, path)?;

        target.merge_into(path, stage(&mut self.root, path, &chain), value)?;
        self.root.prune(path.args());
        Ok(())
    }

    /// Remove the node at `path`. Removing an absent node is a no-op on apply.
    pub fn delete(&mut self, path: &InstancePath) -> DataTreeResult<()> {
        self.check_open()?;
        self.refresh_strategy();
        let strategy = Arc::clone(&self.strategy);
        let chain = strategy.resolve(path)?;
        check_not_deleted(&self.root, path)?;

        stage(&mut self.root, path, &chain).delete();
        self.root.prune(path.args());
        Ok(())
    }

    /// Read the data at `path` as this modification would leave it.
    pub fn read(&self, path: &InstancePath) -> DataTreeResult<Option<NormalizedNode>> {
        Ok(self.read_tree_node(path)?.map(|node| node.to_normalized()))
    }

    /// Like [`read`](Self::read), returning the persisted node.
    pub fn read_tree_node(&self, path: &InstancePath) -> DataTreeResult<Option<Arc<TreeNode>>> {
        let mut node = &self.root;
        let mut strategy: &ApplyStrategy = &self.strategy;
        let mut depth = 0;
        while depth < path.len() && !node.operation().is_terminal() {
            let arg = &path[depth];
            let (Some(child), Some(child_strategy)) = (node.child(arg), strategy.child(arg)) else {
                break;
            };
            node = child;
            strategy = child_strategy;
            depth += 1;
        }

        let resolved = self
            .resolve_snapshot(node, strategy, &path.truncated(depth))
            .map_err(|e| {
                tracing::error!(path = %path, error = %e, "failed to resolve modified subtree");
                e
            })?;
        Ok(resolved.and_then(|n| TreeNode::find(&n, &path.args()[depth..])))
    }

    /// Seal the modification. Exactly one caller succeeds.
    pub fn ready(&self) -> DataTreeResult<()> {
        self.state
            .compare_exchange(OPEN, SEALED, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DataTreeError::AlreadySealed)?;
        tracing::debug!(
            version = %self.version,
            root_operation = %self.root.operation(),
            "modification sealed"
        );
        Ok(())
    }

    /// Open a modification on top of this sealed one without committing it.
    pub fn new_modification(&self) -> DataTreeResult<DataTreeModification> {
        if !self.is_sealed() {
            return Err(DataTreeError::NotSealed);
        }
        if self.root.operation() == LogicalOperation::None {
            return Ok(self.snapshot.new_modification());
        }

        let root = self
            .resolve_snapshot(&self.root, &self.strategy, &InstancePath::root())?
            .unwrap_or_else(|| {
                TreeNode::empty(self.snapshot.root().identifier().clone(), self.version)
            });
        let snapshot = DataTreeSnapshot::new(
            root,
            Arc::clone(self.snapshot.root_strategy()),
            Arc::clone(self.snapshot.allocator()),
        );
        Ok(snapshot.new_modification())
    }

    fn resolve_snapshot(
        &self,
        node: &ModifiedNode,
        strategy: &ApplyStrategy,
        path: &InstancePath,
    ) -> DataTreeResult<Option<Arc<TreeNode>>> {
        if let Some(cached) = node.cached_snapshot() {
            return Ok(cached);
        }
        let resolved = strategy.apply(
            ApplyMode::Speculative,
            path,
            node,
            node.original(),
            self.version,
        )?;
        node.cache_snapshot(resolved.clone());
        Ok(resolved)
    }

    fn check_open(&self) -> DataTreeResult<()> {
        if self.is_sealed() {
            Err(DataTreeError::Sealed)
        } else {
            Ok(())
        }
    }

    // Pick up a schema installed after this modification was opened.
    fn refresh_strategy(&mut self) {
        if self.root.operation() == LogicalOperation::None {
            self.strategy = self.snapshot.root_strategy().current();
        }
    }

    fn check_identifier(&self, path: &InstancePath, value: &NormalizedNode) -> DataTreeResult<()> {
        let expected = path
            .last()
            .unwrap_or_else(|| self.snapshot.root().identifier());
        if value.identifier() == expected {
            Ok(())
        } else {
            Err(DataTreeError::invalid_argument(format!(
                "value identified by {} cannot be stored at {path}",
                value.identifier()
            )))
        }
    }
}

fn check_not_deleted(root: &ModifiedNode, path: &InstancePath) -> DataTreeResult<()> {
    let mut node = root;
    for (depth, arg) in path.iter().enumerate() {
        if node.operation() == LogicalOperation::Delete {
            return Err(DataTreeError::invalid_argument(format!(
                "cannot modify {path}: {} was deleted in this modification",
                path.truncated(depth)
            )));
        }
        match node.child(arg) {
            Some(child) => node = child,
            None => return Ok(()),
        }
    }
    Ok(())
}

fn stage<'m>(
    root: &'m mut ModifiedNode,
    path: &InstancePath,
    chain: &[&ApplyStrategy],
) -> &'m mut ModifiedNode {
    let mut node = root;
    for (arg, strategy) in path.iter().zip(&chain[1..]) {
        node = node.modify_child(arg, strategy.child_policy());
    }
    node
}
