//! The data tree: holder of the live root.
//!
//! All changes go through modifications:
//! - [`DataTree::take_snapshot`] hands out an immutable view
//! - modifications opened on it are sealed with `ready()`
//! - [`DataTree::prepare`] applies one to the live root with conflict checks
//! - [`DataTree::commit`] installs the result if nothing was committed since

use crate::apply::ApplyMode;
use crate::candidate::DataTreeCandidate;
use crate::config::DataTreeConfig;
use crate::error::{DataTreeError, DataTreeResult};
use crate::modification::DataTreeModification;
use crate::node::TreeNode;
use crate::root::RootStrategy;
use crate::snapshot::DataTreeSnapshot;
use crate::version::{Version, VersionAllocator};
use std::sync::{Arc, RwLock};
use yangtree_model::{InstancePath, Schema};

/// An in-memory, schema-validated, versioned data tree.
///
/// # Example
///
/// ```
/// use yangtree::{DataTree, DataTreeConfig};
/// use yangtree_model::{path, NormalizedNode, QName, Schema, SchemaNode};
///
/// let test = QName::new("urn:example", "test");
/// let schema = Schema::new().with_child(SchemaNode::container(test.clone()));
/// let tree = DataTree::with_schema(DataTreeConfig::default(), &schema).unwrap();
///
/// let mut m = tree.take_snapshot().unwrap().new_modification();
/// m.write(&path!(test.clone()), NormalizedNode::container(test.clone(), [])).unwrap();
/// m.ready().unwrap();
///
/// tree.validate(&m).unwrap();
/// let candidate = tree.prepare(&m).unwrap();
/// tree.commit(candidate).unwrap();
///
/// let snapshot = tree.take_snapshot().unwrap();
/// assert!(snapshot.read_node(&path!(test)).is_some());
/// ```
#[derive(Debug)]
pub struct DataTree {
    config: DataTreeConfig,
    root: RwLock<Arc<TreeNode>>,
    strategy: Arc<RootStrategy>,
    allocator: Arc<VersionAllocator>,
}

impl DataTree {
    /// Create an empty tree. Until a schema is installed only the root
    /// itself can be modified.
    pub fn new(config: DataTreeConfig) -> Self {
        let root = TreeNode::empty(config.root_identifier(), Version::initial());
        Self {
            strategy: Arc::new(RootStrategy::new(config.clone())),
            config,
            root: RwLock::new(root),
            allocator: Arc::new(VersionAllocator::new()),
        }
    }

    /// Create an empty tree accepting data described by `schema`.
    pub fn with_schema(config: DataTreeConfig, schema: &Schema) -> DataTreeResult<Self> {
        let tree = Self::new(config);
        tree.set_schema(schema)?;
        Ok(tree)
    }

    /// The configuration this tree was created with.
    #[inline]
    pub fn config(&self) -> &DataTreeConfig {
        &self.config
    }

    /// Install the schema. Installing the same schema again is a no-op.
    pub fn set_schema(&self, schema: &Schema) -> DataTreeResult<()> {
        if self.strategy.install(schema)? {
            tracing::debug!(
                tree_type = ?self.config.tree_type,
                top_level = schema.children().len(),
                "schema installed"
            );
        }
        Ok(())
    }

    /// Returns true once a schema is installed.
    #[inline]
    pub fn has_schema(&self) -> bool {
        self.strategy.is_installed()
    }

    /// Take an immutable view of the current state.
    pub fn take_snapshot(&self) -> DataTreeResult<DataTreeSnapshot> {
        Ok(DataTreeSnapshot::new(
            self.live_root()?,
            Arc::clone(&self.strategy),
            Arc::clone(&self.allocator),
        ))
    }

    /// Check that `modification` could be applied to the current state.
    pub fn validate(&self, modification: &DataTreeModification) -> DataTreeResult<()> {
        let current = self.live_root()?;
        let version = self.commit_version(modification, &current);
        self.apply(modification, &current, version)?;
        Ok(())
    }

    /// Apply `modification` to the current state, producing a candidate.
    pub fn prepare<'a>(
        &self,
        modification: &'a DataTreeModification,
    ) -> DataTreeResult<DataTreeCandidate<'a>> {
        let before = self.live_root()?;
        let version = self.commit_version(modification, &before);
        let after = self.apply(modification, &before, version)?;
        tracing::debug!(
            version = %version,
            unchanged = Arc::ptr_eq(&before, &after),
            "candidate prepared"
        );
        Ok(DataTreeCandidate::new(modification, before, after, version))
    }

    /// Install a prepared candidate.
    ///
    /// Fails with [`DataTreeError::StaleCandidate`] if another candidate was
    /// committed after this one was prepared.
    pub fn commit(&self, candidate: DataTreeCandidate<'_>) -> DataTreeResult<()> {
        let mut root = self.root.write().map_err(|_| DataTreeError::LockPoisoned)?;
        if !Arc::ptr_eq(&root, candidate.before()) {
            tracing::warn!(
                version = %candidate.version(),
                "candidate was prepared against a root that is no longer current"
            );
            return Err(DataTreeError::StaleCandidate);
        }
        *root = Arc::clone(candidate.after());
        tracing::debug!(
            version = %candidate.version(),
            subtree_version = %candidate.after().subtree_version(),
            "candidate committed"
        );
        Ok(())
    }

    fn live_root(&self) -> DataTreeResult<Arc<TreeNode>> {
        let root = self.root.read().map_err(|_| DataTreeError::LockPoisoned)?;
        Ok(Arc::clone(&root))
    }

    /// The version nodes changed by `modification` receive when applied to
    /// `current`: the preallocated one, or a fresh one if `current` already
    /// carries a later version. The root's subtree version never decreases.
    fn commit_version(&self, modification: &DataTreeModification, current: &TreeNode) -> Version {
        let preallocated = modification.version();
        if preallocated > current.subtree_version() {
            preallocated
        } else {
            let fresh = self.allocator.next();
            tracing::trace!(
                preallocated = %preallocated,
                version = %fresh,
                "modification opened before the current root, using a fresh version"
            );
            fresh
        }
    }

    fn apply(
        &self,
        modification: &DataTreeModification,
        current: &Arc<TreeNode>,
        version: Version,
    ) -> DataTreeResult<Arc<TreeNode>> {
        if !modification.is_sealed() {
            return Err(DataTreeError::NotSealed);
        }
        let result = modification
            .strategy()
            .apply(
                ApplyMode::Enforce,
                &InstancePath::root(),
                modification.root_node(),
                Some(current),
                version,
            )
            .map_err(|e| {
                if e.is_conflict() {
                    tracing::warn!(version = %version, error = %e, "modification conflicts with current state");
                }
                e
            })?;
        Ok(result.unwrap_or_else(|| TreeNode::empty(self.config.root_identifier(), version)))
    }
}

impl Default for DataTree {
    fn default() -> Self {
        Self::new(DataTreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::ModificationType;
    use yangtree_model::{path, NormalizedNode, PathArg, QName, SchemaNode};

    fn q(name: &str) -> QName {
        QName::new("urn:t", name)
    }

    fn schema() -> Schema {
        Schema::new().with_child(
            SchemaNode::container(q("top"))
                .with_child(SchemaNode::leaf(q("a")))
                .with_child(SchemaNode::leaf(q("b"))),
        )
    }

    fn commit_write(tree: &DataTree, path: InstancePath, value: NormalizedNode) {
        let mut m = tree.take_snapshot().unwrap().new_modification();
        m.write(&path, value).unwrap();
        m.ready().unwrap();
        let candidate = tree.prepare(&m).unwrap();
        tree.commit(candidate).unwrap();
    }

    #[test]
    fn test_new_tree_is_empty_root() {
        let tree = DataTree::default();
        let snapshot = tree.take_snapshot().unwrap();
        assert_eq!(snapshot.root().subtree_version(), Version::initial());
        assert_eq!(snapshot.root().children().map(|c| c.len()), Some(0));
        assert!(!tree.has_schema());
    }

    #[test]
    fn test_prepare_requires_sealed() {
        let tree = DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap();
        let m = tree.take_snapshot().unwrap().new_modification();
        assert!(matches!(tree.prepare(&m), Err(DataTreeError::NotSealed)));
        assert!(matches!(tree.validate(&m), Err(DataTreeError::NotSealed)));
    }

    #[test]
    fn test_stale_candidate_rejected() {
        let tree = DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap();
        let snapshot = tree.take_snapshot().unwrap();

        let mut m1 = snapshot.new_modification();
        m1.write(&path!(q("top")), NormalizedNode::container(q("top"), []))
            .unwrap();
        m1.ready().unwrap();
        let m2 = snapshot.new_modification();
        m2.ready().unwrap();

        let c1 = tree.prepare(&m1).unwrap();
        let c2 = tree.prepare(&m2).unwrap();
        tree.commit(c1).unwrap();
        assert!(matches!(tree.commit(c2), Err(DataTreeError::StaleCandidate)));
    }

    #[test]
    fn test_commit_out_of_opening_order_keeps_versions_increasing() {
        let tree = DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap();
        commit_write(&tree, path!(q("top")), NormalizedNode::container(q("top"), []));
        let snapshot = tree.take_snapshot().unwrap();

        let mut opened_first = snapshot.new_modification();
        let mut opened_second = snapshot.new_modification();
        assert!(opened_first.version() < opened_second.version());
        opened_second
            .write(&path!(q("top"), q("a")), NormalizedNode::leaf(q("a"), 1))
            .unwrap();
        opened_first
            .write(&path!(q("top"), q("b")), NormalizedNode::leaf(q("b"), 2))
            .unwrap();
        opened_second.ready().unwrap();
        opened_first.ready().unwrap();

        let candidate = tree.prepare(&opened_second).unwrap();
        assert_eq!(candidate.version(), opened_second.version());
        tree.commit(candidate).unwrap();
        let after_second = tree.take_snapshot().unwrap();

        let candidate = tree.prepare(&opened_first).unwrap();
        assert!(candidate.version() > opened_second.version());
        tree.commit(candidate).unwrap();
        let after_first = tree.take_snapshot().unwrap();

        let root_version = after_first.root().subtree_version();
        assert!(root_version > after_second.root().subtree_version());
        for leaf in ["a", "b"] {
            let node = after_first.read_tree_node(&path!(q("top"), q(leaf))).unwrap();
            assert!(node.identity_version() <= root_version, "leaf {leaf}");
        }
        let top = after_first.read_tree_node(&path!(q("top"))).unwrap();
        assert_eq!(top.subtree_version(), root_version);
    }

    #[test]
    fn test_root_delete_leaves_empty_root() {
        let tree = DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap();
        commit_write(
            &tree,
            path!(q("top")),
            NormalizedNode::container(q("top"), [NormalizedNode::leaf(q("a"), 1)]),
        );
        let mut m = tree.take_snapshot().unwrap().new_modification();
        m.delete(&InstancePath::root()).unwrap();
        m.ready().unwrap();
        let candidate = tree.prepare(&m).unwrap();
        assert_eq!(candidate.root_node().modification_type(), ModificationType::Delete);
        assert_eq!(candidate.after().identifier(), &tree.config().root_identifier());
        tree.commit(candidate).unwrap();
        assert!(tree
            .take_snapshot()
            .unwrap()
            .read_node(&path!(q("top")))
            .is_none());
    }

    #[test]
    fn test_candidate_nodes() {
        let tree = DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap();
        commit_write(
            &tree,
            path!(q("top")),
            NormalizedNode::container(q("top"), [NormalizedNode::leaf(q("a"), 1)]),
        );

        let mut m = tree.take_snapshot().unwrap().new_modification();
        m.write(&path!(q("top"), q("b")), NormalizedNode::leaf(q("b"), 2))
            .unwrap();
        m.ready().unwrap();
        let candidate = tree.prepare(&m).unwrap();

        let root = candidate.root_node();
        assert_eq!(root.modification_type(), ModificationType::SubtreeModified);
        let top = root.child(&PathArg::Node(q("top"))).unwrap();
        assert_eq!(top.modification_type(), ModificationType::SubtreeModified);
        let b = top.child_nodes().next().unwrap();
        assert_eq!(b.modification_type(), ModificationType::Write);
        assert!(b.data_before().is_none());
        assert_eq!(b.data_after(), Some(NormalizedNode::leaf(q("b"), 2)));
    }

    #[test]
    fn test_schema_installed_later() {
        let tree = DataTree::default();
        let mut early = tree.take_snapshot().unwrap().new_modification();
        assert!(early
            .write(&path!(q("top")), NormalizedNode::container(q("top"), []))
            .is_err());

        tree.set_schema(&schema()).unwrap();
        assert!(tree.has_schema());
        // A modification still at the root picks up the installed schema
        early
            .write(&path!(q("top")), NormalizedNode::container(q("top"), []))
            .unwrap();
        tree.set_schema(&schema()).unwrap();
    }
}
