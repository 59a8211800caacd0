//! The staging tree recorded by a modification.
//!
//! A [`ModifiedNode`] overlays the snapshot a modification was opened on.
//! Each node remembers the persisted node it shadows (`original`), the
//! operation the caller requested and, for WRITE and MERGE, the supplied
//! value. Nothing here consults the schema; shape rules live in the
//! strategies.

use crate::node::TreeNode;
use crate::op::{ChildPolicy, LogicalOperation, ModificationType};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use yangtree_model::{NormalizedNode, PathArg};

/// A node of the staging tree.
#[derive(Debug)]
pub struct ModifiedNode {
    identifier: PathArg,
    original: Option<Arc<TreeNode>>,
    operation: LogicalOperation,
    value: Option<NormalizedNode>,
    children: IndexMap<PathArg, ModifiedNode>,
    child_policy: ChildPolicy,
    // Some ancestor staged in this session carries a value that may hold this node.
    under_value: bool,
    snapshot: OnceLock<Option<Arc<TreeNode>>>,
    modification_type: AtomicU8,
}

impl ModifiedNode {
    pub(crate) fn root(original: Arc<TreeNode>, child_policy: ChildPolicy) -> Self {
        Self::new(original.identifier().clone(), Some(original), child_policy)
    }

    fn new(
        identifier: PathArg,
        original: Option<Arc<TreeNode>>,
        child_policy: ChildPolicy,
    ) -> Self {
        Self {
            identifier,
            original,
            operation: LogicalOperation::None,
            value: None,
            children: IndexMap::new(),
            child_policy,
            under_value: false,
            snapshot: OnceLock::new(),
            modification_type: AtomicU8::new(ModificationType::Unmodified.into()),
        }
    }

    /// The identifier of this node within its parent.
    #[inline]
    pub fn identifier(&self) -> &PathArg {
        &self.identifier
    }

    /// The persisted node this staging node shadows.
    #[inline]
    pub fn original(&self) -> Option<&Arc<TreeNode>> {
        self.original.as_ref()
    }

    /// The requested operation.
    #[inline]
    pub fn operation(&self) -> LogicalOperation {
        self.operation
    }

    /// The written or merged value.
    #[inline]
    pub fn value(&self) -> Option<&NormalizedNode> {
        self.value.as_ref()
    }

    /// Child modifications, in the order the child policy dictates.
    #[inline]
    pub fn children(&self) -> impl Iterator<Item = &ModifiedNode> {
        self.children.values()
    }

    /// Look up a child modification.
    #[inline]
    pub fn child(&self, id: &PathArg) -> Option<&ModifiedNode> {
        self.children.get(id)
    }

    /// Returns true if any child modification is recorded.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The outcome recorded by the last enforced apply of this node.
    pub fn modification_type(&self) -> ModificationType {
        ModificationType::try_from(self.modification_type.load(Ordering::Acquire))
            .unwrap_or(ModificationType::Unmodified)
    }

    pub(crate) fn record(&self, outcome: ModificationType) {
        self.modification_type
            .store(outcome.into(), Ordering::Release);
    }

    pub(crate) fn cached_snapshot(&self) -> Option<Option<Arc<TreeNode>>> {
        self.snapshot.get().cloned()
    }

    pub(crate) fn cache_snapshot(&self, snapshot: Option<Arc<TreeNode>>) {
        // A concurrent reader may have filled it first; both computed the same fold.
        let _ = self.snapshot.set(snapshot);
    }

    /// Get or create the staging node for a child. A NONE node becomes TOUCH.
    pub(crate) fn modify_child(&mut self, id: &PathArg, child_policy: ChildPolicy) -> &mut ModifiedNode {
        self.snapshot.take();
        if self.operation == LogicalOperation::None {
            self.operation = LogicalOperation::Touch;
        }
        let original = self.original.as_ref().and_then(|o| o.child(id)).cloned();
        let under_value = self.under_value
            || matches!(
                self.operation,
                LogicalOperation::Write | LogicalOperation::Merge
            );
        self.children.entry(id.clone()).or_insert_with(|| {
            let mut child = ModifiedNode::new(id.clone(), original, child_policy);
            child.under_value = under_value;
            child
        })
    }

    /// Replace the node. Earlier child modifications are discarded.
    pub(crate) fn write(&mut self, value: NormalizedNode) {
        self.snapshot.take();
        self.children.clear();
        self.operation = LogicalOperation::Write;
        self.value = Some(value);
    }

    /// Set operation and value, keeping child modifications.
    pub(crate) fn update_value(&mut self, operation: LogicalOperation, value: NormalizedNode) {
        self.snapshot.take();
        self.operation = operation;
        self.value = Some(value);
    }

    /// Record a delete.
    ///
    /// A node created earlier in this session that did not exist in the
    /// baseline just drops back to NONE, unless a value staged above it may
    /// still carry it.
    pub(crate) fn delete(&mut self) {
        self.snapshot.take();
        self.operation = match self.operation {
            LogicalOperation::None | LogicalOperation::Delete => LogicalOperation::Delete,
            LogicalOperation::Touch | LogicalOperation::Write | LogicalOperation::Merge => {
                if self.original.is_some() || self.under_value {
                    LogicalOperation::Delete
                } else {
                    LogicalOperation::None
                }
            }
        };
        self.children.clear();
        self.value = None;
    }

    /// Drop abandoned staging nodes along `path`: childless NONE children are
    /// removed and a TOUCH without children falls back to NONE.
    pub(crate) fn prune(&mut self, path: &[PathArg]) {
        if let Some((first, rest)) = path.split_first() {
            let abandoned = match self.children.get_mut(first) {
                Some(child) => {
                    child.prune(rest);
                    child.operation == LogicalOperation::None && child.children.is_empty()
                }
                None => false,
            };
            if abandoned {
                match self.child_policy {
                    ChildPolicy::Ordered => {
                        self.children.shift_remove(first);
                    }
                    ChildPolicy::Unordered => {
                        self.children.swap_remove(first);
                    }
                }
            }
        }
        if self.operation == LogicalOperation::Touch && self.children.is_empty() {
            self.operation = LogicalOperation::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use yangtree_model::QName;

    fn q(name: &str) -> QName {
        QName::new("urn:t", name)
    }

    fn id(name: &str) -> PathArg {
        PathArg::Node(q(name))
    }

    fn base() -> Arc<TreeNode> {
        let data = NormalizedNode::container(
            q("root"),
            [NormalizedNode::container(
                q("a"),
                [NormalizedNode::leaf(q("x"), 1)],
            )],
        );
        TreeNode::from_normalized(&data, Version::initial())
    }

    #[test]
    fn test_modify_child_touches_parent() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        assert_eq!(root.operation(), LogicalOperation::None);

        let a = root.modify_child(&id("a"), ChildPolicy::Unordered);
        assert!(a.original().is_some());
        assert_eq!(a.operation(), LogicalOperation::None);

        assert_eq!(root.operation(), LogicalOperation::Touch);
        assert!(root.child(&id("a")).is_some());
    }

    #[test]
    fn test_child_without_baseline_has_no_original() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let b = root.modify_child(&id("b"), ChildPolicy::Unordered);
        assert!(b.original().is_none());
    }

    #[test]
    fn test_write_discards_children() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        root.modify_child(&id("a"), ChildPolicy::Unordered)
            .write(NormalizedNode::container(q("a"), []));
        root.write(NormalizedNode::container(q("root"), []));
        assert_eq!(root.operation(), LogicalOperation::Write);
        assert!(!root.has_children());
    }

    #[test]
    fn test_delete_of_new_node_cancels() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let b = root.modify_child(&id("b"), ChildPolicy::Unordered);
        b.write(NormalizedNode::leaf(q("b"), 1));
        b.delete();
        assert_eq!(b.operation(), LogicalOperation::None);
        assert!(b.value().is_none());
    }

    #[test]
    fn test_delete_below_written_parent_records_delete() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let b = root.modify_child(&id("b"), ChildPolicy::Unordered);
        b.write(NormalizedNode::container(q("b"), [NormalizedNode::leaf(q("c"), 1)]));
        let c = b.modify_child(&id("c"), ChildPolicy::Unordered);
        c.write(NormalizedNode::leaf(q("c"), 2));
        c.delete();
        assert_eq!(c.operation(), LogicalOperation::Delete);

        root.prune(&[id("b"), id("c")]);
        let b = root.child(&id("b")).unwrap();
        assert_eq!(b.operation(), LogicalOperation::Write);
        assert!(b.child(&id("c")).is_some());
    }

    #[test]
    fn test_delete_of_existing_node_records_delete() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let a = root.modify_child(&id("a"), ChildPolicy::Unordered);
        a.write(NormalizedNode::container(q("a"), []));
        a.delete();
        assert_eq!(a.operation(), LogicalOperation::Delete);

        let mut fresh = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let missing = fresh.modify_child(&id("zz"), ChildPolicy::Unordered);
        missing.delete();
        assert_eq!(missing.operation(), LogicalOperation::Delete);
    }

    #[test]
    fn test_prune_removes_abandoned_chain() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        let path = [id("a"), id("x")];
        {
            let a = root.modify_child(&path[0], ChildPolicy::Unordered);
            let x = a.modify_child(&path[1], ChildPolicy::Unordered);
            x.write(NormalizedNode::leaf(q("x"), 2));
        }
        {
            let a = root.modify_child(&path[0], ChildPolicy::Unordered);
            let b = a.modify_child(&id("new"), ChildPolicy::Unordered);
            b.write(NormalizedNode::leaf(q("new"), 2));
            b.delete();
        }
        root.prune(&[id("a"), id("new")]);
        let a = root.child(&id("a")).unwrap();
        assert!(a.child(&id("new")).is_none());
        assert!(a.child(&id("x")).is_some());
        assert_eq!(a.operation(), LogicalOperation::Touch);
    }

    #[test]
    fn test_prune_resets_empty_touch() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        root.modify_child(&id("a"), ChildPolicy::Unordered);
        root.prune(&[id("a")]);
        assert_eq!(root.operation(), LogicalOperation::None);
        assert!(!root.has_children());
    }

    #[test]
    fn test_mutation_clears_snapshot() {
        let mut root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        root.cache_snapshot(None);
        assert!(matches!(root.cached_snapshot(), Some(None)));
        root.modify_child(&id("a"), ChildPolicy::Unordered);
        assert!(root.cached_snapshot().is_none());
    }

    #[test]
    fn test_record_modification_type() {
        let root = ModifiedNode::root(base(), ChildPolicy::Unordered);
        assert_eq!(root.modification_type(), ModificationType::Unmodified);
        root.record(ModificationType::SubtreeModified);
        assert_eq!(root.modification_type(), ModificationType::SubtreeModified);
    }
}
