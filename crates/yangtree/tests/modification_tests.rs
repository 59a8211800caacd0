//! Modification session behavior: staging, reads, sealing and chaining.

mod common;

use common::*;
use proptest::prelude::*;
use std::sync::Arc;
use yangtree::{
    path, DataTreeError, ErrorKind, InstancePath, LogicalOperation, ModificationType,
    NormalizedNode, Scalar, Version,
};

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_round_trip_merge_and_write() {
    let tree = tree();
    let base = tree.take_snapshot().unwrap();
    assert_eq!(base.root().subtree_version(), Version::initial());

    let mut a = base.new_modification();
    a.write(&path!(q("x")), NormalizedNode::leaf(q("x"), 1)).unwrap();
    a.ready().unwrap();

    let mut b = base.new_modification();
    b.merge(&path!(q("x")), NormalizedNode::leaf(q("x"), 1)).unwrap();
    b.write(&path!(q("y")), NormalizedNode::leaf(q("y"), 2)).unwrap();
    b.ready().unwrap();

    commit_sealed(&tree, &a).unwrap();
    let after_a = tree.take_snapshot().unwrap();
    assert_eq!(after_a.root().subtree_version(), a.version());

    commit_sealed(&tree, &b).unwrap();
    let after_b = tree.take_snapshot().unwrap();
    assert_eq!(
        after_b.read_node(&path!(q("x"))),
        Some(NormalizedNode::leaf(q("x"), 1))
    );
    assert_eq!(
        after_b.read_node(&path!(q("y"))),
        Some(NormalizedNode::leaf(q("y"), 2))
    );
    assert!(after_b.root().subtree_version() > after_a.root().subtree_version());
    assert_eq!(after_b.root().subtree_version(), b.version());
}

// ============================================================================
// NONE
// ============================================================================

#[test]
fn test_empty_modification_returns_current_root() {
    let tree = populated_tree();
    let m = tree.take_snapshot().unwrap().new_modification();
    m.ready().unwrap();
    let candidate = tree.prepare(&m).unwrap();
    assert!(Arc::ptr_eq(candidate.before(), candidate.after()));
    assert_eq!(
        candidate.root_node().modification_type(),
        ModificationType::Unmodified
    );
}

#[test]
fn test_abandoned_changes_leave_root_untouched() {
    let tree = populated_tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    m.write(&path!(q("x")), NormalizedNode::leaf(q("x"), 5)).unwrap();
    m.delete(&path!(q("x"))).unwrap();
    assert_eq!(m.root_operation(), LogicalOperation::None);
    m.ready().unwrap();

    let candidate = tree.prepare(&m).unwrap();
    assert!(Arc::ptr_eq(candidate.before(), candidate.after()));
}

proptest! {
    #[test]
    fn prop_none_is_identity(ids in proptest::collection::btree_set(1i64..50, 0..8)) {
        let tree = tree();
        commit(&tree, |m| {
            m.write(&test_path(), empty_test())?;
            m.write(
                &outer_list_path(),
                outer_list(ids.iter().map(|id| outer_entry(*id, []))),
            )
        })
        .unwrap();

        let snapshot = tree.take_snapshot().unwrap();
        let m = snapshot.new_modification();
        prop_assert_eq!(m.root_operation(), LogicalOperation::None);

        m.ready().unwrap();
        let candidate = tree.prepare(&m).unwrap();
        prop_assert!(Arc::ptr_eq(candidate.after(), snapshot.root()));
    }
}

// ============================================================================
// Staging rules
// ============================================================================

#[test]
fn test_write_rejects_unknown_path() {
    let tree = tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    let err = m
        .write(&path!(q("test"), q("bogus")), NormalizedNode::leaf(q("bogus"), 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(!m.root_node().has_children());
}

#[test]
fn test_write_rejects_path_below_leaf() {
    let tree = tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    let err = m
        .write(&path!(q("x"), q("y")), NormalizedNode::leaf(q("y"), 1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_write_rejects_mismatched_entry_keys() {
    let tree = tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    let err = m
        .write(&outer_entry_path(1), outer_entry(2, []))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_write_under_missing_parent_fails_on_validate() {
    let tree = tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    m.write(&path!(q("test"), q("name")), NormalizedNode::leaf(q("name"), "n"))
        .unwrap();
    m.ready().unwrap();
    let err = tree.validate(&m).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_delete_then_write_existing_node() {
    let tree = populated_tree();
    commit(&tree, |m| {
        m.delete(&test_path())?;
        m.write(&test_path(), empty_test())
    })
    .unwrap();
    let snapshot = tree.take_snapshot().unwrap();
    assert_eq!(snapshot.read_node(&test_path()), Some(empty_test()));
}

#[test]
fn test_delete_of_missing_entry() {
    // Ancestors of the deleted entry are touched, and touching an absent node fails
    let tree = tree();
    let err = commit(&tree, |m| m.delete(&outer_entry_path(9))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let tree = populated_tree();
    commit(&tree, |m| m.delete(&outer_entry_path(9))).unwrap();
    let snapshot = tree.take_snapshot().unwrap();
    assert!(snapshot.read_node(&outer_entry_path(1)).is_some());
}

#[test]
fn test_delete_after_write_below_written_parent() {
    let tree = tree();
    let name = test_path().node(q("name"));
    let mut m = tree.take_snapshot().unwrap().new_modification();
    m.write(
        &test_path(),
        NormalizedNode::container(q("test"), [NormalizedNode::leaf(q("name"), "a")]),
    )
    .unwrap();
    m.write(&name, NormalizedNode::leaf(q("name"), "b")).unwrap();
    m.delete(&name).unwrap();

    assert_eq!(m.read(&name).unwrap(), None);
    assert_eq!(m.read(&test_path()).unwrap(), Some(empty_test()));

    m.ready().unwrap();
    commit_sealed(&tree, &m).unwrap();
    let snapshot = tree.take_snapshot().unwrap();
    assert!(snapshot.read_node(&name).is_none());
    assert_eq!(snapshot.read_node(&test_path()), Some(empty_test()));
}

#[test]
fn test_merge_unions_children() {
    let tree = populated_tree();
    commit(&tree, |m| {
        m.merge(
            &test_path(),
            NormalizedNode::container(
                q("test"),
                [outer_list([outer_entry(3, [NormalizedNode::leaf(q("name"), "three")])])],
            ),
        )
    })
    .unwrap();

    let snapshot = tree.take_snapshot().unwrap();
    for id in [1, 2, 3] {
        assert!(snapshot.read_node(&outer_entry_path(id)).is_some(), "entry {id}");
    }
    assert_eq!(
        snapshot
            .read_node(&test_path().node(q("name")))
            .and_then(|n| n.value().cloned()),
        Some(Scalar::from("populated"))
    );
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_read_sees_staged_merge_over_snapshot() {
    let tree = populated_tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    m.merge(
        &outer_entry_path(1),
        outer_entry(1, [NormalizedNode::leaf(q("name"), "one")]),
    )
    .unwrap();

    let entry = m.read(&outer_entry_path(1)).unwrap().unwrap();
    assert_eq!(
        entry
            .child(&yangtree::PathArg::Node(q("name")))
            .and_then(|n| n.value().cloned()),
        Some(Scalar::from("one"))
    );
    // Existing content of the entry survives the merge
    assert!(entry.child(&yangtree::PathArg::Node(q("inner-list"))).is_some());
    // Untouched siblings are read from the snapshot
    assert!(m.read(&outer_entry_path(2)).unwrap().is_some());
}

#[test]
fn test_read_after_delete_is_absent() {
    let tree = populated_tree();
    let mut m = tree.take_snapshot().unwrap().new_modification();
    m.delete(&outer_entry_path(1)).unwrap();
    assert!(m.read(&outer_entry_path(1)).unwrap().is_none());
    assert!(m
        .read(&outer_entry_path(1).node(q("inner-list")))
        .unwrap()
        .is_none());
}

#[test]
fn test_read_root_of_untouched_modification() {
    let tree = populated_tree();
    let snapshot = tree.take_snapshot().unwrap();
    let m = snapshot.new_modification();
    let root = m.read_tree_node(&InstancePath::root()).unwrap().unwrap();
    assert!(Arc::ptr_eq(&root, snapshot.root()));
}

// ============================================================================
// Sealing and chaining
// ============================================================================

#[test]
fn test_ready_twice() {
    let m = tree().take_snapshot().unwrap().new_modification();
    assert!(!m.is_sealed());
    m.ready().unwrap();
    assert!(m.is_sealed());
    let err = m.ready().unwrap_err();
    assert!(matches!(err, DataTreeError::AlreadySealed));
}

#[test]
fn test_chained_fast_path_shares_snapshot() {
    let tree = populated_tree();
    let snapshot = tree.take_snapshot().unwrap();
    let m = snapshot.new_modification();
    m.ready().unwrap();
    let next = m.new_modification().unwrap();
    assert!(Arc::ptr_eq(next.snapshot().root(), snapshot.root()));
    assert!(next.version() > m.version());
}

#[test]
fn test_chained_modification_sees_previous_changes() {
    let tree = populated_tree();
    let mut first = tree.take_snapshot().unwrap().new_modification();
    first
        .write(&path!(q("x")), NormalizedNode::leaf(q("x"), 10))
        .unwrap();
    first.ready().unwrap();

    let mut second = first.new_modification().unwrap();
    assert_eq!(
        second.read(&path!(q("x"))).unwrap(),
        Some(NormalizedNode::leaf(q("x"), 10))
    );
    second
        .write(&path!(q("y")), NormalizedNode::leaf(q("y"), 20))
        .unwrap();
    second.ready().unwrap();

    commit_sealed(&tree, &first).unwrap();
    commit_sealed(&tree, &second).unwrap();

    let snapshot = tree.take_snapshot().unwrap();
    assert!(snapshot.read_node(&path!(q("x"))).is_some());
    assert!(snapshot.read_node(&path!(q("y"))).is_some());
}

#[test]
fn test_chained_root_delete_yields_empty_root() {
    let tree = populated_tree();
    let mut first = tree.take_snapshot().unwrap().new_modification();
    first.delete(&InstancePath::root()).unwrap();
    first.ready().unwrap();
    let second = first.new_modification().unwrap();
    let root = second.snapshot().root();
    assert_eq!(root.children().map(|c| c.len()), Some(0));
    assert_eq!(root.identifier(), &tree.config().root_identifier());
}

#[test]
fn test_read_does_not_record_outcomes() {
    let tree = populated_tree();
    let snapshot = tree.take_snapshot().unwrap();
    let mut m = snapshot.new_modification();
    m.delete(&outer_entry_path(2)).unwrap();
    m.ready().unwrap();
    let _ = m.read(&outer_list_path()).unwrap();
    assert_eq!(m.root_node().modification_type(), ModificationType::Unmodified);

    let candidate = tree.prepare(&m).unwrap();
    assert_eq!(
        candidate.root_node().modification_type(),
        ModificationType::SubtreeModified
    );
}
