//! Shared test model.
//!
//! ```text
//! x, y                      leaves at the root
//! test
//!   name                    leaf
//!   counter                 leaf, config false
//!   outer-list [id]
//!     id, name              leaves
//!     inner-list [name]     user-ordered
//!       name, value         leaves
//!   tags                    user-ordered leaf-list
//!   shape                   choice: circle { radius } | square { side }
//!   augmentation            { extra, note }
//! ```

#![allow(dead_code)]

use yangtree::{
    DataTree, DataTreeConfig, DataTreeModification, DataTreeResult, InstancePath, NormalizedNode,
    PathArg, QName, Scalar, Schema,
};
use yangtree_model::{path, AugmentationSchema, CaseSchema, SchemaNode};

pub const NS: &str = "urn:opendaylight:params:xml:ns:yang:controller:md:sal:dom:store:test";

pub fn q(name: &str) -> QName {
    QName::new(NS, name)
}

pub fn schema() -> Schema {
    Schema::new()
        .with_child(SchemaNode::leaf(q("x")))
        .with_child(SchemaNode::leaf(q("y")))
        .with_child(
            SchemaNode::container(q("test"))
                .with_child(SchemaNode::leaf(q("name")))
                .with_child(SchemaNode::leaf(q("counter")).with_config(false))
                .with_child(
                    SchemaNode::list(q("outer-list"), [q("id")])
                        .with_child(SchemaNode::leaf(q("id")))
                        .with_child(SchemaNode::leaf(q("name")))
                        .with_child(
                            SchemaNode::list(q("inner-list"), [q("name")])
                                .user_ordered()
                                .with_child(SchemaNode::leaf(q("name")))
                                .with_child(SchemaNode::leaf(q("value"))),
                        ),
                )
                .with_child(SchemaNode::leaf_list(q("tags")).user_ordered())
                .with_child(
                    SchemaNode::choice(q("shape"))
                        .with_case(
                            CaseSchema::new(q("circle")).with_child(SchemaNode::leaf(q("radius"))),
                        )
                        .with_case(
                            CaseSchema::new(q("square")).with_child(SchemaNode::leaf(q("side"))),
                        ),
                )
                .with_augmentation(
                    AugmentationSchema::new()
                        .with_child(SchemaNode::leaf(q("extra")))
                        .with_child(SchemaNode::leaf(q("note"))),
                ),
        )
}

pub fn tree() -> DataTree {
    DataTree::with_schema(DataTreeConfig::default(), &schema()).unwrap()
}

// ============================================================================
// Paths
// ============================================================================

pub fn test_path() -> InstancePath {
    path!(q("test"))
}

pub fn outer_list_path() -> InstancePath {
    path!(q("test"), q("outer-list"))
}

pub fn outer_entry_id(id: i64) -> PathArg {
    PathArg::entry(q("outer-list"), [(q("id"), Scalar::from(id))])
}

pub fn outer_entry_path(id: i64) -> InstancePath {
    outer_list_path().with_arg(outer_entry_id(id))
}

pub fn inner_list_path(outer: i64) -> InstancePath {
    outer_entry_path(outer).node(q("inner-list"))
}

pub fn inner_entry_id(name: &str) -> PathArg {
    PathArg::entry(q("inner-list"), [(q("name"), Scalar::from(name))])
}

// ============================================================================
// Values
// ============================================================================

pub fn empty_test() -> NormalizedNode {
    NormalizedNode::container(q("test"), [])
}

pub fn outer_entry(id: i64, children: impl IntoIterator<Item = NormalizedNode>) -> NormalizedNode {
    NormalizedNode::list_entry(q("outer-list"), [(q("id"), Scalar::from(id))], children)
}

pub fn inner_entry(name: &str, value: i64) -> NormalizedNode {
    NormalizedNode::list_entry(
        q("inner-list"),
        [(q("name"), Scalar::from(name))],
        [NormalizedNode::leaf(q("value"), value)],
    )
}

pub fn outer_list(entries: impl IntoIterator<Item = NormalizedNode>) -> NormalizedNode {
    NormalizedNode::list(q("outer-list"), entries)
}

/// `test` holding outer-list entries 1 and 2, each with an empty inner-list.
pub fn populated_test() -> NormalizedNode {
    NormalizedNode::container(
        q("test"),
        [
            NormalizedNode::leaf(q("name"), "populated"),
            outer_list([
                outer_entry(1, [NormalizedNode::list(q("inner-list"), [])]),
                outer_entry(2, [NormalizedNode::list(q("inner-list"), [])]),
            ]),
        ],
    )
}

// ============================================================================
// Transactions
// ============================================================================

/// Stage changes on a fresh modification, seal it, prepare and commit.
pub fn commit(
    tree: &DataTree,
    stage: impl FnOnce(&mut DataTreeModification) -> DataTreeResult<()>,
) -> DataTreeResult<()> {
    let mut m = tree.take_snapshot()?.new_modification();
    stage(&mut m)?;
    m.ready()?;
    commit_sealed(tree, &m)
}

/// Prepare and commit an already sealed modification.
pub fn commit_sealed(tree: &DataTree, m: &DataTreeModification) -> DataTreeResult<()> {
    tree.validate(m)?;
    let candidate = tree.prepare(m)?;
    tree.commit(candidate)
}

/// A tree holding [`populated_test`].
pub fn populated_tree() -> DataTree {
    let tree = tree();
    commit(&tree, |m| m.write(&test_path(), populated_test())).unwrap();
    tree
}
