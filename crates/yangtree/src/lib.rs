//! In-memory, schema-validated, versioned data tree.
//!
//! `yangtree` keeps the authoritative configuration or state tree of a
//! management system in memory. Writers never lock the tree: each stages its
//! changes in an isolated [`DataTreeModification`], and the tree checks at
//! prepare time that nothing it depended on was changed by another
//! transaction in the meantime.
//!
//! # Core Concepts
//!
//! - **Snapshots**: immutable views sharing structure with the live tree
//! - **Modifications**: staged writes, merges and deletes over a snapshot
//! - **Strategies**: per-schema-node rules that validate and apply changes
//! - **Versions**: tokens that let conflicting concurrent changes be detected
//!
//! # Quick Start
//!
//! ```
//! use yangtree::{DataTree, DataTreeConfig};
//! use yangtree_model::{path, NormalizedNode, PathArg, QName, Schema, SchemaNode};
//!
//! let test = QName::new("urn:example:test", "test");
//! let list = test.sibling("outer-list");
//! let id = test.sibling("id");
//! let schema = Schema::new().with_child(
//!     SchemaNode::container(test.clone()).with_child(
//!         SchemaNode::list(list.clone(), [id.clone()]).with_child(SchemaNode::leaf(id.clone())),
//!     ),
//! );
//! let tree = DataTree::with_schema(DataTreeConfig::default(), &schema).unwrap();
//!
//! let mut m = tree.take_snapshot().unwrap().new_modification();
//! m.write(&path!(test.clone()), NormalizedNode::container(test.clone(), [])).unwrap();
//! m.merge(
//!     &path!(test.clone(), list.clone()),
//!     NormalizedNode::list(
//!         list.clone(),
//!         [NormalizedNode::list_entry(list.clone(), [(id.clone(), 1.into())], [])],
//!     ),
//! )
//! .unwrap();
//! m.ready().unwrap();
//!
//! let candidate = tree.prepare(&m).unwrap();
//! tree.commit(candidate).unwrap();
//!
//! let entry = PathArg::entry(list.clone(), [(id, 1.into())]);
//! let snapshot = tree.take_snapshot().unwrap();
//! assert!(snapshot.read_node(&path!(test, list, entry)).is_some());
//! ```

mod apply;
mod candidate;
pub mod conflict;
mod config;
mod error;
mod modification;
mod modified;
mod node;
mod op;
mod root;
mod snapshot;
mod strategy;
mod tree;
mod version;

pub use apply::ApplyMode;
pub use candidate::{CandidateNode, DataTreeCandidate};
pub use config::{DataTreeConfig, TreeType, NETCONF_BASE_NAMESPACE};
pub use error::{DataTreeError, DataTreeResult, ErrorKind};
pub use modification::DataTreeModification;
pub use modified::ModifiedNode;
pub use node::{TreeChildren, TreeData, TreeNode};
pub use op::{ChildPolicy, LogicalOperation, ModificationType};
pub use snapshot::DataTreeSnapshot;
pub use strategy::{ApplyStrategy, StrategyKind};
pub use tree::DataTree;
pub use version::{Version, VersionAllocator};

// Re-export the boundary types for convenience
pub use yangtree_model::{path, InstancePath, NormalizedNode, PathArg, QName, Scalar, Schema};
