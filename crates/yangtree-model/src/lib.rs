//! Boundary types for the yangtree data store.
//!
//! `yangtree-model` defines what the data store consumes and produces:
//!
//! - **Identifiers**: [`QName`], [`PathArg`] and [`InstancePath`] address
//!   nodes in the tree.
//! - **Data**: [`NormalizedNode`] is the shape codecs translate wire
//!   documents into, with [`Scalar`] leaf values.
//! - **Schema**: [`Schema`] and [`SchemaNode`] describe which structures the
//!   store accepts.
//!
//! # Quick Start
//!
//! ```
//! use yangtree_model::{path, NormalizedNode, QName, Schema, SchemaNode};
//!
//! let test = QName::new("urn:example:test", "test");
//! let name = test.sibling("name");
//!
//! let schema = Schema::new().with_child(
//!     SchemaNode::container(test.clone()).with_child(SchemaNode::leaf(name.clone())),
//! );
//! assert_eq!(schema.children().len(), 1);
//!
//! let data = NormalizedNode::container(test.clone(), [NormalizedNode::leaf(name.clone(), "a")]);
//! let p = path!(test, name);
//! assert_eq!(p.len(), 2);
//! assert!(data.find(&p.args()[1..]).is_some());
//! ```

mod builder;
mod error;
mod node;
mod path;
mod qname;
mod scalar;
mod schema;

pub use builder::NodeBuilder;
pub use error::{value_type_name, ModelError, ModelResult};
pub use node::{Children, NodeBody, NormalizedNode};
pub use path::{EntryKeys, InstancePath, PathArg};
pub use qname::QName;
pub use scalar::Scalar;
pub use schema::{AugmentationSchema, CaseSchema, Schema, SchemaKind, SchemaNode};
