//! Operations recorded in the staging tree and their resolved outcomes.

use crate::error::DataTreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The intent a caller recorded on a staging node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOperation {
    /// Nothing happened to this node.
    None,
    /// Only children of this node were modified.
    Touch,
    /// The node is replaced wholesale.
    Write,
    /// The node is combined with whatever the tree holds at apply time.
    Merge,
    /// The node is removed.
    Delete,
}

impl LogicalOperation {
    /// Terminal operations fully determine the node's resulting value.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LogicalOperation::Write | LogicalOperation::Merge | LogicalOperation::Delete
        )
    }
}

impl TryFrom<u8> for LogicalOperation {
    type Error = DataTreeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(LogicalOperation::None),
            1 => Ok(LogicalOperation::Touch),
            2 => Ok(LogicalOperation::Write),
            3 => Ok(LogicalOperation::Merge),
            4 => Ok(LogicalOperation::Delete),
            other => Err(DataTreeError::unsupported(format!(
                "modification operation {other} is not supported"
            ))),
        }
    }
}

impl From<LogicalOperation> for u8 {
    fn from(op: LogicalOperation) -> Self {
        match op {
            LogicalOperation::None => 0,
            LogicalOperation::Touch => 1,
            LogicalOperation::Write => 2,
            LogicalOperation::Merge => 3,
            LogicalOperation::Delete => 4,
        }
    }
}

impl fmt::Display for LogicalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogicalOperation::None => "NONE",
            LogicalOperation::Touch => "TOUCH",
            LogicalOperation::Write => "WRITE",
            LogicalOperation::Merge => "MERGE",
            LogicalOperation::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// The concrete outcome of applying a staging node.
///
/// A MERGE onto an absent node resolves to `Write`, a NONE always resolves
/// to `Unmodified`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModificationType {
    /// The node was left as it was.
    Unmodified,
    /// The node was written.
    Write,
    /// The node was merged into an existing node.
    Merge,
    /// The node was deleted.
    Delete,
    /// Only descendants of the node changed.
    SubtreeModified,
}

impl TryFrom<u8> for ModificationType {
    type Error = DataTreeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ModificationType::Unmodified),
            1 => Ok(ModificationType::Write),
            2 => Ok(ModificationType::Merge),
            3 => Ok(ModificationType::Delete),
            4 => Ok(ModificationType::SubtreeModified),
            other => Err(DataTreeError::unsupported(format!(
                "modification type {other} is not supported"
            ))),
        }
    }
}

impl From<ModificationType> for u8 {
    fn from(t: ModificationType) -> Self {
        match t {
            ModificationType::Unmodified => 0,
            ModificationType::Write => 1,
            ModificationType::Merge => 2,
            ModificationType::Delete => 3,
            ModificationType::SubtreeModified => 4,
        }
    }
}

/// How a node tracks its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChildPolicy {
    /// Order carries no meaning; removals may reorder survivors.
    Unordered,
    /// Insertion order is preserved, including across removals.
    Ordered,
}
