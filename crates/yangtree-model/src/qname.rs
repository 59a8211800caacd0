//! Qualified names for schema and data nodes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A namespace-qualified node name.
///
/// Two names are equal only if both the namespace and the local name match.
/// The namespace is reference counted, so deriving sibling names from a
/// module's base name does not copy the namespace string.
///
/// # Examples
///
/// ```
/// use yangtree_model::QName;
///
/// let test = QName::new("urn:example:test", "test");
/// let list = test.sibling("outer-list");
/// assert_eq!(list.namespace(), "urn:example:test");
/// assert_eq!(list.to_string(), "(urn:example:test)outer-list");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QName {
    namespace: Arc<str>,
    local_name: String,
}

impl QName {
    /// Create a name from a namespace and a local name.
    #[inline]
    pub fn new(namespace: impl AsRef<str>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Arc::from(namespace.as_ref()),
            local_name: local_name.into(),
        }
    }

    /// Create a name in the same namespace as `self`.
    #[inline]
    pub fn sibling(&self, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Arc::clone(&self.namespace),
            local_name: local_name.into(),
        }
    }

    /// The namespace URI.
    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The local part of the name.
    #[inline]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.namespace, self.local_name)
    }
}
