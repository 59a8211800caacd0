//! Instance paths for navigating the data tree.
//!
//! Paths are sequences of arguments that describe a location in the tree.
//! Each argument addresses one child of the node reached so far.

use crate::{QName, Scalar};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Key predicates identifying one entry of a keyed list.
///
/// Predicates are kept sorted by key name, so two identifiers built from the
/// same keys in a different order compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryKeys(Vec<(QName, Scalar)>);

impl EntryKeys {
    /// Build key predicates. Later duplicates of a key name replace earlier ones.
    pub fn new(keys: impl IntoIterator<Item = (QName, Scalar)>) -> Self {
        let mut keys: Vec<(QName, Scalar)> = keys.into_iter().collect();
        keys.reverse();
        keys.sort_by(|a, b| a.0.cmp(&b.0));
        keys.dedup_by(|a, b| a.0 == b.0);
        Self(keys)
    }

    /// Look up the predicate value for a key leaf.
    #[inline]
    pub fn get(&self, key: &QName) -> Option<&Scalar> {
        self.0
            .binary_search_by(|(name, _)| name.cmp(key))
            .ok()
            .map(|idx| &self.0[idx].1)
    }

    /// Iterate over `(key, value)` pairs in key order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&QName, &Scalar)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Number of key predicates.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no predicates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single argument in an instance path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathArg {
    /// Container, leaf, list, leaf-list or choice addressed by name.
    Node(QName),
    /// One entry of a keyed list.
    Entry {
        /// The list name.
        name: QName,
        /// Key predicates.
        keys: EntryKeys,
    },
    /// One entry of a leaf-list, addressed by its value.
    Value {
        /// The leaf-list name.
        name: QName,
        /// The entry value.
        value: Scalar,
    },
    /// An augmentation, addressed by the names of the children it may carry.
    Augmentation(BTreeSet<QName>),
}

impl PathArg {
    /// Create a node argument.
    #[inline]
    pub fn node(name: QName) -> Self {
        PathArg::Node(name)
    }

    /// Create a list entry argument.
    #[inline]
    pub fn entry(name: QName, keys: impl IntoIterator<Item = (QName, Scalar)>) -> Self {
        PathArg::Entry {
            name,
            keys: EntryKeys::new(keys),
        }
    }

    /// Create a leaf-list entry argument.
    #[inline]
    pub fn value(name: QName, value: impl Into<Scalar>) -> Self {
        PathArg::Value {
            name,
            value: value.into(),
        }
    }

    /// Create an augmentation argument.
    #[inline]
    pub fn augmentation(children: impl IntoIterator<Item = QName>) -> Self {
        PathArg::Augmentation(children.into_iter().collect())
    }

    /// The schema node name this argument refers to.
    ///
    /// Augmentations have no name of their own and return `None`.
    #[inline]
    pub fn node_type(&self) -> Option<&QName> {
        match self {
            PathArg::Node(name) | PathArg::Entry { name, .. } | PathArg::Value { name, .. } => {
                Some(name)
            }
            PathArg::Augmentation(_) => None,
        }
    }

    /// Returns true if this is an augmentation argument.
    #[inline]
    pub fn is_augmentation(&self) -> bool {
        matches!(self, PathArg::Augmentation(_))
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathArg::Node(name) => write!(f, "{}", name.local_name()),
            PathArg::Entry { name, keys } => {
                write!(f, "{}", name.local_name())?;
                for (k, v) in keys.iter() {
                    write!(f, "[{}={}]", k.local_name(), v)?;
                }
                Ok(())
            }
            PathArg::Value { name, value } => write!(f, "{}[.={}]", name.local_name(), value),
            PathArg::Augmentation(children) => {
                write!(f, "augmentation{{")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", child.local_name())?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<QName> for PathArg {
    fn from(name: QName) -> Self {
        PathArg::Node(name)
    }
}

impl From<&QName> for PathArg {
    fn from(name: &QName) -> Self {
        PathArg::Node(name.clone())
    }
}

/// A complete path into the data tree.
///
/// Paths are immutable sequences of arguments. Use builder methods to
/// construct paths incrementally.
///
/// # Examples
///
/// ```
/// use yangtree_model::{InstancePath, QName};
///
/// let test = QName::new("urn:example", "test");
/// let list = test.sibling("outer-list");
/// let id = test.sibling("id");
///
/// let path = InstancePath::root()
///     .node(test)
///     .node(list.clone())
///     .entry(list, [(id, 1.into())]);
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "/test/outer-list/outer-list[id=1]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstancePath(Vec<PathArg>);

impl InstancePath {
    /// Create an empty path (root).
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create an empty path (alias for `new`).
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Create a path from a vector of arguments.
    #[inline]
    pub fn from_args(args: Vec<PathArg>) -> Self {
        Self(args)
    }

    /// Append a node argument and return self (builder pattern).
    #[inline]
    pub fn node(mut self, name: QName) -> Self {
        self.0.push(PathArg::Node(name));
        self
    }

    /// Append a list entry argument and return self (builder pattern).
    #[inline]
    pub fn entry(mut self, name: QName, keys: impl IntoIterator<Item = (QName, Scalar)>) -> Self {
        self.0.push(PathArg::entry(name, keys));
        self
    }

    /// Append a leaf-list entry argument and return self (builder pattern).
    #[inline]
    pub fn value(mut self, name: QName, value: impl Into<Scalar>) -> Self {
        self.0.push(PathArg::value(name, value));
        self
    }

    /// Append an augmentation argument and return self (builder pattern).
    #[inline]
    pub fn augmentation(mut self, children: impl IntoIterator<Item = QName>) -> Self {
        self.0.push(PathArg::augmentation(children));
        self
    }

    /// Push an argument onto the path (mutating).
    #[inline]
    pub fn push(&mut self, arg: PathArg) {
        self.0.push(arg);
    }

    /// Pop the last argument from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<PathArg> {
        self.0.pop()
    }

    /// Get the arguments of this path.
    #[inline]
    pub fn args(&self) -> &[PathArg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of arguments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the first argument.
    #[inline]
    pub fn first(&self) -> Option<&PathArg> {
        self.0.first()
    }

    /// Get the last argument.
    #[inline]
    pub fn last(&self) -> Option<&PathArg> {
        self.0.last()
    }

    /// Join this path with another path.
    #[inline]
    pub fn join(&self, other: &InstancePath) -> InstancePath {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    /// Append an argument and return a new path (non-mutating builder).
    #[inline]
    pub fn with_arg(&self, arg: PathArg) -> InstancePath {
        let mut result = self.clone();
        result.0.push(arg);
        result
    }

    /// Check if this path is a prefix of another path.
    ///
    /// A path is a prefix of itself.
    #[inline]
    pub fn is_prefix_of(&self, other: &InstancePath) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Get the parent path (path without the last argument).
    #[inline]
    pub fn parent(&self) -> Option<InstancePath> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// Get the arguments following `prefix`, or `None` if `prefix` does not
    /// start this path.
    #[inline]
    pub fn relative_to(&self, prefix: &InstancePath) -> Option<&[PathArg]> {
        self.0.strip_prefix(prefix.0.as_slice())
    }

    /// Get a path made of the first `len` arguments.
    #[inline]
    pub fn truncated(&self, len: usize) -> InstancePath {
        InstancePath(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Iterate over the arguments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &PathArg> {
        self.0.iter()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for arg in &self.0 {
            write!(f, "/{}", arg)?;
        }
        Ok(())
    }
}

impl FromIterator<PathArg> for InstancePath {
    fn from_iter<I: IntoIterator<Item = PathArg>>(iter: I) -> Self {
        InstancePath(iter.into_iter().collect())
    }
}

impl IntoIterator for InstancePath {
    type Item = PathArg;
    type IntoIter = std::vec::IntoIter<PathArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a InstancePath {
    type Item = &'a PathArg;
    type IntoIter = std::slice::Iter<'a, PathArg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for InstancePath {
    type Output = PathArg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct an `InstancePath` from a sequence of arguments.
///
/// Each argument is anything convertible into a [`PathArg`]; a bare
/// [`QName`] becomes a node argument.
///
/// # Examples
///
/// ```
/// use yangtree_model::{path, PathArg, QName};
///
/// let test = QName::new("urn:example", "test");
/// let name = test.sibling("name");
///
/// let p = path!(test.clone(), name);
/// assert_eq!(p.len(), 2);
///
/// let list = test.sibling("outer-list");
/// let id = test.sibling("id");
/// let p = path!(test, list.clone(), PathArg::entry(list, [(id, 1.into())]));
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::InstancePath::root()
    };
    ($($arg:expr),+ $(,)?) => {{
        let mut p = $crate::InstancePath::root();
        $(
            p.push($crate::PathArg::from($arg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(name: &str) -> QName {
        QName::new("urn:t", name)
    }

    #[test]
    fn test_path_construction() {
        let path = InstancePath::root()
            .node(q("a"))
            .entry(q("l"), [(q("k"), Scalar::from(1))])
            .value(q("ll"), "x");
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], PathArg::Node(q("a")));
        assert!(matches!(path[1], PathArg::Entry { .. }));
        assert_eq!(path[2], PathArg::value(q("ll"), "x"));
    }

    #[test]
    fn test_path_display() {
        let path = InstancePath::root()
            .node(q("test"))
            .entry(q("l"), [(q("id"), Scalar::from(7))])
            .augmentation([q("b"), q("a")]);
        assert_eq!(path.to_string(), "/test/l[id=7]/augmentation{a,b}");
        assert_eq!(InstancePath::root().to_string(), "/");
    }

    #[test]
    fn test_entry_keys_order_insensitive() {
        let a = PathArg::entry(q("l"), [(q("x"), 1.into()), (q("y"), 2.into())]);
        let b = PathArg::entry(q("l"), [(q("y"), 2.into()), (q("x"), 1.into())]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_entry_keys_last_duplicate_wins() {
        let keys = EntryKeys::new([(q("x"), 1.into()), (q("x"), 2.into())]);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.get(&q("x")), Some(&Scalar::Int(2)));
    }

    #[test]
    fn test_path_macro() {
        let p = path!(q("a"), q("b"));
        assert_eq!(p.len(), 2);
        assert_eq!(p[1], PathArg::Node(q("b")));
        assert!(path!().is_empty());
    }

    #[test]
    fn test_prefix_and_relative() {
        let parent = path!(q("a"));
        let child = path!(q("a"), q("b"));
        assert!(parent.is_prefix_of(&child));
        assert!(!child.is_prefix_of(&parent));
        assert!(parent.is_prefix_of(&parent));
        assert_eq!(child.relative_to(&parent), Some(&child.args()[1..]));
        assert_eq!(child.parent().unwrap(), parent);
        assert_eq!(child.truncated(1), parent);
    }

    #[test]
    fn test_node_type() {
        assert_eq!(PathArg::Node(q("a")).node_type(), Some(&q("a")));
        assert_eq!(PathArg::augmentation([q("a")]).node_type(), None);
    }

    #[test]
    fn test_path_serde() {
        let path = InstancePath::root()
            .node(q("a"))
            .entry(q("l"), [(q("k"), Scalar::from("v"))]);
        let json = serde_json::to_string(&path).unwrap();
        let parsed: InstancePath = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);
    }
}
