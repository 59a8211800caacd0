//! Version tokens for optimistic concurrency control.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// An opaque, totally ordered token marking when a node last changed.
///
/// Versions are only compared for equality or ordering. They are not
/// timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version(u64);

impl Version {
    /// The version of an empty, never modified tree.
    #[inline]
    pub const fn initial() -> Self {
        Version(0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Allocates strictly increasing versions for one data tree.
///
/// Shared by every snapshot and modification derived from the same tree, so
/// chained modifications never reuse a version.
#[derive(Debug)]
pub struct VersionAllocator {
    last: AtomicU64,
}

impl VersionAllocator {
    /// Create an allocator whose first allocation follows [`Version::initial`].
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(Version::initial().0),
        }
    }

    /// Allocate a version greater than every previously allocated one.
    #[inline]
    pub fn next(&self) -> Version {
        Version(self.last.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// The most recently allocated version.
    #[inline]
    pub fn last(&self) -> Version {
        Version(self.last.load(Ordering::Acquire))
    }
}

impl Default for VersionAllocator {
    fn default() -> Self {
        Self::new()
    }
}
