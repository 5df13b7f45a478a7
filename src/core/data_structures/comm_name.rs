/*!
 * Command Name
 * Bounded, allocation-free process command names
 */

use crate::core::limits::COMM_CAPACITY;
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;

/// Process command name, at most [`COMM_CAPACITY`] bytes
///
/// Longer input is truncated silently on a UTF-8 character boundary, the
/// same way the kernel truncates `task_struct::comm`. The bound is below the
/// smartstring inline threshold, so names never touch the heap.
///
/// # Examples
///
/// ```
/// use process_monitor::core::data_structures::CommName;
///
/// let name = CommName::new("systemd-journald-extra");
/// assert_eq!(name.as_str(), "systemd-journal");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[repr(transparent)]
pub struct CommName {
    inner: SmartString,
}

impl CommName {
    /// Create from any string slice, truncating to capacity
    #[inline]
    pub fn new(name: &str) -> Self {
        Self {
            inner: SmartString::from(truncate(name)),
        }
    }

    /// Get string slice
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    /// Get length in bytes
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Check if stored inline (always true for bounded names)
    #[inline]
    pub fn is_inline(&self) -> bool {
        self.inner.is_inline()
    }
}

/// Longest prefix of `name` that fits and ends on a char boundary
fn truncate(name: &str) -> &str {
    if name.len() <= COMM_CAPACITY {
        return name;
    }
    let mut end = COMM_CAPACITY;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

impl From<&str> for CommName {
    #[inline]
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CommName {
    #[inline]
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<CommName> for String {
    #[inline]
    fn from(s: CommName) -> Self {
        s.inner.into()
    }
}

impl AsRef<str> for CommName {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::ops::Deref for CommName {
    type Target = str;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for CommName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl PartialEq<str> for CommName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for CommName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
