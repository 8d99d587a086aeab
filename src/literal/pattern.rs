/*! Compiled literal patterns.

[`Pattern`] owns its bytes and failure table, computed once at
construction, so the same pattern can be searched against many texts
without re-deriving the table. [`ConstPattern`] is the build-time flavor:
its failure table is computed by a `const fn` and can live in constant
storage.
*/

use std::borrow::Cow;
use std::fmt;

use bstr::BStr;

use super::failure::{const_failure_table, failure_table};
use super::engine::{self, Matches};

/// A literal pattern compiled for repeated searches.
///
/// Immutable after construction and safe to share across threads; an
/// arbitrary number of concurrent searches may run against the same
/// pattern.
///
/// # Example
///
/// ```rust
/// let pattern = bytescan::Pattern::new("abra");
///
/// assert_eq!(pattern.find(b"abracadabra"), Some(0));
/// assert_eq!(pattern.find_iter(b"abracadabra").collect::<Vec<_>>(), vec![0, 7]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    pattern: Vec<u8>,
    failure: Vec<usize>,
}

impl Pattern {
    /// Compiles `pattern`, copying its bytes and computing the failure
    /// table.
    pub fn new(pattern: impl Into<Vec<u8>>) -> Pattern {
        let pattern = pattern.into();
        let failure = failure_table(&pattern);
        Pattern { pattern, failure }
    }

    /// Offset of the first occurrence of this pattern in `text`.
    ///
    /// The empty pattern matches at offset 0.
    pub fn find(&self, text: &[u8]) -> Option<usize> {
        engine::find(text, &self.pattern, &self.failure)
    }

    /// Iterator over all (possibly overlapping) match offsets in `text`,
    /// ascending.
    pub fn find_iter<'t, 'p>(&'p self, text: &'t [u8]) -> Matches<'t, 'p> {
        Matches::new(text, &self.pattern, Cow::Borrowed(&self.failure))
    }

    /// Number of (possibly overlapping) occurrences in `text`. Zero for
    /// the empty pattern.
    pub fn count(&self, text: &[u8]) -> usize {
        self.find_iter(text).count()
    }

    /// True if this pattern occurs in `text`.
    pub fn contains(&self, text: &[u8]) -> bool {
        self.find(text).is_some()
    }

    /// The pattern bytes.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// The precomputed failure table, one entry per pattern byte.
    pub fn failure(&self) -> &[usize] {
        &self.failure
    }

    /// Pattern length in bytes.
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    /// True for the empty pattern.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("pattern", &BStr::new(&self.pattern))
            .field("failure", &self.failure)
            .finish()
    }
}

impl From<&[u8]> for Pattern {
    fn from(pattern: &[u8]) -> Pattern {
        Pattern::new(pattern)
    }
}

impl From<Vec<u8>> for Pattern {
    fn from(pattern: Vec<u8>) -> Pattern {
        Pattern::new(pattern)
    }
}

impl From<&str> for Pattern {
    fn from(pattern: &str) -> Pattern {
        Pattern::new(pattern.as_bytes())
    }
}

/// A literal pattern whose failure table is computed at compile time.
///
/// ```rust
/// use bytescan::ConstPattern;
///
/// const NEEDLE: ConstPattern<6> = ConstPattern::new(b"needle");
///
/// assert_eq!(NEEDLE.find(b"finding a needle"), Some(10));
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ConstPattern<const N: usize> {
    pattern: [u8; N],
    failure: [usize; N],
}

impl<const N: usize> ConstPattern<N> {
    /// Compiles `pattern` in a const context.
    pub const fn new(pattern: &[u8; N]) -> ConstPattern<N> {
        ConstPattern { pattern: *pattern, failure: const_failure_table(pattern) }
    }

    /// Offset of the first occurrence of this pattern in `text`.
    pub fn find(&self, text: &[u8]) -> Option<usize> {
        engine::find(text, &self.pattern, &self.failure)
    }

    /// Iterator over all (possibly overlapping) match offsets in `text`,
    /// ascending.
    pub fn find_iter<'t, 'p>(&'p self, text: &'t [u8]) -> Matches<'t, 'p> {
        Matches::new(text, &self.pattern, Cow::Borrowed(&self.failure))
    }

    /// Number of (possibly overlapping) occurrences in `text`.
    pub fn count(&self, text: &[u8]) -> usize {
        self.find_iter(text).count()
    }

    /// True if this pattern occurs in `text`.
    pub fn contains(&self, text: &[u8]) -> bool {
        self.find(text).is_some()
    }

    /// The pattern bytes.
    pub const fn pattern(&self) -> &[u8; N] {
        &self.pattern
    }

    /// The failure table computed at compile time.
    pub const fn failure(&self) -> &[usize; N] {
        &self.failure
    }

    /// Pattern length in bytes.
    pub const fn len(&self) -> usize {
        N
    }

    /// True for the empty pattern.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> fmt::Debug for ConstPattern<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstPattern")
            .field("pattern", &BStr::new(&self.pattern))
            .field("failure", &&self.failure[..])
            .finish()
    }
}
