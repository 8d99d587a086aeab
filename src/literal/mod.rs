/*! Literal (fixed byte string) search.

The free functions in this module compute the failure table on every call
and are convenient for one-shot searches. For repeated searches with the
same pattern, compile it once with [`compile_literal`] (or
[`Pattern::new`]) and use the methods on the handle; both forms funnel
into the same engine and return identical results.

All offsets are byte offsets from the start of the text. Matching is byte
equality; no encoding is assumed.
*/

use std::borrow::Cow;

mod engine;
mod failure;
mod pattern;


pub use engine::Matches;
pub use pattern::{ConstPattern, Pattern};

/// Returns the matched region of `text` for the first occurrence of
/// `pattern`, or `None` if there is none.
///
/// The empty pattern matches the empty region at the start of any text.
pub fn search<'t>(text: &'t [u8], pattern: &[u8]) -> Option<&'t [u8]> {
    search_pos(text, pattern).map(|pos| &text[pos..pos + pattern.len()])
}

/// Offset of the first occurrence of `pattern` in `text`.
///
/// The empty pattern matches at offset 0 of any text, including the empty
/// one.
///
/// # Example
///
/// ```rust
/// assert_eq!(bytescan::search_pos(b"hello world", b"world"), Some(6));
/// assert_eq!(bytescan::search_pos(b"hello world", b"xyz"), None);
/// ```
pub fn search_pos(text: &[u8], pattern: &[u8]) -> Option<usize> {
    let failure = failure::failure_table(pattern);
    engine::find(text, pattern, &failure)
}

/// Lazy iterator over all occurrences of `pattern` in `text`.
///
/// Overlapping matches are reported and offsets are strictly increasing.
/// The empty pattern yields no offsets.
///
/// # Example
///
/// ```rust
/// let all: Vec<usize> = bytescan::search_all(b"aaaa", b"aa").collect();
/// assert_eq!(all, vec![0, 1, 2]);
/// ```
pub fn search_all<'t, 'p>(text: &'t [u8], pattern: &'p [u8]) -> Matches<'t, 'p> {
    let failure = failure::failure_table(pattern);
    Matches::new(text, pattern, Cow::Owned(failure))
}

/// Like [`search_all`] but collected into a vector.
pub fn search_all_collected(text: &[u8], pattern: &[u8]) -> Vec<usize> {
    search_all(text, pattern).collect()
}

/// Number of (possibly overlapping) occurrences of `pattern` in `text`.
///
/// By convention the empty pattern yields 0.
pub fn count(text: &[u8], pattern: &[u8]) -> usize {
    search_all(text, pattern).count()
}

/// True if `pattern` occurs in `text`. The empty pattern is contained in
/// every text.
pub fn contains(text: &[u8], pattern: &[u8]) -> bool {
    search_pos(text, pattern).is_some()
}

/// Compiles `pattern` into a reusable [`Pattern`] handle.
pub fn compile_literal(pattern: &[u8]) -> Pattern {
    Pattern::new(pattern)
}
