/*! The KMP search engine.

The engine has two paths that always agree on results:

- A SIMD path for contiguous text at or above the dispatch threshold: the
  next candidate start is located with the width-dispatched first-byte
  scan, the remainder of the pattern is verified with the vector prefix
  comparison, and a failed verification of length `k` advances the cursor
  by `k - failure[k - 1]` positions (at least one).
- A scalar reference path: the classical single-byte loop with
  failure-driven fallback.

The SIMD scan only repositions the cursor to guaranteed candidates (first
byte equal), so the failure-based skip amortizes verification work exactly
as in scalar KMP and the O(n + m) bound is preserved.
*/

use std::borrow::Cow;

use crate::simd;
use crate::simd::Kernels;

/// Offset of the first occurrence of `pattern` in `text`.
///
/// The empty pattern matches at offset 0 of any text.
pub(crate) fn find(text: &[u8], pattern: &[u8], failure: &[usize]) -> Option<usize> {
    let n = text.len();
    let m = pattern.len();

    if m == 0 {
        return Some(0);
    }
    if n < m {
        return None;
    }

    match simd::kernels_for(n) {
        Some(kernels) => unsafe { find_simd(text, pattern, failure, kernels) },
        None => find_scalar(text, pattern, failure),
    }
}

/// SIMD candidate loop: first-byte scan, vector verification, failure
/// skip. Caller guarantees `0 < m <= n` and that `kernels` matches the
/// running CPU.
unsafe fn find_simd(
    text: &[u8],
    pattern: &[u8],
    failure: &[usize],
    kernels: Kernels,
) -> Option<usize> {
    let m = pattern.len();
    let first = pattern[0];

    // Last feasible match start, exclusive.
    let limit = text.len() - m + 1;

    let mut pos = 0;
    while pos < limit {
        let candidate = match (kernels.find_first_eq)(&text[pos..limit], first) {
            Some(offset) => pos + offset,
            None => return None,
        };

        let verified = (kernels.prefix_eq_len)(&text[candidate..candidate + m], pattern);
        if verified == m {
            return Some(candidate);
        }

        // verified >= 1 here (the candidate's first byte matched), and
        // failure[verified - 1] < verified, so the skip is at least 1.
        let skip = if verified > 0 { verified - failure[verified - 1] } else { 1 };
        pos = candidate + skip;
    }

    None
}

/// Classical scalar KMP. Reference implementation for the SIMD path and
/// the fallback for short inputs.
pub(crate) fn find_scalar(text: &[u8], pattern: &[u8], failure: &[usize]) -> Option<usize> {
    let m = pattern.len();
    if m == 0 {
        return Some(0);
    }

    let mut j = 0;
    for (i, &byte) in text.iter().enumerate() {
        while j > 0 && byte != pattern[j] {
            j = failure[j - 1];
        }
        if byte == pattern[j] {
            j += 1;
        }
        if j == m {
            return Some(i + 1 - m);
        }
    }

    None
}

/// Lazy iterator over all (possibly overlapping) match offsets, in
/// strictly increasing order.
///
/// Returned by [`search_all`](crate::search_all) and
/// [`Pattern::find_iter`](crate::Pattern::find_iter). The empty pattern
/// yields no offsets.
pub struct Matches<'t, 'p> {
    text: &'t [u8],
    pattern: &'p [u8],
    failure: Cow<'p, [usize]>,
    pos: usize,
}

impl<'t, 'p> Matches<'t, 'p> {
    pub(crate) fn new(
        text: &'t [u8],
        pattern: &'p [u8],
        failure: Cow<'p, [usize]>,
    ) -> Matches<'t, 'p> {
        Matches { text, pattern, failure, pos: 0 }
    }
}

impl<'t, 'p> Iterator for Matches<'t, 'p> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let m = self.pattern.len();
        if m == 0 || self.text.len() < m {
            return None;
        }

        let limit = self.text.len() - m + 1;
        if self.pos >= limit {
            return None;
        }

        match find(&self.text[self.pos..], self.pattern, &self.failure) {
            Some(offset) => {
                let matched = self.pos + offset;
                // Restart one byte after the match so overlapping
                // occurrences are reported too.
                self.pos = matched + 1;
                Some(matched)
            }
            None => {
                self.pos = limit;
                None
            }
        }
    }
}

impl std::iter::FusedIterator for Matches<'_, '_> {}
