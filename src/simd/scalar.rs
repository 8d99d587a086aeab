/*! Scalar reference kernels.

These are the ground truth for the vector kernels: every SIMD width must
return exactly what these functions return. They also serve as the runtime
fallback on non-x86 targets and for inputs below the SIMD threshold.
*/

/// Position of the first byte in `haystack` equal to `needle`.
#[allow(dead_code)]
pub(crate) fn find_first_eq(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

/// Length of the maximal common prefix of `a` and `b`, bounded by the
/// shorter of the two.
#[allow(dead_code)]
pub(crate) fn prefix_eq_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}
