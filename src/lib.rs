/*! A SIMD-accelerated text-matching library with two cooperating cores.

The *literal core* finds occurrences of a fixed byte string in guaranteed
linear time using the Knuth-Morris-Pratt algorithm. Candidate positions
are located with a wide first-byte scan dispatched at runtime to SSE4.2,
AVX2 or AVX-512 kernels; a precomputed failure function keeps the
verification work linear regardless of how candidates were found.

The *regex core* compiles a restricted regular-expression grammar into a
deterministic finite automaton via Thompson's construction and subset
construction. Matching steps the DFA once over the input, so it is
linear-time and never backtracks.

# Example

```rust
// One-shot literal search.
assert_eq!(bytescan::search_pos(b"abracadabra", b"abra"), Some(0));
assert_eq!(bytescan::search_all(b"aaaa", b"aa").collect::<Vec<_>>(), vec![0, 1, 2]);

// A compiled pattern amortizes the failure table across searches.
let pattern = bytescan::compile_literal(b"the");
assert_eq!(pattern.count(b"the cat the dog the bird"), 3);

// Linear-time regex matching.
let re = bytescan::compile_regex("[0-9]+").unwrap();
assert!(re.matches(b"42"));
assert_eq!(re.search(b"There are 42 apples"), Some(10));
```

All compiled objects are immutable after construction and can be shared
freely across threads. The literal engine operates on raw bytes with no
encoding contract; the regex alphabet is the 128-code-point ASCII range,
and input bytes outside it simply fail the current matching attempt.
*/

#![deny(missing_docs)]

pub use literal::{
    compile_literal, contains, count, search, search_all, search_all_collected, search_pos,
    ConstPattern, Matches, Pattern,
};
pub use re::{compile_regex, Error, Regexp, MAX_DFA_STATES};
pub use simd::{features, simd_level, CpuFeatures, SimdLevel};

mod literal;
mod re;
mod simd;

#[cfg(test)]
mod tests;
