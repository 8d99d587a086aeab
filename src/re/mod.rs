/*! Linear-time regular expression matching.

A regexp source is compiled in three stages: a recursive-descent parse
into Thompson NFA fragments, subset construction of a DFA from the NFA,
and matching by stepping the DFA over the input bytes. Matching never backtracks, so both [`Regexp::matches`] and
[`Regexp::search`] run in time linear in the input.

Supported syntax: literals, `.` (any byte except `\n`), `*`, `+`, `?`,
`[...]` and `[^...]` with ranges, `\d \w \s` and their complements,
grouping `(...)`, alternation `|`, and `\<byte>` literal escapes. The
anchors `^` and `$` are accepted but match the empty string instead of
constraining the position. Backreferences, lookaround, counted and
non-greedy quantifiers are not supported.

The alphabet is the 128-code-point ASCII range. An input byte >= 128 is
not matched by any class, including negated ones and `.`; it simply fails
the current matching attempt.
*/

use std::sync::Arc;

use thiserror::Error;

mod dfa;
mod nfa;
mod parser;


use dfa::Dfa;

/// Hard cap on the number of DFA states a single regexp may compile to.
/// Prevents pathological state blowup during subset construction.
pub const MAX_DFA_STATES: usize = 10_000;

/// Errors returned when compiling a regexp.
///
/// Matching itself never fails; a byte that cannot extend a match simply
/// ends the current attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The regexp source is malformed.
    #[error("invalid regexp `{pattern}`: {msg}")]
    Invalid {
        /// The offending regexp source.
        pattern: String,
        /// What the parser could not accept.
        msg: String,
    },

    /// Compiling the regexp would exceed [`MAX_DFA_STATES`].
    #[error("regexp `{pattern}` is too complex: more than {} DFA states", MAX_DFA_STATES)]
    TooComplex {
        /// The offending regexp source.
        pattern: String,
    },
}

/// A compiled regular expression.
///
/// Holds a shared handle to the compiled DFA; cloning is cheap and clones
/// step through the same read-only tables. Any number of threads may
/// match concurrently without synchronization.
///
/// # Example
///
/// ```rust
/// let re = bytescan::Regexp::new("[a-z]+@[a-z]+\\.[a-z]+").unwrap();
///
/// assert!(re.matches(b"user@example.com"));
/// assert!(!re.matches(b"invalid"));
/// ```
#[derive(Debug, Clone)]
pub struct Regexp {
    source: String,
    dfa: Arc<Dfa>,
}

impl Regexp {
    /// Compiles `source` into a DFA.
    ///
    /// Returns [`Error::Invalid`] for malformed sources and
    /// [`Error::TooComplex`] when the DFA would exceed
    /// [`MAX_DFA_STATES`]; no partial automaton is ever exposed.
    pub fn new(source: &str) -> Result<Regexp, Error> {
        let nfa = parser::parse(source)?;
        let dfa = Dfa::from_nfa(&nfa, source)?;
        Ok(Regexp { source: source.to_string(), dfa: Arc::new(dfa) })
    }

    /// True if the regexp matches the *entire* input.
    pub fn matches(&self, text: &[u8]) -> bool {
        self.dfa.matches(text)
    }

    /// Offset of the leftmost occurrence of the regexp in `text`, or
    /// `None`.
    ///
    /// Ties at the same start offset resolve to the first accepting
    /// state reached, i.e. the shortest accepting prefix.
    pub fn search(&self, text: &[u8]) -> Option<usize> {
        self.dfa.search(text)
    }

    /// Number of DFA states; a diagnostic for pattern complexity.
    pub fn state_count(&self) -> usize {
        self.dfa.state_count()
    }

    /// True if the DFA has no states, i.e. construction never completed.
    pub fn is_empty(&self) -> bool {
        self.dfa.state_count() == 0
    }

    /// The regexp source this value was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Compiles `source` into a [`Regexp`].
pub fn compile_regex(source: &str) -> Result<Regexp, Error> {
    Regexp::new(source)
}
