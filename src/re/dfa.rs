/*! Subset construction and the DFA matcher.

The NFA produced by the parser is turned into a DFA by the classical
subset construction: each DFA state corresponds to an epsilon-closed set
of NFA states, canonically keyed by the sorted vector of their indices.
Construction is deterministic, so compiling the same source twice yields
byte-identical transition tables.

A transition that would lead nowhere holds [`DEAD`], the implicit
non-matching sink. Input bytes outside the ASCII range have no transition
row at all and likewise kill the current attempt.
*/

use itertools::Itertools;
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::nfa::{Nfa, State, ASCII_SIZE, NO_TRANSITION};
use super::{Error, MAX_DFA_STATES};

/// Sentinel transition target: the dead state.
pub(crate) const DEAD: u32 = u32::MAX;

/// An epsilon-closed set of NFA states, kept sorted for canonical keying.
type StateSet = SmallVec<[u32; 8]>;

/// One DFA state: a transition target per ASCII byte, plus the accept
/// flag.
pub(crate) struct DfaState {
    pub(crate) transitions: [u32; ASCII_SIZE],
    pub(crate) is_accept: bool,
}

impl DfaState {
    fn new() -> DfaState {
        DfaState { transitions: [DEAD; ASCII_SIZE], is_accept: false }
    }
}

/// A compiled DFA. State 0 is the start state.
///
/// Read-only after construction; stepping through the table requires no
/// synchronization, so any number of threads can match concurrently.
pub(crate) struct Dfa {
    states: Vec<DfaState>,
}

impl std::fmt::Debug for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dfa").field("states", &self.states.len()).finish()
    }
}

impl Dfa {
    /// Runs the subset construction over `nfa`.
    ///
    /// Fails with [`Error::TooComplex`] the moment the construction would
    /// exceed [`MAX_DFA_STATES`], before the offending state is added.
    pub(crate) fn from_nfa(nfa: &Nfa, source: &str) -> Result<Dfa, Error> {
        let mut states = Vec::new();
        let mut state_index: FxHashMap<StateSet, u32> = FxHashMap::default();
        let mut worklist: Vec<StateSet> = Vec::new();

        let mut start_set: StateSet = SmallVec::new();
        start_set.push(nfa.start);
        epsilon_closure(nfa, &mut start_set);
        let start_set = canonical(start_set);

        states.push(accepting_state(nfa, &start_set));
        state_index.insert(start_set.clone(), 0);
        worklist.push(start_set);

        let mut processed = 0;
        while processed < worklist.len() {
            let current = worklist[processed].clone();
            let current_index = state_index[&current];
            processed += 1;

            for byte in 0..ASCII_SIZE as u8 {
                // Image of the subset under `byte`: successors of every
                // matching state, then epsilon-closed.
                let mut next_set: StateSet = SmallVec::new();
                for &s in &current {
                    let next = match &nfa.states[s as usize] {
                        State::Byte { byte: b, next } if *b == byte => *next,
                        State::Class { class, next } if class.contains(byte) => *next,
                        _ => continue,
                    };
                    if next != NO_TRANSITION {
                        next_set.push(next);
                    }
                }

                if next_set.is_empty() {
                    continue; // transition stays DEAD
                }

                epsilon_closure(nfa, &mut next_set);
                let next_set = canonical(next_set);

                let next_index = match state_index.get(&next_set) {
                    Some(&index) => index,
                    None => {
                        if states.len() >= MAX_DFA_STATES {
                            return Err(Error::TooComplex { pattern: source.to_string() });
                        }
                        let index = states.len() as u32;
                        states.push(accepting_state(nfa, &next_set));
                        state_index.insert(next_set.clone(), index);
                        worklist.push(next_set);
                        index
                    }
                };

                states[current_index as usize].transitions[byte as usize] = next_index;
            }
        }

        debug!(
            "compiled regexp `{}`: {} NFA states, {} DFA states",
            source,
            nfa.states.len(),
            states.len()
        );

        Ok(Dfa { states })
    }

    /// Anchored whole-input match: every byte must be consumed and the
    /// final state must accept.
    pub(crate) fn matches(&self, text: &[u8]) -> bool {
        if self.states.is_empty() {
            return false;
        }

        let mut state = 0_u32;
        for &byte in text {
            if byte as usize >= ASCII_SIZE {
                return false;
            }
            let next = self.states[state as usize].transitions[byte as usize];
            if next == DEAD {
                return false;
            }
            state = next;
        }

        self.states[state as usize].is_accept
    }

    /// Leftmost occurrence: the smallest start offset from which an
    /// accepting state is reachable.
    ///
    /// When the start state itself accepts (empty regexp), the current
    /// offset is returned before any byte is consumed.
    pub(crate) fn search(&self, text: &[u8]) -> Option<usize> {
        if self.states.is_empty() {
            return None;
        }

        for start in 0..text.len() {
            if self.states[0].is_accept {
                return Some(start);
            }

            let mut state = 0_u32;
            for &byte in &text[start..] {
                if byte as usize >= ASCII_SIZE {
                    break;
                }
                let next = self.states[state as usize].transitions[byte as usize];
                if next == DEAD {
                    break;
                }
                state = next;
                if self.states[state as usize].is_accept {
                    return Some(start);
                }
            }
        }

        None
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    #[cfg(test)]
    pub(crate) fn transition_row(&self, state: usize) -> &[u32; ASCII_SIZE] {
        &self.states[state].transitions
    }

    #[cfg(test)]
    pub(crate) fn is_accept(&self, state: usize) -> bool {
        self.states[state].is_accept
    }
}

/// Extends `set` with everything reachable over epsilon transitions.
/// Idempotent; the set only grows.
fn epsilon_closure(nfa: &Nfa, set: &mut StateSet) {
    let mut seen: FxHashSet<u32> = set.iter().copied().collect();
    let mut stack: SmallVec<[u32; 16]> = set.iter().copied().collect();

    while let Some(s) = stack.pop() {
        if let State::Epsilon { next1, next2 } = nfa.states[s as usize] {
            for target in [next1, next2] {
                if target != NO_TRANSITION && seen.insert(target) {
                    set.push(target);
                    stack.push(target);
                }
            }
        }
    }
}

/// Canonical key for a subset: sorted, deduplicated state indices.
fn canonical(set: StateSet) -> StateSet {
    set.into_iter().sorted_unstable().dedup().collect()
}

fn accepting_state(nfa: &Nfa, set: &StateSet) -> DfaState {
    let mut state = DfaState::new();
    state.is_accept = set.iter().any(|&s| matches!(nfa.states[s as usize], State::Accept));
    state
}
