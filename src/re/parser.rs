/*! Recursive-descent regexp parser producing an NFA.

Grammar, parsed top-down:

```text
regex         := alternation
alternation   := concatenation ('|' concatenation)*
concatenation := quantified*
quantified    := atom ('*' | '+' | '?')?
atom          := '(' regex ')' | char_class | '.' | '\' esc | '^' | '$' | literal
char_class    := '[' '^'? class_item* ']'
class_item    := char ('-' char)? | '\' esc
```

Each production returns a Thompson [`Fragment`] whose states are pushed
directly into the NFA under construction. Anchors `^` and `$` are accepted
but compile to epsilon states. Errors are fatal; no recovery is attempted.
*/

use super::nfa::{ClassSet, Fragment, Nfa, State, NO_TRANSITION};
use super::Error;

pub(crate) struct Parser<'a> {
    source: &'a str,
    pattern: &'a [u8],
    pos: usize,
    nfa: Nfa,
}

/// Parses `source` into an NFA with a single trailing `Accept` state.
pub(crate) fn parse(source: &str) -> Result<Nfa, Error> {
    let mut parser = Parser {
        source,
        pattern: source.as_bytes(),
        pos: 0,
        nfa: Nfa::new(),
    };

    let fragment = parser.alternation()?;

    // The only byte a finished parse can stop at is an unbalanced ')'.
    if parser.pos < parser.pattern.len() {
        return Err(parser.error("unmatched `)`"));
    }

    let accept = parser.nfa.push(State::Accept);
    parser.nfa.patch(fragment.end, accept);
    parser.nfa.start = fragment.start;

    Ok(parser.nfa)
}

impl<'a> Parser<'a> {
    fn error(&self, msg: &str) -> Error {
        Error::Invalid { pattern: self.source.to_string(), msg: msg.to_string() }
    }

    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    fn alternation(&mut self) -> Result<Fragment, Error> {
        let mut left = self.concatenation()?;

        while self.peek() == Some(b'|') {
            self.pos += 1;
            let right = self.concatenation()?;

            // Split with one arm per alternative, plus a join both arms
            // are patched into.
            let split = self.nfa.push(State::Epsilon { next1: left.start, next2: right.start });
            let join = self.nfa.push(State::Epsilon {
                next1: NO_TRANSITION,
                next2: NO_TRANSITION,
            });

            self.nfa.patch(left.end, join);
            self.nfa.patch(right.end, join);

            left = Fragment { start: split, end: join };
        }

        Ok(left)
    }

    fn concatenation(&mut self) -> Result<Fragment, Error> {
        let mut result: Option<Fragment> = None;

        while let Some(byte) = self.peek() {
            if byte == b'|' || byte == b')' {
                break;
            }
            let atom = self.quantified()?;
            result = Some(match result {
                Some(left) => {
                    self.nfa.patch(left.end, atom.start);
                    Fragment { start: left.start, end: atom.end }
                }
                None => atom,
            });
        }

        // An empty concatenation (empty regexp, `()`, or an `|` arm)
        // matches the empty string.
        Ok(result.unwrap_or_else(|| self.epsilon_fragment()))
    }

    fn quantified(&mut self) -> Result<Fragment, Error> {
        let base = self.atom()?;

        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                Ok(self.star(base))
            }
            Some(b'+') => {
                self.pos += 1;
                Ok(self.plus(base))
            }
            Some(b'?') => {
                self.pos += 1;
                Ok(self.optional(base))
            }
            _ => Ok(base),
        }
    }

    fn atom(&mut self) -> Result<Fragment, Error> {
        let byte = match self.peek() {
            Some(byte) => byte,
            None => return Err(self.error("unexpected end of pattern")),
        };

        match byte {
            b'(' => {
                self.pos += 1;
                let inner = self.alternation()?;
                if self.peek() != Some(b')') {
                    return Err(self.error("unmatched `(`"));
                }
                self.pos += 1;
                Ok(inner)
            }
            b'[' => self.char_class(),
            b'.' => {
                self.pos += 1;
                Ok(self.class_fragment(ClassSet::any_except_newline()))
            }
            b'\\' => {
                self.pos += 1;
                self.escape()
            }
            b'^' | b'$' => {
                // Anchors compile to epsilon; they do not constrain the
                // position.
                self.pos += 1;
                Ok(self.epsilon_fragment())
            }
            _ => {
                self.pos += 1;
                Ok(self.byte_fragment(byte))
            }
        }
    }

    fn char_class(&mut self) -> Result<Fragment, Error> {
        self.pos += 1; // consume '['

        let negated = if self.peek() == Some(b'^') {
            self.pos += 1;
            true
        } else {
            false
        };

        let mut class = ClassSet::empty();

        while let Some(byte) = self.peek() {
            if byte == b']' {
                break;
            }
            self.pos += 1;

            if byte == b'\\' {
                match self.peek() {
                    Some(escaped) => {
                        self.pos += 1;
                        add_class_escape(&mut class, escaped);
                    }
                    None => return Err(self.error("incomplete escape sequence")),
                }
                continue;
            }

            // `-` starts a range only when another class byte follows it;
            // a trailing `-` before `]` is a literal.
            let range_end = match (self.peek(), self.pattern.get(self.pos + 1).copied()) {
                (Some(b'-'), Some(after)) if after != b']' => Some(after),
                _ => None,
            };

            match range_end {
                Some(hi) => {
                    self.pos += 2; // consume '-' and the range end
                    class.add_range(byte, hi);
                }
                None => class.add(byte),
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error("unmatched `[`"));
        }
        self.pos += 1; // consume ']'

        if negated {
            class.complement();
        }

        Ok(self.class_fragment(class))
    }

    fn escape(&mut self) -> Result<Fragment, Error> {
        let byte = match self.peek() {
            Some(byte) => byte,
            None => return Err(self.error("incomplete escape sequence")),
        };
        self.pos += 1;

        let fragment = match byte {
            b'd' => self.class_fragment(ClassSet::digit()),
            b'D' => self.class_fragment(complemented(ClassSet::digit())),
            b'w' => self.class_fragment(ClassSet::word()),
            b'W' => self.class_fragment(complemented(ClassSet::word())),
            b's' => self.class_fragment(ClassSet::space()),
            b'S' => self.class_fragment(complemented(ClassSet::space())),
            // Any other escaped byte is a literal (`\.`, `\*`, ...).
            _ => self.byte_fragment(byte),
        };

        Ok(fragment)
    }

    fn star(&mut self, inner: Fragment) -> Fragment {
        // The loop-back edge goes in next1; the skip edge is the dangling
        // next2, patched by whatever follows.
        let split = self.nfa.push(State::Epsilon {
            next1: inner.start,
            next2: NO_TRANSITION,
        });
        self.nfa.patch(inner.end, split);
        Fragment { start: split, end: split }
    }

    fn plus(&mut self, inner: Fragment) -> Fragment {
        // Like star, but entered through the inner fragment so it must
        // match at least once.
        let split = self.nfa.push(State::Epsilon {
            next1: inner.start,
            next2: NO_TRANSITION,
        });
        self.nfa.patch(inner.end, split);
        Fragment { start: inner.start, end: split }
    }

    fn optional(&mut self, inner: Fragment) -> Fragment {
        let join = self.nfa.push(State::Epsilon {
            next1: NO_TRANSITION,
            next2: NO_TRANSITION,
        });
        let split = self.nfa.push(State::Epsilon { next1: inner.start, next2: join });
        self.nfa.patch(inner.end, join);
        Fragment { start: split, end: join }
    }

    fn epsilon_fragment(&mut self) -> Fragment {
        let state = self.nfa.push(State::Epsilon {
            next1: NO_TRANSITION,
            next2: NO_TRANSITION,
        });
        Fragment { start: state, end: state }
    }

    fn byte_fragment(&mut self, byte: u8) -> Fragment {
        let state = self.nfa.push(State::Byte { byte, next: NO_TRANSITION });
        Fragment { start: state, end: state }
    }

    fn class_fragment(&mut self, class: ClassSet) -> Fragment {
        let state = self.nfa.push(State::Class { class, next: NO_TRANSITION });
        Fragment { start: state, end: state }
    }
}

/// Expands an escape inside a character class: shorthand classes add
/// their members, anything else adds the literal byte.
fn add_class_escape(class: &mut ClassSet, byte: u8) {
    match byte {
        b'd' => class.add_range(b'0', b'9'),
        b'w' => {
            class.add_range(b'a', b'z');
            class.add_range(b'A', b'Z');
            class.add_range(b'0', b'9');
            class.add(b'_');
        }
        b's' => {
            class.add(b' ');
            class.add(b'\t');
            class.add(b'\n');
            class.add(b'\r');
            class.add(0x0c);
            class.add(0x0b);
        }
        _ => class.add(byte),
    }
}

fn complemented(mut class: ClassSet) -> ClassSet {
    class.complement();
    class
}
