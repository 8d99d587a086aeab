/*! End-to-end tests. */

use itertools::Itertools;
use pretty_assertions::assert_eq;

use crate::{
    compile_literal, compile_regex, contains, count, search_all, search_all_collected, search_pos,
    Pattern, Regexp,
};

macro_rules! assert_all_matches {
    ($text:expr, $pattern:expr, $expected:expr) => {{
        assert_eq!(
            search_all_collected($text, $pattern),
            $expected,
            "all matches of `{}` in `{}`",
            String::from_utf8_lossy($pattern),
            String::from_utf8_lossy($text),
        );
    }};
}

#[test]
fn scenario_overlapping_prefix() {
    assert_all_matches!(b"abracadabra", b"abra", &[0, 7]);
}

#[test]
fn scenario_overlapping_runs() {
    assert_all_matches!(b"aaaa", b"aa", &[0, 1, 2]);
    assert_eq!(count(b"aaaa", b"aa"), 3);
}

#[test]
fn scenario_textbook_pattern() {
    assert_eq!(search_pos(b"ABABDABACDABABCABAB", b"ABABCABAB"), Some(10));
}

#[test]
fn scenario_no_match() {
    assert_eq!(search_pos(b"hello world", b"xyz"), None);
    assert_eq!(count(b"hello world", b"xyz"), 0);
}

#[test]
fn scenario_needle_near_the_end() {
    let mut text = vec![b'a'; 100_000];
    text[99_990..99_996].copy_from_slice(b"needle");
    assert_eq!(search_pos(&text, b"needle"), Some(99_990));
}

#[test]
fn scenario_words() {
    assert_all_matches!(b"the cat the dog the bird", b"the", &[0, 8, 16]);
}

/// The invariants of the literal surface, checked over a corpus of
/// text/pattern pairs that exercises overlap, periodicity and misses.
#[test]
fn literal_search_laws() {
    let corpus: &[(&[u8], &[u8])] = &[
        (b"abracadabra", b"abra"),
        (b"aaaa", b"aa"),
        (b"mississippi", b"issi"),
        (b"mississippi", b"zz"),
        (b"ababababab", b"abab"),
        (b"the cat the dog", b"the"),
        (b"", b"x"),
        (b"short", b"muchlongerpattern"),
    ];

    for &(text, pattern) in corpus {
        let all = search_all_collected(text, pattern);

        // contains <=> search_pos is some.
        assert_eq!(contains(text, pattern), search_pos(text, pattern).is_some());

        // count agrees with the collected length.
        assert_eq!(count(text, pattern), all.len());

        // every offset points at a real occurrence.
        for &offset in &all {
            assert!(offset + pattern.len() <= text.len());
            assert_eq!(&text[offset..offset + pattern.len()], pattern);
        }

        // strictly increasing.
        assert!(all.iter().tuple_windows().all(|(a, b)| a < b));

        // first match is the minimum.
        assert_eq!(search_pos(text, pattern), all.first().copied());

        // lazy and eager forms agree.
        assert_eq!(search_all(text, pattern).collect::<Vec<_>>(), all);
    }
}

/// The dispatch threshold must be invisible in results: a pattern close
/// to the end is found whether the text is scanned by the vector or the
/// scalar path.
#[test]
fn threshold_is_invisible() {
    for text_len in [8, 63, 64, 65, 1000] {
        let mut text = vec![b'x'; text_len];
        let at = text_len - 3;
        text[at..].copy_from_slice(b"end");
        assert_eq!(search_pos(&text, b"end"), Some(at), "text_len {text_len}");
        assert_eq!(count(&text, b"end"), 1, "text_len {text_len}");
    }
}

/// Worst case for naive search: a long run of one byte and a pattern
/// that almost matches everywhere. Must finish quickly and find nothing.
#[test]
fn pathological_literal_input() {
    let n = 20_000;
    let text = vec![b'a'; n];
    let mut pattern = vec![b'a'; n / 10];
    pattern.push(b'b');

    assert_eq!(search_pos(&text, &pattern), None);
    assert_eq!(count(&text, &pattern), 0);
}

#[test]
fn concurrent_literal_search() {
    let mut text = vec![b'a'; 50_000];
    text[40_000..40_006].copy_from_slice(b"needle");
    let pattern = compile_literal(b"needle");

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..10 {
                    assert_eq!(pattern.find(&text), Some(40_000));
                    assert_eq!(pattern.count(&text), 1);
                }
            });
        }
    });
}

#[test]
fn concurrent_regex_search() {
    let re = compile_regex("[a-z]+@[a-z]+\\.[a-z]+").unwrap();
    let text = b"contact us at help@example.org for details";

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert_eq!(re.search(text), Some(14));
                    assert!(re.matches(b"help@example.org"));
                }
            });
        }
    });
}

/// Shared handles observe the same automaton from every thread.
#[test]
fn regexp_clone_across_threads() {
    let re = Regexp::new("(ab)+c?").unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let re = re.clone();
            std::thread::spawn(move || {
                assert!(re.matches(b"ababab"));
                assert!(!re.matches(b"aba"));
                re.state_count()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}

struct FileCase {
    line: usize,
    text: String,
    pattern: String,
    /// `None` means the case expects no match at all.
    expected: Option<Vec<usize>>,
}

/// Loads the line-oriented `<text>|<pattern>|<positions>` format: `#`
/// lines and empty lines are ignored, lines without two separators are
/// skipped, positions are `NOT_FOUND`/`false` or a comma-separated
/// ascending list.
fn load_cases(data: &str) -> Vec<FileCase> {
    let mut cases = Vec::new();

    for (index, line) in data.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.splitn(3, '|');
        let (Some(text), Some(pattern), Some(positions)) =
            (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let expected = if positions == "NOT_FOUND" || positions == "false" {
            None
        } else {
            Some(positions.split(',').filter_map(|p| p.trim().parse().ok()).collect())
        };

        cases.push(FileCase {
            line: index + 1,
            text: text.to_string(),
            pattern: pattern.to_string(),
            expected,
        });
    }

    cases
}

#[test]
fn file_cases() {
    let cases = load_cases(include_str!("testdata/search_cases.txt"));
    assert!(cases.len() >= 10);

    for case in cases {
        let text = case.text.as_bytes();
        let pattern = case.pattern.as_bytes();
        let all = search_all_collected(text, pattern);

        match &case.expected {
            Some(positions) => {
                assert_eq!(&all, positions, "line {}: `{}`", case.line, case.pattern);
                assert_eq!(search_pos(text, pattern), positions.first().copied());
            }
            None => {
                assert_eq!(all, Vec::<usize>::new(), "line {}", case.line);
                assert_eq!(search_pos(text, pattern), None);
            }
        }
    }
}

#[test]
fn file_loader_skips_malformed_lines() {
    let cases = load_cases("# comment\n\nbad line\nonly|one\na|a|0\n");
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].text, "a");
    assert_eq!(cases[0].line, 5);
}

/// Compiled patterns and one-shot calls must agree everywhere.
#[test]
fn compiled_and_oneshot_agree() {
    let texts: &[&[u8]] = &[
        b"abracadabra",
        b"aaaaaaaaaa",
        b"",
        b"abc",
        b"xyxyxyxyxyxyxyxyzzz",
    ];
    for pattern_bytes in [b"a".as_slice(), b"abra", b"xyz", b"zzz", b""] {
        let pattern = Pattern::new(pattern_bytes);
        for &text in texts {
            assert_eq!(pattern.find(text), search_pos(text, pattern_bytes));
            assert_eq!(pattern.count(text), count(text, pattern_bytes));
            assert_eq!(
                pattern.find_iter(text).collect::<Vec<_>>(),
                search_all_collected(text, pattern_bytes)
            );
        }
    }
}

#[test]
fn regex_end_to_end() {
    let cases: &[(&str, &[u8], bool)] = &[
        ("hello", b"hello", true),
        ("hello", b"Hello", false),
        ("[a-zA-Z]+", b"Hello", true),
        ("[a-zA-Z]+", b"Hello123", false),
        ("ab*c", b"ac", true),
        ("ab*c", b"abc", true),
        ("ab*c", b"abbc", true),
        ("ab+c", b"ac", false),
        ("ab+c", b"abc", true),
        ("[a-z]+@[a-z]+\\.[a-z]+", b"user@example.com", true),
        ("[a-z]+@[a-z]+\\.[a-z]+", b"invalid", false),
    ];

    for &(source, text, expected) in cases {
        let re = compile_regex(source).unwrap();
        assert_eq!(re.matches(text), expected, "`{source}` on `{:?}`", text);
    }

    let re = compile_regex("[0-9]+").unwrap();
    assert_eq!(re.search(b"There are 42 apples and 123 oranges."), Some(10));
}

#[test]
fn regex_pathological_input() {
    let re = compile_regex("a*a*a*a*a*b").unwrap();
    let text = vec![b'a'; 1000];
    assert_eq!(re.search(&text), None);
}
