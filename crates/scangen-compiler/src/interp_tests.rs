//! End-to-end matching semantics, exercised through the interpreter.

use indoc::indoc;

use crate::interp::ScanError;
use crate::session::{CompileOptions, Session};

fn session(rules: &str) -> Session {
    Session::compile(rules, &CompileOptions::default()).unwrap()
}

#[test]
fn longest_match_wins() {
    let s = session(indoc! {"
        h\tSHORT
        hi\tLONG
    "});
    let m = s.machine();
    assert_eq!(m.scan_at(b"hi", 0), Some((3, 2)));
    assert_eq!(m.scan_at(b"h", 0), Some((1, 1)));
    let tokens = m.tokenize(b"hih").unwrap();
    let spans: Vec<_> = tokens.iter().map(|t| (t.action, t.len)).collect();
    assert_eq!(spans, [("LONG", 2), ("SHORT", 1)]);
}

#[test]
fn earliest_rule_wins_length_ties() {
    let s = session(indoc! {"
        a\tPLAIN
        [a]\tLISTED
    "});
    let m = s.machine();
    assert_eq!(m.scan_at(b"a", 0), Some((1, 1)));
}

#[test]
fn inverted_list_excludes_members_and_end_of_input() {
    let s = session("[^abc]\tOTHER\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"x", 0), Some((1, 1)));
    assert_eq!(m.scan_at(b"a", 0), None);
    assert_eq!(m.scan_at(b"", 0), None);
}

#[test]
fn star_accepts_zero_occurrences() {
    let s = session("a*b\tX\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"b", 0), Some((1, 1)));
    assert_eq!(m.scan_at(b"aaab", 0), Some((1, 4)));
    assert_eq!(m.scan_at(b"aa", 0), None);
}

#[test]
fn plus_requires_one_occurrence() {
    let s = session("a+b\tX\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"b", 0), None);
    assert_eq!(m.scan_at(b"ab", 0), Some((1, 2)));
    assert_eq!(m.scan_at(b"aaab", 0), Some((1, 4)));
}

#[test]
fn repeated_class_stops_at_its_continuation() {
    // Without dropping the stale repeat state, \l* would also swallow the
    // first 'd' and claim five bytes.
    let s = session(indoc! {"
        \\l*d\tWORD
        d\tJUST_D
    "});
    let m = s.machine();
    assert_eq!(m.scan_at(b"abcdd", 0), Some((1, 4)));
    let tokens = m.tokenize(b"abcdd").unwrap();
    let spans: Vec<_> = tokens.iter().map(|t| (t.action, t.len)).collect();
    assert_eq!(spans, [("WORD", 4), ("WORD", 1)]);
}

#[test]
fn failed_long_rule_backtracks_to_shorter_match() {
    let s = session(indoc! {"
        a*bcde\tLONG
        a\tA
    "});
    let m = s.machine();
    assert_eq!(m.scan_at(b"abcde", 0), Some((1, 5)));
    assert_eq!(m.scan_at(b"aabcde", 0), Some((1, 6)));
    // The long rule dies at 'x'; the rewind hands back a one-byte match.
    assert_eq!(m.scan_at(b"axyzbcde", 0), Some((3, 1)));
    assert_eq!(m.tokenize(b"aax"), Err(ScanError::NoMatch { pos: 2 }));
}

#[test]
fn starred_group_loops_and_skips() {
    let s = session("(ab|cd)*e\tX\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"e", 0), Some((1, 1)));
    assert_eq!(m.scan_at(b"cde", 0), Some((1, 3)));
    assert_eq!(m.scan_at(b"ababcde", 0), Some((1, 7)));
    assert_eq!(m.scan_at(b"abce", 0), None);
}

#[test]
fn group_alternatives_share_their_continuation() {
    let s = session("(ab|cd)e\tX\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"abe", 0), Some((1, 3)));
    assert_eq!(m.scan_at(b"cde", 0), Some((1, 3)));
    assert_eq!(m.scan_at(b"ab", 0), None);
}

#[test]
fn end_of_input_class_matches_only_at_the_end() {
    let s = session("a\\Z\tEND\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"a", 0), Some((1, 1)));
    assert_eq!(m.scan_at(b"ab", 0), None);
}

#[test]
fn zero_width_match_is_only_legal_at_end_of_input() {
    let s = session("a*\tAS\n");
    let m = s.machine();
    assert_eq!(m.tokenize(b"b"), Err(ScanError::NoProgress { pos: 0 }));
    let tokens = m.tokenize(b"aa").unwrap();
    assert_eq!(tokens[0].len, 2);
}

#[test]
fn word_chars_and_digits_tokenize_mixed_input() {
    let s = session(indoc! {"
        \\l\\w*\tIDENT
        \\d+\tNUMBER
    "});
    let m = s.machine();
    // Word chars cover digits, so the identifier swallows its trailing
    // digits; a leading digit still lexes as a number.
    let tokens = m.tokenize(b"9abc12").unwrap();
    let spans: Vec<_> = tokens.iter().map(|t| (t.action, t.start, t.len)).collect();
    assert_eq!(spans, [("NUMBER", 0, 1), ("IDENT", 1, 5)]);
}

#[test]
fn dot_consumes_any_single_byte() {
    let s = session("a.c\tX\n");
    let m = s.machine();
    assert_eq!(m.scan_at(b"abc", 0), Some((1, 3)));
    assert_eq!(m.scan_at(b"a\x00c", 0), Some((1, 3)));
    assert_eq!(m.scan_at(b"ac", 0), None);
}

#[test]
fn token_spans_cover_the_input_exactly() {
    let s = session(indoc! {"
        \\l+\tWORD
        \\d+\tNUMBER
        [ ]\tSPACE
    "});
    let m = s.machine();
    let input = b"abc 12 x";
    let tokens = m.tokenize(input).unwrap();
    let mut covered = 0;
    for t in &tokens {
        assert_eq!(t.start, covered);
        covered += t.len;
    }
    assert_eq!(covered, input.len());
}
