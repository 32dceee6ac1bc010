//! Converts aligned token sequences into an ordered edit script (§4.3).

use crate::lcs::lcs_pairs;
use crate::text::split_lines;
use crate::types::{DiffOptions, EditHunk, EditOp, EditScript};

/// Line-level diff. Always returns the full, untrimmed script — windowing
/// for unified-diff display happens in [`crate::patch::create_patch`], which
/// re-derives its own context window regardless (see DESIGN.md for why this
/// is the chosen reading of the open question in spec §4.3/§9).
pub fn diff_lines(old: &str, new: &str, options: DiffOptions) -> EditScript {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    let eq = |a: &&str, b: &&str| lines_equal(a, b, &options);
    let pairs = lcs_pairs(&old_lines, &new_lines, eq);

    let mut hunks = Vec::new();
    let (mut oi, mut ni) = (0usize, 0usize);
    for (pa, pb) in pairs {
        while oi < pa {
            hunks.push(EditHunk::delete_line(oi + 1, old_lines[oi]));
            oi += 1;
        }
        while ni < pb {
            hunks.push(EditHunk::insert_line(ni + 1, new_lines[ni]));
            ni += 1;
        }
        hunks.push(EditHunk::equal_line(oi + 1, ni + 1, old_lines[pa]));
        oi = pa + 1;
        ni = pb + 1;
    }
    while oi < old_lines.len() {
        hunks.push(EditHunk::delete_line(oi + 1, old_lines[oi]));
        oi += 1;
    }
    while ni < new_lines.len() {
        hunks.push(EditHunk::insert_line(ni + 1, new_lines[ni]));
        ni += 1;
    }

    tracing::debug!(
        old_lines = old_lines.len(),
        new_lines = new_lines.len(),
        hunks = hunks.len(),
        "computed line diff"
    );

    EditScript::new(hunks)
}

/// Two lines are equal for alignment purposes if:
/// - both are blank (trimmed-empty) and `ignore_blank_lines` is set — blank
///   lines are always a free match, which is equivalent to excluding them
///   from alignment without needing separate position bookkeeping, or
/// - they compare equal under `trim()` (if `ignore_whitespace`) or
///   byte-for-byte otherwise.
fn lines_equal(a: &str, b: &str, options: &DiffOptions) -> bool {
    if options.ignore_blank_lines && a.trim().is_empty() && b.trim().is_empty() {
        return true;
    }
    if options.ignore_whitespace {
        a.trim() == b.trim()
    } else {
        a == b
    }
}

/// Word-level diff. A token boundary exists between any two adjacent
/// characters where one is a word character and the other is not; whitespace
/// and punctuation each form single-character tokens.
pub fn diff_words(old: &str, new: &str) -> EditScript {
    diff_tokens(&tokenize_words(old), &tokenize_words(new))
}

/// Char-level diff. Every code point is one token.
pub fn diff_chars(old: &str, new: &str) -> EditScript {
    let old_tokens: Vec<String> = old.chars().map(String::from).collect();
    let new_tokens: Vec<String> = new.chars().map(String::from).collect();
    diff_tokens(&old_tokens, &new_tokens)
}

fn diff_tokens(old: &[String], new: &[String]) -> EditScript {
    let pairs = lcs_pairs(old, new, |a: &String, b: &String| a == b);

    let mut raw = Vec::new();
    let (mut oi, mut ni) = (0usize, 0usize);
    for (pa, pb) in pairs {
        while oi < pa {
            raw.push(EditHunk::token(EditOp::Delete, old[oi].clone()));
            oi += 1;
        }
        while ni < pb {
            raw.push(EditHunk::token(EditOp::Insert, new[ni].clone()));
            ni += 1;
        }
        raw.push(EditHunk::token(EditOp::Equal, old[pa].clone()));
        oi = pa + 1;
        ni = pb + 1;
    }
    while oi < old.len() {
        raw.push(EditHunk::token(EditOp::Delete, old[oi].clone()));
        oi += 1;
    }
    while ni < new.len() {
        raw.push(EditHunk::token(EditOp::Insert, new[ni].clone()));
        ni += 1;
    }

    EditScript::new(coalesce(raw))
}

/// Merge consecutive hunks carrying the same opcode by concatenating content.
fn coalesce(hunks: Vec<EditHunk>) -> Vec<EditHunk> {
    let mut out: Vec<EditHunk> = Vec::with_capacity(hunks.len());
    for hunk in hunks {
        match out.last_mut() {
            Some(prev) if prev.op == hunk.op => prev.content.push_str(&hunk.content),
            _ => out.push(hunk),
        }
    }
    out
}

/// A word character is any rune that is neither whitespace nor punctuation
/// (spec §4.3) — notably this is broader than "alphanumeric": ASCII math and
/// currency symbols (`+ = < > $ ^ \` | ~`) are Unicode category Sm/Sc/Sk, not
/// punctuation, so they stay inside the surrounding word token rather than
/// splitting it. `-` (Pd), `_` (Pc), and the rest of ASCII punctuation (P*)
/// remain boundaries. Non-ASCII punctuation/symbol runes fall back to
/// `is_alphanumeric` since there's no Unicode category table in scope here.
fn is_word_char(c: char) -> bool {
    if c.is_whitespace() {
        return false;
    }
    if c.is_alphanumeric() {
        return true;
    }
    if c.is_ascii() {
        const ASCII_PUNCTUATION: &[char] = &[
            '!', '"', '#', '%', '&', '\'', '(', ')', '*', ',', '-', '.', '/', ':', ';', '?', '@',
            '[', '\\', ']', '_', '{', '}',
        ];
        return !ASCII_PUNCTUATION.contains(&c);
    }
    false
}

fn tokenize_words(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in s.chars() {
        if is_word_char(c) {
            current.push(c);
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(c.to_string());
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(hunks: &[EditHunk], op: EditOp) -> String {
        hunks
            .iter()
            .filter(|h| h.op == op || h.op == EditOp::Equal)
            .map(|h| h.content.as_str())
            .collect()
    }

    #[test]
    fn s1_trivial_change() {
        let script = diff_lines("a\nb\nc\n", "a\nB\nc\n", DiffOptions::default());
        let ops: Vec<(EditOp, &str)> = script
            .hunks
            .iter()
            .map(|h| (h.op, h.content.as_str()))
            .collect();
        assert_eq!(
            ops,
            vec![
                (EditOp::Equal, "a"),
                (EditOp::Delete, "b"),
                (EditOp::Insert, "B"),
                (EditOp::Equal, "c"),
            ]
        );
        assert_eq!(script.stats.additions, 1);
        assert_eq!(script.stats.deletions, 1);
        assert_eq!(script.stats.changes, 1);
    }

    #[test]
    fn line_diff_reconstructs_old_and_new() {
        let old = "one\ntwo\nthree\nfour\n";
        let new = "one\nTWO\nthree\nfive\nfour\n";
        let script = diff_lines(old, new, DiffOptions::default());
        let reconstructed_old: Vec<&str> = script
            .hunks
            .iter()
            .filter(|h| h.op != EditOp::Insert)
            .map(|h| h.content.as_str())
            .collect();
        let reconstructed_new: Vec<&str> = script
            .hunks
            .iter()
            .filter(|h| h.op != EditOp::Delete)
            .map(|h| h.content.as_str())
            .collect();
        assert_eq!(reconstructed_old, split_lines(old));
        assert_eq!(reconstructed_new, split_lines(new));
    }

    #[test]
    fn ignore_whitespace_treats_trimmed_equal_lines_as_equal() {
        let script = diff_lines(
            "a\n  b  \nc\n",
            "a\nb\nc\n",
            DiffOptions {
                ignore_whitespace: true,
                ..Default::default()
            },
        );
        assert_eq!(script.stats.additions, 0);
        assert_eq!(script.stats.deletions, 0);
        // the emitted content is the original (untrimmed) line
        assert_eq!(script.hunks[1].content, "  b  ");
    }

    #[test]
    fn ignore_blank_lines_matches_blanks_freely() {
        let script = diff_lines(
            "a\n\nb\n",
            "a\n\n\nb\n",
            DiffOptions {
                ignore_blank_lines: true,
                ..Default::default()
            },
        );
        // the extra blank line in `new` is an insertion, not counted against
        // the shared blank-line match
        assert_eq!(script.stats.additions, 1);
        assert_eq!(script.stats.deletions, 0);
    }

    #[test]
    fn diff_words_concatenates_to_old_and_new() {
        let script = diff_words("the quick fox", "the slow fox");
        assert_eq!(contents(&script.hunks, EditOp::Delete), "the quick fox");
        assert_eq!(contents(&script.hunks, EditOp::Insert), "the slow fox");
    }

    #[test]
    fn diff_words_coalesces_adjacent_same_op_runs() {
        let script = diff_words("hello world", "goodbye world");
        // "hello" is a single Delete token-run, "goodbye" a single Insert run
        assert!(script.hunks.iter().any(|h| h.content == "hello"));
        assert!(script.hunks.iter().any(|h| h.content == "goodbye"));
    }

    #[test]
    fn diff_words_keeps_math_symbols_inside_the_word_token() {
        // `=` is Unicode category Sm (symbol), not punctuation, so `a=1` is
        // one word token with no internal boundary at `=`; only the digit
        // differs between old and new.
        let script = diff_words("a=1", "a=2");
        let ops: Vec<(EditOp, &str)> = script
            .hunks
            .iter()
            .map(|h| (h.op, h.content.as_str()))
            .collect();
        assert_eq!(
            ops,
            vec![(EditOp::Delete, "a=1"), (EditOp::Insert, "a=2")]
        );
    }

    #[test]
    fn diff_chars_concatenates_to_old_and_new() {
        let script = diff_chars("abc", "axc");
        assert_eq!(contents(&script.hunks, EditOp::Delete), "abc");
        assert_eq!(contents(&script.hunks, EditOp::Insert), "axc");
    }

    #[test]
    fn empty_inputs_yield_empty_script() {
        let script = diff_lines("", "", DiffOptions::default());
        assert!(script.hunks.is_empty());
        assert_eq!(script.stats, crate::types::Stats::default());
    }
}
