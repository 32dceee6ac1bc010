//! Replays a parsed patch against a text buffer, relocating hunks within a
//! bounded fuzz window when context has drifted (§4.5).

use crate::patch::parse_patch;
use crate::text::split_lines;
use crate::types::{ApplyResult, ParsedPatch};

/// Bound on how far `apply_patch` searches around a hunk's nominal position
/// before giving up. The design notes call for "a small bounded window (≤10)";
/// unbounded or heuristic context search is explicitly out of scope.
const FUZZ_MAX: i64 = 10;

/// Apply unified-diff text to `content`.
///
/// Hunks are processed in order of `old_start`. A hunk whose expected
/// context/old lines don't match exactly at the nominal position is
/// relocated within `±FUZZ_MAX` lines; the first match wins. A hunk that
/// can't be located is recorded as failed and skipped — `apply_patch` never
/// aborts early on a single bad hunk.
pub fn apply_patch(content: &str, patch: &str) -> ApplyResult {
    match parse_patch(patch) {
        Ok(parsed) => apply_parsed(content, &parsed),
        Err(e) => ApplyResult {
            content: content.to_string(),
            success: false,
            hunks_applied: 0,
            hunks_failed: 0,
            errors: vec![e.to_string()],
        },
    }
}

fn apply_parsed(content: &str, patch: &ParsedPatch) -> ApplyResult {
    let mut lines: Vec<String> = split_lines(content).into_iter().map(String::from).collect();
    let mut cursor_offset: i64 = 0;
    let mut hunks_applied = 0usize;
    let mut hunks_failed = 0usize;
    let mut errors = Vec::new();

    for hunk in &patch.hunks {
        let expected: Vec<&str> = hunk
            .lines
            .iter()
            .filter(|l| l.marker != '+')
            .map(|l| l.content.as_str())
            .collect();

        let nominal = (hunk.old_start as i64 - 1 + cursor_offset).max(0);
        match locate(&lines, nominal, &expected) {
            Some(pos) => {
                let replacement: Vec<String> = hunk
                    .lines
                    .iter()
                    .filter(|l| l.marker != '-')
                    .map(|l| l.content.clone())
                    .collect();
                let replaced_len = replacement.len();
                lines.splice(pos..pos + expected.len(), replacement);
                cursor_offset += replaced_len as i64 - expected.len() as i64;
                hunks_applied += 1;
            }
            None => {
                hunks_failed += 1;
                errors.push(format!(
                    "hunk at old line {} could not be located",
                    hunk.old_start
                ));
            }
        }
    }

    let had_trailing_newline = content.ends_with('\n');
    let mut output = lines.join("\n");
    if (had_trailing_newline || content.is_empty()) && !lines.is_empty() {
        output.push('\n');
    }

    tracing::debug!(
        hunks_applied,
        hunks_failed,
        "applied patch"
    );

    ApplyResult {
        content: output,
        success: hunks_failed == 0,
        hunks_applied,
        hunks_failed,
        errors,
    }
}

/// Search for `expected` in `lines` starting at `nominal`, expanding outward
/// by one line at a time up to `FUZZ_MAX`. An empty `expected` (pure
/// insertion) always matches at `nominal`.
fn locate(lines: &[String], nominal: i64, expected: &[&str]) -> Option<usize> {
    if matches_at(lines, nominal, expected) {
        return Some(nominal as usize);
    }
    for k in 1..=FUZZ_MAX {
        for delta in [k, -k] {
            let pos = nominal + delta;
            if matches_at(lines, pos, expected) {
                return Some(pos as usize);
            }
        }
    }
    None
}

fn matches_at(lines: &[String], pos: i64, expected: &[&str]) -> bool {
    if pos < 0 {
        return false;
    }
    let pos = pos as usize;
    if pos + expected.len() > lines.len() {
        return false;
    }
    lines[pos..pos + expected.len()]
        .iter()
        .zip(expected)
        .all(|(a, b)| a == b)
}
