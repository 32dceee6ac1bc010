//! Serializes an edit script to the unified-diff textual format and parses
//! such text back into a [`ParsedPatch`] (§4.4).

use crate::diff::diff_lines;
use crate::error::TextDiffError;
use crate::types::{CreatePatchOptions, DiffOptions, EditHunk, EditOp, ParsedPatch, PatchHunk, PatchLine};

/// Serialize an old/new pair as a unified diff.
///
/// Always computes the line diff with default options (no whitespace or
/// blank-line insensitivity — those are `diff_lines`-only knobs); the
/// resulting script is windowed to `options.context_lines` of surrounding
/// context per change region, merging regions whose context overlaps.
pub fn create_patch(old: &str, new: &str, options: &CreatePatchOptions) -> String {
    let script = diff_lines(old, new, DiffOptions::default());
    let patch = build_parsed_patch(
        &script.hunks,
        options.context_lines,
        options.old_file.clone(),
        options.new_file.clone(),
    );
    format_patch(&patch)
}

/// Build a [`ParsedPatch`] from a full edit script, windowing to `context`
/// lines of surrounding `Equal` hunks per change region (§4.4 steps 2-4).
fn build_parsed_patch(
    hunks: &[EditHunk],
    context: usize,
    old_file: String,
    new_file: String,
) -> ParsedPatch {
    let groups = group_for_patch(hunks, context);
    let (old_before, new_before) = positions_before(hunks);

    let patch_hunks = groups
        .into_iter()
        .map(|(start, end)| {
            let slice = &hunks[start..end];
            let old_count = slice.iter().filter(|h| h.op != EditOp::Insert).count();
            let new_count = slice.iter().filter(|h| h.op != EditOp::Delete).count();
            let old_start = if old_count == 0 {
                old_before[start]
            } else {
                old_before[start] + 1
            };
            let new_start = if new_count == 0 {
                new_before[start]
            } else {
                new_before[start] + 1
            };
            let lines = slice
                .iter()
                .map(|h| PatchLine {
                    marker: match h.op {
                        EditOp::Equal => ' ',
                        EditOp::Insert => '+',
                        EditOp::Delete => '-',
                    },
                    content: h.content.clone(),
                })
                .collect();
            PatchHunk {
                old_start,
                old_count,
                new_start,
                new_count,
                lines,
            }
        })
        .collect();

    ParsedPatch {
        old_file,
        new_file,
        hunks: patch_hunks,
    }
}

/// For every hunk, the count of old/new lines consumed by all prior hunks
/// (0-based "cursor before this hunk").
fn positions_before(hunks: &[EditHunk]) -> (Vec<usize>, Vec<usize>) {
    let mut old_before = Vec::with_capacity(hunks.len());
    let mut new_before = Vec::with_capacity(hunks.len());
    let (mut old_cursor, mut new_cursor) = (0usize, 0usize);
    for h in hunks {
        old_before.push(old_cursor);
        new_before.push(new_cursor);
        match h.op {
            EditOp::Equal => {
                old_cursor += 1;
                new_cursor += 1;
            }
            EditOp::Delete => old_cursor += 1,
            EditOp::Insert => new_cursor += 1,
        }
    }
    (old_before, new_before)
}

/// Group hunk indices into unified-diff hunks following the standard
/// context-windowing algorithm: trim the leading/trailing `Equal` runs to
/// `context` lines, and split at any interior `Equal` run longer than
/// `2*context` (otherwise two change regions coalesce into one hunk).
fn group_for_patch(hunks: &[EditHunk], context: usize) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy)]
    struct Run {
        op: EditOp,
        start: usize,
        end: usize,
    }

    let mut runs: Vec<Run> = Vec::new();
    for (i, h) in hunks.iter().enumerate() {
        match runs.last_mut() {
            Some(r) if r.op == h.op => r.end = i + 1,
            _ => runs.push(Run {
                op: h.op,
                start: i,
                end: i + 1,
            }),
        }
    }
    if runs.is_empty() {
        return Vec::new();
    }

    if runs[0].op == EditOp::Equal {
        let len = runs[0].end - runs[0].start;
        if len > context {
            runs[0].start = runs[0].end - context;
        }
    }
    if let Some(last) = runs.last_mut() {
        if last.op == EditOp::Equal {
            let len = last.end - last.start;
            if len > context {
                last.end = last.start + context;
            }
        }
    }

    let mut groups = Vec::new();
    let mut cur_start: Option<usize> = None;
    let mut cur_end = 0usize;
    for r in &runs {
        if r.start >= r.end {
            continue;
        }
        if r.op == EditOp::Equal && (r.end - r.start) > 2 * context {
            let group_end = r.start + context;
            if let Some(s) = cur_start {
                if group_end > s {
                    groups.push((s, group_end));
                }
            }
            cur_start = Some(r.end - context);
            cur_end = r.end - context;
        } else {
            if cur_start.is_none() {
                cur_start = Some(r.start);
            }
            cur_end = r.end;
        }
    }
    if let Some(s) = cur_start {
        if cur_end > s {
            groups.push((s, cur_end));
        }
    }
    groups
}

/// Render a [`ParsedPatch`] back to unified-diff text.
pub fn format_patch(patch: &ParsedPatch) -> String {
    let mut out = format!("--- {}\n+++ {}\n", patch.old_file, patch.new_file);
    for hunk in &patch.hunks {
        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
        ));
        for line in &hunk.lines {
            out.push(line.marker);
            out.push_str(&line.content);
            out.push('\n');
        }
    }
    out
}

/// Parse unified-diff text into a [`ParsedPatch`].
///
/// Skips any preamble until the first `---`/`+++` pair or `@@` header.
/// Accepts hunk headers with or without the count suffix (missing count ≡
/// 1). Lines in a hunk whose first byte is not space, `+`, or `-` are
/// ignored (tolerant of `\ No newline at end of file` markers).
pub fn parse_patch(s: &str) -> Result<ParsedPatch, TextDiffError> {
    let lines: Vec<&str> = s.lines().collect();
    let mut old_file = String::new();
    let mut new_file = String::new();
    let mut saw_file_header = false;
    let mut hunks = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if let Some(rest) = line.strip_prefix("--- ") {
            old_file = label(rest);
            saw_file_header = true;
            i += 1;
        } else if let Some(rest) = line.strip_prefix("+++ ") {
            new_file = label(rest);
            saw_file_header = true;
            i += 1;
        } else if line.starts_with("@@ -") {
            let (header, consumed) = parse_hunk_header(line)
                .ok_or(TextDiffError::MalformedPatch)
                .map(|h| (h, 1))?;
            i += consumed;
            let mut patch_lines = Vec::new();
            while i < lines.len()
                && !lines[i].starts_with("@@ -")
                && !lines[i].starts_with("--- ")
            {
                let l = lines[i];
                match l.as_bytes().first() {
                    Some(b' ') | Some(b'+') | Some(b'-') => {
                        patch_lines.push(PatchLine {
                            marker: l.chars().next().unwrap(),
                            content: l[1..].to_string(),
                        });
                    }
                    _ => {} // tolerate "\ No newline at end of file" etc.
                }
                i += 1;
            }
            hunks.push(PatchHunk {
                old_start: header.0,
                old_count: header.1,
                new_start: header.2,
                new_count: header.3,
                lines: patch_lines,
            });
        } else {
            i += 1;
        }
    }

    if !saw_file_header && hunks.is_empty() {
        return Err(TextDiffError::MalformedPatch);
    }

    Ok(ParsedPatch {
        old_file,
        new_file,
        hunks,
    })
}

/// Strip a trailing `\t`-separated timestamp/revision suffix some diff tools
/// append to the `---`/`+++` label.
fn label(rest: &str) -> String {
    rest.split('\t').next().unwrap_or(rest).trim_end().to_string()
}

/// Parse `@@ -old_start[,old_count] +new_start[,new_count] @@ ...` into
/// `(old_start, old_count, new_start, new_count)`. Tolerant of trailing
/// context text after the closing `@@`.
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 4 || tokens[0] != "@@" || tokens[3] != "@@" {
        return None;
    }
    let old = parse_range(tokens[1].strip_prefix('-')?)?;
    let new = parse_range(tokens[2].strip_prefix('+')?)?;
    Some((old.0, old.1, new.0, new.1))
}

fn parse_range(s: &str) -> Option<(usize, usize)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

/// Swap the direction of a unified diff: old↔new file labels, old_*↔new_*
/// per hunk, and `+`↔`-` per line (` ` unchanged).
///
/// `apply_patch(new, reverse_patch(create_patch(old, new)))` reproduces
/// `old` — the reverse-patch law of §8.
pub fn reverse_patch(s: &str) -> Result<String, TextDiffError> {
    let parsed = parse_patch(s)?;
    let reversed = ParsedPatch {
        old_file: parsed.new_file,
        new_file: parsed.old_file,
        hunks: parsed
            .hunks
            .into_iter()
            .map(|h| PatchHunk {
                old_start: h.new_start,
                old_count: h.new_count,
                new_start: h.old_start,
                new_count: h.old_count,
                lines: h
                    .lines
                    .into_iter()
                    .map(|l| PatchLine {
                        marker: match l.marker {
                            '+' => '-',
                            '-' => '+',
                            other => other,
                        },
                        content: l.content,
                    })
                    .collect(),
            })
            .collect(),
    };
    Ok(format_patch(&reversed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_patch_format() {
        let opts = CreatePatchOptions {
            old_file: "f".to_string(),
            new_file: "f".to_string(),
            context_lines: 3,
        };
        let patch = create_patch("a\nb\nc\n", "a\nB\nc\n", &opts);
        assert_eq!(patch, "--- f\n+++ f\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n");
    }

    #[test]
    fn empty_change_emits_header_only() {
        let opts = CreatePatchOptions {
            old_file: "f".to_string(),
            new_file: "f".to_string(),
            context_lines: 3,
        };
        let patch = create_patch("same\n", "same\n", &opts);
        assert_eq!(patch, "--- f\n+++ f\n");
    }

    #[test]
    fn context_windows_bound_and_coalesce_regions() {
        let old = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n";
        let new = "1\n2\nX\n4\n5\n6\n7\n8\nY\n10\n";
        let opts = CreatePatchOptions {
            context_lines: 1,
            ..Default::default()
        };
        let patch = create_patch(old, new, &opts);
        // two separate hunks, each with one line of context on each side
        assert_eq!(patch.matches("@@").count(), 4);
    }

    #[test]
    fn all_insertion_hunk_has_zero_old_count() {
        let opts = CreatePatchOptions::default();
        let patch = create_patch("a\nb\n", "a\nX\nb\n", &opts);
        assert!(patch.contains("@@ -1,2 +1,3 @@"));
    }

    #[test]
    fn parse_round_trips_create_patch_byte_for_byte() {
        let opts = CreatePatchOptions::default();
        let text = create_patch("a\nb\nc\n", "a\nB\nc\n", &opts);
        let parsed = parse_patch(&text).unwrap();
        assert_eq!(format_patch(&parsed), text);
    }

    #[test]
    fn parse_tolerates_missing_counts_and_no_newline_marker() {
        let text = "--- a\n+++ b\n@@ -1 +1 @@\n-x\n+y\n\\ No newline at end of file\n";
        let parsed = parse_patch(text).unwrap();
        assert_eq!(parsed.hunks[0].old_count, 1);
        assert_eq!(parsed.hunks[0].new_count, 1);
        assert_eq!(parsed.hunks[0].lines.len(), 2);
    }

    #[test]
    fn parse_rejects_input_with_no_headers() {
        assert!(parse_patch("just some text\nno diff here\n").is_err());
    }

    #[test]
    fn s4_reverse_patch() {
        let forward = create_patch("a\nb\nc\n", "a\nB\nc\n", &CreatePatchOptions::default());
        let reversed = reverse_patch(&forward).unwrap();
        assert!(reversed.contains("-B"));
        assert!(reversed.contains("+b"));
    }

    #[test]
    fn reverse_patch_is_an_involution() {
        let forward = create_patch("a\nb\nc\n", "a\nB\nc\nd\n", &CreatePatchOptions::default());
        let twice = reverse_patch(&reverse_patch(&forward).unwrap()).unwrap();
        assert_eq!(twice, forward);
    }
}
