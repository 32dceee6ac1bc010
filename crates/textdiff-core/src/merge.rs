//! Three-way merge: computes change sets from a common base to two
//! descendants, classifies each base region, and emits a merged buffer with
//! conflict markers (§4.6).
//!
//! The change-region computation follows the design notes' recommended
//! strategy: compute `base→ours` and `base→theirs` as `{base_range →
//! replacement_lines}` maps, then walk the base reconciling the two maps by
//! whether their ranges are disjoint, coincident-identical,
//! coincident-different, or overlapping.

use crate::diff::diff_lines;
use crate::text::split_lines;
use crate::types::{ConflictRegion, ConflictStyle, DiffOptions, EditOp, MergeOptions, MergeResult};

/// A single contiguous change from `base` to one side, expressed as the base
/// range it replaces and the replacement lines.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Change {
    base_start: usize,
    base_end: usize,
    replacement: Vec<String>,
}

fn compute_changes(base: &str, other: &str) -> Vec<Change> {
    let script = diff_lines(base, other, DiffOptions::default());
    let mut changes = Vec::new();
    let mut base_cursor = 0usize;
    let mut i = 0usize;
    let hunks = &script.hunks;
    while i < hunks.len() {
        if hunks[i].op == EditOp::Equal {
            base_cursor += 1;
            i += 1;
            continue;
        }
        let start = base_cursor;
        let mut replacement = Vec::new();
        while i < hunks.len() && hunks[i].op != EditOp::Equal {
            match hunks[i].op {
                EditOp::Delete => base_cursor += 1,
                EditOp::Insert => replacement.push(hunks[i].content.clone()),
                EditOp::Equal => unreachable!(),
            }
            i += 1;
        }
        changes.push(Change {
            base_start: start,
            base_end: base_cursor,
            replacement,
        });
    }
    changes
}

/// Whether two base ranges (half-open, possibly zero-length for a pure
/// insertion point) overlap.
fn ranges_overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    let (a0, a1) = a;
    let (b0, b1) = b;
    if a0 == a1 && b0 == b1 {
        return a0 == b0;
    }
    if a0 == a1 {
        return b0 <= a0 && a0 < b1;
    }
    if b0 == b1 {
        return a0 <= b0 && b0 < a1;
    }
    a0 < b1 && b0 < a1
}

enum EventKind {
    OnlyOurs(Vec<String>),
    OnlyTheirs(Vec<String>),
    Identical(Vec<String>),
    Conflict {
        base_range: (usize, usize),
        ours: Vec<String>,
        theirs: Vec<String>,
    },
}

struct Event {
    start: usize,
    end: usize,
    kind: EventKind,
}

fn generate_events(ours: &[Change], theirs: &[Change]) -> Vec<Event> {
    let mut events = Vec::new();
    let (mut io, mut it) = (0usize, 0usize);
    loop {
        match (ours.get(io), theirs.get(it)) {
            (Some(oc), Some(tc)) => {
                let or = (oc.base_start, oc.base_end);
                let tr = (tc.base_start, tc.base_end);
                if ranges_overlap(or, tr) {
                    let kind = if or == tr {
                        if oc.replacement == tc.replacement {
                            EventKind::Identical(oc.replacement.clone())
                        } else {
                            EventKind::Conflict {
                                base_range: or,
                                ours: oc.replacement.clone(),
                                theirs: tc.replacement.clone(),
                            }
                        }
                    } else {
                        let span = (or.0.min(tr.0), or.1.max(tr.1));
                        EventKind::Conflict {
                            base_range: span,
                            ours: oc.replacement.clone(),
                            theirs: tc.replacement.clone(),
                        }
                    };
                    let (start, end) = match &kind {
                        EventKind::Conflict { base_range, .. } => *base_range,
                        _ => or,
                    };
                    events.push(Event { start, end, kind });
                    io += 1;
                    it += 1;
                } else if oc.base_start <= tc.base_start {
                    events.push(Event {
                        start: oc.base_start,
                        end: oc.base_end,
                        kind: EventKind::OnlyOurs(oc.replacement.clone()),
                    });
                    io += 1;
                } else {
                    events.push(Event {
                        start: tc.base_start,
                        end: tc.base_end,
                        kind: EventKind::OnlyTheirs(tc.replacement.clone()),
                    });
                    it += 1;
                }
            }
            (Some(oc), None) => {
                events.push(Event {
                    start: oc.base_start,
                    end: oc.base_end,
                    kind: EventKind::OnlyOurs(oc.replacement.clone()),
                });
                io += 1;
            }
            (None, Some(tc)) => {
                events.push(Event {
                    start: tc.base_start,
                    end: tc.base_end,
                    kind: EventKind::OnlyTheirs(tc.replacement.clone()),
                });
                it += 1;
            }
            (None, None) => break,
        }
    }
    events
}

/// Reconcile `ours` and `theirs` against their common `base`.
pub fn merge3(base: &str, ours: &str, theirs: &str, options: &MergeOptions) -> MergeResult {
    let base_lines = split_lines(base);
    let changes_ours = compute_changes(base, ours);
    let changes_theirs = compute_changes(base, theirs);
    let events = generate_events(&changes_ours, &changes_theirs);

    let mut out: Vec<String> = Vec::new();
    let mut conflicts = Vec::new();
    let mut bi = 0usize;

    for ev in events {
        if ev.start > bi {
            out.extend(base_lines[bi..ev.start].iter().map(|s| s.to_string()));
        }
        match ev.kind {
            EventKind::OnlyOurs(repl) | EventKind::OnlyTheirs(repl) | EventKind::Identical(repl) => {
                out.extend(repl);
            }
            EventKind::Conflict {
                base_range,
                ours: ours_repl,
                theirs: theirs_repl,
            } => {
                let start_line = out.len() + 1;
                out.push(format!("<<<<<<< {}", options.ours_label));
                out.extend(ours_repl.clone());
                if options.conflict_style == ConflictStyle::Diff3 {
                    out.push(format!("||||||| {}", options.base_label));
                    out.extend(
                        base_lines[base_range.0..base_range.1]
                            .iter()
                            .map(|s| s.to_string()),
                    );
                }
                out.push("=======".to_string());
                out.extend(theirs_repl.clone());
                out.push(format!(">>>>>>> {}", options.theirs_label));
                let end_line = out.len();
                conflicts.push(ConflictRegion {
                    base: base_lines[base_range.0..base_range.1].join("\n"),
                    ours: ours_repl.join("\n"),
                    theirs: theirs_repl.join("\n"),
                    start_line,
                    end_line,
                });
            }
        }
        bi = ev.end;
    }
    if bi < base_lines.len() {
        out.extend(base_lines[bi..].iter().map(|s| s.to_string()));
    }

    let any_trailing_newline = base.ends_with('\n') || ours.ends_with('\n') || theirs.ends_with('\n');
    let mut merged = out.join("\n");
    if !out.is_empty() && any_trailing_newline {
        merged.push('\n');
    }

    tracing::debug!(conflicts = conflicts.len(), "computed three-way merge");

    MergeResult {
        has_conflicts: !conflicts.is_empty(),
        merged,
        conflicts,
    }
}

/// True iff `s` contains all three conflict marker prefixes. A stricter scan
/// (requiring them in order, paired) is not necessary for this predicate.
pub fn has_conflicts(s: &str) -> bool {
    s.contains("<<<<<<<") && s.contains("=======") && s.contains(">>>>>>>")
}

/// Scan `s` for `<<<<<<< ... ||||||| ... ======= ... >>>>>>>` blocks and
/// return one [`ConflictRegion`] per well-formed marker in file order.
/// Partial/malformed regions (a `<<<<<<<` with no matching `>>>>>>>`) are
/// skipped rather than causing a failure.
pub fn extract_conflicts(s: &str) -> Vec<ConflictRegion> {
    let all: Vec<&str> = s.lines().collect();
    let mut regions = Vec::new();
    let mut i = 0usize;
    while i < all.len() {
        if !all[i].starts_with("<<<<<<<") {
            i += 1;
            continue;
        }
        let start_line = i + 1;
        let mut j = i + 1;
        let mut ours = Vec::new();
        while j < all.len() && !all[j].starts_with("|||||||") && !all[j].starts_with("=======") {
            ours.push(all[j]);
            j += 1;
        }
        let mut base = Vec::new();
        if j < all.len() && all[j].starts_with("|||||||") {
            j += 1;
            while j < all.len() && !all[j].starts_with("=======") {
                base.push(all[j]);
                j += 1;
            }
        }
        if j >= all.len() || !all[j].starts_with("=======") {
            i += 1;
            continue;
        }
        j += 1;
        let mut theirs = Vec::new();
        while j < all.len() && !all[j].starts_with(">>>>>>>") {
            theirs.push(all[j]);
            j += 1;
        }
        if j >= all.len() {
            i += 1;
            continue;
        }
        let end_line = j + 1;
        regions.push(ConflictRegion {
            base: base.join("\n"),
            ours: ours.join("\n"),
            theirs: theirs.join("\n"),
            start_line,
            end_line,
        });
        i = j + 1;
    }
    regions
}

/// Replace the `index`-th conflict region in `s` with `ours`/`theirs`/`base`
/// (matching `resolution`) or, for any other value, with `resolution` itself
/// taken literally as the replacement text. An out-of-range `index` returns
/// `s` unchanged.
pub fn resolve_conflict(s: &str, index: usize, resolution: &str) -> String {
    let regions = extract_conflicts(s);
    let Some(region) = regions.get(index) else {
        return s.to_string();
    };
    let replacement = match resolution {
        "ours" => region.ours.clone(),
        "theirs" => region.theirs.clone(),
        "base" => region.base.clone(),
        other => other.to_string(),
    };

    let had_trailing_newline = s.ends_with('\n');
    let all: Vec<&str> = s.lines().collect();
    let mut out: Vec<&str> = Vec::new();
    out.extend_from_slice(&all[0..region.start_line - 1]);
    let repl_lines: Vec<&str> = if replacement.is_empty() {
        Vec::new()
    } else {
        replacement.split('\n').collect()
    };
    out.extend_from_slice(&repl_lines);
    out.extend_from_slice(&all[region.end_line..]);

    let mut result = out.join("\n");
    if had_trailing_newline && !out.is_empty() {
        result.push('\n');
    }
    result
}
