//! Core data types shared across the diff, patch, and merge modules.
//!
//! Every structure here is a plain value produced by one operation and
//! consumed by the next (§3 of the design: "no structure survives across
//! calls"). None of them hold borrowed state or interior mutability.
//!
//! Every type here also derives `Serialize`/`Deserialize` so a JSON-in,
//! JSON-out adapter can round-trip them directly; `Option` fields that are
//! inapplicable for a given variant are omitted from the wire form rather
//! than serialized as `null`.

use serde::{Deserialize, Serialize};

/// One of the three edit operations. There is no "replace" variant; a
/// replacement is encoded as a `Delete` immediately followed by an `Insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Equal,
    Insert,
    Delete,
}

/// One record in an edit script.
///
/// For line-level diffs, `old_start`/`new_start`/`old_count`/`new_count` are
/// populated according to `op`: `Equal` carries both sides, `Delete` only
/// `old_*`, `Insert` only `new_*`. Word- and char-level diffs never populate
/// positional fields — `content` there is the concatenation of one or more
/// coalesced tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditHunk {
    pub op: EditOp,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_count: Option<usize>,
}

impl EditHunk {
    pub(crate) fn equal_line(old_start: usize, new_start: usize, content: &str) -> Self {
        Self {
            op: EditOp::Equal,
            content: content.to_string(),
            old_start: Some(old_start),
            old_count: Some(1),
            new_start: Some(new_start),
            new_count: Some(1),
        }
    }

    pub(crate) fn delete_line(old_start: usize, content: &str) -> Self {
        Self {
            op: EditOp::Delete,
            content: content.to_string(),
            old_start: Some(old_start),
            old_count: Some(1),
            new_start: None,
            new_count: None,
        }
    }

    pub(crate) fn insert_line(new_start: usize, content: &str) -> Self {
        Self {
            op: EditOp::Insert,
            content: content.to_string(),
            old_start: None,
            old_count: None,
            new_start: Some(new_start),
            new_count: Some(1),
        }
    }

    pub(crate) fn token(op: EditOp, content: String) -> Self {
        Self {
            op,
            content,
            old_start: None,
            old_count: None,
            new_start: None,
            new_count: None,
        }
    }
}

/// Addition/deletion/change counts over an [`EditScript`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub additions: usize,
    pub deletions: usize,
    pub changes: usize,
}

impl Stats {
    /// Compute stats over a finished hunk list. `changes` is `min(additions, deletions)`,
    /// counted over whatever granularity `hunks` already represents (one hunk per line,
    /// or one hunk per coalesced run of tokens).
    pub fn from_hunks(hunks: &[EditHunk]) -> Self {
        let additions = hunks.iter().filter(|h| h.op == EditOp::Insert).count();
        let deletions = hunks.iter().filter(|h| h.op == EditOp::Delete).count();
        Self {
            additions,
            deletions,
            changes: additions.min(deletions),
        }
    }
}

/// An ordered sequence of edit hunks plus its stats.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditScript {
    pub hunks: Vec<EditHunk>,
    pub stats: Stats,
}

impl EditScript {
    pub(crate) fn new(hunks: Vec<EditHunk>) -> Self {
        let stats = Stats::from_hunks(&hunks);
        Self { hunks, stats }
    }
}

/// Options for [`crate::diff::diff_lines`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Compare lines under `trim()`; emitted content is always the original line.
    pub ignore_whitespace: bool,
    /// Lines whose trimmed form is empty are free matches during alignment.
    pub ignore_blank_lines: bool,
    /// Leading/trailing `Equal` hunks retained around a change region when the
    /// result feeds the unified-diff serializer. `diff_lines` itself always
    /// returns the full, untrimmed script; only [`crate::patch::create_patch`]
    /// windows by this value (see DESIGN.md for the rationale).
    pub context_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_blank_lines: false,
            context_lines: 3,
        }
    }
}

/// One line within a [`PatchHunk`]: an op marker plus content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchLine {
    pub marker: char,
    pub content: String,
}

/// A serialized slice of an edit script: the unified-diff `@@ ... @@` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchHunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<PatchLine>,
}

/// A parsed unified diff for a single file pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedPatch {
    pub old_file: String,
    pub new_file: String,
    pub hunks: Vec<PatchHunk>,
}

/// Options for [`crate::patch::create_patch`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePatchOptions {
    pub old_file: String,
    pub new_file: String,
    pub context_lines: usize,
}

impl Default for CreatePatchOptions {
    fn default() -> Self {
        Self {
            old_file: "a".to_string(),
            new_file: "b".to_string(),
            context_lines: 3,
        }
    }
}

/// Outcome of [`crate::apply::apply_patch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub content: String,
    pub success: bool,
    pub hunks_applied: usize,
    pub hunks_failed: usize,
    pub errors: Vec<String>,
}

/// Conflict marker style for [`crate::merge::merge3`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStyle {
    Merge,
    Diff3,
}

/// Options for [`crate::merge::merge3`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub conflict_style: ConflictStyle,
    pub ours_label: String,
    pub theirs_label: String,
    pub base_label: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            conflict_style: ConflictStyle::Merge,
            ours_label: "ours".to_string(),
            theirs_label: "theirs".to_string(),
            base_label: "base".to_string(),
        }
    }
}

/// A `<<<<<<< ... >>>>>>>` block in a merged buffer.
///
/// `start_line`/`end_line` are 1-based lines within the *merged output*, not
/// within any input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRegion {
    pub base: String,
    pub ours: String,
    pub theirs: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// Outcome of [`crate::merge::merge3`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub merged: String,
    pub conflicts: Vec<ConflictRegion>,
    pub has_conflicts: bool,
}
