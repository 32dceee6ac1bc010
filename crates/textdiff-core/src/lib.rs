//! Line/word/char diffing, unified-diff patch serialization and fuzzy
//! application, and three-way merge with conflict detection.
//!
//! The crate is organized by pipeline stage: [`text`] normalizes and splits
//! raw input, [`lcs`] is the shared alignment primitive, [`diff`] turns
//! aligned sequences into an [`types::EditScript`], [`patch`] serializes and
//! parses the unified-diff text format, [`apply`] replays a parsed patch
//! against a buffer, and [`merge`] reconciles two descendants of a common
//! base. None of these stages hold state across calls; every operation takes
//! its inputs and returns a plain value.

pub mod apply;
pub mod diff;
pub mod error;
pub mod lcs;
pub mod merge;
pub mod patch;
pub mod text;
pub mod types;

pub use apply::apply_patch;
pub use diff::{diff_chars, diff_lines, diff_words};
pub use error::TextDiffError;
pub use merge::{extract_conflicts, has_conflicts, merge3, resolve_conflict};
pub use patch::{create_patch, parse_patch, reverse_patch};
pub use text::{get_stats, is_binary, normalize_line_endings, split_lines};
pub use types::{
    ApplyResult, ConflictRegion, ConflictStyle, CreatePatchOptions, DiffOptions, EditHunk, EditOp,
    EditScript, MergeOptions, MergeResult, ParsedPatch, PatchHunk, PatchLine, Stats,
};
