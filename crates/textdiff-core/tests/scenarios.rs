//! End-to-end scenarios spanning diff, patch, and merge together.
//!
//! Each inline `#[cfg(test)]` module already pins its own component's
//! scenario (`s1_*`/`s2_*`/etc. in `diff.rs`, `patch.rs`, `apply.rs`,
//! `merge.rs`); this file chains components the way a caller would, so a
//! regression in how two stages compose (not just within one stage) shows up
//! here.

use textdiff_core::types::{ConflictStyle, CreatePatchOptions, MergeOptions};
use textdiff_core::{apply_patch, create_patch, extract_conflicts, has_conflicts, merge3, reverse_patch};

#[test]
fn full_round_trip_diff_patch_apply_reverse() {
    let old = "fn main() {\n    println!(\"hi\");\n}\n";
    let new = "fn main() {\n    println!(\"hello, world\");\n}\n";

    let patch = create_patch(old, new, &CreatePatchOptions::default());
    let applied = apply_patch(old, &patch);
    assert!(applied.success);
    assert_eq!(applied.content, new);

    let reversed = reverse_patch(&patch).unwrap();
    let restored = apply_patch(new, &reversed);
    assert!(restored.success);
    assert_eq!(restored.content, old);
}

#[test]
fn merge_then_resolve_every_conflict_as_ours_reproduces_ours() {
    let base = "alpha\nbeta\ngamma\ndelta\n";
    let ours = "ALPHA\nbeta\ngamma\nDELTA\n";
    let theirs = "alpha2\nbeta\ngamma\ndelta2\n";

    let result = merge3(base, ours, theirs, &MergeOptions::default());
    assert!(result.has_conflicts);

    let mut resolved = result.merged.clone();
    loop {
        let regions = extract_conflicts(&resolved);
        if regions.is_empty() {
            break;
        }
        resolved = textdiff_core::resolve_conflict(&resolved, 0, "ours");
    }
    assert!(!has_conflicts(&resolved));
    assert_eq!(resolved, ours);
}

#[test]
fn diff3_conflict_region_carries_base_text_and_survives_extraction() {
    let result = merge3(
        "shared\n",
        "ours-change\n",
        "theirs-change\n",
        &MergeOptions {
            conflict_style: ConflictStyle::Diff3,
            ..Default::default()
        },
    );
    assert!(result.has_conflicts);
    let regions = extract_conflicts(&result.merged);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].base, "shared");
    assert_eq!(regions[0].ours, "ours-change");
    assert_eq!(regions[0].theirs, "theirs-change");
}

#[test]
fn create_patch_then_parse_then_reformat_is_byte_identical() {
    let old = "one\ntwo\nthree\nfour\nfive\n";
    let new = "one\nTWO\nthree\nFOUR\nfive\n";
    let text = create_patch(old, new, &CreatePatchOptions::default());
    let parsed = textdiff_core::parse_patch(&text).unwrap();
    assert_eq!(textdiff_core::patch::format_patch(&parsed), text);
}

#[test]
fn multi_hunk_patch_applies_cleanly_to_an_unrelated_copy() {
    let old = "import os\n1\n2\n3\n4\n5\n6\n7\n8\ndef other():\n    print(2)\n";
    let new = "import os\nimport sys\n1\n2\n3\n4\n5\n6\n7\n8\ndef other():\n    print(3)\n";
    let patch = create_patch(old, new, &CreatePatchOptions::default());
    let result = apply_patch(old, &patch);
    assert!(result.success);
    assert_eq!(result.content, new);
    assert_eq!(result.hunks_applied, 2);
}
