use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use textdiff_core::types::{ConflictStyle, CreatePatchOptions, DiffOptions, MergeOptions};

#[derive(Parser)]
#[command(name = "textdiff", about = "Line/word/char diff, unified-diff patch, and three-way merge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Line-level diff of two files
    DiffLines {
        old: PathBuf,
        new: PathBuf,
        #[arg(long)]
        ignore_whitespace: bool,
        #[arg(long)]
        ignore_blank_lines: bool,
    },
    /// Word-level diff of two files
    DiffWords { old: PathBuf, new: PathBuf },
    /// Character-level diff of two files
    DiffChars { old: PathBuf, new: PathBuf },
    /// Serialize a unified diff between two files
    CreatePatch {
        old: PathBuf,
        new: PathBuf,
        #[arg(long, default_value = "a")]
        old_label: String,
        #[arg(long, default_value = "b")]
        new_label: String,
        #[arg(long, default_value_t = 3)]
        context: usize,
    },
    /// Parse a unified-diff file into its structured form
    ParsePatch { patch: PathBuf },
    /// Apply a unified-diff file to a source file
    ApplyPatch { file: PathBuf, patch: PathBuf },
    /// Swap the direction of a unified-diff file
    ReversePatch { patch: PathBuf },
    /// Reconcile two descendants of a common base
    Merge {
        base: PathBuf,
        ours: PathBuf,
        theirs: PathBuf,
        #[arg(long, value_enum, default_value_t = ConflictStyleArg::Merge)]
        style: ConflictStyleArg,
        #[arg(long, default_value = "ours")]
        ours_label: String,
        #[arg(long, default_value = "theirs")]
        theirs_label: String,
        #[arg(long, default_value = "base")]
        base_label: String,
    },
    /// Check whether a file contains conflict markers
    HasConflicts { file: PathBuf },
    /// Extract every conflict region from a merged file
    ExtractConflicts { file: PathBuf },
    /// Resolve one conflict region in a merged file
    ResolveConflict {
        file: PathBuf,
        index: usize,
        /// "ours", "theirs", "base", or literal replacement text
        resolution: String,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum ConflictStyleArg {
    Merge,
    Diff3,
}

impl From<ConflictStyleArg> for ConflictStyle {
    fn from(v: ConflictStyleArg) -> Self {
        match v {
            ConflictStyleArg::Merge => ConflictStyle::Merge,
            ConflictStyleArg::Diff3 => ConflictStyle::Diff3,
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::DiffLines {
            old,
            new,
            ignore_whitespace,
            ignore_blank_lines,
        } => {
            let old_text = std::fs::read_to_string(old)?;
            let new_text = std::fs::read_to_string(new)?;
            let script = textdiff_core::diff_lines(
                &old_text,
                &new_text,
                DiffOptions {
                    ignore_whitespace: *ignore_whitespace,
                    ignore_blank_lines: *ignore_blank_lines,
                    ..Default::default()
                },
            );
            print_json(&script, cli.pretty)?;
        }
        Commands::DiffWords { old, new } => {
            let old_text = std::fs::read_to_string(old)?;
            let new_text = std::fs::read_to_string(new)?;
            print_json(&textdiff_core::diff_words(&old_text, &new_text), cli.pretty)?;
        }
        Commands::DiffChars { old, new } => {
            let old_text = std::fs::read_to_string(old)?;
            let new_text = std::fs::read_to_string(new)?;
            print_json(&textdiff_core::diff_chars(&old_text, &new_text), cli.pretty)?;
        }
        Commands::CreatePatch {
            old,
            new,
            old_label,
            new_label,
            context,
        } => {
            let old_text = std::fs::read_to_string(old)?;
            let new_text = std::fs::read_to_string(new)?;
            let patch = textdiff_core::create_patch(
                &old_text,
                &new_text,
                &CreatePatchOptions {
                    old_file: old_label.clone(),
                    new_file: new_label.clone(),
                    context_lines: *context,
                },
            );
            print!("{patch}");
        }
        Commands::ParsePatch { patch } => {
            let text = std::fs::read_to_string(patch)?;
            let parsed = textdiff_core::parse_patch(&text)?;
            print_json(&parsed, cli.pretty)?;
        }
        Commands::ApplyPatch { file, patch } => {
            let content = std::fs::read_to_string(file)?;
            let patch_text = std::fs::read_to_string(patch)?;
            let result = textdiff_core::apply_patch(&content, &patch_text);
            if !result.success {
                tracing::warn!(hunks_failed = result.hunks_failed, "patch applied with failures");
            }
            print_json(&result, cli.pretty)?;
        }
        Commands::ReversePatch { patch } => {
            let text = std::fs::read_to_string(patch)?;
            print!("{}", textdiff_core::reverse_patch(&text)?);
        }
        Commands::Merge {
            base,
            ours,
            theirs,
            style,
            ours_label,
            theirs_label,
            base_label,
        } => {
            let base_text = std::fs::read_to_string(base)?;
            let ours_text = std::fs::read_to_string(ours)?;
            let theirs_text = std::fs::read_to_string(theirs)?;
            let options = MergeOptions {
                conflict_style: (*style).into(),
                ours_label: ours_label.clone(),
                theirs_label: theirs_label.clone(),
                base_label: base_label.clone(),
            };
            let result = textdiff_core::merge3(&base_text, &ours_text, &theirs_text, &options);
            if result.has_conflicts {
                tracing::info!(conflicts = result.conflicts.len(), "merge produced conflicts");
            }
            print_json(&result, cli.pretty)?;
        }
        Commands::HasConflicts { file } => {
            let text = std::fs::read_to_string(file)?;
            print_json(&textdiff_core::has_conflicts(&text), cli.pretty)?;
        }
        Commands::ExtractConflicts { file } => {
            let text = std::fs::read_to_string(file)?;
            print_json(&textdiff_core::extract_conflicts(&text), cli.pretty)?;
        }
        Commands::ResolveConflict {
            file,
            index,
            resolution,
        } => {
            let text = std::fs::read_to_string(file)?;
            print!("{}", textdiff_core::resolve_conflict(&text, *index, resolution));
        }
    }

    Ok(())
}
