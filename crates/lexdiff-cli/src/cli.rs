use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lexdiff",
    about = "Line-level diffs between two versions of legal texts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML render configuration (defaults to ./lexdiff.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutArg {
    Unified,
    SideBySide,
}

/// Overrides for values from the render configuration.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    #[arg(long, global = true)]
    pub layout: Option<LayoutArg>,

    /// Render at most this many entries
    #[arg(long, global = true, conflicts_with = "all")]
    pub max_entries: Option<usize>,

    /// Render every entry, ignoring the configured cap
    #[arg(long, global = true)]
    pub all: bool,

    #[arg(long, global = true)]
    pub column_width: Option<usize>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diff two files
    Diff(DiffArgs),
    /// Diff every file under two directories
    Compare(CompareArgs),
    /// Render `git diff` output
    Patch(PatchArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}

#[derive(Args)]
pub struct CompareArgs {
    pub old_dir: PathBuf,
    pub new_dir: PathBuf,
    /// Also list files whose content did not change
    #[arg(long)]
    pub include_unchanged: bool,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Patch file; reads stdin when omitted
    pub file: Option<PathBuf>,
    /// `git diff --name-status` listing used to override entry statuses
    #[arg(long)]
    pub name_status: Option<PathBuf>,
}
