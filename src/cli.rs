//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::config::ReferenceMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Static asset reference checker
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: assetcheck.toml)
    #[arg(short = 'C', long, default_value = "assetcheck.toml")]
    pub config: PathBuf,

    /// Templates directory path (relative to project root)
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Static source directory path (relative to project root)
    #[arg(short, long = "static")]
    pub source: Option<PathBuf>,

    /// Collected output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Manifest file path (relative to the output directory)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Print skipped documents and other notes
    #[arg(short, long)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Overrides for the `[check]` section, used by `check`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// How template references are resolved
    #[arg(long, value_enum)]
    pub references: Option<ReferenceMode>,

    /// Report files nobody references
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub unused: Option<bool>,

    /// Fail when the manifest is absent
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub require_manifest: Option<bool>,

    /// Check that every manifest key exists in the output directory
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub manifest_entries: Option<bool>,

    /// Check that every hashed manifest value exists in the output directory
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub hashed_targets: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check that template references exist in the static or output directory
    References,

    /// Check manifest entries on disk and template references against the manifest
    Manifest,

    /// Report unused assets and manifest entries missing their hashed file
    Strict,

    /// Run the checks configured in the `[check]` section
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

impl Commands {
    /// Line printed when a check finds nothing.
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::References => "All static references resolved.",
            Self::Manifest => "Static manifest integrity OK.",
            Self::Strict => "Strict static asset check: all good.",
            Self::Check { .. } => "Static asset check: all good.",
        }
    }
}
