//! `[check]` section configuration.
//!
//! A [`CheckPolicy`] selects which reconciliations run. The named modes
//! (`references`, `manifest`, `strict`) are presets; `check` reads the
//! section from assetcheck.toml.

use super::defaults;
use crate::cli::CheckArgs;
use clap::ValueEnum;
use educe::Educe;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enums
// ============================================================================

/// Where template references must resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Every reference must be a manifest key.
    #[default]
    Manifest,
    /// Every reference must exist in the static or the output directory.
    Filesystem,
    /// Don't check references.
    #[serde(rename = "none")]
    #[value(name = "none")]
    Off,
}

// ============================================================================
// CheckPolicy
// ============================================================================

/// `[check]` section in assetcheck.toml.
///
/// # Example
/// ```toml
/// [check]
/// references = "filesystem"
/// unused = true
/// require_manifest = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CheckPolicy {
    /// How template references are resolved.
    #[serde(default = "defaults::check::references")]
    #[educe(Default = defaults::check::references())]
    pub references: ReferenceMode,

    /// Report source and collected files no template references.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub unused: bool,

    /// A missing manifest is a fatal error instead of a skipped check.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub require_manifest: bool,

    /// Every manifest key must exist in the output directory.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub manifest_entries: bool,

    /// Every hashed manifest value must exist in the output directory.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub hashed_targets: bool,
}

impl CheckPolicy {
    /// References must exist under `static/` or `staticfiles/`.
    pub const fn references() -> Self {
        Self {
            references: ReferenceMode::Filesystem,
            unused: false,
            require_manifest: false,
            manifest_entries: false,
            hashed_targets: false,
        }
    }

    /// Manifest keys must exist on disk and cover every reference.
    pub const fn manifest() -> Self {
        Self {
            references: ReferenceMode::Manifest,
            unused: false,
            require_manifest: true,
            manifest_entries: true,
            hashed_targets: false,
        }
    }

    /// Unused assets and manifest entries missing their hashed file.
    pub const fn strict() -> Self {
        Self {
            references: ReferenceMode::Off,
            unused: true,
            require_manifest: true,
            manifest_entries: false,
            hashed_targets: true,
        }
    }

    /// Whether any enabled check reads the manifest.
    pub const fn uses_manifest(&self) -> bool {
        matches!(self.references, ReferenceMode::Manifest)
            || self.manifest_entries
            || self.hashed_targets
            || self.unused
    }

    /// Apply `check` subcommand overrides.
    pub fn update_with_args(&mut self, args: &CheckArgs) {
        if let Some(references) = args.references {
            self.references = references;
        }
        update_option(&mut self.unused, args.unused);
        update_option(&mut self.require_manifest, args.require_manifest);
        update_option(&mut self.manifest_entries, args.manifest_entries);
        update_option(&mut self.hashed_targets, args.hashed_targets);
    }
}

/// Update config option if CLI value is provided
fn update_option(option: &mut bool, cli_option: Option<bool>) {
    if let Some(value) = cli_option {
        *option = value;
    }
}
