//! Checker configuration management for `assetcheck.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[paths]`   | Templates, static, output and manifest locations    |
//! | `[scan]`    | Template extensions, tag name, ignored files        |
//! | `[check]`   | Checks run by the `check` subcommand                |
//!
//! The file is optional; without it every field takes its default.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! templates = "templates"
//! static = "static"
//! output = "staticfiles"
//!
//! [scan]
//! extensions = ["html"]
//!
//! [check]
//! references = "manifest"
//! unused = true
//! ```

mod check;
mod defaults;
mod error;
mod paths;
mod scan;

pub use check::{CheckPolicy, ReferenceMode};
pub use error::ConfigError;
pub use paths::PathsConfig;
pub use scan::ScanConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use paths::normalize_path;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing assetcheck.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project root directory (set from CLI `--root`)
    #[serde(skip)]
    pub root: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Template scanning settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Checks run by the `check` subcommand
    #[serde(default)]
    pub check: CheckPolicy,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config file named on the command line, if there is one,
    /// then apply CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));

        Self::update_option(&mut self.paths.templates, cli.templates.as_ref());
        Self::update_option(&mut self.paths.source, cli.source.as_ref());
        Self::update_option(&mut self.paths.output, cli.output.as_ref());
        Self::update_option(&mut self.paths.manifest, cli.manifest.as_ref());

        self.root = normalize_path(&root);
        self.config_path = normalize_path(&self.root.join(&cli.config));
        self.paths.resolve(&self.root);

        if let Commands::Check { args } = &cli.command {
            self.check.update_with_args(args);
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// The checks to run for a subcommand.
    pub fn policy(&self, command: &Commands) -> CheckPolicy {
        match command {
            Commands::References => CheckPolicy::references(),
            Commands::Manifest => CheckPolicy::manifest(),
            Commands::Strict => CheckPolicy::strict(),
            Commands::Check { .. } => self.check,
        }
    }

    /// Validate the scan settings
    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[scan.extensions] must have at least one element".into()
            ));
        }

        if self.scan.extensions.iter().any(|ext| ext.is_empty() || ext.starts_with('.')) {
            bail!(ConfigError::Validation(
                "[scan.extensions] entries must be non-empty and written without a leading dot"
                    .into()
            ));
        }

        if self.scan.tag.is_empty() {
            bail!(ConfigError::Validation("[scan.tag] must not be empty".into()));
        }

        if self.scan.tag.chars().any(char::is_whitespace) {
            bail!(ConfigError::Validation(
                "[scan.tag] must not contain whitespace".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
