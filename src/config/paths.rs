//! `[paths]` section configuration.
//!
//! Locations of the trees the checker reads. All of them are relative to the
//! project root until [`PathsConfig::resolve`] turns them into absolute paths.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[paths]` section in assetcheck.toml.
///
/// # Example
/// ```toml
/// [paths]
/// templates = "templates"
/// static = "static"
/// output = "staticfiles"
/// manifest = "staticfiles.json"   # relative to `output`
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Template directory scanned for `{% static %}` tags.
    #[serde(default = "defaults::paths::templates")]
    #[educe(Default = defaults::paths::templates())]
    pub templates: PathBuf,

    /// Raw asset source directory.
    #[serde(rename = "static", default = "defaults::paths::source")]
    #[educe(Default = defaults::paths::source())]
    pub source: PathBuf,

    /// Collected output directory holding the hashed files.
    #[serde(default = "defaults::paths::output")]
    #[educe(Default = defaults::paths::output())]
    pub output: PathBuf,

    /// Manifest document, relative to `output`.
    #[serde(default = "defaults::paths::manifest")]
    #[educe(Default = defaults::paths::manifest())]
    pub manifest: PathBuf,
}

impl PathsConfig {
    /// Resolve every path against `root` and normalize it to an absolute path.
    ///
    /// The manifest is resolved against the (already resolved) output
    /// directory; an absolute manifest path is kept as-is.
    pub fn resolve(&mut self, root: &Path) {
        self.templates = normalize_path(&root.join(&self.templates));
        self.source = normalize_path(&root.join(&self.source));
        self.output = normalize_path(&root.join(&self.output));
        self.manifest = normalize_path(&self.output.join(&self.manifest));
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        // For non-existent paths, manually make them absolute
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}
