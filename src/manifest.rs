//! Loading of the build manifest (`staticfiles.json`).
//!
//! The manifest maps logical asset paths to hashed output paths:
//!
//! ```json
//! {
//!   "paths": { "css/app.css": "css/app.55e7cbb9ba48.css" },
//!   "version": "1.1"
//! }
//! ```
//!
//! Members other than `paths` are ignored.

use serde::Deserialize;
use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Manifest-related errors
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("No manifest found at `{0}`. Did you run collectstatic?")]
    NotFound(PathBuf),

    #[error("Failed to read manifest `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse manifest `{0}`")]
    Parse(PathBuf, #[source] serde_json::Error),
}

/// Logical path → hashed output path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
}

impl Manifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ManifestError::NotFound(path.to_path_buf()),
            _ => ManifestError::Read(path.to_path_buf(), err),
        })?;
        Self::from_str(&content).map_err(|err| ManifestError::Parse(path.to_path_buf(), err))
    }

    /// Like [`Manifest::load`], but a missing file is `Ok(None)`.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ManifestError> {
        match Self::load(path) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(ManifestError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Logical paths.
    pub fn keys(&self) -> BTreeSet<String> {
        self.paths.keys().cloned().collect()
    }

    /// Iterate `(logical, hashed)` pairs in logical-path order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}
