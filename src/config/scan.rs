//! `[scan]` section configuration.
//!
//! Controls which template documents are scanned, which tag is recognized,
//! and which files are left out of the inventories.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[scan]` section in assetcheck.toml.
///
/// # Example
/// ```toml
/// [scan]
/// extensions = ["html", "txt"]
/// tag = "static"
/// ignore = [".DS_Store", "staticfiles.json"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    /// Extensions (without the dot) of template documents to scan.
    #[serde(default = "defaults::scan::extensions")]
    #[educe(Default = defaults::scan::extensions())]
    pub extensions: Vec<String>,

    /// Template tag whose quoted argument is an asset path.
    #[serde(default = "defaults::scan::tag")]
    #[educe(Default = defaults::scan::tag())]
    pub tag: String,

    /// File names or relative paths left out of both inventories.
    /// Ignored files are never reported as unused.
    #[serde(default = "defaults::scan::ignore")]
    #[educe(Default = defaults::scan::ignore())]
    pub ignore: Vec<String>,
}
