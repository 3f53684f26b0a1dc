//! Extraction of `{% static '<path>' %}` references from template documents.

use crate::config::ScanConfig;
use anyhow::Result;
use regex::Regex;
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// References collected from one template tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateScan {
    /// Every referenced logical path, deduplicated and sorted.
    pub references: BTreeSet<String>,
    /// Number of documents that were read and searched.
    pub documents: usize,
    /// Documents that could not be read or were not valid UTF-8.
    pub skipped: Vec<PathBuf>,
}

/// Finds static tags in template markup.
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    pattern: Regex,
    extensions: Vec<String>,
}

impl ReferenceScanner {
    /// Build a scanner recognizing `{% <tag> '...' %}` in files with the given extensions.
    pub fn new(tag: &str, extensions: &[String]) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r#"\{{%\s*{}\s+['"]([^'"]+)['"]\s*%\}}"#,
            regex::escape(tag)
        ))?;
        Ok(Self {
            pattern,
            extensions: extensions.to_vec(),
        })
    }

    pub fn from_config(scan: &ScanConfig) -> Result<Self> {
        Self::new(&scan.tag, &scan.extensions)
    }

    /// Collect the quoted path of every tag in `text`.
    pub fn extract<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Whether `path` has one of the scanned extensions.
    fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }

    /// Scan every template document under `root`, following symlinks.
    ///
    /// Documents that can't be read or decoded are recorded in
    /// [`TemplateScan::skipped`] and otherwise ignored.
    pub fn scan(&self, root: &Path) -> TemplateScan {
        let mut scan = TemplateScan::default();

        let documents = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| self.is_template(path));

        for path in documents {
            let Some(text) = fs::read(&path).ok().and_then(|b| String::from_utf8(b).ok()) else {
                scan.skipped.push(path);
                continue;
            };
            scan.documents += 1;
            scan.references.extend(self.extract(&text).map(str::to_owned));
        }

        scan
    }
}
