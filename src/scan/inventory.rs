//! Recursive file inventories of the static and output directories.

use std::{collections::BTreeSet, path::Path};
use walkdir::WalkDir;

/// Collect every regular file under `root` as a `/`-separated path relative to `root`.
///
/// Symlinks are followed, so a linked file is listed under its link path.
/// Dangling links and link cycles are skipped. A missing root yields an empty set. Entries whose file name or relative
/// path appears in `ignore` are left out.
pub fn list_files(root: &Path, ignore: &[String]) -> BTreeSet<String> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let rel = e.path().strip_prefix(root).ok()?;
            let rel = to_slash(rel)?;
            let name = e.file_name().to_str().unwrap_or_default();
            let ignored = ignore.iter().any(|i| i == name || *i == rel);
            (!ignored).then_some(rel)
        })
        .collect()
}

/// Render a relative path with `/` separators. Non-UTF-8 paths are dropped.
fn to_slash(path: &Path) -> Option<String> {
    let parts: Option<Vec<&str>> = path.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}
