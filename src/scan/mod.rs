//! Filesystem scanning: template references and file inventories.
//!
//! ```text
//! templates/ ──► ReferenceScanner::scan() ──► TemplateScan { references }
//! static/    ──► list_files()             ──► BTreeSet<String>
//! staticfiles/ ─► list_files()            ──► BTreeSet<String>
//! ```

pub mod inventory;
pub mod templates;

pub use inventory::list_files;
pub use templates::{ReferenceScanner, TemplateScan};
