//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn source() -> PathBuf {
        "static".into()
    }

    pub fn output() -> PathBuf {
        "staticfiles".into()
    }

    pub fn manifest() -> PathBuf {
        "staticfiles.json".into()
    }
}

// ============================================================================
// [scan] Section Defaults
// ============================================================================

pub mod scan {
    pub fn extensions() -> Vec<String> {
        vec!["html".into()]
    }

    pub fn tag() -> String {
        "static".into()
    }

    pub fn ignore() -> Vec<String> {
        vec![".DS_Store".into()]
    }
}

// ============================================================================
// [check] Section Defaults
// ============================================================================

pub mod check {
    use super::super::ReferenceMode;

    pub fn references() -> ReferenceMode {
        ReferenceMode::Manifest
    }
}
