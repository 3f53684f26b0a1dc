//! Check orchestration.
//!
//! # Flow
//!
//! ```text
//! run_check(config, policy)
//!     │
//!     ├── templates/ must exist ──► CheckError::TemplatesNotFound
//!     ├── ReferenceScanner::scan() ──► referenced paths
//!     ├── Manifest::load()  (fatal when required, skipped when optional)
//!     ├── list_files()      (only for checks that need an inventory)
//!     │
//!     └── reconcile() ──► ReconciliationReport
//! ```

use crate::{
    config::{CheckPolicy, Config, ReferenceMode},
    debug,
    manifest::{Manifest, ManifestError},
    reconcile::{Inputs, ReconciliationReport, reconcile},
    scan::{ReferenceScanner, TemplateScan, list_files},
};
use anyhow::Result;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Conditions that stop a check before any report is produced.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("No templates directory found at `{0}`")]
    TemplatesNotFound(PathBuf),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Result of one check run.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub policy: CheckPolicy,
    pub scan: TemplateScan,
    pub report: ReconciliationReport,
}

impl CheckOutcome {
    pub fn exit_code(&self) -> u8 {
        self.report.exit_code()
    }
}

/// Run the checks selected by `policy` against the trees named in `config`.
pub fn run_check(config: &Config, policy: &CheckPolicy) -> Result<CheckOutcome> {
    let paths = &config.paths;

    if !paths.templates.is_dir() {
        return Err(CheckError::TemplatesNotFound(paths.templates.clone()).into());
    }

    let scanner = ReferenceScanner::from_config(&config.scan)?;
    let scan = scanner.scan(&paths.templates);
    debug!(
        "scan";
        "{} references in {} templates",
        scan.references.len(),
        scan.documents
    );
    for skipped in &scan.skipped {
        debug!("scan"; "skipped undecodable `{}`", skipped.display());
    }

    let manifest = load_manifest(&paths.manifest, policy)?;

    let needs_inventory = policy.unused || policy.references == ReferenceMode::Filesystem;
    let source = needs_inventory.then(|| inventory(&paths.source, &config.scan.ignore));
    let collected = needs_inventory.then(|| inventory(&paths.output, &config.scan.ignore));

    let inputs = Inputs {
        referenced: &scan.references,
        manifest: manifest.as_ref(),
        source: source.as_ref(),
        collected: collected.as_ref(),
    };
    let report = reconcile(inputs, policy, |rel| paths.output.join(rel).exists());

    Ok(CheckOutcome {
        policy: *policy,
        scan,
        report,
    })
}

/// Load the manifest if the policy reads it.
fn load_manifest(path: &Path, policy: &CheckPolicy) -> Result<Option<Manifest>, CheckError> {
    if !policy.uses_manifest() {
        return Ok(None);
    }
    if policy.require_manifest {
        return Ok(Some(Manifest::load(path)?));
    }

    let manifest = Manifest::load_optional(path)?;
    if manifest.is_none() {
        debug!("manifest"; "`{}` not found, skipping manifest checks", path.display());
    }
    Ok(manifest)
}

fn inventory(root: &Path, ignore: &[String]) -> BTreeSet<String> {
    if !root.is_dir() {
        debug!("inventory"; "`{}` does not exist, treating it as empty", root.display());
    }
    list_files(root, ignore)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{EXIT_FINDINGS, EXIT_NOT_IN_MANIFEST, EXIT_OK};
    use std::fs;
    use tempfile::TempDir;

    /// A project laid out like a Django site after `collectstatic`.
    struct Project {
        dir: TempDir,
    }

    impl Project {
        fn new() -> Self {
            let project = Self {
                dir: TempDir::new().unwrap(),
            };
            fs::create_dir_all(project.root().join("templates")).unwrap();
            project
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn write(&self, rel: &str, content: &str) -> &Self {
            let path = self.root().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
            self
        }

        fn template(&self, name: &str, content: &str) -> &Self {
            self.write(&format!("templates/{name}"), content)
        }

        fn manifest(&self, pairs: &[(&str, &str)]) -> &Self {
            let paths: serde_json::Map<String, serde_json::Value> = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
                .collect();
            let doc = serde_json::json!({ "paths": paths, "version": "1.1" });
            self.write("staticfiles/staticfiles.json", &doc.to_string())
        }

        fn config(&self) -> Config {
            let mut config = Config::default();
            config.paths.resolve(self.root());
            config
        }

        fn run(&self, policy: CheckPolicy) -> Result<CheckOutcome> {
            run_check(&self.config(), &policy)
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_manifest_mode_reports_unmanifested_reference() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}")
            .template("home.html", "{% static \"js/app.js\" %}")
            .manifest(&[("css/app.css", "css/app.1a2b.css")])
            .write("staticfiles/css/app.css", "");

        let outcome = project.run(CheckPolicy::manifest()).unwrap();

        assert_eq!(outcome.report.missing_manifest_entries, Some(BTreeSet::new()));
        assert_eq!(outcome.report.missing_references, Some(set(&["js/app.js"])));
        assert_eq!(outcome.exit_code(), EXIT_NOT_IN_MANIFEST);
    }

    #[test]
    fn test_manifest_mode_clean() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}")
            .manifest(&[("css/app.css", "css/app.1a2b.css")])
            .write("staticfiles/css/app.css", "");

        let outcome = project.run(CheckPolicy::manifest()).unwrap();

        assert!(outcome.report.is_clean());
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_manifest_required_but_absent_is_fatal() {
        let project = Project::new();
        project.template("base.html", "{% static 'css/app.css' %}");

        for policy in [CheckPolicy::manifest(), CheckPolicy::strict()] {
            let err = project.run(policy).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<CheckError>(),
                Some(CheckError::Manifest(ManifestError::NotFound(_)))
            ));
        }
    }

    #[test]
    fn test_missing_templates_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths.resolve(dir.path());

        let err = run_check(&config, &CheckPolicy::references()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::TemplatesNotFound(_))
        ));
    }

    #[test]
    fn test_strict_mode_reports_missing_hashed_file() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'img/logo.png' %}")
            .manifest(&[("img/logo.png", "img/logo.abc123.png")])
            .write("static/img/logo.png", "")
            .write("staticfiles/img/logo.png", "");

        let outcome = project.run(CheckPolicy::strict()).unwrap();

        assert_eq!(
            outcome.report.missing_manifest_targets,
            Some(set(&["img/logo.abc123.png"]))
        );
        assert_eq!(outcome.report.unused_source, Some(BTreeSet::new()));
        assert_eq!(outcome.exit_code(), EXIT_FINDINGS);
    }

    #[test]
    fn test_strict_mode_reports_unused_assets() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}")
            .manifest(&[("css/app.css", "css/app.1a2b.css")])
            .write("static/css/app.css", "")
            .write("static/css/old.css", "")
            .write("static/.DS_Store", "")
            .write("staticfiles/css/app.css", "")
            .write("staticfiles/css/app.1a2b.css", "");

        let outcome = project.run(CheckPolicy::strict()).unwrap();

        assert_eq!(outcome.report.missing_manifest_targets, Some(BTreeSet::new()));
        assert_eq!(outcome.report.unused_source, Some(set(&["css/old.css"])));
        // the hashed copy and the manifest itself are not referenced by name
        assert_eq!(
            outcome.report.unused_collected,
            Some(set(&["css/app.1a2b.css", "staticfiles.json"]))
        );
        assert_eq!(outcome.exit_code(), EXIT_FINDINGS);
    }

    #[test]
    fn test_other_modes_do_not_report_unused_source() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}")
            .manifest(&[("css/app.css", "css/app.1a2b.css")])
            .write("static/css/app.css", "")
            .write("static/css/never-used.css", "")
            .write("staticfiles/css/app.css", "");

        for policy in [CheckPolicy::references(), CheckPolicy::manifest()] {
            let outcome = project.run(policy).unwrap();
            assert_eq!(outcome.report.unused_source, None);
            assert_eq!(outcome.exit_code(), EXIT_OK);
        }
    }

    #[test]
    fn test_references_mode_without_manifest() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}{% static 'js/app.js' %}")
            .write("static/css/app.css", "")
            .write("staticfiles/js/app.js", "");

        let outcome = project.run(CheckPolicy::references()).unwrap();

        assert_eq!(outcome.report.missing_references, Some(BTreeSet::new()));
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_references_mode_reports_unresolved() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}{% static 'js/missing.js' %}")
            .write("static/css/app.css", "");

        let outcome = project.run(CheckPolicy::references()).unwrap();

        assert_eq!(outcome.report.missing_references, Some(set(&["js/missing.js"])));
        assert_eq!(outcome.exit_code(), EXIT_FINDINGS);
    }

    #[cfg(unix)]
    #[test]
    fn test_references_mode_resolves_linked_collected_files() {
        use std::os::unix::fs::symlink;

        let project = Project::new();
        let shared = TempDir::new().unwrap();
        fs::write(shared.path().join("app.css"), "").unwrap();
        fs::write(shared.path().join("base.html"), "{% static 'css/app.css' %}").unwrap();
        fs::create_dir_all(project.root().join("staticfiles/css")).unwrap();
        symlink(
            shared.path().join("app.css"),
            project.root().join("staticfiles/css/app.css"),
        )
        .unwrap();
        symlink(
            shared.path().join("base.html"),
            project.root().join("templates/base.html"),
        )
        .unwrap();

        let outcome = project.run(CheckPolicy::references()).unwrap();

        assert_eq!(outcome.scan.documents, 1);
        assert_eq!(outcome.scan.references, set(&["css/app.css"]));
        assert_eq!(outcome.report.missing_references, Some(BTreeSet::new()));
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_optional_manifest_absent_skips_manifest_checks() {
        let project = Project::new();
        project.template("base.html", "{% static 'css/app.css' %}");
        let policy = CheckPolicy {
            require_manifest: false,
            ..CheckPolicy::manifest()
        };

        let outcome = project.run(policy).unwrap();

        assert_eq!(outcome.report.missing_manifest_entries, None);
        assert_eq!(outcome.report.missing_references, None);
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }

    #[test]
    fn test_invalid_manifest_is_fatal_even_when_optional() {
        let project = Project::new();
        project
            .template("base.html", "")
            .write("staticfiles/staticfiles.json", "{ not json");
        let policy = CheckPolicy {
            require_manifest: false,
            ..CheckPolicy::manifest()
        };

        let err = project.run(policy).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CheckError>(),
            Some(CheckError::Manifest(ManifestError::Parse(..)))
        ));
    }

    #[test]
    fn test_undecodable_template_is_skipped() {
        let project = Project::new();
        project
            .template("base.html", "{% static 'css/app.css' %}")
            .manifest(&[("css/app.css", "css/app.1a2b.css")])
            .write("staticfiles/css/app.css", "");
        fs::write(project.root().join("templates/broken.html"), [0xc3, 0x28]).unwrap();

        let outcome = project.run(CheckPolicy::manifest()).unwrap();

        assert_eq!(outcome.scan.skipped.len(), 1);
        assert_eq!(outcome.scan.documents, 1);
        assert_eq!(outcome.exit_code(), EXIT_OK);
    }
}
