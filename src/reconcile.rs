//! Reconciliation of template references against manifest and inventories.
//!
//! Pure set arithmetic. The only filesystem question, "does this path exist
//! under the output directory", is answered by a caller-supplied predicate.
//!
//! | Section                    | Computed as                                       |
//! |----------------------------|---------------------------------------------------|
//! | missing manifest entries   | manifest keys not present under output            |
//! | missing manifest targets   | manifest values not present under output          |
//! | missing references         | referenced − manifest keys, or − (source ∪ output) |
//! | unused source              | source − referenced                               |
//! | unused collected           | collected − referenced − manifest keys            |

use crate::config::{CheckPolicy, ReferenceMode};
use crate::manifest::Manifest;
use serde::Serialize;
use std::collections::BTreeSet;

/// Exit code for a clean run.
pub const EXIT_OK: u8 = 0;
/// Exit code for fatal configuration errors (manifest or templates absent).
pub const EXIT_FATAL: u8 = 1;
/// Exit code for broken references, missing manifest files and unused assets.
pub const EXIT_FINDINGS: u8 = 2;
/// Exit code for template references absent from the manifest.
pub const EXIT_NOT_IN_MANIFEST: u8 = 3;

/// Inputs to [`reconcile`]. Absent inputs disable the checks that need them.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    pub referenced: &'a BTreeSet<String>,
    pub manifest: Option<&'a Manifest>,
    pub source: Option<&'a BTreeSet<String>>,
    pub collected: Option<&'a BTreeSet<String>>,
}

/// Finding categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    MissingManifestEntries,
    MissingManifestTargets,
    MissingReferences(ReferenceMode),
    UnusedSource,
    UnusedCollected,
}

impl Section {
    pub const fn title(self) -> &'static str {
        match self {
            Self::MissingManifestEntries => "Missing files listed in the manifest:",
            Self::MissingManifestTargets => "Manifest entries missing hashed file:",
            Self::MissingReferences(ReferenceMode::Manifest) => {
                "Static files referenced in templates but missing from manifest:"
            }
            Self::MissingReferences(_) => "Missing static files referenced in templates:",
            Self::UnusedSource => "Unused static files in source (not referenced in any template):",
            Self::UnusedCollected => {
                "Unused static files in output (not referenced or in manifest):"
            }
        }
    }

    pub const fn exit_code(self) -> u8 {
        match self {
            Self::MissingReferences(ReferenceMode::Manifest) => EXIT_NOT_IN_MANIFEST,
            _ => EXIT_FINDINGS,
        }
    }
}

/// Findings of one run. `None` means the check did not run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_mode: Option<ReferenceMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_manifest_entries: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_manifest_targets: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_references: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unused_source: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unused_collected: Option<BTreeSet<String>>,
}

impl ReconciliationReport {
    /// Every check that ran, in report order.
    pub fn sections(&self) -> Vec<(Section, &BTreeSet<String>)> {
        let missing_references = self
            .reference_mode
            .zip(self.missing_references.as_ref())
            .map(|(mode, set)| (Section::MissingReferences(mode), set));

        [
            self.missing_manifest_entries
                .as_ref()
                .map(|s| (Section::MissingManifestEntries, s)),
            self.missing_manifest_targets
                .as_ref()
                .map(|s| (Section::MissingManifestTargets, s)),
            missing_references,
            self.unused_source.as_ref().map(|s| (Section::UnusedSource, s)),
            self.unused_collected
                .as_ref()
                .map(|s| (Section::UnusedCollected, s)),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Sections with at least one finding.
    pub fn failures(&self) -> Vec<(Section, &BTreeSet<String>)> {
        self.sections()
            .into_iter()
            .filter(|(_, set)| !set.is_empty())
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }

    /// Exit code of the first failing section, or [`EXIT_OK`].
    pub fn exit_code(&self) -> u8 {
        self.failures()
            .first()
            .map_or(EXIT_OK, |(section, _)| section.exit_code())
    }
}

/// Run the checks enabled by `policy` over `inputs`.
///
/// `exists` reports whether a manifest-relative path is present under the
/// output directory.
pub fn reconcile(
    inputs: Inputs<'_>,
    policy: &CheckPolicy,
    exists: impl Fn(&str) -> bool,
) -> ReconciliationReport {
    let Inputs {
        referenced,
        manifest,
        source,
        collected,
    } = inputs;
    let manifest_keys = manifest.map(Manifest::keys).unwrap_or_default();

    let missing_manifest_entries = manifest.filter(|_| policy.manifest_entries).map(|m| {
        m.entries()
            .filter(|(key, _)| !exists(*key))
            .map(|(key, _)| key.to_owned())
            .collect()
    });

    let missing_manifest_targets = manifest.filter(|_| policy.hashed_targets).map(|m| {
        m.entries()
            .filter(|(_, hashed)| !exists(*hashed))
            .map(|(_, hashed)| hashed.to_owned())
            .collect()
    });

    let (reference_mode, missing_references) = match policy.references {
        ReferenceMode::Manifest => match manifest {
            Some(_) => (
                Some(ReferenceMode::Manifest),
                Some(referenced.difference(&manifest_keys).cloned().collect()),
            ),
            None => (None, None),
        },
        ReferenceMode::Filesystem => {
            let in_tree = |path: &String| {
                source.is_some_and(|s| s.contains(path))
                    || collected.is_some_and(|c| c.contains(path))
            };
            (
                Some(ReferenceMode::Filesystem),
                Some(referenced.iter().filter(|p| !in_tree(*p)).cloned().collect()),
            )
        }
        ReferenceMode::Off => (None, None),
    };

    let (unused_source, unused_collected) = if policy.unused {
        (
            source.map(|s| s.difference(referenced).cloned().collect()),
            collected.map(|c| {
                c.iter()
                    .filter(|p| !referenced.contains(*p) && !manifest_keys.contains(*p))
                    .cloned()
                    .collect()
            }),
        )
    } else {
        (None, None)
    };

    ReconciliationReport {
        reference_mode,
        missing_manifest_entries,
        missing_manifest_targets,
        missing_references,
        unused_source,
        unused_collected,
    }
}
