//! Rendering of check outcomes for the terminal or for automation.
//!
//! Text output groups findings by section, one ` - path` line per entry.
//! JSON output is a single document carrying the same findings plus the exit
//! code, so callers do not need to parse the text.

use crate::{
    check::CheckOutcome,
    cli::Format,
    config::{CheckPolicy, ReferenceMode},
    log,
    reconcile::{EXIT_FATAL, ReconciliationReport, Section},
};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::{fmt::Write, path::PathBuf};

/// JSON form of a [`CheckOutcome`].
#[derive(Debug, Serialize)]
struct JsonOutcome<'a> {
    ok: bool,
    exit_code: u8,
    policy: &'a CheckPolicy,
    templates: JsonTemplates<'a>,
    findings: &'a ReconciliationReport,
}

#[derive(Debug, Serialize)]
struct JsonTemplates<'a> {
    documents: usize,
    references: usize,
    skipped: &'a [PathBuf],
}

#[derive(Debug, Serialize)]
struct JsonError {
    ok: bool,
    exit_code: u8,
    error: String,
}

/// Print an outcome to stdout in the requested format.
///
/// `success` is the line printed by the text format when nothing was found.
pub fn print(outcome: &CheckOutcome, format: Format, success: &str) -> Result<()> {
    let rendered = match format {
        Format::Text => render_text(&outcome.report, success),
        Format::Json => render_json(outcome)?,
    };
    print!("{rendered}");
    Ok(())
}

/// Print a fatal error in the requested format.
pub fn print_error(err: &anyhow::Error, format: Format) {
    match format {
        Format::Text => log!("error"; "{err:#}"),
        Format::Json => {
            let doc = JsonError {
                ok: false,
                exit_code: EXIT_FATAL,
                error: format!("{err:#}"),
            };
            match serde_json::to_string_pretty(&doc) {
                Ok(json) => println!("{json}"),
                Err(_) => log!("error"; "{err:#}"),
            }
        }
    }
}

/// Render every failing section, or `success` when the report is clean.
pub fn render_text(report: &ReconciliationReport, success: &str) -> String {
    let failures = report.failures();
    if failures.is_empty() {
        return format!("{}\n", success.green());
    }

    let mut out = String::new();
    for (i, (section, paths)) in failures.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        writeln!(out, "{}", section.title().red().bold()).ok();
        for path in paths {
            writeln!(out, " - {path}").ok();
        }
        if section == Section::MissingReferences(ReferenceMode::Filesystem) {
            writeln!(
                out,
                "\nEnsure these files exist in the static directory or are collected into the output directory."
            )
            .ok();
        }
    }
    out
}

/// Render the outcome as a pretty-printed JSON document.
pub fn render_json(outcome: &CheckOutcome) -> Result<String> {
    let doc = JsonOutcome {
        ok: outcome.report.is_clean(),
        exit_code: outcome.exit_code(),
        policy: &outcome.policy,
        templates: JsonTemplates {
            documents: outcome.scan.documents,
            references: outcome.scan.references.len(),
            skipped: &outcome.scan.skipped,
        },
        findings: &outcome.report,
    };
    Ok(serde_json::to_string_pretty(&doc)? + "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::TemplateScan;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_text_clean() {
        plain();
        let report = ReconciliationReport {
            reference_mode: Some(ReferenceMode::Filesystem),
            missing_references: Some(BTreeSet::new()),
            ..Default::default()
        };
        assert_eq!(
            render_text(&report, "All static references resolved."),
            "All static references resolved.\n"
        );
    }

    #[test]
    fn test_render_text_groups_sections() {
        plain();
        let report = ReconciliationReport {
            reference_mode: Some(ReferenceMode::Manifest),
            missing_manifest_entries: Some(set(&["img/gone.png"])),
            missing_references: Some(set(&["js/app.js", "js/b.js"])),
            unused_source: Some(BTreeSet::new()),
            ..Default::default()
        };

        let text = render_text(&report, "ok");

        assert_eq!(
            text,
            "Missing files listed in the manifest:\n - img/gone.png\n\n\
             Static files referenced in templates but missing from manifest:\n - js/app.js\n - js/b.js\n"
        );
    }

    #[test]
    fn test_render_text_filesystem_hint() {
        plain();
        let report = ReconciliationReport {
            reference_mode: Some(ReferenceMode::Filesystem),
            missing_references: Some(set(&["css/x.css"])),
            ..Default::default()
        };

        let text = render_text(&report, "ok");

        assert!(text.starts_with("Missing static files referenced in templates:\n - css/x.css\n"));
        assert!(text.contains("Ensure these files exist"));
    }

    #[test]
    fn test_render_json() {
        let outcome = CheckOutcome {
            policy: CheckPolicy::manifest(),
            scan: TemplateScan {
                references: set(&["css/app.css", "js/app.js"]),
                documents: 2,
                skipped: Vec::new(),
            },
            report: ReconciliationReport {
                reference_mode: Some(ReferenceMode::Manifest),
                missing_manifest_entries: Some(BTreeSet::new()),
                missing_references: Some(set(&["js/app.js"])),
                ..Default::default()
            },
        };

        let json: serde_json::Value = serde_json::from_str(&render_json(&outcome).unwrap()).unwrap();

        assert_eq!(json["ok"], false);
        assert_eq!(json["exit_code"], 3);
        assert_eq!(json["templates"]["references"], 2);
        assert_eq!(json["policy"]["references"], "manifest");
        assert_eq!(json["policy"]["require_manifest"], true);
        assert_eq!(json["findings"]["reference_mode"], "manifest");
        assert_eq!(json["findings"]["missing_references"][0], "js/app.js");
        assert!(json["findings"].get("unused_source").is_none());
    }
}
