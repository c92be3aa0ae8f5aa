//! Shared output formatting for check results.

use anyhow::Result;
use gocal_core::CheckReport;
use std::fmt::Write;

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(report: &CheckReport, format: OutputFormat) -> Result<()> {
    let out = match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report)?,
        OutputFormat::Compact => render_compact(report),
    };
    print!("{out}");
    Ok(())
}

fn render_text(report: &CheckReport) -> String {
    let mut out = String::new();

    for (layer, violation) in report.violations() {
        let _ = writeln!(
            out,
            "\x1b[31merror\x1b[0m: layer `{}` imports {}",
            layer, violation.import_path
        );
        let _ = writeln!(out, "  = forbidden: {}", violation.forbidden_prefix);
        for file in &violation.files {
            let _ = writeln!(out, "  --> {}", file.display());
        }
        out.push('\n');
    }

    let diagnostics: Vec<_> = report.diagnostics().collect();
    if !diagnostics.is_empty() {
        for diagnostic in &diagnostics {
            let _ = writeln!(out, "\x1b[33mwarning\x1b[0m: {diagnostic}");
        }
        out.push('\n');
    }

    let summary_color = if report.has_violations() {
        "\x1b[31m"
    } else if diagnostics.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };

    let _ = writeln!(
        out,
        "{}Found {} violation(s) in {} layer(s), {} file(s) scanned, {} skipped\x1b[0m",
        summary_color,
        report.violation_count(),
        report.layers.len(),
        report.files_scanned(),
        diagnostics.len()
    );

    out
}

fn render_json(report: &CheckReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// One line per implicated file.
fn render_compact(report: &CheckReport) -> String {
    let mut out = String::new();
    for (_, violation) in report.violations() {
        for file in &violation.files {
            let _ = writeln!(out, "{}: {}", file.display(), violation);
        }
    }
    out
}
