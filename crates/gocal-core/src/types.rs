//! Result types produced by a check run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::checker::MatchStrategy;
use crate::layer::Layer;

/// An import from a layer into a layer it must not depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Import path as declared in source (quotes stripped).
    pub import_path: String,
    /// Qualified path of the downstream layer that was matched.
    pub forbidden_prefix: String,
    /// Files that declare the import, relative to the module root.
    pub files: Vec<PathBuf>,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "forbidden import of {} ({})",
            self.forbidden_prefix, self.import_path
        )
    }
}

/// Kind of recoverable problem met while scanning a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// A directory entry could not be visited.
    Traversal,
    /// A source file could not be read.
    Read,
    /// A source file's import section could not be parsed.
    Parse,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Traversal => write!(f, "traversal"),
            Self::Read => write!(f, "read"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

/// A skipped entry, reported alongside the scan results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Entry that was skipped.
    pub path: PathBuf,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error in {}: {}",
            self.kind,
            self.path.display(),
            self.message
        )
    }
}

/// Outcome of checking a single layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerReport {
    /// The layer whose files were scanned.
    pub layer: Layer,
    /// Qualified prefixes this layer must not import.
    pub forbidden: Vec<String>,
    /// Number of source files read.
    pub files_scanned: usize,
    /// Violations found in this layer.
    pub violations: Vec<Violation>,
    /// Entries skipped while scanning this layer.
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of a full run over every checked layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Root module identifier used to qualify layers.
    pub module: String,
    /// Matching strategy used.
    pub strategy: MatchStrategy,
    /// Reports in configured layer order. The last layer is exempt and
    /// has no report.
    pub layers: Vec<LayerReport>,
}

impl CheckReport {
    /// Total number of violations across all layers.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.layers.iter().map(|l| l.violations.len()).sum()
    }

    /// Returns true if any layer has a violation.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        self.layers.iter().any(|l| !l.violations.is_empty())
    }

    /// Total number of source files read.
    #[must_use]
    pub fn files_scanned(&self) -> usize {
        self.layers.iter().map(|l| l.files_scanned).sum()
    }

    /// All diagnostics, in layer order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.layers.iter().flat_map(|l| l.diagnostics.iter())
    }

    /// All violations paired with the layer they were found in.
    pub fn violations(&self) -> impl Iterator<Item = (&Layer, &Violation)> {
        self.layers
            .iter()
            .flat_map(|l| l.violations.iter().map(move |v| (&l.layer, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_report(index: usize, name: &str, violations: usize) -> LayerReport {
        LayerReport {
            layer: Layer::new(index, name),
            forbidden: vec![format!("m/{name}-next")],
            files_scanned: 2,
            violations: (0..violations)
                .map(|i| Violation {
                    import_path: format!("m/x{i}"),
                    forbidden_prefix: "m/x".into(),
                    files: vec![PathBuf::from(format!("{name}/f.go"))],
                })
                .collect(),
            diagnostics: vec![Diagnostic::new(
                DiagnosticKind::Parse,
                format!("{name}/bad.go"),
                "line 1: expected package clause",
            )],
        }
    }

    #[test]
    fn aggregates_across_layers() {
        let report = CheckReport {
            module: "m".into(),
            strategy: MatchStrategy::Prefix,
            layers: vec![layer_report(0, "domain", 2), layer_report(1, "usecase", 1)],
        };
        assert_eq!(report.violation_count(), 3);
        assert!(report.has_violations());
        assert_eq!(report.files_scanned(), 4);
        assert_eq!(report.diagnostics().count(), 2);

        let layers: Vec<&str> = report.violations().map(|(l, _)| l.name.as_str()).collect();
        assert_eq!(layers, ["domain", "domain", "usecase"]);
    }

    #[test]
    fn clean_report_has_no_violations() {
        let report = CheckReport {
            module: "m".into(),
            strategy: MatchStrategy::Segment,
            layers: vec![layer_report(0, "domain", 0)],
        };
        assert!(!report.has_violations());
        assert_eq!(report.violation_count(), 0);
    }

    #[test]
    fn diagnostic_display_names_kind_and_path() {
        let d = Diagnostic::new(DiagnosticKind::Traversal, "domain/gone", "No such file");
        assert_eq!(d.to_string(), "traversal error in domain/gone: No such file");
    }
}
