//! Forbidden-import matching.

use serde::{Deserialize, Serialize};

use crate::extractor::ImportMap;
use crate::types::Violation;

/// How an import path is compared against a forbidden layer prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Raw string prefix. `m/infra2` matches the prefix `m/infra`.
    #[default]
    Prefix,
    /// The import path equals the prefix or continues with `/` after it.
    Segment,
}

impl MatchStrategy {
    /// Returns `true` if `import_path` belongs to the layer at `prefix`.
    #[must_use]
    pub fn matches(self, import_path: &str, prefix: &str) -> bool {
        match self {
            Self::Prefix => import_path.starts_with(prefix),
            Self::Segment => import_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::Segment => write!(f, "segment"),
        }
    }
}

/// Error returned when parsing an unknown strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown match strategy '{0}' (expected 'prefix' or 'segment')")]
pub struct ParseStrategyError(String);

impl std::str::FromStr for MatchStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prefix" => Ok(Self::Prefix),
            "segment" => Ok(Self::Segment),
            other => Err(ParseStrategyError(other.to_owned())),
        }
    }
}

/// Matches every collected import against every forbidden prefix.
///
/// Each (import path, prefix) match yields one [`Violation`] listing all
/// files that declare the import. Violations are ordered by import path,
/// then by the order of `forbidden`.
#[must_use]
pub fn check(imports: &ImportMap, forbidden: &[String], strategy: MatchStrategy) -> Vec<Violation> {
    let mut violations = Vec::new();

    for (import_path, files) in imports {
        for prefix in forbidden {
            if strategy.matches(import_path, prefix) {
                violations.push(Violation {
                    import_path: import_path.clone(),
                    forbidden_prefix: prefix.clone(),
                    files: files.iter().cloned().collect(),
                });
            }
        }
    }

    violations
}
