//! Import extraction: language trait and layer tree scanning.
//!
//! `LanguageExtractor` is the extension point for supported languages.
//! [`ImportScanner`] walks a layer directory, hands every matching source
//! file to the extractor and collects the declared import paths.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::types::{Diagnostic, DiagnosticKind};

/// A single import declared in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// Line number (1-indexed).
    pub line: usize,
    /// Import path with its quotes stripped (e.g. `example.com/m/infra`).
    pub path: String,
}

/// The import section of a source file could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    /// Line number (1-indexed) where parsing failed.
    pub line: usize,
    /// Parse error detail.
    pub message: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Trait for language-specific import extraction.
///
/// Implementations parse only as much of a file as needed to read its
/// import declarations; syntax errors after the import section must not
/// fail extraction.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"go"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts the import paths declared in `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the import section is malformed.
    fn extract_imports(&self, source: &str) -> Result<Vec<ImportInfo>, ParseError>;

    /// Returns `true` if `path` has one of [`Self::extensions`].
    fn handles(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions()
            .iter()
            .any(|&e| e.strip_prefix('.').unwrap_or(e) == ext)
    }
}

/// Import path → files declaring it.
pub type ImportMap = BTreeMap<String, BTreeSet<PathBuf>>;

/// Imports collected from one directory tree.
#[derive(Debug, Default)]
pub struct ImportScan {
    /// Import path → files declaring it, relative to the base directory.
    pub imports: ImportMap,
    /// Entries skipped during the scan.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of source files read.
    pub files_scanned: usize,
}

impl ImportScan {
    fn skip(&mut self, kind: DiagnosticKind, path: PathBuf, message: String) {
        warn!("Skipping {}: {} error: {}", path.display(), kind, message);
        self.diagnostics.push(Diagnostic::new(kind, path, message));
    }
}

/// Walks directory trees and collects imports with a [`LanguageExtractor`].
pub struct ImportScanner<'a> {
    extractor: &'a dyn LanguageExtractor,
    base: PathBuf,
    exclude: &'a [glob::Pattern],
}

impl<'a> ImportScanner<'a> {
    /// Creates a scanner that records paths relative to `base`.
    #[must_use]
    pub fn new(extractor: &'a dyn LanguageExtractor, base: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            base: base.into(),
            exclude: &[],
        }
    }

    /// Skips files whose base-relative path matches any of `patterns`.
    #[must_use]
    pub fn exclude(mut self, patterns: &'a [glob::Pattern]) -> Self {
        self.exclude = patterns;
        self
    }

    /// Scans every source file beneath `root`.
    ///
    /// Unreadable entries and unparsable files are recorded as
    /// diagnostics and skipped; the walk always runs to completion.
    /// Symbolic links to directories are not followed.
    #[must_use]
    pub fn scan(&self, root: &Path) -> ImportScan {
        debug!("Scanning {}", root.display());

        let mut scan = ImportScan::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(root);
                    scan.skip(
                        DiagnosticKind::Traversal,
                        self.relative(path),
                        err.to_string(),
                    );
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().is_dir() || !self.extractor.handles(path) {
                continue;
            }

            let rel = self.relative(path);
            if self.is_excluded(&rel) {
                debug!("Excluding: {}", rel.display());
                continue;
            }

            let source = match std::fs::read_to_string(path) {
                Ok(source) => source,
                Err(err) => {
                    scan.skip(DiagnosticKind::Read, rel, err.to_string());
                    continue;
                }
            };
            scan.files_scanned += 1;

            match self.extractor.extract_imports(&source) {
                Ok(imports) => {
                    debug!("{}: {} import(s)", rel.display(), imports.len());
                    for import in imports {
                        scan.imports
                            .entry(import.path)
                            .or_default()
                            .insert(rel.clone());
                    }
                }
                Err(err) => scan.skip(DiagnosticKind::Parse, rel, err.to_string()),
            }
        }

        scan
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.base).unwrap_or(path).to_path_buf()
    }

    fn is_excluded(&self, rel: &Path) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches_path(rel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Reads `import <path>` lines until the first other line; a file
    /// starting with `!` fails to parse.
    struct LineExtractor;

    impl LanguageExtractor for LineExtractor {
        fn language_id(&self) -> &'static str {
            "lines"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[".src"]
        }

        fn extract_imports(&self, source: &str) -> Result<Vec<ImportInfo>, ParseError> {
            if source.starts_with('!') {
                return Err(ParseError::new(1, "bang"));
            }
            Ok(source
                .lines()
                .enumerate()
                .map_while(|(i, line)| {
                    line.strip_prefix("import ").map(|p| ImportInfo {
                        line: i + 1,
                        path: p.trim_matches('"').to_owned(),
                    })
                })
                .collect())
        }
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn handles_matches_extension() {
        assert!(LineExtractor.handles(Path::new("a/b.src")));
        assert!(!LineExtractor.handles(Path::new("a/b.go")));
        assert!(!LineExtractor.handles(Path::new("a/src")));
    }

    #[test]
    fn collects_imports_recursively() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "domain/a.src", "import \"m/infra\"\nimport \"fmt\"\n");
        write(tmp.path(), "domain/sub/b.src", "import \"m/infra\"\n");
        write(tmp.path(), "domain/readme.md", "import \"m/ignored\"\n");

        let scanner = ImportScanner::new(&LineExtractor, tmp.path());
        let scan = scanner.scan(&tmp.path().join("domain"));

        assert_eq!(scan.files_scanned, 2);
        assert!(scan.diagnostics.is_empty());
        assert_eq!(scan.imports.len(), 2);
        let files: Vec<&Path> = scan.imports["m/infra"].iter().map(PathBuf::as_path).collect();
        assert_eq!(
            files,
            [Path::new("domain/a.src"), Path::new("domain/sub/b.src")]
        );
        assert!(!scan.imports.contains_key("m/ignored"));
    }

    #[test]
    fn parse_error_does_not_hide_siblings() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "domain/a_bad.src", "!broken\n");
        write(tmp.path(), "domain/b_good.src", "import \"m/infra\"\n");

        let scan = ImportScanner::new(&LineExtractor, tmp.path()).scan(&tmp.path().join("domain"));

        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].kind, DiagnosticKind::Parse);
        assert_eq!(scan.diagnostics[0].path, Path::new("domain/a_bad.src"));
        assert!(scan.imports.contains_key("m/infra"));
    }

    #[test]
    fn missing_root_is_a_traversal_diagnostic() {
        let tmp = TempDir::new().unwrap();
        let scan = ImportScanner::new(&LineExtractor, tmp.path()).scan(&tmp.path().join("gone"));

        assert!(scan.imports.is_empty());
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].kind, DiagnosticKind::Traversal);
        assert_eq!(scan.diagnostics[0].path, Path::new("gone"));
    }

    #[test]
    fn excluded_files_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "domain/a.src", "import \"m/a\"\n");
        write(tmp.path(), "domain/mocks/b.src", "import \"m/b\"\n");

        let patterns = vec![glob::Pattern::new("**/mocks/**").unwrap()];
        let scan = ImportScanner::new(&LineExtractor, tmp.path())
            .exclude(&patterns)
            .scan(&tmp.path().join("domain"));

        assert_eq!(scan.files_scanned, 1);
        assert!(scan.imports.contains_key("m/a"));
        assert!(!scan.imports.contains_key("m/b"));
    }
}
