//! Go import extractor using Tree-sitter.

use gocal_core::{ImportInfo, LanguageExtractor, ParseError};
use tree_sitter::{Language, Node, Parser};

/// Extracts import paths from Go source.
///
/// Mirrors an imports-only parse: the package clause and the import
/// declarations that follow it must be well formed, everything after the
/// first other declaration is ignored.
pub struct GoExtractor {
    language: Language,
}

impl GoExtractor {
    /// Creates a new Go extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        node.utf8_text(src).unwrap_or("")
    }

    fn line(node: &Node<'_>) -> usize {
        node.start_position().row + 1
    }

    /// Reads every `import_spec` of an `import_declaration`, with or
    /// without parentheses.
    fn extract_declaration(node: &Node<'_>, src: &[u8], out: &mut Vec<ImportInfo>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => out.extend(Self::extract_spec(&child, src)),
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            out.extend(Self::extract_spec(&spec, src));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Import path of a spec; aliases (`db`, `.`, `_`) are ignored.
    fn extract_spec(spec: &Node<'_>, src: &[u8]) -> Option<ImportInfo> {
        let path = spec.child_by_field_name("path")?;
        let path = Self::text(&path, src).trim_matches(|c: char| c == '"' || c == '`');
        Some(ImportInfo {
            line: Self::line(spec),
            path: path.to_owned(),
        })
    }

    /// An error node that swallowed an `import` keyword is a broken
    /// import declaration, not a broken body.
    fn contains_import_keyword(node: &Node<'_>) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| child.kind() == "import" || Self::contains_import_keyword(&child));
        found
    }
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for GoExtractor {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".go"]
    }

    fn extract_imports(&self, source: &str) -> Result<Vec<ImportInfo>, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::new(1, format!("failed to load Go grammar: {e}")))?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or_else(|| ParseError::new(1, "parser returned no tree"))?;
        let root = tree.root_node();

        let mut imports = Vec::new();
        let mut seen_package = false;

        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            match node.kind() {
                "comment" => {}
                "package_clause" if !seen_package => {
                    if node.has_error() {
                        return Err(ParseError::new(Self::line(&node), "malformed package clause"));
                    }
                    seen_package = true;
                }
                _ if !seen_package => {
                    return Err(ParseError::new(Self::line(&node), "expected package clause"));
                }
                "import_declaration" => {
                    if node.has_error() {
                        return Err(ParseError::new(
                            Self::line(&node),
                            "malformed import declaration",
                        ));
                    }
                    Self::extract_declaration(&node, src, &mut imports);
                }
                "ERROR" if Self::contains_import_keyword(&node) => {
                    return Err(ParseError::new(
                        Self::line(&node),
                        "malformed import declaration",
                    ));
                }
                // First declaration after the import section
                _ => break,
            }
        }

        if !seen_package {
            return Err(ParseError::new(1, "expected package clause"));
        }

        Ok(imports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(src: &str) -> Result<Vec<ImportInfo>, ParseError> {
        GoExtractor::new().extract_imports(src)
    }

    fn paths(src: &str) -> Vec<String> {
        extract(src)
            .expect("import section should parse")
            .into_iter()
            .map(|i| i.path)
            .collect()
    }

    #[test]
    fn single_import() {
        assert_eq!(paths("package domain\n\nimport \"m/infra\"\n"), ["m/infra"]);
    }

    #[test]
    fn grouped_imports_with_aliases() {
        let src = r#"package usecase

import (
	"fmt"

	db "example.com/m/infra/db"
	_ "example.com/m/infra/driver"
	. "example.com/m/domain"
)
"#;
        assert_eq!(
            paths(src),
            [
                "fmt",
                "example.com/m/infra/db",
                "example.com/m/infra/driver",
                "example.com/m/domain",
            ]
        );
    }

    #[test]
    fn multiple_declarations_and_raw_strings() {
        let src = "package a\n\nimport \"os\"\nimport `m/raw`\n";
        assert_eq!(paths(src), ["os", "m/raw"]);
    }

    #[test]
    fn reports_import_lines() {
        let imports = extract("package a\n\nimport (\n\t\"os\"\n\t\"m/b\"\n)\n").unwrap();
        assert_eq!(imports[0].line, 4);
        assert_eq!(imports[1].line, 5);
    }

    #[test]
    fn comments_before_package_are_skipped() {
        let src = "// Package a does things.\n//go:build linux\n\npackage a\n\nimport \"m/b\"\n";
        assert_eq!(paths(src), ["m/b"]);
    }

    #[test]
    fn body_errors_are_ignored() {
        let src = "package a\n\nimport \"m/infra\"\n\nfunc main() {\n\tx := \n}\n";
        assert_eq!(paths(src), ["m/infra"]);
    }

    #[test]
    fn no_imports() {
        assert!(paths("package a\n\nfunc F() {}\n").is_empty());
    }

    #[test]
    fn missing_package_clause_is_an_error() {
        let err = extract("import \"m/infra\"\n").unwrap_err();
        assert!(err.message.contains("package clause"));
    }

    #[test]
    fn empty_file_is_an_error() {
        assert!(extract("").is_err());
    }

    #[test]
    fn extension() {
        let extractor = GoExtractor::new();
        assert!(extractor.handles(std::path::Path::new("domain/user.go")));
        assert!(!extractor.handles(std::path::Path::new("domain/user.go.orig")));
    }
}
