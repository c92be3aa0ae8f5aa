//! Module path discovery from `go.mod`.

use std::path::Path;

use crate::config::ConfigError;

/// Reads the module path declared by the manifest at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Manifest`] if it has no `module` directive.
pub fn read_module_path(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_module_path(&content).ok_or_else(|| ConfigError::Manifest {
        path: path.to_path_buf(),
        message: "no module directive found".into(),
    })
}

/// Extracts the module path from `go.mod` content.
///
/// Only the `module` directive is inspected; the rest of the file is not
/// validated. `//` comments are ignored and a quoted path (`"..."` or
/// `` `...` ``) is unquoted.
#[must_use]
pub fn parse_module_path(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.split_once("//").map_or(line, |(code, _)| code).trim();

        let Some(rest) = line.strip_prefix("module") else {
            continue;
        };
        // `module` must be followed by whitespace, not be part of a longer word
        let path = rest.trim_start();
        if path.len() == rest.len() || path.is_empty() {
            continue;
        }

        return unquote(path.trim_end());
    }
    None
}

fn unquote(path: &str) -> Option<String> {
    for quote in ['"', '`'] {
        if path.starts_with(quote) {
            return path
                .strip_prefix(quote)
                .and_then(|p| p.strip_suffix(quote))
                .filter(|p| !p.is_empty())
                .map(str::to_owned);
        }
    }
    Some(path.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn plain_module_directive() {
        let gomod = "module github.com/org/proj\n\ngo 1.22\n\nrequire golang.org/x/mod v0.17.0\n";
        assert_eq!(
            parse_module_path(gomod).as_deref(),
            Some("github.com/org/proj")
        );
    }

    #[test]
    fn comments_and_quotes() {
        assert_eq!(
            parse_module_path("// header\nmodule \"example.com/m\" // trailing\n").as_deref(),
            Some("example.com/m")
        );
        assert_eq!(
            parse_module_path("module `example.com/raw`\n").as_deref(),
            Some("example.com/raw")
        );
    }

    #[test]
    fn crlf_and_indentation() {
        assert_eq!(parse_module_path("\r\n  module m\r\n").as_deref(), Some("m"));
    }

    #[test]
    fn module_must_be_a_separate_word() {
        assert_eq!(parse_module_path("modulex y\nmodule z\n").as_deref(), Some("z"));
    }

    #[test]
    fn missing_directive() {
        assert_eq!(parse_module_path("go 1.22\n"), None);
        assert_eq!(parse_module_path("module\n"), None);
        assert_eq!(parse_module_path("module \"unterminated\n"), None);
    }

    #[test]
    fn read_reports_missing_file_and_directive() {
        let tmp = TempDir::new().unwrap();
        let gomod = tmp.path().join("go.mod");

        let err = read_module_path(&gomod).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));

        std::fs::write(&gomod, "go 1.22\n").unwrap();
        let err = read_module_path(&gomod).unwrap_err();
        assert!(matches!(err, ConfigError::Manifest { .. }));

        std::fs::write(&gomod, "module example.com/m\n").unwrap();
        assert_eq!(read_module_path(&gomod).unwrap(), "example.com/m");
    }
}
