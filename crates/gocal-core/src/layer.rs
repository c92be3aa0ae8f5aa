//! Layer model and import path qualification.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One tier of a layered architecture.
///
/// A layer is identified by a directory relative to the module root
/// (e.g. `domain`, `usecase/billing`). Its position in the configured
/// sequence decides which other layers it may import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Layer {
    /// Name exactly as written in the configuration.
    pub name: String,
    /// Normalized directory path, relative to the module root.
    pub path: String,
    /// Position in the configured layer sequence (0-indexed).
    pub index: usize,
}

impl Layer {
    /// Creates a layer from its configured name.
    ///
    /// Surrounding whitespace, leading `/` and `./`, and trailing `/` are
    /// removed to form [`Layer::path`]; a configured `/domain` therefore
    /// refers to `./domain` beneath the module root.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = normalize(&name);
        Self { name, path, index }
    }

    /// Fully-qualified import path prefix of this layer within `module`.
    #[must_use]
    pub fn qualified(&self, module: &str) -> String {
        qualify(module, &self.path)
    }

    /// Directory of this layer beneath `project_dir`.
    #[must_use]
    pub fn dir(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.path)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Joins the root module identifier and a layer path into the import
/// path prefix other packages use to reference that layer.
#[must_use]
pub fn qualify(module: &str, layer_path: &str) -> String {
    format!("{module}/{layer_path}")
}

fn normalize(name: &str) -> String {
    let mut path = name.trim();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }
    path.trim_end_matches('/').to_owned()
}
