//! Layer configuration loading.
//!
//! Two formats are accepted:
//!
//! - a plain list with one layer directory per line (the default `.gocal`
//!   file). Blank lines and lines starting with `#` are skipped.
//! - a TOML document, used when the file name ends in `.toml`:
//!
//! ```toml
//! module = "example.com/shop"   # optional, overrides go.mod
//! strategy = "segment"          # optional, "prefix" or "segment"
//! exclude = ["**/mocks/**"]     # optional
//! layers = ["domain", "usecase", "infra"]
//! ```

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::checker::MatchStrategy;
use crate::layer::Layer;

/// Errors when loading the manifest or layer configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },
    /// The module manifest has no usable module path.
    #[error("invalid manifest {path}: {message}")]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Detail.
        message: String,
    },
    /// Failed to parse TOML.
    #[error("invalid config: {message}")]
    Parse {
        /// Parse error detail.
        message: String,
    },
    /// Fewer than two layers were configured.
    #[error("minimum two layers need to be defined, found {found}")]
    TooFewLayers {
        /// Number of layers found.
        found: usize,
    },
    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    Validation(String),
}

/// Ordered layer list plus optional run settings.
#[derive(Debug, Clone, Default)]
pub struct LayerConfig {
    /// Layers, innermost first.
    pub layers: Vec<Layer>,
    /// Module path override. When `None`, the manifest is read.
    pub module: Option<String>,
    /// Matching strategy override.
    pub strategy: Option<MatchStrategy>,
    /// Glob patterns of files to skip, relative to the module root.
    pub exclude: Vec<String>,
}

impl LayerConfig {
    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            Self::parse_toml(&content)
        } else {
            Ok(Self::parse_lines(&content))
        }
    }

    /// Parses a line-delimited layer list.
    ///
    /// `\r\n` and `\n` line endings are both accepted.
    #[must_use]
    pub fn parse_lines(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        Self {
            layers: layers_from_names(names),
            ..Self::default()
        }
    }

    /// Parses the TOML form.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct RawConfig {
            #[serde(default)]
            module: Option<String>,
            #[serde(default)]
            strategy: Option<MatchStrategy>,
            #[serde(default)]
            exclude: Vec<String>,
            layers: Vec<String>,
        }

        let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let names = raw
            .layers
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty());

        Ok(Self {
            layers: layers_from_names(names),
            module: raw.module.map(|m| m.trim().to_owned()),
            strategy: raw.strategy,
            exclude: raw.exclude,
        })
    }

    /// Validate config consistency.
    ///
    /// # Errors
    ///
    /// Returns error describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_layers(&self.layers)?;

        if let Some(module) = &self.module {
            if module.is_empty() {
                return Err(ConfigError::Validation("module must not be empty".into()));
            }
        }

        Ok(())
    }
}

fn layers_from_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<Layer> {
    names
        .enumerate()
        .map(|(index, name)| Layer::new(index, name))
        .collect()
}

/// Checks the invariants a layer sequence must hold before a run.
pub(crate) fn validate_layers(layers: &[Layer]) -> Result<(), ConfigError> {
    if layers.len() < 2 {
        return Err(ConfigError::TooFewLayers {
            found: layers.len(),
        });
    }

    let mut seen = HashSet::new();
    for layer in layers {
        if layer.path.is_empty() {
            return Err(ConfigError::Validation(format!(
                "layer '{}' resolves to the module root",
                layer.name
            )));
        }
        if !seen.insert(layer.path.as_str()) {
            return Err(ConfigError::Validation(format!(
                "layer '{}' is listed more than once",
                layer.path
            )));
        }
    }

    Ok(())
}
