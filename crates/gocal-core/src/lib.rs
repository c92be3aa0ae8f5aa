//! # gocal-core
//!
//! Core engine for checking layered ("clean") architecture rules in Go
//! modules.
//!
//! Layers are totally ordered: a layer may import the layers listed before
//! it, but never the layers listed after it. This crate provides:
//!
//! - [`Layer`] and [`qualify`] for turning configured layer names into
//!   fully-qualified import path prefixes
//! - [`LanguageExtractor`] trait and [`ImportScanner`] for collecting the
//!   import paths declared under a layer directory
//! - [`check`] for matching collected imports against forbidden prefixes
//! - [`Linter`] for orchestrating a run over all configured layers
//! - [`LayerConfig`] and [`read_module_path`] for loading the layer list
//!   and the module path from disk
//!
//! ## Example
//!
//! ```ignore
//! use gocal_core::{LayerConfig, Linter};
//!
//! let config = LayerConfig::from_file(".gocal".as_ref())?;
//! let linter = Linter::builder()
//!     .module("example.com/shop")
//!     .layers(config.layers)
//!     .extractor(MyExtractor::new())
//!     .build()?;
//!
//! let report = linter.run();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod extractor;
mod layer;
mod linter;
mod manifest;
mod types;

pub use checker::{check, MatchStrategy, ParseStrategyError};
pub use config::{ConfigError, LayerConfig};
pub use extractor::{ImportInfo, ImportMap, ImportScan, ImportScanner, LanguageExtractor, ParseError};
pub use layer::{qualify, Layer};
pub use linter::{LintError, Linter, LinterBuilder};
pub use manifest::{parse_module_path, read_module_path};
pub use types::{CheckReport, Diagnostic, DiagnosticKind, LayerReport, Violation};
