//! # gocal-go
//!
//! Go support for gocal. [`GoExtractor`] implements
//! [`gocal_core::LanguageExtractor`] with Tree-sitter, reading only the
//! package clause and the import declarations at the top of each `.go`
//! file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod go;

pub use go::GoExtractor;
