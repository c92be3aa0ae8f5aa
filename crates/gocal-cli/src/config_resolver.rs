//! Layer configuration file resolution.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. positional `CONFIG` argument (explicit path)
//! 2. `{module}/.gocal` or `{module}/.gocal.toml`
//! 3. `{module}/.gocal` as the expected default, reported if missing

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly given on the command line.
    Explicit(PathBuf),
    /// Found in the module root.
    Project(PathBuf),
    /// Nothing found; the default name is assumed.
    Default(PathBuf),
}

impl ConfigSource {
    /// Returns the resolved path.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Default(p) => p,
        }
    }
}

/// Module-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &[".gocal", ".gocal.toml"];

/// Resolves the configuration file path.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    // 1. Explicit path, trusted as-is (caller reports a missing file)
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // 2. Module-level config
    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    ConfigSource::Default(project_dir.join(PROJECT_CONFIG_NAMES[0]))
}
