//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r"# gocal layer configuration
#
# One layer directory per line, relative to the module root (the
# directory holding go.mod). List the innermost layer first: each layer
# may import the layers above it, never the layers below it. The last
# layer may import anything.

domain
usecase
infrastructure
";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(".gocal");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created .gocal");
    println!("\nNext steps:");
    println!("  1. Edit .gocal to list your layers, innermost first");
    println!("  2. Run: gocal");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gocal_core::LayerConfig;

    #[test]
    fn template_is_a_valid_config() {
        let config = LayerConfig::parse_lines(DEFAULT_CONFIG);
        assert!(config.validate().is_ok());
        let names: Vec<&str> = config.layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["domain", "usecase", "infrastructure"]);
    }
}
