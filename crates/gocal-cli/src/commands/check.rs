//! Check command implementation.

use anyhow::{Context, Result};
use gocal_core::{read_module_path, LayerConfig, Linter};
use gocal_go::GoExtractor;

use crate::config_resolver::{self, ConfigSource};
use crate::{CheckArgs, MANIFEST_FILE, VIOLATIONS_EXIT_CODE};

/// Runs the check command.
pub fn run(args: &CheckArgs) -> Result<()> {
    let source = config_resolver::resolve(&args.dir, args.config.as_deref());
    let config_path = source.path();
    if matches!(source, ConfigSource::Default(_)) {
        tracing::debug!("No config found, expecting {}", config_path.display());
    }

    let config = LayerConfig::from_file(config_path).with_context(|| {
        format!(
            "Failed to get layer modules from config: {}",
            config_path.display()
        )
    })?;

    let module = match &config.module {
        Some(module) => module.clone(),
        None => {
            let manifest = args.dir.join(MANIFEST_FILE);
            read_module_path(&manifest).with_context(|| {
                format!("Failed to get module path from {}", manifest.display())
            })?
        }
    };

    let strategy = args
        .strategy
        .map(Into::into)
        .or(config.strategy)
        .unwrap_or_default();

    let linter = Linter::builder()
        .project_dir(&args.dir)
        .module(module)
        .layers(config.layers)
        .strategy(strategy)
        .excludes(config.exclude)
        .excludes(args.exclude.iter().cloned())
        .jobs(args.jobs)
        .extractor(GoExtractor::new())
        .build()
        .with_context(|| format!("Invalid layer configuration in {}", config_path.display()))?;

    tracing::info!(
        "Checking {} with {} layers ({} matching)",
        linter.project_dir().display(),
        linter.layers().len(),
        strategy
    );

    let report = linter.run();

    super::output::print(&report, args.format)?;

    // Exit with a distinct code if there are violations
    if report.has_violations() && !args.exit_zero {
        std::process::exit(VIOLATIONS_EXIT_CODE);
    }

    Ok(())
}
