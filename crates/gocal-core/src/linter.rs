//! Layer orchestration: runs the scanner and checker over every layer.

use std::path::{Path, PathBuf};
use std::thread;

use thiserror::Error;
use tracing::{debug, info};

use crate::checker::{check, MatchStrategy};
use crate::config::{validate_layers, ConfigError};
use crate::extractor::{ImportScanner, LanguageExtractor};
use crate::layer::Layer;
use crate::types::{CheckReport, LayerReport};

/// Errors that can occur while setting up a run.
#[derive(Debug, Error)]
pub enum LintError {
    /// Layer configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Exclude glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A required builder field was not set.
    #[error("Missing {0}")]
    Missing(&'static str),
}

/// Builder for configuring a [`Linter`].
#[derive(Default)]
pub struct LinterBuilder {
    project_dir: Option<PathBuf>,
    module: Option<String>,
    layers: Vec<Layer>,
    strategy: MatchStrategy,
    exclude_patterns: Vec<String>,
    jobs: usize,
    extractor: Option<Box<dyn LanguageExtractor>>,
}

impl LinterBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module root directory (default: current directory).
    #[must_use]
    pub fn project_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(path.into());
        self
    }

    /// Sets the root module identifier used to qualify layers.
    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Sets the ordered layer list, innermost first.
    #[must_use]
    pub fn layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Sets the layers from configured names, innermost first.
    #[must_use]
    pub fn layer_names<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let layers = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Layer::new(index, name))
            .collect();
        self.layers(layers)
    }

    /// Sets the import matching strategy (default: [`MatchStrategy::Prefix`]).
    #[must_use]
    pub fn strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the number of worker threads (default: 1, sequential).
    #[must_use]
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the language extractor.
    #[must_use]
    pub fn extractor<E: LanguageExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Builds the linter.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two layers are configured, a layer is
    /// listed twice, an exclude pattern is invalid, or the module or
    /// extractor was not set.
    pub fn build(self) -> Result<Linter, LintError> {
        validate_layers(&self.layers)?;

        let module = self.module.ok_or(LintError::Missing("module path"))?;
        if module.is_empty() {
            return Err(ConfigError::Validation("module path must not be empty".into()).into());
        }
        let extractor = self.extractor.ok_or(LintError::Missing("language extractor"))?;

        let exclude = self
            .exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Linter {
            project_dir: self.project_dir.unwrap_or_else(|| PathBuf::from(".")),
            module,
            layers: self.layers,
            strategy: self.strategy,
            exclude,
            jobs: self.jobs.max(1),
            extractor,
        })
    }
}

/// Checks every layer against the layers configured after it.
///
/// Use [`Linter::builder()`] to construct an instance.
pub struct Linter {
    project_dir: PathBuf,
    module: String,
    layers: Vec<Layer>,
    strategy: MatchStrategy,
    exclude: Vec<glob::Pattern>,
    jobs: usize,
    extractor: Box<dyn LanguageExtractor>,
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Returns the module root directory.
    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Returns the configured layers.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Qualified prefixes layer `index` must not import: every layer
    /// configured after it.
    #[must_use]
    pub fn forbidden_prefixes(&self, index: usize) -> Vec<String> {
        self.layers
            .iter()
            .skip(index + 1)
            .map(|layer| layer.qualified(&self.module))
            .collect()
    }

    /// Runs the check over every layer but the last.
    ///
    /// The last layer is the outermost one and may import anything.
    #[must_use]
    pub fn run(&self) -> CheckReport {
        let checked = self.layers.len().saturating_sub(1);
        info!(
            "Checking {} {} layer(s) of {} with {} worker(s)",
            checked,
            self.extractor.language_id(),
            self.module,
            self.jobs
        );

        let layers: Vec<LayerReport> = if self.jobs <= 1 || checked <= 1 {
            (0..checked).map(|i| self.check_layer(i)).collect()
        } else {
            self.run_parallel(checked)
        };

        let report = CheckReport {
            module: self.module.clone(),
            strategy: self.strategy,
            layers,
        };

        info!(
            "Check complete: {} violation(s) in {} file(s)",
            report.violation_count(),
            report.files_scanned()
        );

        report
    }

    /// Distributes layers round-robin over scoped workers, then restores
    /// configured layer order.
    fn run_parallel(&self, checked: usize) -> Vec<LayerReport> {
        let workers = self.jobs.min(checked);

        let mut results: Vec<(usize, LayerReport)> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        (worker..checked)
                            .step_by(workers)
                            .map(|i| (i, self.check_layer(i)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(reports) => reports,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        results.sort_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, report)| report).collect()
    }

    fn check_layer(&self, index: usize) -> LayerReport {
        let layer = &self.layers[index];
        let forbidden = self.forbidden_prefixes(index);
        debug!("Layer {}: forbidden {:?}", layer, forbidden);

        let scan = ImportScanner::new(self.extractor.as_ref(), &self.project_dir)
            .exclude(&self.exclude)
            .scan(&layer.dir(&self.project_dir));
        let violations = check(&scan.imports, &forbidden, self.strategy);

        debug!(
            "Layer {}: {} file(s), {} violation(s), {} diagnostic(s)",
            layer,
            scan.files_scanned,
            violations.len(),
            scan.diagnostics.len()
        );

        LayerReport {
            layer: layer.clone(),
            forbidden,
            files_scanned: scan.files_scanned,
            violations,
            diagnostics: scan.diagnostics,
        }
    }
}
