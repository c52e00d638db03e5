use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use psu_core::{AffectedTest, ReportBatch, TestOutcome};
use psu_discovery::{resolve_spec, Conventions, OsFs, SpecFs};
use psu_report::{JunitReportParser, ReportError};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::util::{capture_cmd, render_command};
use crate::{doctor::doctor, Config, RunnerSettings};

/// Runs the specs covering a set of changed files and merges their reports.
pub struct Engine {
    pub repo_root: PathBuf,
    pub settings: RunnerSettings,
    pub conventions: Conventions,
    fs: Box<dyn SpecFs>,
}

/// One runner process to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Engine {
    /// Load and validate project configuration. A declared runner config
    /// that does not exist stops here, before anything runs. The root is
    /// canonicalized so relative roots discover the same specs.
    pub fn open(repo_root: PathBuf) -> Result<Self> {
        let repo_root = std::fs::canonicalize(&repo_root)
            .with_context(|| format!("resolve project root {}", repo_root.display()))?;
        let cfg = Config::load(&repo_root)?;
        let settings = cfg.resolve(&repo_root)?;
        Ok(Self::new(repo_root, settings))
    }

    pub fn new(repo_root: PathBuf, settings: RunnerSettings) -> Self {
        Self {
            repo_root,
            settings,
            conventions: Conventions::default(),
            fs: Box::new(OsFs),
        }
    }

    pub fn with_fs(mut self, fs: Box<dyn SpecFs>) -> Self {
        self.fs = fs;
        self
    }

    pub fn doctor(&self) -> Result<String> {
        doctor(&self.repo_root, &self.settings)
    }

    /// Pair each eligible changed path with its spec. Paths without one are
    /// dropped; a spec reached from several paths is listed once, at its
    /// first position.
    pub fn affected_tests(&self, paths: &[PathBuf]) -> Vec<AffectedTest> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for path in paths {
            let Some(spec) = resolve_spec(path, &self.repo_root, self.fs.as_ref(), &self.conventions) else {
                continue;
            };
            if seen.insert(spec.clone()) {
                out.push(AffectedTest { source: path.clone(), spec });
            }
        }
        out
    }

    pub fn invocation_for(&self, spec: &Path) -> Invocation {
        let mut args: Vec<OsString> = vec!["run".into()];
        if let Some(cfg) = &self.settings.config_file {
            args.push("-c".into());
            args.push(cfg.clone().into_os_string());
        }
        args.push("-f".into());
        args.push("junit".into());
        args.push(spec.as_os_str().to_owned());
        Invocation { program: self.settings.binary.clone(), args }
    }

    /// Discover, run and merge, in the order `paths` were given.
    pub fn run(&self, paths: &[PathBuf]) -> Result<Vec<TestOutcome>> {
        let tests = self.affected_tests(paths);
        if tests.is_empty() {
            return Err(EngineError::NoTests.into());
        }
        self.run_affected(&tests)
    }

    pub fn run_affected(&self, tests: &[AffectedTest]) -> Result<Vec<TestOutcome>> {
        let specs: Vec<&Path> = tests
            .iter()
            .map(|t| t.spec.as_path())
            .filter(|spec| {
                let exists = self.fs.exists(spec);
                if !exists {
                    debug!(spec = %spec.display(), "spec no longer exists, skipping");
                }
                exists
            })
            .collect();

        info!(specs = specs.len(), concurrency = self.settings.concurrency, "running specs");
        let batches = match rayon::ThreadPoolBuilder::new().num_threads(self.settings.concurrency).build() {
            Ok(pool) => pool.install(|| specs.par_iter().map(|spec| self.run_one(spec)).collect::<Vec<_>>()),
            Err(e) => {
                warn!("failed to create thread pool ({e}), running sequentially");
                specs.iter().map(|spec| self.run_one(spec)).collect()
            }
        };

        let mut outcomes = Vec::new();
        for (spec, batch) in specs.iter().zip(batches) {
            let batch = batch.with_context(|| format!("parse report for {}", spec.display()))?;
            outcomes.extend(batch);
        }
        Ok(outcomes)
    }

    fn run_one(&self, spec: &Path) -> Result<ReportBatch, ReportError> {
        let inv = self.invocation_for(spec);
        let name = self.display_name(spec);
        debug!(command = %render_command(&inv.program, &inv.args), "spawning runner");

        let captured = match capture_cmd(&self.repo_root, &inv.program, &inv.args) {
            Ok(c) => c,
            Err(e) => {
                warn!(spec = %name, "runner did not start: {e:#}");
                return Ok(vec![TestOutcome::broken(name, format!("{e:#}"))]);
            }
        };
        if captured.status != Some(0) {
            debug!(spec = %name, status = ?captured.status, "runner exited non-zero");
            if captured.stdout.trim().is_empty() {
                warn!(spec = %name, status = ?captured.status, "runner exited without a report");
            }
        }

        JunitReportParser::new().with_name(name).with_stderr(captured.stderr).parse(&captured.stdout)
    }

    fn display_name(&self, spec: &Path) -> String {
        spec.strip_prefix(&self.repo_root).unwrap_or(spec).display().to_string()
    }
}
