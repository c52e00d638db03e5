use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use psu_core::{Summary, TestOutcome};
use psu_discovery::{normalize, search_locations_for_tests, Conventions};
use psu_report::JunitReportParser;
use psu_runner::{Engine, EngineError};

#[derive(Parser)]
#[command(name = "psu", version)]
struct Cli {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Log discovery decisions and the exact runner command lines
    #[arg(long, global = true)]
    trace: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the directories searched for a file's spec, in order
    Locations { path: PathBuf },

    /// Print the spec each changed file maps to
    Discover {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Run the specs covering the changed files
    Run {
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Normalize a saved JUnit report
    Parse {
        report: PathBuf,
        /// Runner stderr to attach if the report is empty
        #[arg(long)]
        stderr: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration and the phpspec binary
    Doctor,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.trace { EnvFilter::new("debug") } else { EnvFilter::from_default_env() };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let repo_root = match cli.root {
        Some(root) => std::fs::canonicalize(&root).with_context(|| format!("resolve --root {}", root.display()))?,
        None => std::env::current_dir()?,
    };

    match cli.cmd {
        Command::Locations { path } => {
            for dir in locations(&repo_root, &path) {
                println!("{dir}");
            }
        }
        Command::Discover { paths } => {
            let engine = Engine::open(repo_root)?;
            for t in engine.affected_tests(&paths) {
                println!("{} -> {}", t.source.display(), t.spec.display());
            }
        }
        Command::Run { json, paths } => {
            let engine = Engine::open(repo_root)?;
            let outcomes = match engine.run(&paths) {
                Ok(o) => o,
                Err(e) if matches!(e.downcast_ref::<EngineError>(), Some(EngineError::NoTests)) => {
                    println!("No tests to run.");
                    return Ok(ExitCode::SUCCESS);
                }
                Err(e) => return Err(e),
            };
            return report(&outcomes, json);
        }
        Command::Parse { report: path, stderr, json } => {
            let stdout = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
            let stderr = match stderr {
                Some(p) => std::fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?,
                None => String::new(),
            };
            let outcomes = JunitReportParser::new().with_stderr(stderr).parse(&stdout)?;
            return report(&outcomes, json);
        }
        Command::Doctor => {
            let engine = Engine::open(repo_root)?;
            let version = engine.doctor()?;
            println!("OK ({version})");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Candidate directories for `path`, taken relative to `repo_root` and
/// normalized before components are split.
fn locations(repo_root: &Path, path: &Path) -> Vec<String> {
    search_locations_for_tests(&normalize(&repo_root.join(path)), &Conventions::default())
}

fn report(outcomes: &[TestOutcome], json: bool) -> anyhow::Result<ExitCode> {
    let summary = Summary::from_outcomes(outcomes);
    if json {
        println!("{}", serde_json::to_string_pretty(outcomes)?);
    } else {
        for o in outcomes {
            println!("{:<6} {} ({:.3}s)", o.status.label(), o.name, o.duration);
            if let Some(detail) = o.detail.as_deref().filter(|d| !d.is_empty()) {
                for line in detail.lines() {
                    println!("       {line}");
                }
            }
        }
        println!(
            "{} passed, {} failed, {} skipped, {} broken in {:.3}s",
            summary.passed, summary.failed, summary.skipped, summary.broken, summary.duration
        );
    }
    Ok(if summary.has_failures() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn locations_resolve_parent_dirs() {
        let dirs = locations(Path::new("/proj/app"), Path::new("../lib/./Foo.php"));
        assert_eq!(dirs[0], "/proj/lib/");
        assert_eq!(dirs, locations(Path::new("/"), Path::new("/proj/lib/Foo.php")));
    }
}
