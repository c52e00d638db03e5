use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("phpspec configuration file was not found in {}", .path.display())]
    MissingConfigFile { path: PathBuf },
    #[error("phpspec configuration file {} is outside the project root", .path.display())]
    ConfigOutsideRoot { path: PathBuf },
    #[error("unit.concurrency must be at least 1")]
    ZeroConcurrency,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no tests to run")]
    NoTests,
}
