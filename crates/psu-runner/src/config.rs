use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use psu_discovery::normalize;

use crate::error::ConfigError;
use crate::util::binary_on_path;

pub const DEFAULT_BINARY: &str = "phpspec";
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Project configuration as written in `psu.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Runner configuration file, relative to the project root.
    #[serde(default)]
    pub phpspec_config: Option<String>,
    #[serde(default)]
    pub unit: UnitConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    #[serde(default)]
    pub phpspec: PhpspecConfig,
    #[serde(default)]
    pub concurrency: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhpspecConfig {
    #[serde(default)]
    pub binary: Option<String>,
}

/// `.arcconfig` spells the same options as flat dotted keys.
#[derive(Debug, Default, Deserialize)]
struct ArcConfig {
    #[serde(default)]
    phpspec_config: Option<String>,
    #[serde(default, rename = "unit.phpspec.binary")]
    binary: Option<String>,
    #[serde(default, rename = "unit.concurrency")]
    concurrency: Option<usize>,
}

impl From<ArcConfig> for Config {
    fn from(a: ArcConfig) -> Self {
        Config {
            phpspec_config: a.phpspec_config,
            unit: UnitConfig {
                phpspec: PhpspecConfig { binary: a.binary },
                concurrency: a.concurrency,
            },
        }
    }
}

/// Settings the engine runs with, validated against the project root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerSettings {
    pub binary: PathBuf,
    pub config_file: Option<PathBuf>,
    pub concurrency: usize,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            config_file: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// `psu.toml` wins over `.arcconfig`; neither present means defaults.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let toml_path = Self::config_path(repo_root);
        if toml_path.exists() {
            return Self::load_from(&toml_path);
        }
        let arc_path = Self::arcconfig_path(repo_root);
        if arc_path.exists() {
            return Self::load_arcconfig(&arc_path);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_arcconfig(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let arc: ArcConfig = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(arc.into())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Check the declared runner config exists under the root and pick the
    /// binary: a bare name found on PATH is used as is, anything else is
    /// taken relative to the root.
    pub fn resolve(&self, repo_root: &Path) -> Result<RunnerSettings, ConfigError> {
        let config_file = match &self.phpspec_config {
            Some(rel) => {
                let path = normalize(&repo_root.join(rel));
                if !path.starts_with(normalize(repo_root)) {
                    return Err(ConfigError::ConfigOutsideRoot { path });
                }
                if !path.exists() {
                    return Err(ConfigError::MissingConfigFile { path });
                }
                Some(path)
            }
            None => None,
        };

        let binary = match &self.unit.phpspec.binary {
            Some(bin) => {
                let bin = shellexpand::tilde(bin).to_string();
                if binary_on_path(&bin) {
                    PathBuf::from(bin)
                } else {
                    normalize(&repo_root.join(bin))
                }
            }
            None => PathBuf::from(DEFAULT_BINARY),
        };

        let concurrency = match self.unit.concurrency {
            Some(0) => return Err(ConfigError::ZeroConcurrency),
            Some(n) => n,
            None => DEFAULT_CONCURRENCY,
        };

        Ok(RunnerSettings { binary, config_file, concurrency })
    }

    pub fn config_path(repo_root: &Path) -> PathBuf {
        repo_root.join("psu.toml")
    }

    pub fn arcconfig_path(repo_root: &Path) -> PathBuf {
        repo_root.join(".arcconfig")
    }
}
