use anyhow::{anyhow, Context, Result};
use std::ffi::OsString;
use std::path::Path;

use crate::util::{binary_on_path, capture_cmd};
use crate::RunnerSettings;

/// Check the runner can be started from `repo_root`. Returns the version line
/// it reports.
pub fn doctor(repo_root: &Path, settings: &RunnerSettings) -> Result<String> {
    if !repo_root.is_dir() {
        return Err(anyhow!("project root {} is not a directory", repo_root.display()));
    }

    let bin = &settings.binary;
    let findable = binary_on_path(&bin.to_string_lossy()) || bin.is_file();
    if !findable {
        return Err(anyhow!(
            "phpspec binary {} not found; install it with `composer require --dev phpspec/phpspec` or set unit.phpspec.binary",
            bin.display()
        ));
    }

    if let Some(cfg) = &settings.config_file {
        if !cfg.is_file() {
            return Err(anyhow!("phpspec configuration file {} is missing", cfg.display()));
        }
    }

    let out = capture_cmd(repo_root, bin, &[OsString::from("--version")]).context("phpspec --version")?;
    if out.status != Some(0) {
        return Err(anyhow!("{} --version exited with {:?}: {}", bin.display(), out.status, out.stderr.trim()));
    }
    Ok(out.stdout.lines().next().unwrap_or_default().trim().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn stub(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("phpspec");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn reports_version() {
        let dir = tempfile::tempdir().unwrap();
        let binary = stub(dir.path(), "echo 'phpspec 7.5.0'");
        let settings = RunnerSettings { binary, ..Default::default() };
        assert_eq!(doctor(dir.path(), &settings).unwrap(), "phpspec 7.5.0");
    }

    #[test]
    fn missing_binary_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RunnerSettings { binary: dir.path().join("vendor/bin/phpspec"), ..Default::default() };
        let err = doctor(dir.path(), &settings).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn failing_version_check_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let binary = stub(dir.path(), "echo boom >&2; exit 2");
        let settings = RunnerSettings { binary, ..Default::default() };
        let err = doctor(dir.path(), &settings).unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
