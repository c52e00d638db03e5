use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// What one process left behind. Exit status is informational only.
#[derive(Clone, Debug, Default)]
pub struct Captured {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Run `program` in `dir`, capturing stdout and stderr separately. A
/// non-zero exit is not an error; failing to spawn is.
pub fn capture_cmd(dir: &Path, program: &Path, args: &[OsString]) -> Result<Captured> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    let out = cmd.output().with_context(|| format!("run {}", render_command(program, args)))?;
    Ok(Captured {
        status: out.status.code(),
        stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        stderr: String::from_utf8_lossy(&out.stderr).to_string(),
    })
}

/// Whether a bare executable name can be found on PATH. Anything with a
/// separator in it is a path, not a name.
pub fn binary_on_path(name: &str) -> bool {
    if name.is_empty() || name.contains(std::path::is_separator) {
        return false;
    }
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(name).is_file())
}

/// Shell-ish rendering of a command line for logs, so it can be pasted and
/// re-run by hand.
pub fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut parts = vec![quote(&program.to_string_lossy())];
    parts.extend(args.iter().map(|a| quote(&a.to_string_lossy())));
    parts.join(" ")
}

fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "-_./:=@+,".contains(c)) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
