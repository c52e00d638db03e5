use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::conventions::{Conventions, Eligibility};
use crate::locations::search_locations_for_tests;
use crate::traits::SpecFs;

/// Find the spec covering `path` by walking the candidates from
/// [`search_locations_for_tests`], original file name before spec name in
/// each directory. The first file that exists, sits under `root` and is not
/// the source file itself (compared case-insensitively) wins.
pub fn find_test_file(path: &Path, root: &Path, fs: &dyn SpecFs, conventions: &Conventions) -> Option<PathBuf> {
    let root = absolute(root);
    let root = root.as_path();
    let source = resolve(path, root);
    let file_name = source.file_name()?.to_str()?;
    let names = conventions.candidate_file_names(file_name);
    let source_key = fold(&resolved_form(&source, fs));

    for dir in search_locations_for_tests(&source, conventions) {
        for name in &names {
            let candidate = PathBuf::from(format!("{dir}{name}"));
            if !fs.exists(&candidate) {
                continue;
            }
            if !is_descendant(&candidate, root, fs) {
                trace!(candidate = %candidate.display(), "outside project root");
                continue;
            }
            if fold(&resolved_form(&candidate, fs)) == source_key {
                trace!(candidate = %candidate.display(), "same file as source");
                continue;
            }
            debug!(source = %source.display(), spec = %candidate.display(), "resolved spec");
            return Some(candidate);
        }
    }
    debug!(source = %source.display(), "no spec found");
    None
}

/// Spec to run for one changed path: the path itself when it is already a
/// spec, the discovered companion otherwise. Directories and non-source
/// files yield `None`.
pub fn resolve_spec(path: &Path, root: &Path, fs: &dyn SpecFs, conventions: &Conventions) -> Option<PathBuf> {
    let root = absolute(root);
    let root = root.as_path();
    let path = resolve(path, root);
    match conventions.classify(&path, fs) {
        Eligibility::OwnSpec => Some(path),
        Eligibility::NeedsDiscovery => find_test_file(&path, root, fs, conventions),
        Eligibility::Directory | Eligibility::NotSource => {
            trace!(path = %path.display(), "not eligible for discovery");
            None
        }
    }
}

/// Whether `path` lies inside `root`, compared component-wise.
pub fn is_descendant(path: &Path, root: &Path, fs: &dyn SpecFs) -> bool {
    resolved_form(&absolute(path), fs).starts_with(resolved_form(&absolute(root), fs))
}

/// Lexically resolve `.` and `..` without touching the filesystem.
/// Leading `..` of a relative path has nothing to cancel and is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `path` made absolute against the working directory, then normalized.
/// Candidate directories are rendered from the filesystem root, so roots
/// go through this first.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize(&cwd.join(path)),
        Err(_) => normalize(path),
    }
}

fn resolve(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

fn resolved_form(path: &Path, fs: &dyn SpecFs) -> PathBuf {
    fs.canonicalize(path).unwrap_or_else(|| normalize(path))
}

fn fold(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
