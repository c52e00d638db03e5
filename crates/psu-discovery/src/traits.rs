use std::path::{Path, PathBuf};

/// Filesystem queries discovery needs. Kept narrow so searches can run
/// against an in-memory tree in tests.
pub trait SpecFs: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Resolved absolute form of `path`, if the implementation can produce one.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
}

/// The real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFs;

impl SpecFs for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        std::fs::canonicalize(path).ok()
    }
}
