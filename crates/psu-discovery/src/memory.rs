use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::search::normalize;
use crate::traits::SpecFs;

/// In-memory file tree for tests. Parent directories of every added file
/// exist implicitly.
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fs = Self::new();
        for p in paths {
            fs.add_file(p);
        }
        fs
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>) {
        let path = normalize(path.as_ref());
        for parent in path.ancestors().skip(1) {
            self.dirs.insert(parent.to_path_buf());
        }
        self.files.insert(path);
    }
}

impl SpecFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        let path = normalize(path);
        self.files.contains(&path) || self.dirs.contains(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(&normalize(path))
    }

    fn canonicalize(&self, path: &Path) -> Option<PathBuf> {
        self.exists(path).then(|| normalize(path))
    }
}
