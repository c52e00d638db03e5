use std::path::Path;

use crate::traits::SpecFs;

/// Reserved names that tie a source file to its spec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conventions {
    /// Source extension without the dot.
    pub extension: String,
    /// Appended to the file stem to form the spec file name (`FooSpec.php`).
    pub spec_suffix: String,
    /// Directory names searched for specs, in priority order.
    pub spec_dir_names: Vec<String>,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            extension: "php".to_string(),
            spec_suffix: "Spec".to_string(),
            spec_dir_names: vec!["spec".to_string(), "Spec".to_string()],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Directory,
    NotSource,
    /// Already named like a spec; run it directly.
    OwnSpec,
    NeedsDiscovery,
}

impl Conventions {
    fn dotted_extension(&self) -> String {
        format!(".{}", self.extension)
    }

    fn spec_file_tail(&self) -> String {
        format!("{}.{}", self.spec_suffix, self.extension)
    }

    /// Decide what to do with one changed path before any search happens.
    pub fn classify(&self, path: &Path, fs: &dyn SpecFs) -> Eligibility {
        if fs.is_dir(path) {
            return Eligibility::Directory;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Eligibility::NotSource;
        };
        if !name.ends_with(&self.dotted_extension()) {
            return Eligibility::NotSource;
        }
        if name.ends_with(&self.spec_file_tail()) {
            return Eligibility::OwnSpec;
        }
        Eligibility::NeedsDiscovery
    }

    /// File names tried in every candidate directory: the name unchanged,
    /// then `X<suffix>.<ext>`.
    pub fn candidate_file_names(&self, file_name: &str) -> [String; 2] {
        let stem = file_name.strip_suffix(&self.dotted_extension()).unwrap_or(file_name);
        [file_name.to_string(), format!("{}{}", stem, self.spec_file_tail())]
    }
}
