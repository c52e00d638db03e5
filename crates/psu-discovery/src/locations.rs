use std::collections::HashSet;
use std::path::{Component, Path, MAIN_SEPARATOR_STR};

use crate::conventions::Conventions;

/// Directories to look in for specs covering `path`. For `/a/b/c/X.php`:
///
/// the file's own directory,
///
///   /a/b/c/
///
/// a spec directory at every level of the ancestry,
///
///   /a/b/c/spec/  /a/b/spec/  /a/spec/  /spec/
///
/// each directory component replaced by a spec directory,
///
///   /a/b/spec/  /a/spec/c/  /spec/b/c/
///
/// and a spec directory inserted before each component,
///
///   /a/b/spec/c/  /a/spec/b/c/  /spec/a/b/c/
///
/// with every spec directory name tried at each step. Entries keep their
/// first-seen position and end with a separator. No filesystem access;
/// `path` is expected to be absolute and already normalized.
pub fn search_locations_for_tests(path: &Path, conventions: &Conventions) -> Vec<String> {
    let dir = path.parent().unwrap_or(Path::new(""));
    let parts: Vec<String> = dir
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let names = &conventions.spec_dir_names;

    let mut tries: Vec<Vec<String>> = vec![parts.clone()];

    // Ancestry, deepest first, down to the root.
    for depth in (0..=parts.len()).rev() {
        for name in names {
            let mut t = parts[..depth].to_vec();
            t.push(name.clone());
            tries.push(t);
        }
    }

    for key in (0..parts.len()).rev() {
        for name in names {
            let mut t = parts.clone();
            t[key] = name.clone();
            tries.push(t);
        }
    }

    for key in (0..parts.len()).rev() {
        for name in names {
            let mut t = parts.clone();
            t.insert(key, name.clone());
            tries.push(t);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(tries.len());
    for t in tries {
        let rendered = render_dir(&t);
        if seen.insert(rendered.clone()) {
            out.push(rendered);
        }
    }
    out
}

fn render_dir(parts: &[String]) -> String {
    if parts.is_empty() {
        return MAIN_SEPARATOR_STR.to_string();
    }
    format!("{sep}{}{sep}", parts.join(MAIN_SEPARATOR_STR), sep = MAIN_SEPARATOR_STR)
}
