//! Path normalization.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path (no filesystem access).
///
/// Collapses `.` and `..` without following symlinks. Leading `..` is kept
/// for relative paths and dropped at the root of absolute ones.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut has_root = false;

    for c in path.components() {
        match c {
            Component::Prefix(p) => {
                out.clear();
                out.push(p.as_os_str());
                has_root = true;
            }
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                has_root = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = out
                    .components()
                    .next_back()
                    .is_some_and(|last| matches!(last, Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !has_root {
                    out.push("..");
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }

    out
}

/// Resolve `path` against the current directory and normalize it.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize_lexical(&std::path::absolute(path)?))
}
