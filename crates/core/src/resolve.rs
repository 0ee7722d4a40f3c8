//! Lua-style module-name resolution.

use std::path::{Path, PathBuf};

/// Patterns tried for each search root, `package.path` style.
const PATTERNS: [&str; 2] = ["?.lua", "?/init.lua"];

/// Directories module names are resolved against: the entry file's directory
/// first, then its parent. The parent root lets a tree rooted at `lib/` keep
/// tree-qualified names (`require("lib.util")`) while sibling requires
/// (`require("util")`) resolve against the entry directory.
pub(crate) fn search_roots(entry_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![entry_dir.to_path_buf()];
    if let Some(parent) = entry_dir.parent() {
        roots.push(parent.to_path_buf());
    }
    roots
}

pub(crate) fn resolve(roots: &[PathBuf], name: &str) -> Option<PathBuf> {
    for candidate in candidates(roots, name) {
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Candidate paths in resolution order, for error messages.
pub(crate) fn candidates(roots: &[PathBuf], name: &str) -> Vec<PathBuf> {
    let rel = name.replace('.', "/");
    let mut out = Vec::with_capacity(roots.len() * PATTERNS.len());
    for root in roots {
        for pattern in PATTERNS {
            out.push(root.join(pattern.replace('?', &rel)));
        }
    }
    out
}
