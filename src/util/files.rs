use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every regular file named `file_name` anywhere below `root`, in walk order.
pub fn find_named(root: &Path, file_name: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == file_name)
        .map(|e| e.into_path())
        .collect()
}

/// The first file directly inside `dir` whose name matches `pattern`.
///
/// Names are compared in lexicographic order so the answer does not depend on
/// directory listing order. A missing or unreadable directory simply has no match.
pub fn find_first(dir: &Path, pattern: &Pattern) -> Option<PathBuf> {
    let mut matches: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| pattern.matches(n))
        })
        .collect();
    matches.sort();
    matches.into_iter().next()
}
