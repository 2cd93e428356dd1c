/*!
 * Directory scanning
 *
 * Walks the project tree in the order the filesystem reports entries,
 * applying the filter rules to every file and directory on the way down.
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::ProgressBar;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, WprError};
use crate::filter::{is_eligible, FilterRules};
use crate::types::{CandidatePath, CandidateSet};

/// Scanner statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannerStatistics {
    /// Directories descended into
    pub directories_visited: usize,
    /// Eligible files found
    pub files_found: usize,
    /// Files and directories rejected by the rules
    pub entries_excluded: usize,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Directory being scanned
    root: PathBuf,
    /// Eligibility rules
    rules: FilterRules,
    /// Progress spinner
    pub progress: Arc<ProgressBar>,
    /// Statistics from the last scan
    statistics: ScannerStatistics,
}

impl Scanner {
    /// Create a new scanner
    pub fn new(root: impl Into<PathBuf>, rules: FilterRules, progress: Arc<ProgressBar>) -> Self {
        Self {
            root: root.into(),
            rules,
            progress,
            statistics: ScannerStatistics::default(),
        }
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> &ScannerStatistics {
        &self.statistics
    }

    /// Scan the root and return every eligible file, depth-first
    ///
    /// Entries are not sorted. Any unreadable directory aborts the scan.
    pub fn scan(&mut self) -> Result<CandidateSet> {
        let root = self.root.clone();
        let rules = &self.rules;
        let mut statistics = ScannerStatistics::default();
        let mut candidates = CandidateSet::new();

        let walker = WalkDir::new(&root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let keep = entry.depth() == 0 || entry_is_eligible(&root, entry, rules);
                if !keep {
                    statistics.entries_excluded += 1;
                }
                keep
            });

        // The filter closure borrows `statistics`, so collect the walk first
        let mut entries = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| WprError::Scan {
                path: source
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.clone()),
                source,
            })?;
            entries.push(entry);
        }

        for entry in entries {
            if entry.file_type().is_dir() {
                statistics.directories_visited += 1;
                self.progress
                    .set_message(format!("Scanning {}", entry.path().display()));
                continue;
            }

            if !is_regular_file(&entry) {
                continue;
            }

            let Some(relative) = relative_path(&root, &entry) else {
                continue;
            };

            self.progress.inc(1);
            statistics.files_found += 1;
            candidates.push(relative);
        }

        debug!(
            root = %root.display(),
            files = statistics.files_found,
            directories = statistics.directories_visited,
            excluded = statistics.entries_excluded,
            "Scan complete"
        );

        self.statistics = statistics;
        Ok(candidates)
    }
}

fn relative_path(root: &Path, entry: &DirEntry) -> Option<CandidatePath> {
    entry
        .path()
        .strip_prefix(root)
        .ok()
        .map(CandidatePath::from_relative)
}

fn entry_is_eligible(root: &Path, entry: &DirEntry, rules: &FilterRules) -> bool {
    match relative_path(root, entry) {
        Some(relative) => is_eligible(relative.as_str(), entry.file_type().is_dir(), rules),
        None => false,
    }
}

/// Regular files, plus symlinks that resolve to one
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn scan(root: &Path, rules: FilterRules) -> Result<Vec<String>> {
        let mut scanner = Scanner::new(root, rules, Arc::new(ProgressBar::hidden()));
        Ok(scanner
            .scan()?
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect())
    }

    fn rules(whitelist: &[&str], blacklist: &[&str]) -> FilterRules {
        FilterRules {
            whitelist: whitelist.iter().map(|s| s.to_string()).collect(),
            blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn finds_nested_files_with_relative_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/app")).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("src/app/main.rs"), "fn main() {}").unwrap();

        let mut found = scan(dir.path(), rules(&[], &[])).unwrap();
        found.sort();
        assert_eq!(found, vec!["a.txt", "src/app/main.rs"]);
    }

    #[test]
    fn descendants_follow_their_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("one")).unwrap();
        fs::create_dir_all(dir.path().join("two")).unwrap();
        fs::write(dir.path().join("one/x.txt"), "").unwrap();
        fs::write(dir.path().join("one/y.txt"), "").unwrap();
        fs::write(dir.path().join("two/z.txt"), "").unwrap();

        let found = scan(dir.path(), rules(&[], &[])).unwrap();
        assert_eq!(found.len(), 3);
        let one: Vec<usize> = found
            .iter()
            .enumerate()
            .filter(|(_, p)| p.starts_with("one/"))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(one.len(), 2);
        assert_eq!(one[1], one[0] + 1, "depth-first order broken: {:?}", found);
    }

    #[test]
    fn blacklisted_directories_are_pruned() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(dir.path().join("index.js"), "").unwrap();

        let mut scanner = Scanner::new(
            dir.path(),
            rules(&[], &["node_modules"]),
            Arc::new(ProgressBar::hidden()),
        );
        let found = scanner.scan().unwrap();
        assert_eq!(found, vec![CandidatePath::from("index.js")]);
        assert_eq!(scanner.get_statistics().entries_excluded, 1);
        assert_eq!(scanner.get_statistics().files_found, 1);
    }

    #[test]
    fn whitelist_reaches_nested_matches_only() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("lib/src")).unwrap();
        fs::write(dir.path().join("src/app.js"), "").unwrap();
        fs::write(dir.path().join("lib/app.js"), "").unwrap();
        fs::write(dir.path().join("lib/src/deep.js"), "").unwrap();

        let found = scan(dir.path(), rules(&["src", "lib/src"], &[])).unwrap();
        let mut found = found;
        found.sort();
        assert_eq!(found, vec!["lib/src/deep.js", "src/app.js"]);
    }

    #[test]
    fn builtin_rules_skip_vcs_and_output() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("wpr")).unwrap();
        fs::write(dir.path().join(".git/config"), "[core]").unwrap();
        fs::write(dir.path().join("wpr/old.md"), "# Prompt").unwrap();
        fs::write(dir.path().join("main.rs"), "").unwrap();
        fs::create_dir_all(dir.path().join(".github/workflows")).unwrap();
        fs::write(dir.path().join(".github/workflows/ci.yml"), "on: push").unwrap();
        fs::write(dir.path().join(".gitignore"), "target/").unwrap();

        let mut found = scan(dir.path(), FilterRules::builtin()).unwrap();
        found.sort();
        assert_eq!(found, vec![".github/workflows/ci.yml", ".gitignore", "main.rs"]);
    }

    #[test]
    fn missing_root_is_a_scan_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        match scan(&missing, rules(&[], &[])) {
            Err(WprError::Scan { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Scan error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_candidates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("link.txt"))
            .unwrap();

        let mut found = scan(dir.path(), rules(&[], &[])).unwrap();
        found.sort();
        assert_eq!(found, vec!["link.txt", "real.txt"]);
    }
}
