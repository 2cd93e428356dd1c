/*!
 * Core types and data structures for the wpr application
 */

use std::fmt;
use std::path::{Path, PathBuf};

/// A file path relative to the scan root, always `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidatePath(String);

impl CandidatePath {
    /// Build a candidate from a path relative to the scan root
    pub fn from_relative(path: &Path) -> Self {
        Self(normalize_path(&path.to_string_lossy()))
    }

    /// The relative path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the candidate against the scan root
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl From<&str> for CandidatePath {
    fn from(path: &str) -> Self {
        Self(normalize_path(path))
    }
}

impl fmt::Display for CandidatePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CandidatePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Every eligible file found by one scan, in traversal order
pub type CandidateSet = Vec<CandidatePath>;

/// What the user typed into the search prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Nothing typed: list every candidate
    Empty,
    /// Search text for the fuzzy index
    Text(String),
}

impl Query {
    /// Classify raw input; surrounding whitespace is not significant
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }
}

/// One entry offered to the user during selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Finish selecting
    Done,
    /// Add this file to the selection
    File(CandidatePath),
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Done => f.write_str("Done"),
            Choice::File(path) => write!(f, "{}", path),
        }
    }
}

/// Convert platform separators to forward slashes
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
