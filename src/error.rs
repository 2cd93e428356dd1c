//! Global error handling for wpr
//!
//! Every failure that can abort a run is represented here. Variants that
//! concern a particular file or directory carry its path so the user can
//! fix the problem and run again.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Global error type for wpr operations
#[derive(Error, Debug)]
pub enum WprError {
    /// The configuration file exists but cannot be parsed
    #[error("Malformed configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file exists but cannot be read
    #[error("Failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be read while walking the tree
    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A selected file could not be read while assembling the document
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output directory or document could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Terminal interaction failed
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Symlink installation errors
    #[error("Install error: {0}")]
    Install(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for wpr operations
pub type Result<T> = std::result::Result<T, WprError>;

/// Creates a WprError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::WprError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl WprError {
    /// Path of the file or directory involved in the failure, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::ConfigParse { path, .. }
            | Self::ConfigRead { path, .. }
            | Self::Scan { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => Some(path),
            _ => None,
        }
    }
}
