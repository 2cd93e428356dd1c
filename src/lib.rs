/*!
 * wpr - Bundle hand-picked project files and a prompt into one document
 *
 * This library scans a project tree under blacklist/whitelist rules, lets a
 * user pick files through fuzzy search, and writes the picked files together
 * with a prompt into a Markdown document under `wpr/`.
 */

pub mod app;
pub mod config;
pub mod error;
pub mod filter;
pub mod fuzzy;
pub mod install;
pub mod prompt;
pub mod report;
pub mod scanner;
pub mod session;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use app::bundle;
pub use config::{Config, Mode};
pub use error::{Result, WprError};
pub use filter::{is_eligible, FilterRules};
pub use fuzzy::{FuzzyIndex, FuzzyMatch, FuzzyOptions};
pub use prompt::{Prompter, TerminalPrompter};
pub use report::{BundleReport, ReportFormat, Reporter};
pub use scanner::Scanner;
pub use session::{SelectionSession, SessionState};
pub use types::{CandidatePath, CandidateSet, Choice, Query};
pub use writer::{derive_filename, Document, DocumentWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
