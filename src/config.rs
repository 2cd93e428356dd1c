/*!
 * Configuration handling for wpr
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use tracing::debug;

use crate::error::{Result, WprError};
use crate::filter::FilterRules;
use crate::fuzzy::FuzzyOptions;
use crate::{bail, ensure};

/// Name of the configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "wpr.conf";

/// Name of the directory documents are written to
pub const OUTPUT_DIR_NAME: &str = "wpr";

/// Default directory the executable is linked into by `--install`
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Command-line arguments for wpr
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "wpr",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pick project files interactively and bundle them with a prompt",
    long_about = "Searches the project tree, lets you pick files one at a time, asks for a prompt and writes everything into a single Markdown document under wpr/."
)]
pub struct Args {
    /// Project directory to scan
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Configuration file to use instead of <DIRECTORY>/wpr.conf
    #[clap(long)]
    pub config: Option<String>,

    /// Fuzzy search permissiveness (0.0 = exact substring, 1.0 = anything goes)
    #[clap(long, default_value_t = FuzzyOptions::default().threshold)]
    pub threshold: f64,

    /// Furthest apart two swapped characters may be and still count as one edit
    #[clap(long, default_value_t = FuzzyOptions::default().max_transposition)]
    pub max_transposition: usize,

    /// Write a default wpr.conf into the project directory and exit
    #[clap(long, conflicts_with_all = ["install", "uninstall"])]
    pub init: bool,

    /// Link this executable into the bin directory and exit
    #[clap(long, conflicts_with = "uninstall")]
    pub install: bool,

    /// Remove the link created by --install and exit
    #[clap(long)]
    pub uninstall: bool,

    /// Directory used by --install and --uninstall
    #[clap(long, default_value = DEFAULT_BIN_DIR)]
    pub bin_dir: String,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Enable verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

/// What a single invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Interactive selection and document assembly
    Bundle,
    /// Write the default configuration file
    Init,
    /// Symlink the executable into the bin directory
    Install,
    /// Remove that symlink
    Uninstall,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Project directory to scan
    pub target_dir: PathBuf,

    /// Explicit configuration file, if given
    pub config_file: Option<PathBuf>,

    /// Fuzzy matching parameters
    pub fuzzy: FuzzyOptions,

    /// Directory for --install and --uninstall
    pub bin_dir: PathBuf,

    /// Selected operation
    pub mode: Mode,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let mode = if args.init {
            Mode::Init
        } else if args.install {
            Mode::Install
        } else if args.uninstall {
            Mode::Uninstall
        } else {
            Mode::Bundle
        };

        Self {
            target_dir: PathBuf::from(args.directory_path),
            config_file: args.config.map(PathBuf::from),
            fuzzy: FuzzyOptions {
                threshold: args.threshold,
                max_transposition: args.max_transposition,
            },
            bin_dir: PathBuf::from(args.bin_dir),
            mode,
        }
    }

    /// Configuration for bundling `target_dir` with default settings
    pub fn for_dir(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            config_file: None,
            fuzzy: FuzzyOptions::default(),
            bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
            mode: Mode::Bundle,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.exists() || !self.target_dir.is_dir() {
            bail!(
                PathNotFound,
                "Target directory not found: {}",
                self.target_dir.display()
            );
        }

        ensure!(
            (0.0..=1.0).contains(&self.fuzzy.threshold),
            InvalidArgument,
            "--threshold must be between 0.0 and 1.0, got {}",
            self.fuzzy.threshold
        );

        if let Some(path) = &self.config_file {
            if !path.is_file() {
                bail!(
                    PathNotFound,
                    "Configuration file not found: {}",
                    path.display()
                );
            }
        }

        Ok(())
    }

    /// Configuration file consulted for filter rules
    pub fn rules_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| self.target_dir.join(CONFIG_FILE_NAME))
    }

    /// Directory documents are written to
    pub fn output_dir(&self) -> PathBuf {
        self.target_dir.join(OUTPUT_DIR_NAME)
    }
}

/// Load filter rules, falling back to the built-in rules when the file is absent
pub fn load_rules(path: &Path) -> Result<FilterRules> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No {} found, using built-in rules", path.display());
            return Ok(FilterRules::builtin());
        }
        Err(source) => {
            return Err(WprError::ConfigRead {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let rules: FilterRules =
        serde_json::from_str(&content).map_err(|source| WprError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        whitelist = rules.whitelist.len(),
        blacklist = rules.blacklist.len(),
        "Loaded rules from {}",
        path.display()
    );

    Ok(rules.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_uses_builtin_rules() {
        let dir = tempdir().unwrap();
        let rules = load_rules(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(rules, FilterRules::builtin());
        assert!(rules.whitelist.is_empty());
    }

    #[test]
    fn config_file_is_authoritative() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "whitelist": ["src"], "blacklist": ["gen"] }"#).unwrap();

        let rules = load_rules(&path).unwrap();
        assert_eq!(rules.whitelist, vec!["src".to_string()]);
        assert_eq!(rules.blacklist, vec!["gen".to_string()]);
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "whitelist": "src" "#).unwrap();

        match load_rules(&path) {
            Err(WprError::ConfigParse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected ConfigParse, got {:?}", other),
        }
    }

    #[test]
    fn wrong_types_are_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{ "blacklist": [1, 2] }"#).unwrap();

        assert!(matches!(
            load_rules(&path),
            Err(WprError::ConfigParse { .. })
        ));
    }

    #[test]
    fn unreadable_config_names_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&path).unwrap();

        let err = load_rules(&path).unwrap_err();
        assert!(matches!(err, WprError::ConfigRead { .. }));
        assert_eq!(err.path(), Some(&path));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn mode_follows_flags() {
        let args = Args::parse_from(["wpr", "--init", "proj"]);
        let config = Config::from_args(args);
        assert_eq!(config.mode, Mode::Init);
        assert_eq!(config.target_dir, PathBuf::from("proj"));
        assert_eq!(config.rules_path(), PathBuf::from("proj").join("wpr.conf"));
        assert_eq!(config.output_dir(), PathBuf::from("proj").join("wpr"));

        let config = Config::from_args(Args::parse_from(["wpr"]));
        assert_eq!(config.mode, Mode::Bundle);
        assert_eq!(config.bin_dir, PathBuf::from(DEFAULT_BIN_DIR));
        assert_eq!(config.fuzzy, FuzzyOptions::default());
    }

    #[test]
    fn conflicting_modes_are_rejected() {
        assert!(Args::try_parse_from(["wpr", "--install", "--uninstall"]).is_err());
        assert!(Args::try_parse_from(["wpr", "--init", "--install"]).is_err());
    }

    #[test]
    fn validate_rejects_bad_threshold_and_missing_dir() {
        let dir = tempdir().unwrap();
        let mut config = Config::for_dir(dir.path());
        assert!(config.validate().is_ok());

        config.fuzzy.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(WprError::InvalidArgument(_))
        ));

        let config = Config::for_dir(dir.path().join("missing"));
        assert!(matches!(config.validate(), Err(WprError::PathNotFound(_))));
    }
}
