/*!
 * Path eligibility rules
 *
 * The blacklist holds plain substrings: an entry matching anywhere in the
 * relative path excludes it, so `"git"` also excludes `digit.txt`. The
 * whitelist holds prefixes and only restricts files; directories stay
 * traversable so deeper whitelisted paths remain reachable.
 */

use serde::{Deserialize, Serialize};

use crate::utils::DEFAULT_BLACKLIST;

/// Inclusion and exclusion rules read from `wpr.conf`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules {
    /// Prefixes a file path must start with (empty admits everything)
    pub whitelist: Vec<String>,
    /// Substrings that exclude any path containing them
    pub blacklist: Vec<String>,
}

impl FilterRules {
    /// Rules used when no configuration file is present
    pub fn builtin() -> Self {
        Self {
            whitelist: Vec::new(),
            blacklist: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Drop empty blacklist entries, which would otherwise match every path
    pub fn normalized(mut self) -> Self {
        self.blacklist.retain(|entry| !entry.is_empty());
        self
    }
}

/// Decide whether a path relative to the scan root is eligible
pub fn is_eligible(relative_path: &str, is_dir: bool, rules: &FilterRules) -> bool {
    if rules
        .blacklist
        .iter()
        .any(|entry| relative_path.contains(entry.as_str()))
    {
        return false;
    }

    if rules.whitelist.is_empty() || is_dir {
        return true;
    }

    rules
        .whitelist
        .iter()
        .any(|prefix| relative_path.starts_with(prefix.as_str()))
}
