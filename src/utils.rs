/*!
 * Utility functions for wpr
 */

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Rough token estimate used in reports (four characters per token)
pub fn estimate_tokens(chars: usize) -> usize {
    chars / 4
}

/// Default blacklist substrings, used when no `wpr.conf` exists
pub static DEFAULT_BLACKLIST: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control (directory forms, so .github/ and .gitignore stay)
        ".git/",
        ".svn/",
        ".hg/",
        // Our own output and config
        "wpr/",
        "wpr.conf",
        // OS Files
        ".DS_Store",
        "Thumbs.db",
        // Dependencies
        "node_modules",
        "bower_components",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        ".pnpm-store",
        "vendor/",
        // Build & Dist
        "target/",
        "dist/",
        "build/",
        ".next/",
        "coverage/",
        // Python
        "__pycache__",
        ".pytest_cache",
        ".venv",
        ".pyc",
        // IDEs & Editors
        ".idea",
        ".vscode",
        ".swp",
        ".swo",
        // Caches
        ".cache",
        ".eslintcache",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_size_units() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn default_blacklist_covers_vcs_and_output() {
        assert!(DEFAULT_BLACKLIST.contains(&".git/"));
        assert!(DEFAULT_BLACKLIST.contains(&"node_modules"));
        assert!(DEFAULT_BLACKLIST.contains(&"wpr/"));
        assert!(!DEFAULT_BLACKLIST.iter().any(|entry| entry.is_empty()));
    }
}
