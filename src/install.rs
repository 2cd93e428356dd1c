/*!
 * Process-level operations that bypass the interactive bundler
 *
 * `--install` and `--uninstall` manage a `wpr` symlink in a bin directory;
 * `--init` writes the default configuration file.
 */

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::CONFIG_FILE_NAME;
use crate::error::{Result, WprError};
use crate::filter::FilterRules;
use crate::{bail, error};

/// Name of the link created in the bin directory
pub const LINK_NAME: &str = "wpr";

/// Write the built-in rules to `<root>/wpr.conf`
///
/// An existing file is left untouched and reported as an error.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    let path = root.join(CONFIG_FILE_NAME);
    if path.exists() {
        bail!(
            InvalidArgument,
            "{} already exists; remove it first to regenerate",
            path.display()
        );
    }

    let mut content = serde_json::to_string_pretty(&FilterRules::builtin())?;
    content.push('\n');
    fs::write(&path, content).map_err(|source| WprError::Write {
        path: path.clone(),
        source,
    })?;

    info!("Created {}", path.display());
    Ok(path)
}

/// Link the running executable into `bin_dir`
pub fn install(bin_dir: &Path) -> Result<PathBuf> {
    let exe = env::current_exe()?;
    install_executable(&exe, bin_dir)
}

/// Link `exe` into `bin_dir` as `wpr`, replacing an existing link
pub fn install_executable(exe: &Path, bin_dir: &Path) -> Result<PathBuf> {
    if !bin_dir.is_dir() {
        bail!(PathNotFound, "Bin directory not found: {}", bin_dir.display());
    }

    let link = bin_dir.join(LINK_NAME);
    match fs::symlink_metadata(&link) {
        Ok(meta) if meta.file_type().is_symlink() => {
            debug!("Replacing existing link {}", link.display());
            fs::remove_file(&link).map_err(|e| install_error(&link, e))?;
        }
        Ok(_) => bail!(
            Install,
            "{} exists and is not a symlink; refusing to replace it",
            link.display()
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(install_error(&link, e)),
    }

    symlink(exe, &link).map_err(|e| install_error(&link, e))?;
    info!("Linked {} -> {}", link.display(), exe.display());
    Ok(link)
}

/// Remove the `wpr` link from `bin_dir`
pub fn uninstall(bin_dir: &Path) -> Result<PathBuf> {
    let link = bin_dir.join(LINK_NAME);
    let meta = match fs::symlink_metadata(&link) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            bail!(PathNotFound, "{} is not installed", link.display())
        }
        Err(e) => return Err(install_error(&link, e)),
    };

    if !meta.file_type().is_symlink() {
        bail!(
            Install,
            "{} is not a symlink; refusing to remove it",
            link.display()
        );
    }

    fs::remove_file(&link).map_err(|e| install_error(&link, e))?;
    info!("Removed {}", link.display());
    Ok(link)
}

fn install_error(link: &Path, err: io::Error) -> WprError {
    if err.kind() == io::ErrorKind::PermissionDenied {
        error!(
            Install,
            "Permission denied for {}; try again with elevated privileges or pass --bin-dir",
            link.display()
        )
    } else {
        error!(Install, "{}: {}", link.display(), err)
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
