//! Small utility functions used across the core module
//!
//! Path helpers for keyrings and log output. Keep this light.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
/// Paths without one, or with no resolvable home, come back unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Path relative to the working directory, for log lines
pub fn short_file_name(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
