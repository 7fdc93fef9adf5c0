// src/core/file.rs
//! Filesystem side of pillar handling
//!
//! Reading documents, rejecting include directives before parsing,
//! discovering `.sls` files under a directory, and writing output either
//! to stdout or atomically over a path.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::consts::INCLUDE_DIRECTIVE;
use crate::core::Result;
use crate::error::CoreError;

/// Where a rendered buffer goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// Reject documents containing an `include:` line (1-based line in the error)
pub fn scan_for_includes(bytes: &[u8]) -> Result<()> {
    let text = String::from_utf8_lossy(bytes);
    match text
        .lines()
        .position(|line| line.contains(INCLUDE_DIRECTIVE))
    {
        Some(index) => Err(CoreError::IncludeDirective { line: index + 1 }),
        None => Ok(()),
    }
}

pub fn read_sls_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CoreError::FileIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Must exist and be a regular file
pub fn check_for_file(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|source| CoreError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.is_file() {
        Ok(())
    } else {
        Err(CoreError::NotAFile(path.to_path_buf()))
    }
}

/// Must exist and be a directory
pub fn check_for_dir(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|source| CoreError::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.is_dir() {
        Ok(())
    } else {
        Err(CoreError::NotADirectory(path.to_path_buf()))
    }
}

/// Every regular file under `dir` whose name contains `extension`, sorted.
/// Unreadable entries are logged and skipped.
pub fn find_sls_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_string_lossy().contains(extension))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    debug!("found {} files under {}", files.len(), dir.display());
    files
}

pub fn write_sls_file(buffer: &[u8], destination: &Destination) -> Result<()> {
    match destination {
        Destination::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(buffer)?;
            stdout.flush()?;
            Ok(())
        }
        Destination::File(path) => write_atomic(path, buffer),
    }
}

/// Replace `path` with `buffer` via a temp file in the same directory.
///
/// Readers see either the old content or the new, never a partial write.
/// An existing file keeps its permissions; a new one gets `NEW_FILE_MODE`.
pub fn write_atomic(path: &Path, buffer: &[u8]) -> Result<()> {
    let io_err = |source| CoreError::FileIo {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(io_err)?;

    let existing = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = tempfile::Builder::new()
        .prefix(".secure-pillar-")
        .suffix(".tmp")
        .tempfile_in(&dir)
        .map_err(io_err)?;
    tmp.write_all(buffer).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;

    match existing {
        Some(perms) => tmp.as_file().set_permissions(perms).map_err(io_err)?,
        None => set_new_file_mode(tmp.as_file()).map_err(io_err)?,
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_new_file_mode(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(crate::consts::NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn set_new_file_mode(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
