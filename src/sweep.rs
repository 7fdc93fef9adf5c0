// src/sweep.rs
//! Directory sweep: one action over every document under a directory
//!
//! Sequential. A file that fails is logged and skipped; the sweep carries
//! on. Encrypt and decrypt rewrite each file in place, identify prints a
//! report to the supplied writer instead.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::core::crypto::Cipher;
use crate::core::file::{check_for_dir, find_sls_files, write_atomic};
use crate::core::util::short_file_name;
use crate::core::Result;
use crate::enums::Action;
use crate::error::CoreError;
use crate::pillar::Pillar;

#[derive(Debug, Default)]
pub struct SweepReport {
    pub processed: usize,
    pub failed: Vec<(PathBuf, CoreError)>,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.processed + self.failed.len()
    }
}

/// Apply `action` to every document under `dir`.
///
/// Fails before touching anything when `dir` is not a directory or holds
/// no documents.
pub fn sweep_dir<C: Cipher>(
    pillar: &Pillar<C>,
    dir: &Path,
    action: Action,
    out: &mut dyn Write,
) -> Result<SweepReport> {
    check_for_dir(dir)?;
    let files = find_sls_files(dir, pillar.extension());
    if files.is_empty() {
        return Err(CoreError::EmptyDirectory(dir.to_path_buf()));
    }

    let mut report = SweepReport::default();
    for file in files {
        info!("processing {}", short_file_name(&file));
        match sweep_file(pillar, &file, action, out) {
            Ok(()) => report.processed += 1,
            Err(err) => {
                warn!("{}: {err}", short_file_name(&file));
                report.failed.push((file, err));
            }
        }
    }

    info!("processed {} files", report.processed);
    Ok(report)
}

fn sweep_file<C: Cipher>(
    pillar: &Pillar<C>,
    file: &Path,
    action: Action,
    out: &mut dyn Write,
) -> Result<()> {
    let buffer = pillar.apply(file, action)?;
    match action {
        Action::Identify => {
            writeln!(out, "# {}", short_file_name(file))?;
            out.write_all(&buffer)?;
            writeln!(out)?;
            Ok(())
        }
        Action::Encrypt | Action::Decrypt => write_atomic(file, &buffer),
    }
}
