// src/rotate_keys.rs
//! Key rotation: decrypt and re-encrypt every secret for the current recipient
//!
//! Each file is rotated entirely in memory and written once, atomically.
//! The decrypted tree never reaches disk, and a file whose rotation fails
//! at any step is left byte-for-byte as it was.
//!
//! Directory rotation runs one worker per file, at most `workers` at a time.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::crypto::Cipher;
use crate::core::file::{
    check_for_dir, check_for_file, find_sls_files, read_sls_file, scan_for_includes, write_atomic,
};
use crate::core::node;
use crate::core::util::short_file_name;
use crate::core::walk::walk;
use crate::core::Result;
use crate::enums::{Action, WalkPolicy};
use crate::error::CoreError;
use crate::pillar::Pillar;

/// Rotate the secrets of an in-memory document; returns the new buffer.
/// Any leaf failure aborts the whole document.
pub fn rotate_bytes<C: Cipher>(pillar: &Pillar<C>, bytes: &[u8]) -> Result<Vec<u8>> {
    scan_for_includes(bytes)?;
    let root = node::parse(bytes)?;

    let scope = pillar.scope();
    let cipher = pillar.cipher();
    let plain = walk(cipher, &root, Action::Decrypt, scope, WalkPolicy::StopOnError)?.node;
    let rotated = walk(cipher, &plain, Action::Encrypt, scope, WalkPolicy::StopOnError)?.node;

    pillar.format_buffer(&rotated, Action::Encrypt)
}

/// Rotate one file in place
pub fn rotate_file<C: Cipher>(pillar: &Pillar<C>, path: &Path) -> Result<()> {
    check_for_file(path)?;
    let bytes = read_sls_file(path)?;
    let buffer = rotate_bytes(pillar, &bytes)?;
    write_atomic(path, &buffer)
}

#[derive(Debug, Default)]
pub struct RotationReport {
    pub rotated: usize,
    pub failed: Vec<(PathBuf, CoreError)>,
    /// Files never started because the run was cancelled
    pub skipped: usize,
}

impl RotationReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped == 0
    }
}

/// Bounded-concurrency rotation over a directory
#[derive(Debug)]
pub struct Rotator<'a, C> {
    pillar: &'a Pillar<C>,
    workers: usize,
    cancel: Arc<AtomicBool>,
}

impl<'a, C: Cipher + Sync> Rotator<'a, C> {
    /// One worker per available CPU
    pub fn new(pillar: &'a Pillar<C>) -> Self {
        Rotator {
            pillar,
            workers: default_workers(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn from_config(pillar: &'a Pillar<C>, config: &Config) -> Self {
        let rotator = Rotator::new(pillar);
        match config.rotation.workers {
            Some(workers) => rotator.with_workers(workers),
            None => rotator,
        }
    }

    /// Clamped to at least one
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Setting the flag stops new files from being started; files already
    /// in flight finish normally.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn rotate_dir(&self, dir: &Path) -> Result<RotationReport> {
        check_for_dir(dir)?;
        let files = find_sls_files(dir, self.pillar.extension());
        if files.is_empty() {
            return Err(CoreError::EmptyDirectory(dir.to_path_buf()));
        }
        Ok(self.rotate_files(files))
    }

    /// Rotate every file, never more than `workers` at once
    pub fn rotate_files(&self, files: Vec<PathBuf>) -> RotationReport {
        let semaphore = Semaphore::new(self.workers);
        let mut report = RotationReport::default();

        thread::scope(|scope| {
            let mut running = Vec::with_capacity(files.len());

            for file in files {
                if self.is_cancelled() {
                    report.skipped += 1;
                    continue;
                }
                let permit = semaphore.acquire();
                if self.is_cancelled() {
                    report.skipped += 1;
                    continue;
                }

                let pillar = self.pillar;
                let path = file.clone();
                let handle = scope.spawn(move || {
                    let _permit = permit;
                    info!("processing {}", short_file_name(&path));
                    rotate_file(pillar, &path)
                });
                running.push((file, handle));
            }

            for (file, handle) in running {
                match handle.join() {
                    Ok(Ok(())) => report.rotated += 1,
                    Ok(Err(err)) => {
                        error!("{}: {err}", short_file_name(&file));
                        report.failed.push((file, err));
                    }
                    Err(_) => {
                        error!("{}: worker panicked", short_file_name(&file));
                        report.failed.push((file.clone(), CoreError::WorkerPanicked(file)));
                    }
                }
            }
        });

        if report.skipped > 0 {
            warn!("rotation cancelled, {} files not started", report.skipped);
        }
        info!("Finished processing {} files.", report.rotated);
        report
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

fn default_workers() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Counting semaphore over a bounded channel: a slot is taken by sending
/// into the channel and given back by receiving from it.
struct Semaphore {
    slots: Sender<()>,
    release: Receiver<()>,
}

/// Held for the lifetime of one file's rotation; dropping it frees the slot,
/// on success, error or unwind alike.
struct Permit<'a> {
    release: &'a Receiver<()>,
}

impl Semaphore {
    fn new(capacity: usize) -> Self {
        let (slots, release) = bounded(capacity.max(1));
        Semaphore { slots, release }
    }

    /// Blocks while every slot is taken
    fn acquire(&self) -> Permit<'_> {
        // the receiver lives as long as `self`, so this cannot disconnect
        let _ = self.slots.send(());
        Permit {
            release: &self.release,
        }
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let _ = self.release.try_recv();
    }
}
