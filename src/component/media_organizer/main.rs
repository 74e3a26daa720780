use super::metadata_reader::ExifMetadataReader;
use super::move_engine::{MoveEngine, MoveOutcome};
use super::path_resolver::{PathResolver, ResolveOutcome};
use crate::config::Config;
use crate::tools::validate_directory_exists;
use anyhow::{Context, Result};
use log::{error, info, warn};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use walkdir::WalkDir;

/// Summary of one organizing run.
#[derive(Debug, Default)]
pub struct OrganizeResult {
    /// Files moved to a destination (including suffixed names).
    pub files_moved: usize,
    /// True duplicates detected (source kept under the default policy).
    pub duplicates_found: usize,
    /// Duplicate sources removed under the delete-source policy.
    pub duplicates_deleted: usize,
    /// Files with an unrecognized extension.
    pub skipped_unsupported: usize,
    /// Per-file failures (resolution or IO); the run continues past them.
    pub errors: usize,
}

impl OrganizeResult {
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.files_moved
            + self.duplicates_found
            + self.duplicates_deleted
            + self.skipped_unsupported
            + self.errors
    }
}

#[derive(Default)]
struct Counters {
    moved: AtomicUsize,
    duplicates: AtomicUsize,
    deleted: AtomicUsize,
    skipped: AtomicUsize,
    errors: AtomicUsize,
}

/// Drives the resolver and move engine over the source tree.
///
/// Traversal is depth-first with every regular file in a directory processed
/// (and joined) before its subdirectories are entered, in name order. The
/// per-directory batch runs on a worker pool whose size comes from
/// configuration and defaults to 1.
pub struct MediaOrganizer {
    source_root: PathBuf,
    resolver: PathResolver<ExifMetadataReader>,
    engine: MoveEngine,
    pool: rayon::ThreadPool,
    shutdown_signal: Arc<AtomicBool>,
}

impl MediaOrganizer {
    pub fn new(config: &Config, shutdown_signal: Arc<AtomicBool>) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .build()
            .context("Failed to build worker pool")?;

        Ok(Self {
            source_root: config.source_location.clone(),
            resolver: PathResolver::new(
                config.photo_dest_location.clone(),
                config.video_dest_location.clone(),
                ExifMetadataReader,
            ),
            engine: MoveEngine::new(config.on_duplicate, config.max_collision_attempts),
            pool,
            shutdown_signal,
        })
    }

    pub fn run(&self) -> Result<OrganizeResult> {
        validate_directory_exists(&self.source_root)?;
        info!("Organizing media under {}", self.source_root.display());

        let counters = Counters::default();
        self.process_directory(&self.source_root, &counters);

        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("Traversal stopped early by shutdown signal");
        }

        let result = OrganizeResult {
            files_moved: counters.moved.load(Ordering::SeqCst),
            duplicates_found: counters.duplicates.load(Ordering::SeqCst),
            duplicates_deleted: counters.deleted.load(Ordering::SeqCst),
            skipped_unsupported: counters.skipped.load(Ordering::SeqCst),
            errors: counters.errors.load(Ordering::SeqCst),
        };

        info!(
            "Run complete - moved: {}, duplicates: {}, skipped: {}, errors: {}",
            result.files_moved,
            result.duplicates_found + result.duplicates_deleted,
            result.skipped_unsupported,
            result.errors
        );

        Ok(result)
    }

    fn process_directory(&self, dir: &Path, counters: &Counters) {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            return;
        }

        let mut files: Vec<PathBuf> = Vec::new();
        let mut subdirs: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            } else if entry.file_type().is_dir() {
                subdirs.push(entry.into_path());
            }
        }

        // All files directly in this directory finish before any descent.
        self.pool.install(|| {
            files.par_iter().for_each(|file| {
                if self.shutdown_signal.load(Ordering::SeqCst) {
                    return;
                }
                self.process_file(file, counters);
            });
        });

        for subdir in subdirs {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                return;
            }
            self.process_directory(&subdir, counters);
        }
    }

    fn process_file(&self, file: &Path, counters: &Counters) {
        let destination = match self.resolver.resolve(file) {
            ResolveOutcome::Destination(destination) => destination,
            ResolveOutcome::Unsupported => {
                counters.skipped.fetch_add(1, Ordering::SeqCst);
                return;
            }
            ResolveOutcome::Failed => {
                counters.errors.fetch_add(1, Ordering::SeqCst);
                return;
            }
        };

        match self.engine.move_file(file, &destination) {
            Ok(MoveOutcome::Moved(_)) => {
                counters.moved.fetch_add(1, Ordering::SeqCst);
            }
            Ok(MoveOutcome::DuplicateKept) => {
                counters.duplicates.fetch_add(1, Ordering::SeqCst);
            }
            Ok(MoveOutcome::DuplicateDeleted) => {
                counters.deleted.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                error!("Failed to process {}: {e:#}", file.display());
                counters.errors.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}
