use crate::config::DuplicatePolicy;
use crate::tools::{calculate_file_hash, ensure_directory_exists};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Terminal state of one move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Source now lives at this path.
    Moved(PathBuf),
    /// Identical content already present at the destination; source kept.
    DuplicateKept,
    /// Identical content already present; source removed per policy.
    DuplicateDeleted,
}

/// Moves one file to its resolved destination without ever overwriting an
/// existing file. An occupied destination is either a true duplicate
/// (decided by full-content BLAKE3 comparison) or a name collision, resolved
/// by suffixing `_<n>` before the extension and retrying.
pub struct MoveEngine {
    policy: DuplicatePolicy,
    max_collision_attempts: usize,
    moved_count: AtomicUsize,
    // Serializes the exists-check-then-rename window per destination
    // directory, so widening the worker pool cannot race two files onto the
    // same disambiguated name.
    dir_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl MoveEngine {
    #[must_use]
    pub fn new(policy: DuplicatePolicy, max_collision_attempts: usize) -> Self {
        Self {
            policy,
            max_collision_attempts,
            moved_count: AtomicUsize::new(0),
            dir_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Files moved so far across the whole run.
    #[must_use]
    pub fn moved_count(&self) -> usize {
        self.moved_count.load(Ordering::SeqCst)
    }

    pub fn move_file(&self, source: &Path, destination: &Path) -> Result<MoveOutcome> {
        let dest_dir = destination
            .parent()
            .ok_or_else(|| anyhow!("Destination {} has no parent", destination.display()))?;

        let dir_lock = self.directory_lock(dest_dir)?;
        let _guard = dir_lock
            .lock()
            .map_err(|e| anyhow!("Directory lock poisoned: {e}"))?;

        // Source hash is only needed once and only when something already
        // sits at the destination.
        let mut source_hash: Option<String> = None;
        let mut target = destination.to_path_buf();

        for attempt in 0..=self.max_collision_attempts {
            if !target.exists() {
                ensure_directory_exists(dest_dir).with_context(|| {
                    format!("Failed to create destination directory {}", dest_dir.display())
                })?;
                self.rename_or_copy(source, &target)?;

                let total = self.moved_count.fetch_add(1, Ordering::SeqCst) + 1;
                info!("{total} ---> moved file to {}", target.display());
                return Ok(MoveOutcome::Moved(target));
            }

            // Already at its destination; there is nothing to move and,
            // under delete-source, nothing that may be deleted.
            if target == source {
                return Ok(MoveOutcome::DuplicateKept);
            }

            if source_hash.is_none() {
                source_hash = Some(calculate_file_hash(source)?);
            }
            let target_hash = calculate_file_hash(&target)?;

            if source_hash.as_deref() == Some(target_hash.as_str()) {
                return self.handle_duplicate(source, &target);
            }

            // Same name, different content. Next candidate keeps the
            // directory and original stem.
            target = disambiguated(destination, attempt + 1);
            debug!(
                "Name collision for {}, retrying as {}",
                destination.display(),
                target.display()
            );
        }

        bail!(
            "Collision suffixes exhausted for {} after {} attempts",
            destination.display(),
            self.max_collision_attempts
        )
    }

    fn handle_duplicate(&self, source: &Path, target: &Path) -> Result<MoveOutcome> {
        match self.policy {
            DuplicatePolicy::Report => {
                warn!(
                    "Duplicate file: {} already present at {}, source kept",
                    source.display(),
                    target.display()
                );
                Ok(MoveOutcome::DuplicateKept)
            }
            DuplicatePolicy::DeleteSource => {
                fs::remove_file(source).with_context(|| {
                    format!("Failed to delete duplicate source {}", source.display())
                })?;
                warn!(
                    "Duplicate file: {} deleted, content already at {}",
                    source.display(),
                    target.display()
                );
                Ok(MoveOutcome::DuplicateDeleted)
            }
        }
    }

    /// Rename first; if that fails (typically a cross-filesystem move), fall
    /// back to copy-then-delete.
    fn rename_or_copy(&self, source: &Path, target: &Path) -> Result<()> {
        if let Err(rename_err) = fs::rename(source, target) {
            fs::copy(source, target).with_context(|| {
                format!(
                    "Failed to move {} -> {} (rename error: {rename_err})",
                    source.display(),
                    target.display()
                )
            })?;
            fs::remove_file(source)
                .with_context(|| format!("Failed to remove source {}", source.display()))?;
        }
        Ok(())
    }

    fn directory_lock(&self, dir: &Path) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .dir_locks
            .lock()
            .map_err(|e| anyhow!("Lock table poisoned: {e}"))?;
        Ok(Arc::clone(
            locks.entry(dir.to_path_buf()).or_default(),
        ))
    }
}

/// `photo.jpg` -> `photo_1.jpg`, `photo_2.jpg`, ...
fn disambiguated(destination: &Path, attempt: usize) -> PathBuf {
    let stem = destination
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("file");
    let ext = destination.extension().and_then(|s| s.to_str()).unwrap_or("");

    let new_name = if ext.is_empty() {
        format!("{stem}_{attempt}")
    } else {
        format!("{stem}_{attempt}.{ext}")
    };

    destination.with_file_name(new_name)
}
