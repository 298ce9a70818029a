//! Shared, crash-safe checkpoint store
//!
//! [`CheckpointStore`] is handed to every worker behind an `Arc`. In-memory
//! mutations take a short lock per operation. Saves snapshot the state under
//! that lock, then write outside it, serialized by a separate writer lock so
//! two saves never interleave on disk.

use super::checkpoint::Checkpoint;
use crate::domain::ids::SkuId;
use crate::domain::{Result, SkuLabelError};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Checkpoint state plus its durable location
#[derive(Debug)]
pub struct CheckpointStore {
    path: PathBuf,
    state: Mutex<Checkpoint>,
    writer: tokio::sync::Mutex<()>,
    persist: bool,
}

impl CheckpointStore {
    /// Load the checkpoint at `path`
    ///
    /// Never fails: a missing or unreadable file yields a fresh state.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = read_checkpoint(&path);
        Self {
            path,
            state: Mutex::new(state),
            writer: tokio::sync::Mutex::new(()),
            persist: true,
        }
    }

    /// Keep every change in memory only (dry runs)
    pub fn without_persistence(mut self) -> Self {
        self.persist = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persists(&self) -> bool {
        self.persist
    }

    fn lock(&self) -> MutexGuard<'_, Checkpoint> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a SKU processed; idempotent
    pub fn mark_processed(&self, id: SkuId) {
        self.lock().mark_processed(id);
    }

    pub fn is_processed(&self, id: SkuId) -> bool {
        self.lock().is_processed(id)
    }

    pub fn update_page(&self, page: u32) {
        self.lock().last_page = page;
    }

    pub fn last_page(&self) -> u32 {
        self.lock().last_page
    }

    pub fn processed_count(&self) -> usize {
        self.lock().processed_count()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Checkpoint {
        self.lock().clone()
    }

    /// Persist the current state, logging instead of failing
    ///
    /// Returns whether the write succeeded.
    pub async fn save(&self) -> bool {
        match self.try_save().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error saving checkpoint: {}", e);
                false
            }
        }
    }

    /// Persist the current state atomically (temporary file, then rename)
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub async fn try_save(&self) -> Result<()> {
        if !self.persist {
            return Ok(());
        }

        let _writer = self.writer.lock().await;
        let snapshot = self.snapshot();
        let contents = serde_json::to_vec(&snapshot)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    SkuLabelError::Checkpoint(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp_path = temp_path(&self.path);
        tokio::fs::write(&tmp_path, &contents).await.map_err(|e| {
            SkuLabelError::Checkpoint(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            SkuLabelError::Checkpoint(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            processed = snapshot.processed_count(),
            last_page = snapshot.last_page,
            "Checkpoint written"
        );
        Ok(())
    }

    /// Reset to a fresh state and persist it
    pub async fn clear(&self) {
        *self.lock() = Checkpoint::new();
        self.save().await;
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "checkpoint".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_checkpoint(path: &Path) -> Checkpoint {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Checkpoint::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Unreadable checkpoint, starting fresh: {}", e);
            return Checkpoint::new();
        }
    };

    match serde_json::from_str::<Checkpoint>(&contents) {
        Ok(checkpoint) => checkpoint.normalized(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Corrupt checkpoint, starting fresh: {}", e);
            Checkpoint::new()
        }
    }
}
