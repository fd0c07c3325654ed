//! The storage collaborator consumed by the propagation engine.
//!
//! The engine only ever needs named text blobs (templates, backups, pages,
//! journals) and the URI → template map. [`crate::FsStore`] maps these onto an
//! instance directory; [`crate::MemoryStore`] keeps them in memory.

use std::path::PathBuf;

use crate::error::StoreError;
use crate::types::{PageUri, TemplateName, UriTemplateMap};

/// Read/write access to the text blobs of one instance.
pub trait InstanceStore {
    /// Current template text. Fails with `NotFound` if absent.
    fn read_template(&self, name: &TemplateName) -> Result<String, StoreError>;

    fn write_template(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError>;

    /// True iff a pending-edit backup exists for `name`.
    fn backup_exists(&self, name: &TemplateName) -> Result<bool, StoreError>;

    /// Pre-edit snapshot. Fails with `NotFound` if the template is stable.
    fn read_backup(&self, name: &TemplateName) -> Result<String, StoreError>;

    fn write_backup(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError>;

    /// Remove the pending-edit marker. Idempotent.
    fn delete_backup(&mut self, name: &TemplateName) -> Result<(), StoreError>;

    /// Every template with a backup present, sorted by name.
    fn pending_templates(&self) -> Result<Vec<TemplateName>, StoreError>;

    /// Current page text. Fails with `NotFound` if absent.
    fn read_page(&self, uri: &PageUri) -> Result<String, StoreError>;

    fn write_page(&mut self, uri: &PageUri, text: &str) -> Result<(), StoreError>;

    fn load_uri_template_map(&self) -> Result<UriTemplateMap, StoreError>;

    /// Serialized propagation journal for `name`, if one was left behind.
    fn read_journal(&self, name: &TemplateName) -> Result<Option<String>, StoreError>;

    fn write_journal(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError>;

    /// Idempotent.
    fn delete_journal(&mut self, name: &TemplateName) -> Result<(), StoreError>;

    /// Take the per-instance propagation lock. Fails with `Locked` if held.
    fn lock(&self) -> Result<PropagationLock, StoreError>;
}

/// Guard for the per-instance propagation lock; released on drop.
#[derive(Debug)]
pub struct PropagationLock {
    path: Option<PathBuf>,
}

impl PropagationLock {
    /// A guard backed by a lock file that is removed on drop.
    pub fn file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// A guard for stores whose exclusivity is already enforced by `&mut`.
    pub fn unguarded() -> Self {
        Self { path: None }
    }
}

impl Drop for PropagationLock {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "failed to release propagation lock");
            }
        }
    }
}
