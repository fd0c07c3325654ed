//! Propagation journal: a SHA-256 record of pages already moved to the new
//! template, so an interrupted or partially failed pass can resume.
//!
//! Persisted through [`InstanceStore::write_journal`] as JSON. A journal is
//! bound to one backup by its digest; a journal left over from an earlier
//! edit cycle is discarded on load.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use pagewright_core::{InstanceStore, PageUri, TemplateName};

use crate::error::SyncError;

/// On-disk journal payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Journal {
    pub template: TemplateName,
    /// Digest of the backup this journal's pages were diffed against.
    pub backup_sha256: String,
    pub started_at: DateTime<Utc>,
    /// URI → digest of the content staged for it.
    #[serde(default)]
    pub pages: BTreeMap<PageUri, String>,
}

/// Lowercase hex SHA-256 of `text`.
pub fn sha256_hex(text: &str) -> String {
    let mut h = Sha256::new();
    h.update(text.as_bytes());
    hex::encode(h.finalize())
}

impl Journal {
    pub fn new(template: &TemplateName, backup_text: &str) -> Self {
        Self {
            template: template.clone(),
            backup_sha256: sha256_hex(backup_text),
            started_at: Utc::now(),
            pages: BTreeMap::new(),
        }
    }

    /// Load the journal for `template` if it belongs to `backup_text`,
    /// otherwise start a fresh one.
    pub fn resume<S: InstanceStore>(
        store: &S,
        template: &TemplateName,
        backup_text: &str,
    ) -> Result<Self, SyncError> {
        let Some(contents) = store.read_journal(template)? else {
            return Ok(Self::new(template, backup_text));
        };
        let journal: Journal =
            serde_json::from_str(&contents).map_err(|source| SyncError::Journal {
                template: template.to_string(),
                source,
            })?;
        if journal.backup_sha256 != sha256_hex(backup_text) {
            tracing::warn!(%template, "discarding journal from an earlier edit of this template");
            return Ok(Self::new(template, backup_text));
        }
        tracing::debug!(%template, pages = journal.pages.len(), "resuming journal");
        Ok(journal)
    }

    pub fn save<S: InstanceStore>(&self, store: &mut S) -> Result<(), SyncError> {
        let json = serde_json::to_string_pretty(self).map_err(|source| SyncError::Journal {
            template: self.template.to_string(),
            source,
        })?;
        store.write_journal(&self.template, &json)?;
        Ok(())
    }

    /// True if `page_text` is exactly what was staged for `uri`.
    pub fn is_committed(&self, uri: &PageUri, page_text: &str) -> bool {
        self.pages
            .get(uri)
            .is_some_and(|digest| *digest == sha256_hex(page_text))
    }

    pub fn record(&mut self, uri: &PageUri, staged_text: &str) {
        self.pages.insert(uri.clone(), sha256_hex(staged_text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewright_core::MemoryStore;

    fn name() -> TemplateName {
        TemplateName::from("t.html")
    }

    #[test]
    fn digest_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fresh_journal_when_none_stored() {
        let store = MemoryStore::new();
        let journal = Journal::resume(&store, &name(), "old").expect("resume");
        assert!(journal.pages.is_empty());
        assert_eq!(journal.backup_sha256, sha256_hex("old"));
    }

    #[test]
    fn roundtrip_save_resume() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&name(), "old");
        journal.record(&PageUri::from("/a"), "new a");
        journal.save(&mut store).expect("save");

        let resumed = Journal::resume(&store, &name(), "old").expect("resume");
        assert_eq!(resumed, journal);
        assert!(resumed.is_committed(&PageUri::from("/a"), "new a"));
        assert!(!resumed.is_committed(&PageUri::from("/a"), "edited a"));
        assert!(!resumed.is_committed(&PageUri::from("/b"), "new a"));
    }

    #[test]
    fn journal_for_other_backup_is_discarded() {
        let mut store = MemoryStore::new();
        let mut journal = Journal::new(&name(), "first edit");
        journal.record(&PageUri::from("/a"), "x");
        journal.save(&mut store).unwrap();

        let resumed = Journal::resume(&store, &name(), "second edit").expect("resume");
        assert!(resumed.pages.is_empty());
    }

    #[test]
    fn corrupt_journal_is_an_error() {
        let mut store = MemoryStore::new();
        store.write_journal(&name(), "{ not json").unwrap();
        let err = Journal::resume(&store, &name(), "old").unwrap_err();
        assert!(matches!(err, SyncError::Journal { .. }), "got: {err}");
        assert!(err.to_string().contains("t.html"));
    }
}
