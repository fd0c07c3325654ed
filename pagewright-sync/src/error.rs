//! Error types for pagewright-sync.

use thiserror::Error;

use pagewright_core::StoreError;
use pagewright_diff::DiffError;

/// All errors that can arise from propagation.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the instance store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A page does not line up with its template, or the template is malformed.
    #[error(transparent)]
    Diff(#[from] DiffError),

    /// The propagation journal could not be read or written.
    #[error("journal for template '{template}' is unreadable: {source}")]
    Journal {
        template: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// The page diverged from its template (separator edited, truncated, …).
    pub fn is_alignment(&self) -> bool {
        matches!(self, SyncError::Diff(err) if err.is_alignment())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::Store(err) if err.is_not_found())
    }
}
