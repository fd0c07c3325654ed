//! Error types for pagewright-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of text blob a store lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobKind {
    Template,
    Backup,
    Page,
}

impl fmt::Display for BlobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobKind::Template => write!(f, "template"),
            BlobKind::Backup => write!(f, "template backup"),
            BlobKind::Page => write!(f, "page"),
        }
    }
}

/// All errors that can arise from instance store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure, with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A referenced template, backup, or page does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: BlobKind, name: String },

    /// The URI map could not be parsed or serialized.
    #[error("failed to parse URI map at {path}: {source}")]
    UriMapParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The instance configuration file is malformed.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid template name '{name}': {reason}")]
    InvalidTemplateName { name: String, reason: String },

    /// `create_page` target already exists on disk.
    #[error("URI '{uri}' can not be created because {path} already exists")]
    PageExists { uri: String, path: PathBuf },

    /// The instance root given to `init` already exists.
    #[error("instance root {path} already exists")]
    InstanceExists { path: PathBuf },

    /// `begin_edit` on a template that still has an unpropagated backup.
    #[error("template '{name}' already has a pending edit; run `update` first")]
    AlreadyPending { name: String },

    /// Another propagation pass holds the instance lock. A pass that crashed
    /// leaves the file behind; it has to be removed by hand.
    #[error(
        "instance is locked by {holder} ({path}); if no propagation pass is running, delete the lock file and rerun"
    )]
    Locked { path: PathBuf, holder: String },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}

pub(crate) fn not_found(kind: BlobKind, name: impl fmt::Display) -> StoreError {
    StoreError::NotFound {
        kind,
        name: name.to_string(),
    }
}
