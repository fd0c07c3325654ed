//! File-tree instance store.
//!
//! # Storage layout
//!
//! ```text
//! <root>/
//!   _uri_template_map.json          URI → template name (sorted keys)
//!   _pagewright.yaml                optional configuration
//!   _propagate.lock                 held while a propagation pass runs
//!   _templates/
//!     <name>                        live template
//!     <name>.old                    backup = pending-edit marker
//!     <name>.journal.json           propagation journal
//!   static/
//!   index.html                      page for "/"
//!   <a>/<b>/index.html              page for "/a/b"
//! ```
//!
//! Every write goes to a `.pagewright.tmp` sibling first and is renamed into
//! place, so a crash never leaves a half-written page or template.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{io_err, not_found, BlobKind, StoreError};
use crate::store::{InstanceStore, PropagationLock};
use crate::types::{PageUri, TemplateName, UriTemplateMap};

pub const TEMPLATES_DIR: &str = "_templates";
pub const STATIC_DIR: &str = "static";
pub const URI_MAP_FILE: &str = "_uri_template_map.json";
pub const LOCK_FILE: &str = "_propagate.lock";
pub const PAGE_FILE: &str = "index.html";

const BACKUP_SUFFIX: &str = ".old";
const JOURNAL_SUFFIX: &str = ".journal.json";

/// An instance rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open an existing instance. Fails if `root` is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let meta = std::fs::metadata(&root).map_err(|e| io_err(&root, e))?;
        if !meta.is_dir() {
            return Err(io_err(
                &root,
                std::io::Error::other("instance root is not a directory"),
            ));
        }
        Ok(Self { root })
    }

    /// Wrap `root` without touching the filesystem.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // -----------------------------------------------------------------------
    // Path helpers (pure, no I/O)
    // -----------------------------------------------------------------------

    pub fn templates_dir(&self) -> PathBuf {
        self.root.join(TEMPLATES_DIR)
    }

    pub fn uri_map_path(&self) -> PathBuf {
        self.root.join(URI_MAP_FILE)
    }

    pub fn template_path(&self, name: &TemplateName) -> Result<PathBuf, StoreError> {
        validate_template_name(name)?;
        Ok(self.templates_dir().join(name.as_str()))
    }

    pub fn backup_path(&self, name: &TemplateName) -> Result<PathBuf, StoreError> {
        validate_template_name(name)?;
        Ok(self
            .templates_dir()
            .join(format!("{}{BACKUP_SUFFIX}", name.as_str())))
    }

    pub fn journal_path(&self, name: &TemplateName) -> Result<PathBuf, StoreError> {
        validate_template_name(name)?;
        Ok(self
            .templates_dir()
            .join(format!("{}{JOURNAL_SUFFIX}", name.as_str())))
    }

    /// Directory holding the page for `uri` (the root itself for `/`).
    ///
    /// URIs read back from the map are checked like user input, so a hand
    /// edited map can not point outside the instance root.
    pub fn page_dir(&self, uri: &PageUri) -> Result<PathBuf, StoreError> {
        let checked = PageUri::parse(uri.as_str())?;
        Ok(checked
            .components()
            .fold(self.root.clone(), |dir, component| dir.join(component)))
    }

    /// `<page_dir>/index.html`
    pub fn page_path(&self, uri: &PageUri) -> Result<PathBuf, StoreError> {
        Ok(self.page_dir(uri)?.join(PAGE_FILE))
    }

    // -----------------------------------------------------------------------
    // URI map
    // -----------------------------------------------------------------------

    /// Persist the URI map atomically, keys sorted.
    pub fn save_uri_template_map(&self, map: &UriTemplateMap) -> Result<(), StoreError> {
        let path = self.uri_map_path();
        let json = serde_json::to_string_pretty(map).map_err(|source| StoreError::UriMapParse {
            path: path.clone(),
            source,
        })?;
        atomic_write(&path, &format!("{json}\n"))
    }

    /// Names of all live templates (backups and journals excluded), sorted.
    pub fn list_templates(&self) -> Result<Vec<TemplateName>, StoreError> {
        let mut names: Vec<TemplateName> = self
            .template_dir_entries()?
            .into_iter()
            .filter(|name| !is_auxiliary_file(name))
            .map(TemplateName::from)
            .collect();
        names.sort();
        Ok(names)
    }

    fn template_dir_entries(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.templates_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(err) => return Err(io_err(&dir, err)),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_err(&dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| io_err(entry.path(), e))?
                .is_file();
            if is_file {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

impl InstanceStore for FsStore {
    fn read_template(&self, name: &TemplateName) -> Result<String, StoreError> {
        read_blob(&self.template_path(name)?, BlobKind::Template, name)
    }

    fn write_template(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        atomic_write(&self.template_path(name)?, text)
    }

    fn backup_exists(&self, name: &TemplateName) -> Result<bool, StoreError> {
        Ok(self.backup_path(name)?.is_file())
    }

    fn read_backup(&self, name: &TemplateName) -> Result<String, StoreError> {
        read_blob(&self.backup_path(name)?, BlobKind::Backup, name)
    }

    fn write_backup(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        atomic_write(&self.backup_path(name)?, text)
    }

    fn delete_backup(&mut self, name: &TemplateName) -> Result<(), StoreError> {
        remove_if_exists(&self.backup_path(name)?)
    }

    fn pending_templates(&self) -> Result<Vec<TemplateName>, StoreError> {
        let mut names: Vec<TemplateName> = self
            .template_dir_entries()?
            .into_iter()
            .filter_map(|file| {
                file.strip_suffix(BACKUP_SUFFIX)
                    .filter(|stem| !stem.is_empty())
                    .map(TemplateName::from)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_page(&self, uri: &PageUri) -> Result<String, StoreError> {
        read_blob(&self.page_path(uri)?, BlobKind::Page, uri)
    }

    fn write_page(&mut self, uri: &PageUri, text: &str) -> Result<(), StoreError> {
        atomic_write(&self.page_path(uri)?, text)
    }

    fn load_uri_template_map(&self) -> Result<UriTemplateMap, StoreError> {
        let path = self.uri_map_path();
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        serde_json::from_str(&contents).map_err(|source| StoreError::UriMapParse { path, source })
    }

    fn read_journal(&self, name: &TemplateName) -> Result<Option<String>, StoreError> {
        let path = self.journal_path(name)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_err(&path, err)),
        }
    }

    fn write_journal(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        atomic_write(&self.journal_path(name)?, text)
    }

    fn delete_journal(&mut self, name: &TemplateName) -> Result<(), StoreError> {
        remove_if_exists(&self.journal_path(name)?)
    }

    fn lock(&self) -> Result<PropagationLock, StoreError> {
        let path = self.root.join(LOCK_FILE);
        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                let holder = lock_holder(&path);
                return Err(StoreError::Locked { path, holder });
            }
            Err(err) => return Err(io_err(&path, err)),
        };
        let guard = PropagationLock::file(path.clone());
        writeln!(file, "{}", std::process::id()).map_err(|e| io_err(&path, e))?;
        Ok(guard)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Describe who holds the lock at `path`, from the pid written by [`FsStore::lock`].
fn lock_holder(path: &Path) -> String {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| contents.trim().parse::<u32>().ok())
        .map_or_else(|| "an unknown process".to_owned(), |pid| format!("pid {pid}"))
}

fn validate_template_name(name: &TemplateName) -> Result<(), StoreError> {
    let reason = if name.as_str().is_empty() {
        Some("must not be empty")
    } else if name.as_str().contains(['/', '\\']) || name.as_str() == "." || name.as_str() == ".." {
        Some("must be a single file name")
    } else if is_auxiliary_file(name.as_str()) {
        Some("uses a reserved suffix")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidTemplateName {
            name: name.to_string(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

fn is_auxiliary_file(file_name: &str) -> bool {
    file_name.ends_with(BACKUP_SUFFIX)
        || file_name.ends_with(JOURNAL_SUFFIX)
        || file_name.ends_with(TMP_SUFFIX)
}

fn read_blob(path: &Path, kind: BlobKind, name: impl std::fmt::Display) -> Result<String, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(contents),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(not_found(kind, name)),
        Err(err) => Err(io_err(path, err)),
    }
}

fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(path, err)),
    }
}

const TMP_SUFFIX: &str = ".pagewright.tmp";

/// Write `content` to `<path>.pagewright.tmp`, then rename onto `path`.
///
/// Parent directories are created as needed. On rename failure the temp file
/// is removed and the original is left untouched.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<(), StoreError> {
    let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!(path = %path.display(), "wrote");
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
