//! Instance lifecycle: scaffolding, page registration, template edits.
//!
//! # API pattern
//!
//! Operations that only touch blobs are generic over [`InstanceStore`].
//! Operations that create or delete page directories are tied to the file
//! tree and take the instance root, following the `fn_at(root, …)` form.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{io_err, not_found, BlobKind, StoreError};
use crate::fs_store::{FsStore, PAGE_FILE, STATIC_DIR};
use crate::store::InstanceStore;
use crate::types::{PageUri, TemplateName, UriTemplateMap};

/// Template installed by [`init_at`].
pub const DEFAULT_TEMPLATE: &str = "index_template.html";

const DEFAULT_TEMPLATE_TEXT: &str = "<!DOCTYPE html>
<html>
<meta charset=\"utf-8\"/>
<head>
    <title>
        TITLE
    </title>
</head>
<body>
CONTENT
</body>
</html>
";

const INDEX_PAGE_TEXT: &str = "<!DOCTYPE html>
<html>
<meta charset=\"utf-8\"/>
<head>
    <title>
        pagewright Instance Index
    </title>
</head>
<body>
<h1>pagewright Instance Index</h1>
<p>Welcome to your pagewright instance.</p>
</body>
</html>
";

const FORBIDDEN_PAGE_TEXT: &str = "<!DOCTYPE html>
<html>
<meta charset=\"utf-8\"/>
<head>
    <title>
        Forbidden
    </title>
</head>
<body>
<p>You do not have access to this directory.</p>
</body>
</html>
";

// ---------------------------------------------------------------------------
// 1. Init
// ---------------------------------------------------------------------------

/// Create a fresh instance at `root`.
///
/// Fails with `InstanceExists` if `root` is already present.
pub fn init_at(root: &Path) -> Result<FsStore, StoreError> {
    match std::fs::create_dir(root) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::AlreadyExists => {
            return Err(StoreError::InstanceExists {
                path: root.to_path_buf(),
            });
        }
        Err(err) => return Err(io_err(root, err)),
    }

    let mut store = FsStore::at(root);
    let template = TemplateName::from(DEFAULT_TEMPLATE);
    store.write_template(&template, DEFAULT_TEMPLATE_TEXT)?;
    store.write_page(&PageUri::root(), INDEX_PAGE_TEXT)?;

    let static_index = root.join(STATIC_DIR).join(PAGE_FILE);
    crate::fs_store::atomic_write(&static_index, FORBIDDEN_PAGE_TEXT)?;

    let mut map = UriTemplateMap::new();
    map.insert(PageUri::root(), template);
    store.save_uri_template_map(&map)?;

    tracing::info!(root = %root.display(), "initialised instance");
    Ok(store)
}

// ---------------------------------------------------------------------------
// 2. Pages
// ---------------------------------------------------------------------------

/// Create a page at `uri` as a verbatim copy of `template` and register it.
///
/// While `template` has a pending edit the page is copied from the backup,
/// so the next propagation pass moves it to the new text with its siblings.
pub fn create_page_at(
    store: &mut FsStore,
    uri: &PageUri,
    template: &TemplateName,
) -> Result<(), StoreError> {
    let text = if store.backup_exists(template)? {
        store.read_backup(template)?
    } else {
        store.read_template(template)?
    };

    let existing = if uri.is_root() {
        store.page_path(uri)?
    } else {
        store.page_dir(uri)?
    };
    if existing.exists() {
        return Err(StoreError::PageExists {
            uri: uri.to_string(),
            path: existing,
        });
    }

    let mut map = store.load_uri_template_map()?;
    store.write_page(uri, &text)?;
    map.insert(uri.clone(), template.clone());
    store.save_uri_template_map(&map)?;

    tracing::info!(%uri, %template, "created page");
    Ok(())
}

/// Remove the page at `uri` and unregister it.
///
/// `/` removes only the root `index.html`. Any other URI removes its whole
/// directory, so every registered URI nested below it is unregistered too.
/// Returns the URIs that were unregistered.
pub fn remove_page_at(store: &mut FsStore, uri: &PageUri) -> Result<Vec<PageUri>, StoreError> {
    let mut map = store.load_uri_template_map()?;

    if uri.is_root() {
        let path = store.page_path(uri)?;
        std::fs::remove_file(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => not_found(BlobKind::Page, uri),
            _ => io_err(&path, err),
        })?;
    } else {
        let dir = store.page_dir(uri)?;
        if !dir.is_dir() {
            return Err(not_found(BlobKind::Page, uri));
        }
        std::fs::remove_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    }

    let removed: Vec<PageUri> = map
        .keys()
        .filter(|key| *key == uri || (!uri.is_root() && key.is_nested_under(uri)))
        .cloned()
        .collect();
    for key in &removed {
        map.remove(key);
    }
    store.save_uri_template_map(&map)?;

    tracing::info!(%uri, unregistered = removed.len(), "removed page");
    Ok(removed)
}

/// All registered pages with their templates, sorted by URI.
pub fn list_pages<S: InstanceStore>(store: &S) -> Result<Vec<(PageUri, TemplateName)>, StoreError> {
    Ok(store.load_uri_template_map()?.into_iter().collect())
}

// ---------------------------------------------------------------------------
// 3. Template edits
// ---------------------------------------------------------------------------

/// Snapshot `template` as its backup, moving it from stable to pending.
///
/// Fails with `AlreadyPending` if an unpropagated backup exists, since
/// overwriting it would lose the text the pages were derived from.
pub fn begin_edit<S: InstanceStore>(store: &mut S, template: &TemplateName) -> Result<(), StoreError> {
    if store.backup_exists(template)? {
        return Err(StoreError::AlreadyPending {
            name: template.to_string(),
        });
    }
    let text = store.read_template(template)?;
    store.write_backup(template, &text)?;
    tracing::info!(%template, "template edit begun");
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
