//! Domain types for a pagewright instance.
//!
//! Page addresses and template names are newtypes over `String`; both
//! serialize transparently so the URI map stays a flat JSON object.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Top-level folders of an instance that can never be used as page URIs.
pub const SPECIAL_FOLDERS: &[&str] = &[crate::fs_store::TEMPLATES_DIR, crate::fs_store::STATIC_DIR];

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a template file under `_templates/`, e.g. `index_template.html`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateName(pub String);

impl TemplateName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Absolute address of a page, e.g. `/` or `/blog/2013`.
///
/// Values built with [`PageUri::parse`] are normalised: a single leading
/// slash, no trailing slash, no empty or dot components. Values read back from
/// a persisted URI map are taken as-is.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageUri(pub String);

impl PageUri {
    /// The root page, `/`.
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Validate and normalise a user-supplied URI.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        if !raw.starts_with('/') {
            return Err(invalid_uri(raw, "must start with a slash"));
        }
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        for component in trimmed.split('/') {
            if component.is_empty() {
                return Err(invalid_uri(raw, "contains an empty path component"));
            }
            if component == "." || component == ".." {
                return Err(invalid_uri(raw, "contains a relative path component"));
            }
        }
        let uri = Self(format!("/{trimmed}"));
        if let Some(first) = uri.components().next() {
            if SPECIAL_FOLDERS.contains(&first) {
                return Err(invalid_uri(raw, &format!("\"/{first}/\" is a reserved folder")));
            }
        }
        Ok(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.components().next().is_none()
    }

    /// Path components below the root, in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }

    /// True if `self` lies strictly below `ancestor` in the page tree.
    pub fn is_nested_under(&self, ancestor: &PageUri) -> bool {
        if ancestor.is_root() {
            return !self.is_root();
        }
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
    }
}

impl fmt::Display for PageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PageUri {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

fn invalid_uri(raw: &str, reason: &str) -> StoreError {
    StoreError::InvalidUri {
        uri: raw.to_owned(),
        reason: reason.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Maps and modes
// ---------------------------------------------------------------------------

/// Persisted association of each page with the template it was derived from.
///
/// A `BTreeMap` keeps keys sorted, which makes the JSON output byte-stable.
pub type UriTemplateMap = BTreeMap<PageUri, TemplateName>;

/// Inverse of a [`UriTemplateMap`]: template → URIs using it, sorted.
pub fn pages_by_template(map: &UriTemplateMap) -> BTreeMap<TemplateName, Vec<PageUri>> {
    let mut grouped: BTreeMap<TemplateName, Vec<PageUri>> = BTreeMap::new();
    for (uri, template) in map {
        grouped.entry(template.clone()).or_default().push(uri.clone());
    }
    for uris in grouped.values_mut() {
        uris.sort();
    }
    grouped
}

/// How page lines after the final template separator are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingMode {
    /// Extra trailing lines are ignored.
    #[default]
    Lenient,
    /// Extra trailing lines are an alignment failure.
    Strict,
}

impl fmt::Display for TrailingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailingMode::Lenient => write!(f, "lenient"),
            TrailingMode::Strict => write!(f, "strict"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
