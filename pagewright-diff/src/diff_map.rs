//! [`DiffMap`]: captured placeholder replacements, and the patch step.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder name → the trimmed text a page substituted for it.
///
/// Only meaningful for the (template, page) pair it was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiffMap {
    entries: BTreeMap<String, String>,
}

impl DiffMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous replacement for `name`, if any.
    pub fn insert(&mut self, name: impl Into<String>, replacement: impl Into<String>) -> Option<String> {
        self.entries.insert(name.into(), replacement.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by placeholder name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The order [`DiffMap::patch`] substitutes in: longest name first, ties
    /// broken lexicographically.
    ///
    /// Longest-first keeps a name from clobbering a longer name containing it
    /// (`TITLE` inside `SUBTITLE`). It does not protect replacement text that
    /// itself contains a later name; that text is substituted again.
    pub fn substitution_order(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }

    /// Replace every literal occurrence of each name in `new_template` with
    /// its captured replacement, in [`DiffMap::substitution_order`].
    ///
    /// This is a plain substring replacement over the whole text, not only on
    /// placeholder lines. Names absent from `new_template` are dropped.
    pub fn patch(&self, new_template: &str) -> String {
        let mut text = new_template.to_owned();
        for name in self.substitution_order() {
            if !text.contains(name) {
                tracing::trace!(placeholder = name, "not present in new template");
                continue;
            }
            let replacement = &self.entries[name];
            tracing::trace!(placeholder = name, "substituting");
            text = text.replace(name, replacement);
        }
        text
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DiffMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = DiffMap::new();
        for (name, replacement) in iter {
            map.insert(name, replacement);
        }
        map
    }
}
