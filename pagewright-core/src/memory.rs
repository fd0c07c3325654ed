//! In-memory instance store, for tests and embedding.

use std::collections::BTreeMap;

use crate::error::{not_found, BlobKind, StoreError};
use crate::store::{InstanceStore, PropagationLock};
use crate::types::{PageUri, TemplateName, UriTemplateMap};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: BTreeMap<TemplateName, String>,
    backups: BTreeMap<TemplateName, String>,
    journals: BTreeMap<TemplateName, String>,
    pages: BTreeMap<PageUri, String>,
    uri_map: UriTemplateMap,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, name: &str, text: &str) -> Self {
        self.templates.insert(TemplateName::from(name), text.to_owned());
        self
    }

    pub fn with_backup(mut self, name: &str, text: &str) -> Self {
        self.backups.insert(TemplateName::from(name), text.to_owned());
        self
    }

    /// Register `uri` against `template` and store its page text.
    pub fn with_page(mut self, uri: &str, template: &str, text: &str) -> Self {
        let uri = PageUri::from(uri);
        self.uri_map.insert(uri.clone(), TemplateName::from(template));
        self.pages.insert(uri, text.to_owned());
        self
    }

    /// Register `uri` in the map without any page text behind it.
    pub fn with_dangling_uri(mut self, uri: &str, template: &str) -> Self {
        self.uri_map
            .insert(PageUri::from(uri), TemplateName::from(template));
        self
    }

    pub fn page(&self, uri: &str) -> Option<&str> {
        self.pages.get(&PageUri::from(uri)).map(String::as_str)
    }

    pub fn journal(&self, name: &str) -> Option<&str> {
        self.journals.get(&TemplateName::from(name)).map(String::as_str)
    }
}

impl InstanceStore for MemoryStore {
    fn read_template(&self, name: &TemplateName) -> Result<String, StoreError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(BlobKind::Template, name))
    }

    fn write_template(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        self.templates.insert(name.clone(), text.to_owned());
        Ok(())
    }

    fn backup_exists(&self, name: &TemplateName) -> Result<bool, StoreError> {
        Ok(self.backups.contains_key(name))
    }

    fn read_backup(&self, name: &TemplateName) -> Result<String, StoreError> {
        self.backups
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(BlobKind::Backup, name))
    }

    fn write_backup(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        self.backups.insert(name.clone(), text.to_owned());
        Ok(())
    }

    fn delete_backup(&mut self, name: &TemplateName) -> Result<(), StoreError> {
        self.backups.remove(name);
        Ok(())
    }

    fn pending_templates(&self) -> Result<Vec<TemplateName>, StoreError> {
        Ok(self.backups.keys().cloned().collect())
    }

    fn read_page(&self, uri: &PageUri) -> Result<String, StoreError> {
        self.pages
            .get(uri)
            .cloned()
            .ok_or_else(|| not_found(BlobKind::Page, uri))
    }

    fn write_page(&mut self, uri: &PageUri, text: &str) -> Result<(), StoreError> {
        self.pages.insert(uri.clone(), text.to_owned());
        Ok(())
    }

    fn load_uri_template_map(&self) -> Result<UriTemplateMap, StoreError> {
        Ok(self.uri_map.clone())
    }

    fn read_journal(&self, name: &TemplateName) -> Result<Option<String>, StoreError> {
        Ok(self.journals.get(name).cloned())
    }

    fn write_journal(&mut self, name: &TemplateName, text: &str) -> Result<(), StoreError> {
        self.journals.insert(name.clone(), text.to_owned());
        Ok(())
    }

    fn delete_journal(&mut self, name: &TemplateName) -> Result<(), StoreError> {
        self.journals.remove(name);
        Ok(())
    }

    fn lock(&self) -> Result<PropagationLock, StoreError> {
        Ok(PropagationLock::unguarded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_pages_in_uri_map() {
        let store = MemoryStore::new()
            .with_template("t.html", "T")
            .with_page("/a", "t.html", "A");
        let map = store.load_uri_template_map().unwrap();
        assert_eq!(map.get(&PageUri::from("/a")), Some(&TemplateName::from("t.html")));
        assert_eq!(store.page("/a"), Some("A"));
    }

    #[test]
    fn missing_blobs_are_not_found() {
        let store = MemoryStore::new();
        let name = TemplateName::from("t.html");
        assert!(store.read_template(&name).unwrap_err().is_not_found());
        assert!(store.read_backup(&name).unwrap_err().is_not_found());
        assert!(store.read_page(&PageUri::root()).unwrap_err().is_not_found());
    }
}
