//! `pagewright extract <uri>` — print a page's placeholder values as JSON.
//!
//! Diffs the page against its template's backup when an edit is pending,
//! otherwise against the live template.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pagewright_core::{InstanceStore, PageUri};
use pagewright_diff::Template;

use super::{open_store, TrailingArgs};

/// Arguments for `pagewright extract`.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Page URI.
    pub uri: String,

    #[command(flatten)]
    pub trailing: TrailingArgs,
}

impl ExtractArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let uri = PageUri::parse(&self.uri)?;
        let store = open_store(root)?;
        let trailing = self.trailing.resolve(root)?;

        let map = store.load_uri_template_map().context("failed to load URI map")?;
        let template = map
            .get(&uri)
            .with_context(|| format!("page '{uri}' is not registered"))?;
        let template_text = if store.backup_exists(template)? {
            store.read_backup(template)?
        } else {
            store.read_template(template)?
        };
        let page = store
            .read_page(&uri)
            .with_context(|| format!("failed to read page '{uri}'"))?;

        let parsed = Template::parse(&template_text)
            .with_context(|| format!("template '{template}' is malformed"))?;
        let values = parsed
            .extract(&page, trailing)
            .with_context(|| format!("page '{uri}' does not match template '{template}'"))?;

        println!(
            "{}",
            serde_json::to_string_pretty(&values).context("failed to serialize placeholder map")?
        );
        Ok(())
    }
}
