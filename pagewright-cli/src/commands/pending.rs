//! `pagewright pending` — templates with unpropagated edits.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pagewright_core::{pages_by_template, InstanceStore};

use super::open_store;

/// Arguments for `pagewright pending`.
#[derive(Args, Debug)]
pub struct PendingArgs {}

impl PendingArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let store = open_store(root)?;
        let pending = store
            .pending_templates()
            .context("failed to list pending templates")?;
        if pending.is_empty() {
            println!("No pending template edits.");
            return Ok(());
        }

        let map = store.load_uri_template_map().context("failed to load URI map")?;
        let grouped = pages_by_template(&map);
        for template in pending {
            let pages = grouped.get(&template).map_or(0, Vec::len);
            println!("{template} ({pages} pages)");
        }
        Ok(())
    }
}
