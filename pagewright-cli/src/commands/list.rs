//! `pagewright list` — registered pages and their templates.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pagewright_core::{instance, InstanceStore};

use super::open_store;

/// Arguments for `pagewright list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PageJson {
    uri: String,
    template: String,
    pending: bool,
}

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "uri")]
    uri: String,
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "status")]
    status: String,
}

impl ListArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let store = open_store(root)?;
        let pages = instance::list_pages(&store).context("failed to load URI map")?;
        let pending: BTreeSet<_> = store
            .pending_templates()
            .context("failed to list pending templates")?
            .into_iter()
            .collect();

        if self.json {
            let payload: Vec<PageJson> = pages
                .iter()
                .map(|(uri, template)| PageJson {
                    uri: uri.to_string(),
                    template: template.to_string(),
                    pending: pending.contains(template),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize page list")?
            );
            return Ok(());
        }

        if pages.is_empty() {
            println!("No pages registered.");
            return Ok(());
        }

        let rows: Vec<PageRow> = pages
            .into_iter()
            .map(|(uri, template)| PageRow {
                status: if pending.contains(&template) {
                    "PENDING".yellow().to_string()
                } else {
                    "stable".green().to_string()
                },
                uri: uri.to_string(),
                template: template.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
