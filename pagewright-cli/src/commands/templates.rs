//! `pagewright templates` — every template with its edit status and page count.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use pagewright_core::{pages_by_template, InstanceStore};

use super::open_store;

/// Arguments for `pagewright templates`.
#[derive(Args, Debug)]
pub struct TemplatesArgs {}

#[derive(Tabled)]
struct TemplateRow {
    #[tabled(rename = "template")]
    template: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "pages")]
    pages: usize,
}

impl TemplatesArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let store = open_store(root)?;
        let templates = store.list_templates().context("failed to list templates")?;
        if templates.is_empty() {
            println!("No templates.");
            return Ok(());
        }

        let pending: BTreeSet<_> = store
            .pending_templates()
            .context("failed to list pending templates")?
            .into_iter()
            .collect();
        let map = store.load_uri_template_map().context("failed to load URI map")?;
        let grouped = pages_by_template(&map);

        let rows: Vec<TemplateRow> = templates
            .into_iter()
            .map(|template| TemplateRow {
                status: if pending.contains(&template) {
                    "PENDING".yellow().to_string()
                } else {
                    "stable".green().to_string()
                },
                pages: grouped.get(&template).map_or(0, Vec::len),
                template: template.to_string(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}
