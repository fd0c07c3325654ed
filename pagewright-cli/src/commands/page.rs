//! `pagewright page create <uri> <template>` and `pagewright page remove <uri>`

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use pagewright_core::{instance, PageUri, TemplateName};

use super::open_store;

/// Create or remove pages.
#[derive(Subcommand, Debug)]
pub enum PageCommand {
    /// Create a page as a copy of a template and register it.
    Create(CreateArgs),

    /// Remove a page, and every page nested below it.
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Page URI, e.g. "/blog/2013".
    pub uri: String,

    /// Template file name under `_templates/`.
    pub template: String,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Page URI.
    pub uri: String,
}

pub fn run(cmd: PageCommand, root: &Path) -> Result<()> {
    match cmd {
        PageCommand::Create(args) => create(args, root),
        PageCommand::Remove(args) => remove(args, root),
    }
}

fn create(args: CreateArgs, root: &Path) -> Result<()> {
    let uri = PageUri::parse(&args.uri)?;
    let template = TemplateName::from(args.template);
    let mut store = open_store(root)?;
    instance::create_page_at(&mut store, &uri, &template)
        .with_context(|| format!("failed to create page '{uri}'"))?;

    println!("✓ Created '{uri}' from '{template}'");
    Ok(())
}

fn remove(args: RemoveArgs, root: &Path) -> Result<()> {
    let uri = PageUri::parse(&args.uri)?;
    let mut store = open_store(root)?;
    let removed = instance::remove_page_at(&mut store, &uri)
        .with_context(|| format!("failed to remove page '{uri}'"))?;

    println!("✓ Removed '{uri}'");
    for nested in removed.iter().filter(|u| **u != uri) {
        println!("  also unregistered {nested}");
    }
    Ok(())
}
