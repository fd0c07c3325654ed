//! `pagewright init` — scaffold a new instance.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pagewright_core::instance::{self, DEFAULT_TEMPLATE};

/// Create a new instance at `--root`.
#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        instance::init_at(root)
            .with_context(|| format!("failed to init instance at '{}'", root.display()))?;

        println!("✓ Initialised instance at '{}'", root.display());
        println!("  Default template: {DEFAULT_TEMPLATE}");
        Ok(())
    }
}
