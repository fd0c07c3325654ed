//! `pagewright edit <template>` — snapshot a template before editing it.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pagewright_core::{instance, TemplateName};

use super::open_store;

/// Arguments for `pagewright edit`.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Template file name under `_templates/`.
    pub template: String,
}

impl EditArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let template = TemplateName::from(self.template);
        let mut store = open_store(root)?;
        instance::begin_edit(&mut store, &template)
            .with_context(|| format!("failed to begin editing '{template}'"))?;

        let path = store.template_path(&template)?;
        println!("✓ '{template}' is ready to edit");
        println!("  Edit {} then run `pagewright update`", path.display());
        Ok(())
    }
}
