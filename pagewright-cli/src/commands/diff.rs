//! `pagewright diff [<template>]` — show unified diffs for what update would write.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pagewright_core::TemplateName;
use pagewright_sync::{preview, Scope};

use super::{open_store, TrailingArgs};

/// Arguments for `pagewright diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Only diff this template (default: every pending template).
    pub template: Option<String>,

    #[command(flatten)]
    pub trailing: TrailingArgs,
}

impl DiffArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let store = open_store(root)?;
        let trailing = self.trailing.resolve(root)?;
        let scope = match self.template {
            Some(name) => Scope::Template(TemplateName::from(name)),
            None => Scope::All,
        };

        let result = preview(&store, &scope, trailing).context("diff failed")?;

        if result.diffs.is_empty() && result.failures.is_empty() {
            println!("No differences.");
            return Ok(());
        }

        for diff in &result.diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        if !result.failures.is_empty() {
            eprintln!();
            for failure in &result.failures {
                eprintln!("{} {failure}", "✗".red().bold());
            }
            anyhow::bail!(
                "{} failure(s); `pagewright update` would reject the pages listed above",
                result.failures.len()
            );
        }
        Ok(())
    }
}
