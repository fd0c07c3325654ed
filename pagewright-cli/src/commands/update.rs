//! `pagewright update` — propagate pending template edits to their pages.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use pagewright_core::TemplateName;
use pagewright_sync::{pipeline, PageOutcome, PropagateOptions, Scope, TemplateReport};

use super::{open_store, TrailingArgs};

/// Arguments for `pagewright update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Only propagate this template (default: every pending template).
    pub template: Option<String>,

    /// Show what would be written without writing any page.
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub trailing: TrailingArgs,
}

impl UpdateArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let mut store = open_store(root)?;
        let options = PropagateOptions {
            trailing: self.trailing.resolve(root)?,
            dry_run: self.dry_run,
        };
        let scope = match self.template {
            Some(name) => Scope::Template(TemplateName::from(name)),
            None => Scope::All,
        };

        tracing::debug!(root = %root.display(), ?scope, ?options, "starting update");

        let report = pipeline::run(&mut store, scope, options).context("update failed")?;
        if report.templates.is_empty() {
            println!("No pending template edits.");
            return Ok(());
        }
        for template in &report.templates {
            print_report(template, self.dry_run);
        }

        let failed = report.failures().count();
        if failed > 0 {
            eprintln!();
            for failure in report.failures() {
                eprintln!("{} {failure}", "✗".red().bold());
            }
            anyhow::bail!(
                "{failed} failure(s); fix the pages listed above and rerun `pagewright update`"
            );
        }
        Ok(())
    }
}

fn print_report(report: &TemplateReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report
        .outcomes
        .iter()
        .filter(|o| matches!(o, PageOutcome::Written { .. } | PageOutcome::WouldWrite { .. }))
        .count();
    let unchanged = report.outcomes.len() - written;

    let mark = if report.failures.is_empty() {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!(
        "{prefix}{mark} '{}' ({} written, {} unchanged, {} failed)",
        report.template,
        written,
        unchanged,
        report.failures.len()
    );

    for outcome in &report.outcomes {
        match outcome {
            PageOutcome::Written { uri } => println!("  ✎  {uri}"),
            PageOutcome::WouldWrite { uri } => println!("  ~  {uri}"),
            PageOutcome::Unchanged { uri } => println!("  ·  {uri}"),
            PageOutcome::AlreadyCurrent { uri } => println!("  ·  {uri} (already current)"),
        }
    }
    if report.backup_cleared {
        println!("  template '{}' is stable", report.template);
    } else if !dry_run && !report.failures.is_empty() {
        println!("  template '{}' is still pending", report.template);
    }
}
