//! Template-change propagation.
//!
//! For every pending template (one whose backup exists) each page registered
//! against it is diffed against the backup and re-patched into the live
//! template.
//!
//! ## Protocol, per template
//!
//! 1. Plan: read backup, live template and every page; diff and patch in
//!    memory. Nothing is written.
//! 2. Commit: for each staged page, record its digest in the journal, save
//!    the journal, then write the page.
//! 3. If every page succeeded, delete the backup and the journal.
//!
//! A failure on one page never stops its siblings or other templates. The
//! backup of a template with failures is kept so the pass can be rerun; the
//! journal lets that rerun recognise pages it already moved.

use std::fmt;

use pagewright_core::{
    pages_by_template, InstanceStore, PageUri, PropagationLock, TemplateName, TrailingMode,
};
use pagewright_diff::Template;

use crate::error::SyncError;
use crate::journal::Journal;
use crate::pipeline::Scope;

// ---------------------------------------------------------------------------
// Options and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagateOptions {
    pub trailing: TrailingMode,
    /// Plan and report only. No lock is taken and nothing is written.
    pub dry_run: bool,
}

/// What happened to a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was rewritten against the new template.
    Written { uri: PageUri },
    /// Patched text is identical to the current page.
    Unchanged { uri: PageUri },
    /// An earlier interrupted pass already wrote this page.
    AlreadyCurrent { uri: PageUri },
    /// `--dry-run`: the page *would* have been rewritten.
    WouldWrite { uri: PageUri },
}

impl PageOutcome {
    pub fn uri(&self) -> &PageUri {
        match self {
            PageOutcome::Written { uri }
            | PageOutcome::Unchanged { uri }
            | PageOutcome::AlreadyCurrent { uri }
            | PageOutcome::WouldWrite { uri } => uri,
        }
    }
}

/// A propagation error attributed to a template and, when known, a page.
#[derive(Debug)]
pub struct Failure {
    pub template: TemplateName,
    /// `None` when the template as a whole could not be processed.
    pub uri: Option<PageUri>,
    pub error: SyncError,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uri {
            Some(uri) => write!(f, "{} ({}): {}", uri, self.template, self.error),
            None => write!(f, "{}: {}", self.template, self.error),
        }
    }
}

/// Outcome of propagating one template.
#[derive(Debug)]
pub struct TemplateReport {
    pub template: TemplateName,
    pub outcomes: Vec<PageOutcome>,
    pub failures: Vec<Failure>,
    /// The backup was deleted; the template is stable again.
    pub backup_cleared: bool,
}

impl TemplateReport {
    fn new(template: &TemplateName) -> Self {
        Self {
            template: template.clone(),
            outcomes: Vec::new(),
            failures: Vec::new(),
            backup_cleared: false,
        }
    }

    fn fail(&mut self, uri: Option<&PageUri>, error: SyncError) {
        tracing::warn!(
            template = %self.template,
            uri = uri.map(PageUri::as_str).unwrap_or("-"),
            error = %error,
            "propagation failure"
        );
        self.failures.push(Failure {
            template: self.template.clone(),
            uri: uri.cloned(),
            error,
        });
    }
}

/// Outcome of a whole propagation pass, one entry per template processed.
#[derive(Debug, Default)]
pub struct PropagationReport {
    pub templates: Vec<TemplateReport>,
}

impl PropagationReport {
    pub fn failures(&self) -> impl Iterator<Item = &Failure> {
        self.templates.iter().flat_map(|t| t.failures.iter())
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &PageOutcome> {
        self.templates.iter().flat_map(|t| t.outcomes.iter())
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub(crate) struct StagedPage {
    pub uri: PageUri,
    pub current: String,
    pub patched: String,
}

#[derive(Debug)]
pub(crate) enum PlannedPage {
    Stage(StagedPage),
    AlreadyCurrent(PageUri),
}

#[derive(Debug)]
pub(crate) struct TemplatePlan {
    pub journal: Journal,
    pub pages: Vec<PlannedPage>,
    pub failures: Vec<(PageUri, SyncError)>,
}

/// Diff and patch every page of `template` in memory.
///
/// Template-level problems (missing backup or live template, malformed
/// backup, unreadable journal) fail the whole plan; page-level problems are
/// collected and the remaining pages are still planned.
pub(crate) fn plan_template<S: InstanceStore>(
    store: &S,
    template: &TemplateName,
    uris: &[PageUri],
    trailing: TrailingMode,
) -> Result<TemplatePlan, SyncError> {
    let backup = store.read_backup(template)?;
    let live = store.read_template(template)?;
    let journal = Journal::resume(store, template, &backup)?;
    let old = Template::parse(&backup)?;

    let mut plan = TemplatePlan {
        journal,
        pages: Vec::with_capacity(uris.len()),
        failures: Vec::new(),
    };
    for uri in uris {
        let current = match store.read_page(uri) {
            Ok(text) => text,
            Err(err) => {
                plan.failures.push((uri.clone(), err.into()));
                continue;
            }
        };
        if plan.journal.is_committed(uri, &current) {
            tracing::debug!(%uri, "already propagated by an earlier pass");
            plan.pages.push(PlannedPage::AlreadyCurrent(uri.clone()));
            continue;
        }
        match old.extract(&current, trailing) {
            Ok(map) => plan.pages.push(PlannedPage::Stage(StagedPage {
                uri: uri.clone(),
                patched: map.patch(&live),
                current,
            })),
            Err(err) => plan.failures.push((uri.clone(), err.into())),
        }
    }
    Ok(plan)
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

fn commit_template<S: InstanceStore>(
    store: &mut S,
    template: &TemplateName,
    plan: TemplatePlan,
    dry_run: bool,
) -> TemplateReport {
    let mut report = TemplateReport::new(template);
    let TemplatePlan {
        mut journal,
        pages,
        failures,
    } = plan;
    for (uri, error) in failures {
        report.fail(Some(&uri), error);
    }

    let mut journal_dirty = false;
    for page in pages {
        let staged = match page {
            PlannedPage::AlreadyCurrent(uri) => {
                report.outcomes.push(PageOutcome::AlreadyCurrent { uri });
                continue;
            }
            PlannedPage::Stage(staged) => staged,
        };
        let StagedPage {
            uri,
            current,
            patched,
        } = staged;

        if patched == current {
            tracing::debug!(%uri, "unchanged");
            if !dry_run {
                journal.record(&uri, &patched);
                journal_dirty = true;
            }
            report.outcomes.push(PageOutcome::Unchanged { uri });
            continue;
        }

        if dry_run {
            tracing::info!(%uri, "[dry-run] would write");
            report.outcomes.push(PageOutcome::WouldWrite { uri });
            continue;
        }

        // Journal entry goes down before the page so a crash between the two
        // leaves a rerun able to tell the page was already moved.
        journal.record(&uri, &patched);
        if let Err(err) = journal.save(store) {
            report.fail(Some(&uri), err);
            continue;
        }
        journal_dirty = false;
        match store.write_page(&uri, &patched) {
            Ok(()) => {
                tracing::info!(%uri, "wrote");
                report.outcomes.push(PageOutcome::Written { uri });
            }
            Err(err) => report.fail(Some(&uri), err.into()),
        }
    }

    if dry_run {
        return report;
    }

    if report.failures.is_empty() {
        match clear_pending(store, template) {
            Ok(()) => report.backup_cleared = true,
            Err(err) => report.fail(None, err),
        }
    } else if journal_dirty {
        if let Err(err) = journal.save(store) {
            report.fail(None, err);
        }
    }
    report
}

fn clear_pending<S: InstanceStore>(store: &mut S, template: &TemplateName) -> Result<(), SyncError> {
    store.delete_backup(template)?;
    store.delete_journal(template)?;
    tracing::info!(%template, "template is stable");
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Propagate every pending template.
pub fn propagate<S: InstanceStore>(
    store: &mut S,
    options: PropagateOptions,
) -> Result<PropagationReport, SyncError> {
    propagate_scoped(store, &Scope::All, options)
}

/// Propagate the templates selected by `scope`.
///
/// Only errors that prevent the pass from starting (lock held, URI map
/// unreadable) are returned as `Err`; everything else is in the report.
pub fn propagate_scoped<S: InstanceStore>(
    store: &mut S,
    scope: &Scope,
    options: PropagateOptions,
) -> Result<PropagationReport, SyncError> {
    let _lock: Option<PropagationLock> = if options.dry_run {
        None
    } else {
        Some(store.lock()?)
    };

    let templates = scope.select(store)?;
    let map = store.load_uri_template_map()?;
    let grouped = pages_by_template(&map);

    let mut report = PropagationReport::default();
    for template in &templates {
        let uris = grouped.get(template).map(Vec::as_slice).unwrap_or(&[]);
        tracing::info!(%template, pages = uris.len(), dry_run = options.dry_run, "propagating");
        let template_report = match plan_template(store, template, uris, options.trailing) {
            Ok(plan) => commit_template(store, template, plan, options.dry_run),
            Err(err) => {
                let mut failed = TemplateReport::new(template);
                failed.fail(None, err);
                failed
            }
        };
        report.templates.push(template_report);
    }
    Ok(report)
}
