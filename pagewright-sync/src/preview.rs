//! Dry-run unified diff support for `pagewright diff`.

use similar::TextDiff;

use pagewright_core::{pages_by_template, InstanceStore, PageUri, TrailingMode};

use crate::error::SyncError;
use crate::pipeline::Scope;
use crate::propagate::{plan_template, Failure, PlannedPage};

/// A single page diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDiff {
    pub uri: PageUri,
    pub unified_diff: String,
}

#[derive(Debug, Default)]
pub struct PreviewReport {
    pub diffs: Vec<PageDiff>,
    pub failures: Vec<Failure>,
}

/// Compute what propagation would write and compare it to the current pages.
///
/// Nothing is written and no lock is taken.
pub fn preview<S: InstanceStore>(
    store: &S,
    scope: &Scope,
    trailing: TrailingMode,
) -> Result<PreviewReport, SyncError> {
    let templates = scope.select(store)?;
    let map = store.load_uri_template_map()?;
    let grouped = pages_by_template(&map);

    let mut report = PreviewReport::default();
    for template in &templates {
        let uris = grouped.get(template).map(Vec::as_slice).unwrap_or(&[]);
        let plan = match plan_template(store, template, uris, trailing) {
            Ok(plan) => plan,
            Err(error) => {
                report.failures.push(Failure {
                    template: template.clone(),
                    uri: None,
                    error,
                });
                continue;
            }
        };
        for (uri, error) in plan.failures {
            report.failures.push(Failure {
                template: template.clone(),
                uri: Some(uri),
                error,
            });
        }
        for page in plan.pages {
            let PlannedPage::Stage(staged) = page else {
                continue;
            };
            if staged.current == staged.patched {
                continue;
            }
            let file = page_file(&staged.uri);
            let unified = TextDiff::from_lines(&staged.current, &staged.patched)
                .unified_diff()
                .header(&format!("a{file}"), &format!("b{file}"))
                .context_radius(3)
                .to_string();
            report.diffs.push(PageDiff {
                uri: staged.uri,
                unified_diff: unified,
            });
        }
    }
    Ok(report)
}

/// `/` → `/index.html`, `/blog` → `/blog/index.html`
fn page_file(uri: &PageUri) -> String {
    if uri.is_root() {
        format!("/{}", pagewright_core::fs_store::PAGE_FILE)
    } else {
        format!("{}/{}", uri, pagewright_core::fs_store::PAGE_FILE)
    }
}
