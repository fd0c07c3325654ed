//! Shared propagation entrypoint used by `update` and `diff`.

use pagewright_core::{InstanceStore, TemplateName};

use crate::error::SyncError;
use crate::propagate::{propagate_scoped, PropagateOptions, PropagationReport};

/// Which templates a pass considers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every pending template.
    All,
    /// A single template, if it is pending.
    Template(TemplateName),
}

impl Scope {
    /// Pending templates within this scope, sorted by name.
    pub fn select<S: InstanceStore>(&self, store: &S) -> Result<Vec<TemplateName>, SyncError> {
        match self {
            Scope::All => Ok(store.pending_templates()?),
            Scope::Template(name) => {
                if store.backup_exists(name)? {
                    Ok(vec![name.clone()])
                } else {
                    tracing::info!(template = %name, "template has no pending edit");
                    Ok(Vec::new())
                }
            }
        }
    }
}

/// Run a propagation pass for a scope.
pub fn run<S: InstanceStore>(
    store: &mut S,
    scope: Scope,
    options: PropagateOptions,
) -> Result<PropagationReport, SyncError> {
    propagate_scoped(store, &scope, options)
}
