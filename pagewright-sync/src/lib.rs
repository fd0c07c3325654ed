//! # pagewright-sync
//!
//! Propagates template edits to every page built from the template.
//!
//! Call [`propagate`] to process every pending template, [`pipeline::run`] to
//! restrict the pass to one template, or [`preview`] to see the unified diff
//! a pass would produce without writing anything.

pub mod error;
pub mod journal;
pub mod pipeline;
pub mod preview;
pub mod propagate;

pub use error::SyncError;
pub use pipeline::Scope;
pub use preview::{preview, PageDiff, PreviewReport};
pub use propagate::{
    propagate, propagate_scoped, Failure, PageOutcome, PropagateOptions, PropagationReport,
    TemplateReport,
};
