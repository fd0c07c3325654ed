//! pagewright core library: domain types, the instance store, errors.
//!
//! - [`types`]: newtypes, the URI → template map, [`TrailingMode`]
//! - [`store`]: the [`InstanceStore`] collaborator trait
//! - [`fs_store`]: [`FsStore`], an instance directory on disk
//! - [`memory`]: [`MemoryStore`]
//! - [`instance`]: init, page creation/removal, template edits
//! - [`config`]: `_pagewright.yaml`
//! - [`error`]: [`StoreError`]

pub mod config;
pub mod error;
pub mod fs_store;
pub mod instance;
pub mod memory;
pub mod store;
pub mod types;

pub use config::InstanceConfig;
pub use error::{BlobKind, StoreError};
pub use fs_store::FsStore;
pub use memory::MemoryStore;
pub use store::{InstanceStore, PropagationLock};
pub use types::{pages_by_template, PageUri, TemplateName, TrailingMode, UriTemplateMap};
