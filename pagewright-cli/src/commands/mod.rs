//! One module per subcommand, each exposing `XxxArgs::run(self, root)`.

pub mod diff;
pub mod edit;
pub mod extract;
pub mod init;
pub mod list;
pub mod page;
pub mod pending;
pub mod templates;
pub mod update;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use pagewright_core::{config, FsStore, TrailingMode};

/// Open the instance at `root`.
pub(crate) fn open_store(root: &Path) -> Result<FsStore> {
    FsStore::open(root).with_context(|| {
        format!(
            "no pagewright instance at '{}' (use --root or run `pagewright init`)",
            root.display()
        )
    })
}

/// `--strict` / `--lenient`, overriding `trailing:` in `_pagewright.yaml`.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct TrailingArgs {
    /// Fail pages with content after the template's final line.
    #[arg(long, conflicts_with = "lenient")]
    pub strict: bool,

    /// Ignore content after the template's final line.
    #[arg(long)]
    pub lenient: bool,
}

impl TrailingArgs {
    pub fn resolve(self, root: &Path) -> Result<TrailingMode> {
        if self.strict {
            return Ok(TrailingMode::Strict);
        }
        if self.lenient {
            return Ok(TrailingMode::Lenient);
        }
        let config = config::load_at(root).context("failed to load instance config")?;
        Ok(config.trailing)
    }
}
