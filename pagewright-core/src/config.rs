//! Per-instance configuration, read from `<root>/_pagewright.yaml`.
//!
//! ```yaml
//! trailing: strict   # or lenient (default)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StoreError};
use crate::types::TrailingMode;

pub const CONFIG_FILE: &str = "_pagewright.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstanceConfig {
    /// Treatment of page lines past the final template separator.
    pub trailing: TrailingMode,
}

/// `<root>/_pagewright.yaml`
pub fn config_path_at(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Load the instance configuration. A missing file yields the defaults.
pub fn load_at(root: &Path) -> Result<InstanceConfig, StoreError> {
    let path = config_path_at(root);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(InstanceConfig::default()),
        Err(err) => return Err(io_err(&path, err)),
    };
    if contents.trim().is_empty() {
        return Ok(InstanceConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| StoreError::ConfigParse { path, source })
}
