mod breakdown;
mod loader;
mod workbench;

use std::path::Path;

use serde::Deserialize;

pub use breakdown::{BreakdownConfig, DEFAULT_INTERNAL_LABELS, DEFAULT_MAX_KEYS, DEFAULT_MAX_VALUES, Limit, LimitError};
pub use workbench::{RowOrder, WorkbenchConfig};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub workbench: WorkbenchConfig,
    #[serde(default)]
    pub breakdown: BreakdownConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }
}
