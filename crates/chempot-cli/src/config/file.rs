use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A diagram configuration file in which every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub formal_chempots: Option<bool>,
    pub default_min_limit: Option<f64>,
    pub element_padding: Option<f64>,
    pub elements: Option<Vec<String>>,
    pub subsystem_only: Option<bool>,
    #[serde(default)]
    pub limits: BTreeMap<String, [f64; 2]>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
