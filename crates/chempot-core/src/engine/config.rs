use super::error::DiagramError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MIN_LIMIT: f64 = -50.0;
pub const DEFAULT_ELEMENT_PADDING: f64 = 1.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: DiagramError },
}

/// Options controlling a single diagram computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct DiagramConfig {
    /// Rebase energies onto the elemental references before building hyperplanes.
    pub formal_chempots: bool,
    /// Lower border for every axis without an explicit limit, in eV.
    pub default_min_limit: f64,
    /// Display padding subtracted below the lowest non-wall vertex, in eV.
    pub element_padding: f64,
    /// Axis elements and their order. `None` uses every element in the data.
    pub elements: Option<Vec<String>>,
    /// Per-element `[min, max]` overrides of the border limits, in eV.
    pub limits: BTreeMap<String, [f64; 2]>,
    /// When `elements` is a strict subset, drop entries outside the subset and
    /// compute the subsystem directly instead of projecting the full diagram.
    pub subsystem_only: bool,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            formal_chempots: true,
            default_min_limit: DEFAULT_MIN_LIMIT,
            element_padding: DEFAULT_ELEMENT_PADDING,
            elements: None,
            limits: BTreeMap::new(),
            subsystem_only: false,
        }
    }
}

impl DiagramConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate().map_err(|e| ConfigError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    /// Checks the options that can be verified without looking at any entries.
    pub fn validate(&self) -> Result<(), DiagramError> {
        if !self.default_min_limit.is_finite() || self.default_min_limit >= 0.0 {
            return Err(DiagramError::InvalidConfig {
                key: "default-min-limit",
                reason: format!(
                    "must be a finite negative number, got {}",
                    self.default_min_limit
                ),
            });
        }
        if !self.element_padding.is_finite() {
            return Err(DiagramError::InvalidConfig {
                key: "element-padding",
                reason: format!("must be finite, got {}", self.element_padding),
            });
        }
        if let Some(elements) = &self.elements {
            for (i, element) in elements.iter().enumerate() {
                if elements[..i].contains(element) {
                    return Err(DiagramError::DuplicateElement {
                        element: element.clone(),
                    });
                }
            }
        }
        for (element, [min, max]) in &self.limits {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(DiagramError::InvalidLimits {
                    element: element.clone(),
                    min: *min,
                    max: *max,
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DiagramConfigBuilder {
    formal_chempots: Option<bool>,
    default_min_limit: Option<f64>,
    element_padding: Option<f64>,
    elements: Option<Vec<String>>,
    limits: BTreeMap<String, [f64; 2]>,
    subsystem_only: Option<bool>,
}

impl DiagramConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formal_chempots(mut self, formal: bool) -> Self {
        self.formal_chempots = Some(formal);
        self
    }
    pub fn default_min_limit(mut self, limit: f64) -> Self {
        self.default_min_limit = Some(limit);
        self
    }
    pub fn element_padding(mut self, padding: f64) -> Self {
        self.element_padding = Some(padding);
        self
    }
    pub fn elements<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(elements.into_iter().map(Into::into).collect());
        self
    }
    pub fn limit(mut self, element: impl Into<String>, min: f64, max: f64) -> Self {
        self.limits.insert(element.into(), [min, max]);
        self
    }
    pub fn subsystem_only(mut self, subsystem_only: bool) -> Self {
        self.subsystem_only = Some(subsystem_only);
        self
    }

    pub fn build(self) -> Result<DiagramConfig, DiagramError> {
        let defaults = DiagramConfig::default();
        let config = DiagramConfig {
            formal_chempots: self.formal_chempots.unwrap_or(defaults.formal_chempots),
            default_min_limit: self.default_min_limit.unwrap_or(defaults.default_min_limit),
            element_padding: self.element_padding.unwrap_or(defaults.element_padding),
            elements: self.elements,
            limits: self.limits,
            subsystem_only: self.subsystem_only.unwrap_or(defaults.subsystem_only),
        };
        config.validate()?;
        Ok(config)
    }
}
