use crate::core::models::entry::EntryError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum DiagramError {
    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error("No entries were supplied")]
    EmptyEntries,

    #[error("There are no elemental reference entries for: {}", missing.join(", "))]
    MissingElementalReferences { missing: Vec<String> },

    #[error("Chemical potential diagrams require at least 2 elements, got {dim}")]
    InsufficientDimension { dim: usize },

    #[error("Element '{element}' is not present in any entry")]
    UnknownElement { element: String },

    #[error("Element '{element}' is listed more than once")]
    DuplicateElement { element: String },

    #[error("Invalid limits for element '{element}': [{min}, {max}]")]
    InvalidLimits { element: String, min: f64, max: f64 },

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidConfig { key: &'static str, reason: String },
}
