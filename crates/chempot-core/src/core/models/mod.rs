//! # Core Models Module
//!
//! Data structures describing the thermodynamic input of a diagram.
//!
//! ## Key Components
//!
//! - [`composition`] - Element-to-amount maps, formula parsing and reduced formulas
//! - [`entry`] - Externally supplied phase entries and their validated, prepared form
//! - [`ids`] - Arena keys for prepared entries
//!
//! ```ignore
//! use chempot::core::models::{composition::Composition, entry::PhaseEntry};
//!
//! let composition: Composition = "Li2O".parse()?;
//! let entry = PhaseEntry::with_energy(composition, -14.3);
//! ```

pub mod composition;
pub mod entry;
pub mod ids;
