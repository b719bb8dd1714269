//! # Entry I/O Module
//!
//! Loading of phase-entry sets from disk.
//!
//! - **JSON** - an array of [`PhaseEntry`](crate::core::models::entry::PhaseEntry) objects
//! - **CSV** - one row per entry with a `formula` column and an `energy` and/or
//!   `energy_per_atom` column

pub mod entries;
