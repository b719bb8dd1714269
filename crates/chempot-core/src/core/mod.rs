//! # Core Module
//!
//! Fundamental data structures and numeric utilities used by every pipeline stage.
//!
//! ## Architecture
//!
//! - **Phase Data** ([`models`]) - Compositions, phase entries and their arena ids
//! - **File I/O** ([`io`]) - Reading entry sets from JSON and CSV files
//! - **Numerics** ([`utils`]) - Combinations, dimension-dispatched linear solves, PCA and hulls
//!
//! Nothing in this module holds state between calls; every function is a pure
//! transform of its arguments.

pub mod io;
pub mod models;
pub mod utils;
