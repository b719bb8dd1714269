//! # chempot Core Library
//!
//! Computes chemical-potential stability diagrams: given a set of phase entries
//! (composition plus energy), it determines for every distinct phase the region of
//! elemental-chemical-potential space in which that phase is the stable one.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Composition`, `PhaseEntry`),
//!   entry file loading, and the numeric building blocks (index combinations, square
//!   linear solves, PCA, planar convex hulls).
//!
//! - **[`engine`]: The Pipeline Stages.** Entry normalization, formal-potential
//!   renormalization, hyperplane construction, combinatorial vertex enumeration,
//!   display padding and boundary extraction, together with configuration and errors.
//!
//! - **[`workflows`]: The Public API.** Ties the stages together into a single pure
//!   function from `{entries, config}` to a fully populated `ChemPotDiagramData`.

pub mod core;
pub mod engine;
pub mod workflows;
