//! # Engine Module
//!
//! The stages of the chemical-potential diagram pipeline, in data-flow order:
//!
//! 1. **Entry Normalization** ([`normalizer`]) - one minimum-energy entry per reduced
//!    formula, plus the elemental references
//! 2. **Renormalization** ([`renormalizer`]) - optional rebasing onto formal chemical potentials
//! 3. **Hyperplanes** ([`hyperplanes`]) - entry half-spaces and axis-aligned border half-spaces
//! 4. **Vertex Enumeration** ([`vertices`]) - combinatorial half-space intersection
//! 5. **Padding** ([`padding`]) - display limits for vertices sitting on the artificial wall
//! 6. **Boundaries** ([`boundary`]) - PCA + planar hull boundaries and annotation anchors
//!
//! Supporting modules:
//!
//! - **Configuration** ([`config`]) - Diagram options, builder and TOML loading
//! - **Error Handling** ([`error`]) - The pipeline error type
//! - **Progress Monitoring** ([`progress`]) - Optional progress callbacks
//!
//! Every stage is a pure, synchronous function of its inputs. Nothing here holds
//! state between computations, so independent computations may run in parallel.

pub mod boundary;
pub mod config;
pub mod error;
pub mod hyperplanes;
pub mod normalizer;
pub mod padding;
pub mod progress;
pub mod renormalizer;
pub mod vertices;
