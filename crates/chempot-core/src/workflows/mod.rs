//! # Workflows Module
//!
//! High-level entry points that run the complete chemical-potential diagram pipeline.
//!
//! ## Overview
//!
//! A workflow takes the caller's phase entries and a [`DiagramConfig`](crate::engine::config::DiagramConfig),
//! decides which element axes to compute and display, runs every engine stage in
//! order and returns a single self-contained result. Workflows hold no state between
//! calls.
//!
//! ## Architecture
//!
//! - **Diagram Workflow** ([`diagram`]) - entry preparation, subsystem/projection
//!   mode selection, optional renormalization, hyperplane construction and vertex
//!   enumeration, plus the display queries (padding, boundaries, annotation anchors)
//!   on the resulting [`ChemPotDiagramData`](diagram::ChemPotDiagramData).

pub mod diagram;
