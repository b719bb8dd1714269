use super::normalizer::{EntryArena, NormalizedEntries};
use crate::core::models::ids::EntryId;
use crate::core::utils::linalg::dot;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Entries must be at least this far below their references to get a hyperplane.
pub const FORMATION_ENERGY_TOLERANCE: f64 = 1e-6;

/// The half-space `c · μ + b ≤ 0`, stored as the row `[c_1, .., c_d, b]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hyperplane(Vec<f64>);

impl Hyperplane {
    pub fn new(coefficients: Vec<f64>, offset: f64) -> Self {
        let mut row = coefficients;
        row.push(offset);
        Self(row)
    }

    pub fn dim(&self) -> usize {
        self.0.len() - 1
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.0[..self.dim()]
    }

    pub fn offset(&self) -> f64 {
        self.0[self.dim()]
    }

    /// Signed violation `c · μ + b`; non-positive inside the half-space.
    pub fn evaluate(&self, point: &[f64]) -> f64 {
        dot(self.coefficients(), point) + self.offset()
    }

    pub fn as_row(&self) -> &[f64] {
        &self.0
    }
}

/// Entry hyperplanes with the entry that produced each row.
#[derive(Debug, Clone, Default)]
pub struct HyperplaneSet {
    pub hyperplanes: Vec<Hyperplane>,
    pub entries: Vec<EntryId>,
}

impl HyperplaneSet {
    pub fn len(&self) -> usize {
        self.hyperplanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hyperplanes.is_empty()
    }
}

/// Builds the half-space `fractions · μ − E_per_atom ≤ 0` for every relevant entry.
///
/// An entry is relevant if its formation energy per atom is below
/// `-FORMATION_ENERGY_TOLERANCE` or it is an elemental reference. Relevant
/// compounds come first, in minimum-entry order, followed by the references in
/// element order.
pub fn build_hyperplanes<S: AsRef<str>>(
    arena: &EntryArena,
    normalized: &NormalizedEntries,
    elements: &[S],
) -> HyperplaneSet {
    let reference_energies: Vec<f64> = elements
        .iter()
        .map(|el| {
            normalized
                .el_refs
                .get(el.as_ref())
                .and_then(|id| arena.get(*id))
                .map_or(0.0, |e| e.energy_per_atom)
        })
        .collect();
    let reference_ids: HashSet<EntryId> = elements
        .iter()
        .filter_map(|el| normalized.el_refs.get(el.as_ref()).copied())
        .collect();

    let mut set = HyperplaneSet::default();
    let mut push = |id: EntryId, fractions: Vec<f64>, energy_per_atom: f64| {
        set.hyperplanes
            .push(Hyperplane::new(fractions, -energy_per_atom));
        set.entries.push(id);
    };

    for &id in &normalized.min_entries {
        if reference_ids.contains(&id) {
            continue;
        }
        let Some(entry) = arena.get(id) else {
            continue;
        };
        let fractions: Vec<f64> = elements
            .iter()
            .map(|el| entry.composition().atomic_fraction(el.as_ref()))
            .collect();
        let formation_energy = entry.energy_per_atom - dot(&fractions, &reference_energies);
        if formation_energy < -FORMATION_ENERGY_TOLERANCE {
            push(id, fractions, entry.energy_per_atom);
        } else {
            debug!(
                formula = %entry.formula,
                formation_energy,
                "Entry is not below its references; no hyperplane."
            );
        }
    }

    for el in elements {
        let Some(&id) = normalized.el_refs.get(el.as_ref()) else {
            continue;
        };
        if let Some(entry) = arena.get(id) {
            let fractions: Vec<f64> = elements
                .iter()
                .map(|other| entry.composition().atomic_fraction(other.as_ref()))
                .collect();
            push(id, fractions, entry.energy_per_atom);
        }
    }

    set
}

/// Two axis-aligned half-spaces per axis: `−μ_i + lo ≤ 0` and `μ_i − hi ≤ 0`.
pub fn build_border_hyperplanes(lims: &[[f64; 2]]) -> Vec<Hyperplane> {
    let dim = lims.len();
    let mut borders = Vec::with_capacity(2 * dim);
    for (i, [lo, hi]) in lims.iter().enumerate() {
        let mut lower = vec![0.0; dim];
        lower[i] = -1.0;
        borders.push(Hyperplane::new(lower, *lo));

        let mut upper = vec![0.0; dim];
        upper[i] = 1.0;
        borders.push(Hyperplane::new(upper, -*hi));
    }
    borders
}
