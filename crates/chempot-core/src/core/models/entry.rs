use super::composition::Composition;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum EntryError {
    #[error(
        "Invalid composition '{formula}': amounts must be non-negative with a positive atom count, got {num_atoms} atoms"
    )]
    InvalidComposition { formula: String, num_atoms: f64 },

    #[error("Entry '{formula}' has neither a total energy nor an energy per atom")]
    MissingEnergy { formula: String },
}

/// A phase entry as supplied by the caller.
///
/// At least one of `energy` (total) or `energy_per_atom` must be present. The
/// formation energy is carried through untouched for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub composition: Composition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_per_atom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e_form_per_atom: Option<f64>,
}

impl PhaseEntry {
    pub fn with_energy(composition: Composition, energy: f64) -> Self {
        Self {
            name: None,
            composition,
            energy: Some(energy),
            energy_per_atom: None,
            e_form_per_atom: None,
        }
    }

    pub fn with_energy_per_atom(composition: Composition, energy_per_atom: f64) -> Self {
        Self {
            name: None,
            composition,
            energy: None,
            energy_per_atom: Some(energy_per_atom),
            e_form_per_atom: None,
        }
    }
}

/// A validated entry with its derived quantities computed once.
///
/// The reduced formula is threaded alongside the entry so every later stage keys
/// on content rather than on which entry object it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedEntry {
    pub entry: PhaseEntry,
    pub formula: String,
    pub num_atoms: f64,
    pub energy_per_atom: f64,
}

impl PreparedEntry {
    pub fn new(entry: PhaseEntry) -> Result<Self, EntryError> {
        let formula = entry.composition.reduced_formula();
        let num_atoms = entry.composition.num_atoms();
        if !(num_atoms > 0.0) || entry.composition.has_negative_amount() {
            return Err(EntryError::InvalidComposition {
                formula: entry.composition.to_string(),
                num_atoms,
            });
        }

        let energy_per_atom = match (entry.energy_per_atom, entry.energy) {
            (Some(per_atom), _) => per_atom,
            (None, Some(total)) => total / num_atoms,
            (None, None) => return Err(EntryError::MissingEnergy { formula }),
        };

        Ok(Self {
            entry,
            formula,
            num_atoms,
            energy_per_atom,
        })
    }

    pub fn composition(&self) -> &Composition {
        &self.entry.composition
    }

    pub fn total_energy(&self) -> f64 {
        self.energy_per_atom * self.num_atoms
    }

    /// Returns a copy of this entry carrying a new energy per atom.
    ///
    /// Both the per-atom and the total energy of the wrapped entry are rewritten so
    /// the copy is self-consistent if it is serialized and read back.
    pub fn with_energy_per_atom(&self, energy_per_atom: f64) -> Self {
        let mut entry = self.entry.clone();
        entry.energy_per_atom = Some(energy_per_atom);
        entry.energy = Some(energy_per_atom * self.num_atoms);
        Self {
            entry,
            formula: self.formula.clone(),
            num_atoms: self.num_atoms,
            energy_per_atom,
        }
    }
}
