use crate::core::models::entry::{EntryError, PhaseEntry, PreparedEntry};
use crate::core::models::ids::EntryId;
use slotmap::SlotMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Per-computation arena of prepared entries.
///
/// Every later stage refers to entries by [`EntryId`], so the reduced formula and
/// energy per atom are computed exactly once per entry.
#[derive(Debug, Clone, Default)]
pub struct EntryArena {
    entries: SlotMap<EntryId, PreparedEntry>,
}

impl EntryArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and prepares every entry, failing on the first invalid one.
    pub fn from_entries(entries: &[PhaseEntry]) -> Result<Self, EntryError> {
        let mut arena = Self::new();
        for entry in entries {
            arena.insert(PreparedEntry::new(entry.clone())?);
        }
        Ok(arena)
    }

    pub fn insert(&mut self, entry: PreparedEntry) -> EntryId {
        self.entries.insert(entry)
    }

    pub fn get(&self, id: EntryId) -> Option<&PreparedEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &PreparedEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct elements with a positive amount in any entry, alphabetically.
    pub fn elements(&self) -> Vec<String> {
        self.entries
            .values()
            .flat_map(|e| e.composition().elements())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// A new arena holding only the entries accepted by `keep`.
    pub fn filtered<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&PreparedEntry) -> bool,
    {
        let mut arena = Self::new();
        for entry in self.entries.values() {
            if keep(entry) {
                arena.insert(entry.clone());
            }
        }
        arena
    }
}

/// Minimum-energy entries, one per reduced formula, and the elemental references.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEntries {
    /// Ordered by reduced formula.
    pub min_entries: Vec<EntryId>,
    /// Element symbol to the id of its pure single-element minimum entry.
    pub el_refs: BTreeMap<String, EntryId>,
}

impl NormalizedEntries {
    /// Axis elements from `elements` that have no elemental reference, in order.
    pub fn missing_references<S: AsRef<str>>(&self, elements: &[S]) -> Vec<String> {
        elements
            .iter()
            .map(AsRef::as_ref)
            .filter(|el| !self.el_refs.contains_key(*el))
            .map(str::to_string)
            .collect()
    }
}

/// Keeps, per reduced formula, the entry with the lowest energy per atom.
///
/// Ties keep the entry that was inserted first. Surviving entries whose composition
/// has exactly one positive-amount element become that element's reference.
pub fn normalize(arena: &EntryArena) -> NormalizedEntries {
    let mut best: BTreeMap<&str, (EntryId, f64)> = BTreeMap::new();
    for (id, entry) in arena.iter() {
        match best.get_mut(entry.formula.as_str()) {
            Some(current) => {
                if entry.energy_per_atom < current.1 {
                    debug!(
                        formula = %entry.formula,
                        replaced = current.1,
                        kept = entry.energy_per_atom,
                        "Replacing higher-energy duplicate entry."
                    );
                    *current = (id, entry.energy_per_atom);
                } else {
                    debug!(
                        formula = %entry.formula,
                        dropped = entry.energy_per_atom,
                        "Dropping higher-energy duplicate entry."
                    );
                }
            }
            None => {
                best.insert(entry.formula.as_str(), (id, entry.energy_per_atom));
            }
        }
    }

    let min_entries: Vec<EntryId> = best.values().map(|(id, _)| *id).collect();

    let mut el_refs = BTreeMap::new();
    for &id in &min_entries {
        if let Some(element) = arena.get(id).and_then(|e| e.composition().single_element()) {
            el_refs.insert(element.to_string(), id);
        }
    }

    NormalizedEntries {
        min_entries,
        el_refs,
    }
}
