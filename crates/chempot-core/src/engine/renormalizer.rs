use super::error::DiagramError;
use super::normalizer::{EntryArena, NormalizedEntries, normalize};
use tracing::{debug, warn};

/// Renormalized elemental references further than this from zero are reported.
const REFERENCE_ZERO_TOLERANCE: f64 = 1e-6;

/// Rebases every entry onto formal chemical potentials.
///
/// Each entry's energy per atom becomes `original - Σ fraction(el) · E_ref(el)` over
/// the axis `elements`, using the references in `normalized`. The result is
/// normalized again so the returned references are the renormalized entries, which
/// sit at ~0 eV/atom.
pub fn renormalize<S: AsRef<str>>(
    arena: &EntryArena,
    normalized: &NormalizedEntries,
    elements: &[S],
) -> Result<(EntryArena, NormalizedEntries), DiagramError> {
    let missing = normalized.missing_references(elements);
    if !missing.is_empty() {
        return Err(DiagramError::MissingElementalReferences { missing });
    }

    let reference_energies: Vec<(&str, f64)> = elements
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|el| {
            let id = normalized.el_refs.get(el)?;
            arena.get(*id).map(|e| (el, e.energy_per_atom))
        })
        .collect();

    let mut renormalized = EntryArena::new();
    for (_, entry) in arena.iter() {
        let reference_energy: f64 = reference_energies
            .iter()
            .map(|(el, e_ref)| entry.composition().atomic_fraction(el) * e_ref)
            .sum();
        renormalized.insert(entry.with_energy_per_atom(entry.energy_per_atom - reference_energy));
    }
    debug!(
        entries = renormalized.len(),
        "Rebased entry energies onto elemental references."
    );

    let renormalized_refs = normalize(&renormalized);
    for (element, id) in &renormalized_refs.el_refs {
        if let Some(entry) = renormalized.get(*id) {
            if entry.energy_per_atom.abs() > REFERENCE_ZERO_TOLERANCE {
                warn!(
                    element = %element,
                    energy_per_atom = entry.energy_per_atom,
                    "Renormalized elemental reference is not at zero."
                );
            }
        }
    }

    Ok((renormalized, renormalized_refs))
}
