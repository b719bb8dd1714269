use crate::core::models::entry::{PhaseEntry, PreparedEntry};
use crate::core::utils::linalg::euclidean_distance;
use crate::engine::boundary::{DomainBoundary, domain_line_and_ann_loc, domain_simplexes_and_ann_loc};
use crate::engine::config::DiagramConfig;
use crate::engine::error::DiagramError;
use crate::engine::hyperplanes::{Hyperplane, build_border_hyperplanes, build_hyperplanes};
use crate::engine::normalizer::{EntryArena, normalize};
use crate::engine::padding::{apply_element_padding, pad_domain_points};
use crate::engine::progress::{Progress, ProgressReporter, Stage};
use crate::engine::renormalizer::renormalize;
use crate::engine::vertices::{Domains, enumerate_domains, project_domains};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// How the displayed axes relate to the axes the diagram was computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Computed directly in the displayed elements.
    Subsystem,
    /// Computed in every element of the data, then projected onto the displayed ones.
    Projection,
}

/// The result of one diagram computation.
#[derive(Debug, Clone, Serialize)]
pub struct ChemPotDiagramData {
    /// Displayed axes, in order. Every vertex in `domains` has this many coordinates.
    pub elements: Vec<String>,
    /// Axes the half-space intersection was computed in. Equal to `elements` in
    /// subsystem mode.
    pub computed_elements: Vec<String>,
    pub mode: SelectionMode,
    /// Reduced formula to the vertices of its stability domain. Dominated phases are absent.
    pub domains: Domains,
    pub el_refs: BTreeMap<String, PreparedEntry>,
    pub min_entries: Vec<PreparedEntry>,
    /// Entry half-spaces over `computed_elements`.
    pub hyperplanes: Vec<Hyperplane>,
    pub hyperplane_entries: Vec<PreparedEntry>,
    /// Border limits per displayed axis.
    pub lims: Vec<[f64; 2]>,
    pub default_min_limit: f64,
    pub element_padding: f64,
}

/// Domains with their wall vertices moved to the display limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaddedDomains {
    pub domains: Domains,
    pub lims: Vec<[f64; 2]>,
}

#[derive(Debug)]
struct AxisSelection {
    mode: SelectionMode,
    computed: Vec<String>,
    displayed: Vec<String>,
    restrict_entries: bool,
}

#[instrument(skip_all, name = "diagram_workflow")]
pub fn run(
    entries: &[PhaseEntry],
    config: &DiagramConfig,
    reporter: &ProgressReporter,
) -> Result<ChemPotDiagramData, DiagramError> {
    // === Phase 0: Preparation and axis selection ===
    reporter.report(Progress::StageStart(Stage::Preparation));
    config.validate()?;
    if entries.is_empty() {
        return Err(DiagramError::EmptyEntries);
    }

    let arena = EntryArena::from_entries(entries)?;
    let selection = select_axes(&arena.elements(), config)?;
    info!(
        mode = ?selection.mode,
        axes = %selection.displayed.join("-"),
        entries = arena.len(),
        "Selected diagram axes."
    );

    let arena = if selection.restrict_entries {
        let restricted = arena.filtered(|e| e.composition().is_within(&selection.computed));
        let dropped = arena.len() - restricted.len();
        if dropped > 0 {
            warn!(
                dropped,
                "Entries with elements outside the selected subsystem were filtered out."
            );
        }
        restricted
    } else {
        arena
    };

    let lims = border_limits(&selection.computed, config)?;
    reporter.report(Progress::StageFinish(Stage::Preparation));

    // === Phase 1: Entry normalization ===
    reporter.report(Progress::StageStart(Stage::Normalization));
    let normalized = normalize(&arena);
    let missing = normalized.missing_references(&selection.computed);
    if !missing.is_empty() {
        return Err(DiagramError::MissingElementalReferences { missing });
    }
    debug!(
        min_entries = normalized.min_entries.len(),
        "Entries normalized."
    );
    reporter.report(Progress::StageFinish(Stage::Normalization));

    // === Phase 2: Renormalization onto formal chemical potentials (optional) ===
    let (arena, normalized) = if config.formal_chempots {
        reporter.stage(Stage::Renormalization, || {
            renormalize(&arena, &normalized, &selection.computed)
        })?
    } else {
        (arena, normalized)
    };

    // === Phase 3: Hyperplanes ===
    reporter.report(Progress::StageStart(Stage::Hyperplanes));
    let set = build_hyperplanes(&arena, &normalized, &selection.computed);
    let (hyperplanes, contributing): (Vec<Hyperplane>, Vec<&PreparedEntry>) = set
        .hyperplanes
        .into_iter()
        .zip(&set.entries)
        .filter_map(|(plane, &id)| arena.get(id).map(|entry| (plane, entry)))
        .unzip();
    let borders = build_border_hyperplanes(&lims);
    info!(
        hyperplanes = hyperplanes.len(),
        borders = borders.len(),
        "Built half-spaces."
    );
    reporter.report(Progress::StageFinish(Stage::Hyperplanes));

    // === Phase 4: Vertex enumeration ===
    let formulas: Vec<&str> = contributing.iter().map(|e| e.formula.as_str()).collect();
    let domains = reporter.stage(Stage::VertexEnumeration, || {
        enumerate_domains(
            &hyperplanes,
            &formulas,
            &borders,
            selection.computed.len(),
            reporter,
        )
    });

    // === Phase 5: Projection onto the displayed axes ===
    let (domains, lims) = match selection.mode {
        SelectionMode::Subsystem => (domains, lims),
        SelectionMode::Projection => {
            let axes: Vec<usize> = selection
                .displayed
                .iter()
                .filter_map(|el| selection.computed.iter().position(|c| c == el))
                .collect();
            let projected_lims = axes.iter().map(|&a| lims[a]).collect();
            (project_domains(&domains, &axes), projected_lims)
        }
    };

    let data = ChemPotDiagramData {
        elements: selection.displayed,
        computed_elements: selection.computed,
        mode: selection.mode,
        domains,
        el_refs: normalized
            .el_refs
            .iter()
            .filter_map(|(el, &id)| arena.get(id).map(|e| (el.clone(), e.clone())))
            .collect(),
        min_entries: normalized
            .min_entries
            .iter()
            .filter_map(|&id| arena.get(id).cloned())
            .collect(),
        hyperplanes,
        hyperplane_entries: contributing.into_iter().cloned().collect(),
        lims,
        default_min_limit: config.default_min_limit,
        element_padding: config.element_padding,
    };

    info!(
        domains = data.domains.len(),
        "Diagram complete for {}.",
        data.chemical_system()
    );
    Ok(data)
}

fn select_axes(all_elements: &[String], config: &DiagramConfig) -> Result<AxisSelection, DiagramError> {
    let selection = match &config.elements {
        None => AxisSelection {
            mode: SelectionMode::Subsystem,
            computed: all_elements.to_vec(),
            displayed: all_elements.to_vec(),
            restrict_entries: false,
        },
        Some(selected) => {
            for (i, element) in selected.iter().enumerate() {
                if !all_elements.contains(element) {
                    return Err(DiagramError::UnknownElement {
                        element: element.clone(),
                    });
                }
                if selected[..i].contains(element) {
                    return Err(DiagramError::DuplicateElement {
                        element: element.clone(),
                    });
                }
            }

            if selected.len() == all_elements.len() {
                AxisSelection {
                    mode: SelectionMode::Subsystem,
                    computed: selected.clone(),
                    displayed: selected.clone(),
                    restrict_entries: false,
                }
            } else if config.subsystem_only {
                AxisSelection {
                    mode: SelectionMode::Subsystem,
                    computed: selected.clone(),
                    displayed: selected.clone(),
                    restrict_entries: true,
                }
            } else {
                AxisSelection {
                    mode: SelectionMode::Projection,
                    computed: all_elements.to_vec(),
                    displayed: selected.clone(),
                    restrict_entries: false,
                }
            }
        }
    };

    if selection.displayed.len() < 2 {
        return Err(DiagramError::InsufficientDimension {
            dim: selection.displayed.len(),
        });
    }
    Ok(selection)
}

fn border_limits(axes: &[String], config: &DiagramConfig) -> Result<Vec<[f64; 2]>, DiagramError> {
    if let Some(element) = config.limits.keys().find(|el| !axes.contains(el)) {
        return Err(DiagramError::UnknownElement {
            element: element.clone(),
        });
    }
    Ok(axes
        .iter()
        .map(|el| {
            config
                .limits
                .get(el)
                .copied()
                .unwrap_or([config.default_min_limit, 0.0])
        })
        .collect())
}

impl ChemPotDiagramData {
    /// Displayed elements joined by `-` in alphabetical order, e.g. `"Li-O"`.
    pub fn chemical_system(&self) -> String {
        let mut elements: Vec<&str> = self.elements.iter().map(String::as_str).collect();
        elements.sort_unstable();
        elements.join("-")
    }

    pub fn dim(&self) -> usize {
        self.elements.len()
    }

    /// Minimum Euclidean distance between any vertex of one domain and any vertex of
    /// the other, or `None` if either phase has no domain.
    pub fn shortest_domain_distance(&self, first: &str, second: &str) -> Option<f64> {
        let a = self.domains.get(first)?;
        let b = self.domains.get(second)?;
        a.iter()
            .flat_map(|p| b.iter().map(move |q| euclidean_distance(p, q)))
            .min_by(f64::total_cmp)
    }

    /// Copy of `domains` with wall coordinates pulled in to the padded display limits.
    ///
    /// The upper limits are carried over from `lims`.
    pub fn padded(&self) -> PaddedDomains {
        let new_lims = apply_element_padding(
            &self.domains,
            self.dim(),
            self.element_padding,
            self.default_min_limit,
        );
        let domains = self
            .domains
            .iter()
            .map(|(formula, points)| {
                let padded = pad_domain_points(
                    points,
                    &new_lims,
                    self.default_min_limit,
                    self.element_padding,
                );
                (formula.clone(), padded)
            })
            .collect();
        let lims = new_lims
            .iter()
            .zip(&self.lims)
            .map(|(&lo, &[_, hi])| [lo, hi])
            .collect();
        PaddedDomains { domains, lims }
    }

    /// Boundary cycle and annotation anchor of every padded domain.
    ///
    /// Empty for diagrams with fewer than three axes; see [`Self::domain_lines_2d`].
    pub fn domain_boundaries(&self) -> BTreeMap<String, DomainBoundary> {
        if self.dim() < 3 {
            debug!(dim = self.dim(), "Domain boundaries need at least 3 axes.");
            return BTreeMap::new();
        }
        self.padded()
            .domains
            .iter()
            .map(|(formula, points)| (formula.clone(), domain_simplexes_and_ann_loc(points)))
            .collect()
    }

    /// End points and midpoint anchor of every padded domain of a two-axis diagram.
    ///
    /// Empty for any other dimension.
    pub fn domain_lines_2d(&self) -> BTreeMap<String, DomainBoundary> {
        if self.dim() != 2 {
            debug!(dim = self.dim(), "Domain lines are only defined for 2 axes.");
            return BTreeMap::new();
        }
        self.padded()
            .domains
            .iter()
            .map(|(formula, points)| (formula.clone(), domain_line_and_ann_loc(points)))
            .collect()
    }
}
