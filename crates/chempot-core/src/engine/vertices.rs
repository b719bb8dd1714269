use super::hyperplanes::Hyperplane;
use super::progress::{Progress, ProgressReporter};
use crate::core::utils::combinations::{IndexCombinations, binomial};
use crate::core::utils::linalg::SolveStrategy;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A half-space counts as satisfied while `c · μ + b` stays below this.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Combinations processed between two progress increments.
const PROGRESS_BATCH: u64 = 1024;

/// A point in chemical-potential space.
pub type Point = Vec<f64>;

/// Reduced formula to the vertices of that phase's stability domain.
pub type Domains = BTreeMap<String, Vec<Point>>;

/// Vertices of every phase domain, by combinatorial half-space intersection.
///
/// Every `d`-subset of `entry_planes ++ border_planes` is solved for its common
/// point; points violating any half-space by more than [`FEASIBILITY_TOLERANCE`]
/// are discarded. A feasible point is appended to the domain of every *entry* plane
/// in its subset, keyed by `formulas[i]`. Border planes bound the region but never
/// own a domain, even when a vertex lies on one. Phases that end up with no
/// vertices are absent from the result.
///
/// The cost is `C(n, d)` solves of a `d × d` system, each followed by an `n`-plane
/// feasibility check.
pub fn enumerate_domains(
    entry_planes: &[Hyperplane],
    formulas: &[&str],
    border_planes: &[Hyperplane],
    dim: usize,
    reporter: &ProgressReporter,
) -> Domains {
    debug_assert_eq!(entry_planes.len(), formulas.len());

    let planes: Vec<&Hyperplane> = entry_planes.iter().chain(border_planes).collect();
    let num_entry_planes = entry_planes.len();
    let strategy = SolveStrategy::for_dim(dim);

    let total = binomial(planes.len(), dim);
    info!(
        planes = planes.len(),
        dim,
        combinations = total,
        strategy = ?strategy,
        "Enumerating half-space intersection vertices."
    );
    reporter.report(Progress::EnumerationStart {
        combinations: total,
        planes: planes.len(),
        dim,
    });

    let mut domains: Domains = formulas
        .iter()
        .map(|f| (f.to_string(), Vec::new()))
        .collect();

    let mut rows: Vec<&[f64]> = Vec::with_capacity(dim);
    let mut rhs: Vec<f64> = Vec::with_capacity(dim);
    let mut feasible_vertices = 0usize;
    let mut unreported = 0u64;

    for combination in IndexCombinations::new(planes.len(), dim) {
        unreported += 1;
        if unreported == PROGRESS_BATCH {
            reporter.report(Progress::CombinationsChecked(unreported));
            unreported = 0;
        }

        rows.clear();
        rhs.clear();
        for &i in &combination {
            rows.push(planes[i].coefficients());
            rhs.push(-planes[i].offset());
        }

        let Some(vertex) = strategy.solve(&rows, &rhs) else {
            continue;
        };
        if !is_feasible(&vertex, &planes) {
            continue;
        }

        feasible_vertices += 1;
        for &i in combination.iter().filter(|&&i| i < num_entry_planes) {
            if let Some(points) = domains.get_mut(formulas[i]) {
                points.push(vertex.clone());
            }
        }
    }
    if unreported > 0 {
        reporter.report(Progress::CombinationsChecked(unreported));
    }

    domains.retain(|_, points| !points.is_empty());
    reporter.report(Progress::EnumerationFinish {
        feasible_vertices,
        domains: domains.len(),
    });
    debug!(
        feasible_vertices,
        domains = domains.len(),
        "Vertex enumeration finished."
    );
    domains
}

fn is_feasible(point: &[f64], planes: &[&Hyperplane]) -> bool {
    planes
        .iter()
        .all(|plane| plane.evaluate(point) <= FEASIBILITY_TOLERANCE)
}

/// Keeps only the coordinates at `axes`, in that order, for every vertex.
pub fn project_domains(domains: &Domains, axes: &[usize]) -> Domains {
    domains
        .iter()
        .map(|(formula, points)| {
            let projected = points
                .iter()
                .map(|p| axes.iter().map(|&a| p[a]).collect())
                .collect();
            (formula.clone(), projected)
        })
        .collect()
}
