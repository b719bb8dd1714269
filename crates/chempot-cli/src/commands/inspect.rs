use super::compute_diagram;
use crate::cli::InspectArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chempot::core::utils::geometry::unique_point_indices;
use chempot::engine::boundary::DEDUP_TOLERANCE;
use chempot::workflows::diagram::{ChemPotDiagramData, SelectionMode};

#[derive(Debug, Clone, PartialEq)]
struct DomainSummary {
    formula: String,
    num_vertices: usize,
    num_unique_vertices: usize,
    ann_loc: Vec<f64>,
}

pub fn run(args: InspectArgs, progress: &CliProgressHandler) -> Result<()> {
    let data = compute_diagram(&args.diagram, progress)?;

    let mode = match data.mode {
        SelectionMode::Subsystem => "subsystem",
        SelectionMode::Projection => "projection",
    };
    println!(
        "Chemical system: {} ({} mode, axes {})",
        data.chemical_system(),
        mode,
        data.elements.join(", ")
    );
    for (element, [min, max]) in data.elements.iter().zip(&data.lims) {
        println!("  μ_{:<4} [{:>8.3}, {:>8.3}] eV", element, min, max);
    }
    println!(
        "{} of {} distinct phases are stable:",
        data.domains.len(),
        data.min_entries.len()
    );
    println!(
        "  {:<16} {:>8} {:>8}  annotation anchor",
        "formula", "vertices", "unique"
    );
    for summary in summarize(&data) {
        let anchor = summary
            .ann_loc
            .iter()
            .map(|x| format!("{:.3}", x))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {:<16} {:>8} {:>8}  ({})",
            summary.formula, summary.num_vertices, summary.num_unique_vertices, anchor
        );
    }
    Ok(())
}

fn summarize(data: &ChemPotDiagramData) -> Vec<DomainSummary> {
    let boundaries = if data.dim() >= 3 {
        data.domain_boundaries()
    } else {
        data.domain_lines_2d()
    };

    data.domains
        .iter()
        .map(|(formula, points)| DomainSummary {
            formula: formula.clone(),
            num_vertices: points.len(),
            num_unique_vertices: unique_point_indices(points, DEDUP_TOLERANCE).len(),
            ann_loc: boundaries
                .get(formula)
                .map(|b| b.ann_loc.clone())
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chempot::core::models::entry::PhaseEntry;
    use chempot::engine::config::DiagramConfig;
    use chempot::engine::progress::ProgressReporter;
    use chempot::workflows::diagram;

    fn entry(formula: &str, energy_per_atom: f64) -> PhaseEntry {
        PhaseEntry::with_energy_per_atom(formula.parse().unwrap(), energy_per_atom)
    }

    #[test]
    fn summary_lists_every_stable_domain() {
        let entries = vec![
            entry("A", 0.0),
            entry("B", 0.0),
            entry("C", 0.0),
            entry("ABC", -1.0),
            entry("A2C", 0.4),
        ];
        let data =
            diagram::run(&entries, &DiagramConfig::default(), &ProgressReporter::new()).unwrap();
        let summaries = summarize(&data);

        let formulas: Vec<&str> = summaries.iter().map(|s| s.formula.as_str()).collect();
        assert_eq!(formulas, vec!["A", "ABC", "B", "C"]);

        let abc = summaries.iter().find(|s| s.formula == "ABC").unwrap();
        assert_eq!(abc.num_unique_vertices, 3);
        assert!(abc.num_vertices >= abc.num_unique_vertices);
        for x in &abc.ann_loc {
            assert!((x + 1.0).abs() < 1e-6);
        }
    }
}
