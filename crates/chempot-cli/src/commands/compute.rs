use super::compute_diagram;
use crate::cli::ComputeArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chempot::engine::boundary::DomainBoundary;
use chempot::workflows::diagram::{ChemPotDiagramData, PaddedDomains};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Serialize)]
struct DiagramOutput<'a> {
    #[serde(flatten)]
    diagram: &'a ChemPotDiagramData,
    #[serde(skip_serializing_if = "Option::is_none")]
    padded: Option<PaddedDomains>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boundaries: Option<BTreeMap<String, DomainBoundary>>,
}

pub fn run(args: ComputeArgs, progress: &CliProgressHandler) -> Result<()> {
    let data = compute_diagram(&args.diagram, progress)?;
    let json = render_output(&data, args.with_geometry, args.pretty)?;

    match &args.output {
        Some(path) => {
            info!("Writing diagram to {:?}", path);
            std::fs::write(path, json)?;
            eprintln!(
                "✓ Diagram for {} ({} domains) written to: {}",
                data.chemical_system(),
                data.domains.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn render_output(data: &ChemPotDiagramData, with_geometry: bool, pretty: bool) -> Result<String> {
    let (padded, boundaries) = if with_geometry {
        let boundaries = if data.dim() >= 3 {
            data.domain_boundaries()
        } else {
            data.domain_lines_2d()
        };
        (Some(data.padded()), Some(boundaries))
    } else {
        (None, None)
    };

    let output = DiagramOutput {
        diagram: data,
        padded,
        boundaries,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::DiagramArgs;
    use crate::error::CliError;
    use chempot::engine::error::DiagramError;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const TERNARY_CSV: &str = "\
formula,energy_per_atom
A,-1.0
B,-2.0
C,-0.5
ABC,-3.0
AB,-1.2
";

    fn diagram_args(entries: &Path) -> DiagramArgs {
        DiagramArgs {
            entries: entries.to_path_buf(),
            config: None,
            elements: None,
            absolute: false,
            subsystem_only: false,
            min_limit: None,
            padding: None,
            set_values: vec![],
        }
    }

    fn write_entries(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn compute_writes_json_with_geometry() {
        let dir = tempdir().unwrap();
        let entries = write_entries(dir.path(), "entries.csv", TERNARY_CSV);
        let output = dir.path().join("diagram.json");

        run(
            ComputeArgs {
                diagram: diagram_args(&entries),
                output: Some(output.clone()),
                pretty: true,
                with_geometry: true,
            },
            &CliProgressHandler::hidden(),
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(json["elements"], serde_json::json!(["A", "B", "C"]));
        assert!(json["domains"]["ABC"].is_array());
        assert!(json["padded"]["lims"].is_array());
        let abc = &json["boundaries"]["ABC"];
        assert_eq!(abc["ann_loc"].as_array().unwrap().len(), 3);
        assert!(!abc["simplexes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn geometry_is_omitted_unless_requested() {
        let dir = tempdir().unwrap();
        let entries = write_entries(dir.path(), "entries.csv", TERNARY_CSV);
        let progress = CliProgressHandler::hidden();
        let data = compute_diagram(&diagram_args(&entries), &progress).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&render_output(&data, false, false).unwrap()).unwrap();
        assert!(json.get("padded").is_none());
        assert!(json.get("boundaries").is_none());
        assert_eq!(json["mode"], "subsystem");
    }

    #[test]
    fn two_axis_geometry_uses_domain_lines() {
        let dir = tempdir().unwrap();
        let entries = write_entries(
            dir.path(),
            "entries.json",
            r#"[
                {"composition": {"A": 1}, "energy": 0.0},
                {"composition": {"B": 2}, "energy": 0.0},
                {"composition": {"A": 1, "B": 1}, "energy": -4.0}
            ]"#,
        );
        let progress = CliProgressHandler::hidden();
        let data = compute_diagram(&diagram_args(&entries), &progress).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&render_output(&data, true, false).unwrap()).unwrap();
        let ann = json["boundaries"]["AB"]["ann_loc"].as_array().unwrap();
        assert!((ann[0].as_f64().unwrap() + 2.0).abs() < 1e-6);
        assert!((ann[1].as_f64().unwrap() + 2.0).abs() < 1e-6);
    }

    #[test]
    fn missing_reference_surfaces_as_diagram_error() {
        let dir = tempdir().unwrap();
        let entries = write_entries(dir.path(), "entries.csv", "formula,energy\nA,0\nAB,-2\n");
        let progress = CliProgressHandler::hidden();
        let result = compute_diagram(&diagram_args(&entries), &progress);
        assert!(matches!(
            result,
            Err(CliError::Diagram(DiagramError::MissingElementalReferences { .. }))
        ));
    }

    #[test]
    fn unsupported_entry_format_is_reported() {
        let dir = tempdir().unwrap();
        let entries = write_entries(dir.path(), "entries.txt", "A 0\n");
        let progress = CliProgressHandler::hidden();
        let result = compute_diagram(&diagram_args(&entries), &progress);
        assert!(matches!(result, Err(CliError::EntryLoad(_))));
    }
}
