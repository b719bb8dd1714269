pub mod compute;
pub mod inspect;

use crate::cli::DiagramArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use chempot::core::io::entries::load_entries;
use chempot::engine::progress::ProgressReporter;
use chempot::workflows::diagram::{self, ChemPotDiagramData};
use tracing::info;

/// Loads entries and configuration and runs the diagram workflow.
fn compute_diagram(args: &DiagramArgs, progress: &CliProgressHandler) -> Result<ChemPotDiagramData> {
    let config = build_config(args)?;

    info!("Loading phase entries from {:?}", &args.entries);
    let entries = load_entries(&args.entries)?;
    info!("Loaded {} entries.", entries.len());

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    info!("Invoking the core diagram workflow...");
    let data = diagram::run(&entries, &config, &reporter)?;

    info!(
        "Workflow finished with {} stable domain(s) over {}.",
        data.domains.len(),
        data.chemical_system()
    );
    Ok(data)
}
