use chempot::engine::progress::{Progress, ProgressCallback, Stage};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders diagram workflow progress on stderr.
///
/// Each stage runs under a spinner. Vertex enumeration switches it to a bar
/// counting checked half-space combinations against `C(planes, dim)`.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// Tracks state without drawing; used for `--quiet` and in tests.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target).with_style(spinner_style());
        pb.finish_and_clear();
        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb) = pb.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };
            apply(&pb, progress);
        })
    }
}

fn apply(pb: &ProgressBar, progress: Progress) {
    match progress {
        Progress::StageStart(stage) => {
            pb.reset();
            pb.set_length(0);
            pb.set_style(spinner_style());
            pb.set_message(format!("{}...", stage));
            pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        }
        Progress::StageFinish(stage) => {
            pb.disable_steady_tick();
            if stage != Stage::VertexEnumeration {
                pb.set_message(format!("✓ {}", stage));
            }
            pb.finish();
        }
        Progress::EnumerationStart {
            combinations,
            planes,
            dim,
        } => {
            pb.disable_steady_tick();
            pb.set_style(combinations_style());
            pb.set_length(combinations);
            pb.set_position(0);
            pb.set_message(format!("{} half-spaces in {}D", planes, dim));
        }
        Progress::CombinationsChecked(count) => pb.inc(count),
        Progress::EnumerationFinish {
            feasible_vertices,
            domains,
        } => {
            if let Some(length) = pb.length() {
                pb.set_position(length);
            }
            pb.set_message(format!(
                "✓ {} stable domains from {} feasible vertices",
                domains, feasible_vertices
            ));
        }
        Progress::Message(msg) => pb.println(format!("  {}", msg)),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn combinations_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{msg:<24} [{bar:40.cyan/blue}] {human_pos}/{human_len} combinations ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("##-")
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
