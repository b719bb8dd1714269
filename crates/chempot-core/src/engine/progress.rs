use std::fmt;

/// Pipeline stages, in the order the diagram workflow runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparation,
    Normalization,
    Renormalization,
    Hyperplanes,
    VertexEnumeration,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Preparation => "Preparing entries",
            Stage::Normalization => "Normalizing entries",
            Stage::Renormalization => "Rebasing onto formal potentials",
            Stage::Hyperplanes => "Building half-spaces",
            Stage::VertexEnumeration => "Enumerating vertices",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    StageStart(Stage),
    StageFinish(Stage),

    /// `combinations` is `C(planes, dim)`, the number of systems that will be solved.
    EnumerationStart {
        combinations: u64,
        planes: usize,
        dim: usize,
    },
    /// Number of combinations checked since the previous event of this kind.
    CombinationsChecked(u64),
    EnumerationFinish {
        feasible_vertices: usize,
        domains: usize,
    },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards progress events to an optional callback.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }

    /// Runs `body` between a start and a finish event for `stage`.
    pub fn stage<T>(&self, stage: Stage, body: impl FnOnce() -> T) -> T {
        self.report(Progress::StageStart(stage));
        let result = body();
        self.report(Progress::StageFinish(stage));
        result
    }
}
