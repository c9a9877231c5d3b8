/// Settings for a training run.
///
/// Fields:
/// - `iterations`      — number of full, in-order passes over the dataset
/// - `report_progress` — log "Iteration i of n" lines at `info` level, every
///                       iteration for runs shorter than 100, otherwise
///                       whenever the iteration is a multiple of
///                       `iterations / 100` (which may be fractional)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainConfig {
    pub iterations: usize,
    pub report_progress: bool,
}

impl TrainConfig {
    /// Creates a config that reports progress.
    pub fn new(iterations: usize) -> Self {
        TrainConfig {
            iterations,
            report_progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.report_progress = false;
        self
    }
}
