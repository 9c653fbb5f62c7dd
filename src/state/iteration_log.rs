use serde::Serialize;

/// One solver iteration. `relative_gap` is measured on the flows the iteration
/// started from, `total_travel_time` on the flows after its step.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub relative_gap: f64,
    pub total_travel_time: f64,
    pub step_size: f64,
}

/// How an equilibrium run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Convergence {
    /// relative gap fell below the tolerance
    Converged,
    /// step size stayed negligible for several iterations
    Stalled,
    /// `max_iterations` exhausted
    IterationLimit,
}

/// Append-only record of completed solver iterations.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IterationLog {
    records: Vec<IterationRecord>,
}

impl IterationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    pub fn final_gap(&self) -> Option<f64> {
        self.last().map(|r| r.relative_gap)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
