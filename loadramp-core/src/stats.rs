/// Outcome of the run phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RampStatistics {
    /// Rates the tool was invoked for.
    pub attacked: usize,
    /// Rates whose artifact already existed.
    pub skipped: usize,
}

/// Outcome of the aggregate phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregateStatistics {
    pub rates: usize,
    pub latency_rows: usize,
}

/// Minimal statistics for a full `load-ramp` run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub ramp: RampStatistics,
    pub aggregate: AggregateStatistics,
}
