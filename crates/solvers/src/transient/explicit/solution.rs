use simulon_core::Trace;

/// Indicates how an explicit solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Completed all `step_count` advances.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of an observed explicit solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the solve terminated.
    pub status: Status,

    /// Snapshots recorded during the solve, starting with the initial state.
    pub trace: Trace,

    /// Number of advances taken.
    pub steps: usize,
}
