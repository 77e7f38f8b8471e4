/// Control actions an observer may return during an explicit solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and return the snapshots recorded so far.
    StopEarly,
}
