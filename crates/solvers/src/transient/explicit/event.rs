/// Event emitted by an explicit solve.
///
/// The first event describes the state the solve started from; one event
/// follows each advance. `field` borrows the stepper's live buffer for the
/// duration of the callback only.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// The stepper's step index after this event's advance.
    pub step: usize,

    /// Simulated time of `field`.
    pub time: f64,

    /// Field values at `time`.
    pub field: &'a [f64],

    /// Whether this state was recorded into the trace.
    pub recorded: bool,
}
