/// Receives solver events and optionally returns a control action.
///
/// Solvers call [`observe`][Observer::observe] after each unit of work. An
/// observer that never intervenes returns `None`.
///
/// Implemented for:
///
/// - `()` — discards every event
/// - any `FnMut(&E) -> Option<A>` closure
pub trait Observer<E, A> {
    /// Handles an event, returning an action for the solver to take.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}
