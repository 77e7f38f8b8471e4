use simulon_core::Observer;
use tracing::warn;

use crate::traits::{CanStopEarly, HasField};

/// The first non-finite value seen by a [`FiniteGuard`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonFinite {
    pub time: f64,
    /// Grid index of the value.
    pub index: usize,
    pub value: f64,
}

/// Stops a solve as soon as the field holds a NaN or infinite value.
///
/// An unchecked explicit run with `alpha * dt / spacing² > 0.5` grows without
/// bound and eventually overflows. Passing `&mut guard` as the observer ends
/// such a run at the first bad state and leaves the location in
/// [`found`][FiniteGuard::found].
#[derive(Debug, Clone, Default)]
pub struct FiniteGuard {
    found: Option<NonFinite>,
}

impl FiniteGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn found(&self) -> Option<NonFinite> {
        self.found
    }

    #[must_use]
    pub fn tripped(&self) -> bool {
        self.found.is_some()
    }
}

impl<E: HasField, A: CanStopEarly> Observer<E, A> for FiniteGuard {
    fn observe(&mut self, event: &E) -> Option<A> {
        if self.found.is_some() {
            return Some(A::stop_early());
        }

        let (index, &value) = event
            .field()
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())?;

        warn!(time = event.time(), index, value, "non-finite field value");
        self.found = Some(NonFinite {
            time: event.time(),
            index,
            value,
        });
        Some(A::stop_early())
    }
}

/// Allows `&mut FiniteGuard` to be passed to solvers that take an observer by
/// value, so the guard can be inspected after the solve returns.
impl<E: HasField, A: CanStopEarly> Observer<E, A> for &mut FiniteGuard {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}
