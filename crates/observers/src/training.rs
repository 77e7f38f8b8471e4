//! Observers for learned-solver training.

use simulon_core::Observer;

use crate::traits::{CanStopEarly, HasLoss};

/// Records the total loss after every epoch.
#[derive(Debug, Clone, Default)]
pub struct LossHistory {
    pub(crate) points: Vec<(usize, f64)>,
}

impl LossHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `(epoch, loss)` pairs in the order they were observed.
    #[must_use]
    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.points.last().map(|&(_, loss)| loss)
    }

    /// Smallest finite loss observed.
    #[must_use]
    pub fn best(&self) -> Option<f64> {
        self.points
            .iter()
            .map(|&(_, loss)| loss)
            .filter(|loss| loss.is_finite())
            .min_by(f64::total_cmp)
    }
}

impl<E: HasLoss, A> Observer<E, A> for LossHistory {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.points.push((event.epoch(), event.loss()));
        None
    }
}

/// Allows `&mut LossHistory` to be passed to solvers that take an observer by
/// value.
impl<E: HasLoss, A> Observer<E, A> for &mut LossHistory {
    fn observe(&mut self, event: &E) -> Option<A> {
        (**self).observe(event)
    }
}

/// Stops training once the loss reaches `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossTarget {
    pub target: f64,
}

impl<E: HasLoss, A: CanStopEarly> Observer<E, A> for LossTarget {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.loss() <= self.target).then(A::stop_early)
    }
}
