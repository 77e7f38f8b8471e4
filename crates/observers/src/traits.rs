//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, so one
//! observer can watch both the explicit stepper and learned training.
//!
//! # Event traits
//!
//! - [`HasField`] — events that carry a field snapshot
//! - [`HasLoss`] — events that carry a training loss
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use simulon_core::Observer;
//! use simulon_observers::traits::{CanStopEarly, HasField};
//!
//! /// Stops once the first interior point warms past a threshold.
//! struct Warmed {
//!     threshold: f64,
//! }
//!
//! impl<E: HasField, A: CanStopEarly> Observer<E, A> for Warmed {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.field()[1] > self.threshold).then(A::stop_early)
//!     }
//! }
//! ```

use simulon_solvers::{learned, transient::explicit};

/// An event that carries the field at one instant.
pub trait HasField {
    /// Simulated time of the field.
    fn time(&self) -> f64;

    /// Field values, one per grid point.
    fn field(&self) -> &[f64];
}

/// An event that carries a training loss.
pub trait HasLoss {
    /// Index of the epoch that produced the loss.
    fn epoch(&self) -> usize;

    /// Total loss after the epoch.
    fn loss(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasField for explicit::Event<'_> {
    fn time(&self) -> f64 {
        self.time
    }

    fn field(&self) -> &[f64] {
        self.field
    }
}

impl HasLoss for learned::Event {
    fn epoch(&self) -> usize {
        self.epoch
    }

    fn loss(&self) -> f64 {
        self.loss.total()
    }
}

impl CanStopEarly for explicit::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for learned::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
