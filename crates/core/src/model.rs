use std::f64::consts::PI;

use crate::{FieldState, Snapshot, Trace};

/// A continuous field `u(position, time)`.
///
/// Any field model can stand in for the time-marching stepper at the trace
/// boundary: sampling it with [`sample_trace`] on the stepper's grid and
/// snapshot times yields a trace of the same shape.
pub trait FieldModel {
    /// Returns the field value at `position` and simulated `time`.
    fn evaluate(&self, position: f64, time: f64) -> f64;
}

impl<M: FieldModel + ?Sized> FieldModel for &M {
    fn evaluate(&self, position: f64, time: f64) -> f64 {
        (**self).evaluate(position, time)
    }
}

/// Samples a field model at every position for each of `times`.
pub fn sample_trace<M>(model: &M, positions: &[f64], times: impl IntoIterator<Item = f64>) -> Trace
where
    M: FieldModel + ?Sized,
{
    times
        .into_iter()
        .map(|t| {
            let field: FieldState = positions.iter().map(|&x| model.evaluate(x, t)).collect();
            Snapshot::new(t, field)
        })
        .collect()
}

/// The exact decay of the fundamental mode on `[0, length]` with zero
/// boundaries:
///
/// ```text
/// u(x, t) = amplitude * exp(-alpha * (pi / length)² * t) * sin(pi * x / length)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticDecay {
    pub alpha: f64,
    pub length: f64,
    pub amplitude: f64,
}

impl AnalyticDecay {
    /// Unit-amplitude decay.
    #[must_use]
    pub fn new(alpha: f64, length: f64) -> Self {
        Self {
            alpha,
            length,
            amplitude: 1.0,
        }
    }

    /// The initial profile `amplitude * sin(pi * x / length)`.
    #[must_use]
    pub fn initial_field(&self, positions: &[f64]) -> FieldState {
        FieldState::from_fn(positions, |x| self.evaluate(x, 0.0))
    }
}

impl FieldModel for AnalyticDecay {
    fn evaluate(&self, position: f64, time: f64) -> f64 {
        let k = PI / self.length;
        self.amplitude * (-self.alpha * k * k * time).exp() * (k * position).sin()
    }
}
