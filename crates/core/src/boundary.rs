use std::{error::Error as StdError, fmt, sync::Arc};

/// A boxed, thread-safe error returned by fallible boundary rules.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Signature of a time-evaluated boundary rule.
///
/// The argument is the elapsed simulated time at which the boundary value is
/// required.
pub type BoundaryFn = dyn Fn(f64) -> Result<f64, BoxError> + Send + Sync;

/// The value imposed at one end of the grid.
///
/// A boundary is either a constant or a rule evaluated at the simulated time
/// of each step. Cloning a `TimeFunction` shares the underlying rule.
#[derive(Clone)]
pub enum BoundaryCondition {
    /// A fixed value for every step.
    Constant(f64),

    /// A rule evaluated at the new simulated time after each step.
    TimeFunction(Arc<BoundaryFn>),
}

impl BoundaryCondition {
    /// Creates a constant boundary.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Creates an infallible time-evaluated boundary.
    pub fn time_function<F>(rule: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::TimeFunction(Arc::new(move |t| Ok(rule(t))))
    }

    /// Creates a time-evaluated boundary whose rule may fail.
    ///
    /// A failure surfaces from the solver as a boundary evaluation error.
    pub fn try_time_function<F, E>(rule: F) -> Self
    where
        F: Fn(f64) -> Result<f64, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::TimeFunction(Arc::new(move |t| rule(t).map_err(Into::into)))
    }

    /// Evaluates the boundary value at simulated time `time`.
    ///
    /// # Errors
    ///
    /// Returns the rule's error if a `TimeFunction` fails.
    pub fn evaluate(&self, time: f64) -> Result<f64, BoxError> {
        match self {
            Self::Constant(value) => Ok(*value),
            Self::TimeFunction(rule) => rule(time),
        }
    }

    /// Returns the value if this boundary is a constant.
    #[must_use]
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Self::Constant(value) => Some(*value),
            Self::TimeFunction(_) => None,
        }
    }
}

impl From<f64> for BoundaryCondition {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::TimeFunction(_) => f.write_str("TimeFunction(..)"),
        }
    }
}

/// An end of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Side {
    /// Index 0, position 0.
    Left,
    /// Last index, position `length`.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("sensor offline")]
    struct SensorOffline;

    #[test]
    fn constant_ignores_time() {
        let bc = BoundaryCondition::constant(3.5);
        assert_eq!(bc.evaluate(0.0).unwrap(), 3.5);
        assert_eq!(bc.evaluate(100.0).unwrap(), 3.5);
        assert_eq!(bc.as_constant(), Some(3.5));
    }

    #[test]
    fn time_function_receives_time() {
        let bc = BoundaryCondition::time_function(|t| 2.0 * t);
        assert_eq!(bc.evaluate(0.25).unwrap(), 0.5);
        assert_eq!(bc.as_constant(), None);
    }

    #[test]
    fn fallible_rule_reports_error() {
        let bc = BoundaryCondition::try_time_function(|t| {
            if t < 1.0 { Ok(0.0) } else { Err(SensorOffline) }
        });

        assert_eq!(bc.evaluate(0.5).unwrap(), 0.0);
        let err = bc.evaluate(1.5).unwrap_err();
        assert_eq!(err.to_string(), "sensor offline");
    }

    #[test]
    fn clones_share_the_rule() {
        let bc = BoundaryCondition::time_function(|t| t + 1.0);
        let copy = bc.clone();
        assert_eq!(copy.evaluate(1.0).unwrap(), 2.0);
    }

    #[test]
    fn debug_hides_closure() {
        assert_eq!(format!("{:?}", BoundaryCondition::from(1.0)), "Constant(1.0)");
        assert_eq!(
            format!("{:?}", BoundaryCondition::time_function(|t| t)),
            "TimeFunction(..)"
        );
    }

    #[test]
    fn sides_display_lowercase() {
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Right.to_string(), "right");
    }
}
