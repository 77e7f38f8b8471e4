use simulon_core::{BoxError, ConfigError, GridError, Side};

/// Errors that can occur while constructing or advancing a [`Stepper`].
///
/// [`Stepper`]: super::Stepper
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{side} boundary failed at t = {time}")]
    BoundaryEvaluation {
        side: Side,
        time: f64,
        #[source]
        source: BoxError,
    },

    #[error("diffusion number {ratio} exceeds the stability limit {limit}")]
    NumericalInstability { ratio: f64, limit: f64 },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<GridError> for Error {
    fn from(err: GridError) -> Self {
        Self::invalid(err.parameter(), err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.parameter(), err.to_string())
    }
}
