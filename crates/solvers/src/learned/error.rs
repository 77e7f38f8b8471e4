use simulon_core::{BoxError, Side};
use thiserror::Error;

use super::ConfigError;

/// Errors that can occur when building or training a learned solver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid training config: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("{side} boundary failed at t = {time}")]
    BoundaryEvaluation {
        side: Side,
        time: f64,
        #[source]
        source: BoxError,
    },

    #[error("training loss became non-finite at epoch {epoch}")]
    NonFiniteLoss { epoch: usize },
}
