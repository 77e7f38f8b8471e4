use std::convert::Infallible;

use serde::Serialize;
use simulon_core::{ConfigError, GridError};
use simulon_observers::RenderError;
use simulon_solvers::{learned, transient::explicit};
use thiserror::Error;
use tracing::error;
use warp::{
    Rejection, Reply,
    http::StatusCode,
    reply::{self, Response},
};

use crate::store::SimulationId;

/// Errors returned to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("`{name}` = {value} exceeds the limit of {limit}")]
    LimitExceeded {
        name: &'static str,
        value: usize,
        limit: usize,
    },

    #[error("simulation {0} not found")]
    NotFound(SimulationId),

    #[error(transparent)]
    Explicit(#[from] explicit::Error),

    #[error(transparent)]
    Learned(#[from] learned::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("solver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidParameter { .. }
            | Self::LimitExceeded { .. }
            | Self::Explicit(
                explicit::Error::InvalidParameter { .. }
                | explicit::Error::NumericalInstability { .. },
            )
            | Self::Learned(
                learned::Error::Config(_) | learned::Error::InvalidParameter { .. },
            ) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Learned(learned::Error::NonFiniteLoss { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Explicit(explicit::Error::BoundaryEvaluation { .. })
            | Self::Learned(learned::Error::BoundaryEvaluation { .. })
            | Self::Render(_)
            | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a JSON response with its status code.
    #[must_use]
    pub fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        json_error(&self.to_string(), status)
    }
}

impl From<GridError> for ApiError {
    fn from(err: GridError) -> Self {
        Self::invalid(err.parameter(), err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::invalid(err.parameter(), err.to_string())
    }
}

fn json_error(message: &str, status: StatusCode) -> Response {
    let body = ErrorBody {
        error: message.to_owned(),
    };
    reply::with_status(reply::json(&body), status).into_response()
}

/// Turns warp's own rejections into JSON error responses.
pub(crate) async fn recover(rejection: Rejection) -> Result<Response, Infallible> {
    let response = if rejection.is_not_found() {
        json_error("not found", StatusCode::NOT_FOUND)
    } else if let Some(err) = rejection.find::<warp::body::BodyDeserializeError>() {
        json_error(&format!("invalid request body: {err}"), StatusCode::BAD_REQUEST)
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        json_error("request body too large", StatusCode::PAYLOAD_TOO_LARGE)
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        json_error("method not allowed", StatusCode::METHOD_NOT_ALLOWED)
    } else {
        error!(?rejection, "unhandled rejection");
        json_error("internal error", StatusCode::INTERNAL_SERVER_ERROR)
    };
    Ok(response)
}
