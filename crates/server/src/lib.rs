//! HTTP service for the Simulon heat-equation solvers.
//!
//! Solves run on the blocking thread pool and their traces are kept in an
//! in-memory [`Store`] under a random [`SimulationId`]. See [`routes`] for the
//! endpoints.
//!
//! # Example
//!
//! ```no_run
//! use simulon_server::{AppState, Limits, routes};
//!
//! #[tokio::main]
//! async fn main() {
//!     let state = AppState::new(Limits::default());
//!     warp::serve(routes(state)).run(([127, 0, 0, 1], 3030)).await;
//! }
//! ```

pub mod api;
mod config;
mod error;
mod routes;
mod store;

pub use config::{Limits, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use routes::{AppState, routes};
pub use store::{Method, Simulation, SimulationId, Store};
