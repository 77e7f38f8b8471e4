//! Core types for the Simulon diffusion solvers.
//!
//! This crate defines the data shared between trace producers (the explicit
//! stepper and the learned solver) and trace consumers (the service and the
//! renderer):
//!
//! - [`Grid`] — a uniform 1D grid over `[0, length]`
//! - [`FieldState`] — field values at one instant, one per grid point
//! - [`BoundaryCondition`] — a constant or time-evaluated endpoint value
//! - [`SolverConfig`] — diffusion coefficient, time increment and horizon
//! - [`Trace`] — time-tagged snapshots produced by one solve run
//! - [`FieldModel`] — anything answering `u(position, time)`
//! - [`Observer`] — receives solver events and optionally returns actions
//!
//! # Features
//!
//! - `serde` — derives `Serialize`/`Deserialize` for the value types.

mod boundary;
mod config;
mod field;
mod grid;
mod model;
mod observer;
mod trace;

pub use boundary::{BoundaryCondition, BoundaryFn, BoxError, Side};
pub use config::{ConfigError, STABILITY_LIMIT, SolverConfig, StabilityPolicy};
pub use field::FieldState;
pub use grid::{Grid, GridError};
pub use model::{AnalyticDecay, FieldModel, sample_trace};
pub use observer::Observer;
pub use trace::{Snapshot, Trace};
