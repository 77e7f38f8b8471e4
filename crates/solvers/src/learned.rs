//! A physics-informed network solver for the 1D heat equation.
//!
//! A small fully connected `tanh` network `u(x, t)` is fitted by minimizing
//!
//! ```text
//! loss = mean((u_t - alpha * u_xx)²)   at interior collocation points
//!      + mean((u(x, 0) - u0(x))²)      on the grid
//!      + mean((u(0|L, t) - bc(t))²)    at the collocation times
//! ```
//!
//! Spatial and temporal derivatives of the network come from forward-mode
//! propagation through the layers. Parameter gradients are estimated by
//! central differences and applied with Adam.
//!
//! The trained solver implements [`FieldModel`], so [`solve`] samples it on
//! the same grid and snapshot times the explicit stepper would use.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use simulon_core::{BoundaryCondition, FieldState, Grid, SolverConfig};
//! use simulon_solvers::learned::{self, TrainingConfig};
//!
//! let grid = Grid::new(1.0, 6)?;
//! let config = SolverConfig::new(0.1, 0.01, 0.05)?;
//! let initial = FieldState::uniform(6, 0.0);
//! let zero = BoundaryCondition::constant(0.0);
//! let training = TrainingConfig {
//!     hidden_layers: 1,
//!     hidden_width: 4,
//!     epochs: 5,
//!     ..TrainingConfig::default()
//! };
//!
//! let run = learned::solve(&grid, &config, &initial, &zero, &zero, NonZeroUsize::MIN, &training)?;
//!
//! assert_eq!(run.trace.shape(), (6, 6));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`FieldModel`]: simulon_core::FieldModel

mod config;
mod data;
mod error;
mod network;
mod solver;
mod train;

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;

use simulon_core::{BoundaryCondition, FieldState, Grid, SolverConfig, Trace, sample_trace};

pub use config::{ConfigError, TrainingConfig};
pub use data::{Sample, TrainingData};
pub use error::Error;
pub use network::{Jet, Network};
pub use solver::{LearnedSolver, Loss};
pub use train::{Action, Event, Status, TrainingReport};

/// A trained solver together with its training summary and sampled trace.
#[derive(Debug, Clone)]
pub struct LearnedRun {
    pub solver: LearnedSolver,
    pub report: TrainingReport,
    pub trace: Trace,
}

/// Trains a solver on the given problem and samples it at the snapshot times
/// the explicit stepper would record for `save_every`.
///
/// # Errors
///
/// Returns an [`Error`] if the training config or problem data is invalid, a
/// boundary rule fails, or training diverges.
pub fn solve(
    grid: &Grid,
    config: &SolverConfig,
    initial: &FieldState,
    left: &BoundaryCondition,
    right: &BoundaryCondition,
    save_every: NonZeroUsize,
    training: &TrainingConfig,
) -> Result<LearnedRun, Error> {
    let data = TrainingData::from_problem(
        grid,
        config,
        initial,
        left,
        right,
        training.collocation_times,
    )?;

    let mut solver = LearnedSolver::new(config.alpha(), training)?;
    let report = solver.train(&data, training)?;
    let trace = sample_trace(&solver, grid.positions(), config.snapshot_times(save_every));

    Ok(LearnedRun {
        solver,
        report,
        trace,
    })
}
