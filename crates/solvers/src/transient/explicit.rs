//! Explicit (forward Euler) time marching for the 1D heat equation.
//!
//! The spatial derivative uses the second-order central-difference stencil and
//! time is advanced with forward Euler:
//!
//! ```text
//! u_{n+1}[i] = u_n[i] + alpha * dt / dx² * (u_n[i+1] - 2 u_n[i] + u_n[i-1])
//! ```
//!
//! Endpoint values come from [`BoundaryCondition`]s evaluated at the new time
//! and never take part in the stencil update.
//!
//! The scheme is stable only while `alpha * dt / dx² <= 0.5`. By default the
//! stepper accepts any configuration and an unstable run diverges silently;
//! set [`StabilityPolicy::Enforce`] on the config to reject it at
//! construction.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//!
//! use simulon_core::{FieldState, Grid, SolverConfig};
//! use simulon_solvers::transient::explicit::Stepper;
//!
//! let grid = Grid::new(1.0, 10)?;
//! let config = SolverConfig::new(0.01, 0.001, 0.01)?;
//! let initial = FieldState::uniform(10, 0.0);
//!
//! let mut stepper = Stepper::new(grid, config, initial, 1.0, 0.0)?;
//! let trace = stepper.solve(NonZeroUsize::MIN)?;
//!
//! assert_eq!(trace.len(), 11);
//! assert!(trace.iter().skip(1).all(|s| s.field[0] == 1.0));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`BoundaryCondition`]: simulon_core::BoundaryCondition
//! [`StabilityPolicy::Enforce`]: simulon_core::StabilityPolicy::Enforce

mod action;
mod error;
mod event;
mod solution;
mod stepper;


pub use action::Action;
pub use error::Error;
pub use event::Event;
pub use solution::{Solution, Status};
pub use stepper::{Phase, Stepper};
