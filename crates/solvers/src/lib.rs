//! Solvers for the one-dimensional heat equation `du/dt = alpha * d²u/dx²`.
//!
//! - [`transient::explicit`] — the forward-Euler, central-difference
//!   time-marching [`Stepper`][transient::explicit::Stepper]
//! - [`learned`] — a physics-informed network trained against the same
//!   equation, initial data and boundary data
//!
//! Both produce a [`Trace`][simulon_core::Trace] of the same shape, so callers
//! can swap one for the other.

pub mod learned;
pub mod transient;
