//! Observers and rendering for the Simulon solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across the explicit stepper and learned-solver training, plus trace
//! rendering.
//!
//! # Modules
//!
//! - [`traits`] — Capability traits for cross-solver observers
//!   ([`HasField`], [`HasLoss`], [`CanStopEarly`])
//! - [`render`] — Frame sequences and animated SVG output
//! - [`training`] — Loss recording and target-based early stopping
//!
//! # Features
//!
//! - `plot` — Enables [`TraceViewer`] and [`LossHistory::show`] for
//!   interactive viewing via egui. This feature adds dependencies on `eframe`
//!   and `egui_plot`.
//!
//! [`Observer`]: simulon_core::Observer
//! [`HasField`]: traits::HasField
//! [`HasLoss`]: traits::HasLoss
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`LossHistory::show`]: training::LossHistory

mod guard;
pub mod render;
pub mod traits;
pub mod training;

#[cfg(feature = "plot")]
mod plot;

pub use guard::{FiniteGuard, NonFinite};
pub use render::{RenderConfig, RenderError, render_svg};
pub use training::{LossHistory, LossTarget};

#[cfg(feature = "plot")]
pub use plot::TraceViewer;
