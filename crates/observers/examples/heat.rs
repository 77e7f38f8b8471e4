//! Interactive views of the heat-equation solvers.
//!
//! # Usage
//!
//! ```text
//! cargo run --example heat --features plot -- explicit
//! cargo run --example heat --features plot -- explicit 0.0006
//! cargo run --example heat --features plot -- learned
//! ```
//!
//! # Modes
//!
//! - **explicit [dt]** — Heat a rod from its left end with the explicit
//!   stepper and step through the snapshots. The default `dt` keeps
//!   `alpha * dt / dx²` well under 0.5; try `0.0006` to push it past the limit
//!   and watch the field oscillate until the finite guard stops the run.
//!
//! - **learned** — Train the physics-informed network on the decaying sine
//!   mode, plot its loss, then step through its sampled trace.

use std::{error::Error, num::NonZeroUsize};

use simulon_core::{AnalyticDecay, BoundaryCondition, Grid, SolverConfig};
use simulon_observers::{FiniteGuard, LossHistory, TraceViewer};
use simulon_solvers::{
    learned::{LearnedSolver, TrainingConfig, TrainingData},
    transient::explicit::Stepper,
};

fn main() -> Result<(), Box<dyn Error>> {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "explicit".into());
    match mode.as_str() {
        "explicit" => {
            let dt = std::env::args()
                .nth(2)
                .as_deref()
                .map(str::parse::<f64>)
                .transpose()
                .unwrap_or_else(|_| {
                    eprintln!("Invalid time step, expected a number, e.g. 0.0002");
                    std::process::exit(1);
                })
                .unwrap_or(0.0002);
            explicit(dt)
        }
        "learned" => learned(),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: heat [explicit [dt]|learned]");
            std::process::exit(1);
        }
    }
}

/// A rod at zero held at 1 on the left and 0 on the right.
fn explicit(dt: f64) -> Result<(), Box<dyn Error>> {
    let grid = Grid::new(1.0, 41)?;
    let config = SolverConfig::new(1.0, dt, 0.2)?;
    let mut stepper = Stepper::new(grid, config, vec![0.0; 41], 1.0, 0.0)?;
    stepper.impose_boundaries()?;
    println!("alpha * dt / dx² = {:.3}", stepper.diffusion_number());

    let mut guard = FiniteGuard::new();
    let save_every = NonZeroUsize::new(10).ok_or("save_every must be non-zero")?;
    let solution = stepper.solve_observed(save_every, &mut guard)?;
    if let Some(found) = guard.found() {
        println!(
            "stopped at t = {:.4}: u[{}] = {}",
            found.time, found.index, found.value
        );
    }

    TraceViewer::new(solution.trace, stepper.positions()).show()?;
    Ok(())
}

/// The fundamental sine mode, learned and compared against the exact decay.
fn learned() -> Result<(), Box<dyn Error>> {
    let alpha = 0.1;
    let grid = Grid::new(1.0, 21)?;
    let config = SolverConfig::new(alpha, 0.01, 1.0)?;
    let exact = AnalyticDecay::new(alpha, 1.0);
    let initial = exact.initial_field(grid.positions());
    let zero = BoundaryCondition::constant(0.0);
    let training = TrainingConfig {
        epochs: 300,
        ..TrainingConfig::default()
    };

    let data = TrainingData::from_problem(
        &grid,
        &config,
        &initial,
        &zero,
        &zero,
        training.collocation_times,
    )?;
    let mut solver = LearnedSolver::new(alpha, &training)?;
    let mut history = LossHistory::new();
    let report = solver.train_observed(&data, &training, &mut history)?;
    println!(
        "loss {:.3e} -> {:.3e} after {} epochs",
        report.initial_loss, report.final_loss, report.epochs
    );
    history.show()?;

    let times = config.snapshot_times(NonZeroUsize::new(5).ok_or("stride must be non-zero")?);
    let trace = simulon_core::sample_trace(&solver, grid.positions(), times);
    TraceViewer::new(trace, grid.positions()).show()?;
    Ok(())
}
