use std::{mem, num::NonZeroUsize};

use simulon_core::{
    BoundaryCondition, FieldState, Grid, Observer, STABILITY_LIMIT, Side, Snapshot, SolverConfig,
    StabilityPolicy, Trace,
};
use tracing::{debug, warn};

use super::{Action, Error, Event, Solution, Status};

/// Where a [`Stepper`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No advance has been taken.
    Constructed,

    /// At least one advance taken, fewer than `step_count`.
    Stepping,

    /// `step_count` or more advances taken.
    Completed,
}

/// Explicit time-marching stepper for the 1D heat equation.
///
/// Each [`advance`][Stepper::advance] applies
///
/// ```text
/// next[i] = u[i] + r * (u[i+1] - 2 u[i] + u[i-1]),   r = alpha * dt / spacing²
/// ```
///
/// to every interior point, reading only pre-step values, and then overwrites
/// both endpoints with the boundary conditions evaluated at the new time.
///
/// The stepper owns its field buffers exclusively. Everything handed out is
/// either a copy ([`field`][Stepper::field], trace snapshots) or a shared
/// borrow that ends before the next advance.
#[derive(Debug, Clone)]
pub struct Stepper {
    grid: Grid,
    config: SolverConfig,
    left: BoundaryCondition,
    right: BoundaryCondition,
    ratio: f64,
    current: Vec<f64>,
    next: Vec<f64>,
    step: usize,
}

impl Stepper {
    /// Creates a stepper positioned at step 0 with `initial` as its field.
    ///
    /// `initial` is taken verbatim; its endpoints are not forced to the
    /// boundary values.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `initial` does not have one value per
    ///   grid point.
    /// - [`Error::NumericalInstability`] if the config enforces stability and
    ///   `alpha * dt / spacing²` exceeds [`STABILITY_LIMIT`].
    pub fn new(
        grid: Grid,
        config: SolverConfig,
        initial: impl Into<FieldState>,
        left: impl Into<BoundaryCondition>,
        right: impl Into<BoundaryCondition>,
    ) -> Result<Self, Error> {
        let initial = initial.into().into_inner();
        if initial.len() != grid.point_count() {
            return Err(Error::invalid(
                "initial_field",
                format!(
                    "expected {} values, got {}",
                    grid.point_count(),
                    initial.len()
                ),
            ));
        }

        let ratio = config.diffusion_number(grid.spacing());
        if ratio > STABILITY_LIMIT || ratio.is_nan() {
            match config.stability() {
                StabilityPolicy::Enforce => {
                    return Err(Error::NumericalInstability {
                        ratio,
                        limit: STABILITY_LIMIT,
                    });
                }
                StabilityPolicy::Unchecked => {
                    warn!(ratio, limit = STABILITY_LIMIT, "explicit scheme is unstable");
                }
            }
        }
        if config.alpha() < 0.0 {
            warn!(alpha = config.alpha(), "negative diffusion coefficient");
        }

        Ok(Self {
            next: initial.clone(),
            current: initial,
            grid,
            config,
            left: left.into(),
            right: right.into(),
            ratio,
            step: 0,
        })
    }

    /// Advances the field by one time increment.
    ///
    /// Returns a read-only view of the new field.
    ///
    /// May be called past [`SolverConfig::step_count`]; no upper bound is
    /// enforced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryEvaluation`] if a boundary rule fails. The
    /// stepper is then left unchanged at its previous step.
    pub fn advance(&mut self) -> Result<&[f64], Error> {
        let time = self.config.time_at(self.step + 1);
        let left = evaluate(&self.left, Side::Left, time)?;
        let right = evaluate(&self.right, Side::Right, time)?;

        let n = self.current.len();
        let r = self.ratio;
        for (out, u) in self.next[1..n - 1]
            .iter_mut()
            .zip(self.current.windows(3))
        {
            *out = u[1] + r * (u[2] - 2.0 * u[1] + u[0]);
        }
        self.next[0] = left;
        self.next[n - 1] = right;

        mem::swap(&mut self.current, &mut self.next);
        self.step += 1;

        Ok(&self.current)
    }

    /// Overwrites the current endpoints with the boundary values at the
    /// current time.
    ///
    /// Construction keeps the initial field verbatim; call this before
    /// solving when the initial endpoints should agree with the boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryEvaluation`] if a boundary rule fails.
    pub fn impose_boundaries(&mut self) -> Result<(), Error> {
        let time = self.time();
        let left = evaluate(&self.left, Side::Left, time)?;
        let right = evaluate(&self.right, Side::Right, time)?;

        let last = self.current.len() - 1;
        self.current[0] = left;
        self.current[last] = right;
        Ok(())
    }

    /// Runs `step_count` advances and returns the recorded trace.
    ///
    /// The current state is recorded first, then every `save_every`-th new
    /// state. The trace holds `1 + step_count / save_every` snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryEvaluation`] if a boundary rule fails; the
    /// snapshots recorded so far are discarded.
    pub fn solve(&mut self, save_every: NonZeroUsize) -> Result<Trace, Error> {
        self.solve_observed(save_every, ()).map(|solution| solution.trace)
    }

    /// Runs `step_count` advances, reporting each state to `observer`.
    ///
    /// # Algorithm
    ///
    /// 1. Record the current state and emit it as the first event.
    /// 2. For each of `step_count` steps:
    ///    - Advance the field.
    ///    - If the steps taken in this run are a multiple of `save_every`,
    ///      record a copy of the new state.
    ///    - Emit an [`Event`]; stop if the observer returns
    ///      [`Action::StopEarly`].
    /// 3. Return the [`Solution`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryEvaluation`] if a boundary rule fails.
    pub fn solve_observed<Obs>(
        &mut self,
        save_every: NonZeroUsize,
        mut observer: Obs,
    ) -> Result<Solution, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        let steps = self.config.step_count();
        let stride = save_every.get();
        debug!(
            steps,
            save_every = stride,
            points = self.grid.point_count(),
            ratio = self.ratio,
            "starting explicit solve"
        );

        let mut snapshots = Vec::with_capacity(steps / stride + 1);
        snapshots.push(self.snapshot());

        let event = Event {
            step: self.step,
            time: self.time(),
            field: &self.current,
            recorded: true,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(stopped(snapshots, 0));
        }

        for taken in 1..=steps {
            self.advance()?;

            let recorded = taken % stride == 0;
            if recorded {
                snapshots.push(self.snapshot());
            }

            let event = Event {
                step: self.step,
                time: self.time(),
                field: &self.current,
                recorded,
            };
            if let Some(Action::StopEarly) = observer.observe(&event) {
                debug!(steps = taken, "explicit solve stopped by observer");
                return Ok(stopped(snapshots, taken));
            }
        }

        debug!(snapshots = snapshots.len(), "explicit solve complete");
        Ok(Solution {
            status: Status::Complete,
            trace: Trace::from(snapshots),
            steps,
        })
    }

    /// A copy of the current field.
    #[must_use]
    pub fn field(&self) -> FieldState {
        FieldState::from(self.current.as_slice())
    }

    /// A copy of the current field tagged with the current time.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.time(), self.field())
    }

    /// Number of advances taken since construction.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Simulated time of the current field.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.config.time_at(self.step)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.step == 0 {
            Phase::Constructed
        } else if self.step < self.config.step_count() {
            Phase::Stepping
        } else {
            Phase::Completed
        }
    }

    #[must_use]
    pub fn positions(&self) -> &[f64] {
        self.grid.positions()
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The diffusion number `alpha * dt / spacing²` used by the stencil.
    #[must_use]
    pub fn diffusion_number(&self) -> f64 {
        self.ratio
    }
}

fn evaluate(bc: &BoundaryCondition, side: Side, time: f64) -> Result<f64, Error> {
    bc.evaluate(time)
        .map_err(|source| Error::BoundaryEvaluation { side, time, source })
}

fn stopped(snapshots: Vec<Snapshot>, steps: usize) -> Solution {
    Solution {
        status: Status::StoppedByObserver,
        trace: Trace::from(snapshots),
        steps,
    }
}
