use simulon_core::{BoundaryCondition, FieldState, Grid, Side, SolverConfig};

use super::Error;

/// A target value at one `(x, t)` point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub t: f64,
    pub u: f64,
}

/// Points the learned solver is fitted against.
///
/// - `collocation` — interior `(x, t)` points where the PDE residual is
///   penalized
/// - `initial` — the initial field at `t = 0`
/// - `boundary` — both endpoint values at every collocation time
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingData {
    pub collocation: Vec<(f64, f64)>,
    pub initial: Vec<Sample>,
    pub boundary: Vec<Sample>,
}

impl TrainingData {
    /// Builds training points for the problem the explicit stepper would solve.
    ///
    /// Collocation times are the midpoints of `times` equal slices of
    /// `[0, t_final]`. Boundary rules are evaluated at those times.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `initial` does not match the grid or
    ///   `times` is zero.
    /// - [`Error::BoundaryEvaluation`] if a boundary rule fails.
    pub fn from_problem(
        grid: &Grid,
        config: &SolverConfig,
        initial: &FieldState,
        left: &BoundaryCondition,
        right: &BoundaryCondition,
        times: usize,
    ) -> Result<Self, Error> {
        if initial.len() != grid.point_count() {
            return Err(Error::InvalidParameter {
                name: "initial_field",
                reason: format!(
                    "expected {} values, got {}",
                    grid.point_count(),
                    initial.len()
                ),
            });
        }
        if times == 0 {
            return Err(Error::InvalidParameter {
                name: "collocation_times",
                reason: "must be at least 1".into(),
            });
        }

        #[allow(clippy::cast_precision_loss)]
        let times: Vec<f64> = (0..times)
            .map(|k| (k as f64 + 0.5) / times as f64 * config.t_final())
            .collect();

        let positions = grid.positions();
        let interior = &positions[1..positions.len() - 1];
        let collocation = times
            .iter()
            .flat_map(|&t| interior.iter().map(move |&x| (x, t)))
            .collect();

        let initial = positions
            .iter()
            .zip(initial.iter())
            .map(|(&x, &u)| Sample { x, t: 0.0, u })
            .collect();

        let mut boundary = Vec::with_capacity(2 * times.len());
        for &t in &times {
            for (side, bc, x) in [
                (Side::Left, left, 0.0),
                (Side::Right, right, grid.length()),
            ] {
                let u = bc
                    .evaluate(t)
                    .map_err(|source| Error::BoundaryEvaluation { side, time: t, source })?;
                boundary.push(Sample { x, t, u });
            }
        }

        Ok(Self {
            collocation,
            initial,
            boundary,
        })
    }
}
