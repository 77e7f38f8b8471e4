//! Request and response bodies.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use simulon_core::{BoundaryCondition, FieldState, Grid, SolverConfig};
use simulon_solvers::learned::{self, TrainingConfig};

use crate::{config::Limits, error::ApiError, store::SimulationId};

/// The problem shared by every solve request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Rod length.
    pub length: f64,
    /// Number of grid points.
    pub nx: usize,
    pub alpha: f64,
    pub dt: f64,
    pub t_final: f64,
    /// Initial field, one value per grid point.
    pub u0: Vec<f64>,
    pub bc_left: f64,
    pub bc_right: f64,
    #[serde(default = "default_save_every")]
    pub save_every: usize,
}

fn default_save_every() -> usize {
    1
}

/// Body of `POST /solve/numerical`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericalRequest {
    #[serde(flatten)]
    pub problem: Problem,
    /// Reject configurations past the stability limit instead of running them.
    #[serde(default)]
    pub enforce_stability: bool,
    /// Set the initial endpoints to the boundary values before solving.
    #[serde(default)]
    pub impose_boundaries: bool,
}

/// Body of `POST /solve/learned`.
///
/// Training knobs left out fall back to [`TrainingConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedRequest {
    #[serde(flatten)]
    pub problem: Problem,
    pub hidden_layers: Option<usize>,
    pub hidden_width: Option<usize>,
    pub epochs: Option<usize>,
    pub learning_rate: Option<f64>,
    pub collocation_times: Option<usize>,
    pub seed: Option<u64>,
}

/// Body returned by both solve endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub simulation_id: SimulationId,
    /// `[snapshots, points]`
    pub solution_shape: [usize; 2],
}

/// A validated problem ready to hand to a solver.
#[derive(Debug, Clone)]
pub(crate) struct Setup {
    pub grid: Grid,
    pub config: SolverConfig,
    pub initial: FieldState,
    pub left: BoundaryCondition,
    pub right: BoundaryCondition,
    pub save_every: NonZeroUsize,
}

impl Problem {
    /// Validates the problem against the solver rules and service limits.
    pub(crate) fn setup(&self, limits: &Limits) -> Result<Setup, ApiError> {
        if self.nx > limits.max_points {
            return Err(ApiError::LimitExceeded {
                name: "nx",
                value: self.nx,
                limit: limits.max_points,
            });
        }
        let grid = Grid::new(self.length, self.nx)?;
        let config = SolverConfig::new(self.alpha, self.dt, self.t_final)?;

        let steps = config.step_count();
        if steps > limits.max_steps {
            return Err(ApiError::LimitExceeded {
                name: "steps",
                value: steps,
                limit: limits.max_steps,
            });
        }
        let save_every = NonZeroUsize::new(self.save_every)
            .ok_or_else(|| ApiError::invalid("save_every", "must be at least 1"))?;
        let values = (1 + steps / save_every)
            .checked_mul(self.nx)
            .unwrap_or(usize::MAX);
        if values > limits.max_values {
            return Err(ApiError::LimitExceeded {
                name: "values",
                value: values,
                limit: limits.max_values,
            });
        }
        if self.u0.len() != self.nx {
            return Err(ApiError::invalid(
                "u0",
                format!("expected {} values, got {}", self.nx, self.u0.len()),
            ));
        }

        Ok(Setup {
            grid,
            config,
            initial: FieldState::from(self.u0.as_slice()),
            left: self.bc_left.into(),
            right: self.bc_right.into(),
            save_every,
        })
    }
}

impl LearnedRequest {
    /// Training configuration with this request's overrides applied.
    pub(crate) fn training(&self, limits: &Limits) -> Result<TrainingConfig, ApiError> {
        let defaults = TrainingConfig::default();
        let config = TrainingConfig {
            hidden_layers: self.hidden_layers.unwrap_or(defaults.hidden_layers),
            hidden_width: self.hidden_width.unwrap_or(defaults.hidden_width),
            epochs: self.epochs.unwrap_or(defaults.epochs),
            learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
            collocation_times: self.collocation_times.unwrap_or(defaults.collocation_times),
            seed: self.seed.unwrap_or(defaults.seed),
            ..defaults
        };

        config.validate().map_err(learned::Error::from)?;

        if config.epochs > limits.max_epochs {
            return Err(ApiError::LimitExceeded {
                name: "epochs",
                value: config.epochs,
                limit: limits.max_epochs,
            });
        }
        let params = config.param_count().unwrap_or(usize::MAX);
        if params > limits.max_params {
            return Err(ApiError::LimitExceeded {
                name: "params",
                value: params,
                limit: limits.max_params,
            });
        }
        if config.collocation_times > limits.max_collocation_times {
            return Err(ApiError::LimitExceeded {
                name: "collocation_times",
                value: config.collocation_times,
                limit: limits.max_collocation_times,
            });
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn problem() -> Problem {
        serde_json::from_value(json!({
            "length": 1.0,
            "nx": 4,
            "alpha": 0.01,
            "dt": 0.001,
            "t_final": 0.01,
            "u0": [0.0, 0.0, 0.0, 0.0],
            "bc_left": 1.0,
            "bc_right": 0.0
        }))
        .unwrap()
    }

    #[test]
    fn save_every_defaults_to_one() {
        assert_eq!(problem().save_every, 1);
    }

    #[test]
    fn setup_builds_solver_inputs() {
        let setup = problem().setup(&Limits::default()).unwrap();

        assert_eq!(setup.grid.point_count(), 4);
        assert_eq!(setup.config.step_count(), 10);
        assert_eq!(setup.left.as_constant(), Some(1.0));
        assert_eq!(setup.save_every.get(), 1);
    }

    #[test]
    fn setup_enforces_limits() {
        let limits = Limits {
            max_points: 3,
            ..Limits::default()
        };
        let err = problem().setup(&limits).unwrap_err();
        assert!(matches!(err, ApiError::LimitExceeded { name: "nx", .. }));

        let limits = Limits {
            max_steps: 5,
            ..Limits::default()
        };
        let err = problem().setup(&limits).unwrap_err();
        assert!(matches!(
            err,
            ApiError::LimitExceeded {
                name: "steps",
                value: 10,
                limit: 5
            }
        ));
    }

    #[test]
    fn setup_bounds_stored_trace_size() {
        // 11 snapshots of 4 points
        let limits = Limits {
            max_values: 40,
            ..Limits::default()
        };
        let err = problem().setup(&limits).unwrap_err();
        assert!(matches!(
            err,
            ApiError::LimitExceeded {
                name: "values",
                value: 44,
                limit: 40
            }
        ));

        // A coarser stride fits: 6 snapshots of 4 points.
        let mut thinned = problem();
        thinned.save_every = 2;
        assert!(thinned.setup(&limits).is_ok());
    }

    #[test]
    fn huge_grid_with_long_horizon_is_rejected() {
        let huge = Problem {
            nx: 10_000,
            dt: 1.0,
            t_final: 1e6,
            u0: vec![0.0; 10_000],
            ..problem()
        };

        let err = huge.setup(&Limits::default()).unwrap_err();

        assert!(matches!(err, ApiError::LimitExceeded { name: "values", .. }));
    }

    #[test]
    fn setup_rejects_bad_values() {
        let mut bad = problem();
        bad.u0.pop();
        assert!(matches!(
            bad.setup(&Limits::default()).unwrap_err(),
            ApiError::InvalidParameter { name: "u0", .. }
        ));

        let mut bad = problem();
        bad.dt = 0.0;
        assert!(matches!(
            bad.setup(&Limits::default()).unwrap_err(),
            ApiError::InvalidParameter { name: "dt", .. }
        ));

        let mut bad = problem();
        bad.save_every = 0;
        assert!(matches!(
            bad.setup(&Limits::default()).unwrap_err(),
            ApiError::InvalidParameter {
                name: "save_every",
                ..
            }
        ));
    }

    #[test]
    fn learned_overrides_apply() {
        let request: LearnedRequest = serde_json::from_value(json!({
            "length": 1.0,
            "nx": 4,
            "alpha": 0.01,
            "dt": 0.001,
            "t_final": 0.01,
            "u0": [0.0, 0.0, 0.0, 0.0],
            "bc_left": 1.0,
            "bc_right": 0.0,
            "epochs": 12,
            "seed": 3
        }))
        .unwrap();

        let config = request.training(&Limits::default()).unwrap();

        assert_eq!(config.epochs, 12);
        assert_eq!(config.seed, 3);
        assert_eq!(config.hidden_width, TrainingConfig::default().hidden_width);

        let limits = Limits {
            max_epochs: 10,
            ..Limits::default()
        };
        assert!(matches!(
            request.training(&limits).unwrap_err(),
            ApiError::LimitExceeded { name: "epochs", .. }
        ));
    }

    fn learned_request(overrides: serde_json::Value) -> LearnedRequest {
        let mut body = serde_json::to_value(problem()).unwrap();
        for (key, value) in overrides.as_object().unwrap() {
            body[key] = value.clone();
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn learned_network_size_is_bounded() {
        let request = learned_request(json!({
            "hidden_layers": 1000,
            "hidden_width": 100_000
        }));
        assert!(matches!(
            request.training(&Limits::default()).unwrap_err(),
            ApiError::LimitExceeded { name: "params", .. }
        ));

        // 2 x 8 hidden neurons hold 105 parameters.
        let limits = Limits {
            max_params: 104,
            ..Limits::default()
        };
        let request = learned_request(json!({}));
        assert!(matches!(
            request.training(&limits).unwrap_err(),
            ApiError::LimitExceeded {
                name: "params",
                value: 105,
                limit: 104
            }
        ));
    }

    #[test]
    fn learned_collocation_times_are_bounded() {
        let request = learned_request(json!({ "collocation_times": 1_000_000_000 }));

        assert!(matches!(
            request.training(&Limits::default()).unwrap_err(),
            ApiError::LimitExceeded {
                name: "collocation_times",
                ..
            }
        ));
    }

    #[test]
    fn learned_invalid_training_is_rejected_before_limits() {
        let request = learned_request(json!({ "hidden_layers": 0 }));

        let err = request.training(&Limits::default()).unwrap_err();

        assert!(matches!(err, ApiError::Learned(learned::Error::Config(_))));
        assert_eq!(err.status(), warp::http::StatusCode::BAD_REQUEST);
    }
}
