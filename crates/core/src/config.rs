use std::num::NonZeroUsize;

use thiserror::Error;

/// Largest diffusion number `alpha * dt / spacing²` for which the explicit
/// central-difference scheme is stable.
pub const STABILITY_LIMIT: f64 = 0.5;

/// Whether a solver should reject configurations beyond [`STABILITY_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum StabilityPolicy {
    /// Accept any diffusion number; an unstable run diverges silently.
    #[default]
    Unchecked,

    /// Fail at construction when the diffusion number exceeds the limit.
    Enforce,
}

/// Time-marching configuration for a diffusion solve.
///
/// `alpha` is the diffusion coefficient and is accepted as given. A negative
/// value models anti-diffusion, which the explicit scheme cannot integrate
/// stably.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SolverConfig {
    alpha: f64,
    dt: f64,
    t_final: f64,
    stability: StabilityPolicy,
}

/// Errors that can occur when validating a [`SolverConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("dt must be finite and positive, got {0}")]
    Dt(f64),

    #[error("t_final must be finite and non-negative, got {0}")]
    TFinal(f64),
}

impl ConfigError {
    /// Name of the offending parameter.
    #[must_use]
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::Dt(_) => "dt",
            Self::TFinal(_) => "t_final",
        }
    }
}

impl SolverConfig {
    /// Creates a config with [`StabilityPolicy::Unchecked`].
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive, or if `t_final`
    /// is not finite and non-negative.
    pub fn new(alpha: f64, dt: f64, t_final: f64) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::Dt(dt));
        }
        if !t_final.is_finite() || t_final < 0.0 {
            return Err(ConfigError::TFinal(t_final));
        }

        Ok(Self {
            alpha,
            dt,
            t_final,
            stability: StabilityPolicy::Unchecked,
        })
    }

    /// Sets the stability policy.
    #[must_use]
    pub fn with_stability(mut self, stability: StabilityPolicy) -> Self {
        self.stability = stability;
        self
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[must_use]
    pub fn t_final(&self) -> f64 {
        self.t_final
    }

    #[must_use]
    pub fn stability(&self) -> StabilityPolicy {
        self.stability
    }

    /// Number of steps a full solve takes: `floor(t_final / dt)`.
    #[must_use]
    pub fn step_count(&self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (self.t_final / self.dt).floor() as usize;
        steps
    }

    /// Simulated time after `step` steps.
    #[must_use]
    pub fn time_at(&self, step: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let step = step as f64;
        step * self.dt
    }

    /// The diffusion number `alpha * dt / spacing²` on a grid with `spacing`.
    #[must_use]
    pub fn diffusion_number(&self, spacing: f64) -> f64 {
        self.alpha * self.dt / (spacing * spacing)
    }

    /// Times of the snapshots a full solve records when sampling every
    /// `save_every` steps, starting with the initial time.
    pub fn snapshot_times(&self, save_every: NonZeroUsize) -> impl Iterator<Item = f64> + '_ {
        let stride = save_every.get();
        (0..=self.step_count() / stride).map(move |k| self.time_at(k * stride))
    }
}
