use thiserror::Error;

/// Configuration for building and training a [`LearnedSolver`].
///
/// [`LearnedSolver`]: super::LearnedSolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Number of `tanh` hidden layers.
    pub hidden_layers: usize,
    /// Neurons per hidden layer.
    pub hidden_width: usize,
    pub epochs: usize,
    /// Adam step size.
    pub learning_rate: f64,
    /// Number of collocation times in `(0, t_final)`.
    pub collocation_times: usize,
    /// Perturbation used for central-difference parameter gradients.
    pub fd_step: f64,
    /// Seed for weight initialization.
    pub seed: u64,
    /// Log the loss every `log_every` epochs; `0` disables progress logs.
    pub log_every: usize,
}

/// Errors that can occur when validating a [`TrainingConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("hidden_layers must be at least 1")]
    HiddenLayers,

    #[error("hidden_width must be at least 1")]
    HiddenWidth,

    #[error("learning_rate must be finite and positive")]
    LearningRate,

    #[error("collocation_times must be at least 1")]
    CollocationTimes,

    #[error("fd_step must be finite and positive")]
    FdStep,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            hidden_layers: 2,
            hidden_width: 8,
            epochs: 200,
            learning_rate: 1e-2,
            collocation_times: 8,
            fd_step: 1e-6,
            seed: 0,
            log_every: 50,
        }
    }
}

impl TrainingConfig {
    /// Validates sizes, step size and gradient perturbation.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hidden_layers == 0 {
            return Err(ConfigError::HiddenLayers);
        }
        if self.hidden_width == 0 {
            return Err(ConfigError::HiddenWidth);
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::LearningRate);
        }
        if self.collocation_times == 0 {
            return Err(ConfigError::CollocationTimes);
        }
        if !self.fd_step.is_finite() || self.fd_step <= 0.0 {
            return Err(ConfigError::FdStep);
        }
        Ok(())
    }

    /// Number of weights and biases a network built from this config holds.
    ///
    /// Returns `None` if `hidden_layers` is zero or the count overflows.
    #[must_use]
    pub fn param_count(&self) -> Option<usize> {
        let width = self.hidden_width;
        // 2 -> width, (hidden_layers - 1) x (width -> width), width -> 1
        let input = width.checked_mul(3)?;
        let hidden = width
            .checked_mul(width)?
            .checked_add(width)?
            .checked_mul(self.hidden_layers.checked_sub(1)?)?;
        input.checked_add(hidden)?.checked_add(width)?.checked_add(1)
    }
}
