use rand::{SeedableRng, rngs::StdRng};
use simulon_core::{FieldModel, Observer};
use tracing::{debug, info};

use super::{
    Action, Error, Event, Network, Status, TrainingConfig, TrainingData, TrainingReport,
    train::{self, Adam},
};

/// Mean-squared loss terms of a learned solver against its training data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loss {
    /// PDE residual `u_t - alpha * u_xx` at the collocation points.
    pub residual: f64,
    pub initial: f64,
    pub boundary: f64,
}

impl Loss {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.residual + self.initial + self.boundary
    }
}

/// A physics-informed network approximating `u(x, t)` for the heat equation.
///
/// The network is fitted so that the PDE residual, the initial field and the
/// boundary values are all matched in the least-squares sense. Once trained,
/// it answers [`FieldModel::evaluate`] at any `(x, t)`, so it can be sampled on
/// the stepper's grid to produce a comparable trace.
#[derive(Debug, Clone)]
pub struct LearnedSolver {
    network: Network,
    alpha: f64,
}

impl LearnedSolver {
    /// Creates an untrained solver for diffusion coefficient `alpha`.
    ///
    /// Weights are drawn from a generator seeded with `config.seed`, so equal
    /// configs give equal solvers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `config` is invalid.
    pub fn new(alpha: f64, config: &TrainingConfig) -> Result<Self, Error> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let network = Network::new(config.hidden_layers, config.hidden_width, &mut rng);
        Ok(Self { network, alpha })
    }

    /// Trains for `config.epochs` epochs.
    ///
    /// # Errors
    ///
    /// See [`train_observed`][Self::train_observed].
    pub fn train(
        &mut self,
        data: &TrainingData,
        config: &TrainingConfig,
    ) -> Result<TrainingReport, Error> {
        self.train_observed(data, config, ())
    }

    /// Trains for up to `config.epochs` epochs, reporting each epoch's loss.
    ///
    /// Each epoch estimates the loss gradient by central differences over the
    /// network parameters and takes one Adam step.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `config` is invalid.
    /// - [`Error::NonFiniteLoss`] if the loss becomes NaN or infinite.
    pub fn train_observed<Obs>(
        &mut self,
        data: &TrainingData,
        config: &TrainingConfig,
        mut observer: Obs,
    ) -> Result<TrainingReport, Error>
    where
        Obs: Observer<Event, Action>,
    {
        config.validate()?;

        let alpha = self.alpha;
        let initial_loss = self.loss(data).total();
        if !initial_loss.is_finite() {
            return Err(Error::NonFiniteLoss { epoch: 0 });
        }
        debug!(
            params = self.network.param_count(),
            epochs = config.epochs,
            initial_loss,
            "starting training"
        );

        let mut adam = Adam::new(self.network.param_count(), config.learning_rate);
        let mut final_loss = initial_loss;

        for epoch in 1..=config.epochs {
            let gradient = train::gradient(&mut self.network, config.fd_step, |network| {
                loss(network, alpha, data).total()
            });
            adam.step(self.network.params_mut(), &gradient);

            let terms = self.loss(data);
            final_loss = terms.total();
            if !final_loss.is_finite() {
                return Err(Error::NonFiniteLoss { epoch });
            }
            if config.log_every > 0 && epoch % config.log_every == 0 {
                info!(epoch, loss = final_loss, "training");
            }

            if let Some(Action::StopEarly) = observer.observe(&Event { epoch, loss: terms }) {
                debug!(epoch, "training stopped by observer");
                return Ok(TrainingReport {
                    status: Status::StoppedByObserver,
                    epochs: epoch,
                    initial_loss,
                    final_loss,
                });
            }
        }

        Ok(TrainingReport {
            status: Status::Complete,
            epochs: config.epochs,
            initial_loss,
            final_loss,
        })
    }

    /// Current loss terms against `data`.
    #[must_use]
    pub fn loss(&self, data: &TrainingData) -> Loss {
        loss(&self.network, self.alpha, data)
    }

    /// Evaluates the network at each `(x, t)` point.
    #[must_use]
    pub fn predict(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points
            .iter()
            .map(|&(x, t)| self.network.value(x, t))
            .collect()
    }

    /// The PDE residual `u_t - alpha * u_xx` at `(x, t)`.
    #[must_use]
    pub fn residual(&self, x: f64, t: f64) -> f64 {
        let jet = self.network.jet(x, t);
        jet.dt - self.alpha * jet.dxx
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn network(&self) -> &Network {
        &self.network
    }
}

impl FieldModel for LearnedSolver {
    fn evaluate(&self, position: f64, time: f64) -> f64 {
        self.network.value(position, time)
    }
}

fn loss(network: &Network, alpha: f64, data: &TrainingData) -> Loss {
    let residual = mean(data.collocation.iter().map(|&(x, t)| {
        let jet = network.jet(x, t);
        jet.dt - alpha * jet.dxx
    }));
    let initial = mean(data.initial.iter().map(|s| network.value(s.x, s.t) - s.u));
    let boundary = mean(data.boundary.iter().map(|s| network.value(s.x, s.t) - s.u));

    Loss {
        residual,
        initial,
        boundary,
    }
}

/// Mean of squares; zero for no terms.
fn mean(errors: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = errors.fold((0.0, 0_u32), |(sum, count), e| (sum + e * e, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}
