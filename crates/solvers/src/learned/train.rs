use super::{Network, solver::Loss};

/// Emitted after every training epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub epoch: usize,
    pub loss: Loss,
}

/// Actions an observer can request during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    StopEarly,
}

/// Whether training ran all configured epochs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Complete,
    StoppedByObserver,
}

/// Summary of one training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub status: Status,
    pub epochs: usize,
    pub initial_loss: f64,
    pub final_loss: f64,
}

/// Adam with the usual `beta1 = 0.9`, `beta2 = 0.999`.
#[derive(Debug, Clone)]
pub(crate) struct Adam {
    learning_rate: f64,
    first: Vec<f64>,
    second: Vec<f64>,
    beta1_power: f64,
    beta2_power: f64,
}

impl Adam {
    const BETA1: f64 = 0.9;
    const BETA2: f64 = 0.999;
    const EPSILON: f64 = 1e-8;

    pub(crate) fn new(param_count: usize, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            first: vec![0.0; param_count],
            second: vec![0.0; param_count],
            beta1_power: 1.0,
            beta2_power: 1.0,
        }
    }

    pub(crate) fn step<'a>(
        &mut self,
        params: impl Iterator<Item = &'a mut f64>,
        gradient: &[f64],
    ) {
        self.beta1_power *= Self::BETA1;
        self.beta2_power *= Self::BETA2;

        let moments = self.first.iter_mut().zip(self.second.iter_mut());
        for ((p, &g), (m, v)) in params.zip(gradient).zip(moments) {
            *m = Self::BETA1 * *m + (1.0 - Self::BETA1) * g;
            *v = Self::BETA2 * *v + (1.0 - Self::BETA2) * g * g;
            let m_hat = *m / (1.0 - self.beta1_power);
            let v_hat = *v / (1.0 - self.beta2_power);
            *p -= self.learning_rate * m_hat / (v_hat.sqrt() + Self::EPSILON);
        }
    }
}

/// Central-difference gradient of `objective` with respect to every network
/// parameter.
///
/// Each parameter is restored exactly after it is perturbed.
pub(crate) fn gradient(
    network: &mut Network,
    step: f64,
    objective: impl Fn(&Network) -> f64,
) -> Vec<f64> {
    let mut gradient = Vec::with_capacity(network.param_count());
    for index in 0..network.param_count() {
        let Some(original) = network.param(index) else {
            break;
        };

        network.set_param(index, original + step);
        let plus = objective(network);
        network.set_param(index, original - step);
        let minus = objective(network);
        network.set_param(index, original);

        gradient.push((plus - minus) / (2.0 * step));
    }
    gradient
}
