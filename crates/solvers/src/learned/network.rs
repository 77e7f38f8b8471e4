use ndarray::{Array1, Array2, array};
use rand::Rng;

/// Value and derivatives of a network output at one `(x, t)` point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jet {
    pub value: f64,
    /// `du/dx`
    pub dx: f64,
    /// `d²u/dx²`
    pub dxx: f64,
    /// `du/dt`
    pub dt: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    /// `(outputs, inputs)`
    weights: Array2<f64>,
    biases: Array1<f64>,
}

/// A fully connected network `(x, t) -> u` with `tanh` hidden layers and a
/// linear output.
///
/// [`jet`][Network::jet] propagates first and second spatial derivatives and
/// the first time derivative alongside the value (forward mode), so the PDE
/// residual needs no finite differencing in `x` or `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
}

impl Network {
    /// Creates a network with Xavier-uniform weights and zero biases.
    pub fn new(hidden_layers: usize, hidden_width: usize, rng: &mut impl Rng) -> Self {
        let mut sizes = vec![2];
        sizes.extend(std::iter::repeat_n(hidden_width, hidden_layers));
        sizes.push(1);

        let layers = sizes
            .windows(2)
            .map(|pair| {
                let (inputs, outputs) = (pair[0], pair[1]);
                #[allow(clippy::cast_precision_loss)]
                let limit = (6.0 / (inputs + outputs) as f64).sqrt();
                Layer {
                    weights: Array2::from_shape_fn((outputs, inputs), |_| {
                        rng.gen_range(-limit..limit)
                    }),
                    biases: Array1::zeros(outputs),
                }
            })
            .collect();

        Self { layers }
    }

    /// Total number of trainable parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }

    /// Parameters in layer order, weights before biases.
    #[must_use]
    pub fn params(&self) -> Vec<f64> {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(l.biases.iter()))
            .copied()
            .collect()
    }

    pub(crate) fn params_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.layers
            .iter_mut()
            .flat_map(|l| l.weights.iter_mut().chain(l.biases.iter_mut()))
    }

    pub(crate) fn param(&self, index: usize) -> Option<f64> {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(l.biases.iter()))
            .nth(index)
            .copied()
    }

    pub(crate) fn set_param(&mut self, index: usize, value: f64) {
        if let Some(p) = self.params_mut().nth(index) {
            *p = value;
        }
    }

    /// Evaluates the network output.
    #[must_use]
    pub fn value(&self, x: f64, t: f64) -> f64 {
        let last = self.layers.len() - 1;
        let mut a = array![x, t];
        for (index, layer) in self.layers.iter().enumerate() {
            let z = layer.weights.dot(&a) + &layer.biases;
            a = if index == last { z } else { z.mapv(f64::tanh) };
        }
        a[0]
    }

    /// Evaluates the output with its `x`, `xx` and `t` derivatives.
    #[must_use]
    pub fn jet(&self, x: f64, t: f64) -> Jet {
        let last = self.layers.len() - 1;
        let mut a = array![x, t];
        let mut a_x = array![1.0, 0.0];
        let mut a_xx = array![0.0, 0.0];
        let mut a_t = array![0.0, 1.0];

        for (index, layer) in self.layers.iter().enumerate() {
            let w = &layer.weights;
            let z = w.dot(&a) + &layer.biases;
            let z_x = w.dot(&a_x);
            let z_xx = w.dot(&a_xx);
            let z_t = w.dot(&a_t);

            if index == last {
                (a, a_x, a_xx, a_t) = (z, z_x, z_xx, z_t);
            } else {
                // h = tanh(z), h' = (1 - h²) z', h'' = (1 - h²) z'' - 2 h (1 - h²) z'²
                let h = z.mapv(f64::tanh);
                let s = h.mapv(|v| 1.0 - v * v);
                a_xx = &s * &z_xx - 2.0 * &h * &s * &z_x * &z_x;
                a_x = &s * &z_x;
                a_t = &s * &z_t;
                a = h;
            }
        }

        Jet {
            value: a[0],
            dx: a_x[0],
            dxx: a_xx[0],
            dt: a_t[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn network() -> Network {
        Network::new(2, 5, &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn counts_parameters() {
        // 2->5, 5->5, 5->1
        assert_eq!(network().param_count(), (10 + 5) + (25 + 5) + (5 + 1));
        assert_eq!(network().params().len(), network().param_count());
    }

    #[test]
    fn same_seed_same_weights() {
        assert_eq!(network(), network());
        assert_ne!(network(), Network::new(2, 5, &mut StdRng::seed_from_u64(8)));
    }

    #[test]
    fn jet_value_matches_plain_evaluation() {
        let net = network();
        assert_relative_eq!(net.jet(0.3, 0.7).value, net.value(0.3, 0.7), epsilon = 1e-14);
    }

    #[test]
    fn jet_derivatives_match_finite_differences() {
        let net = network();
        let (x, t, h) = (0.4, 0.2, 1e-4);

        let jet = net.jet(x, t);
        let u = net.value(x, t);
        let dx = (net.value(x + h, t) - net.value(x - h, t)) / (2.0 * h);
        let dxx = (net.value(x + h, t) - 2.0 * u + net.value(x - h, t)) / (h * h);
        let dt = (net.value(x, t + h) - net.value(x, t - h)) / (2.0 * h);

        assert_relative_eq!(jet.dx, dx, epsilon = 1e-6);
        assert_relative_eq!(jet.dxx, dxx, epsilon = 1e-4);
        assert_relative_eq!(jet.dt, dt, epsilon = 1e-6);
    }

    #[test]
    fn set_param_round_trips() {
        let mut net = network();
        let index = net.param_count() - 1;

        net.set_param(index, 3.25);

        assert_eq!(net.param(index), Some(3.25));
        assert_eq!(net.params()[index], 3.25);
        assert_eq!(net.param(net.param_count()), None);
    }
}
