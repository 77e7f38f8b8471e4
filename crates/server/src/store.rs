//! In-memory simulation storage.

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use simulon_core::{Grid, SolverConfig, Trace};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Identifier of a stored simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationId(Uuid);

impl SimulationId {
    /// A fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SimulationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SimulationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SimulationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Which solver produced a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Numerical,
    Learned,
}

/// A finished solve as kept by the service.
#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub method: Method,
    pub grid: Grid,
    pub config: SolverConfig,
    pub trace: Trace,
    /// Whether any recorded value is NaN or infinite.
    pub diverged: bool,
    /// Final training loss for learned simulations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_loss: Option<f64>,
}

impl Simulation {
    #[must_use]
    pub fn new(method: Method, grid: Grid, config: SolverConfig, trace: Trace) -> Self {
        let diverged = trace.iter().any(|s| !s.field.is_finite());
        Self {
            method,
            grid,
            config,
            trace,
            diverged,
            final_loss: None,
        }
    }

    #[must_use]
    pub fn with_final_loss(self, loss: f64) -> Self {
        Self {
            final_loss: Some(loss),
            ..self
        }
    }
}

/// Shared map from identifier to simulation.
///
/// Holds at most `capacity` simulations; inserting past that evicts the
/// oldest. Cloning the store clones the handle, not the contents.
#[derive(Debug, Clone)]
pub struct Store {
    inner: Arc<RwLock<Inner>>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct Inner {
    simulations: HashMap<SimulationId, Arc<Simulation>>,
    /// Insertion order, oldest first.
    order: VecDeque<SimulationId>,
}

impl Store {
    /// Creates an empty store holding at most `capacity` simulations.
    ///
    /// A capacity of zero is treated as one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stores `simulation` under a new identifier, evicting the oldest
    /// simulation if the store is full.
    pub async fn insert(&self, simulation: Simulation) -> SimulationId {
        let id = SimulationId::new();
        let mut inner = self.inner.write().await;

        while inner.order.len() >= self.capacity {
            let Some(evicted) = inner.order.pop_front() else {
                break;
            };
            inner.simulations.remove(&evicted);
            debug!(%evicted, "evicted oldest simulation");
        }

        inner.simulations.insert(id, Arc::new(simulation));
        inner.order.push_back(id);
        id
    }

    pub async fn get(&self, id: &SimulationId) -> Option<Arc<Simulation>> {
        self.inner.read().await.simulations.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.simulations.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.simulations.is_empty()
    }
}
