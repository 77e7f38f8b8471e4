use std::convert::Infallible;

use serde::Serialize;
use simulon_core::{StabilityPolicy, Trace};
use simulon_observers::{RenderConfig, render_svg};
use simulon_solvers::{learned, transient::explicit};
use tokio::task;
use tracing::{info, warn};
use warp::{
    Filter, Reply,
    reply::{self, Response},
};

use crate::{
    api::{LearnedRequest, NumericalRequest, SolveResponse},
    config::Limits,
    error::{self, ApiError},
    store::{Method, Simulation, SimulationId, Store},
};

/// Largest accepted request body, in bytes.
const BODY_LIMIT: u64 = 16 * 1024 * 1024;

/// Everything the handlers share.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Store,
    pub limits: Limits,
    pub render: RenderConfig,
}

impl AppState {
    /// State with an empty store sized by `limits.max_simulations`.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            store: Store::new(limits.max_simulations),
            limits,
            render: RenderConfig::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

/// All service routes:
///
/// - `POST /solve/numerical` — run the explicit stepper
/// - `POST /solve/learned` — train and sample the learned solver
/// - `GET /simulations/{id}` — a stored simulation as JSON
/// - `GET /visualize/{id}` — a stored simulation as an animated SVG
///
/// Every failure is answered with a JSON `{"error": ...}` body.
pub fn routes(
    state: AppState,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let numerical = warp::path!("solve" / "numerical")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(solve_numerical);

    let learned = warp::path!("solve" / "learned")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(solve_learned);

    let simulation = warp::path!("simulations" / SimulationId)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(get_simulation);

    let visualize = warp::path!("visualize" / SimulationId)
        .and(warp::get())
        .and(with_state(state))
        .and_then(visualize);

    numerical
        .or(learned)
        .unify()
        .or(simulation)
        .unify()
        .or(visualize)
        .unify()
        .recover(error::recover)
        .unify()
        .with(warp::trace::request())
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn respond(result: Result<Response, ApiError>) -> Result<Response, Infallible> {
    Ok(result.unwrap_or_else(ApiError::into_response))
}

async fn solve_numerical(
    request: NumericalRequest,
    state: AppState,
) -> Result<Response, Infallible> {
    respond(run_numerical(request, &state).await)
}

async fn run_numerical(request: NumericalRequest, state: &AppState) -> Result<Response, ApiError> {
    let setup = request.problem.setup(&state.limits)?;
    let stability = if request.enforce_stability {
        StabilityPolicy::Enforce
    } else {
        StabilityPolicy::Unchecked
    };
    let config = setup.config.with_stability(stability);
    let grid = setup.grid.clone();
    let impose = request.impose_boundaries;

    let trace = task::spawn_blocking(move || -> Result<Trace, explicit::Error> {
        let mut stepper =
            explicit::Stepper::new(setup.grid, config, setup.initial, setup.left, setup.right)?;
        if impose {
            stepper.impose_boundaries()?;
        }
        stepper.solve(setup.save_every)
    })
    .await??;

    let simulation = Simulation::new(Method::Numerical, grid, config, trace);
    Ok(store(state, simulation).await)
}

async fn solve_learned(request: LearnedRequest, state: AppState) -> Result<Response, Infallible> {
    respond(run_learned(request, &state).await)
}

async fn run_learned(request: LearnedRequest, state: &AppState) -> Result<Response, ApiError> {
    let setup = request.problem.setup(&state.limits)?;
    let training = request.training(&state.limits)?;
    let grid = setup.grid.clone();
    let config = setup.config;

    let run = task::spawn_blocking(move || {
        learned::solve(
            &setup.grid,
            &setup.config,
            &setup.initial,
            &setup.left,
            &setup.right,
            setup.save_every,
            &training,
        )
    })
    .await??;

    let simulation = Simulation::new(Method::Learned, grid, config, run.trace)
        .with_final_loss(run.report.final_loss);
    Ok(store(state, simulation).await)
}

async fn store(state: &AppState, simulation: Simulation) -> Response {
    let (snapshots, points) = simulation.trace.shape();
    let method = simulation.method;
    let diverged = simulation.diverged;
    let id = state.store.insert(simulation).await;
    if diverged {
        warn!(%id, ?method, "stored simulation holds non-finite values");
    }
    info!(%id, ?method, snapshots, points, "stored simulation");

    reply::json(&SolveResponse {
        simulation_id: id,
        solution_shape: [snapshots, points],
    })
    .into_response()
}

#[derive(Serialize)]
struct SimulationView<'a> {
    simulation_id: SimulationId,
    #[serde(flatten)]
    simulation: &'a Simulation,
}

async fn get_simulation(id: SimulationId, state: AppState) -> Result<Response, Infallible> {
    let result = match state.store.get(&id).await {
        Some(simulation) => Ok(reply::json(&SimulationView {
            simulation_id: id,
            simulation: &simulation,
        })
        .into_response()),
        None => Err(ApiError::NotFound(id)),
    };
    respond(result)
}

async fn visualize(id: SimulationId, state: AppState) -> Result<Response, Infallible> {
    respond(render(id, &state).await)
}

async fn render(id: SimulationId, state: &AppState) -> Result<Response, ApiError> {
    let simulation = state.store.get(&id).await.ok_or(ApiError::NotFound(id))?;
    let config = state.render;

    let svg = task::spawn_blocking(move || {
        render_svg(&simulation.trace, simulation.grid.positions(), &config)
    })
    .await??;

    Ok(reply::with_header(svg, "content-type", "image/svg+xml").into_response())
}
