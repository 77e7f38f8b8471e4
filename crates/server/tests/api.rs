//! End-to-end tests of the HTTP routes.

use serde_json::{Value, json};
use simulon_core::Trace;
use simulon_server::{AppState, Limits, api::{self, SolveResponse}, routes};
use warp::{http::StatusCode, test::request};

fn heated_rod() -> Value {
    json!({
        "length": 1.0,
        "nx": 10,
        "alpha": 0.01,
        "dt": 0.001,
        "t_final": 0.01,
        "u0": vec![0.0; 10],
        "bc_left": 1.0,
        "bc_right": 0.0
    })
}

fn body(response: &warp::http::Response<warp::hyper::body::Bytes>) -> Value {
    serde_json::from_slice(response.body()).unwrap()
}

async fn solve(state: &AppState, path: &str, payload: &Value) -> SolveResponse {
    let response = request()
        .method("POST")
        .path(path)
        .json(payload)
        .reply(&routes(state.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK, "{:?}", response.body());
    serde_json::from_slice(response.body()).unwrap()
}

#[tokio::test]
async fn numerical_solve_reports_shape() {
    let state = AppState::default();

    let solved = solve(&state, "/solve/numerical", &heated_rod()).await;

    assert_eq!(solved.solution_shape, [11, 10]);
    assert_eq!(state.store.len().await, 1);
}

#[tokio::test]
async fn save_every_thins_the_trace() {
    let state = AppState::default();
    let mut payload = heated_rod();
    payload["save_every"] = json!(3);

    let solved = solve(&state, "/solve/numerical", &payload).await;

    assert_eq!(solved.solution_shape, [4, 10]);
}

#[tokio::test]
async fn stored_simulation_is_served() {
    let state = AppState::default();
    let mut payload = heated_rod();
    payload["impose_boundaries"] = json!(true);
    let solved = solve(&state, "/solve/numerical", &payload).await;

    let response = request()
        .path(&format!("/simulations/{}", solved.simulation_id))
        .reply(&routes(state))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let simulation = body(&response);
    assert_eq!(simulation["method"], "numerical");
    assert_eq!(simulation["simulation_id"], solved.simulation_id.to_string());
    assert_eq!(simulation["grid"]["positions"].as_array().unwrap().len(), 10);
    let trace = simulation["trace"].as_array().unwrap();
    assert_eq!(trace.len(), 11);
    assert_eq!(trace[0]["time"], 0.0);
    assert_eq!(trace[0]["field"][0], 1.0);
}

#[tokio::test]
async fn visualize_returns_svg() {
    let state = AppState::default();
    let solved = solve(&state, "/solve/numerical", &heated_rod()).await;

    let response = request()
        .path(&format!("/visualize/{}", solved.simulation_id))
        .reply(&routes(state))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/svg+xml");
    let svg = std::str::from_utf8(response.body()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<polyline").count(), 11);
    assert!(svg.contains("1D Heat Equation Evolution — t = 0.010"));
}

#[tokio::test]
async fn diverged_run_keeps_non_finite_values_readable() {
    let state = AppState::default();
    let mut payload = heated_rod();
    payload["alpha"] = json!(1.0);
    payload["dt"] = json!(0.1);
    payload["t_final"] = json!(200.0);
    payload["save_every"] = json!(2000);
    let solved = solve(&state, "/solve/numerical", &payload).await;
    assert_eq!(solved.solution_shape, [2, 10]);

    let response = request()
        .path(&format!("/simulations/{}", solved.simulation_id))
        .reply(&routes(state))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let simulation = body(&response);
    assert_eq!(simulation["diverged"], true);
    let last = simulation["trace"][1]["field"].as_array().unwrap();
    assert!(last.iter().all(|v| !v.is_null()));
    assert!(last[1].is_string());

    let trace: Trace = serde_json::from_value(simulation["trace"].clone()).unwrap();
    let field = &trace.last().unwrap().field;
    assert_eq!(trace.shape(), (2, 10));
    assert_eq!(field[0], 1.0);
    assert!(!field.is_finite());
}

#[tokio::test]
async fn stable_run_is_not_marked_diverged() {
    let state = AppState::default();
    let solved = solve(&state, "/solve/numerical", &heated_rod()).await;

    let stored = state.store.get(&solved.simulation_id).await.unwrap();

    assert!(!stored.diverged);
}

#[tokio::test]
async fn unknown_simulation_is_not_found() {
    let state = AppState::default();
    let id = simulon_server::SimulationId::new();

    for path in [format!("/visualize/{id}"), format!("/simulations/{id}")] {
        let response = request().path(&path).reply(&routes(state.clone())).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body(&response)["error"].as_str().unwrap().contains("not found"));
    }
}

#[tokio::test]
async fn malformed_id_is_not_found() {
    let response = request()
        .path("/visualize/not-a-uuid")
        .reply(&routes(AppState::default()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_parameters_are_bad_requests() {
    let state = AppState::default();
    let cases = [
        ("dt", json!(0.0), "dt"),
        ("nx", json!(1), "point_count"),
        ("u0", json!([0.0, 0.0]), "u0"),
        ("save_every", json!(0), "save_every"),
    ];

    for (field, value, name) in cases {
        let mut payload = heated_rod();
        payload[field] = value;
        if field == "nx" {
            payload["u0"] = json!([0.0]);
        }

        let response = request()
            .method("POST")
            .path("/solve/numerical")
            .json(&payload)
            .reply(&routes(state.clone()))
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
        let message = body(&response)["error"].as_str().unwrap().to_owned();
        assert!(message.contains(name), "{field}: {message}");
    }
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn enforced_stability_rejects_unstable_run() {
    let mut payload = heated_rod();
    payload["alpha"] = json!(10.0);
    payload["enforce_stability"] = json!(true);

    let response = request()
        .method("POST")
        .path("/solve/numerical")
        .json(&payload)
        .reply(&routes(AppState::default()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn limits_are_enforced() {
    let state = AppState::new(Limits {
        max_steps: 5,
        ..Limits::default()
    });

    let response = request()
        .method("POST")
        .path("/solve/numerical")
        .json(&heated_rod())
        .reply(&routes(state))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(&response)["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn stored_trace_size_is_limited() {
    // 11 snapshots of 10 points
    let state = AppState::new(Limits {
        max_values: 100,
        ..Limits::default()
    });

    let response = request()
        .method("POST")
        .path("/solve/numerical")
        .json(&heated_rod())
        .reply(&routes(state.clone()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(&response)["error"].as_str().unwrap().contains("`values` = 110"));
    assert!(state.store.is_empty().await);
}

#[tokio::test]
async fn oversized_network_is_rejected() {
    let mut payload = heated_rod();
    payload["hidden_layers"] = json!(1000);
    payload["hidden_width"] = json!(100_000);

    let response = request()
        .method("POST")
        .path("/solve/learned")
        .json(&payload)
        .reply(&routes(AppState::default()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(&response)["error"].as_str().unwrap().contains("`params`"));
}

#[tokio::test]
async fn store_keeps_only_newest_simulations() {
    let state = AppState::new(Limits {
        max_simulations: 2,
        ..Limits::default()
    });

    let first = solve(&state, "/solve/numerical", &heated_rod()).await;
    solve(&state, "/solve/numerical", &heated_rod()).await;
    let last = solve(&state, "/solve/numerical", &heated_rod()).await;

    assert_eq!(state.store.len().await, 2);
    for (id, expected) in [
        (first.simulation_id, StatusCode::NOT_FOUND),
        (last.simulation_id, StatusCode::OK),
    ] {
        let response = request()
            .path(&format!("/simulations/{id}"))
            .reply(&routes(state.clone()))
            .await;
        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let response = request()
        .method("POST")
        .path("/solve/numerical")
        .body("{\"length\": 1.0")
        .reply(&routes(AppState::default()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body(&response)["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn learned_solve_matches_numerical_shape() {
    let state = AppState::default();
    let mut payload = heated_rod();
    payload["save_every"] = json!(5);
    payload["hidden_layers"] = json!(1);
    payload["hidden_width"] = json!(3);
    payload["epochs"] = json!(2);
    payload["collocation_times"] = json!(2);

    let solved = solve(&state, "/solve/learned", &payload).await;

    assert_eq!(solved.solution_shape, [3, 10]);
    let stored = state.store.get(&solved.simulation_id).await.unwrap();
    assert_eq!(stored.method, simulon_server::Method::Learned);
    assert!(stored.final_loss.is_some());
}

#[test]
fn request_types_are_public() {
    let request: api::NumericalRequest = serde_json::from_value(heated_rod()).unwrap();
    assert!(!request.enforce_stability);
    assert_eq!(request.problem.save_every, 1);
}
