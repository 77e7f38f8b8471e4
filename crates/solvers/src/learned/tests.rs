use std::num::NonZeroUsize;

use simulon_core::{BoundaryCondition, FieldModel, FieldState, Grid, SolverConfig};

use super::{
    Action, ConfigError, Error, Event, LearnedSolver, Status, TrainingConfig, TrainingData,
};

fn small_config() -> TrainingConfig {
    TrainingConfig {
        hidden_layers: 1,
        hidden_width: 4,
        epochs: 30,
        learning_rate: 1e-2,
        collocation_times: 3,
        log_every: 0,
        ..TrainingConfig::default()
    }
}

fn zero_problem() -> TrainingData {
    let grid = Grid::new(1.0, 5).unwrap();
    let config = SolverConfig::new(0.1, 0.01, 0.1).unwrap();
    let zero = BoundaryCondition::constant(0.0);
    TrainingData::from_problem(&grid, &config, &FieldState::uniform(5, 0.0), &zero, &zero, 3)
        .unwrap()
}

#[test]
fn same_seed_gives_same_predictions() {
    let points = [(0.1, 0.0), (0.5, 0.3), (0.9, 1.0)];
    let a = LearnedSolver::new(0.1, &small_config()).unwrap();
    let b = LearnedSolver::new(0.1, &small_config()).unwrap();
    let c = LearnedSolver::new(
        0.1,
        &TrainingConfig {
            seed: 99,
            ..small_config()
        },
    )
    .unwrap();

    assert_eq!(a.predict(&points), b.predict(&points));
    assert_ne!(a.predict(&points), c.predict(&points));
}

#[test]
fn predict_agrees_with_field_model() {
    let solver = LearnedSolver::new(0.1, &small_config()).unwrap();

    let predicted = solver.predict(&[(0.25, 0.5)]);

    assert_eq!(predicted, [solver.evaluate(0.25, 0.5)]);
}

#[test]
fn training_reduces_loss() {
    let data = zero_problem();
    let mut solver = LearnedSolver::new(0.1, &small_config()).unwrap();

    let report = solver.train(&data, &small_config()).unwrap();

    assert_eq!(report.status, Status::Complete);
    assert_eq!(report.epochs, 30);
    assert!(report.final_loss < report.initial_loss);
    assert_eq!(report.final_loss, solver.loss(&data).total());
}

#[test]
fn training_is_deterministic() {
    let data = zero_problem();
    let mut a = LearnedSolver::new(0.1, &small_config()).unwrap();
    let mut b = LearnedSolver::new(0.1, &small_config()).unwrap();

    a.train(&data, &small_config()).unwrap();
    b.train(&data, &small_config()).unwrap();

    assert_eq!(a.network().params(), b.network().params());
}

#[test]
fn observer_can_stop_training() {
    let data = zero_problem();
    let mut solver = LearnedSolver::new(0.1, &small_config()).unwrap();
    let mut losses = Vec::new();

    let report = solver
        .train_observed(&data, &small_config(), |event: &Event| {
            losses.push(event.loss.total());
            (event.epoch == 2).then_some(Action::StopEarly)
        })
        .unwrap();

    assert_eq!(report.status, Status::StoppedByObserver);
    assert_eq!(report.epochs, 2);
    assert_eq!(losses.len(), 2);
    assert_eq!(report.final_loss, losses[1]);
}

#[test]
fn non_finite_targets_are_reported() {
    let grid = Grid::new(1.0, 4).unwrap();
    let config = SolverConfig::new(0.1, 0.01, 0.1).unwrap();
    let zero = BoundaryCondition::constant(0.0);
    let initial = FieldState::from(vec![0.0, f64::NAN, 0.0, 0.0]);
    let data = TrainingData::from_problem(&grid, &config, &initial, &zero, &zero, 2).unwrap();
    let mut solver = LearnedSolver::new(0.1, &small_config()).unwrap();

    let err = solver.train(&data, &small_config()).unwrap_err();

    assert!(matches!(err, Error::NonFiniteLoss { epoch: 0 }));
}

#[test]
fn invalid_config_is_rejected() {
    let config = TrainingConfig {
        hidden_width: 0,
        ..small_config()
    };

    let err = LearnedSolver::new(0.1, &config).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::HiddenWidth)));
}

#[test]
fn solve_samples_at_stepper_snapshot_times() {
    let grid = Grid::new(1.0, 10).unwrap();
    let config = SolverConfig::new(0.01, 0.001, 0.01).unwrap();
    let initial = FieldState::uniform(10, 0.0);
    let left = BoundaryCondition::constant(1.0);
    let right = BoundaryCondition::constant(0.0);
    let training = TrainingConfig {
        epochs: 3,
        ..small_config()
    };
    let save_every = NonZeroUsize::new(2).unwrap();

    let run =
        super::solve(&grid, &config, &initial, &left, &right, save_every, &training).unwrap();

    assert_eq!(run.trace.shape(), (6, 10));
    let expected: Vec<f64> = config.snapshot_times(save_every).collect();
    assert_eq!(run.trace.times(), expected);
    assert_eq!(run.report.epochs, 3);
}
