mod common;

use common::{CappedSolver, ConstantSolver, FailingSolver, ScaledSolver};
use lassopath_core::grid::LambdaGrid;
use lassopath_core::path::{PathOptions, PathScheduler};
use lassopath_core::problem::ProblemData;
use lassopath_core::reduce::max_diff;
use lassopath_core::solver::{SolverSettings, SolverStatus};
use lassopath_core::worker::WorkerPool;
use nalgebra as na;

fn small_problem() -> ProblemData {
    let a = na::DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, -1.0]);
    let b = na::DVector::from_vec(vec![1.0, 2.0, 3.0, -1.0]);
    ProblemData::new(a, b).unwrap()
}

fn early_stop() -> PathOptions {
    PathOptions {
        early_stop: true,
        tol: 1e-3,
    }
}

#[tokio::test]
async fn single_worker_runs_every_point_in_order() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 5).unwrap();
    let expected_lambdas: Vec<f32> = grid.values().to_vec();
    let pool =
        WorkerPool::<ScaledSolver>::bind(&problem, 1, &SolverSettings::default()).unwrap();
    assert_eq!(pool.len(), 1);

    let mut scheduler = PathScheduler::new(grid, pool);
    let result = scheduler.run().await.unwrap();

    assert!(result.is_complete());
    assert_eq!(result.points.len(), 5);
    for (i, point) in result.points.iter().enumerate() {
        assert_eq!(point.index, i);
        assert_eq!(point.device, 0);
        assert_eq!(point.lambda, expected_lambdas[i]);
        assert_eq!(point.status, SolverStatus::Converged);
        assert_eq!(point.solution.len(), problem.ncols());
    }

    let total_solves: usize = scheduler
        .pool()
        .slots()
        .iter()
        .map(|slot| slot.solver().solve_count)
        .sum();
    assert_eq!(total_solves, 5);
}

#[tokio::test]
async fn assignment_is_static_round_robin() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 9).unwrap();
    let pool =
        WorkerPool::<ScaledSolver>::bind(&problem, 2, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::new(grid, pool);
    let result = scheduler.run().await.unwrap();

    let ndev = scheduler.pool().len();
    assert!(ndev >= 1);
    assert_eq!(result.points.len(), 9);
    for point in &result.points {
        assert_eq!(point.device, point.index % ndev);
    }

    let total_solves: usize = scheduler
        .pool()
        .slots()
        .iter()
        .map(|slot| slot.solver().solve_count)
        .sum();
    assert_eq!(total_solves, 9);
}

#[test]
fn settings_are_forwarded_verbatim_to_every_slot() {
    let problem = small_problem();
    let settings = SolverSettings {
        rho: 0.5,
        adaptive_rho: false,
        max_iter: 77,
        verbose: 2,
    };
    let pool = WorkerPool::<ScaledSolver>::bind(&problem, 2, &settings).unwrap();

    for slot in pool.slots() {
        assert_eq!(slot.solver().settings, settings);
        assert_eq!(slot.loss_terms().len(), problem.nrows());
        assert_eq!(slot.reg_terms().len(), problem.ncols());
        for (term, &target) in slot.loss_terms().iter().zip(problem.b().iter()) {
            assert_eq!(term.shift, target);
            assert_eq!(term.weight, 1.0);
        }
        // penalties start unset and are written per path point
        assert!(slot.reg_terms().iter().all(|t| t.weight == 0.0));
    }
}

#[test]
fn zero_requested_devices_is_rejected() {
    let problem = small_problem();
    assert!(WorkerPool::<ScaledSolver>::bind(&problem, 0, &SolverSettings::default()).is_err());
}

#[test]
fn requested_devices_are_clamped_to_available_units() {
    let problem = small_problem();
    let available = std::thread::available_parallelism().unwrap().get();
    let pool =
        WorkerPool::<ScaledSolver>::bind(&problem, 4096, &SolverSettings::default()).unwrap();
    assert_eq!(pool.len(), 4096usize.min(available));
}

#[tokio::test]
async fn early_stop_halts_a_worker_after_its_second_point() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 6).unwrap();
    let pool =
        WorkerPool::<ConstantSolver>::bind(&problem, 1, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::with_options(grid, pool, early_stop());
    let result = scheduler.run().await.unwrap();

    assert!(!result.is_complete());
    let indices: Vec<usize> = result.points.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[tokio::test]
async fn early_stop_disabled_runs_the_full_path() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 6).unwrap();
    let pool =
        WorkerPool::<ConstantSolver>::bind(&problem, 1, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::new(grid, pool);
    let result = scheduler.run().await.unwrap();

    assert!(result.is_complete());
    assert_eq!(result.points.len(), 6);
}

#[tokio::test]
async fn early_stop_halts_each_worker_independently() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 8).unwrap();
    let pool =
        WorkerPool::<ConstantSolver>::bind(&problem, 2, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::with_options(grid, pool, early_stop());
    let result = scheduler.run().await.unwrap();

    let ndev = scheduler.pool().len();
    assert_eq!(result.points.len(), 2 * ndev);
    for device in 0..ndev {
        let count = result.points.iter().filter(|p| p.device == device).count();
        assert_eq!(count, 2);
    }
}

#[tokio::test]
async fn iteration_cap_is_reported_per_point_not_fatal() {
    let problem = small_problem();
    // grid is [6, 0.6, 0.06]; the capped stub gives up below 1.0
    let grid = LambdaGrid::generate(&problem, 3).unwrap();
    let pool =
        WorkerPool::<CappedSolver>::bind(&problem, 1, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::new(grid, pool);
    let result = scheduler.run().await.unwrap();

    assert!(result.is_complete());
    let statuses: Vec<SolverStatus> = result.points.iter().map(|p| p.status).collect();
    assert_eq!(
        statuses,
        vec![
            SolverStatus::Converged,
            SolverStatus::MaxIterationsReached,
            SolverStatus::MaxIterationsReached
        ]
    );
}

#[tokio::test]
async fn failing_solver_aborts_the_run() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 4).unwrap();
    let pool =
        WorkerPool::<FailingSolver>::bind(&problem, 2, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::new(grid, pool);
    assert!(scheduler.run().await.is_err());
}

#[test]
fn solving_the_same_penalty_twice_is_stable() {
    let problem = small_problem();
    let mut pool =
        WorkerPool::<ScaledSolver>::bind(&problem, 1, &SolverSettings::default()).unwrap();
    let slot = &mut pool.slots_mut()[0];

    slot.set_penalty(0.6);
    slot.solve().unwrap();
    let first = slot.solution().to_vec();
    slot.solve().unwrap();
    let second = slot.solution().to_vec();

    assert!(max_diff(&first, &second).unwrap() < 1e-6);
}

#[tokio::test]
async fn every_solve_leaves_a_timing_record() {
    let problem = small_problem();
    let grid = LambdaGrid::generate(&problem, 5).unwrap();
    let pool =
        WorkerPool::<ScaledSolver>::bind(&problem, 2, &SolverSettings::default()).unwrap();

    let mut scheduler = PathScheduler::new(grid, pool);
    scheduler.run().await.unwrap();

    assert_eq!(scheduler.timing_tracker().solve_timings().len(), 5);
}
