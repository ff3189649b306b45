/*
Computes a full LASSO regularization path

  minimize (1/2) ||Ax - b||_2^2 + lambda ||x||_1

for a descending grid of lambda values, distributing the per-lambda solves
across a pool of device-bound workers.
*/

use std::path::Path;
use std::time::Instant;

use clap::Parser;
use lassopath_core::{
    data::DatasetStore,
    grid::LambdaGrid,
    linfa_solver::LinfaLassoSolver,
    path::{PathOptions, PathScheduler},
    problem::ProblemData,
    solver::SolverSettings,
    utils::lasso_objective,
    worker::WorkerPool,
};

/// Program to compute a full LASSO regularization path.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Load the problem written by generate_problem under this prefix
    /// instead of synthesizing one
    #[arg(long)]
    prefix: Option<String>,

    /// The number of rows in A (synthetic problem)
    #[arg(short, long, default_value_t = 200)]
    m: usize,

    /// The number of columns in A (synthetic problem)
    #[arg(short, long, default_value_t = 100)]
    n: usize,

    /// The number of non-zero elements in x_true (synthetic problem)
    #[arg(short, long, default_value_t = 10)]
    k: usize,

    /// RNG seed for the synthetic data
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Number of path points on the lambda grid
    #[arg(long, default_value_t = 100)]
    nlambda: usize,

    /// Number of device workers to use
    #[arg(short, long, default_value_t = 2)]
    devices: usize,

    /// Iteration cap per solve
    #[arg(long, default_value_t = 5000)]
    max_iter: usize,

    /// Fixed solver step size
    #[arg(long, default_value_t = 1.0)]
    rho: f32,

    /// Disable the adaptive step size
    #[arg(long)]
    no_adaptive_rho: bool,

    /// Solver verbosity level
    #[arg(short, long, default_value_t = 0)]
    verbose: u32,

    /// Stop a worker early once its consecutive solutions stop changing
    #[arg(long)]
    early_stop: bool,

    /// Relative tolerance for the early-stop gate
    #[arg(long, default_value_t = 1e-3)]
    tol: f32,

    /// Export timing CSVs with this filename prefix
    #[arg(long)]
    timings: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    println!("[Main] START FILL DATA");
    let t_data = Instant::now();
    let problem = match &args.prefix {
        Some(prefix) => {
            let store = DatasetStore::new(Path::new("data"), "");
            store
                .read(&format!("{}-problem", prefix))
                .await
                .expect("Failed to load problem data")
        }
        None => ProblemData::synthetic(args.m, args.n, args.k, args.seed)
            .expect("Failed to generate problem data"),
    };
    let data_elapsed = t_data.elapsed();
    println!("[Main] END FILL DATA");

    let grid =
        LambdaGrid::generate(&problem, args.nlambda).expect("Failed to generate lambda grid");
    println!("[Main] Lambda_max: {}", grid.values()[0]);

    let settings = SolverSettings {
        rho: args.rho,
        adaptive_rho: !args.no_adaptive_rho,
        max_iter: args.max_iter,
        verbose: args.verbose,
    };

    let pool = WorkerPool::<LinfaLassoSolver>::bind(&problem, args.devices, &settings)
        .expect("Failed to bind worker pool");

    let options = PathOptions {
        early_stop: args.early_stop,
        tol: args.tol,
    };
    let mut scheduler = PathScheduler::with_options(grid, pool, options);

    println!("[Main] BEGIN SOLVE");
    let result = scheduler.run().await.expect("Path solve failed");
    println!(
        "[Main] END SOLVE: m {} n {} tfd {:.6} ts {:.6}",
        problem.nrows(),
        problem.ncols(),
        data_elapsed.as_secs_f64(),
        result.elapsed.as_secs_f64()
    );

    if let Some(last) = result.points.last() {
        println!(
            "[Main] Final point: i={} lambda={:.6e} objective={:.6e}",
            last.index,
            last.lambda,
            lasso_objective(problem.a(), problem.b(), &last.solution, last.lambda)
        );
    }

    scheduler.print_timing_summary();

    if let Some(prefix) = &args.timings {
        scheduler
            .export_all_timings(prefix)
            .expect("Failed to export timings");
    }
}
