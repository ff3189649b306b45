extern crate nalgebra as na;

use crate::grid::LambdaGrid;
use crate::reduce::{asum, max_diff};
use crate::solver::{ConvexSolver, SolverStatus};
use crate::timing::TimingTracker;
use crate::utils::LassoError;
use crate::worker::{WorkerPool, WorkerSlot};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Options controlling the path run.
#[derive(Clone, Copy, Debug)]
pub struct PathOptions {
    /// Stop a worker once its consecutive solutions stop changing. Off by
    /// default; the gate only ever halts the worker that triggered it.
    pub early_stop: bool,
    /// Relative tolerance for the early-stop gate
    pub tol: f32,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            early_stop: false,
            tol: 1e-3,
        }
    }
}

/// One solved path point.
#[derive(Clone, Debug)]
pub struct PathPoint {
    /// Position on the lambda grid
    pub index: usize,
    /// Penalty value this point was solved at
    pub lambda: f32,
    /// Device that produced the solution
    pub device: usize,
    /// Terminal state reported by the solver
    pub status: SolverStatus,
    /// The solution vector, length n
    pub solution: na::DVector<f32>,
}

/// The ordered collection of path points actually computed.
#[derive(Clone, Debug)]
pub struct PathResult {
    /// Solved points, ordered by path index
    pub points: Vec<PathPoint>,
    /// Wall-clock duration of the whole solve phase
    pub elapsed: Duration,
    expected: usize,
}

impl PathResult {
    /// True if no worker stopped early, i.e. every grid point was solved.
    pub fn is_complete(&self) -> bool {
        self.points.len() == self.expected
    }
}

/// Schedules all path points across the worker pool.
///
/// Path index `i` is statically assigned to worker `i mod nDev`. Each worker
/// drains its strided index set in increasing order, so the penalties it
/// sees are strictly decreasing and every solve can warm-start from its
/// predecessor. Workers run concurrently with no ordering constraint between
/// them; same-worker solves are strictly sequential because each slot is
/// owned by exactly one task for the duration of the run.
///
/// # Example
///
/// ```rust,no_run
/// # use lassopath_core::grid::LambdaGrid;
/// # use lassopath_core::path::PathScheduler;
/// # use lassopath_core::problem::ProblemData;
/// # use lassopath_core::solver::{ConvexSolver, SolverSettings};
/// # use lassopath_core::worker::WorkerPool;
/// # async fn example<S: ConvexSolver + 'static>() -> Result<(), Box<dyn std::error::Error>> {
/// let problem = ProblemData::synthetic(200, 100, 10, 42)?;
/// let grid = LambdaGrid::generate(&problem, 100)?;
/// let pool = WorkerPool::<S>::bind(&problem, 2, &SolverSettings::default())?;
/// let mut scheduler = PathScheduler::new(grid, pool);
/// let result = scheduler.run().await?;
/// scheduler.print_timing_summary();
/// # Ok(())
/// # }
/// ```
pub struct PathScheduler<S: ConvexSolver + 'static> {
    grid: LambdaGrid,
    pool: WorkerPool<S>,
    options: PathOptions,
    tracker: TimingTracker,
}

impl<S: ConvexSolver + 'static> PathScheduler<S> {
    /// Creates a scheduler with default options (early stop disabled).
    pub fn new(grid: LambdaGrid, pool: WorkerPool<S>) -> Self {
        PathScheduler::with_options(grid, pool, PathOptions::default())
    }

    /// Creates a scheduler with explicit options.
    pub fn with_options(grid: LambdaGrid, pool: WorkerPool<S>, options: PathOptions) -> Self {
        PathScheduler {
            grid,
            pool,
            options,
            tracker: TimingTracker::new(),
        }
    }

    /// The lambda grid this scheduler iterates.
    pub fn grid(&self) -> &LambdaGrid {
        &self.grid
    }

    /// The worker pool. Between runs the slots are back in the pool and can
    /// be inspected.
    pub fn pool(&self) -> &WorkerPool<S> {
        &self.pool
    }

    /// Executes every path point and assembles the result.
    ///
    /// One blocking task is spawned per worker slot; the call resolves once
    /// all of them have finished. If a solve fails, that worker abandons its
    /// remaining indices while its siblings run to completion, and the first
    /// failure is returned afterwards. A scheduler whose run failed must be
    /// discarded: the failed slot is gone and the device mapping with it.
    pub async fn run(&mut self) -> Result<PathResult, LassoError> {
        let ndev = self.pool.len();
        let nlambda = self.grid.len();
        let lambdas: Arc<[f32]> = Arc::from(self.grid.values());

        println!(
            "[Path] Scheduling {} path points across {} worker(s)",
            nlambda, ndev
        );

        let start = Instant::now();
        let mut handles = Vec::with_capacity(ndev);
        for slot in self.pool.take_slots() {
            let lambdas = Arc::clone(&lambdas);
            let options = self.options;
            handles.push(tokio::task::spawn_blocking(move || {
                run_worker(slot, lambdas, ndev, options)
            }));
        }

        let joined = join_all(handles).await;
        let elapsed = start.elapsed();

        let mut slots = Vec::with_capacity(ndev);
        let mut points: Vec<PathPoint> = Vec::with_capacity(nlambda);
        let mut first_error: Option<LassoError> = None;

        for handle in joined {
            let outcome = handle.map_err(|e| {
                LassoError::from_string(format!("Worker task panicked: {}", e))
            })?;
            match outcome {
                Ok(outcome) => {
                    for (index, lambda, device, duration) in &outcome.timings {
                        self.tracker.record_solve(*index, *lambda, *device, *duration);
                    }
                    slots.push(outcome.slot);
                    points.extend(outcome.points);
                }
                Err(e) => {
                    println!("[Path] Worker failed: {}", e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        self.pool.restore(slots);
        self.tracker.record_phase("path_solve", elapsed);

        if let Some(e) = first_error {
            return Err(e);
        }

        points.sort_by_key(|p| p.index);
        println!(
            "[Path] Solved {} of {} path points in {:?}",
            points.len(),
            nlambda,
            elapsed
        );

        Ok(PathResult {
            points,
            elapsed,
            expected: nlambda,
        })
    }

    /// Read-only access to the timing tracker.
    pub fn timing_tracker(&self) -> &TimingTracker {
        &self.tracker
    }

    /// Mutable access to the timing tracker for custom phase records.
    pub fn timing_tracker_mut(&mut self) -> &mut TimingTracker {
        &mut self.tracker
    }

    /// Exports phase and solve timings to `{prefix}_phases.csv` and
    /// `{prefix}_solves.csv`.
    pub fn export_all_timings(&self, filename_prefix: &str) -> Result<(), LassoError> {
        let phase_filename = format!("{}_phases.csv", filename_prefix);
        let solve_filename = format!("{}_solves.csv", filename_prefix);

        self.tracker.write_phase_timings_to_csv(&phase_filename)?;
        self.tracker.write_solve_timings_to_csv(&solve_filename)?;

        println!("Exported phase timings to: {}", phase_filename);
        println!("Exported solve timings to: {}", solve_filename);

        Ok(())
    }

    /// Prints timing statistics to the console in a formatted summary.
    pub fn print_timing_summary(&self) {
        println!("\n=== Phase Timing Summary ===");
        let phase_stats = self.tracker.get_phase_statistics();
        for (phase, (avg, max, count)) in phase_stats {
            println!(
                "{}: avg={:.2}ms, max={:.2}ms, count={}",
                phase, avg, max, count
            );
        }

        println!("\n=== Per-Device Solve Timing Summary ===");
        let device_stats = self.tracker.get_device_statistics();
        for (device, (avg, max, count)) in device_stats {
            println!(
                "device {}: avg={:.2}ms, max={:.2}ms, count={}",
                device, avg, max, count
            );
        }
        println!();
    }
}

struct WorkerOutcome<S: ConvexSolver> {
    slot: WorkerSlot<S>,
    points: Vec<PathPoint>,
    timings: Vec<(usize, f32, usize, Duration)>,
}

fn run_worker<S: ConvexSolver>(
    mut slot: WorkerSlot<S>,
    lambdas: Arc<[f32]>,
    ndev: usize,
    options: PathOptions,
) -> Result<WorkerOutcome<S>, LassoError> {
    let device = slot.device();
    let mut previous: Option<Vec<f32>> = None;
    let mut points = Vec::new();
    let mut timings = Vec::new();

    for index in (device..lambdas.len()).step_by(ndev) {
        let lambda = lambdas[index];
        slot.set_penalty(lambda);

        println!("[Path] i={} lambda={:.6e} device={}", index, lambda, device);

        let solve_start = Instant::now();
        let status = slot.solve()?;
        timings.push((index, lambda, device, solve_start.elapsed()));

        if status == SolverStatus::MaxIterationsReached {
            println!(
                "[Path] i={} device={} hit the iteration cap, solution may be unreliable",
                index, device
            );
        }

        let solution = slot.solution().to_vec();

        let stop = if options.early_stop {
            match &previous {
                Some(prev) => {
                    let change = max_diff(&solution, prev)?;
                    change < options.tol * asum(&solution)
                }
                None => false,
            }
        } else {
            false
        };

        points.push(PathPoint {
            index,
            lambda,
            device,
            status,
            solution: na::DVector::from_column_slice(&solution),
        });

        if stop {
            println!(
                "[Path] device={} converged at i={}, skipping its remaining path points",
                device, index
            );
            break;
        }

        previous = Some(solution);
    }

    Ok(WorkerOutcome {
        slot,
        points,
        timings,
    })
}
