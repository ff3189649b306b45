use crate::problem::ProblemData;
use crate::solver::{ConvexSolver, FunctionObj, SolverContext, SolverSettings, SolverStatus};
use crate::utils::LassoError;
use std::thread::available_parallelism;

/// One worker slot, exclusively owning a solver instance bound to a device.
///
/// A slot holds the solver plus its loss-term array `f` (one squared-error
/// term per matrix row) and regularizer-term array `g` (one absolute-value
/// term per column). Between solves the only mutable field is the weight of
/// the `g` terms; everything else is warm state set once at construction.
///
/// At most one logical owner may drive a slot at a time: the penalty must be
/// assigned and the solve completed before the slot is touched again.
pub struct WorkerSlot<S: ConvexSolver> {
    device: usize,
    solver: S,
    f: Vec<FunctionObj>,
    g: Vec<FunctionObj>,
}

impl<S: ConvexSolver> WorkerSlot<S> {
    fn bind(
        device: usize,
        problem: &ProblemData,
        settings: &SolverSettings,
    ) -> Result<Self, LassoError> {
        let mut solver = S::bind(SolverContext {
            device,
            order: problem.order(),
            nrows: problem.nrows(),
            ncols: problem.ncols(),
            data: problem.data(),
        })?;
        solver.configure(settings);

        let f = problem.b().iter().map(|&bi| FunctionObj::square(bi)).collect();
        let g = (0..problem.ncols()).map(|_| FunctionObj::abs()).collect();

        Ok(WorkerSlot {
            device,
            solver,
            f,
            g,
        })
    }

    /// The device index this slot drives.
    pub fn device(&self) -> usize {
        self.device
    }

    /// Writes `lambda` into the weight of every regularizer term.
    pub fn set_penalty(&mut self, lambda: f32) {
        for term in &mut self.g {
            term.weight = lambda;
        }
    }

    /// Runs one blocking solve against the current term arrays.
    pub fn solve(&mut self) -> Result<SolverStatus, LassoError> {
        self.solver.solve(&self.f, &self.g)
    }

    /// The solution vector from the most recent solve.
    pub fn solution(&self) -> &[f32] {
        self.solver.solution()
    }

    /// The bound solver instance.
    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// The loss-term array, one term per matrix row.
    pub fn loss_terms(&self) -> &[FunctionObj] {
        &self.f
    }

    /// The regularizer-term array, one term per matrix column.
    pub fn reg_terms(&self) -> &[FunctionObj] {
        &self.g
    }
}

/// A fixed pool of worker slots, one per device.
///
/// The pool binds `min(requested, available_execution_units)` slots, each
/// against the same full copy of the problem data. Construction cost
/// includes each solver's one-time setup and is paid exactly once per run.
pub struct WorkerPool<S: ConvexSolver> {
    slots: Vec<WorkerSlot<S>>,
}

impl<S: ConvexSolver> WorkerPool<S> {
    /// Binds the pool.
    ///
    /// # Arguments
    ///
    /// * `problem` - The shared problem data
    /// * `requested` - Requested device count, at least 1
    /// * `settings` - Tuning knobs forwarded verbatim to every solver
    ///
    /// # Returns
    ///
    /// * `Ok(WorkerPool)` with `min(requested, available)` slots
    /// * `Err(LassoError)` if `requested` is zero, the execution-unit count
    ///   cannot be determined, or any solver fails to bind. A bind failure
    ///   aborts pool construction rather than degrading to fewer workers.
    pub fn bind(
        problem: &ProblemData,
        requested: usize,
        settings: &SolverSettings,
    ) -> Result<Self, LassoError> {
        if requested == 0 {
            return Err(LassoError::from_string(
                "At least one device worker is required".to_string(),
            ));
        }

        let available = available_parallelism()
            .map_err(|e| {
                LassoError::from_string(format!("Failed to query execution units: {}", e))
            })?
            .get();
        let ndev = requested.min(available);

        println!(
            "[Pool] Binding {} worker slot(s) ({} requested, {} execution units available)",
            ndev, requested, available
        );

        let mut slots = Vec::with_capacity(ndev);
        for device in 0..ndev {
            println!("[Pool] Solver bind: device {}", device);
            slots.push(WorkerSlot::bind(device, problem, settings)?);
        }

        Ok(WorkerPool { slots })
    }

    /// Number of bound slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the pool holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read-only view of the slots, indexed by device.
    pub fn slots(&self) -> &[WorkerSlot<S>] {
        &self.slots
    }

    /// Mutable view of the slots for direct, single-owner use.
    pub fn slots_mut(&mut self) -> &mut [WorkerSlot<S>] {
        &mut self.slots
    }

    pub(crate) fn take_slots(&mut self) -> Vec<WorkerSlot<S>> {
        std::mem::take(&mut self.slots)
    }

    pub(crate) fn restore(&mut self, mut slots: Vec<WorkerSlot<S>>) {
        slots.sort_by_key(|slot| slot.device());
        self.slots = slots;
    }
}
