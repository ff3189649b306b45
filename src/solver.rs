use crate::utils::LassoError;

/// Storage order of the dense design matrix handed to a solver at bind time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageOrder {
    /// Row-contiguous layout, `A[i, j] = data[i * ncols + j]`
    RowMajor,
    /// Column-contiguous layout, `A[i, j] = data[i + j * nrows]`
    ColMajor,
}

/// Kind tag for a loss or regularizer term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// Squared error, `f(x) = (1/2) (x - shift)^2`
    Square,
    /// Absolute value, `f(x) = |x|`
    Abs,
}

/// Lightweight descriptor for one separable term of the objective.
///
/// Loss terms are matched one-to-one with the rows of the design matrix and
/// regularizer terms with its columns. A term evaluates as
/// `weight * f(x - shift)` where `f` is selected by [`FunctionKind`].
#[derive(Clone, Copy, Debug)]
pub struct FunctionObj {
    /// Which base function this term applies
    pub kind: FunctionKind,
    /// Horizontal shift of the base function
    pub shift: f32,
    /// Multiplicative weight of the term
    pub weight: f32,
}

impl FunctionObj {
    /// A unit-weight squared-error term matching a target value.
    pub fn square(target: f32) -> Self {
        FunctionObj {
            kind: FunctionKind::Square,
            shift: target,
            weight: 1.0,
        }
    }

    /// An absolute-value term. The weight starts at zero and is assigned
    /// by the scheduler before every solve.
    pub fn abs() -> Self {
        FunctionObj {
            kind: FunctionKind::Abs,
            shift: 0.0,
            weight: 0.0,
        }
    }
}

/// Tuning knobs forwarded verbatim to every solver instance.
///
/// These are applied once at pool construction and are not touched again
/// mid-path unless the caller explicitly reconfigures a solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverSettings {
    /// Fixed step size for the solver's internal iterations
    pub rho: f32,
    /// Whether the solver may adapt its step size between iterations
    pub adaptive_rho: bool,
    /// Iteration cap per solve
    pub max_iter: usize,
    /// Verbosity level, 0 is silent
    pub verbose: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            rho: 1.0,
            adaptive_rho: true,
            max_iter: 5000,
            verbose: 0,
        }
    }
}

/// Terminal state of a single solve.
///
/// Both states count as "solved" for path assembly; the distinction is
/// reported so that callers can flag unreliable path points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    /// The solver reached its internal tolerance
    Converged,
    /// The solver exhausted its iteration cap before converging
    MaxIterationsReached,
}

/// Everything a solver needs to bind itself to one device.
///
/// `data` is a borrowed view of the full design matrix in `order` layout.
/// Every worker binds against the same complete matrix, so any worker can
/// solve any path point.
pub struct SolverContext<'a> {
    /// Device index this instance will drive
    pub device: usize,
    /// Memory layout of `data`
    pub order: StorageOrder,
    /// Number of rows of the design matrix
    pub nrows: usize,
    /// Number of columns of the design matrix
    pub ncols: usize,
    /// The dense matrix entries, `nrows * ncols` values in `order` layout
    pub data: &'a [f32],
}

/// Contract for the external convex solver backing a worker slot.
///
/// Implementations are expected to perform their one-time expensive setup
/// (matrix equilibration, factorization) in [`ConvexSolver::bind`] and cache
/// it for the lifetime of the instance; `solve` is then invoked many times
/// against the same bound matrix with varying term weights.
///
/// # Contract
///
/// 1. `bind` - construct the instance from a [`SolverContext`]; the matrix
///    data must be copied or otherwise retained as needed.
/// 2. `configure` - apply [`SolverSettings`]; callable before and between
///    solves.
/// 3. `solve` - synchronous and blocking; returns once the solver has
///    converged or exhausted its iteration cap. `f` holds one loss term per
///    row and `g` one regularizer term per column.
/// 4. `solution` - the solution vector produced by the most recent solve,
///    length `ncols`. Implementations may reuse it internally to warm-start
///    the next solve.
pub trait ConvexSolver: Send + Sized {
    /// Binds a new solver instance to one device.
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError>;

    /// Applies tuning settings to this instance.
    fn configure(&mut self, settings: &SolverSettings);

    /// Runs one blocking solve over the given loss and regularizer terms.
    fn solve(&mut self, f: &[FunctionObj], g: &[FunctionObj]) -> Result<SolverStatus, LassoError>;

    /// The solution vector from the most recent solve.
    fn solution(&self) -> &[f32];
}
