// Deterministic test doubles for the ConvexSolver contract. None of them
// optimize anything; they produce predictable solutions so the scheduling
// layer can be checked exactly.

use lassopath_core::solver::{
    ConvexSolver, FunctionObj, SolverContext, SolverSettings, SolverStatus,
};
use lassopath_core::utils::LassoError;

/// Returns `x_j = 1 / (1 + lambda)` for every coordinate, so the solution
/// depends on the penalty but nothing else.
pub struct ScaledSolver {
    pub settings: SolverSettings,
    pub solve_count: usize,
    ncols: usize,
    x: Vec<f32>,
}

impl ConvexSolver for ScaledSolver {
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError> {
        Ok(ScaledSolver {
            settings: SolverSettings::default(),
            solve_count: 0,
            ncols: ctx.ncols,
            x: vec![0.0; ctx.ncols],
        })
    }

    fn configure(&mut self, settings: &SolverSettings) {
        self.settings = *settings;
    }

    fn solve(
        &mut self,
        _f: &[FunctionObj],
        g: &[FunctionObj],
    ) -> Result<SolverStatus, LassoError> {
        let lambda = g[0].weight;
        self.solve_count += 1;
        self.x = vec![1.0 / (1.0 + lambda); self.ncols];
        Ok(SolverStatus::Converged)
    }

    fn solution(&self) -> &[f32] {
        &self.x
    }
}

/// Returns the all-ones vector no matter which penalty is set. Consecutive
/// solutions never change, which trips the early-stop gate immediately.
pub struct ConstantSolver {
    x: Vec<f32>,
}

impl ConvexSolver for ConstantSolver {
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError> {
        Ok(ConstantSolver {
            x: vec![1.0; ctx.ncols],
        })
    }

    fn configure(&mut self, _settings: &SolverSettings) {}

    fn solve(
        &mut self,
        _f: &[FunctionObj],
        _g: &[FunctionObj],
    ) -> Result<SolverStatus, LassoError> {
        Ok(SolverStatus::Converged)
    }

    fn solution(&self) -> &[f32] {
        &self.x
    }
}

/// Reports an exhausted iteration budget for every penalty below 1.0.
pub struct CappedSolver {
    x: Vec<f32>,
}

impl ConvexSolver for CappedSolver {
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError> {
        Ok(CappedSolver {
            x: vec![0.5; ctx.ncols],
        })
    }

    fn configure(&mut self, _settings: &SolverSettings) {}

    fn solve(
        &mut self,
        _f: &[FunctionObj],
        g: &[FunctionObj],
    ) -> Result<SolverStatus, LassoError> {
        if g[0].weight < 1.0 {
            Ok(SolverStatus::MaxIterationsReached)
        } else {
            Ok(SolverStatus::Converged)
        }
    }

    fn solution(&self) -> &[f32] {
        &self.x
    }
}

/// Fails every solve.
pub struct FailingSolver {
    x: Vec<f32>,
}

impl ConvexSolver for FailingSolver {
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError> {
        Ok(FailingSolver {
            x: vec![0.0; ctx.ncols],
        })
    }

    fn configure(&mut self, _settings: &SolverSettings) {}

    fn solve(
        &mut self,
        _f: &[FunctionObj],
        _g: &[FunctionObj],
    ) -> Result<SolverStatus, LassoError> {
        Err(LassoError::from_string("solver blew up".to_string()))
    }

    fn solution(&self) -> &[f32] {
        &self.x
    }
}
