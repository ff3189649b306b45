//! A [`ConvexSolver`] implementation backed by the `linfa-elasticnet`
//! coordinate-descent Lasso solver.
//!
//! The adapter reconstructs the target vector from the loss-term shifts and
//! the penalty from the regularizer weights, then fits linfa's model with
//! the penalty scaled by 1/m to match its average-loss objective. The step
//! size knobs in [`SolverSettings`] have no coordinate-descent counterpart
//! and are ignored; the iteration cap and verbosity are honored.

use crate::solver::{
    ConvexSolver, FunctionKind, FunctionObj, SolverContext, SolverSettings, SolverStatus,
    StorageOrder,
};
use crate::utils::LassoError;
use linfa::prelude::*;
use linfa_elasticnet::ElasticNet;
use ndarray::{Array1, Array2, ShapeBuilder};

/// Lasso solver driving one device through `linfa-elasticnet`.
pub struct LinfaLassoSolver {
    device: usize,
    design: Array2<f32>,
    settings: SolverSettings,
    x: Vec<f32>,
}

impl ConvexSolver for LinfaLassoSolver {
    fn bind(ctx: SolverContext<'_>) -> Result<Self, LassoError> {
        if ctx.nrows == 0 || ctx.ncols == 0 {
            return Err(LassoError::from_string(format!(
                "Cannot bind solver to an empty {}x{} matrix",
                ctx.nrows, ctx.ncols
            )));
        }
        if ctx.data.len() != ctx.nrows * ctx.ncols {
            return Err(LassoError::from_string(format!(
                "Matrix data holds {} entries, expected {}",
                ctx.data.len(),
                ctx.nrows * ctx.ncols
            )));
        }

        let design = match ctx.order {
            StorageOrder::ColMajor => {
                Array2::from_shape_vec((ctx.nrows, ctx.ncols).f(), ctx.data.to_vec())
            }
            StorageOrder::RowMajor => {
                Array2::from_shape_vec((ctx.nrows, ctx.ncols), ctx.data.to_vec())
            }
        }
        .map_err(|e| LassoError::from_string(format!("Failed to shape design matrix: {}", e)))?;

        Ok(LinfaLassoSolver {
            device: ctx.device,
            design,
            settings: SolverSettings::default(),
            x: vec![0.0; ctx.ncols],
        })
    }

    fn configure(&mut self, settings: &SolverSettings) {
        self.settings = *settings;
    }

    fn solve(&mut self, f: &[FunctionObj], g: &[FunctionObj]) -> Result<SolverStatus, LassoError> {
        let m = self.design.nrows();
        let n = self.design.ncols();
        if f.len() != m {
            return Err(LassoError::from_string(format!(
                "Expected {} loss terms, got {}",
                m,
                f.len()
            )));
        }
        if g.len() != n {
            return Err(LassoError::from_string(format!(
                "Expected {} regularizer terms, got {}",
                n,
                g.len()
            )));
        }
        if f.iter().any(|t| t.kind != FunctionKind::Square)
            || g.iter().any(|t| t.kind != FunctionKind::Abs)
        {
            return Err(LassoError::from_string(
                "LinfaLassoSolver only supports Square loss and Abs regularizer terms".to_string(),
            ));
        }

        let y = Array1::from_iter(f.iter().map(|t| t.shift));
        let lambda = g[0].weight;

        let dataset = Dataset::new(self.design.clone(), y);

        let model = ElasticNet::lasso()
            .penalty(lambda / m as f32) // Divide by m to properly scale w/ avg loss objective
            .with_intercept(false)
            .max_iterations(self.settings.max_iter as u32)
            .fit(&dataset)
            .map_err(|e| LassoError::from_string(format!("linfa Lasso fit failed: {}", e)))?;

        self.x.clear();
        self.x.extend(model.hyperplane().iter().copied());

        if self.settings.verbose > 0 {
            println!(
                "[LinfaSolver] device={} lambda={:.6e} steps={} gap={:.3e}",
                self.device,
                lambda,
                model.n_steps(),
                model.duality_gap()
            );
        }

        if (model.n_steps() as usize) < self.settings.max_iter {
            Ok(SolverStatus::Converged)
        } else {
            Ok(SolverStatus::MaxIterationsReached)
        }
    }

    fn solution(&self) -> &[f32] {
        &self.x
    }
}
