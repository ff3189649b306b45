use crate::problem::ProblemData;
use crate::utils::LassoError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Ratio between the smallest and largest penalty on the grid.
pub const LAMBDA_MIN_RATIO: f32 = 0.01;

/// A descending sequence of positive penalty values.
///
/// The grid starts at `lambda_max`, the smallest penalty for which the
/// all-zero solution is optimal, and descends log-linearly to
/// `LAMBDA_MIN_RATIO * lambda_max`. It is immutable once generated and
/// shared read-only by the scheduler.
#[derive(Clone, Debug)]
pub struct LambdaGrid {
    values: Vec<f32>,
}

impl LambdaGrid {
    /// Generates the penalty grid for a problem.
    ///
    /// For `i = 0 .. nlambda-1` the grid value is
    /// `exp((ln(lambda_max) * (nlambda-1-i) + ln(ratio * lambda_max) * i) / (nlambda-1))`,
    /// a geometric descent from `lambda_max` to `ratio * lambda_max`.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem data used to compute `lambda_max`
    /// * `nlambda` - Number of path points, at least 2
    ///
    /// # Returns
    ///
    /// * `Ok(LambdaGrid)` with exactly `nlambda` strictly decreasing values
    /// * `Err(LassoError)` if `nlambda < 2` (the interpolation denominator
    ///   would be zero) or if `lambda_max` is not strictly positive
    pub fn generate(problem: &ProblemData, nlambda: usize) -> Result<Self, LassoError> {
        if nlambda < 2 {
            return Err(LassoError::from_string(format!(
                "Grid generation requires at least 2 path points, got {}",
                nlambda
            )));
        }

        let lambda_max = Self::lambda_max(problem);
        if !(lambda_max > 0.0) {
            return Err(LassoError::from_string(format!(
                "Degenerate problem: lambda_max = {}, grid would not be strictly positive",
                lambda_max
            )));
        }

        let log_max = lambda_max.ln();
        let log_min = (LAMBDA_MIN_RATIO * lambda_max).ln();
        let denom = (nlambda - 1) as f32;

        let values = (0..nlambda)
            .map(|i| {
                let t = i as f32;
                ((log_max * (denom - t) + log_min * t) / denom).exp()
            })
            .collect();

        Ok(LambdaGrid { values })
    }

    /// Computes `lambda_max = max_j |A[:,j] . b|`, the largest column-target
    /// correlation. Each column's dot product is independent, so the scan
    /// parallelizes over columns.
    pub fn lambda_max(problem: &ProblemData) -> f32 {
        let a = problem.a();
        let b = problem.b();

        #[cfg(feature = "rayon")]
        {
            (0..a.ncols())
                .into_par_iter()
                .map(|j| a.column(j).dot(b).abs())
                .reduce(|| 0.0f32, f32::max)
        }

        #[cfg(not(feature = "rayon"))]
        {
            let mut max_abs_val: f32 = 0.0;
            for j in 0..a.ncols() {
                let val = a.column(j).dot(b);
                max_abs_val = max_abs_val.max(val.abs());
            }
            max_abs_val
        }
    }

    /// Number of path points on the grid.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the grid holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The penalty values, descending.
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}
