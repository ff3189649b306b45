extern crate nalgebra as na;

use crate::solver::StorageOrder;
use crate::utils::LassoError;
use rand::prelude::*;
use rand_distr::{Normal, StandardNormal};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// The immutable data of one Lasso problem.
///
/// `ProblemData` owns the dense design matrix A (m x n) and the target
/// vector b (length m). It is created once at startup and shared read-only
/// by every worker for the duration of a path run; nothing mutates it after
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProblemData {
    a: na::DMatrix<f32>,
    b: na::DVector<f32>,
}

impl ProblemData {
    /// Creates problem data from a design matrix and target vector.
    ///
    /// # Arguments
    ///
    /// * `a` - The design matrix (m x n), m and n both nonzero
    /// * `b` - The target vector, length m
    ///
    /// # Returns
    ///
    /// * `Ok(ProblemData)` if the dimensions are consistent
    /// * `Err(LassoError)` on empty or mismatched dimensions
    pub fn new(a: na::DMatrix<f32>, b: na::DVector<f32>) -> Result<Self, LassoError> {
        if a.nrows() == 0 || a.ncols() == 0 {
            return Err(LassoError::from_string(format!(
                "Design matrix must be non-empty, got {}x{}",
                a.nrows(),
                a.ncols()
            )));
        }
        if b.len() != a.nrows() {
            return Err(LassoError::from_string(format!(
                "Target vector length {} does not match {} matrix rows",
                b.len(),
                a.nrows()
            )));
        }
        Ok(ProblemData { a, b })
    }

    /// Generates a synthetic Lasso problem.
    ///
    /// Columns of A are unit-norm standard Gaussian vectors; the ground
    /// truth has `nnz` nonzero Gaussian coefficients; b = A x_true + v with
    /// small Gaussian noise v. Generation is deterministic in `seed`.
    ///
    /// # Arguments
    ///
    /// * `m` - Number of rows in A
    /// * `n` - Number of columns in A
    /// * `nnz` - Number of nonzero elements in x_true, at most `n`
    /// * `seed` - RNG seed
    pub fn synthetic(m: usize, n: usize, nnz: usize, seed: u64) -> Result<Self, LassoError> {
        if m == 0 || n == 0 {
            return Err(LassoError::from_string(format!(
                "Synthetic problem dimensions must be nonzero, got {}x{}",
                m, n
            )));
        }
        if nnz > n {
            return Err(LassoError::from_string(format!(
                "Cannot place {} nonzeros in {} coefficients",
                nnz, n
            )));
        }

        let mut a = na::DMatrix::<f32>::zeros(m, n);

        let mut rng_seeds = Vec::with_capacity(n);
        for j in 0..n {
            rng_seeds.push(seed + j as u64);
        }

        #[cfg(feature = "rayon")]
        {
            let columns: Vec<Vec<f32>> = (0..n)
                .into_par_iter()
                .map(|j| generate_column(m, rng_seeds[j]))
                .collect();

            for (j, column_data) in columns.into_iter().enumerate() {
                a.column_mut(j).copy_from_slice(&column_data);
            }
        }

        #[cfg(not(feature = "rayon"))]
        {
            // Sequential fallback when rayon is not available
            for j in 0..n {
                let column_data = generate_column(m, rng_seeds[j]);
                a.column_mut(j).copy_from_slice(&column_data);
            }
        }

        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);

        let mut x_true = na::DVector::<f32>::zeros(n);
        let indices: Vec<usize> = rand::seq::index::sample(&mut rng, n, nnz).into_vec();
        let coefficients: Vec<f32> = (0..nnz).map(|_| rng.sample(StandardNormal)).collect();
        for (&idx, &val) in indices.iter().zip(coefficients.iter()) {
            x_true[idx] = val;
        }

        let noise_dist = Normal::new(0.0, 0.03162)
            .map_err(|e| LassoError::from_string(format!("Failed to create normal dist: {}", e)))?;
        let noise_values: Vec<f32> = (0..m).map(|_| rng.sample(noise_dist)).collect();
        let v = na::DVector::<f32>::from_vec(noise_values);

        let b = &a * &x_true + v;

        ProblemData::new(a, b)
    }

    /// Number of rows of the design matrix.
    pub fn nrows(&self) -> usize {
        self.a.nrows()
    }

    /// Number of columns of the design matrix.
    pub fn ncols(&self) -> usize {
        self.a.ncols()
    }

    /// The design matrix.
    pub fn a(&self) -> &na::DMatrix<f32> {
        &self.a
    }

    /// The target vector.
    pub fn b(&self) -> &na::DVector<f32> {
        &self.b
    }

    /// Memory layout of the slice returned by [`ProblemData::data`].
    pub fn order(&self) -> StorageOrder {
        StorageOrder::ColMajor
    }

    /// The raw matrix entries in [`ProblemData::order`] layout, as handed
    /// to solvers at bind time.
    pub fn data(&self) -> &[f32] {
        self.a.as_slice()
    }
}

fn generate_column(m: usize, seed: u64) -> Vec<f32> {
    let mut thread_rng = rand::rngs::SmallRng::seed_from_u64(seed);

    let mut random_values: Vec<f32> = (0..m).map(|_| thread_rng.sample(StandardNormal)).collect();

    let norm = random_values.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        random_values.iter_mut().for_each(|x| *x /= norm);
    }

    random_values
}
