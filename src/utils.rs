extern crate nalgebra as na;
use std::error::Error;
use std::fmt;

#[cfg(feature = "linfa")]
use linfa::prelude::*;
#[cfg(feature = "linfa")]
use linfa_elasticnet::ElasticNet;
#[cfg(feature = "linfa")]
use ndarray::{Array, Array1};
#[cfg(feature = "linfa")]
use std::time::Instant;

/// Custom error type for Lasso path operations.
///
/// `LassoError` is the primary error type used throughout the library
/// for reporting failures in grid generation, worker construction,
/// solver invocations, and persistence.
///
/// # Example
///
/// ```rust
/// # use lassopath_core::utils::LassoError;
///
/// fn might_fail() -> Result<(), LassoError> {
///     Err(LassoError::from_string("Something went wrong".to_string()))
/// }
/// ```
#[derive(Debug)]
pub struct LassoError {
    /// The error message describing what went wrong
    message: String,
}

impl LassoError {
    /// Creates a new `LassoError` from a string message.
    ///
    /// # Arguments
    ///
    /// * `message` - A descriptive error message
    ///
    /// # Returns
    ///
    /// A new `LassoError` instance containing the provided message
    pub fn from_string(message: String) -> Self {
        LassoError { message }
    }
}

impl fmt::Display for LassoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for LassoError {}

/// Evaluates the Lasso objective `(1/2) ||Ax - b||^2 + lambda ||x||_1`
/// at a given point.
///
/// # Arguments
///
/// * `a` - The feature matrix (m x n)
/// * `b` - The target vector (m x 1)
/// * `x` - The candidate solution (n x 1)
/// * `lambda` - The L1 regularization parameter
///
/// # Returns
///
/// The objective value at `x`
pub fn lasso_objective(
    a: &na::DMatrix<f32>,
    b: &na::DVector<f32>,
    x: &na::DVector<f32>,
    lambda: f32,
) -> f32 {
    let residual = a * x - b;
    let x_l1 = x.iter().map(|v| v.abs()).sum::<f32>();
    0.5 * residual.norm_squared() + lambda * x_l1
}

/// Computes the optimal objective value for Lasso regression using the linfa
/// library.
///
/// This function solves the Lasso problem at a single `lambda` with a
/// third-party solver to obtain the optimal objective value p*. It is
/// intended for testing and validation, not for production use.
///
/// # Arguments
///
/// * `a` - The feature matrix (m x n)
/// * `b` - The target vector (m x 1)
/// * `lambda` - The L1 regularization parameter
///
/// # Returns
///
/// The optimal objective value p* = 0.5 * ||Ax* - b||^2 + lambda ||x*||_1
///
/// # Performance
///
/// Prints timing information to help assess computational cost. The linfa
/// penalty is scaled by 1/m to match its average-loss formulation.
#[cfg(feature = "linfa")]
pub fn reference_objective(a: &na::DMatrix<f32>, b: &na::DVector<f32>, lambda: f32) -> f32 {
    println!("[Utils] Finding p* using linfa");
    let start_time = Instant::now();
    let m = a.nrows();
    let n = a.ncols();

    let a_ndarray = Array::from_shape_fn((m, n), |(i, j)| a[(i, j)]);
    let b_ndarray = Array1::from_vec(b.as_slice().to_vec());

    let dataset = Dataset::new(a_ndarray.clone(), b_ndarray.clone());

    let model = ElasticNet::lasso()
        .penalty(lambda / m as f32) // Divide by m to properly scale w/ avg loss objective
        .with_intercept(false)
        .fit(&dataset)
        .expect("Failed to fit ElasticNet model");

    let x_star = model.hyperplane().to_owned();

    let ax_b = a_ndarray.dot(&x_star) - b_ndarray;
    let sq_norm = ax_b.mapv(|x| x.powi(2)).sum();
    let x_l1 = x_star.mapv(|x| x.abs()).sum();

    println!(
        "[Utils] Fit model w/ linfa and calculated p* in {:?}",
        start_time.elapsed()
    );

    0.5 * sq_norm + lambda * x_l1
}
