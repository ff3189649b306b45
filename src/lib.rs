//! lassopath-core
//!
//! This library computes full Lasso regularization paths: it solves
//! `minimize (1/2) ||Ax - b||_2^2 + lambda ||x||_1` for a descending sequence
//! of `lambda` values, fanning the per-lambda solves across a pool of
//! device-bound workers. The convex solver behind each worker is an external
//! collaborator reached through the [`solver::ConvexSolver`] contract.
//!
//! # Functionality
//!
//! - Lambda grid generation (log-linear descent from `lambda_max`)
//! - Worker pool construction, one exclusively-owned solver per device
//! - Static round-robin path scheduling with optional early stopping
//! - Convergence reductions over consecutive solutions
//! - Timing and logging
//! - Local problem-data persistence
//!
//! # Features
//!
//! - `rayon` - Parallelize reductions and synthetic data generation
//! - `linfa` - A `ConvexSolver` implementation backed by `linfa-elasticnet`,
//!   plus a reference objective for validation
//!

/// Local persistence of problem data
pub mod data;

/// Lambda grid generation
pub mod grid;

/// linfa-backed solver adapter
#[cfg(feature = "linfa")]
pub mod linfa_solver;

/// Path scheduling across the worker pool
pub mod path;

/// Problem data and synthetic generation
pub mod problem;

/// Convergence reduction primitives
pub mod reduce;

/// The external solver contract
pub mod solver;

/// Timing and logging utilities
pub mod timing;

/// Error type and objective helpers
pub mod utils;

/// Worker slots and pool construction
pub mod worker;
