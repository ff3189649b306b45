use lassopath_core::grid::{LAMBDA_MIN_RATIO, LambdaGrid};
use lassopath_core::problem::ProblemData;
use nalgebra as na;

fn small_problem() -> ProblemData {
    // Column 0 . b = 1 + 0 + 3 - 1 = 3, column 1 . b = 0 + 2 + 3 + 1 = 6
    let a = na::DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, -1.0]);
    let b = na::DVector::from_vec(vec![1.0, 2.0, 3.0, -1.0]);
    ProblemData::new(a, b).unwrap()
}

#[test]
fn lambda_max_is_the_largest_column_correlation() {
    assert_eq!(LambdaGrid::lambda_max(&small_problem()), 6.0);
}

#[test]
fn three_point_grid_matches_hand_computed_values() {
    let grid = LambdaGrid::generate(&small_problem(), 3).unwrap();
    let expected = [6.0f32, 0.6, 0.06];
    assert_eq!(grid.len(), 3);
    for (value, target) in grid.values().iter().zip(expected.iter()) {
        assert!(
            (value / target - 1.0).abs() < 1e-4,
            "got {}, expected {}",
            value,
            target
        );
    }
}

#[test]
fn grid_is_strictly_decreasing_with_pinned_endpoints() {
    let problem = small_problem();
    let lambda_max = LambdaGrid::lambda_max(&problem);
    let grid = LambdaGrid::generate(&problem, 7).unwrap();

    assert_eq!(grid.len(), 7);
    for pair in grid.values().windows(2) {
        assert!(pair[0] > pair[1]);
    }
    assert!((grid.values()[0] / lambda_max - 1.0).abs() < 1e-4);
    assert!((grid.values()[6] / (LAMBDA_MIN_RATIO * lambda_max) - 1.0).abs() < 1e-4);
    assert!(grid.values().iter().all(|&v| v > 0.0));
}

#[test]
fn degenerate_point_counts_are_rejected() {
    let problem = small_problem();
    assert!(LambdaGrid::generate(&problem, 0).is_err());
    assert!(LambdaGrid::generate(&problem, 1).is_err());
    assert!(LambdaGrid::generate(&problem, 2).is_ok());
}

#[test]
fn zero_target_vector_is_rejected() {
    let a = na::DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1.0]);
    let b = na::DVector::zeros(2);
    let problem = ProblemData::new(a, b).unwrap();
    assert!(LambdaGrid::generate(&problem, 3).is_err());
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let a = na::DMatrix::from_row_slice(4, 2, &[1.0; 8]);
    let b = na::DVector::from_vec(vec![1.0, 2.0, 3.0]);
    assert!(ProblemData::new(a, b).is_err());
}

#[test]
fn synthetic_problem_has_consistent_shape() {
    let problem = ProblemData::synthetic(30, 10, 3, 7).unwrap();
    assert_eq!(problem.nrows(), 30);
    assert_eq!(problem.ncols(), 10);
    assert_eq!(problem.b().len(), 30);
    assert_eq!(problem.data().len(), 300);
    assert!(LambdaGrid::lambda_max(&problem) > 0.0);

    // same seed, same data
    let again = ProblemData::synthetic(30, 10, 3, 7).unwrap();
    assert_eq!(problem.a(), again.a());
    assert_eq!(problem.b(), again.b());

    assert!(ProblemData::synthetic(10, 5, 6, 7).is_err());
    assert!(ProblemData::synthetic(0, 5, 0, 7).is_err());
}
