use crate::utils::LassoError;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Maximum absolute elementwise difference between two equal-length vectors.
///
/// Used by the early-stop gate to measure how much consecutive path
/// solutions changed. The reduction is order-insensitive up to floating
/// point, so it may be computed over any partitioning.
///
/// # Arguments
///
/// * `v1` - First vector
/// * `v2` - Second vector, same length as `v1`
///
/// # Returns
///
/// * `Ok(max_i |v1[i] - v2[i]|)`
/// * `Err(LassoError)` if the lengths differ
pub fn max_diff(v1: &[f32], v2: &[f32]) -> Result<f32, LassoError> {
    if v1.len() != v2.len() {
        return Err(LassoError::from_string(format!(
            "max_diff requires equal lengths, got {} and {}",
            v1.len(),
            v2.len()
        )));
    }

    #[cfg(feature = "rayon")]
    {
        Ok(v1
            .par_iter()
            .zip(v2.par_iter())
            .map(|(a, b)| (a - b).abs())
            .reduce(|| 0.0f32, f32::max))
    }

    #[cfg(not(feature = "rayon"))]
    {
        Ok(v1
            .iter()
            .zip(v2.iter())
            .fold(0.0f32, |acc, (a, b)| acc.max((a - b).abs())))
    }
}

/// Sum of absolute values of a vector.
pub fn asum(v: &[f32]) -> f32 {
    #[cfg(feature = "rayon")]
    {
        v.par_iter().map(|x| x.abs()).sum()
    }

    #[cfg(not(feature = "rayon"))]
    {
        v.iter().map(|x| x.abs()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_diff_of_identical_vectors_is_zero() {
        let v = vec![0.5f32, -1.25, 3.0, 0.0];
        assert_eq!(max_diff(&v, &v).unwrap(), 0.0);
    }

    #[test]
    fn max_diff_is_symmetric() {
        let v1 = vec![1.0f32, -2.0, 3.0];
        let v2 = vec![1.0f32, 1.0, 1.0];
        assert_eq!(max_diff(&v1, &v2).unwrap(), max_diff(&v2, &v1).unwrap());
    }

    #[test]
    fn max_diff_picks_the_largest_gap() {
        let v1 = vec![1.0f32, -2.0, 3.0];
        let v2 = vec![1.0f32, 1.0, 1.0];
        // index 1 contributes |-2 - 1| = 3, index 2 contributes |3 - 1| = 2
        assert_eq!(max_diff(&v1, &v2).unwrap(), 3.0);
    }

    #[test]
    fn max_diff_rejects_mismatched_lengths() {
        let v1 = vec![1.0f32, 2.0];
        let v2 = vec![1.0f32];
        assert!(max_diff(&v1, &v2).is_err());
    }

    #[test]
    fn asum_of_signed_vector() {
        assert_eq!(asum(&[1.0f32, -2.0, 3.0]), 6.0);
    }

    #[test]
    fn asum_is_nonnegative_and_zero_only_for_zero() {
        assert_eq!(asum(&[0.0f32, 0.0, 0.0]), 0.0);
        assert!(asum(&[-1e-3f32, 0.0]) > 0.0);
        assert!(asum(&[]) == 0.0);
    }
}
