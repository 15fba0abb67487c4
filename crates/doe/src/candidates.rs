use crate::FullFactorial;
use linfa::Float;
use ndarray::Array2;

/// Generates a candidate set as the full factorial grid of `n_levels`
/// evenly spaced levels within `[-1., 1.]` for each of the `n_factors` factors.
///
/// The returned matrix has `n_levels^n_factors` rows, the last factor varying fastest.
///
/// ```
/// use optdoe_doe::generate_candidate_set;
///
/// let candidates = generate_candidate_set::<f64>(2, 5);
/// assert_eq!(candidates.dim(), (25, 2));
/// ```
///
/// **Panics** if `n_factors` is 0 or `n_levels` is lower than 2.
pub fn generate_candidate_set<F: Float>(n_factors: usize, n_levels: usize) -> Array2<F> {
    if n_factors == 0 {
        panic!("candidate set requires at least one factor");
    }
    if n_levels < 2 {
        panic!("candidate set requires at least 2 levels by factor, got {n_levels}");
    }
    let mut xlimits = Array2::<F>::zeros((n_factors, 2));
    xlimits.column_mut(0).fill(-F::one());
    xlimits.column_mut(1).fill(F::one());
    FullFactorial::new(&xlimits).levels(&vec![n_levels; n_factors])
}
