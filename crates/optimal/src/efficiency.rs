//! Design efficiencies expressed in percent.
//!
//! Efficiencies compare the information of a n-run design to the
//! ideal orthogonal design where X^T.X = n.I, they lie in (0, 100]
//! for non degenerate designs scaled within [-1, 1].

use crate::information::{information_matrix, Spectrum};
use linfa::Float;
use ndarray::{ArrayBase, Data, Ix2};

/// D-efficiency `100 * det(X^T.X)^(1/p) / n` of the (n, p) design matrix `x`.
///
/// Returns 0 when X^T.X is singular.
pub fn d_efficiency<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    let (n, p) = x.dim();
    if n == 0 || p == 0 {
        return F::zero();
    }
    let spectrum = match Spectrum::new(&information_matrix(x, F::zero())) {
        Ok(spectrum) => spectrum,
        Err(_) => return F::zero(),
    };
    if spectrum.is_singular() {
        return F::zero();
    }
    // geometric mean of eigenvalues computed in log space to avoid overflow
    let log_det = spectrum.log_volume(F::zero());
    let eff = F::cast(100.) * (log_det / F::cast(p)).exp() / F::cast(n);
    if eff.is_finite() {
        eff
    } else {
        F::zero()
    }
}

/// A-efficiency `100 * p / (n * trace((X^T.X)^-1))` of the (n, p) design matrix `x`.
///
/// Returns 0 when X^T.X is singular.
pub fn a_efficiency<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    let (n, p) = x.dim();
    if n == 0 || p == 0 {
        return F::zero();
    }
    let m = information_matrix(x, F::zero());
    let inverse = match Spectrum::new(&m) {
        Ok(spectrum) => spectrum.inverse(&m),
        Err(_) => return F::zero(),
    };
    if inverse.singular {
        return F::zero();
    }
    let trace = inverse.matrix.diag().sum();
    if trace > F::zero() && trace.is_finite() {
        F::cast(100. * p as f64) / (F::cast(n) * trace)
    } else {
        F::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_design_matrix;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_orthogonal_design_is_fully_efficient() {
        let points = array![[-1., -1.], [-1., 1.], [1., -1.], [1., 1.]];
        let x = build_design_matrix(&points, 1).unwrap();
        assert_abs_diff_eq!(100., d_efficiency(&x), epsilon = 1e-9);
        assert_abs_diff_eq!(100., a_efficiency(&x), epsilon = 1e-9);
    }

    #[test]
    fn test_efficiencies_in_range() {
        let points = array![[-1., -1.], [0., 1.], [1., -0.5], [0.5, 0.5], [-0.2, 0.1]];
        let x = build_design_matrix(&points, 1).unwrap();
        let d_eff = d_efficiency(&x);
        let a_eff = a_efficiency(&x);
        assert!(d_eff > 0. && d_eff <= 100., "d_eff = {d_eff}");
        assert!(a_eff > 0. && a_eff <= 100., "a_eff = {a_eff}");
        // A-efficiency never exceeds D-efficiency (harmonic vs geometric mean)
        assert!(a_eff <= d_eff + 1e-9);
    }

    #[test]
    fn test_singular_design_efficiencies() {
        let points = array![[-1., -1.], [1., 1.]];
        let x = build_design_matrix(&points, 1).unwrap();
        assert_eq!(0., d_efficiency(&x));
        assert_eq!(0., a_efficiency(&x));
    }
}
