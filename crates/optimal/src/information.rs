//! Information matrix computations: ridge augmentation, spectral analysis,
//! inversion with explicit handling of singular matrices.

use crate::errors::Result;
use linfa::Float;
use linfa_linalg::cholesky::InverseC;
use linfa_linalg::eigh::Eigh;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};

/// Relative tolerance on eigenvalues under which a symmetric matrix is
/// considered singular: `lambda_min <= SINGULARITY_TOL * max(1, lambda_max)`
pub const SINGULARITY_TOL: f64 = 1e-10;

/// Computes the information matrix X^T.X + alpha.I of the (n, p) design matrix `x`.
///
/// The result may be singular (n < p or collinear rows), this is not an error.
pub fn information_matrix<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>, alpha: F) -> Array2<F> {
    augmented(&x.t().dot(x), alpha)
}

/// Returns `xtx + alpha.I`
pub(crate) fn augmented<F: Float>(xtx: &Array2<F>, alpha: F) -> Array2<F> {
    let mut m = xtx.to_owned();
    if alpha > F::zero() {
        m.diag_mut().mapv_inplace(|v| v + alpha);
    }
    m
}

/// Adds `weight * row.row^T` to the symmetric matrix `m` in place.
///
/// With weight 1 (resp. -1) this updates (resp. downdates) X^T.X
/// when the `row` of the design matrix is added (resp. removed).
pub fn rank_one_update<F: Float>(
    m: &mut Array2<F>,
    row: &ArrayBase<impl Data<Elem = F>, Ix1>,
    weight: F,
) {
    let p = row.len();
    for i in 0..p {
        let wi = weight * row[i];
        for j in 0..p {
            m[[i, j]] += wi * row[j];
        }
    }
}

/// Eigen decomposition of a symmetric matrix
#[derive(Clone, Debug)]
pub struct Spectrum<F: Float> {
    eigvals: Array1<F>,
    eigvecs: Array2<F>,
}

impl<F: Float> Spectrum<F> {
    /// Eigen decomposition of the symmetric matrix `m`
    pub fn new(m: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Self> {
        let (eigvals, eigvecs) = m.eigh()?;
        Ok(Spectrum { eigvals, eigvecs })
    }

    /// Eigenvalues (not sorted)
    pub fn eigvals(&self) -> &Array1<F> {
        &self.eigvals
    }

    /// Smallest eigenvalue
    pub fn min(&self) -> F {
        self.eigvals.fold(F::infinity(), |acc, &v| acc.min(v))
    }

    /// Largest eigenvalue
    pub fn max(&self) -> F {
        self.eigvals.fold(F::neg_infinity(), |acc, &v| acc.max(v))
    }

    fn tolerance(&self) -> F {
        F::cast(SINGULARITY_TOL) * F::one().max(self.max())
    }

    /// Whether the matrix is singular with regard to [`SINGULARITY_TOL`]
    pub fn is_singular(&self) -> bool {
        self.eigvals.is_empty() || !(self.min() > self.tolerance())
    }

    /// Determinant as the product of eigenvalues, 0 when singular
    pub fn determinant(&self) -> F {
        if self.is_singular() {
            F::zero()
        } else {
            self.eigvals.product()
        }
    }

    /// Sum of the logarithms of the eigenvalues shifted by `eps`,
    /// negative eigenvalues (rounding errors) being taken as 0.
    ///
    /// This is the log-determinant of the matrix regularized by eps.I,
    /// it increases with the rank then with the volume of the matrix.
    pub fn log_volume(&self, eps: F) -> F {
        self.eigvals
            .fold(F::zero(), |acc, &v| acc + (v.max(F::zero()) + eps).ln())
    }

    /// Moore-Penrose pseudo-inverse: eigenvalues under tolerance are discarded
    pub fn pseudo_inverse(&self) -> Array2<F> {
        let tol = self.tolerance();
        let inv_vals = self
            .eigvals
            .mapv(|v| if v > tol { F::one() / v } else { F::zero() });
        let scaled = &self.eigvecs * &inv_vals.insert_axis(Axis(0));
        scaled.dot(&self.eigvecs.t())
    }

    /// Inverse of the decomposed matrix `m` (see [`invert`])
    pub fn inverse(&self, m: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Inverse<F> {
        if self.is_singular() {
            return Inverse {
                matrix: self.pseudo_inverse(),
                singular: true,
            };
        }
        let matrix = match m.invc() {
            Ok(inv) => inv,
            Err(_) => self.pseudo_inverse(),
        };
        Inverse {
            matrix,
            singular: false,
        }
    }
}

/// Inverse of an information matrix
#[derive(Clone, Debug)]
pub struct Inverse<F: Float> {
    /// Exact inverse when `singular` is false, pseudo-inverse otherwise
    pub matrix: Array2<F>,
    /// Whether the inverted matrix was singular
    pub singular: bool,
}

/// Inverts the symmetric positive semi-definite matrix `m`.
///
/// The exact inverse (Cholesky based) is returned when `m` is well conditioned,
/// otherwise the pseudo-inverse is returned, flagged as singular.
/// Only fails when the eigen decomposition itself fails.
pub fn invert<F: Float>(m: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Inverse<F>> {
    Ok(Spectrum::new(m)?.inverse(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_information_matrix() {
        let x = array![[1., -1.], [1., 1.]];
        assert_abs_diff_eq!(array![[2., 0.], [0., 2.]], information_matrix(&x, 0.));
        assert_abs_diff_eq!(array![[2.5, 0.], [0., 2.5]], information_matrix(&x, 0.5));
    }

    #[test]
    fn test_rank_one_update() {
        let x = array![[1., 2., 3.], [1., -1., 0.5], [1., 0., 2.]];
        let mut m = Array2::zeros((3, 3));
        for row in x.outer_iter() {
            rank_one_update(&mut m, &row, 1.);
        }
        assert_abs_diff_eq!(x.t().dot(&x), m, epsilon = 1e-12);
        rank_one_update(&mut m, &x.row(1), -1.);
        let rest = array![[1., 2., 3.], [1., 0., 2.]];
        assert_abs_diff_eq!(rest.t().dot(&rest), m, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_regular() {
        let m = array![[4., 1.], [1., 3.]];
        let inv = invert(&m).unwrap();
        assert!(!inv.singular);
        assert_abs_diff_eq!(Array2::<f64>::eye(2), m.dot(&inv.matrix), epsilon = 1e-10);
    }

    #[test]
    fn test_invert_singular() {
        let x = array![[1., 1., 1.], [1., -1., 1.]];
        let m = information_matrix(&x, 0.);
        let inv = invert(&m).unwrap();
        assert!(inv.singular);
        // Moore-Penrose condition: M.M+.M = M
        assert_abs_diff_eq!(m, m.dot(&inv.matrix).dot(&m), epsilon = 1e-10);
    }

    #[test]
    fn test_spectrum() {
        let m = array![[2., 0., 0.], [0., 3., 0.], [0., 0., 4.]];
        let spectrum = Spectrum::new(&m).unwrap();
        assert_abs_diff_eq!(24., spectrum.determinant(), epsilon = 1e-10);
        assert_abs_diff_eq!(2., spectrum.min(), epsilon = 1e-10);
        let mut eigvals: Vec<f64> = spectrum.eigvals().to_vec();
        eigvals.sort_by(|a, b| a.total_cmp(b));
        assert_abs_diff_eq!(array![2., 3., 4.], Array1::from(eigvals), epsilon = 1e-10);
        assert_abs_diff_eq!((24f64).ln(), spectrum.log_volume(0.), epsilon = 1e-10);
        assert!(!spectrum.is_singular());

        let singular = Spectrum::new(&array![[1., 1.], [1., 1.]]).unwrap();
        assert!(singular.is_singular());
        assert_eq!(0., singular.determinant());
        assert!(singular.log_volume(1e-6) < Spectrum::new(&m).unwrap().log_volume(1e-6));
    }
}
