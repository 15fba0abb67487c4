//! A module for the polynomial regression model used to score designs.
//!
//! A point x = (x_1, ..., x_k) is expanded into the regression basis
//! `[1, x_1, ..., x_k, { x_i * x_j, i <= j }, { x_i * x_j * x_l, i <= j <= l }, ...]`
//! up to the requested degree. Within a given degree, monomials are ordered
//! lexicographically on their non-decreasing factor indices. Hence the basis
//! of degree d' < d is the prefix of the basis of degree d.

use crate::errors::{OptimalError, Result};
use linfa::Float;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A trait for regression models expanding factor space points
/// into regression basis functions values.
pub trait RegressionModel<F: Float>: Clone + Copy + Default + fmt::Display + Sync {
    /// Compute the regression basis values for the given `x` points
    /// specified as (n, nx) matrix. Returns a (n, p) matrix.
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F>;

    /// Number of basis functions for `nx`-dimensional points
    fn n_terms(&self, nx: usize) -> usize;
}

/// A full polynomial model of given degree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct PolynomialModel {
    degree: usize,
}

impl Default for PolynomialModel {
    fn default() -> Self {
        PolynomialModel { degree: 1 }
    }
}

impl PolynomialModel {
    /// Polynomial model of given `degree`, fails if degree is 0.
    pub fn new(degree: usize) -> Result<Self> {
        if degree < 1 {
            return Err(OptimalError::InvalidModel(
                "polynomial degree should be at least 1".to_string(),
            ));
        }
        Ok(PolynomialModel { degree })
    }

    /// Degree of the polynomial
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Monomials of the basis as lists of factor indices,
    /// the intercept being the empty list.
    pub fn terms(&self, nx: usize) -> Vec<Vec<usize>> {
        let mut terms = vec![vec![]];
        if nx == 0 {
            return terms;
        }
        for d in 1..=self.degree {
            let mut current = vec![0; d];
            loop {
                terms.push(current.clone());
                // rightmost index which can still be incremented
                match current.iter().rposition(|&i| i < nx - 1) {
                    Some(pos) => {
                        let next = current[pos] + 1;
                        current[pos..].iter_mut().for_each(|i| *i = next);
                    }
                    None => break,
                }
            }
        }
        terms
    }
}

impl<F: Float> RegressionModel<F> for PolynomialModel {
    fn value(&self, x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
        let terms = self.terms(x.ncols());
        Array2::from_shape_fn((x.nrows(), terms.len()), |(i, j)| {
            terms[j].iter().fold(F::one(), |acc, &k| acc * x[[i, k]])
        })
    }

    fn n_terms(&self, nx: usize) -> usize {
        n_terms(nx, self.degree)
    }
}

impl fmt::Display for PolynomialModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PolynomialModel(degree={})", self.degree)
    }
}

/// Number of terms of the full polynomial of given `degree` in `nx` variables,
/// that is the binomial coefficient C(nx + degree, degree).
pub fn n_terms(nx: usize, degree: usize) -> usize {
    (1..=degree).fold(1, |acc, i| acc * (nx + i) / i)
}

/// Expands the (n, nx) `points` into the (n, p) design matrix of the
/// polynomial model of given `degree`.
///
/// Fails when `degree` is 0 or when points have no component.
pub fn build_design_matrix<F: Float>(
    points: &ArrayBase<impl Data<Elem = F>, Ix2>,
    degree: usize,
) -> Result<Array2<F>> {
    let model = PolynomialModel::new(degree)?;
    if points.ncols() < 1 {
        return Err(OptimalError::InvalidModel(
            "points should have at least one factor".to_string(),
        ));
    }
    Ok(model.value(points))
}

/// Uniform moment matrix X0^T.X0 / N0 of the expanded candidate set `x0`.
///
/// It is the average information brought by a single candidate and is used
/// to approximate the integrated prediction variance over the candidate region.
pub fn build_uniform_moment_matrix<F: Float>(x0: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
    let n0 = x0.nrows();
    if n0 == 0 {
        return Array2::zeros((x0.ncols(), x0.ncols()));
    }
    x0.t().dot(x0) / F::cast(n0)
}
