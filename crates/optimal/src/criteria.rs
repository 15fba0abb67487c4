//! Optimality criteria used to rank designs.
//!
//! Every criterion is expressed as a score to maximize computed from the
//! information matrix M = X^T.X + alpha.I of a design:
//!
//! | Criterion | Score |
//! |---|---|
//! | D | det(M) |
//! | A | -trace(M^-1) |
//! | I | -trace(M^-1 . Mbar) with Mbar the candidates moment matrix |
//! | C | -c^T.M^-1.c |
//! | E | smallest eigenvalue of M |
//! | G | -max of x^T.M^-1.x over candidates x |
//! | V | -mean of x^T.M^-1.x over reference points x |
//! | S | det(M) / prod(M_ii) |
//! | T | lack of fit of a nested rival model |
//!
//! When M is singular the criterion (except T) is [`Score::Undesirable`].

use crate::errors::{OptimalError, Result};
use crate::information::{augmented, information_matrix, Spectrum};
use crate::model::{build_design_matrix, build_uniform_moment_matrix, n_terms};
use crate::score::Score;
use linfa::Float;
use ndarray::{s, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use ndarray_stats::QuantileExt;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Optimality criteria
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Criterion {
    /// Determinant of the information matrix
    #[default]
    D,
    /// Trace of the inverse information matrix (average variance of estimates)
    A,
    /// Integrated prediction variance over the candidate region
    I,
    /// Variance of a linear combination of the parameters
    C,
    /// Smallest eigenvalue of the information matrix
    E,
    /// Maximum prediction variance over the candidates
    G,
    /// Average prediction variance over reference points
    V,
    /// Mutual orthogonality of the model columns
    S,
    /// Discrimination against a nested rival model
    T,
}

impl Criterion {
    /// All available criteria
    pub const ALL: [Criterion; 9] = [
        Criterion::D,
        Criterion::A,
        Criterion::I,
        Criterion::C,
        Criterion::E,
        Criterion::G,
        Criterion::V,
        Criterion::S,
        Criterion::T,
    ];

    /// Criterion score of a design given its unaugmented information matrix `xtx` = X^T.X
    pub fn evaluate<F: Float>(&self, xtx: &Array2<F>, ctx: &CriterionContext<F>) -> Score<F> {
        let m = augmented(xtx, ctx.alpha);
        let score = match self {
            Criterion::D => d_value(&m),
            Criterion::A => a_value(&m),
            Criterion::I => i_value(&m, &ctx.moment),
            Criterion::C => c_value(&m, ctx.contrast.as_ref()),
            Criterion::E => e_value(&m),
            Criterion::G => g_value(&m, &ctx.candidates),
            Criterion::V => v_value(&m, ctx.reference.as_ref().unwrap_or(&ctx.candidates)),
            Criterion::S => s_value(&m),
            Criterion::T => t_value(&m, ctx.rival_terms),
        };
        score.unwrap_or(Score::Undesirable)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Criterion::D => "D",
            Criterion::A => "A",
            Criterion::I => "I",
            Criterion::C => "C",
            Criterion::E => "E",
            Criterion::G => "G",
            Criterion::V => "V",
            Criterion::S => "S",
            Criterion::T => "T",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Criterion {
    type Err = OptimalError;

    fn from_str(s: &str) -> Result<Self> {
        Criterion::ALL
            .iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| {
                OptimalError::InvalidConfig(format!(
                    "Unknown criterion '{s}', expected one of D, A, I, C, E, G, V, S, T"
                ))
            })
    }
}

/// Data shared by criterion evaluations of designs selected
/// within a given candidate set.
#[derive(Clone, Debug)]
pub struct CriterionContext<F: Float> {
    /// Ridge augmentation parameter
    pub(crate) alpha: F,
    /// Expanded candidate set X0
    pub(crate) candidates: Array2<F>,
    /// Uniform moment matrix of the candidates
    pub(crate) moment: Array2<F>,
    /// Contrast vector of the C criterion, all ones when not specified
    pub(crate) contrast: Option<Array1<F>>,
    /// Expanded reference points of the V criterion, candidates when not specified
    pub(crate) reference: Option<Array2<F>>,
    /// Number of leading model columns of the T criterion rival model
    pub(crate) rival_terms: usize,
    degree: usize,
    n_factors: usize,
}

impl<F: Float> CriterionContext<F> {
    /// Context for designs selected within the (n0, nx) `candidates` points
    /// under the polynomial model of given `degree`.
    ///
    /// The T criterion rival model defaults to the polynomial of `degree - 1`.
    pub fn new(candidates: &ArrayBase<impl Data<Elem = F>, Ix2>, degree: usize) -> Result<Self> {
        let x0 = build_design_matrix(candidates, degree)?;
        let moment = build_uniform_moment_matrix(&x0);
        Ok(CriterionContext {
            alpha: F::zero(),
            candidates: x0,
            moment,
            contrast: None,
            reference: None,
            rival_terms: n_terms(candidates.ncols(), degree - 1),
            degree,
            n_factors: candidates.ncols(),
        })
    }

    /// Sets the ridge augmentation parameter
    pub fn alpha(mut self, alpha: F) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the contrast vector of the C criterion, its length should be
    /// the number of model terms
    pub fn contrast(mut self, contrast: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Self> {
        if contrast.len() != self.n_terms() {
            return Err(OptimalError::InvalidConfig(format!(
                "contrast vector length ({}) should match the number of model terms ({})",
                contrast.len(),
                self.n_terms()
            )));
        }
        self.contrast = Some(contrast.to_owned());
        Ok(self)
    }

    /// Sets the (n, nx) reference points of the V criterion
    pub fn reference(mut self, points: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Self> {
        if points.nrows() == 0 || points.ncols() != self.n_factors() {
            return Err(OptimalError::InvalidConfig(format!(
                "reference points should be a non empty (n, {}) matrix, got {:?}",
                self.n_factors(),
                points.dim()
            )));
        }
        self.reference = Some(build_design_matrix(points, self.degree)?);
        Ok(self)
    }

    /// Sets the degree of the T criterion rival model, it should be lower than the model degree
    pub fn rival_degree(mut self, rival_degree: usize) -> Result<Self> {
        if rival_degree >= self.degree {
            return Err(OptimalError::InvalidConfig(format!(
                "rival model degree ({rival_degree}) should be lower than model degree ({})",
                self.degree
            )));
        }
        self.rival_terms = n_terms(self.n_factors(), rival_degree);
        Ok(self)
    }

    /// Expanded candidate set
    pub fn candidates(&self) -> &Array2<F> {
        &self.candidates
    }

    /// Uniform moment matrix of the candidates
    pub fn moment(&self) -> &Array2<F> {
        &self.moment
    }

    /// Number of model terms p
    pub fn n_terms(&self) -> usize {
        self.candidates.ncols()
    }

    /// Number of factors nx of the candidate points
    pub fn n_factors(&self) -> usize {
        self.n_factors
    }
}

/// Criterion score of the (n, p) design matrix `x` within the given context
pub fn criterion_value<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    criterion: Criterion,
    ctx: &CriterionContext<F>,
) -> Score<F> {
    criterion.evaluate(&x.t().dot(x), ctx)
}

/// D-optimality score det(X^T.X + alpha.I)
pub fn d_optimality<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>, alpha: F) -> Score<F> {
    d_value(&information_matrix(x, alpha)).unwrap_or(Score::Undesirable)
}

/// A-optimality score -trace(M^-1)
pub fn a_optimality<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>, alpha: F) -> Score<F> {
    a_value(&information_matrix(x, alpha)).unwrap_or(Score::Undesirable)
}

/// I-optimality score -trace(M^-1 . moment)
pub fn i_optimality<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    moment: &Array2<F>,
    alpha: F,
) -> Score<F> {
    i_value(&information_matrix(x, alpha), moment).unwrap_or(Score::Undesirable)
}

/// C-optimality score -c^T.M^-1.c, `contrast` defaults to the all-ones vector
pub fn c_optimality<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    contrast: Option<&Array1<F>>,
    alpha: F,
) -> Score<F> {
    c_value(&information_matrix(x, alpha), contrast).unwrap_or(Score::Undesirable)
}

/// E-optimality score, the smallest eigenvalue of M
pub fn e_optimality<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>, alpha: F) -> Score<F> {
    e_value(&information_matrix(x, alpha)).unwrap_or(Score::Undesirable)
}

/// G-optimality score, minus the maximum prediction variance over the expanded `candidates`
pub fn g_optimality<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    candidates: &Array2<F>,
    alpha: F,
) -> Score<F> {
    g_value(&information_matrix(x, alpha), candidates).unwrap_or(Score::Undesirable)
}

/// V-optimality score, minus the average prediction variance over the expanded `reference` points
pub fn v_optimality<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    reference: &Array2<F>,
    alpha: F,
) -> Score<F> {
    v_value(&information_matrix(x, alpha), reference).unwrap_or(Score::Undesirable)
}

/// S-optimality score det(M) / prod(M_ii)
pub fn s_optimality<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>, alpha: F) -> Score<F> {
    s_value(&information_matrix(x, alpha)).unwrap_or(Score::Undesirable)
}

/// T-optimality score: sum over the model columns of the residual sum of squares
/// left by the least-squares fit of the rival model made of the first `rival_terms` columns.
pub fn t_optimality<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    rival_terms: usize,
    alpha: F,
) -> Score<F> {
    t_value(&information_matrix(x, alpha), rival_terms).unwrap_or(Score::Undesirable)
}

fn d_value<F: Float>(m: &Array2<F>) -> Result<Score<F>> {
    let spectrum = Spectrum::new(m)?;
    if spectrum.is_singular() {
        return Ok(Score::Undesirable);
    }
    Ok(Score::new(spectrum.determinant()))
}

/// M^-1 when M is regular
fn regular_inverse<F: Float>(m: &Array2<F>) -> Result<Option<Array2<F>>> {
    let inv = Spectrum::new(m)?.inverse(m);
    Ok((!inv.singular).then_some(inv.matrix))
}

/// Prediction variances x^T.M^-1.x of the rows of `points`
fn variances<F: Float>(inv: &Array2<F>, points: &Array2<F>) -> Array1<F> {
    (points.dot(inv) * points).sum_axis(Axis(1))
}

fn a_value<F: Float>(m: &Array2<F>) -> Result<Score<F>> {
    Ok(regular_inverse(m)?.map_or(Score::Undesirable, |inv| Score::new(-inv.diag().sum())))
}

fn i_value<F: Float>(m: &Array2<F>, moment: &Array2<F>) -> Result<Score<F>> {
    // trace(A.B) = sum(A * B^T) and the moment matrix is symmetric
    Ok(regular_inverse(m)?.map_or(Score::Undesirable, |inv| Score::new(-(inv * moment).sum())))
}

fn c_value<F: Float>(m: &Array2<F>, contrast: Option<&Array1<F>>) -> Result<Score<F>> {
    let ones = Array1::ones(m.nrows());
    let c = contrast.unwrap_or(&ones);
    Ok(regular_inverse(m)?.map_or(Score::Undesirable, |inv| Score::new(-c.dot(&inv.dot(c)))))
}

fn e_value<F: Float>(m: &Array2<F>) -> Result<Score<F>> {
    let spectrum = Spectrum::new(m)?;
    if spectrum.is_singular() {
        return Ok(Score::Undesirable);
    }
    Ok(Score::new(spectrum.min()))
}

fn g_value<F: Float>(m: &Array2<F>, candidates: &Array2<F>) -> Result<Score<F>> {
    Ok(regular_inverse(m)?.map_or(Score::Undesirable, |inv| {
        variances(&inv, candidates)
            .max()
            .map_or(Score::Undesirable, |v| Score::new(-*v))
    }))
}

fn v_value<F: Float>(m: &Array2<F>, reference: &Array2<F>) -> Result<Score<F>> {
    Ok(regular_inverse(m)?.map_or(Score::Undesirable, |inv| {
        variances(&inv, reference)
            .mean()
            .map_or(Score::Undesirable, |v| Score::new(-v))
    }))
}

fn s_value<F: Float>(m: &Array2<F>) -> Result<Score<F>> {
    let spectrum = Spectrum::new(m)?;
    if spectrum.is_singular() {
        return Ok(Score::Undesirable);
    }
    let diag_product = m.diag().product();
    if diag_product <= F::zero() {
        return Ok(Score::Undesirable);
    }
    Ok(Score::new(spectrum.determinant() / diag_product))
}

fn t_value<F: Float>(m: &Array2<F>, rival_terms: usize) -> Result<Score<F>> {
    let p2 = rival_terms.min(m.nrows());
    let total = m.diag().sum();
    if p2 == 0 {
        return Ok(Score::new(total));
    }
    let m12 = m.slice(s![.., ..p2]);
    let m22_pinv = Spectrum::new(&m.slice(s![..p2, ..p2]))?.pseudo_inverse();
    let explained = (m12.dot(&m22_pinv) * m12).sum();
    Ok(Score::new(total - explained))
}
