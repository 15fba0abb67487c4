use crate::criteria::{Criterion, CriterionContext};
use crate::errors::{OptimalError, Result};
use crate::information::Spectrum;
use crate::score::{exceeds, Score};
use linfa::Float;
use ndarray::{Array2, ArrayBase, ArrayView1, Axis, Data, Ix1, Ix2};

/// Default maximum number of iterations of exchange strategies
pub const DEFAULT_MAX_ITER: usize = 200;
/// Default maximum excursion depth of the DETMAX strategy
pub const DEFAULT_MAX_EXCURSION: usize = 4;

/// Relative regularization of the information matrix used to rank
/// designs which are both undesirable
const VOLUME_REGULARIZATION: f64 = 1e-6;

/// The evaluation of a design during the search.
///
/// Two undesirable designs are ranked by the regularized log-volume of their
/// information matrix which grows with the rank, so that searches starting
/// from degenerate designs still move towards full rank designs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation<F: Float> {
    /// Criterion score
    pub score: Score<F>,
    /// Regularized log-volume, only meaningful when the score is undesirable
    pub volume: F,
}

impl<F: Float> Evaluation<F> {
    /// Whether this evaluation is strictly better than `other`
    pub fn improves_on(&self, other: &Evaluation<F>) -> bool {
        if self.score.is_undesirable() && other.score.is_undesirable() {
            exceeds(self.volume, other.volume)
        } else {
            self.score.improves_on(&other.score)
        }
    }
}

/// A validated optimal design problem: select `n_points` rows (repetition allowed)
/// within a candidate set maximizing a criterion under a polynomial model.
#[derive(Clone, Debug)]
pub struct DesignProblem<F: Float> {
    candidates: Array2<F>,
    context: CriterionContext<F>,
    criterion: Criterion,
    n_points: usize,
    max_iter: usize,
    max_excursion: usize,
    epsilon: F,
}

impl<F: Float> DesignProblem<F> {
    /// Problem of selecting `n_points` within (n0, nx) `candidates` using the
    /// polynomial model of given `degree`, the `criterion` being computed on
    /// the information matrix augmented with `alpha`.
    ///
    /// Fails with [`OptimalError::InvalidConfig`] when `n_points` or `degree` is 0,
    /// when candidates are empty or not finite, or when `alpha` is negative.
    pub fn new(
        candidates: &ArrayBase<impl Data<Elem = F>, Ix2>,
        n_points: usize,
        degree: usize,
        criterion: Criterion,
        alpha: F,
    ) -> Result<Self> {
        if n_points < 1 {
            return Err(OptimalError::InvalidConfig(
                "number of points should be a positive integer".to_string(),
            ));
        }
        if degree < 1 {
            return Err(OptimalError::InvalidConfig(
                "model degree should be a positive integer".to_string(),
            ));
        }
        if candidates.nrows() == 0 || candidates.ncols() == 0 {
            return Err(OptimalError::InvalidConfig(format!(
                "candidate set should be a non empty (n0, nx) matrix, got {:?}",
                candidates.dim()
            )));
        }
        if candidates.iter().any(|v| !v.is_finite()) {
            return Err(OptimalError::InvalidConfig(
                "candidate set should only contain finite values".to_string(),
            ));
        }
        if !(alpha >= F::zero() && alpha.is_finite()) {
            return Err(OptimalError::InvalidConfig(format!(
                "alpha should be a finite non negative value, got {alpha}"
            )));
        }

        let context = CriterionContext::new(candidates, degree)?.alpha(alpha);
        let p = context.n_terms();
        let trace = context.moment().diag().sum();
        let scale = if trace > F::zero() {
            trace / F::cast(p)
        } else {
            F::one()
        };
        Ok(DesignProblem {
            candidates: candidates.to_owned(),
            context,
            criterion,
            n_points,
            max_iter: DEFAULT_MAX_ITER,
            max_excursion: DEFAULT_MAX_EXCURSION,
            epsilon: F::cast(VOLUME_REGULARIZATION) * scale,
        })
    }

    /// Sets the maximum number of iterations (sweeps or cycles) of the strategies
    pub fn max_iter(mut self, max_iter: usize) -> Result<Self> {
        if max_iter < 1 {
            return Err(OptimalError::InvalidConfig(
                "max_iter should be a positive integer".to_string(),
            ));
        }
        self.max_iter = max_iter;
        Ok(self)
    }

    /// Sets the deepest excursion tried by the DETMAX strategy
    pub fn max_excursion(mut self, max_excursion: usize) -> Result<Self> {
        if max_excursion < 1 {
            return Err(OptimalError::InvalidConfig(
                "max_excursion should be a positive integer".to_string(),
            ));
        }
        self.max_excursion = max_excursion;
        Ok(self)
    }

    /// Sets the C criterion contrast vector
    pub fn contrast(mut self, contrast: &ArrayBase<impl Data<Elem = F>, Ix1>) -> Result<Self> {
        self.context = self.context.contrast(contrast)?;
        Ok(self)
    }

    /// Sets the V criterion reference points
    pub fn reference(mut self, points: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Result<Self> {
        self.context = self.context.reference(points)?;
        Ok(self)
    }

    /// Sets the T criterion rival model degree
    pub fn rival_degree(mut self, rival_degree: usize) -> Result<Self> {
        self.context = self.context.rival_degree(rival_degree)?;
        Ok(self)
    }

    /// Raw candidate set
    pub fn candidates(&self) -> &Array2<F> {
        &self.candidates
    }

    /// Number of candidates n0
    pub fn n_candidates(&self) -> usize {
        self.candidates.nrows()
    }

    /// Number of points of the design
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Criterion to maximize
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Criterion evaluation context
    pub fn context(&self) -> &CriterionContext<F> {
        &self.context
    }

    /// Maximum number of iterations of the strategies
    pub fn get_max_iter(&self) -> usize {
        self.max_iter
    }

    /// Deepest DETMAX excursion
    pub fn get_max_excursion(&self) -> usize {
        self.max_excursion
    }

    /// Initial design of exchange strategies: candidates 0, 1, ..., n_points - 1
    /// taken modulo the number of candidates
    pub fn seed_design(&self) -> Vec<usize> {
        (0..self.n_points).map(|i| i % self.n_candidates()).collect()
    }

    /// Expanded model row of the given candidate
    pub fn model_row(&self, candidate: usize) -> ArrayView1<F> {
        self.context.candidates().row(candidate)
    }

    /// X^T.X of the design made of the given candidate `indices`
    pub fn information(&self, indices: &[usize]) -> Array2<F> {
        let x = self.context.candidates().select(Axis(0), indices);
        x.t().dot(&x)
    }

    /// Evaluates the design given its information matrix X^T.X
    pub fn evaluate(&self, xtx: &Array2<F>) -> Evaluation<F> {
        let score = self.criterion.evaluate(xtx, &self.context);
        let volume = if score.is_undesirable() {
            Spectrum::new(xtx)
                .map(|s| s.log_volume(self.epsilon))
                .unwrap_or_else(|_| F::neg_infinity())
        } else {
            F::zero()
        };
        Evaluation { score, volume }
    }

    /// Raw points of the design made of the given candidate `indices`
    pub fn points(&self, indices: &[usize]) -> Array2<F> {
        self.candidates.select(Axis(0), indices)
    }
}
