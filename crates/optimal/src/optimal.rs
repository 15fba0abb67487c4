use crate::algorithms::Method;
use crate::criteria::Criterion;
use crate::efficiency::{a_efficiency, d_efficiency};
use crate::errors::{OptimalError, Result};
use crate::information::Spectrum;
use crate::problem::{DesignProblem, DEFAULT_MAX_EXCURSION, DEFAULT_MAX_ITER};
use crate::score::Score;
use linfa::{Float, ParamGuard};
use log::info;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix2};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// A set of validated optimal design parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct OptimalDesignValidParams<F: Float> {
    /// Number of points of the design
    pub(crate) n_points: usize,
    /// Degree of the polynomial regression model
    pub(crate) degree: usize,
    /// Criterion to maximize
    pub(crate) criterion: Criterion,
    /// Search strategy
    pub(crate) method: Method,
    /// Ridge augmentation of the information matrix
    pub(crate) alpha: F,
    /// Maximum number of iterations of the strategy
    pub(crate) max_iter: usize,
    /// Deepest DETMAX excursion
    pub(crate) max_excursion: usize,
    /// C criterion contrast vector
    pub(crate) contrast: Option<Array1<F>>,
    /// V criterion reference points
    pub(crate) reference: Option<Array2<F>>,
    /// T criterion rival model degree
    pub(crate) rival_degree: Option<usize>,
}

impl<F: Float> Default for OptimalDesignValidParams<F> {
    fn default() -> OptimalDesignValidParams<F> {
        OptimalDesignValidParams {
            n_points: 1,
            degree: 1,
            criterion: Criterion::default(),
            method: Method::default(),
            alpha: F::zero(),
            max_iter: DEFAULT_MAX_ITER,
            max_excursion: DEFAULT_MAX_EXCURSION,
            contrast: None,
            reference: None,
            rival_degree: None,
        }
    }
}

impl<F: Float> OptimalDesignValidParams<F> {
    /// Get the number of points of the design
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Get the polynomial model degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Get the criterion
    pub fn criterion(&self) -> Criterion {
        self.criterion
    }

    /// Get the search strategy
    pub fn method(&self) -> Method {
        self.method
    }

    /// Get the ridge augmentation parameter
    pub fn alpha(&self) -> F {
        self.alpha
    }

    /// Get the maximum number of iterations
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Get the deepest DETMAX excursion
    pub fn max_excursion(&self) -> usize {
        self.max_excursion
    }

    /// Builds the design problem over the given candidates
    pub fn problem(
        &self,
        candidates: &ArrayBase<impl Data<Elem = F>, Ix2>,
    ) -> Result<DesignProblem<F>> {
        let mut problem =
            DesignProblem::new(candidates, self.n_points, self.degree, self.criterion, self.alpha)?
                .max_iter(self.max_iter)?
                .max_excursion(self.max_excursion)?;
        if let Some(contrast) = self.contrast.as_ref() {
            problem = problem.contrast(contrast)?;
        }
        if let Some(reference) = self.reference.as_ref() {
            problem = problem.reference(reference)?;
        }
        if let Some(rival_degree) = self.rival_degree {
            problem = problem.rival_degree(rival_degree)?;
        }
        Ok(problem)
    }
}

/// The set of parameters that can be specified for the generation
/// of an [optimal design](optimal_design).
#[derive(Clone, Debug)]
pub struct OptimalDesignParams<F: Float>(OptimalDesignValidParams<F>);

impl<F: Float> OptimalDesignParams<F> {
    /// Parameters of a design of `n_points` points for the polynomial model of given `degree`
    pub fn new(n_points: usize, degree: usize) -> OptimalDesignParams<F> {
        Self(OptimalDesignValidParams {
            n_points,
            degree,
            ..Default::default()
        })
    }

    /// Set the criterion to maximize
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.0.criterion = criterion;
        self
    }

    /// Set the search strategy
    pub fn method(mut self, method: Method) -> Self {
        self.0.method = method;
        self
    }

    /// Set the ridge augmentation parameter alpha >= 0,
    /// criteria are computed on X^T.X + alpha.I
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Set the maximum number of iterations (sweeps, swaps or excursions)
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.0.max_iter = max_iter;
        self
    }

    /// Set the deepest excursion of the DETMAX strategy
    pub fn max_excursion(mut self, max_excursion: usize) -> Self {
        self.0.max_excursion = max_excursion;
        self
    }

    /// Set the contrast vector of the C criterion (default to all ones)
    pub fn contrast(mut self, contrast: Array1<F>) -> Self {
        self.0.contrast = Some(contrast);
        self
    }

    /// Set the reference points of the V criterion (default to the candidates)
    pub fn reference(mut self, reference: Array2<F>) -> Self {
        self.0.reference = Some(reference);
        self
    }

    /// Set the rival model degree of the T criterion (default to degree - 1)
    pub fn rival_degree(mut self, rival_degree: usize) -> Self {
        self.0.rival_degree = Some(rival_degree);
        self
    }
}

impl<F: Float> From<OptimalDesignValidParams<F>> for OptimalDesignParams<F> {
    fn from(valid: OptimalDesignValidParams<F>) -> Self {
        OptimalDesignParams(valid)
    }
}

impl<F: Float> ParamGuard for OptimalDesignParams<F> {
    type Checked = OptimalDesignValidParams<F>;
    type Error = OptimalError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_points < 1 {
            return Err(OptimalError::InvalidConfig(
                "`n_points` should be a positive integer".to_string(),
            ));
        }
        if self.0.degree < 1 {
            return Err(OptimalError::InvalidConfig(
                "`degree` should be a positive integer".to_string(),
            ));
        }
        if !(self.0.alpha >= F::zero() && self.0.alpha.is_finite()) {
            return Err(OptimalError::InvalidConfig(format!(
                "`alpha` should be a finite non negative value, got {}",
                self.0.alpha
            )));
        }
        if self.0.max_iter < 1 {
            return Err(OptimalError::InvalidConfig(
                "`max_iter` should be a positive integer".to_string(),
            ));
        }
        if self.0.max_excursion < 1 {
            return Err(OptimalError::InvalidConfig(
                "`max_excursion` should be a positive integer".to_string(),
            ));
        }
        if let Some(rival_degree) = self.0.rival_degree {
            if rival_degree >= self.0.degree {
                return Err(OptimalError::InvalidConfig(format!(
                    "`rival_degree` ({rival_degree}) should be lower than `degree` ({})",
                    self.0.degree
                )));
            }
        }
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// Diagnostics of a generated optimal design
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct DesignInfo<F: Float> {
    /// Criterion used
    pub criterion: Criterion,
    /// Strategy used
    pub method: Method,
    /// Ridge augmentation parameter
    pub alpha: F,
    /// Criterion score of the design
    pub score: Score<F>,
    /// Determinant of X^T.X, 0 when singular
    pub det_xtx: F,
    /// D-efficiency in percent
    pub d_eff: F,
    /// A-efficiency in percent
    pub a_eff: F,
    /// Number of model terms p
    pub p_columns: usize,
    /// Number of runs n
    pub n_runs: usize,
    /// Selected candidate indices
    pub indices: Vec<usize>,
    /// Number of iterations of the strategy
    pub iterations: usize,
}

/// Generates the optimal design of `params.n_points()` points selected
/// (repetition allowed) among the (n0, nx) `candidates`.
///
/// Returns the (n_points, nx) design and its diagnostics.
///
/// ```
/// use optdoe_optimal::{optimal_design, Criterion, Method, OptimalDesignParams};
/// use linfa::ParamGuard;
/// use ndarray::array;
///
/// let corners = array![[-1., -1.], [-1., 1.], [1., -1.], [1., 1.]];
/// let params = OptimalDesignParams::new(4, 1)
///     .criterion(Criterion::D)
///     .method(Method::Fedorov)
///     .check()
///     .unwrap();
/// let (design, info) = optimal_design(&corners, &params).unwrap();
/// assert_eq!(design.nrows(), 4);
/// assert_eq!(info.p_columns, 3);
/// ```
pub fn optimal_design<F: Float>(
    candidates: &ArrayBase<impl Data<Elem = F>, Ix2>,
    params: &OptimalDesignValidParams<F>,
) -> Result<(Array2<F>, DesignInfo<F>)> {
    let problem = params.problem(candidates)?;
    let outcome = params.method.search(&problem);
    let design = problem.points(&outcome.indices);

    let x = problem.context().candidates().select(Axis(0), &outcome.indices);
    let xtx = x.t().dot(&x);
    let score = problem.criterion().evaluate(&xtx, problem.context());
    let det_xtx = Spectrum::new(&xtx)
        .map(|s| s.determinant().max(F::zero()))
        .unwrap_or_else(|_| F::zero());
    let info = DesignInfo {
        criterion: params.criterion,
        method: params.method,
        alpha: params.alpha,
        score,
        det_xtx,
        d_eff: d_efficiency(&x),
        a_eff: a_efficiency(&x),
        p_columns: x.ncols(),
        n_runs: x.nrows(),
        indices: outcome.indices,
        iterations: outcome.iterations,
    };
    info!(
        "{} {}-optimal design of {} runs: score = {}, D-eff = {:.2}%, A-eff = {:.2}%",
        info.method, info.criterion, info.n_runs, info.score, info.d_eff, info.a_eff
    );
    Ok((design, info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::{criterion_value, CriterionContext};
    use crate::model::{build_design_matrix, n_terms};
    use approx::assert_abs_diff_eq;
    use env_logger::{Builder, Env};
    use ndarray::array;
    use optdoe_doe::generate_candidate_set;

    fn init_logger() {
        let env = Env::new().filter_or("OPTDOE_LOG", "info");
        Builder::from_env(env).is_test(true).try_init().ok();
    }

    fn corners() -> Array2<f64> {
        array![[-1., -1.], [-1., 1.], [1., -1.], [1., 1.]]
    }

    fn run(
        candidates: &Array2<f64>,
        n_points: usize,
        degree: usize,
        criterion: Criterion,
        method: Method,
    ) -> (Array2<f64>, DesignInfo<f64>) {
        let params = OptimalDesignParams::new(n_points, degree)
            .criterion(criterion)
            .method(method)
            .check()
            .expect("valid parameters");
        optimal_design(candidates, &params).expect("optimal design")
    }

    fn sorted(indices: &[usize]) -> Vec<usize> {
        let mut indices = indices.to_vec();
        indices.sort();
        indices
    }

    #[test]
    fn test_number_of_model_terms() {
        assert_eq!(3, n_terms(2, 1));
        assert_eq!(6, n_terms(2, 2));
        let grid = generate_candidate_set::<f64>(2, 3);
        let (_, info) = run(&grid, 6, 2, Criterion::D, Method::Sequential);
        assert_eq!(6, info.p_columns);
        let (_, info) = run(&grid, 6, 1, Criterion::D, Method::Sequential);
        assert_eq!(3, info.p_columns);
    }

    #[test]
    fn test_d_optimal_corners() {
        init_logger();
        for method in [Method::Sequential, Method::Fedorov] {
            let (design, info) = run(&corners(), 4, 1, Criterion::D, method);
            assert_eq!(vec![0, 1, 2, 3], sorted(&info.indices));
            assert_eq!((4, 2), design.dim());
            // X^T.X = 4.I with intercept and two linear terms
            assert_abs_diff_eq!(64., info.det_xtx, epsilon = 1e-9);
            assert_abs_diff_eq!(64., info.score.value().unwrap(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_full_candidate_set_is_kept() {
        init_logger();
        let candidates = corners();
        let x0 = build_design_matrix(&candidates, 1).unwrap();
        let ctx = CriterionContext::new(&candidates, 1).unwrap();
        let expected = criterion_value(&x0, Criterion::D, &ctx);
        for method in Method::ALL {
            let (_, info) = run(&candidates, 4, 1, Criterion::D, method);
            assert_eq!(vec![0, 1, 2, 3], sorted(&info.indices), "{method}");
            assert_abs_diff_eq!(
                expected.value().unwrap(),
                info.score.value().unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_quadratic_full_factorial_is_kept() {
        let grid = generate_candidate_set::<f64>(2, 3);
        for method in Method::ALL {
            let (_, info) = run(&grid, 9, 2, Criterion::D, method);
            assert_eq!((0..9).collect::<Vec<_>>(), sorted(&info.indices), "{method}");
            assert_abs_diff_eq!(5184., info.det_xtx, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_sequential_is_deterministic() {
        let grid = generate_candidate_set::<f64>(3, 3);
        let (design1, info1) = run(&grid, 12, 2, Criterion::D, Method::Sequential);
        let (design2, info2) = run(&grid, 12, 2, Criterion::D, Method::Sequential);
        assert_eq!(design1, design2);
        assert_eq!(info1, info2);
    }

    #[test]
    fn test_efficiencies_range() {
        let grid = generate_candidate_set::<f64>(2, 5);
        for method in Method::ALL {
            let (_, info) = run(&grid, 8, 2, Criterion::D, method);
            assert!(!info.score.is_undesirable());
            assert!(info.d_eff > 0. && info.d_eff <= 100., "{method}: {}", info.d_eff);
            assert!(info.a_eff > 0. && info.a_eff <= 100., "{method}: {}", info.a_eff);
        }
    }

    #[test]
    fn test_sequential_score_is_monotonic() {
        let grid = generate_candidate_set::<f64>(2, 3);
        let mut previous = Score::Undesirable;
        for n_points in 1..=10 {
            let (_, info) = run(&grid, n_points, 1, Criterion::D, Method::Sequential);
            assert!(info.score >= previous, "n_points = {n_points}");
            previous = info.score;
        }
        assert_abs_diff_eq!(960., previous.value().unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn test_too_few_points_is_undesirable() {
        for method in Method::ALL {
            let (design, info) = run(&corners(), 2, 1, Criterion::D, method);
            assert_eq!(2, design.nrows());
            assert_eq!(Score::Undesirable, info.score);
            assert_eq!(0., info.det_xtx);
            assert_eq!(0., info.d_eff);
            assert_eq!(0., info.a_eff);
        }
    }

    #[test]
    fn test_every_criterion_gives_regular_design() {
        let grid = generate_candidate_set::<f64>(2, 3);
        for criterion in Criterion::ALL {
            for method in [Method::Sequential, Method::Fedorov, Method::Detmax] {
                let (design, info) = run(&grid, 8, 2, criterion, method);
                assert_eq!((8, 2), design.dim());
                assert!(
                    !info.score.is_undesirable(),
                    "{method} {criterion}-optimal design is degenerate"
                );
                assert_eq!(criterion, info.criterion);
                assert_eq!(method, info.method);
            }
        }
    }

    #[test]
    fn test_ridge_augmentation() {
        let params = OptimalDesignParams::new(2, 1)
            .alpha(0.1)
            .check()
            .unwrap();
        let (_, info) = optimal_design(&corners(), &params).unwrap();
        // with alpha > 0 the information matrix is always regular
        assert!(!info.score.is_undesirable());
        assert_eq!(0., info.det_xtx);
        assert_eq!(0.1, info.alpha);
    }

    #[test]
    fn test_invalid_configurations() {
        assert!(matches!(
            "X".parse::<Criterion>(),
            Err(OptimalError::InvalidConfig(_))
        ));
        assert!(matches!(
            "exhaustive".parse::<Method>(),
            Err(OptimalError::InvalidConfig(_))
        ));
        let params = OptimalDesignParams::<f64>::new(3, 1).check().unwrap();
        assert!(matches!(
            optimal_design(&Array2::<f64>::zeros((0, 2)), &params),
            Err(OptimalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_design_points_are_candidates() {
        let grid = generate_candidate_set::<f64>(3, 3);
        let (design, info) = run(&grid, 10, 1, Criterion::A, Method::ModifiedFedorov);
        for (row, &index) in design.outer_iter().zip(info.indices.iter()) {
            assert_eq!(grid.row(index), row);
        }
    }

    #[test]
    fn test_params_validation() {
        assert!(OptimalDesignParams::<f64>::new(0, 1).check().is_err());
        assert!(OptimalDesignParams::<f64>::new(4, 0).check().is_err());
        assert!(OptimalDesignParams::new(4, 1).alpha(-0.1).check().is_err());
        assert!(OptimalDesignParams::<f64>::new(4, 1).max_iter(0).check().is_err());
        assert!(OptimalDesignParams::<f64>::new(4, 1).max_excursion(0).check().is_err());
        assert!(OptimalDesignParams::<f64>::new(4, 1).rival_degree(1).check().is_err());
        let valid = OptimalDesignParams::<f64>::new(4, 2).rival_degree(0).check().unwrap();
        assert_eq!(Criterion::D, valid.criterion());
        assert_eq!(Method::Sequential, valid.method());
        assert_eq!(200, valid.max_iter());
        assert_eq!(0., valid.alpha());
    }

    #[test]
    fn test_optimal_design_info() {
        let corners = corners();
        let params = OptimalDesignParams::new(4, 1).check().unwrap();
        let (design, info) = optimal_design(&corners, &params).unwrap();
        assert_abs_diff_eq!(corners, design);
        assert_abs_diff_eq!(64., info.det_xtx, epsilon = 1e-9);
        assert_abs_diff_eq!(64., info.score.value().unwrap(), epsilon = 1e-9);
        assert_abs_diff_eq!(100., info.d_eff, epsilon = 1e-9);
        assert_abs_diff_eq!(100., info.a_eff, epsilon = 1e-9);
        assert_eq!((3, 4), (info.p_columns, info.n_runs));
        assert_eq!(vec![0, 1, 2, 3], info.indices);
    }

    #[cfg(feature = "serializable")]
    #[test]
    fn test_design_info_serialization() {
        let corners = corners();
        let params = OptimalDesignParams::new(2, 1).check().unwrap();
        let (_, info) = optimal_design(&corners, &params).unwrap();
        let json = serde_json::to_string(&info).unwrap();
        let loaded: DesignInfo<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(info, loaded);
        assert_eq!(Score::Undesirable, loaded.score);
    }

    #[test]
    fn test_contrast_length_mismatch() {
        let corners = corners();
        let params = OptimalDesignParams::new(4, 1)
            .criterion(Criterion::C)
            .contrast(array![1., 1.])
            .check()
            .unwrap();
        assert!(matches!(
            optimal_design(&corners, &params),
            Err(OptimalError::InvalidConfig(_))
        ));
    }
}
