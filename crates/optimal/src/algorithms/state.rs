use crate::information::rank_one_update;
use crate::problem::{DesignProblem, Evaluation};
use linfa::Float;
use ndarray::Array2;

/// A design under construction with its cached information matrix X^T.X
/// and its evaluation.
#[derive(Clone, Debug)]
pub(crate) struct DesignState<F: Float> {
    pub(crate) indices: Vec<usize>,
    pub(crate) xtx: Array2<F>,
    pub(crate) eval: Evaluation<F>,
}

impl<F: Float> DesignState<F> {
    pub(crate) fn new(problem: &DesignProblem<F>, indices: Vec<usize>) -> Self {
        let xtx = problem.information(&indices);
        let eval = problem.evaluate(&xtx);
        DesignState { indices, xtx, eval }
    }

    pub(crate) fn empty(problem: &DesignProblem<F>) -> Self {
        Self::new(problem, vec![])
    }

    /// Design with `candidate` appended, the candidate with the lowest index
    /// being kept among equivalent ones.
    pub(crate) fn best_addition(&self, problem: &DesignProblem<F>) -> Option<DesignState<F>> {
        let mut best: Option<DesignState<F>> = None;
        for candidate in 0..problem.n_candidates() {
            let mut xtx = self.xtx.clone();
            rank_one_update(&mut xtx, &problem.model_row(candidate), F::one());
            let eval = problem.evaluate(&xtx);
            if best.as_ref().map_or(true, |b| eval.improves_on(&b.eval)) {
                let mut indices = self.indices.clone();
                indices.push(candidate);
                best = Some(DesignState { indices, xtx, eval });
            }
        }
        best
    }

    /// Design with the point whose removal leaves the best evaluation removed.
    ///
    /// Positions are visited by increasing candidate index then position.
    pub(crate) fn best_removal(&self, problem: &DesignProblem<F>) -> Option<DesignState<F>> {
        let mut order: Vec<usize> = (0..self.indices.len()).collect();
        order.sort_by_key(|&pos| (self.indices[pos], pos));

        let mut best: Option<DesignState<F>> = None;
        let mut previous = None;
        for pos in order {
            let candidate = self.indices[pos];
            // removing any replicate gives the same design
            if previous == Some(candidate) {
                continue;
            }
            previous = Some(candidate);
            let mut xtx = self.xtx.clone();
            rank_one_update(&mut xtx, &problem.model_row(candidate), -F::one());
            let eval = problem.evaluate(&xtx);
            if best.as_ref().map_or(true, |b| eval.improves_on(&b.eval)) {
                let mut indices = self.indices.clone();
                indices.remove(pos);
                best = Some(DesignState { indices, xtx, eval });
            }
        }
        best
    }

    /// Best improving swap of the point at `pos`, if any
    pub(crate) fn best_swap_at(
        &self,
        problem: &DesignProblem<F>,
        pos: usize,
    ) -> Option<DesignState<F>> {
        let mut best: Option<DesignState<F>> = None;
        for candidate in 0..problem.n_candidates() {
            if let Some(trial) = self.improving_swap(problem, pos, candidate, best.as_ref()) {
                best = Some(trial);
            }
        }
        best
    }

    /// Best improving swap over all (candidate, position) pairs, if any.
    ///
    /// Ties are broken on the lowest candidate index then the lowest position.
    pub(crate) fn best_swap(&self, problem: &DesignProblem<F>) -> Option<DesignState<F>> {
        let mut best: Option<DesignState<F>> = None;
        for candidate in 0..problem.n_candidates() {
            for pos in 0..self.indices.len() {
                if let Some(trial) = self.improving_swap(problem, pos, candidate, best.as_ref()) {
                    best = Some(trial);
                }
            }
        }
        best
    }

    /// Design where the point at `pos` is replaced by `candidate` if it improves
    /// on both the current design and `incumbent`
    fn improving_swap(
        &self,
        problem: &DesignProblem<F>,
        pos: usize,
        candidate: usize,
        incumbent: Option<&DesignState<F>>,
    ) -> Option<DesignState<F>> {
        let current = self.indices[pos];
        if current == candidate {
            return None;
        }
        let mut xtx = self.xtx.clone();
        rank_one_update(&mut xtx, &problem.model_row(current), -F::one());
        rank_one_update(&mut xtx, &problem.model_row(candidate), F::one());
        let eval = problem.evaluate(&xtx);
        let reference = incumbent.map_or(&self.eval, |b| &b.eval);
        if eval.improves_on(reference) {
            let mut indices = self.indices.clone();
            indices[pos] = candidate;
            Some(DesignState { indices, xtx, eval })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn problem(n_points: usize) -> DesignProblem<f64> {
        let corners = array![[-1., -1.], [-1., 1.], [1., -1.], [1., 1.]];
        DesignProblem::new(&corners, n_points, 1, Criterion::D, 0.).unwrap()
    }

    #[test]
    fn test_incremental_information_is_consistent() {
        let problem = problem(3);
        let state = DesignState::new(&problem, vec![0, 0, 1]);
        let swapped = state.best_swap(&problem).unwrap();
        assert_abs_diff_eq!(
            problem.information(&swapped.indices),
            swapped.xtx,
            epsilon = 1e-12
        );
        let added = swapped.best_addition(&problem).unwrap();
        assert_eq!(4, added.indices.len());
        assert_abs_diff_eq!(problem.information(&added.indices), added.xtx, epsilon = 1e-12);
        let removed = added.best_removal(&problem).unwrap();
        assert_eq!(3, removed.indices.len());
        assert_abs_diff_eq!(
            problem.information(&removed.indices),
            removed.xtx,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_best_swap_breaks_ties_on_lowest_candidate() {
        let problem = problem(3);
        // replacing either replicate of corner 0 by corner 2 or 3 gives det = 16
        let state = DesignState::new(&problem, vec![0, 0, 1]);
        let swapped = state.best_swap(&problem).unwrap();
        assert_eq!(vec![2, 0, 1], swapped.indices);
    }

    #[test]
    fn test_no_swap_improves_optimal_design() {
        let problem = problem(4);
        let state = DesignState::new(&problem, vec![0, 1, 2, 3]);
        assert!(state.best_swap(&problem).is_none());
        for pos in 0..4 {
            assert!(state.best_swap_at(&problem, pos).is_none());
        }
    }

    #[test]
    fn test_best_removal_of_replicate() {
        let problem = problem(4);
        let state = DesignState::new(&problem, vec![0, 1, 2, 3, 3]);
        let removed = state.best_removal(&problem).unwrap();
        assert_eq!(vec![0, 1, 2, 3], removed.indices);
    }
}
