use super::state::DesignState;
use super::SearchOutcome;
use crate::problem::DesignProblem;
use linfa::Float;
use log::{debug, info};

/// Fedorov exchange.
///
/// At each iteration all (design point, candidate) pairs are evaluated and the
/// single best improving swap is applied. The search stops when no swap improves
/// the design or after `max_iter` iterations.
pub fn fedorov<F: Float>(problem: &DesignProblem<F>) -> SearchOutcome {
    info!(
        "Fedorov exchange of {} points among {} candidates ({} criterion)",
        problem.n_points(),
        problem.n_candidates(),
        problem.criterion()
    );
    let mut state = DesignState::new(problem, problem.seed_design());
    let mut iterations = 0;
    while iterations < problem.get_max_iter() {
        iterations += 1;
        match state.best_swap(problem) {
            Some(next) => {
                debug!(
                    "Iteration {iterations}: {:?} -> {:?}, score {}",
                    state.indices, next.indices, next.eval.score
                );
                state = next;
            }
            None => break,
        }
    }
    info!(
        "Fedorov exchange ended after {iterations} iterations with score {}",
        state.eval.score
    );
    SearchOutcome {
        indices: state.indices,
        iterations,
    }
}
