use super::state::DesignState;
use super::SearchOutcome;
use crate::problem::DesignProblem;
use linfa::Float;
use log::{debug, info};

/// Greedy forward selection (Dykstra).
///
/// Starting from the empty design, the candidate which gives the best design
/// once appended is added until the design holds `n_points` points.
pub fn sequential_dykstra<F: Float>(problem: &DesignProblem<F>) -> SearchOutcome {
    info!(
        "Sequential selection of {} points among {} candidates ({} criterion)",
        problem.n_points(),
        problem.n_candidates(),
        problem.criterion()
    );
    let mut state = DesignState::empty(problem);
    let mut iterations = 0;
    while state.indices.len() < problem.n_points() {
        match state.best_addition(problem) {
            Some(next) => state = next,
            None => break,
        }
        iterations += 1;
        debug!(
            "Add candidate {:?} -> score {}",
            state.indices.last(),
            state.eval.score
        );
    }
    info!("Sequential selection ended with score {}", state.eval.score);
    SearchOutcome {
        indices: state.indices,
        iterations,
    }
}
