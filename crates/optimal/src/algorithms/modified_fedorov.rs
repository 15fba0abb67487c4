use super::state::DesignState;
use super::SearchOutcome;
use crate::problem::DesignProblem;
use linfa::Float;
use log::{debug, info};

/// Modified Fedorov exchange.
///
/// Each sweep visits every design position in order and immediately applies
/// the best improving swap of the visited point, so that later positions see
/// the updated design. The search stops after a sweep without change or after
/// `max_iter` sweeps.
pub fn modified_fedorov<F: Float>(problem: &DesignProblem<F>) -> SearchOutcome {
    info!(
        "Modified Fedorov exchange of {} points among {} candidates ({} criterion)",
        problem.n_points(),
        problem.n_candidates(),
        problem.criterion()
    );
    let mut state = DesignState::new(problem, problem.seed_design());
    let mut sweeps = 0;
    while sweeps < problem.get_max_iter() {
        sweeps += 1;
        let mut changed = false;
        for pos in 0..problem.n_points() {
            if let Some(next) = state.best_swap_at(problem, pos) {
                debug!(
                    "Sweep {sweeps}: position {pos} exchanged {} -> {}, score {}",
                    state.indices[pos], next.indices[pos], next.eval.score
                );
                state = next;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    info!(
        "Modified Fedorov exchange ended after {sweeps} sweeps with score {}",
        state.eval.score
    );
    SearchOutcome {
        indices: state.indices,
        iterations: sweeps,
    }
}
