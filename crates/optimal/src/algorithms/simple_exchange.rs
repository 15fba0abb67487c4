use super::state::DesignState;
use super::SearchOutcome;
use crate::problem::DesignProblem;
use linfa::Float;
use log::{debug, info};

/// Simple exchange (Wynn-Mitchell).
///
/// Starting from the seed design, each sweep visits the design positions in
/// order and evaluates every (position, candidate) swap. The single best
/// improving swap found during the sweep is applied at its end, ties being
/// broken on the lowest candidate index then the lowest position.
/// The search stops when a sweep finds no improving swap or after `max_iter` sweeps.
pub fn simple_exchange_wynn_mitchell<F: Float>(problem: &DesignProblem<F>) -> SearchOutcome {
    info!(
        "Simple exchange of {} points among {} candidates ({} criterion)",
        problem.n_points(),
        problem.n_candidates(),
        problem.criterion()
    );
    let mut state = DesignState::new(problem, problem.seed_design());
    let mut sweeps = 0;
    while sweeps < problem.get_max_iter() {
        sweeps += 1;
        match sweep(problem, &state) {
            Some((pos, next)) => {
                debug!(
                    "Sweep {sweeps}: position {pos} exchanged {} -> {}, score {}",
                    state.indices[pos], next.indices[pos], next.eval.score
                );
                state = next;
            }
            None => break,
        }
    }
    info!(
        "Simple exchange ended after {sweeps} sweeps with score {}",
        state.eval.score
    );
    SearchOutcome {
        indices: state.indices,
        iterations: sweeps,
    }
}

/// Best improving swap over all design positions with the position it applies to
fn sweep<F: Float>(
    problem: &DesignProblem<F>,
    state: &DesignState<F>,
) -> Option<(usize, DesignState<F>)> {
    let mut best: Option<(usize, DesignState<F>)> = None;
    for pos in 0..state.indices.len() {
        let Some(trial) = state.best_swap_at(problem, pos) else {
            continue;
        };
        let keep = match &best {
            None => true,
            Some((best_pos, incumbent)) => {
                trial.eval.improves_on(&incumbent.eval)
                    || (!incumbent.eval.improves_on(&trial.eval)
                        && trial.indices[pos] < incumbent.indices[*best_pos])
            }
        };
        if keep {
            best = Some((pos, trial));
        }
    }
    best
}
