use super::state::DesignState;
use super::SearchOutcome;
use crate::problem::DesignProblem;
use linfa::Float;
use log::{debug, info};

/// DETMAX excursions (Mitchell).
///
/// A depth d excursion greedily adds the d best candidates to the design then
/// greedily removes the d points whose removal leaves the best design. An
/// improving excursion is accepted and the depth is reset to 1.
///
/// The basic DETMAX rule stops after a single add-then-delete cycle (depth 1)
/// without improvement. This search goes further: on failure a deeper excursion
/// is tried, up to the maximum excursion depth, so `max_excursion(1)` gives back
/// the basic rule. The search stops when every depth fails or after `max_iter` excursions.
pub fn detmax<F: Float>(problem: &DesignProblem<F>) -> SearchOutcome {
    info!(
        "DETMAX search of {} points among {} candidates ({} criterion)",
        problem.n_points(),
        problem.n_candidates(),
        problem.criterion()
    );
    let mut state = DesignState::new(problem, problem.seed_design());
    let mut depth = 1;
    let mut cycles = 0;
    while cycles < problem.get_max_iter() {
        cycles += 1;
        match excursion(problem, &state, depth) {
            Some(next) if next.eval.improves_on(&state.eval) => {
                debug!(
                    "Excursion {cycles} (depth {depth}): {:?} -> {:?}, score {}",
                    state.indices, next.indices, next.eval.score
                );
                state = next;
                depth = 1;
            }
            _ if depth < problem.get_max_excursion() => depth += 1,
            _ => break,
        }
    }
    info!(
        "DETMAX search ended after {cycles} excursions with score {}",
        state.eval.score
    );
    SearchOutcome {
        indices: state.indices,
        iterations: cycles,
    }
}

/// Adds then removes `depth` points, returning to the design size
fn excursion<F: Float>(
    problem: &DesignProblem<F>,
    state: &DesignState<F>,
    depth: usize,
) -> Option<DesignState<F>> {
    let mut trial = state.clone();
    for _ in 0..depth {
        trial = trial.best_addition(problem)?;
    }
    for _ in 0..depth {
        trial = trial.best_removal(problem)?;
    }
    Some(trial)
}
