//! Exchange strategies searching for the design maximizing the criterion.
//!
//! All strategies are deterministic: they start from the empty design
//! ([`sequential_dykstra`]) or from the seed design
//! ([`DesignProblem::seed_design`](crate::DesignProblem::seed_design)),
//! compare designs with [`Evaluation::improves_on`](crate::Evaluation::improves_on)
//! and break ties on the lowest candidate index, then the lowest position.

mod detmax;
mod fedorov;
mod modified_fedorov;
mod sequential;
mod simple_exchange;
mod state;

pub use detmax::detmax;
pub use fedorov::fedorov;
pub use modified_fedorov::modified_fedorov;
pub use sequential::sequential_dykstra;
pub use simple_exchange::simple_exchange_wynn_mitchell;

use crate::errors::{OptimalError, Result};
use crate::problem::DesignProblem;
use linfa::Float;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Result of a design search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Selected candidate indices, exactly `n_points` of them (repetition allowed)
    pub indices: Vec<usize>,
    /// Number of iterations (additions, sweeps or excursions) performed
    pub iterations: usize,
}

/// Design search strategies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serializable", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Greedy forward selection
    #[default]
    Sequential,
    /// Wynn-Mitchell simple exchange
    SimpleExchange,
    /// Fedorov exchange
    Fedorov,
    /// Modified Fedorov exchange
    ModifiedFedorov,
    /// Mitchell DETMAX excursions
    Detmax,
}

impl Method {
    /// All available strategies
    pub const ALL: [Method; 5] = [
        Method::Sequential,
        Method::SimpleExchange,
        Method::Fedorov,
        Method::ModifiedFedorov,
        Method::Detmax,
    ];

    /// Runs the strategy on the given problem
    pub fn search<F: Float>(&self, problem: &DesignProblem<F>) -> SearchOutcome {
        match self {
            Method::Sequential => sequential_dykstra(problem),
            Method::SimpleExchange => simple_exchange_wynn_mitchell(problem),
            Method::Fedorov => fedorov(problem),
            Method::ModifiedFedorov => modified_fedorov(problem),
            Method::Detmax => detmax(problem),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Method::Sequential => "sequential",
            Method::SimpleExchange => "simple_exchange",
            Method::Fedorov => "fedorov",
            Method::ModifiedFedorov => "modified_fedorov",
            Method::Detmax => "detmax",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Method {
    type Err = OptimalError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().replace('-', "_");
        Method::ALL
            .iter()
            .find(|m| m.to_string().eq_ignore_ascii_case(&name))
            .copied()
            .ok_or_else(|| {
                OptimalError::InvalidConfig(format!(
                    "Unknown method '{s}', expected one of sequential, simple_exchange, \
                     fedorov, modified_fedorov, detmax"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use ndarray::array;

    #[test]
    fn test_parse_method() {
        for m in Method::ALL {
            assert_eq!(m, m.to_string().parse().unwrap());
        }
        assert_eq!(Method::ModifiedFedorov, "Modified-Fedorov".parse().unwrap());
        assert!(matches!(
            "annealing".parse::<Method>(),
            Err(OptimalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_every_method_returns_n_points() {
        let candidates = array![[-1., -1.], [0., 0.], [1., 0.5], [-0.5, 1.], [1., -1.]];
        for n_points in [1, 2, 5, 7] {
            let problem =
                DesignProblem::new(&candidates, n_points, 1, Criterion::D, 0.).unwrap();
            for method in Method::ALL {
                let outcome = method.search(&problem);
                assert_eq!(n_points, outcome.indices.len(), "{method}");
                assert!(outcome.indices.iter().all(|&i| i < 5));
                assert!(outcome.iterations <= problem.get_max_iter().max(n_points));
            }
        }
    }
}
