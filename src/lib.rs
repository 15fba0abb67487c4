//! `optdoe` generates optimal designs of experiments.
//!
//! This crate gathers:
//! * [doe]: candidate set generation (full factorial grids),
//! * the optimal design engine selecting, among candidates, the design maximizing
//!   an alphabetic optimality criterion under a polynomial model (see [optimal_design]).
//!
//! ```
//! use optdoe::{doe::generate_candidate_set, optimal_design, Method, OptimalDesignParams};
//! use linfa::ParamGuard;
//!
//! let candidates = generate_candidate_set::<f64>(2, 3);
//! let params = OptimalDesignParams::new(6, 2)
//!     .method(Method::Fedorov)
//!     .check()
//!     .expect("valid parameters");
//! let (design, info) = optimal_design(&candidates, &params).expect("optimal design");
//! assert_eq!(design.nrows(), 6);
//! assert_eq!(info.p_columns, 6);
//! ```
#![warn(missing_docs)]

pub use optdoe_doe as doe;
pub use optdoe_optimal::*;

#[cfg(test)]
mod tests {
    use super::doe::{FullFactorial, SamplingMethod};
    use super::{optimal_design, Criterion, Method, OptimalDesignParams, Score};
    use approx::assert_abs_diff_eq;
    use linfa::ParamGuard;
    use ndarray::arr2;

    #[test]
    fn test_optimal_design_within_scaled_grid() {
        // linear model over [0, 10] x [-2, 2]
        let xlimits = arr2(&[[0., 10.], [-2., 2.]]);
        let candidates = FullFactorial::new(&xlimits).levels(&[5, 5]);
        let params = OptimalDesignParams::new(4, 1)
            .criterion(Criterion::D)
            .method(Method::Fedorov)
            .check()
            .unwrap();
        let (design, info) = optimal_design(&candidates, &params).unwrap();

        // the D-optimal linear design lies on the vertices of the domain
        for row in design.outer_iter() {
            assert!(row[0] == 0. || row[0] == 10.);
            assert!(row[1] == -2. || row[1] == 2.);
        }
        assert!(matches!(info.score, Score::Value(_)));
        assert_abs_diff_eq!(info.det_xtx, info.score.value().unwrap(), epsilon = 1e-6);
    }

    #[test]
    fn test_design_info_json() {
        let candidates = FullFactorial::new(&arr2(&[[-1., 1.], [-1., 1.]])).sample(9);
        let params = OptimalDesignParams::new(3, 1).check().unwrap();
        let (_, info) = optimal_design(&candidates, &params).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!("D", json["criterion"]);
        assert_eq!("sequential", json["method"]);
        assert_eq!(3, json["p_columns"]);
        assert_eq!(3, json["n_runs"]);
    }
}
