//! This library implements optimal design of experiments: it selects `n` points,
//! replication allowed, among a finite candidate set so as to maximize an
//! optimality criterion of the information matrix X^T.X of a polynomial
//! regression model.
//!
//! Criteria are the classic alphabetic ones (D, A, I, C, E, G, V, S, T, see [Criterion]),
//! searched for with one of the exchange strategies (see [Method]):
//! sequential selection, Wynn-Mitchell simple exchange, Fedorov exchange,
//! modified Fedorov exchange and Mitchell DETMAX excursions.
//!
//! Designs are generated by [optimal_design] parameterized by [OptimalDesignParams].
//!
//! Degenerate designs (singular information matrix, for instance when `n` is lower
//! than the number of model terms) are never an error: they get the
//! [Score::Undesirable] score, lower than any other.
//!
//! ```
//! use optdoe_optimal::{optimal_design, Criterion, Method, OptimalDesignParams};
//! use linfa::ParamGuard;
//! use ndarray::array;
//!
//! let candidates = array![[-1., -1.], [-1., 1.], [1., -1.], [1., 1.], [0., 0.]];
//! let params = OptimalDesignParams::new(4, 1)
//!     .criterion(Criterion::A)
//!     .method(Method::ModifiedFedorov)
//!     .check()
//!     .expect("valid parameters");
//! let (design, info) = optimal_design(&candidates, &params).expect("optimal design");
//!
//! assert_eq!(design.dim(), (4, 2));
//! assert!(info.d_eff > 99.);
//! ```
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod algorithms;
pub mod criteria;
mod efficiency;
mod errors;
mod information;
pub mod model;
mod optimal;
mod problem;
mod score;

pub use algorithms::*;
pub use criteria::{criterion_value, Criterion, CriterionContext};
pub use efficiency::*;
pub use errors::*;
pub use information::*;
pub use model::{build_design_matrix, n_terms, PolynomialModel, RegressionModel};
pub use optimal::*;
pub use problem::*;
pub use score::*;
