/*!
This library implements candidate set generation for optimal Design of Experiments (DoE).

An optimal design is selected among a finite set of admissible points, the so-called
candidate set. A candidate set is a plain (n_candidates, nx) matrix, each row being a point
of the design space `xlimits`, defined as a 2D ndarray `(nx, 2)` specifying lower bound and
upper bound of each of the `nx` factors.

Example:
```
use optdoe_doe::{generate_candidate_set, FullFactorial, SamplingMethod};
use ndarray::arr2;

// 5 levels by factor within [-1, 1]^2, that is 25 candidates
let candidates = generate_candidate_set::<f64>(2, 5);
// or else an explicit grid within [5., 10.] x [0., 1.]
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
let candidates = FullFactorial::new(&xlimits).levels(&[3, 4]);
// or else the first 5 points of an evenly balanced grid
let samples = FullFactorial::new(&xlimits).sample(5);
```
*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod candidates;
mod full_factorial;
mod traits;

pub use candidates::*;
pub use full_factorial::*;
pub use traits::*;
