use linfa::Float;
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Relative tolerance under which two criterion values are considered equal
/// when searching for an improving design.
pub const IMPROVEMENT_TOL: f64 = 1e-9;

/// The value of an optimality criterion for a given design.
///
/// Higher is always better: criteria which are naturally minimized
/// (variances, traces) are negated. A design for which the criterion is
/// undefined (singular information matrix) gets the [`Score::Undesirable`]
/// value which compares lower than any other score.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Score<F: Float> {
    /// A finite criterion value
    Value(F),
    /// Sentinel equivalent to negative infinity
    Undesirable,
}

impl<F: Float> Score<F> {
    /// Score from a raw criterion value, non finite values are undesirable
    pub fn new(value: F) -> Self {
        if value.is_finite() {
            Score::Value(value)
        } else {
            Score::Undesirable
        }
    }

    /// Whether the score is the undesirable sentinel
    pub fn is_undesirable(&self) -> bool {
        matches!(self, Score::Undesirable)
    }

    /// The finite value if any
    pub fn value(&self) -> Option<F> {
        match self {
            Score::Value(v) => Some(*v),
            Score::Undesirable => None,
        }
    }

    /// The score as a float, negative infinity when undesirable
    pub fn to_float(&self) -> F {
        self.value().unwrap_or_else(F::neg_infinity)
    }

    /// Whether this score is better than `other` by more than the relative
    /// [`IMPROVEMENT_TOL`] tolerance.
    pub fn improves_on(&self, other: &Score<F>) -> bool {
        match (self, other) {
            (Score::Value(a), Score::Value(b)) => exceeds(*a, *b),
            (Score::Value(_), Score::Undesirable) => true,
            (Score::Undesirable, _) => false,
        }
    }
}

/// `a > b` by more than the relative improvement tolerance
pub(crate) fn exceeds<F: Float>(a: F, b: F) -> bool {
    if !b.is_finite() {
        return a > b;
    }
    a - b > F::cast(IMPROVEMENT_TOL) * b.abs()
}

impl<F: Float> PartialOrd for Score<F> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Score::Value(a), Score::Value(b)) => a.partial_cmp(b),
            (Score::Value(_), Score::Undesirable) => Some(Ordering::Greater),
            (Score::Undesirable, Score::Value(_)) => Some(Ordering::Less),
            (Score::Undesirable, Score::Undesirable) => Some(Ordering::Equal),
        }
    }
}

impl<F: Float> fmt::Display for Score<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Score::Value(v) => write!(f, "{v}"),
            Score::Undesirable => write!(f, "undesirable"),
        }
    }
}
