use thiserror::Error;

/// A result type for optimal design computations
pub type Result<T> = std::result::Result<T, OptimalError>;

/// An error when building an optimal design
///
/// Numerical degeneracy of a design (singular information matrix) is not an error,
/// it is reported as an [`Undesirable`](crate::Score::Undesirable) score.
#[derive(Error, Debug)]
pub enum OptimalError {
    /// When the design configuration is invalid (unknown criterion or method,
    /// non-positive number of points or degree, empty or malformed candidate set)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// When the regression model cannot be built
    #[error("Invalid model: {0}")]
    InvalidModel(String),
    /// When linear algebra computation fails
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
    /// When a linfa error occurs
    #[error(transparent)]
    LinfaError(#[from] linfa::error::Error),
}
