//! Error types for evo-variation
//!
//! This module defines the error type returned by every operator, plus the
//! finite-value guard used after numerically risky computations.

use thiserror::Error;

/// Error type for operator failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Two vectors that must share a dimension do not
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Invalid operator configuration or argument
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),

    /// A non-finite value appeared in an intermediate computation
    #[error("Numerical instability in {operator}{}: {context}", at_index(.index))]
    NumericInstability {
        /// Name of the operator that failed
        operator: &'static str,
        /// Dimension being processed, if the failure is per-dimension
        index: Option<usize>,
        /// Offending intermediate values, rendered as `name=value` pairs
        context: String,
    },
}

fn at_index(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {}", i)).unwrap_or_default()
}

/// Result type alias for operator applications
pub type OperatorResult<T> = Result<T, OperatorError>;

/// Fail with [`OperatorError::DimensionMismatch`] unless `actual == expected`
pub(crate) fn check_dimension(expected: usize, actual: usize) -> OperatorResult<()> {
    if expected != actual {
        return Err(OperatorError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// Check that every named value is finite.
///
/// On failure the whole set of values is logged and carried in the error so the
/// caller can see the state that produced the non-finite result.
pub(crate) fn check_finite(
    operator: &'static str,
    index: Option<usize>,
    values: &[(&str, f64)],
) -> OperatorResult<()> {
    if values.iter().all(|(_, v)| v.is_finite()) {
        return Ok(());
    }

    let context = values
        .iter()
        .map(|(name, v)| format!("{}={}", name, v))
        .collect::<Vec<_>>()
        .join(", ");

    tracing::error!(operator, ?index, %context, "non-finite value in operator");

    Err(OperatorError::NumericInstability {
        operator,
        index,
        context,
    })
}
