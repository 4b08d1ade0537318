//! Box bounds for individuals
//!
//! Bounded operators such as SBX clip each offspring value into the
//! per-dimension interval `[min, max]`.

use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, OperatorError, OperatorResult};

/// Bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Create bounds, returning an error instead of panicking on `min > max`
    pub fn try_new(min: f64, max: f64) -> OperatorResult<Self> {
        if !(min <= max) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "lower bound {} exceeds upper bound {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Per-dimension bounds for a whole individual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Build from separate lower and upper limit vectors.
    ///
    /// Fails if the vectors differ in length or any `lower[i] > upper[i]`.
    pub fn from_limits(lower: &[f64], upper: &[f64]) -> OperatorResult<Self> {
        check_dimension(lower.len(), upper.len())?;
        lower
            .iter()
            .zip(upper)
            .map(|(&lo, &hi)| Bounds::try_new(lo, hi))
            .collect::<OperatorResult<Vec<_>>>()
            .map(Self::new)
    }

    /// Create symmetric bounds for all dimensions
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::new(vec![Bounds::symmetric(half_width); dimension])
    }

    /// Lower limits as a vector
    pub fn lower(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.min).collect()
    }

    /// Upper limits as a vector
    pub fn upper(&self) -> Vec<f64> {
        self.bounds.iter().map(|b| b.max).collect()
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(&self.bounds)
                .all(|(&v, b)| b.contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "Invalid bounds")]
    fn test_bounds_invalid() {
        Bounds::new(5.0, -5.0);
    }

    #[test]
    fn test_bounds_try_new() {
        assert_eq!(Bounds::try_new(-1.0, 1.0), Ok(Bounds::new(-1.0, 1.0)));
        assert!(Bounds::try_new(1.0, -1.0).is_err());
        assert!(Bounds::try_new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_bounds_degenerate_interval_allowed() {
        let b = Bounds::new(2.0, 2.0);
        assert_eq!(b.clamp(7.0), 2.0);
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let b = Bounds::new(-5.0, 5.0);
        assert!(b.contains(-5.0));
        assert!(b.contains(5.0));
        assert!(!b.contains(5.1));
        assert_eq!(b.clamp(-10.0), -5.0);
        assert_eq!(b.clamp(10.0), 5.0);
    }

    #[test]
    fn test_multi_bounds_from_limits() {
        let mb = MultiBounds::from_limits(&[0.0, -1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(mb.lower(), vec![0.0, -1.0]);
        assert_eq!(mb.upper(), vec![1.0, 1.0]);
    }

    #[test]
    fn test_multi_bounds_from_limits_rejects_mismatch() {
        assert_eq!(
            MultiBounds::from_limits(&[0.0, 0.0], &[1.0]),
            Err(OperatorError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(MultiBounds::from_limits(&[2.0], &[1.0]).is_err());
    }

    #[test]
    fn test_multi_bounds_contains_vec() {
        let mb = MultiBounds::symmetric(5.0, 3);
        assert!(mb.contains_vec(&[-5.0, 5.0, 0.0]));
        assert!(!mb.contains_vec(&[-6.0, 0.0, 0.0]));
        assert!(!mb.contains_vec(&[0.0, 0.0]));
    }

    #[test]
    fn test_multi_bounds_serde_roundtrip() {
        let mb = MultiBounds::symmetric(2.5, 2);
        let json = serde_json::to_string(&mb).unwrap();
        let back: MultiBounds = serde_json::from_str(&json).unwrap();
        assert_eq!(mb, back);
    }
}
