//! Real-valued individual
//!
//! A fixed-length vector of `f64` genes. All operators work on plain slices;
//! `RealVector` is the owned form used by the operator traits.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, OperatorResult};

/// Euclidean (L2) norm of a vector
pub fn euclidean_norm(values: &[f64]) -> f64 {
    values.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Fixed-length real-valued individual
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RealVector {
    genes: Vec<f64>,
}

impl RealVector {
    /// Create a new real vector with the given genes
    pub fn new(genes: Vec<f64>) -> Self {
        Self { genes }
    }

    /// Create a zero-filled vector of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            genes: vec![0.0; dimension],
        }
    }

    /// Number of genes
    pub fn dimension(&self) -> usize {
        self.genes.len()
    }

    /// Borrow the genes
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Fail unless `other` has the same dimension as `self`
    pub fn ensure_same_dimension(&self, other: &Self) -> OperatorResult<()> {
        check_dimension(self.dimension(), other.dimension())
    }
}

impl Index<usize> for RealVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.genes[index]
    }
}
