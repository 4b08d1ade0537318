//! Operator traits
//!
//! These traits are the seam between a caller's optimizer loop and the
//! recombination operators. Each takes the random source by `&mut` and
//! returns an [`OperatorResult`].

use rand::Rng;

use crate::error::OperatorResult;
use crate::genome::bounds::MultiBounds;
use crate::genome::real_vector::RealVector;

/// Recombination operator trait
///
/// Combines two parents into a single offspring.
pub trait RecombinationOperator: Send + Sync {
    /// Produce one offspring from two parents of equal dimension
    fn recombine<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        rng: &mut R,
    ) -> OperatorResult<RealVector>;
}

/// Bounded crossover operator trait
///
/// Produces two offspring whose genes lie within `bounds`.
pub trait BoundedCrossoverOperator: Send + Sync {
    /// Apply bounded crossover to two parents
    fn crossover_bounded<R: Rng>(
        &self,
        parent1: &RealVector,
        parent2: &RealVector,
        bounds: &MultiBounds,
        rng: &mut R,
    ) -> OperatorResult<(RealVector, RealVector)>;
}
