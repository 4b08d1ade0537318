//! # evo-variation
//!
//! Variation operators for continuous-domain evolution strategies and
//! genetic algorithms.
//!
//! The library is the per-generation core an optimizer loop calls into:
//!
//! - **Recombination**: discrete, weighted, one-point, and bounded simulated
//!   binary crossover (SBX)
//! - **Mutation**: derandomized mutation with global and per-dimension
//!   step-size adaptation
//! - **Step-size adaptation**: search-path adaptation and the 1/5-th success rule
//!
//! Operators hold no state. Random sources are passed in by `&mut`, and any
//! state that lives across generations (step sizes, the search path) is owned
//! by the caller. Numerically degenerate configurations surface as
//! [`OperatorError::NumericInstability`](error::OperatorError::NumericInstability)
//! instead of propagating non-finite values.
//!
//! ## Quick Start
//!
//! ```rust
//! use evo_variation::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let lower = [-5.0; 3];
//! let upper = [5.0; 3];
//! let (child1, _child2) =
//!     bounded_sbx(&[0.0, 1.0, 2.0], &[1.0, -1.0, 0.5], &lower, &upper, 5.0, &mut rng)?;
//!
//! let mutant = derandomized_mutation(&child1, &[1.0; 3], &mut rng)?;
//! let sigma = one_fifth_success(1.0, 2.0, 1.0, 1.0 / 3.0_f64.sqrt());
//! assert!(sigma > 1.0);
//! assert_eq!(mutant.x.len(), 3);
//! # Ok::<(), OperatorError>(())
//! ```

pub mod error;
pub mod genome;
pub mod operators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::genome::prelude::*;
    pub use crate::operators::prelude::*;
}
