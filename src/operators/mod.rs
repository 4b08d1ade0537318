//! Variation operators
//!
//! This module provides recombination, mutation, and step-size adaptation
//! operators.

pub mod adaptation;
pub mod mutation;
pub mod recombination;
pub mod traits;

pub mod prelude {
    pub use super::adaptation::*;
    pub use super::mutation::*;
    pub use super::recombination::*;
    pub use super::traits::*;
}
