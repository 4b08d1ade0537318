//! Individual representation
//!
//! Real-valued individuals and the box bounds bounded operators respect.

pub mod bounds;
pub mod real_vector;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::real_vector::*;
}
