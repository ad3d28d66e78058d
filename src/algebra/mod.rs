//! Sparse matrix types and supporting traits.

mod csc;
mod error_types;
mod floats;
mod matrix_traits;

pub use csc::*;
pub use error_types::*;
pub use floats::*;
pub use matrix_traits::*;
