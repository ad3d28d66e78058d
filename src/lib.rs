//! __symchol__ predicts the storage cost of a sparse Cholesky factorization
//! without computing one.   Given the nonzero pattern of a symmetric positive
//! definite matrix $A$, and optionally a fill-reducing permutation $P$, it
//! reports the exact number of structural nonzeros that the factor $L$ of
//! $PAP^T = LL^T$ will contain.
//!
//! The count is obtained from an elimination tree built in a single pass over
//! the pattern, in time close to linear in the number of nonzeros of $L$.  No
//! numeric values are touched.   A numeric $LDL^T$ backend is also provided,
//! both as a second route to the same count and as a direct solver for
//! cross-validation of the symbolic analysis.
//!
//! Patterns are supplied in standard compressed sparse column (CSC) format,
//! storing the upper triangle of the symmetric matrix.  See
//! [`CscMatrix`](crate::algebra::CscMatrix) and
//! [`count_fillin`](crate::symbolic::count_fillin) for entry points.

#![allow(non_snake_case)]

pub mod algebra;
pub mod io;
pub mod ldl;
pub mod symbolic;
