#![allow(non_snake_case)]

//! Symbolic analysis of sparse Cholesky factorizations.
//!
//! The routines here operate on the nonzero pattern of a symmetric matrix
//! only; no numeric factorization is performed.   The central object is the
//! elimination tree, from which the exact per-column nonzero counts of the
//! factor $L$ are obtained in a single pass over the pattern.
//!
//! Two routes to the total fill-in count are provided.
//! [`count_fillin`](count_fillin) runs the dedicated symbolic pass and cannot
//! fail on a structurally valid pattern.
//! [`count_fillin_with_permutation`](count_fillin_with_permutation) first
//! applies a pivot ordering and then delegates to the
//! [`ldl`](crate::ldl) factorization backend in logical mode, reading the
//! count off the factor structure.   The second route exists mainly for
//! cross-validation of the first and propagates any backend failure as a
//! typed error.

use crate::algebra::{CscMatrix, FloatT, ShapedMatrix, SparseFormatError};
use crate::ldl::{LdlError, LdlFactorisation, LdlSettingsBuilder};
use thiserror::Error;

pub(crate) mod etree;
pub mod perm;

pub use perm::{invperm, ipermute, permute, permute_symmetric, InvalidPermutationError};

use etree::{elimination_tree, NO_PARENT};

/// Error codes returnable from the symbolic analysis routines
#[derive(Error, Debug)]
pub enum FillinError {
    #[error("Pattern must be square")]
    NotSquare,
    #[error("Pattern must be upper triangular")]
    NotUpperTriangular,
    #[error("Pattern format error: {0}")]
    BadPattern(#[from] SparseFormatError),
    #[error("Permutation length does not match the pattern dimension")]
    PermutationLengthMismatch,
    #[error("Invalid permutation vector")]
    InvalidPermutation(#[from] InvalidPermutationError),
    #[error("Factorization backend failed: {0}")]
    Backend(#[from] LdlError),
}

/// Elimination tree and per-column factor counts for a symmetric pattern.
///
/// All data is computed in the constructor and the object holds no
/// reference to the originating matrix.
#[derive(Debug, Clone)]
pub struct SymbolicFactorization {
    n: usize,
    parent: Vec<usize>,
    nonzeros_per_col: Vec<usize>,
}

impl SymbolicFactorization {
    /// Analyze an upper triangular pattern of a symmetric matrix.
    ///
    /// The pattern must be square, well formed and upper triangular;
    /// a full symmetric pattern can be reduced first with
    /// [`to_triu`](crate::algebra::CscMatrix::to_triu).  Values are ignored.
    pub fn new<T: FloatT>(A: &CscMatrix<T>) -> Result<Self, FillinError> {
        check_pattern(A)?;

        let n = A.ncols();
        let mut parent = vec![0; n];
        let mut nonzeros_per_col = vec![0; n];
        let mut work = vec![0; n];

        elimination_tree(
            n,
            &A.colptr,
            &A.rowval,
            &mut work,
            &mut nonzeros_per_col,
            &mut parent,
        );

        Ok(Self {
            n,
            parent,
            nonzeros_per_col,
        })
    }

    /// dimension of the analyzed pattern
    pub fn n(&self) -> usize {
        self.n
    }

    /// parent of node `v` in the elimination tree, or `None` if `v` is a root
    pub fn parent(&self, v: usize) -> Option<usize> {
        match self.parent[v] {
            NO_PARENT => None,
            p => Some(p),
        }
    }

    /// count of strictly subdiagonal nonzeros in each column of the factor
    pub fn nonzeros_per_col(&self) -> &[usize] {
        &self.nonzeros_per_col
    }

    /// nonzeros in the lower triangular factor `L`, including its diagonal
    pub fn lower_nnz(&self) -> usize {
        self.subdiagonal_nnz() + self.n
    }

    /// total nonzero count of the factor viewed as a symmetric matrix
    ///
    /// Counts both triangles of $L + L^T$ plus one diagonal entry per row,
    /// i.e. `2 * subdiagonal + n`.
    pub fn fillin_nnz(&self) -> usize {
        2 * self.subdiagonal_nnz() + self.n
    }

    fn subdiagonal_nnz(&self) -> usize {
        self.nonzeros_per_col.iter().sum()
    }
}

/// Exact nonzero count of the Cholesky factor of a symmetric pattern.
///
/// The pattern is analyzed in its natural order.  The count includes the
/// diagonal and both triangles of the symmetric factor representation, so a
/// diagonal pattern of dimension `n` reports exactly `n`.
///
/// This route is purely symbolic: it cannot fail once the pattern has been
/// validated, and it never allocates a factor.
pub fn count_fillin<T>(A: &CscMatrix<T>) -> Result<usize, FillinError>
where
    T: FloatT,
{
    Ok(SymbolicFactorization::new(A)?.fillin_nnz())
}

/// Nonzero count of the Cholesky factor after applying a pivot ordering.
///
/// `perm` is interpreted as an elimination order: new position `i` holds
/// original index `perm[i]`.  The pattern is permuted symmetrically and the
/// count is read from the [`ldl`](crate::ldl) backend run in logical
/// (structure only) mode.   The permutation is validated as a bijection.
///
/// For the identity permutation this agrees exactly with
/// [`count_fillin`](count_fillin).
pub fn count_fillin_with_permutation<T>(
    A: &CscMatrix<T>,
    perm: &[usize],
) -> Result<usize, FillinError>
where
    T: FloatT,
{
    let n = A.nrows();
    if perm.len() != n {
        return Err(FillinError::PermutationLengthMismatch);
    }
    // bijection check; the backend assumes a valid pivot order
    invperm(perm)?;

    let opts = LdlSettingsBuilder::default()
        .perm(perm.to_vec())
        .logical(true)
        .build()
        .unwrap();

    let factors = LdlFactorisation::<T>::new(A, Some(opts))?;

    // factor_nnz counts the lower triangle including the diagonal.
    // Report both triangles plus the diagonal, as in the symbolic route.
    Ok(2 * (factors.factor_nnz() - n) + n)
}

fn check_pattern<T: FloatT>(A: &CscMatrix<T>) -> Result<(), FillinError> {
    if !A.is_square() {
        return Err(FillinError::NotSquare);
    }

    A.check_format()?;

    if !A.is_triu() {
        return Err(FillinError::NotUpperTriangular);
    }

    Ok(())
}

//configure tests of internals
#[path = "test.rs"]
#[cfg(test)]
mod test;
