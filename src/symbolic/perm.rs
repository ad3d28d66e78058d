#![allow(non_snake_case)]

//! Permutation vectors and symmetric two-sided permutation of sparse
//! patterns.   All operations are pure: inputs are never mutated.

use crate::algebra::{CscMatrix, FloatT, ShapedMatrix};
use std::cmp::{max, min};
use std::iter::zip;
use thiserror::Error;

/// Error returned when a vector is not a bijection over `0..n`
#[derive(Error, Debug)]
#[error("Invalid permutation vector")]
pub struct InvalidPermutationError;

/// Construct an inverse permutation from a permutation.
///
/// Fails unless `p` contains each of `0..p.len()` exactly once.
pub fn invperm(p: &[usize]) -> Result<Vec<usize>, InvalidPermutationError> {
    const UNSET: usize = usize::MAX;
    let mut b = vec![UNSET; p.len()];

    for (i, j) in p.iter().enumerate() {
        if *j < p.len() && b[*j] == UNSET {
            b[*j] = i;
        } else {
            return Err(InvalidPermutationError);
        }
    }
    Ok(b)
}

/// Write `x = b[p]`, i.e. `x[i] = b[p[i]]`.  Requires no allocation.
pub fn permute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, x).for_each(|(p, x)| *x = b[*p]);
}

/// Write `x[p] = b`, i.e. `x[p[i]] = b[i]`.  Requires no allocation.
pub fn ipermute<T: Copy>(x: &mut [T], b: &[T], p: &[usize]) {
    zip(p, b).for_each(|(p, b)| x[*p] = *b);
}

/// Given a sparse symmetric matrix `A` (upper triangular entries only),
/// return the permuted symmetric matrix `P` (also upper triangular) given
/// the inverse permutation vector `iperm`, together with a mapping from
/// entries of `A` to entries of `P`.
///
/// `iperm[r]` is the new index of original index `r`.   The result has the
/// same dimension and nonzero count as the input; entries within each
/// column of the result are in general __not__ sorted by row index.
pub fn permute_symmetric<T>(A: &CscMatrix<T>, iperm: &[usize]) -> (CscMatrix<T>, Vec<usize>)
where
    T: FloatT,
{
    let (_m, n) = A.size();
    let mut P = CscMatrix::<T>::spalloc((n, n), A.nnz());

    // we will record a mapping of entries from A to PAPt
    let mut AtoPAPt = vec![0; A.nnz()];

    _permute_symmetric_inner(
        A,
        &mut AtoPAPt,
        iperm,
        &mut P.rowval,
        &mut P.colptr,
        &mut P.nzval,
    );
    (P, AtoPAPt)
}

// the main function without extra argument checks
// following the book: Timothy Davis - Direct Methods for Sparse Linear Systems

fn _permute_symmetric_inner<T: FloatT>(
    A: &CscMatrix<T>,
    AtoPAPt: &mut [usize],
    iperm: &[usize],
    Pr: &mut [usize],
    Pc: &mut [usize],
    Pv: &mut [T],
) {
    // 1. count number of entries that each column of P will have
    let n = A.nrows();
    let mut num_entries = vec![0; n];
    let Ar = &A.rowval;
    let Ac = &A.colptr;
    let Av = &A.nzval;

    // count the number of upper-triangle entries in columns of P,
    // keeping in mind the row permutation
    for colA in 0..n {
        let colP = iperm[colA];
        // loop over entries of A in column A...
        for rowA in Ar.iter().take(Ac[colA + 1]).skip(Ac[colA]) {
            let rowP = iperm[*rowA];
            // ...and check if entry is upper triangular
            if *rowA <= colA {
                // determine to which column the entry belongs after permutation
                let col_idx = max(rowP, colP);
                num_entries[col_idx] += 1;
            }
        }
    }

    // 2. calculate permuted Pc = P.colptr from number of entries
    // Pc is one longer than num_entries here.
    Pc[0] = 0;
    let mut acc = 0;
    for (Pckp1, ne) in zip(&mut Pc[1..], &num_entries) {
        *Pckp1 = acc + ne;
        acc = *Pckp1;
    }
    // reuse this memory to keep track of free entries in rowval
    num_entries.copy_from_slice(&Pc[0..n]);

    // use alias
    let mut row_starts = num_entries;

    // 3. permute the row entries and position of corresponding nzval
    for colA in 0..n {
        let colP = iperm[colA];
        // loop over rows of A and determine where each row entry of A should be stored
        for rowA_idx in Ac[colA]..Ac[colA + 1] {
            let rowA = Ar[rowA_idx];
            // check if upper triangular
            if rowA <= colA {
                let rowP = iperm[rowA];
                // determine column to store the entry
                let col_idx = max(colP, rowP);

                // find next free location in rowval (this results in unordered columns in the rowval)
                let rowP_idx = row_starts[col_idx];

                // store rowval and nzval
                Pr[rowP_idx] = min(colP, rowP);
                Pv[rowP_idx] = Av[rowA_idx];

                //record this into the mapping vector
                AtoPAPt[rowA_idx] = rowP_idx;

                // increment next free location
                row_starts[col_idx] += 1;
            }
        }
    }
}
