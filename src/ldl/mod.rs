#![allow(non_snake_case)]

//! Sparse $LDL^T$ factorization backend.
//!
//! This is the numeric collaborator of the symbolic analysis: it permutes a
//! symmetric matrix, runs the same elimination tree pass, and then either
//! builds the factor structure only (logical mode) or computes the numeric
//! factors as well.   The nonzero count of its factor provides a second,
//! independent route to the fill-in figure reported by
//! [`count_fillin`](crate::symbolic::count_fillin).

use crate::algebra::{CscMatrix, FloatT, ShapedMatrix};
use crate::symbolic::etree::{elimination_tree, NO_PARENT};
use crate::symbolic::perm::{invperm, ipermute, permute, permute_symmetric, InvalidPermutationError};
use derive_builder::Builder;
use std::iter::zip;
use thiserror::Error;

/// Error codes returnable from [`LdlFactorisation`](LdlFactorisation) factor operations
#[derive(Error, Debug)]
pub enum LdlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
    #[error("Invalid permutation vector")]
    InvalidPermutation(#[from] InvalidPermutationError),
}

/// Required settings for [`LdlFactorisation`](LdlFactorisation)
#[derive(Builder, Debug, Clone)]
pub struct LdlSettings {
    /// scaling of the AMD dense-column threshold used for the default ordering
    #[builder(default = "1.0")]
    amd_dense_scale: f64,
    /// pivot ordering; new position `i` holds original index `perm[i]`.
    /// AMD is used when not supplied.
    #[builder(default = "None", setter(strip_option))]
    perm: Option<Vec<usize>>,
    /// structure-only factorization, no numeric values computed
    #[builder(default = "false")]
    logical: bool,
}

impl Default for LdlSettings {
    fn default() -> LdlSettings {
        LdlSettingsBuilder::default().build().unwrap()
    }
}

/// Performs $LDL^T$ factorization of a symmetric positive definite matrix
#[derive(Debug)]
pub struct LdlFactorisation<T = f64> {
    /// permutation vector
    pub perm: Vec<usize>,
    /// inverse permutation
    #[allow(dead_code)] //Unused because we call ipermute in solve instead.  Keep anyway.
    iperm: Vec<usize>,
    /// lower triangular factor, strictly subdiagonal entries (unit diagonal implied)
    pub L: CscMatrix<T>,
    /// D and its inverse for A = LDL^T
    pub D: Vec<T>,
    pub Dinv: Vec<T>,
    // workspace data
    workspace: LdlWorkspace<T>,
    // is it logical factorisation only?
    is_logical: bool,
}

impl<T> LdlFactorisation<T>
where
    T: FloatT,
{
    /// Analyze and factor `Ain`, which must hold the upper triangle of a
    /// symmetric matrix with no empty columns.
    ///
    /// In logical mode only the structure of `L` is built; the numeric pass
    /// can be run later with [`refactor`](LdlFactorisation::refactor).
    pub fn new(
        Ain: &CscMatrix<T>,
        opts: Option<LdlSettings>,
    ) -> Result<LdlFactorisation<T>, LdlError> {
        //sanity check on structure
        check_structure(Ain)?;
        _ldl_new(Ain, opts)
    }

    /// nonzeros in the factor `L`, including its (implied unit) diagonal
    pub fn factor_nnz(&self) -> usize {
        self.L.nnz() + self.D.len()
    }

    /// number of positive values in D after the last numeric factorization
    ///
    /// Equals the dimension for a positive definite input.
    pub fn positive_inertia(&self) -> usize {
        self.workspace.positive_inertia
    }

    /// Solves Ax = b using LDL factors for A, in place (x replaces b).
    ///
    /// # Panics
    /// Panics if only a logical factorization has been performed, or if
    /// `b` has the wrong length.
    pub fn solve(&mut self, b: &mut [T]) {
        // bomb if logical factorisation only
        assert!(!self.is_logical);

        // bomb if b is the wrong size
        assert_eq!(b.len(), self.D.len());

        // permute b
        let tmp = &mut self.workspace.fwork;
        permute(tmp, b, &self.perm);

        //solve in place with tmp as permuted RHS
        _solve(
            &self.L.colptr,
            &self.L.rowval,
            &self.L.nzval,
            &self.Dinv,
            tmp,
        );

        // inverse permutation to put unpermuted soln in b
        ipermute(b, tmp, &self.perm);
    }

    /// Run (or rerun) the numeric factorization on the stored pattern.
    pub fn refactor(&mut self) -> Result<(), LdlError> {
        // It never makes sense to call refactor for a logical
        // factorization since it will always be the same.  Calling
        // this function implies that we want a numerical factorization
        self.is_logical = false;
        _factor(
            &mut self.L,
            &mut self.D,
            &mut self.Dinv,
            &mut self.workspace,
            self.is_logical,
        )
    }
}

fn check_structure<T: FloatT>(A: &CscMatrix<T>) -> Result<(), LdlError> {
    if !A.is_square() {
        return Err(LdlError::IncompatibleDimension);
    }

    if !A.is_triu() {
        return Err(LdlError::NotUpperTriangular);
    }

    //Error if A doesn't have at least one entry in every column
    if !A.colptr.windows(2).all(|c| c[0] < c[1]) {
        return Err(LdlError::EmptyColumn);
    }

    Ok(())
}

fn _ldl_new<T: FloatT>(
    Ain: &CscMatrix<T>,
    opts: Option<LdlSettings>,
) -> Result<LdlFactorisation<T>, LdlError> {
    let n = Ain.nrows();

    //get default values if no options passed at all
    let opts = opts.unwrap_or_default();

    //Use AMD ordering if a user-provided ordering
    //is not supplied.   For no ordering at all, the
    //user would need to pass (0..n).collect() explicitly
    let (perm, iperm);
    if let Some(_perm) = opts.perm {
        if _perm.len() != n {
            return Err(LdlError::IncompatibleDimension);
        }
        iperm = invperm(&_perm)?;
        perm = _perm;
    } else {
        (perm, iperm) = _get_amd_ordering(Ain, opts.amd_dense_scale);
    }

    //permute to (another) upper triangular matrix
    let (A, _AtoPAPt) = permute_symmetric(Ain, &iperm);

    // allocate workspace; computes the elimination tree
    let mut workspace = LdlWorkspace::<T>::new(A);

    //total nonzeros in factorization
    let sumLnz = workspace.Lnz.iter().sum();

    // allocate space for the L matrix row indices and data
    let mut L = CscMatrix::spalloc((n, n), sumLnz);

    // allocate for D and D inverse in LDL^T
    let mut D = vec![T::zero(); n];
    let mut Dinv = vec![T::zero(); n];

    // factor the matrix into A = LDL^T
    _factor(&mut L, &mut D, &mut Dinv, &mut workspace, opts.logical)?;

    Ok(LdlFactorisation {
        perm,
        iperm,
        L,
        D,
        Dinv,
        workspace,
        is_logical: opts.logical,
    })
}

#[derive(Debug)]
struct LdlWorkspace<T> {
    // internal workspace data
    etree: Vec<usize>,
    Lnz: Vec<usize>,
    iwork: Vec<usize>,
    bwork: Vec<bool>,
    fwork: Vec<T>,

    // number of positive values in D
    positive_inertia: usize,

    // The upper triangular matrix factorisation target
    // This is the post ordering PAPt of the original data
    triuA: CscMatrix<T>,
}

impl<T> LdlWorkspace<T>
where
    T: FloatT,
{
    pub fn new(triuA: CscMatrix<T>) -> Self {
        let n = triuA.ncols();
        let mut etree = vec![0; n];
        let mut Lnz = vec![0; n]; //nonzeros in each L column
        let mut iwork = vec![0; n * 3];
        let bwork = vec![false; n];
        let fwork = vec![T::zero(); n];

        // compute the elimination tree and column counts
        elimination_tree(n, &triuA.colptr, &triuA.rowval, &mut iwork, &mut Lnz, &mut etree);

        Self {
            etree,
            Lnz,
            iwork,
            bwork,
            fwork,
            positive_inertia: 0,
            triuA,
        }
    }
}

fn _factor<T: FloatT>(
    L: &mut CscMatrix<T>,
    D: &mut [T],
    Dinv: &mut [T],
    workspace: &mut LdlWorkspace<T>,
    logical: bool,
) -> Result<(), LdlError> {
    if logical {
        L.nzval.fill(T::zero());
        D.fill(T::zero());
        Dinv.fill(T::zero());
    }

    let A = &workspace.triuA;

    let pos_d_count = _factor_inner(
        A.n,
        &A.colptr,
        &A.rowval,
        &A.nzval,
        &mut L.colptr,
        &mut L.rowval,
        &mut L.nzval,
        D,
        Dinv,
        &workspace.Lnz,
        &workspace.etree,
        &mut workspace.bwork,
        &mut workspace.iwork,
        &mut workspace.fwork,
        logical,
    )?;

    workspace.positive_inertia = pos_d_count;

    Ok(())
}

const LDL_USED: bool = true;
const LDL_UNUSED: bool = false;

#[allow(clippy::too_many_arguments)]
fn _factor_inner<T: FloatT>(
    n: usize,
    Ap: &[usize],
    Ai: &[usize],
    Ax: &[T],
    Lp: &mut [usize],
    Li: &mut [usize],
    Lx: &mut [T],
    D: &mut [T],
    Dinv: &mut [T],
    Lnz: &[usize],
    etree: &[usize],
    bwork: &mut [bool],
    iwork: &mut [usize],
    fwork: &mut [T],
    logical_factor: bool,
) -> Result<usize, LdlError> {
    if n == 0 {
        return Ok(0);
    }

    let mut positiveValuesInD = 0;

    // partition working memory into pieces
    let y_markers = bwork;
    let (y_idx, iwork) = iwork.split_at_mut(n);
    let (elim_buffer, next_colspace) = iwork.split_at_mut(n);
    let y_vals = fwork;

    //set Lp to cumsum(Lnz), starting from zero
    Lp[0] = 0;
    let mut acc = 0;
    for (Lp, Lnz) in zip(&mut Lp[1..], Lnz) {
        *Lp = acc + Lnz;
        acc = *Lp;
    }

    // set all y_idx to be 'unused' initially.
    // in each column of L, the next available space
    // to start is just the first space in the column
    y_markers.fill(LDL_UNUSED);
    y_vals.fill(T::zero());
    D.fill(T::zero());
    next_colspace.copy_from_slice(&Lp[0..Lp.len() - 1]);

    if !logical_factor {
        // First element of the diagonal D.
        D[0] = Ax[0];

        if D[0] == T::zero() {
            return Err(LdlError::ZeroPivot);
        }
        if D[0] > T::zero() {
            positiveValuesInD += 1;
        }
        Dinv[0] = T::recip(D[0]);
    }

    // Start from second row (k=1) here. The upper LH corner is trivially 0
    // in L b/c we are only computing the subdiagonal elements
    for k in 1..n {
        // NB : For each k, we compute a solution to
        // y = L(0:(k-1),0:k-1))\b, where b is the kth
        // column of A that sits above the diagonal.
        // The solution y is then the kth row of L,
        // with an implied '1' at the diagonal entry.

        // number of nonzeros in this row of L
        let mut nnz_y = 0;

        // This loop determines where nonzeros
        // will go in the kth row of L, but doesn't
        // compute the actual values

        for i in Ap[k]..Ap[k + 1] {
            let bidx = Ai[i]; //we are working on this element of b

            // Initialize D[k] as the element of this column
            // corresponding to the diagonal place.  Don't use
            // this element as part of the elimination step
            // that computes the k^th row of L
            if bidx == k {
                if !logical_factor {
                    D[k] = Ax[i];
                }
                continue;
            }

            y_vals[bidx] = Ax[i]; // initialise y(bidx) = b(bidx)

            // use the forward elimination tree to figure
            // out which elements must be eliminated after
            // this element of b
            let next_idx = bidx;

            if y_markers[next_idx] == LDL_UNUSED {
                //this y term not already visited

                y_markers[next_idx] = LDL_USED; //I touched this one
                elim_buffer[0] = next_idx; // It goes at the start of the current list
                let mut nnz_e = 1; //length of unvisited elimination path from here

                let mut next_idx = etree[bidx];

                while next_idx != NO_PARENT && next_idx < k {
                    if y_markers[next_idx] == LDL_USED {
                        break;
                    }

                    y_markers[next_idx] = LDL_USED; // I touched this one
                    elim_buffer[nnz_e] = next_idx; // It goes in the current list
                    next_idx = etree[next_idx]; // one step further along tree
                    nnz_e += 1; // the list is one longer than before
                }

                // now put the buffered elimination list into
                // my current ordering in reverse order
                while nnz_e != 0 {
                    nnz_e -= 1;
                    y_idx[nnz_y] = elim_buffer[nnz_e];
                    nnz_y += 1;
                }
            }
        }

        // This for loop places nonzeros values in the k^th row
        for i in (0..nnz_y).rev() {
            // which column are we working on?
            let cidx = y_idx[i];

            // loop along the elements in this
            // column of L and subtract to solve to y
            let tmp_idx = next_colspace[cidx];

            // don't compute Lx for logical factorisation
            if !logical_factor {
                let y_vals_cidx = y_vals[cidx];

                let (f, l) = (Lp[cidx], tmp_idx);
                for j in f..l {
                    y_vals[Li[j]] -= Lx[j] * y_vals_cidx;
                }

                // Now I have the cidx^th element of y = L\b.
                // so compute the corresponding element of
                // this row of L and put it into the right place
                Lx[tmp_idx] = y_vals_cidx * Dinv[cidx];
                D[k] -= y_vals_cidx * Lx[tmp_idx];
            }

            // record which row it went into
            Li[tmp_idx] = k;
            next_colspace[cidx] += 1;

            // reset the y_vals and indices back to zero and unused
            // once I'm done with them
            y_vals[cidx] = T::zero();
            y_markers[cidx] = LDL_UNUSED;
        }

        if !logical_factor {
            // If we hit a zero pivot, we can't factor
            // this matrix, so abort
            if D[k] == T::zero() {
                return Err(LdlError::ZeroPivot);
            }
            if D[k] > T::zero() {
                positiveValuesInD += 1;
            }

            // compute the inverse of the diagonal
            Dinv[k] = T::recip(D[k]);
        }
    } //end for k

    Ok(positiveValuesInD)
}

// Solves (L+I)x = b, with x replacing b
fn _lsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in 0..x.len() {
        let xi = x[i];
        let (f, l) = (Lp[i], Lp[i + 1]);
        let Lx = &Lx[f..l];
        let Li = &Li[f..l];
        for (&Lij, &Lxj) in zip(Li, Lx) {
            x[Lij] -= Lxj * xi;
        }
    }
}

// Solves (L+I)'x = b, with x replacing b
fn _ltsolve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], x: &mut [T]) {
    for i in (0..x.len()).rev() {
        let mut s = T::zero();
        let (f, l) = (Lp[i], Lp[i + 1]);
        let Lx = &Lx[f..l];
        let Li = &Li[f..l];
        for (&Lij, &Lxj) in zip(Li, Lx) {
            s += Lxj * x[Lij];
        }
        x[i] -= s;
    }
}

// Solves Ax = b where A has given LDL factors, with x replacing b
fn _solve<T: FloatT>(Lp: &[usize], Li: &[usize], Lx: &[T], Dinv: &[T], b: &mut [T]) {
    _lsolve(Lp, Li, Lx, b);
    zip(b.iter_mut(), Dinv).for_each(|(b, d)| *b *= *d);
    _ltsolve(Lp, Li, Lx, b);
}

fn _get_amd_ordering<T: FloatT>(
    A: &CscMatrix<T>,
    amd_dense_scale: f64,
) -> (Vec<usize>, Vec<usize>) {
    // computes a permutation for A using AMD default parameters
    let mut control = amd::Control::default();
    control.dense *= amd_dense_scale;
    let (perm, iperm, _info) = amd::order(A.nrows(), &A.colptr, &A.rowval, &control).unwrap();
    (perm, iperm)
}
