#![allow(non_snake_case)]

use crate::algebra::{FloatT, ShapedMatrix, SparseFormatError};

/// Sparse matrix in standard Compressed Sparse Column (CSC) format
///
/// __Example usage__ : To construct the 3 x 3 matrix
/// ```text
/// A = [1.  3.  5.]
///     [2.  0.  6.]
///     [0.  4.  7.]
/// ```
///
/// ```no_run
/// use symchol::algebra::CscMatrix;
///
/// let A : CscMatrix<f64> = CscMatrix::new(
///    3,                                // m
///    3,                                // n
///    vec![0, 2, 4, 7],                 //colptr
///    vec![0, 1, 0, 2, 0, 1, 2],        //rowval
///    vec![1., 2., 3., 4., 5., 6., 7.], //nzval
///  );
///
/// // optional correctness check
/// assert!(A.check_format().is_ok());
/// ```
///
/// Symmetric patterns handed to the symbolic analysis should store the
/// upper triangle only, including the diagonal.   A pattern holding both
/// triangles can be reduced using [`to_triu`](CscMatrix::to_triu).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscMatrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// CSC format column pointer.
    ///
    /// This field should have length `n+1`. The last entry corresponds
    /// to the number of nonzeros and should agree with the lengths
    /// of the `rowval` and `nzval` fields.
    pub colptr: Vec<usize>,
    /// vector of row indices
    pub rowval: Vec<usize>,
    /// vector of non-zero matrix elements
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// `CscMatrix` constructor.
    ///
    /// # Panics
    /// Makes rudimentary dimensional compatibility checks and panics on
    /// failure.   This constructor does __not__ ensure that row indices
    /// are all in bounds or that data is arranged such that entries within
    /// each column appear in order of increasing row index.   Use
    /// [`check_format`](CscMatrix::check_format) to verify those conditions.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert_eq!(rowval.len(), nzval.len());
        assert_eq!(colptr.len(), n + 1);
        assert_eq!(colptr[n], rowval.len());
        CscMatrix {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// allocate space for a sparse matrix with `nnz` elements
    pub fn spalloc(size: (usize, usize), nnz: usize) -> Self {
        let (m, n) = size;
        let mut colptr = vec![0; n + 1];
        let rowval = vec![0; nnz];
        let nzval = vec![T::zero(); nnz];
        colptr[n] = nnz;

        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// Identity matrix of size `n`
    pub fn identity(n: usize) -> Self {
        let colptr = (0usize..=n).collect();
        let rowval = (0usize..n).collect();
        let nzval = vec![T::one(); n];

        CscMatrix::new(n, n, colptr, rowval, nzval)
    }

    /// number of nonzeros
    pub fn nnz(&self) -> usize {
        self.colptr[self.n]
    }

    /// Check that matrix data is correctly formatted.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        if self.rowval.len() != self.nzval.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        if self.colptr.is_empty()
            || (self.colptr.len() - 1) != self.n
            || self.colptr[self.n] != self.rowval.len()
        {
            return Err(SparseFormatError::IncompatibleDimension);
        }

        //check for colptr monotonicity
        if self.colptr.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }

        //check for rowval monotonicity within each column
        for col in 0..self.n {
            let rng = self.colptr[col]..self.colptr[col + 1];
            if self.rowval[rng].windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowval);
            }
        }
        //check for row values out of bounds
        if !self.rowval.iter().all(|r| r < &self.m) {
            return Err(SparseFormatError::BadRowval);
        }

        Ok(())
    }

    /// Allocates a new matrix containing only entries from the upper triangular part
    ///
    /// # Panics
    /// Panics if the matrix is not square
    pub fn to_triu(&self) -> Self {
        assert_eq!(self.m, self.n);
        let (m, n) = (self.m, self.n);
        let mut colptr = vec![0; n + 1];
        let mut nnz = 0;

        //count the number of entries in the upper triangle
        //and place the totals into colptr

        for col in 0..n {
            //start / stop indices for the current column
            let first = self.colptr[col];
            let last = self.colptr[col + 1];
            let rows = &self.rowval[first..last];

            // number of entries on or above diagonal in this column,
            // shifted by 1 (i.e. colptr keeps a 0 in the first column)
            colptr[col + 1] = rows.iter().filter(|&row| *row <= col).count();
            nnz += colptr[col + 1];
        }

        //allocate and copy the upper triangle entries of
        //each column into the new value vector.
        //NB! : assumes that entries in each column have
        //monotonically increasing row numbers
        let mut rowval = vec![0; nnz];
        let mut nzval = vec![T::zero(); nnz];

        for col in 0..n {
            let ntriu = colptr[col + 1];

            //start / stop indices for the destination
            let fdest = colptr[col];
            let ldest = fdest + ntriu;

            //start / stop indices for the source
            let fsrc = self.colptr[col];
            let lsrc = fsrc + ntriu;

            //copy upper triangle values
            rowval[fdest..ldest].copy_from_slice(&self.rowval[fsrc..lsrc]);
            nzval[fdest..ldest].copy_from_slice(&self.nzval[fsrc..lsrc]);

            //this should now be cumsum of the counts
            colptr[col + 1] = ldest;
        }
        CscMatrix::new(m, n, colptr, rowval, nzval)
    }

    /// True if the matrix is upper triangular
    pub fn is_triu(&self) -> bool {
        // check lower triangle for any structural entries, regardless
        // of the values that may be assigned to them
        for col in 0..self.ncols() {
            //start / stop indices for the current column
            let first = self.colptr[col];
            let last = self.colptr[col + 1];
            let rows = &self.rowval[first..last];

            if rows.iter().any(|&row| row > col) {
                return false;
            }
        }
        true
    }

    /// Count of structural entries on the diagonal.
    ///
    /// For a column-sorted square matrix storing the upper triangle the
    /// diagonal entry, when present, is the last entry of its column.
    pub fn count_diagonal_entries(&self) -> usize {
        let mut count = 0;
        for i in 0..self.n {
            if self.colptr[i + 1] != self.colptr[i] &&    // nonempty column
               self.rowval[self.colptr[i + 1] - 1] == i
            {
                // last element is on diagonal
                count += 1;
            }
        }
        count
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

/// Construct a `CscMatrix` from a dense array of row arrays, retaining
/// the structurally nonzero entries.   Intended mainly for small examples
/// and tests.
impl<T, const R: usize, const C: usize> From<&[[T; C]; R]> for CscMatrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; C]; R]) -> Self {
        let mut colptr = vec![0; C + 1];
        let mut rowval = Vec::new();
        let mut nzval = Vec::new();

        for col in 0..C {
            for (row, data) in rows.iter().enumerate() {
                if data[col] != T::zero() {
                    rowval.push(row);
                    nzval.push(data[col]);
                }
            }
            colptr[col + 1] = rowval.len();
        }

        CscMatrix::new(R, C, colptr, rowval, nzval)
    }
}

#[test]
fn test_csc_from_dense() {
    // A =
    //[1.0  0.0  4.0]
    //[0.0  3.0  0.0]
    //[2.0  0.0  5.0]
    let A = CscMatrix::from(&[
        [1.0, 0.0, 4.0], //
        [0.0, 3.0, 0.0],
        [2.0, 0.0, 5.0],
    ]);

    assert_eq!(A.size(), (3, 3));
    assert_eq!(A.colptr, vec![0, 2, 3, 5]);
    assert_eq!(A.rowval, vec![0, 2, 1, 0, 2]);
    assert_eq!(A.nzval, vec![1., 2., 3., 4., 5.]);
    assert!(A.check_format().is_ok());
}

#[test]
fn test_csc_to_triu() {
    let A = CscMatrix::from(&[
        [1.0, 2.0, 0.0], //
        [2.0, 3.0, 4.0],
        [0.0, 4.0, 5.0],
    ]);

    let B = A.to_triu();
    assert!(B.is_triu());
    assert_eq!(B.colptr, vec![0, 1, 3, 5]);
    assert_eq!(B.rowval, vec![0, 0, 1, 1, 2]);
    assert_eq!(B.nzval, vec![1., 2., 3., 4., 5.]);
    assert_eq!(B.count_diagonal_entries(), 3);
}

#[test]
fn test_csc_check_format() {
    let mut A: CscMatrix<f64> = CscMatrix::identity(3);
    assert!(A.check_format().is_ok());

    //row index out of bounds
    A.rowval[2] = 3;
    assert!(A.check_format().is_err());
}
