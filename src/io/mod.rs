//! Plain-text export of sparse patterns and permutation vectors.
//!
//! These writers exist as a diagnostic aid for downstream tools (plotting
//! scripts, MATLAB reordering experiments and the like); they are not part
//! of the analysis itself.   Failures surface as ordinary
//! [`Result`](std::io::Result) values for the caller to handle and never
//! abort a computation.

use crate::algebra::{CscMatrix, FloatT};
use std::fs::File;
use std::io::{BufWriter, Result, Write};
use std::path::Path;

/// Index base applied to row and column indices in triplet output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// 0-based indices
    #[default]
    Zero,
    /// 1-based indices, as expected by e.g. MATLAB
    One,
}

impl IndexBase {
    fn offset(self) -> usize {
        match self {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

/// Write a sparse matrix in whitespace-separated triplet form.
///
/// One `row col value` line is produced per stored nonzero, in column
/// major order.
pub fn write_sparse_triplets<T, W>(A: &CscMatrix<T>, base: IndexBase, w: &mut W) -> Result<()>
where
    T: FloatT,
    W: Write,
{
    let off = base.offset();
    for col in 0..A.n {
        for ptr in A.colptr[col]..A.colptr[col + 1] {
            writeln!(w, "{} {} {}", A.rowval[ptr] + off, col + off, A.nzval[ptr])?;
        }
    }
    Ok(())
}

/// Write a permutation vector, one integer per line.
///
/// Line order is the new-to-original mapping: line `i` holds the original
/// index of new position `i`.   Indices are written 0-based.
pub fn write_permutation<W>(perm: &[usize], w: &mut W) -> Result<()>
where
    W: Write,
{
    for p in perm {
        writeln!(w, "{}", p)?;
    }
    Ok(())
}

/// Write a sparse matrix in triplet form to a file at `path`.
pub fn save_sparse_triplets<T>(A: &CscMatrix<T>, base: IndexBase, path: impl AsRef<Path>) -> Result<()>
where
    T: FloatT,
{
    let mut w = BufWriter::new(File::create(path)?);
    write_sparse_triplets(A, base, &mut w)?;
    w.flush()
}

/// Write a permutation vector to a file at `path`.
pub fn save_permutation(perm: &[usize], path: impl AsRef<Path>) -> Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    write_permutation(perm, &mut w)?;
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_matrix_2x2() -> CscMatrix<f64> {
        // A =
        //[1.0  2.0]
        //[ ⋅   3.0]
        CscMatrix::new(2, 2, vec![0, 1, 3], vec![0, 0, 1], vec![1., 2., 3.])
    }

    #[test]
    fn test_write_triplets_zero_based() {
        let A = test_matrix_2x2();
        let mut buf = Vec::new();
        write_sparse_triplets(&A, IndexBase::Zero, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0 0 1\n0 1 2\n1 1 3\n");
    }

    #[test]
    fn test_write_triplets_one_based() {
        let A = test_matrix_2x2();
        let mut buf = Vec::new();
        write_sparse_triplets(&A, IndexBase::One, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1 1 1\n1 2 2\n2 2 3\n");
    }

    #[test]
    fn test_write_permutation() {
        let mut buf = Vec::new();
        write_permutation(&[3, 0, 2, 1], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "3\n0\n2\n1\n");
    }

    #[test]
    fn test_save_to_files() {
        let dir = tempfile::tempdir().unwrap();

        let mat_path = dir.path().join("pattern.txt");
        save_sparse_triplets(&test_matrix_2x2(), IndexBase::One, &mat_path).unwrap();
        let text = std::fs::read_to_string(&mat_path).unwrap();
        assert_eq!(text.lines().count(), 3);

        let perm_path = dir.path().join("perm.txt");
        save_permutation(&[1, 0], &perm_path).unwrap();
        let text = std::fs::read_to_string(&perm_path).unwrap();
        assert_eq!(text, "1\n0\n");
    }

    #[test]
    fn test_save_bad_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_such_dir").join("pattern.txt");
        assert!(save_sparse_triplets(&test_matrix_2x2(), IndexBase::Zero, &missing).is_err());
    }
}
