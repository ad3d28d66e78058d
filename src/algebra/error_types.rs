use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned by sparse matrix assembly operations.
pub enum SparseFormatError {
    /// Matrix dimension fields and/or array lengths are incompatible
    #[error("Matrix dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    #[error("Bad column pointer values")]
    /// Matrix column pointer values are defective
    BadColptr,
    #[error("Row value exceeds the matrix row dimension")]
    /// Row value exceeds the matrix row dimension, or row values are
    /// not sorted within a column
    BadRowval,
}
