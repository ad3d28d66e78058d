#![allow(non_snake_case)]
use num_traits::{Float, FloatConst, FromPrimitive, NumAssign};
use std::fmt::{Debug, Display, LowerExp};

/// Main trait for floating point types used in the crate.
///
/// All numeric values are represented internally on values implementing
/// `FloatT`.  The symbolic analysis itself touches only index structure, so
/// the scalar type of a pattern is irrelevant to the reported counts, but the
/// numeric $LDL^T$ backend requires real arithmetic.
///
/// `FloatT` relies on [`num_traits`](num_traits) for most of its constituent
/// trait bounds, and is implemented for any type satisfying them, in
/// particular for `f32` and `f64`.
pub trait FloatT:
    'static
    + Send
    + Float
    + FloatConst
    + NumAssign
    + Default
    + FromPrimitive
    + Display
    + LowerExp
    + Debug
    + Sized
{
}

impl<T> FloatT for T where
    T: 'static
        + Send
        + Float
        + FloatConst
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Debug
        + Sized
{
}
