//! Element type of action-value vectors.
//!
//! Tables can be stored as `f32` or `f64`. TD arithmetic always runs in
//! `f64`; values are widened with [`ActionValue::to_f64`] on read and the
//! final per-pair delta is narrowed exactly once, through
//! [`ActionValue::from_f64`], when it is added to the table. For `f32`
//! tables that conversion is the only place precision is lost.

use std::{
    fmt::{Debug, Display},
    ops::AddAssign,
};

/// Floating-point type usable as a Q-table entry.
pub trait ActionValue:
    Copy + PartialOrd + AddAssign + Debug + Display + Default + Send + Sync + 'static
{
    const ZERO: Self;

    /// Narrow (or pass through) an `f64` into the table's element type.
    fn from_f64(value: f64) -> Self;

    /// Widen the element into `f64` for TD arithmetic.
    fn to_f64(self) -> f64;
}

impl ActionValue for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl ActionValue for f32 {
    const ZERO: Self = 0.0;

    /// Rounds to the nearest representable `f32`.
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}
