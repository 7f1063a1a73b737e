// scalar.rs
//! Exact integer coefficients.
//!
//! Every operation that combines coefficients goes through [`exact_add`] or
//! [`exact_mul`], which surface overflow as [`SparseError::ArithmeticOverflow`]
//! instead of wrapping.

use crate::error::{ArithmeticOp, Result, SparseError};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Coefficient type of a sparse vector: a fixed-width signed integer with
/// checked arithmetic.
pub trait Scalar: Copy + Ord + Hash + Debug + Display + Default + Send + Sync + 'static {
    /// The additive identity
    const ZERO: Self;
    /// The multiplicative identity
    const ONE: Self;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn checked_mul(self, rhs: Self) -> Option<Self>;

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

macro_rules! impl_scalar_for_primitive {
    ($($T:ty),*) => {
        $(
            impl Scalar for $T {
                const ZERO: Self = 0;
                const ONE: Self = 1;

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$T>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_mul(self, rhs: Self) -> Option<Self> {
                    <$T>::checked_mul(self, rhs)
                }
            }
        )*
    };
}

impl_scalar_for_primitive!(i8, i16, i32, i64, i128, isize);

/// `a + b`, or `ArithmeticOverflow` if the sum leaves the range of `T`.
#[inline]
pub fn exact_add<T: Scalar>(a: T, b: T) -> Result<T> {
    a.checked_add(b).ok_or_else(|| {
        tracing::debug!(lhs = %a, rhs = %b, "coefficient addition overflowed");
        SparseError::overflow(ArithmeticOp::Add, a, b)
    })
}

/// `a * b`, or `ArithmeticOverflow` if the product leaves the range of `T`.
#[inline]
pub fn exact_mul<T: Scalar>(a: T, b: T) -> Result<T> {
    a.checked_mul(b).ok_or_else(|| {
        tracing::debug!(lhs = %a, rhs = %b, "coefficient multiplication overflowed");
        SparseError::overflow(ArithmeticOp::Mul, a, b)
    })
}

/// `a + lambda * b` with both steps checked.
#[inline]
pub fn exact_axpy<T: Scalar>(a: T, lambda: T, b: T) -> Result<T> {
    exact_add(a, exact_mul(lambda, b)?)
}

/// Re-types a coefficient, failing with `ArithmeticOverflow` if it does not fit.
#[inline]
pub fn exact_convert<T: Scalar, U: Scalar + TryFrom<T>>(value: T) -> Result<U> {
    U::try_from(value).map_err(|_| {
        tracing::debug!(value = %value, into = std::any::type_name::<U>(), "coefficient conversion overflowed");
        SparseError::overflow(ArithmeticOp::Convert, value, std::any::type_name::<U>())
    })
}
