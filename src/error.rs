//error.rs
//! Error types for sparse vector operations

use std::fmt;
use thiserror::Error;

/// Result type alias for sparse vector operations
pub type Result<T> = std::result::Result<T, SparseError>;

/// The scalar operation that failed to stay within the coefficient range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Mul,
    Convert,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Convert => "as",
        };
        f.write_str(symbol)
    }
}

/// Main error type for sparse vector operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SparseError {
    #[error("Capacity {capacity} must lie in [0, {length}]")]
    InvalidCapacity { capacity: usize, length: usize },

    #[error("Index {index} out of range for vector of length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    #[error("Slot {slot} out of range for occupation {occupation}")]
    SlotOutOfRange { slot: usize, occupation: usize },

    #[error("Arithmetic overflow: {lhs} {op} {rhs} exceeds the coefficient range")]
    ArithmeticOverflow {
        op: ArithmeticOp,
        lhs: String,
        rhs: String,
    },

    #[error("Dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invariant violated: {details}")]
    InvariantViolation { details: String },

    #[error("Invalid growth policy: {details}")]
    InvalidPolicy { details: String },
}

impl SparseError {
    pub fn invalid_capacity(capacity: usize, length: usize) -> Self {
        Self::InvalidCapacity { capacity, length }
    }

    pub fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }

    pub fn slot_out_of_range(slot: usize, occupation: usize) -> Self {
        Self::SlotOutOfRange { slot, occupation }
    }

    pub fn overflow(op: ArithmeticOp, lhs: impl fmt::Display, rhs: impl fmt::Display) -> Self {
        Self::ArithmeticOverflow {
            op,
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn invariant_violation(details: impl Into<String>) -> Self {
        Self::InvariantViolation { details: details.into() }
    }

    pub fn invalid_policy(details: impl Into<String>) -> Self {
        Self::InvalidPolicy { details: details.into() }
    }

    /// True when the failure came from exceeding the coefficient range, i.e. the
    /// computation may succeed again with a wider scalar type.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::ArithmeticOverflow { .. })
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_overflow_message_names_operands() {
        let err = SparseError::overflow(ArithmeticOp::Mul, i32::MAX, 2);
        assert_eq!(
            err.to_string(),
            "Arithmetic overflow: 2147483647 * 2 exceeds the coefficient range"
        );
        assert!(err.is_overflow());
    }

    #[test]
    fn test_bounds_errors_are_not_overflow() {
        assert!(!SparseError::index_out_of_range(10, 10).is_overflow());
        assert!(!SparseError::invalid_capacity(11, 10).is_overflow());
        assert!(!SparseError::dimension_mismatch(4, 5).is_overflow());
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(
            SparseError::invalid_capacity(11, 10).to_string(),
            "Capacity 11 must lie in [0, 10]"
        );
        assert_eq!(
            SparseError::index_out_of_range(12, 10).to_string(),
            "Index 12 out of range for vector of length 10"
        );
        assert_eq!(
            SparseError::slot_out_of_range(3, 2).to_string(),
            "Slot 3 out of range for occupation 2"
        );
    }
}
