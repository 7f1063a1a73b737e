// lib.rs - Main library file
//!
//! Fixed-dimension sparse integer vectors with exact arithmetic, the row and
//! column type for integer boundary matrices in homology computations.
//!
//! ```
//! use zsparse::SparseVector;
//!
//! let v1 = SparseVector::<i64>::from_entries(10, [(2, 3), (5, -1), (7, 2)])?;
//! let v2 = SparseVector::<i64>::from_entries(10, [(2, -3), (4, 6), (7, -2)])?;
//! let sum = SparseVector::linear(1, &v1, 1, &v2)?;
//! assert_eq!(sum.to_string(), "occupation: 2 -> 4:6 5:-1");
//! # Ok::<(), zsparse::SparseError>(())
//! ```

pub mod error;
pub mod policy;
pub mod scalar;
pub(crate) mod storage;
pub mod vector;

// Re-export core types for easier access from outside the crate.
pub use error::{ArithmeticOp, Result, SparseError};
pub use policy::GrowthPolicy;
pub use scalar::{exact_add, exact_axpy, exact_convert, exact_mul, Scalar};
pub use vector::SparseVector;

/// Panics in debug builds if a vector's stored entries are out of order,
/// contain a zero, or exceed its length or capacity.
#[macro_export]
macro_rules! debug_check_invariants {
    ($vector:expr) => {
        #[cfg(debug_assertions)]
        if let Err(e) = $vector.check_invariants() {
            panic!("Sparse vector invariant broken: {}", e);
        }
    };
}

/// A "prelude" module for easily importing the most commonly used types.
pub mod prelude {
    pub use crate::{GrowthPolicy, Result, Scalar, SparseError, SparseVector};
}
