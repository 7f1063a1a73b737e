//policy.rs
//! Growth policy for the backing storage of sparse vectors

use crate::error::{Result, SparseError};

/// Controls how much backing storage a vector reserves up front and how it
/// grows once full. Capacity is always capped at the vector's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrowthPolicy {
    /// Initial capacities are rounded up to a multiple of this block
    pub min_block: usize,
    /// Numerator of the geometric growth factor
    pub growth_numerator: usize,
    /// Denominator of the geometric growth factor
    pub growth_denominator: usize,
    /// Slots added on top of the geometric growth
    pub growth_increment: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            min_block: 16,
            growth_numerator: 3,
            growth_denominator: 2,
            growth_increment: 1,
        }
    }
}

impl GrowthPolicy {
    /// Reserve nothing beyond what is asked for; suited to very many tiny vectors
    pub fn compact() -> Self {
        Self {
            min_block: 1,
            ..Self::default()
        }
    }

    /// Large first block and doubling growth; suited to dense-ish rows
    pub fn eager() -> Self {
        Self {
            min_block: 64,
            growth_numerator: 2,
            growth_denominator: 1,
            growth_increment: 1,
        }
    }

    /// Rejects policies that could fail to make progress when growing.
    pub fn validate(&self) -> Result<()> {
        if self.min_block == 0 {
            return Err(SparseError::invalid_policy("min_block must be positive"));
        }
        if self.growth_denominator == 0 {
            return Err(SparseError::invalid_policy("growth_denominator must be positive"));
        }
        if self.growth_numerator < self.growth_denominator {
            return Err(SparseError::invalid_policy(format!(
                "growth factor {}/{} is below 1",
                self.growth_numerator, self.growth_denominator
            )));
        }
        if self.growth_increment == 0 {
            return Err(SparseError::invalid_policy("growth_increment must be positive"));
        }
        Ok(())
    }

    /// Backing size for a fresh vector given a capacity hint.
    /// A zero `min_block` is treated as 1.
    #[inline]
    pub fn initial_capacity(&self, length: usize, hint: usize) -> usize {
        let block = self.min_block.max(1);
        let blocks = hint / block + 1;
        length.min(blocks.saturating_mul(block))
    }

    /// Backing size after growing a full store holding `occupation` entries.
    /// Always at least one slot more than `occupation`, unless capped by `length`.
    #[inline]
    pub fn grown_capacity(&self, length: usize, occupation: usize) -> usize {
        let scaled = occupation
            .saturating_mul(self.growth_numerator)
            .checked_div(self.growth_denominator)
            .unwrap_or(occupation);
        let grown = scaled
            .saturating_add(self.growth_increment)
            .max(occupation.saturating_add(1));
        length.min(grown)
    }
}
