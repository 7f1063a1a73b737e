// storage.rs
//! Parallel index/value storage with geometric growth capped at the vector length.

use crate::error::{Result, SparseError};
use crate::policy::GrowthPolicy;
use crate::scalar::Scalar;
use smallvec::SmallVec;

/// Inline slots before spilling to the heap; matches the default minimal block.
const INLINE_SLOTS: usize = 16;

/// The occupied prefix of a sparse vector: `indices[k]` holds the coordinate of
/// `values[k]`. Ordering and zero-freeness are the caller's business; this type
/// only guarantees `len <= capacity <= limit`.
#[derive(Clone)]
pub struct Entries<T: Scalar> {
    indices: SmallVec<[usize; INLINE_SLOTS]>,
    values: SmallVec<[T; INLINE_SLOTS]>,
    capacity: usize,
    limit: usize,
    policy: GrowthPolicy,
}

impl<T: Scalar> Entries<T> {
    /// Empty storage reserving `capacity` slots. `capacity` must not exceed `limit`.
    pub fn with_capacity(limit: usize, capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        policy.validate()?;
        if capacity > limit {
            return Err(SparseError::invalid_capacity(capacity, limit));
        }
        Ok(Self::capped(limit, capacity, policy))
    }

    /// Empty storage reserving `min(capacity, limit)` slots.
    pub(crate) fn capped(limit: usize, capacity: usize, policy: GrowthPolicy) -> Self {
        let capacity = capacity.min(limit);
        Self {
            indices: SmallVec::with_capacity(capacity),
            values: SmallVec::with_capacity(capacity),
            capacity,
            limit,
            policy,
        }
    }

    /// Adopts already ordered parallel sequences. Capacity is raised to the
    /// number of entries if needed.
    pub(crate) fn from_parts(
        limit: usize,
        capacity: usize,
        indices: SmallVec<[usize; INLINE_SLOTS]>,
        values: SmallVec<[T; INLINE_SLOTS]>,
        policy: GrowthPolicy,
    ) -> Self {
        debug_assert_eq!(indices.len(), values.len());
        debug_assert!(indices.len() <= limit);
        let capacity = capacity.max(indices.len()).min(limit);
        Self {
            indices,
            values,
            capacity,
            limit,
            policy,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Reserved slots. Never shrinks.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the owning vector; capacity never exceeds it.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Overwrites the value in occupied slot `k`.
    #[inline]
    pub fn set_value(&mut self, k: usize, value: T) {
        self.values[k] = value;
    }

    /// Makes room for one more entry, growing geometrically when full.
    fn reserve_slot(&mut self) -> Result<()> {
        if self.len() < self.capacity {
            return Ok(());
        }
        if self.capacity >= self.limit {
            return Err(SparseError::invariant_violation(format!(
                "cannot grow past length {} (occupation {})",
                self.limit,
                self.len()
            )));
        }
        let grown = self.policy.grown_capacity(self.limit, self.len());
        let additional = grown - self.len();
        self.indices.reserve_exact(additional);
        self.values.reserve_exact(additional);
        tracing::trace!(from = self.capacity, to = grown, limit = self.limit, "growing sparse storage");
        self.capacity = grown;
        Ok(())
    }

    /// Shifts slots `k..` right by one and writes `(index, value)` at slot `k`.
    pub fn insert(&mut self, k: usize, index: usize, value: T) -> Result<()> {
        if k > self.len() {
            return Err(SparseError::slot_out_of_range(k, self.len()));
        }
        self.reserve_slot()?;
        self.indices.insert(k, index);
        self.values.insert(k, value);
        Ok(())
    }

    /// Appends after the last occupied slot.
    pub fn push(&mut self, index: usize, value: T) -> Result<()> {
        self.reserve_slot()?;
        self.indices.push(index);
        self.values.push(value);
        Ok(())
    }

    /// Shifts slots `k+1..` left by one, returning what was at `k`.
    /// Capacity is kept.
    pub fn remove(&mut self, k: usize) -> Result<(usize, T)> {
        if k >= self.len() {
            return Err(SparseError::slot_out_of_range(k, self.len()));
        }
        Ok((self.indices.remove(k), self.values.remove(k)))
    }

    /// A copy whose capacity equals the current length.
    pub fn compact(&self) -> Self {
        Self {
            indices: SmallVec::from_slice(&self.indices),
            values: SmallVec::from_slice(&self.values),
            capacity: self.len(),
            limit: self.limit,
            policy: self.policy,
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, T)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod storage_tests {
    use super::*;

    fn entries(limit: usize, capacity: usize) -> Entries<i32> {
        Entries::with_capacity(limit, capacity, GrowthPolicy::default()).unwrap()
    }

    #[test]
    fn test_capacity_above_limit_rejected() {
        let result = Entries::<i32>::with_capacity(4, 5, GrowthPolicy::default());
        assert!(matches!(
            result,
            Err(SparseError::InvalidCapacity { capacity: 5, length: 4 })
        ));
    }

    #[test]
    fn test_unvalidated_policy_rejected() {
        let no_denominator = GrowthPolicy { growth_denominator: 0, ..GrowthPolicy::default() };
        assert!(matches!(
            Entries::<i32>::with_capacity(10, 0, no_denominator),
            Err(SparseError::InvalidPolicy { .. })
        ));

        let zero_block = GrowthPolicy { min_block: 0, ..GrowthPolicy::default() };
        assert!(Entries::<i32>::with_capacity(10, 0, zero_block).is_err());
    }

    #[test]
    fn test_stalled_growth_keeps_len_within_capacity() {
        let stalled = GrowthPolicy {
            growth_numerator: 1,
            growth_denominator: 1,
            growth_increment: 0,
            ..GrowthPolicy::default()
        };
        assert!(Entries::<i32>::with_capacity(10, 0, stalled).is_err());

        // storage built internally from such a policy still grows by a slot at a time
        let mut e = Entries::<i32>::capped(10, 1, stalled);
        for i in 0..4 {
            e.push(i, 1).unwrap();
            assert!(e.len() <= e.capacity());
        }
        assert_eq!(e.capacity(), 4);
    }

    #[test]
    fn test_insert_shifts_right() {
        let mut e = entries(10, 4);
        e.push(2, 20).unwrap();
        e.push(7, 70).unwrap();
        e.insert(1, 5, 50).unwrap();
        e.insert(0, 0, 1).unwrap();
        assert_eq!(e.indices(), &[0, 2, 5, 7]);
        assert_eq!(e.values(), &[1, 20, 50, 70]);
    }

    #[test]
    fn test_growth_follows_policy_and_caps_at_limit() {
        let mut e = entries(100, 0);
        assert_eq!(e.capacity(), 0);
        e.push(0, 1).unwrap();
        assert_eq!(e.capacity(), 1);
        e.push(1, 1).unwrap();
        assert_eq!(e.capacity(), 2);
        e.push(2, 1).unwrap();
        assert_eq!(e.capacity(), 4);

        let mut small = entries(3, 2);
        small.push(0, 1).unwrap();
        small.push(1, 1).unwrap();
        small.push(2, 1).unwrap();
        assert_eq!(small.capacity(), 3);
    }

    #[test]
    fn test_growth_past_limit_is_invariant_violation() {
        let mut e = entries(2, 2);
        e.push(0, 1).unwrap();
        e.push(1, 1).unwrap();
        let err = e.push(2, 1).unwrap_err();
        assert!(matches!(err, SparseError::InvariantViolation { .. }));
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn test_remove_keeps_capacity() {
        let mut e = entries(50, 20);
        for i in 0..5 {
            e.push(i, i as i32 + 1).unwrap();
        }
        assert_eq!(e.remove(1).unwrap(), (1, 2));
        assert_eq!(e.indices(), &[0, 2, 3, 4]);
        assert_eq!(e.capacity(), 20);
        assert!(matches!(
            e.remove(4),
            Err(SparseError::SlotOutOfRange { slot: 4, occupation: 4 })
        ));
    }

    #[test]
    fn test_insert_slot_past_end_rejected() {
        let mut e = entries(10, 2);
        assert!(matches!(
            e.insert(1, 3, 1),
            Err(SparseError::SlotOutOfRange { slot: 1, occupation: 0 })
        ));
    }

    #[test]
    fn test_compact_trims_capacity() {
        let mut e = entries(64, 32);
        e.push(3, -1).unwrap();
        e.push(9, 4).unwrap();
        let c = e.compact();
        assert_eq!(c.capacity(), 2);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(3, -1), (9, 4)]);
    }
}
