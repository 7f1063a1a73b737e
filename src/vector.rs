// vector.rs
//! Fixed-dimension sparse integer vectors.
//!
//! A [`SparseVector`] of length `n` stores only its nonzero coordinates, as
//! strictly increasing indices in `[0, n)` paired with nonzero coefficients.
//! Rows and columns of boundary matrices are the intended use: they need fast
//! lookup, in-place row operations (`add_scaled`), and a canonical order
//! (`compare_to`) for elimination.

use crate::error::{Result, SparseError};
use crate::policy::GrowthPolicy;
use crate::scalar::{exact_add, exact_axpy, exact_convert, exact_mul, Scalar};
use crate::storage::Entries;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

pub struct SparseVector<T: Scalar = i64> {
    length: usize,
    entries: Entries<T>,
}

impl<T: Scalar> SparseVector<T> {
    /// The zero vector of the given length with the default initial block.
    pub fn new(length: usize) -> Self {
        let policy = GrowthPolicy::default();
        Self {
            length,
            entries: Entries::capped(length, policy.initial_capacity(length, 0), policy),
        }
    }

    /// The zero vector of the given length, reserving room for at least
    /// `capacity` entries.
    pub fn with_capacity(length: usize, capacity: usize) -> Result<Self> {
        Self::with_policy(length, capacity, GrowthPolicy::default())
    }

    pub fn with_policy(length: usize, capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        policy.validate()?;
        if capacity > length {
            return Err(SparseError::invalid_capacity(capacity, length));
        }
        let reserved = policy.initial_capacity(length, capacity);
        Ok(Self {
            length,
            entries: Entries::with_capacity(length, reserved, policy)?,
        })
    }

    #[inline]
    pub fn zero(length: usize) -> Self {
        Self::new(length)
    }

    #[inline]
    pub fn zero_with_capacity(length: usize, capacity: usize) -> Result<Self> {
        Self::with_capacity(length, capacity)
    }

    /// Builds a vector by accumulating every `(index, value)` pair.
    pub fn from_entries<I>(length: usize, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, T)>,
    {
        let mut vector = Self::new(length);
        for (index, value) in entries {
            vector.accumulate(index, value)?;
        }
        Ok(vector)
    }

    /// Sparse form of a dense coefficient slice; the length is the slice length.
    pub fn from_dense(dense: &[T]) -> Self {
        let mut indices = SmallVec::new();
        let mut values = SmallVec::new();
        for (index, &value) in dense.iter().enumerate() {
            if !value.is_zero() {
                indices.push(index);
                values.push(value);
            }
        }
        let occupation = indices.len();
        Self {
            length: dense.len(),
            entries: Entries::from_parts(dense.len(), occupation, indices, values, GrowthPolicy::default()),
        }
    }

    pub fn to_dense(&self) -> Vec<T> {
        let mut dense = vec![T::ZERO; self.length];
        for (index, value) in self.iter() {
            dense[index] = value;
        }
        dense
    }

    /// Ambient dimension, fixed at construction.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of stored nonzero entries.
    #[inline]
    pub fn occupation(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.entries.policy()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        self.entries.indices()
    }

    #[inline]
    pub fn values(&self) -> &[T] {
        self.entries.values()
    }

    /// Stored `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, T)> + '_ {
        self.entries.iter()
    }

    /// The leading index, `None` for the zero vector.
    #[inline]
    pub fn first_index(&self) -> Option<usize> {
        self.entries.indices().first().copied()
    }

    /// Coefficient at the leading index, zero for the zero vector.
    #[inline]
    pub fn first_value(&self) -> T {
        self.entries.values().first().copied().unwrap_or(T::ZERO)
    }

    /// Slot at which coordinate `i` is stored, or would be inserted.
    pub fn index(&self, i: usize) -> usize {
        let indices = self.entries.indices();
        match indices.last() {
            None => 0,
            Some(&last) if i > last => indices.len(),
            _ => match indices.binary_search(&i) {
                Ok(k) | Err(k) => k,
            },
        }
    }

    #[inline]
    fn holds(&self, k: usize, i: usize) -> bool {
        self.entries.indices().get(k) == Some(&i)
    }

    /// Coefficient at coordinate `i`; zero when absent or out of range.
    pub fn get(&self, i: usize) -> T {
        let k = self.index(i);
        if self.holds(k, i) {
            self.entries.values()[k]
        } else {
            T::ZERO
        }
    }

    #[inline]
    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.length {
            return Err(SparseError::index_out_of_range(i, self.length));
        }
        Ok(())
    }

    fn check_same_length(&self, other: &Self) -> Result<()> {
        if self.length != other.length {
            tracing::debug!(
                expected = self.length,
                actual = other.length,
                "sparse vector lengths differ"
            );
            return Err(SparseError::dimension_mismatch(self.length, other.length));
        }
        Ok(())
    }

    /// Adds `delta` to coordinate `i`. A sum of zero removes the entry.
    pub fn accumulate(&mut self, i: usize, delta: T) -> Result<()> {
        self.check_index(i)?;
        let k = self.index(i);
        if self.holds(k, i) {
            let sum = exact_add(self.entries.values()[k], delta)?;
            if sum.is_zero() {
                self.entries.remove(k)?;
            } else {
                self.entries.set_value(k, sum);
            }
        } else {
            self.insert(k, i, delta)?;
        }
        crate::debug_check_invariants!(self);
        Ok(())
    }

    /// Overwrites coordinate `i` with `value`. Zero removes the entry.
    pub fn assign(&mut self, i: usize, value: T) -> Result<()> {
        self.check_index(i)?;
        let k = self.index(i);
        if self.holds(k, i) {
            if value.is_zero() {
                self.entries.remove(k)?;
            } else {
                self.entries.set_value(k, value);
            }
        } else {
            self.insert(k, i, value)?;
        }
        crate::debug_check_invariants!(self);
        Ok(())
    }

    /// Writes a new entry `(i, value)` at slot `k`, shifting later slots right.
    ///
    /// A zero `value` is a no-op. `k` must be the slot returned by [`index`](Self::index)
    /// for `i`, and `i` must not already be stored.
    pub fn insert(&mut self, k: usize, i: usize, value: T) -> Result<()> {
        self.check_index(i)?;
        let occupation = self.occupation();
        if k > occupation {
            return Err(SparseError::slot_out_of_range(k, occupation));
        }
        if value.is_zero() {
            return Ok(());
        }
        let indices = self.entries.indices();
        let after_prev = k == 0 || indices[k - 1] < i;
        let before_next = k == occupation || i < indices[k];
        if !(after_prev && before_next) {
            return Err(SparseError::invariant_violation(format!(
                "inserting index {} at slot {} breaks ascending order",
                i, k
            )));
        }
        self.entries.insert(k, i, value)
    }

    /// Drops slot `k`, shifting later slots left, and returns its entry.
    pub fn remove(&mut self, k: usize) -> Result<(usize, T)> {
        self.entries.remove(k)
    }

    /// `self += lambda * v`. On error `self` is left untouched.
    pub fn add_scaled(&mut self, v: &Self, lambda: T) -> Result<()> {
        self.check_same_length(v)?;
        self.entries = combine(T::ONE, self, lambda, v)?;
        crate::debug_check_invariants!(self);
        Ok(())
    }

    /// `a * v + b * w` as a new vector.
    pub fn linear(a: T, v: &Self, b: T, w: &Self) -> Result<Self> {
        v.check_same_length(w)?;
        let result = Self {
            length: v.length,
            entries: combine(a, v, b, w)?,
        };
        crate::debug_check_invariants!(result);
        Ok(result)
    }

    /// Canonical order of equal-length vectors: smaller leading index first,
    /// the zero vector last, ties broken by the first differing coefficient.
    pub fn compare_to(&self, v: &Self) -> Result<Ordering> {
        self.check_same_length(v)?;
        Ok(self.cmp_entries(v))
    }

    fn cmp_entries(&self, other: &Self) -> Ordering {
        match (self.first_index(), other.first_index()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(a), Some(b)) if a != b => return a.cmp(&b),
            _ => {}
        }

        // Walk the union of stored indices; coordinates stored on neither side
        // are equal, so the walk ends after at most both occupations.
        let (mut lhs, mut rhs) = (self.iter().peekable(), other.iter().peekable());
        loop {
            match (lhs.peek().copied(), rhs.peek().copied()) {
                (None, None) => return Ordering::Equal,
                (Some((_, x)), None) => return x.cmp(&T::ZERO),
                (None, Some((_, y))) => return T::ZERO.cmp(&y),
                (Some((i, x)), Some((j, y))) => match i.cmp(&j) {
                    Ordering::Less => return x.cmp(&T::ZERO),
                    Ordering::Greater => return T::ZERO.cmp(&y),
                    Ordering::Equal => {
                        if x != y {
                            return x.cmp(&y);
                        }
                        lhs.next();
                        rhs.next();
                    }
                },
            }
        }
    }

    /// Same vector with coefficients re-typed to `U`, e.g. to retry an
    /// overflowing computation in wider arithmetic.
    pub fn convert<U>(&self) -> Result<SparseVector<U>>
    where
        U: Scalar + TryFrom<T>,
    {
        let values = self
            .entries
            .values()
            .iter()
            .map(|&value| exact_convert::<T, U>(value))
            .collect::<Result<SmallVec<_>>>()?;
        let indices = SmallVec::from_slice(self.entries.indices());
        Ok(SparseVector {
            length: self.length,
            entries: Entries::from_parts(self.length, self.capacity(), indices, values, self.policy()),
        })
    }

    /// Verifies ordering, zero-freeness, bounds and capacity of the stored entries.
    pub fn check_invariants(&self) -> Result<()> {
        if self.entries.limit() != self.length {
            return Err(SparseError::invariant_violation(format!(
                "storage capped at {} for vector of length {}",
                self.entries.limit(),
                self.length
            )));
        }
        let capacity = self.capacity();
        if capacity > self.length {
            return Err(SparseError::invariant_violation(format!(
                "capacity {} exceeds length {}",
                capacity, self.length
            )));
        }
        if self.occupation() > capacity {
            return Err(SparseError::invariant_violation(format!(
                "occupation {} exceeds capacity {}",
                self.occupation(),
                capacity
            )));
        }
        let indices = self.entries.indices();
        if let Some(k) = indices.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(SparseError::invariant_violation(format!(
                "indices not ascending at slot {}",
                k + 1
            )));
        }
        if let Some(&last) = indices.last() {
            if last >= self.length {
                return Err(SparseError::invariant_violation(format!(
                    "index {} out of range for length {}",
                    last, self.length
                )));
            }
        }
        if let Some(k) = self.entries.values().iter().position(|value| value.is_zero()) {
            return Err(SparseError::invariant_violation(format!(
                "zero stored at slot {}",
                k
            )));
        }
        Ok(())
    }
}

/// Merge walk producing `a * v + b * w`; cancelled and zero terms are dropped.
fn combine<T: Scalar>(a: T, v: &SparseVector<T>, b: T, w: &SparseVector<T>) -> Result<Entries<T>> {
    let capacity = (v.occupation() + w.occupation()).min(v.length);
    let mut merged = Entries::capped(v.length, capacity, v.policy());
    let (v_indices, v_values) = (v.entries.indices(), v.entries.values());
    let (w_indices, w_values) = (w.entries.indices(), w.entries.values());
    let (mut i, mut k) = (0, 0);

    while i < v_indices.len() && k < w_indices.len() {
        let (index, value) = match v_indices[i].cmp(&w_indices[k]) {
            Ordering::Less => {
                i += 1;
                (v_indices[i - 1], exact_mul(a, v_values[i - 1])?)
            }
            Ordering::Greater => {
                k += 1;
                (w_indices[k - 1], exact_mul(b, w_values[k - 1])?)
            }
            Ordering::Equal => {
                let value = exact_axpy(exact_mul(a, v_values[i])?, b, w_values[k])?;
                i += 1;
                k += 1;
                (v_indices[i - 1], value)
            }
        };
        if !value.is_zero() {
            merged.push(index, value)?;
        }
    }
    for (&index, &value) in v_indices[i..].iter().zip(&v_values[i..]) {
        let value = exact_mul(a, value)?;
        if !value.is_zero() {
            merged.push(index, value)?;
        }
    }
    for (&index, &value) in w_indices[k..].iter().zip(&w_values[k..]) {
        let value = exact_mul(b, value)?;
        if !value.is_zero() {
            merged.push(index, value)?;
        }
    }
    Ok(merged)
}

impl<T: Scalar> Clone for SparseVector<T> {
    /// Deep copy whose backing storage is sized to the current occupation.
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            entries: self.entries.compact(),
        }
    }
}

impl<T: Scalar> PartialEq for SparseVector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.entries.indices() == other.entries.indices()
            && self.entries.values() == other.entries.values()
    }
}

impl<T: Scalar> Eq for SparseVector<T> {}

impl<T: Scalar> PartialOrd for SparseVector<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Scalar> Ord for SparseVector<T> {
    /// [`compare_to`](SparseVector::compare_to) order; vectors of different
    /// length with equal entries are ordered by length.
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_entries(other).then(self.length.cmp(&other.length))
    }
}

impl<T: Scalar> Hash for SparseVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        self.entries.indices().hash(state);
        self.entries.values().hash(state);
    }
}

impl<T: Scalar> fmt::Display for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "occupation: {} ->", self.occupation())?;
        for (index, value) in self.iter() {
            write!(f, " {}:{}", index, value)?;
        }
        Ok(())
    }
}

impl<T: Scalar> fmt::Debug for SparseVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseVector")
            .field("length", &self.length)
            .field("capacity", &self.capacity())
            .field("entries", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
