//! An unordered set shared between threads.
//!
//! [`ConcurrentSet`] owns one [`UnorderedSet`] behind one [`Guard`]. Queries
//! take the guard in shared mode and mutations in exclusive mode; no call
//! ever holds two guards.
//!
//! # Pipelines
//!
//! A transformation reads every element and then replaces the whole store,
//! so it must not read under shared mode and write without exclusive mode.
//! Two forms are provided:
//!
//! - [`ConcurrentSet::pipeline`] copies the set under shared mode, runs every
//!   step with no lock held, and swaps the result in under exclusive mode.
//!   Writes made by other threads between the copy and the swap are
//!   overwritten.
//! - [`ConcurrentSet::pipeline_exclusive`] holds exclusive mode from the copy
//!   to the swap, so no other thread can interleave. Steps run under the lock
//!   and must not touch the set.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::guard::{Guard, WriteScope};
use crate::collections::{DefaultHashBuilder, UnorderedSet, UnorderedSetIntoIterator};
use crate::error::SetError;
use crate::pipeline::{CommitTarget, Pipeline};

// =============================================================================
// ConcurrentSet Definition
// =============================================================================

/// A set of unique elements that can be shared between threads.
///
/// Every method takes `&self`; wrap the set in an `Arc` to share it.
///
/// # Callbacks
///
/// [`for_each`](Self::for_each) and the steps of
/// [`pipeline_exclusive`](Self::pipeline_exclusive) run while the guard is
/// held. A callback that calls back into the same set panics with a
/// re-entrant access message instead of deadlocking.
///
/// # Examples
///
/// ```rust
/// use uniset::concurrent::ConcurrentSet;
///
/// let set = ConcurrentSet::new();
/// assert!(set.insert("first"));
/// assert!(!set.insert("first"));
/// assert!(set.contains(&"first"));
/// assert!(set.delete(&"first"));
/// assert!(set.is_empty());
/// ```
pub struct ConcurrentSet<T, S = DefaultHashBuilder> {
    guard: Guard<UnorderedSet<T, S>>,
}

impl<T> ConcurrentSet<T, DefaultHashBuilder> {
    /// Creates an empty set using the default hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::from_set(UnorderedSet::new())
    }
}

impl<T: Hash + Eq> ConcurrentSet<T, DefaultHashBuilder> {
    /// Creates an empty set able to hold `capacity` elements without reallocating.
    ///
    /// # Errors
    ///
    /// - [`SetError::InvalidArgument`] if `capacity` is negative
    /// - [`SetError::AllocationFailed`] if the reservation cannot be satisfied
    pub fn with_capacity(capacity: isize) -> Result<Self, SetError> {
        UnorderedSet::with_capacity(capacity).map(Self::from_set)
    }
}

impl<T, S> ConcurrentSet<T, S> {
    /// Creates an empty set that hashes with `hasher`.
    #[must_use]
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_set(UnorderedSet::with_hasher(hasher))
    }

    /// Puts an existing set behind a new guard.
    #[must_use]
    pub fn from_set(set: UnorderedSet<T, S>) -> Self {
        Self {
            guard: Guard::new(set),
        }
    }

    /// Returns the guard protecting the set.
    #[inline]
    #[must_use]
    pub const fn guard(&self) -> &Guard<UnorderedSet<T, S>> {
        &self.guard
    }

    /// Returns the number of elements. Shared mode.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard.with_read(UnorderedSet::len)
    }

    /// Returns `true` if the set holds no element. Shared mode.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard.with_read(UnorderedSet::is_empty)
    }

    /// Removes every element. Exclusive mode.
    pub fn clear(&self) {
        self.guard.with_write(UnorderedSet::clear);
    }

    /// Consumes the set and returns the wrapped [`UnorderedSet`].
    #[must_use]
    pub fn into_inner(self) -> UnorderedSet<T, S> {
        self.guard.into_inner()
    }
}

impl<T: Hash + Eq, S: BuildHasher> ConcurrentSet<T, S> {
    /// Creates an empty set with the given capacity hint and hasher.
    ///
    /// # Errors
    ///
    /// See [`with_capacity`](ConcurrentSet::with_capacity).
    pub fn with_capacity_and_hasher(capacity: isize, hasher: S) -> Result<Self, SetError> {
        UnorderedSet::with_capacity_and_hasher(capacity, hasher).map(Self::from_set)
    }

    /// Adds `element`, returning `true` if it was not present. Exclusive mode.
    pub fn insert(&self, element: T) -> bool {
        self.guard.with_write(|set| set.insert(element))
    }

    /// Removes `element`, returning `true` if it was present. Exclusive mode.
    pub fn delete<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.guard.with_write(|set| set.delete(element))
    }

    /// Returns `true` if the set contains `element`. Shared mode.
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.guard.with_read(|set| set.contains(element))
    }

    /// Inserts every element of `elements` under one exclusive acquisition,
    /// returning how many were new.
    ///
    /// The iterator is drained while the guard is held, so it must not touch
    /// this set.
    pub fn insert_all<I: IntoIterator<Item = T>>(&self, elements: I) -> usize {
        self.guard.with_write(|set| set.insert_all(elements))
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher> ConcurrentSet<T, S> {
    /// Returns a point-in-time copy of every element, in unspecified order.
    /// Shared mode.
    #[must_use]
    pub fn keys(&self) -> Vec<T> {
        self.guard.with_read(UnorderedSet::keys)
    }

    /// Calls `function` once per element while holding shared mode.
    ///
    /// # Panics
    ///
    /// Panics if `function` inserts into or deletes from this set.
    pub fn for_each<F>(&self, function: F)
    where
        F: FnMut(&T),
    {
        self.guard.with_read(|set| set.iter().for_each(function));
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> ConcurrentSet<T, S> {
    /// Returns an independent copy of the current contents. Shared mode.
    #[must_use]
    pub fn snapshot(&self) -> UnorderedSet<T, S> {
        let snapshot = self.guard.with_read(Clone::clone);
        tracing::trace!(
            guard = self.guard.id(),
            size = snapshot.len(),
            "took concurrent set snapshot"
        );
        snapshot
    }

    /// Replaces the whole contents with `elements`.
    ///
    /// The replacement is built with no lock held and swapped in under
    /// exclusive mode.
    pub fn replace_with<I: IntoIterator<Item = T>>(&self, elements: I) {
        let hasher = self.guard.with_read(|set| set.store().hasher().clone());
        let mut replacement = UnorderedSet::with_hasher(hasher);
        replacement.extend(elements);
        let previous = self
            .guard
            .with_write(|set| std::mem::replace(set, replacement));
        tracing::debug!(
            guard = self.guard.id(),
            previous = previous.len(),
            "replaced concurrent set contents"
        );
    }

    /// Starts a pipeline over a snapshot of the set.
    ///
    /// The snapshot is taken under shared mode, every step runs with no lock
    /// held, and [`collect`](Pipeline::collect) swaps the result in under
    /// exclusive mode and returns the committed size. Writes made by other
    /// threads after the snapshot are overwritten by the commit.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::concurrent::ConcurrentSet;
    ///
    /// let set: ConcurrentSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// let committed = set.pipeline().map(|x| x % 2).collect();
    /// assert_eq!(committed, 2);
    /// assert!(set.contains(&0) && set.contains(&1));
    /// ```
    pub fn pipeline(&self) -> Pipeline<UnorderedSet<T, S>, &Self> {
        Pipeline::new(self.snapshot(), self)
    }

    /// Starts a pipeline that holds exclusive mode until it is collected or
    /// dropped.
    ///
    /// No other thread can read or write the set while the pipeline is alive.
    /// Steps must not touch this set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::concurrent::ConcurrentSet;
    ///
    /// let set: ConcurrentSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// let committed = set.pipeline_exclusive().filter(|x| *x > 2).collect();
    /// assert_eq!(committed, 2);
    /// assert!(!set.contains(&1));
    /// ```
    pub fn pipeline_exclusive(
        &self,
    ) -> Pipeline<UnorderedSet<T, S>, WriteScope<'_, UnorderedSet<T, S>>> {
        let scope = self.guard.write();
        let working = (*scope).clone();
        Pipeline::new(working, scope)
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Default> ConcurrentSet<T, S> {
    /// Builds a set from the elements of a slice, dropping duplicates.
    #[must_use]
    pub fn from_slice(elements: &[T]) -> Self {
        Self::from_set(UnorderedSet::from_slice(elements))
    }

    /// Builds a set from the keys of a map.
    #[must_use]
    pub fn from_map<V, H>(map: &HashMap<T, V, H>) -> Self {
        Self::from_set(UnorderedSet::from_map(map))
    }
}

// =============================================================================
// Commit Targets
// =============================================================================

impl<T, S> CommitTarget<UnorderedSet<T, S>> for &ConcurrentSet<T, S> {
    type Committed = usize;

    fn commit(self, working: UnorderedSet<T, S>) -> usize {
        let committed = working.len();
        let previous = self
            .guard
            .with_write(|set| std::mem::replace(set, working));
        tracing::trace!(
            guard = self.guard.id(),
            previous = previous.len(),
            committed,
            "committing snapshot pipeline into concurrent set"
        );
        committed
    }
}

impl<T, S> CommitTarget<UnorderedSet<T, S>> for WriteScope<'_, UnorderedSet<T, S>> {
    type Committed = usize;

    fn commit(mut self, working: UnorderedSet<T, S>) -> usize {
        let committed = working.len();
        tracing::trace!(
            previous = self.len(),
            committed,
            "committing exclusive pipeline into concurrent set"
        );
        *self = working;
        committed
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for ConcurrentSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

/// Locks only the source; the copy gets a guard of its own.
impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> Clone for ConcurrentSet<T, S> {
    fn clone(&self) -> Self {
        Self::from_set(self.snapshot())
    }
}

/// Snapshots `self`, releases it, then reads `other`. At most one guard is
/// held at any time, so comparing a set with itself is fine.
impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> PartialEq for ConcurrentSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        let left = self.snapshot();
        other.guard.with_read(|right| left == *right)
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> Eq for ConcurrentSet<T, S> {}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for ConcurrentSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default, const N: usize> From<[T; N]> for ConcurrentSet<T, S> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> From<Vec<T>> for ConcurrentSet<T, S> {
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<T, S> From<UnorderedSet<T, S>> for ConcurrentSet<T, S> {
    fn from(set: UnorderedSet<T, S>) -> Self {
        Self::from_set(set)
    }
}

impl<T, S> IntoIterator for ConcurrentSet<T, S> {
    type Item = T;
    type IntoIter = UnorderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_inner().into_iter()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ConcurrentSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.guard
            .with_read(|set| formatter.debug_set().entries(set.iter()).finish())
    }
}

impl<T: fmt::Display, S> fmt::Display for ConcurrentSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.guard.with_read(|set| fmt::Display::fmt(set, formatter))
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for ConcurrentSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        self.guard
            .with_read(|set| serde::Serialize::serialize(set, serializer))
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for ConcurrentSet<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        <UnorderedSet<T, S> as serde::Deserialize<'de>>::deserialize(deserializer).map(Self::from_set)
    }
}

static_assertions::assert_impl_all!(ConcurrentSet<String>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
