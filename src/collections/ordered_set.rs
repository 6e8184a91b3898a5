//! Hash set that remembers first-insertion order.
//!
//! This module provides [`InsertionOrderedSet`], an [`ElementStore`] paired
//! with a `Vec` recording the order in which elements were first inserted.
//!
//! # Overview
//!
//! The store answers membership in O(1); the sequence answers order. Every
//! mutation updates both, so they always hold the same elements:
//!
//! - `insert` appends to the sequence only when the element is new
//! - `delete` removes from the store and splices the sequence, keeping the
//!   relative order of everything else (a linear scan, O(n))
//! - `keys` borrows the live sequence
//!
//! # Examples
//!
//! ```rust
//! use uniset::collections::InsertionOrderedSet;
//!
//! let mut set = InsertionOrderedSet::new();
//! set.insert(3);
//! set.insert(1);
//! set.insert(3);
//! set.insert(2);
//! assert_eq!(set.keys(), &[3, 1, 2]);
//!
//! set.delete(&1);
//! assert_eq!(set.keys(), &[3, 2]);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use super::{DefaultHashBuilder, ElementStore, write_braced};
use crate::error::SetError;
use crate::pipeline::Pipeline;

/// Panic message for a store/sequence mismatch.
const CONSISTENCY_INVARIANT_PANIC_MESSAGE: &str =
    "InsertionOrderedSet invariant violated: store and sequence disagree";

// =============================================================================
// InsertionOrderedSet Definition
// =============================================================================

/// A set of unique elements iterated in first-insertion order.
///
/// # Time Complexity
///
/// | Operation  | Complexity     |
/// |------------|----------------|
/// | `insert`   | O(1) amortized |
/// | `delete`   | O(n)           |
/// | `contains` | O(1) average   |
/// | `len`      | O(1)           |
/// | `keys`     | O(1)           |
///
/// # Equality
///
/// Two insertion-ordered sets are equal only if they hold the same elements
/// in the same order.
///
/// # Examples
///
/// ```rust
/// use uniset::collections::InsertionOrderedSet;
///
/// let set: InsertionOrderedSet<&str> = ["b", "a", "b", "c"].into_iter().collect();
/// assert_eq!(set.keys(), &["b", "a", "c"]);
/// assert_eq!(format!("{set}"), "{b, a, c}");
/// ```
#[derive(Clone)]
pub struct InsertionOrderedSet<T, S = DefaultHashBuilder> {
    store: ElementStore<T, S>,
    sequence: Vec<T>,
}

impl<T> InsertionOrderedSet<T, DefaultHashBuilder> {
    /// Creates an empty set using the default hasher.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<T, S> InsertionOrderedSet<T, S> {
    /// Creates an empty set that hashes with `hasher`.
    #[inline]
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            store: ElementStore::with_hasher(hasher),
            sequence: Vec::new(),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Returns the elements in first-insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::InsertionOrderedSet;
    ///
    /// let set: InsertionOrderedSet<i32> = [1, 2, 4].into_iter().collect();
    /// assert_eq!(set.keys(), &[1, 2, 4]);
    /// ```
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[T] {
        &self.sequence
    }

    /// Returns the first-inserted element still present.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.sequence.first()
    }

    /// Returns the most recently inserted element still present.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.sequence.last()
    }

    /// Returns an iterator over the elements in first-insertion order.
    #[inline]
    pub fn iter(&self) -> InsertionOrderedSetIterator<'_, T> {
        InsertionOrderedSetIterator {
            inner: self.sequence.iter(),
        }
    }

    /// Removes every element from both the store and the sequence.
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.len(), "clearing insertion-ordered set");
        self.store.clear();
        self.sequence.clear();
    }
}

impl<T: Hash + Eq + Clone> InsertionOrderedSet<T, DefaultHashBuilder> {
    /// Creates an empty set able to hold `capacity` elements without reallocating.
    ///
    /// # Errors
    ///
    /// - [`SetError::InvalidArgument`] if `capacity` is negative
    /// - [`SetError::AllocationFailed`] if the reservation cannot be satisfied
    pub fn with_capacity(capacity: isize) -> Result<Self, SetError> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Builds a set from a slice, keeping the first occurrence of each element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::InsertionOrderedSet;
    ///
    /// let set = InsertionOrderedSet::<&str>::from_slice(&["first", "second", "first", "last"]);
    /// assert_eq!(set.keys(), &["first", "second", "last"]);
    /// ```
    #[must_use]
    pub fn from_slice(elements: &[T]) -> Self {
        elements.iter().cloned().collect()
    }

    /// Builds a set from the keys of a map, in the map's iteration order.
    #[must_use]
    pub fn from_map<V, H>(map: &HashMap<T, V, H>) -> Self {
        map.keys().cloned().collect()
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher> InsertionOrderedSet<T, S> {
    /// Creates an empty set with the given capacity hint and hasher.
    ///
    /// # Errors
    ///
    /// See [`with_capacity`](Self::with_capacity).
    pub fn with_capacity_and_hasher(capacity: isize, hasher: S) -> Result<Self, SetError> {
        let requested = SetError::check_capacity(capacity)?;
        let store = ElementStore::try_with_capacity_and_hasher(capacity, hasher)?;
        let mut sequence = Vec::new();
        sequence.try_reserve_exact(requested)?;
        Ok(Self { store, sequence })
    }

    /// Appends `element` if it is not already present.
    ///
    /// Returns `true` if the element was new. A repeated insert does not move
    /// the element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::InsertionOrderedSet;
    ///
    /// let mut set = InsertionOrderedSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.insert(2));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.keys(), &[1, 2]);
    /// ```
    pub fn insert(&mut self, element: T) -> bool {
        if self.store.contains(&element) {
            return false;
        }
        self.store.insert(element.clone());
        self.sequence.push(element);
        debug_assert_eq!(
            self.store.len(),
            self.sequence.len(),
            "{}",
            CONSISTENCY_INVARIANT_PANIC_MESSAGE
        );
        true
    }

    /// Removes `element`, preserving the order of the remaining elements.
    ///
    /// Returns `true` if the element was present.
    pub fn delete<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.store.remove(element) {
            return false;
        }
        if let Some(position) = self
            .sequence
            .iter()
            .position(|item| <T as Borrow<Q>>::borrow(item) == element)
        {
            self.sequence.remove(position);
        }
        debug_assert_eq!(
            self.store.len(),
            self.sequence.len(),
            "{}",
            CONSISTENCY_INVARIANT_PANIC_MESSAGE
        );
        true
    }

    /// Returns `true` if the set contains `element`.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains(element)
    }

    /// Returns the position of `element` in insertion order.
    #[must_use]
    pub fn position_of<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if !self.store.contains(element) {
            return None;
        }
        self.sequence
            .iter()
            .position(|item| <T as Borrow<Q>>::borrow(item) == element)
    }

    /// Appends every new element of `elements`, returning how many were new.
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, elements: I) -> usize {
        let before = self.len();
        self.extend(elements);
        self.len() - before
    }

    /// Returns an owned copy of the elements in insertion order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.sequence.clone()
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> InsertionOrderedSet<T, S> {
    /// Creates an empty set sharing this set's hasher, sized for `self.len()`.
    pub(crate) fn empty_like(&self) -> Self {
        Self {
            store: self.store.empty_like(self.len()),
            sequence: Vec::with_capacity(self.len()),
        }
    }

    /// Replaces the whole contents with `elements`, in their iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::InsertionOrderedSet;
    ///
    /// let mut set: InsertionOrderedSet<i32> = [5].into_iter().collect();
    /// set.replace_with([3, 2, 1]);
    /// assert_eq!(set.keys(), &[3, 2, 1]);
    /// ```
    pub fn replace_with<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        let mut replacement = self.empty_like();
        replacement.extend(elements);
        tracing::debug!(
            previous = self.len(),
            current = replacement.len(),
            "replacing insertion-ordered set contents"
        );
        *self = replacement;
    }

    /// Starts a transformation pipeline that commits back into this set.
    ///
    /// `map` keeps the first-occurrence order of its outputs and `filter`
    /// keeps relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::InsertionOrderedSet;
    ///
    /// let mut set: InsertionOrderedSet<i32> = [4, 3, 2, 1].into_iter().collect();
    /// set.pipeline().map(|x| x / 2).collect();
    /// assert_eq!(set.keys(), &[2, 1, 0]);
    /// ```
    pub fn pipeline(&mut self) -> Pipeline<Self, &mut Self> {
        let working = self.clone();
        Pipeline::new(working, self)
    }

    /// Starts a transformation pipeline over this set that never commits.
    pub const fn into_pipeline(self) -> Pipeline<Self, ()> {
        Pipeline::new(self, ())
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to the elements of an [`InsertionOrderedSet`],
/// in insertion order.
pub struct InsertionOrderedSetIterator<'a, T> {
    inner: std::slice::Iter<'a, T>,
}

impl<'a, T> Iterator for InsertionOrderedSetIterator<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for InsertionOrderedSetIterator<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for InsertionOrderedSetIterator<'_, T> {}

impl<T> FusedIterator for InsertionOrderedSetIterator<'_, T> {}

/// An owning iterator over the elements of an [`InsertionOrderedSet`], in
/// insertion order.
pub struct InsertionOrderedSetIntoIterator<T> {
    inner: std::vec::IntoIter<T>,
}

impl<T> Iterator for InsertionOrderedSetIntoIterator<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for InsertionOrderedSetIntoIterator<T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for InsertionOrderedSetIntoIterator<T> {}

impl<T> FusedIterator for InsertionOrderedSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for InsertionOrderedSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Default> FromIterator<T>
    for InsertionOrderedSet<T, S>
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher> Extend<T> for InsertionOrderedSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let additional = iter.size_hint().0;
        self.store.reserve(additional);
        self.sequence.reserve(additional);
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Default, const N: usize> From<[T; N]>
    for InsertionOrderedSet<T, S>
{
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Default> From<Vec<T>> for InsertionOrderedSet<T, S> {
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<T, S> IntoIterator for InsertionOrderedSet<T, S> {
    type Item = T;
    type IntoIter = InsertionOrderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        InsertionOrderedSetIntoIterator {
            inner: self.sequence.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a InsertionOrderedSet<T, S> {
    type Item = &'a T;
    type IntoIter = InsertionOrderedSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, S> PartialEq for InsertionOrderedSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.sequence == other.sequence
    }
}

impl<T: Eq, S> Eq for InsertionOrderedSet<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for InsertionOrderedSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, S> fmt::Display for InsertionOrderedSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_braced(formatter, self.iter())
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for InsertionOrderedSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct InsertionOrderedSetVisitor<T, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for InsertionOrderedSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    type Value = InsertionOrderedSet<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = InsertionOrderedSet::with_hasher(S::default());
        while let Some(element) = seq.next_element()? {
            set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for InsertionOrderedSet<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(InsertionOrderedSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

static_assertions::assert_impl_all!(InsertionOrderedSet<String>: Send, Sync, Clone);

// =============================================================================
// Tests
// =============================================================================
