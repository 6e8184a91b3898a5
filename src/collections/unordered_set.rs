//! Hash set with unspecified iteration order.
//!
//! This module provides [`UnorderedSet`], a thin CRUD surface over an
//! [`ElementStore`].
//!
//! # Overview
//!
//! - O(1) amortized `insert`
//! - O(1) average `delete` and `contains`
//! - O(1) `len` and `is_empty`
//! - O(n) `keys`, which returns an owned snapshot
//!
//! Iteration order is unspecified and may change after any mutation.
//!
//! # Examples
//!
//! ```rust
//! use uniset::collections::UnorderedSet;
//!
//! let mut set = UnorderedSet::new();
//! set.insert("first");
//! set.insert("second");
//! set.insert("first");
//!
//! assert_eq!(set.len(), 2);
//! assert!(set.delete(&"first"));
//! assert!(!set.delete(&"first"));
//! assert!(!set.contains(&"first"));
//! ```

use std::borrow::Borrow;
use std::collections::{HashMap, hash_map};
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use super::{DefaultHashBuilder, ElementStore, write_braced};
use crate::error::SetError;
use crate::pipeline::Pipeline;

// =============================================================================
// UnorderedSet Definition
// =============================================================================

/// A set of unique elements with unspecified iteration order.
///
/// # Time Complexity
///
/// | Operation  | Complexity     |
/// |------------|----------------|
/// | `new`      | O(1)           |
/// | `insert`   | O(1) amortized |
/// | `delete`   | O(1) average   |
/// | `contains` | O(1) average   |
/// | `len`      | O(1)           |
/// | `keys`     | O(n)           |
/// | `clear`    | O(capacity)    |
///
/// # Examples
///
/// ```rust
/// use uniset::collections::UnorderedSet;
///
/// let set: UnorderedSet<i32> = [3, 1, 3, 2].into_iter().collect();
/// assert_eq!(set.len(), 3);
///
/// let mut keys = set.keys();
/// keys.sort_unstable();
/// assert_eq!(keys, vec![1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct UnorderedSet<T, S = DefaultHashBuilder> {
    store: ElementStore<T, S>,
}

impl<T> UnorderedSet<T, DefaultHashBuilder> {
    /// Creates an empty set with the default capacity and hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let set: UnorderedSet<i32> = UnorderedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<T, S> UnorderedSet<T, S> {
    /// Creates an empty set that hashes with `hasher`.
    #[inline]
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            store: ElementStore::with_hasher(hasher),
        }
    }

    /// Returns the number of elements in the set.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the number of elements the set can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Removes every element. Allocated capacity is retained.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<&str> = ["first", "second"].into_iter().collect();
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        tracing::debug!(removed = self.len(), "clearing unordered set");
        self.store.clear();
    }

    /// Returns an iterator visiting every element in unspecified order.
    #[inline]
    pub fn iter(&self) -> UnorderedSetIterator<'_, T> {
        UnorderedSetIterator {
            inner: self.store.iter(),
        }
    }

    /// Returns the backing store.
    #[inline]
    #[must_use]
    pub const fn store(&self) -> &ElementStore<T, S> {
        &self.store
    }

    /// Consumes the set and returns its backing store.
    #[inline]
    #[must_use]
    pub fn into_store(self) -> ElementStore<T, S> {
        self.store
    }

    /// Wraps an existing backing store.
    #[inline]
    #[must_use]
    pub const fn from_store(store: ElementStore<T, S>) -> Self {
        Self { store }
    }
}

impl<T: Hash + Eq> UnorderedSet<T, DefaultHashBuilder> {
    /// Creates an empty set able to hold `capacity` elements without reallocating.
    ///
    /// # Errors
    ///
    /// - [`SetError::InvalidArgument`] if `capacity` is negative
    /// - [`SetError::AllocationFailed`] if the reservation cannot be satisfied
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::{SetError, UnorderedSet};
    ///
    /// let set = UnorderedSet::<i32>::with_capacity(16).unwrap();
    /// assert!(set.capacity() >= 16);
    ///
    /// assert!(matches!(
    ///     UnorderedSet::<i32>::with_capacity(-1),
    ///     Err(SetError::InvalidArgument(_))
    /// ));
    /// ```
    pub fn with_capacity(capacity: isize) -> Result<Self, SetError> {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T: Hash + Eq, S: BuildHasher> UnorderedSet<T, S> {
    /// Creates an empty set with the given capacity hint and hasher.
    ///
    /// # Errors
    ///
    /// See [`with_capacity`](Self::with_capacity).
    pub fn with_capacity_and_hasher(capacity: isize, hasher: S) -> Result<Self, SetError> {
        ElementStore::try_with_capacity_and_hasher(capacity, hasher).map(Self::from_store)
    }

    /// Adds `element` to the set.
    ///
    /// Returns `true` if the element was not present. Inserting an element
    /// that is already present leaves the set unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set = UnorderedSet::new();
    /// assert!(set.insert(1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    #[inline]
    pub fn insert(&mut self, element: T) -> bool {
        self.store.insert(element)
    }

    /// Removes `element` from the set.
    ///
    /// Returns `true` if the element was present. Deleting an absent element
    /// is a no-op, not an error.
    #[inline]
    pub fn delete<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.remove(element)
    }

    /// Returns `true` if the set contains `element`.
    ///
    /// The element may be any borrowed form of the set's element type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let set: UnorderedSet<String> = ["hello".to_string()].into_iter().collect();
    /// assert!(set.contains("hello"));
    /// assert!(!set.contains("world"));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.contains(element)
    }

    /// Inserts every element of `elements`, returning how many were new.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<i32> = [1, 2].into_iter().collect();
    /// assert_eq!(set.insert_all([2, 3, 4]), 2);
    /// assert_eq!(set.len(), 4);
    /// ```
    pub fn insert_all<I: IntoIterator<Item = T>>(&mut self, elements: I) -> usize {
        let before = self.len();
        self.extend(elements);
        self.len() - before
    }
}

impl<T: Hash + Eq, S: BuildHasher + Clone> UnorderedSet<T, S> {
    /// Replaces the whole contents of the set with `elements`.
    ///
    /// The replacement is built completely before it is swapped in.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<i32> = [5].into_iter().collect();
    /// set.replace_with([1, 2, 3]);
    /// assert_eq!(set.len(), 3);
    /// assert!(!set.contains(&5));
    /// ```
    pub fn replace_with<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        let mut replacement = self.store.empty_like(self.len());
        replacement.extend(elements);
        tracing::debug!(
            previous = self.len(),
            current = replacement.len(),
            "replacing unordered set contents"
        );
        self.store = replacement;
    }

    /// Starts a transformation pipeline that commits back into this set.
    ///
    /// The pipeline works on its own copy; this set is only changed by the
    /// terminal [`collect`](Pipeline::collect).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// set.pipeline().filter(|x| x % 2 == 1).collect();
    ///
    /// let mut keys = set.keys();
    /// keys.sort_unstable();
    /// assert_eq!(keys, vec![1, 3]);
    /// ```
    pub fn pipeline(&mut self) -> Pipeline<Self, &mut Self>
    where
        T: Clone,
    {
        let working = self.clone();
        Pipeline::new(working, self)
    }

    /// Starts a transformation pipeline over this set that never commits.
    ///
    /// Consumes the set; finish with [`into_set`](Pipeline::into_set) or
    /// [`for_each`](Pipeline::for_each).
    pub const fn into_pipeline(self) -> Pipeline<Self, ()> {
        Pipeline::new(self, ())
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher> UnorderedSet<T, S> {
    /// Returns every element in an owned `Vec`, in unspecified order.
    ///
    /// The returned vector shares nothing with the set, so it can be
    /// modified freely.
    #[must_use]
    pub fn keys(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Hash + Eq + Clone, S: BuildHasher + Default> UnorderedSet<T, S> {
    /// Builds a set from the elements of a slice, dropping duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let set: UnorderedSet<&str> = UnorderedSet::from_slice(&["first", "second", "first"]);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[must_use]
    pub fn from_slice(elements: &[T]) -> Self {
        elements.iter().cloned().collect()
    }

    /// Builds a set from the keys of a map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use uniset::collections::UnorderedSet;
    ///
    /// let map = HashMap::from([("first", 1), ("second", 2), ("last", 3)]);
    /// let set: UnorderedSet<&str> = UnorderedSet::from_map(&map);
    /// assert_eq!(set.len(), 3);
    /// assert!(set.contains(&"last"));
    /// ```
    #[must_use]
    pub fn from_map<V, H>(map: &HashMap<T, V, H>) -> Self {
        map.keys().cloned().collect()
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to the elements of an [`UnorderedSet`].
pub struct UnorderedSetIterator<'a, T> {
    inner: hash_map::Keys<'a, T, ()>,
}

impl<'a, T> Iterator for UnorderedSetIterator<'a, T> {
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

impl<T> ExactSizeIterator for UnorderedSetIterator<'_, T> {}

impl<T> FusedIterator for UnorderedSetIterator<'_, T> {}

/// An owning iterator over the elements of an [`UnorderedSet`].
pub struct UnorderedSetIntoIterator<T> {
    inner: hash_map::IntoKeys<T, ()>,
}

impl<T> Iterator for UnorderedSetIntoIterator<T> {
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

impl<T> ExactSizeIterator for UnorderedSetIntoIterator<T> {}

impl<T> FusedIterator for UnorderedSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, S: Default> Default for UnorderedSet<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for UnorderedSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_store(iter.into_iter().collect())
    }
}

impl<T: Hash + Eq, S: BuildHasher> Extend<T> for UnorderedSet<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.store.extend(iter);
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default, const N: usize> From<[T; N]> for UnorderedSet<T, S> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> From<Vec<T>> for UnorderedSet<T, S> {
    fn from(elements: Vec<T>) -> Self {
        elements.into_iter().collect()
    }
}

impl<T, S> IntoIterator for UnorderedSet<T, S> {
    type Item = T;
    type IntoIter = UnorderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        UnorderedSetIntoIterator {
            inner: self.store.into_elements(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a UnorderedSet<T, S> {
    type Item = &'a T;
    type IntoIter = UnorderedSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Hash + Eq, S: BuildHasher> PartialEq for UnorderedSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for UnorderedSet<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for UnorderedSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, S> fmt::Display for UnorderedSet<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_braced(formatter, self.iter())
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize, S> serde::Serialize for UnorderedSet<T, S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
struct UnorderedSetVisitor<T, S> {
    marker: std::marker::PhantomData<(T, S)>,
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::de::Visitor<'de> for UnorderedSetVisitor<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    type Value = UnorderedSet<T, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut set = UnorderedSet::with_hasher(S::default());
        while let Some(element) = seq.next_element()? {
            set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T, S> serde::Deserialize<'de> for UnorderedSet<T, S>
where
    T: serde::Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(UnorderedSetVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

static_assertions::assert_impl_all!(UnorderedSet<String>: Send, Sync, Clone);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sorted(set: &UnorderedSet<i32>) -> Vec<i32> {
        let mut keys = set.keys();
        keys.sort_unstable();
        keys
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_set() {
        let set: UnorderedSet<i32> = UnorderedSet::new();
        assert_eq!(format!("{set}"), "{}");
    }

    #[rstest]
    fn test_display_single_element() {
        let set: UnorderedSet<i32> = [42].into();
        assert_eq!(format!("{set}"), "{42}");
    }

    #[rstest]
    fn test_display_multiple_elements() {
        let set: UnorderedSet<i32> = [1, 2, 3].into();
        let display = format!("{set}");
        assert!(display.starts_with('{'));
        assert!(display.ends_with('}'));
        assert_eq!(display.matches(", ").count(), 2);
    }

    // =========================================================================
    // CRUD Tests
    // =========================================================================

    #[rstest]
    fn test_insert_then_delete() {
        let mut set: UnorderedSet<i32> = [1, 2, 3, 4].into();
        assert!(set.delete(&3));
        assert_eq!(sorted(&set), vec![1, 2, 4]);
    }

    #[rstest]
    fn test_keys_does_not_alias() {
        let set: UnorderedSet<i32> = [1, 2].into();
        let mut keys = set.keys();
        keys.push(99);
        keys.sort_unstable();
        assert_eq!(keys, vec![1, 2, 99]);
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&99));
    }

    #[rstest]
    fn test_replace_with_discards_previous() {
        let mut set: UnorderedSet<i32> = [9, 8].into();
        set.replace_with([1, 1, 2]);
        assert_eq!(sorted(&set), vec![1, 2]);
    }

    #[rstest]
    fn test_with_capacity_zero_is_valid() {
        let set = UnorderedSet::<i32>::with_capacity(0).unwrap();
        assert!(set.is_empty());
    }

    #[rstest]
    fn test_store_round_trip() {
        let set: UnorderedSet<i32> = [1, 2].into();
        let store = set.clone().into_store();
        assert_eq!(UnorderedSet::from_store(store), set);
    }
}
