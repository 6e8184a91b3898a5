//! The uniqueness-enforcing backing store.
//!
//! [`ElementStore`] maps each element to a `()` presence marker, so the hash
//! map's key uniqueness is the set's uniqueness. Every set in this crate owns
//! exactly one store; pipelines build fresh stores and hand them over on
//! commit.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use super::DefaultHashBuilder;
use crate::error::SetError;

/// A map from element to presence marker.
///
/// # Time Complexity
///
/// | Operation  | Complexity     |
/// |------------|----------------|
/// | `insert`   | O(1) amortized |
/// | `remove`   | O(1) average   |
/// | `contains` | O(1) average   |
/// | `len`      | O(1)           |
/// | `map`      | O(n)           |
/// | `filter`   | O(n)           |
///
/// # Examples
///
/// ```rust
/// use uniset::collections::ElementStore;
///
/// let mut store: ElementStore<&str> = ElementStore::new();
/// assert!(store.insert("a"));
/// assert!(!store.insert("a"));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Clone)]
pub struct ElementStore<T, S = DefaultHashBuilder> {
    entries: HashMap<T, (), S>,
}

impl<T> ElementStore<T, DefaultHashBuilder> {
    /// Creates an empty store using the default hasher.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<T, S> ElementStore<T, S> {
    /// Creates an empty store that hashes with `hasher`.
    #[inline]
    #[must_use]
    pub const fn with_hasher(hasher: S) -> Self {
        Self {
            entries: HashMap::with_hasher(hasher),
        }
    }

    /// Returns the number of stored elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no element is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of elements the store can hold without reallocating.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns the store's hasher.
    #[inline]
    #[must_use]
    pub fn hasher(&self) -> &S {
        self.entries.hasher()
    }

    /// Removes every element, keeping the allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over the stored elements in unspecified order.
    #[inline]
    pub fn iter(&self) -> hash_map::Keys<'_, T, ()> {
        self.entries.keys()
    }

    /// Consumes the store, yielding its elements in unspecified order.
    #[inline]
    pub fn into_elements(self) -> hash_map::IntoKeys<T, ()> {
        self.entries.into_keys()
    }
}

impl<T: Hash + Eq, S: BuildHasher> ElementStore<T, S> {
    /// Creates an empty store able to hold `capacity` elements.
    ///
    /// # Errors
    ///
    /// - [`SetError::InvalidArgument`] if `capacity` is negative
    /// - [`SetError::AllocationFailed`] if the reservation cannot be satisfied
    pub fn try_with_capacity_and_hasher(capacity: isize, hasher: S) -> Result<Self, SetError> {
        let capacity = SetError::check_capacity(capacity)?;
        let mut entries = HashMap::with_hasher(hasher);
        entries.try_reserve(capacity)?;
        Ok(Self { entries })
    }

    /// Adds `element`, returning `true` if it was not already present.
    ///
    /// A repeated insert leaves the originally stored value in place.
    #[inline]
    pub fn insert(&mut self, element: T) -> bool {
        match self.entries.entry(element) {
            hash_map::Entry::Occupied(_) => false,
            hash_map::Entry::Vacant(vacant) => {
                vacant.insert(());
                true
            }
        }
    }

    /// Removes `element`, returning `true` if it was present.
    #[inline]
    pub fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(element).is_some()
    }

    /// Returns `true` if `element` is stored.
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(element)
    }

    /// Reserves room for at least `additional` more elements.
    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }
}

impl<T: Hash + Eq, S: BuildHasher + Clone> ElementStore<T, S> {
    /// Creates an empty store sharing this store's hasher, sized for `capacity`.
    #[must_use]
    pub fn empty_like(&self, capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity_and_hasher(capacity, self.entries.hasher().clone()),
        }
    }

    /// Builds a new store holding `function(e)` for every element `e`.
    ///
    /// Outputs that collide merge, so the result may be smaller than `self`.
    #[must_use]
    pub fn map<F>(self, mut function: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        let mut mapped = self.empty_like(self.len());
        for element in self.into_elements() {
            mapped.insert(function(element));
        }
        mapped
    }

    /// Builds a new store holding the elements for which `predicate` holds.
    #[must_use]
    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut filtered = self.empty_like(self.len());
        for element in self.into_elements() {
            if predicate(&element) {
                filtered.insert(element);
            }
        }
        filtered
    }

    /// Like [`map`](Self::map), but stops at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function`.
    pub fn try_map<F, E>(self, mut function: F) -> Result<Self, E>
    where
        F: FnMut(T) -> Result<T, E>,
    {
        let mut mapped = self.empty_like(self.len());
        for element in self.into_elements() {
            mapped.insert(function(element)?);
        }
        Ok(mapped)
    }

    /// Like [`filter`](Self::filter), but stops at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `predicate`.
    pub fn try_filter<P, E>(self, mut predicate: P) -> Result<Self, E>
    where
        P: FnMut(&T) -> Result<bool, E>,
    {
        let mut filtered = self.empty_like(self.len());
        for element in self.into_elements() {
            if predicate(&element)? {
                filtered.insert(element);
            }
        }
        Ok(filtered)
    }
}

impl<T, S: Default> Default for ElementStore<T, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T: Hash + Eq, S: BuildHasher> PartialEq for ElementStore<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|element| other.contains(element))
    }
}

impl<T: Hash + Eq, S: BuildHasher> Eq for ElementStore<T, S> {}

impl<T: fmt::Debug, S> fmt::Debug for ElementStore<T, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for ElementStore<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut store = Self::default();
        store.extend(iter);
        store
    }
}

impl<T: Hash + Eq, S: BuildHasher> Extend<T> for ElementStore<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for element in iter {
            self.insert(element);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn store_of(elements: &[i32]) -> ElementStore<i32> {
        elements.iter().copied().collect()
    }

    #[rstest]
    fn test_insert_reports_novelty() {
        let mut store: ElementStore<i32> = ElementStore::new();
        assert!(store.insert(1));
        assert!(!store.insert(1));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn test_remove_absent_is_false() {
        let mut store = store_of(&[1, 2]);
        assert!(!store.remove(&3));
        assert!(store.remove(&2));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn test_clear_keeps_capacity() {
        let mut store = store_of(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let capacity = store.capacity();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), capacity);
    }

    #[rstest]
    fn test_try_with_capacity_rejects_negative() {
        let result: Result<ElementStore<i32>, _> =
            ElementStore::try_with_capacity_and_hasher(-3, DefaultHashBuilder::default());
        assert!(matches!(result, Err(SetError::InvalidArgument(_))));
    }

    #[rstest]
    fn test_try_with_capacity_reserves() {
        let store: ElementStore<i32> =
            ElementStore::try_with_capacity_and_hasher(64, DefaultHashBuilder::default())
                .unwrap();
        assert!(store.capacity() >= 64);
        assert!(store.is_empty());
    }

    #[rstest]
    fn test_try_with_capacity_reports_allocation_failure() {
        let result: Result<ElementStore<u64>, _> =
            ElementStore::try_with_capacity_and_hasher(isize::MAX, DefaultHashBuilder::default());
        assert!(matches!(result, Err(SetError::AllocationFailed(_))));
    }

    #[rstest]
    fn test_map_merges_collisions() {
        let mapped = store_of(&[1, 2, 3, 4]).map(|element| element % 2);
        assert_eq!(mapped, store_of(&[0, 1]));
    }

    #[rstest]
    fn test_filter_may_empty() {
        let filtered = store_of(&[2, 4]).filter(|element| element % 2 == 1);
        assert!(filtered.is_empty());
    }

    #[rstest]
    fn test_try_map_stops_at_first_error() {
        let result = store_of(&[1, 2, 3]).try_map(|element| {
            if element == 2 { Err("two") } else { Ok(element) }
        });
        assert_eq!(result.err(), Some("two"));
    }

    #[rstest]
    fn test_debug_lists_elements_as_set() {
        assert_eq!(format!("{:?}", store_of(&[7])), "{7}");
        assert_eq!(format!("{:?}", store_of(&[])), "{}");
    }

    #[rstest]
    fn test_contains_with_borrowed_form() {
        let mut store: ElementStore<String> = ElementStore::new();
        store.insert("hello".to_string());
        assert!(store.contains("hello"));
        assert!(!store.contains("world"));
    }
}
