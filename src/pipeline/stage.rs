//! The two seams of a pipeline: how a working set is transformed ([`Stage`])
//! and where a finished working set goes ([`CommitTarget`]).

use std::hash::{BuildHasher, Hash};

use crate::collections::UnorderedSet;

#[cfg(feature = "ordered")]
use crate::collections::InsertionOrderedSet;

/// A working set that a [`Pipeline`](super::Pipeline) can transform.
///
/// Every method consumes the current working set and returns a freshly built
/// one, so intermediate results never alias each other.
pub trait Stage: Sized {
    /// The element type.
    type Element;

    /// Builds the set of `function(e)` for every element `e`.
    #[must_use]
    fn map_stage<F>(self, function: F) -> Self
    where
        F: FnMut(Self::Element) -> Self::Element;

    /// Builds the set of elements for which `predicate` holds.
    #[must_use]
    fn filter_stage<P>(self, predicate: P) -> Self
    where
        P: FnMut(&Self::Element) -> bool;

    /// Fallible [`map_stage`](Self::map_stage).
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function`.
    fn try_map_stage<F, E>(self, function: F) -> Result<Self, E>
    where
        F: FnMut(Self::Element) -> Result<Self::Element, E>;

    /// Fallible [`filter_stage`](Self::filter_stage).
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `predicate`.
    fn try_filter_stage<P, E>(self, predicate: P) -> Result<Self, E>
    where
        P: FnMut(&Self::Element) -> Result<bool, E>;

    /// Visits every element.
    fn visit<F>(&self, function: F)
    where
        F: FnMut(&Self::Element);

    /// Returns the number of elements.
    fn element_count(&self) -> usize;
}

/// The destination of a pipeline's final working set.
pub trait CommitTarget<W> {
    /// What [`Pipeline::collect`](super::Pipeline::collect) returns.
    type Committed;

    /// Replaces the target's contents with `working`.
    fn commit(self, working: W) -> Self::Committed;
}

/// A detached pipeline: committing just hands the working set back.
impl<W> CommitTarget<W> for () {
    type Committed = W;

    fn commit(self, working: W) -> W {
        working
    }
}

// =============================================================================
// UnorderedSet
// =============================================================================

impl<T: Hash + Eq, S: BuildHasher + Clone> Stage for UnorderedSet<T, S> {
    type Element = T;

    fn map_stage<F>(self, function: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        Self::from_store(self.into_store().map(function))
    }

    fn filter_stage<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        Self::from_store(self.into_store().filter(predicate))
    }

    fn try_map_stage<F, E>(self, function: F) -> Result<Self, E>
    where
        F: FnMut(T) -> Result<T, E>,
    {
        self.into_store().try_map(function).map(Self::from_store)
    }

    fn try_filter_stage<P, E>(self, predicate: P) -> Result<Self, E>
    where
        P: FnMut(&T) -> Result<bool, E>,
    {
        self.into_store().try_filter(predicate).map(Self::from_store)
    }

    fn visit<F>(&self, function: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(function);
    }

    fn element_count(&self) -> usize {
        self.len()
    }
}

impl<'a, T, S> CommitTarget<UnorderedSet<T, S>> for &'a mut UnorderedSet<T, S> {
    type Committed = &'a mut UnorderedSet<T, S>;

    fn commit(self, working: UnorderedSet<T, S>) -> Self::Committed {
        tracing::trace!(
            previous = self.len(),
            committed = working.len(),
            "committing pipeline into unordered set"
        );
        *self = working;
        self
    }
}

// =============================================================================
// InsertionOrderedSet
// =============================================================================

#[cfg(feature = "ordered")]
impl<T: Hash + Eq + Clone, S: BuildHasher + Clone> Stage for InsertionOrderedSet<T, S> {
    type Element = T;

    fn map_stage<F>(self, mut function: F) -> Self
    where
        F: FnMut(T) -> T,
    {
        let mut mapped = self.empty_like();
        for element in self {
            mapped.insert(function(element));
        }
        mapped
    }

    fn filter_stage<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut filtered = self.empty_like();
        for element in self {
            if predicate(&element) {
                filtered.insert(element);
            }
        }
        filtered
    }

    fn try_map_stage<F, E>(self, mut function: F) -> Result<Self, E>
    where
        F: FnMut(T) -> Result<T, E>,
    {
        let mut mapped = self.empty_like();
        for element in self {
            mapped.insert(function(element)?);
        }
        Ok(mapped)
    }

    fn try_filter_stage<P, E>(self, mut predicate: P) -> Result<Self, E>
    where
        P: FnMut(&T) -> Result<bool, E>,
    {
        let mut filtered = self.empty_like();
        for element in self {
            if predicate(&element)? {
                filtered.insert(element);
            }
        }
        Ok(filtered)
    }

    fn visit<F>(&self, function: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(function);
    }

    fn element_count(&self) -> usize {
        self.len()
    }
}

#[cfg(feature = "ordered")]
impl<'a, T, S> CommitTarget<InsertionOrderedSet<T, S>> for &'a mut InsertionOrderedSet<T, S> {
    type Committed = &'a mut InsertionOrderedSet<T, S>;

    fn commit(self, working: InsertionOrderedSet<T, S>) -> Self::Committed {
        tracing::trace!(
            previous = self.len(),
            committed = working.len(),
            "committing pipeline into insertion-ordered set"
        );
        *self = working;
        self
    }
}
