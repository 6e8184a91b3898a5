//! Transformation pipelines over sets.
//!
//! A [`Pipeline`] is a cursor holding two things: an owned *working set* and a
//! *commit target*. Each `map` / `filter` step consumes the cursor and
//! materializes a brand-new working set; nothing is fused or deferred. The
//! chain ends with one of:
//!
//! - [`collect`](Pipeline::collect): hands the working set to the commit target
//!   (the originating set), replacing its contents in a single step
//! - [`into_set`](Pipeline::into_set): returns the working set, leaving the
//!   originating set untouched
//! - [`for_each`](Pipeline::for_each): visits every element of the working set
//!
//! Every method takes the cursor by value, so a terminated cursor cannot be
//! used again:
//!
//! ```compile_fail
//! use uniset::collections::UnorderedSet;
//!
//! let mut set: UnorderedSet<i32> = [1, 2, 3].into_iter().collect();
//! let pipeline = set.pipeline();
//! let _ = pipeline.into_set();
//! pipeline.collect(); // error: use of moved value
//! ```
//!
//! # State Transitions
//!
//! ```text
//!                 map / filter
//!                 ┌──────────┐
//!                 ▼          │
//!   pipeline() ─► Chaining ──┘
//!                    │
//!                    ├── collect()  ─► committed into the originating set
//!                    ├── into_set() ─► detached working set
//!                    └── for_each() ─► consumed
//! ```
//!
//! # Examples
//!
//! ```rust
//! use uniset::collections::UnorderedSet;
//!
//! let mut set: UnorderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
//!
//! // Non-injective map: colliding outputs merge
//! let parities = set.clone().into_pipeline().map(|x| x % 2).into_set();
//! assert_eq!(parities.len(), 2);
//!
//! // Commit back into the set
//! set.pipeline().map(|x| x * 2).collect();
//! let mut keys = set.keys();
//! keys.sort_unstable();
//! assert_eq!(keys, vec![2, 4, 6, 8]);
//! ```

mod stage;

pub use stage::{CommitTarget, Stage};

// =============================================================================
// Pipeline Definition
// =============================================================================

/// A single-use cursor chaining transformations over a working set `W`
/// towards a commit target `K`.
///
/// `K` decides what [`collect`](Self::collect) does:
///
/// | Target                        | Created by                            | `collect` returns |
/// |-------------------------------|---------------------------------------|-------------------|
/// | `&mut UnorderedSet`           | `UnorderedSet::pipeline`              | the committed set |
/// | `&mut InsertionOrderedSet`    | `InsertionOrderedSet::pipeline`       | the committed set |
/// | `&ConcurrentSet`              | `ConcurrentSet::pipeline`             | committed size    |
/// | `WriteScope<'_, UnorderedSet>`| `ConcurrentSet::pipeline_exclusive`   | committed size    |
/// | `()`                          | `into_pipeline`                       | the working set   |
///
/// # Failure
///
/// The originating set is only touched by `collect`. A step that panics or a
/// fallible step that returns `Err` drops the working set and leaves the
/// originating set exactly as it was.
#[must_use = "a pipeline does nothing until it is collected or consumed"]
pub struct Pipeline<W, K> {
    working: W,
    target: K,
}

impl<W, K> Pipeline<W, K> {
    pub(crate) const fn new(working: W, target: K) -> Self {
        Self { working, target }
    }

    /// Returns the current working set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// let pipeline = set.pipeline().filter(|x| *x != 2);
    /// assert_eq!(pipeline.working().len(), 2);
    /// pipeline.collect();
    /// assert_eq!(set.len(), 2);
    /// ```
    #[inline]
    pub const fn working(&self) -> &W {
        &self.working
    }
}

impl<W: Stage, K: CommitTarget<W>> Pipeline<W, K> {
    /// Replaces every element `e` of the working set with `function(e)`.
    ///
    /// If `function` is not injective, colliding outputs merge and the
    /// working set shrinks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let set: UnorderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// let halves = set.into_pipeline().map(|x| x / 2).into_set();
    /// assert_eq!(halves.len(), 3); // {0, 1, 2}
    /// ```
    pub fn map<F>(self, function: F) -> Self
    where
        F: FnMut(W::Element) -> W::Element,
    {
        Self {
            working: self.working.map_stage(function),
            target: self.target,
        }
    }

    /// Keeps only the elements for which `predicate` returns `true`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let set: UnorderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
    /// let odd = set.into_pipeline().filter(|x| x % 2 == 1).into_set();
    /// assert!(odd.contains(&1) && odd.contains(&3));
    /// assert_eq!(odd.len(), 2);
    /// ```
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&W::Element) -> bool,
    {
        Self {
            working: self.working.filter_stage(predicate),
            target: self.target,
        }
    }

    /// Fallible [`map`](Self::map).
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function`. The cursor is
    /// consumed and the originating set is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uniset::collections::UnorderedSet;
    ///
    /// let mut set: UnorderedSet<u8> = [100, 200].into_iter().collect();
    /// let result = set
    ///     .pipeline()
    ///     .try_map(|x| x.checked_add(100).ok_or("overflow"));
    /// assert_eq!(result.err(), Some("overflow"));
    /// assert!(set.contains(&200));
    /// ```
    pub fn try_map<F, E>(self, function: F) -> Result<Self, E>
    where
        F: FnMut(W::Element) -> Result<W::Element, E>,
    {
        let target = self.target;
        self.working
            .try_map_stage(function)
            .map(|working| Self { working, target })
    }

    /// Fallible [`filter`](Self::filter).
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `predicate`.
    pub fn try_filter<P, E>(self, predicate: P) -> Result<Self, E>
    where
        P: FnMut(&W::Element) -> Result<bool, E>,
    {
        let target = self.target;
        self.working
            .try_filter_stage(predicate)
            .map(|working| Self { working, target })
    }

    /// Calls `function` once per element of the working set, in the working
    /// set's iteration order. Nothing is committed.
    pub fn for_each<F>(self, function: F)
    where
        F: FnMut(&W::Element),
    {
        self.working.visit(function);
    }

    /// Commits the working set into the target, replacing its contents.
    pub fn collect(self) -> K::Committed {
        self.target.commit(self.working)
    }

    /// Returns the working set without committing it.
    pub fn into_set(self) -> W {
        self.working
    }

    /// Returns the number of elements currently in the working set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.working.element_count()
    }

    /// Returns `true` if the working set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<W: std::fmt::Debug, K> std::fmt::Debug for Pipeline<W, K> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Pipeline")
            .field("working", &self.working)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
