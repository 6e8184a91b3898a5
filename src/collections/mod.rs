//! Unique-element collections.
//!
//! - [`ElementStore`]: the uniqueness-enforcing backing store shared by every set
//! - [`UnorderedSet`]: a hash set with unspecified iteration order
//! - [`InsertionOrderedSet`]: a hash set that iterates in first-insertion order
//!
//! # Examples
//!
//! ## `UnorderedSet`
//!
//! ```rust
//! use uniset::collections::UnorderedSet;
//!
//! let mut set = UnorderedSet::new();
//! set.insert(1);
//! set.insert(2);
//! set.insert(2);
//! assert_eq!(set.len(), 2);
//!
//! // Clones are independent
//! let mut copy = set.clone();
//! copy.delete(&1);
//! assert!(set.contains(&1));
//! assert!(!copy.contains(&1));
//! ```
//!
//! ## `InsertionOrderedSet`
//!
//! ```rust
//! use uniset::collections::InsertionOrderedSet;
//!
//! let mut set = InsertionOrderedSet::new();
//! for element in [1, 2, 3, 4] {
//!     set.insert(element);
//! }
//! set.delete(&3);
//! assert_eq!(set.keys(), &[1, 2, 4]);
//! ```

// =============================================================================
// Hasher Selection
// =============================================================================

/// The `BuildHasher` used when a set is created without an explicit hasher.
///
/// With the `fxhash` feature enabled this is `rustc_hash::FxBuildHasher`,
/// with `ahash` (and not `fxhash`) it is `ahash::RandomState`, and otherwise
/// the standard library's SipHash-based `RandomState`.
#[cfg(feature = "fxhash")]
pub type DefaultHashBuilder = rustc_hash::FxBuildHasher;

/// The `BuildHasher` used when a set is created without an explicit hasher.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultHashBuilder = ahash::RandomState;

/// The `BuildHasher` used when a set is created without an explicit hasher.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultHashBuilder = std::collections::hash_map::RandomState;

pub mod store;
mod unordered_set;

#[cfg(feature = "ordered")]
mod ordered_set;

pub use store::ElementStore;
pub use unordered_set::UnorderedSet;
pub use unordered_set::UnorderedSetIntoIterator;
pub use unordered_set::UnorderedSetIterator;

#[cfg(feature = "ordered")]
pub use ordered_set::InsertionOrderedSet;
#[cfg(feature = "ordered")]
pub use ordered_set::InsertionOrderedSetIntoIterator;
#[cfg(feature = "ordered")]
pub use ordered_set::InsertionOrderedSetIterator;

/// Writes `{a, b, c}` for any sequence of displayable elements.
pub(crate) fn write_braced<'a, T, I>(
    formatter: &mut std::fmt::Formatter<'_>,
    elements: I,
) -> std::fmt::Result
where
    T: std::fmt::Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    write!(formatter, "{{")?;
    let mut first = true;
    for element in elements {
        if first {
            first = false;
        } else {
            write!(formatter, ", ")?;
        }
        write!(formatter, "{element}")?;
    }
    write!(formatter, "}}")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod default_hash_builder_tests {
    use super::DefaultHashBuilder;
    use rstest::rstest;
    use std::hash::BuildHasher;

    #[rstest]
    fn test_default_hash_builder_is_deterministic_per_instance() {
        let builder = DefaultHashBuilder::default();
        assert_eq!(builder.hash_one(42_i32), builder.hash_one(42_i32));
    }

    #[rstest]
    fn test_default_hash_builder_clone_hashes_identically() {
        let builder = DefaultHashBuilder::default();
        let cloned = builder.clone();
        assert_eq!(builder.hash_one("key"), cloned.hash_one("key"));
    }
}
