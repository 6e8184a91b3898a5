//! # uniset
//!
//! Unique-element containers with a fluent, commit-on-collect transformation
//! pipeline.
//!
//! ## Overview
//!
//! - **Unordered Set**: [`UnorderedSet`], a hash-backed set with unspecified order
//! - **Insertion-Ordered Set**: [`InsertionOrderedSet`], which remembers first-insertion order
//! - **Concurrent Set**: [`ConcurrentSet`], an [`UnorderedSet`] behind a single
//!   reader-writer [`Guard`](concurrent::Guard)
//! - **Pipeline**: `map` / `filter` / `for_each` / `collect` chains over any of the above
//!
//! ## Feature Flags
//!
//! - `unordered`: [`UnorderedSet`] and the pipeline
//! - `ordered`: [`InsertionOrderedSet`]
//! - `concurrent`: [`ConcurrentSet`] and its guard (pulls in `parking_lot`)
//! - `serde`: serialization of every set as a sequence
//! - `fxhash` / `ahash`: swap the default hasher
//! - `full`: all of the above except the hasher choice
//!
//! ## Example
//!
//! ```rust
//! use uniset::prelude::*;
//!
//! let mut set: UnorderedSet<i32> = [1, 2, 3, 4].into_iter().collect();
//! set.pipeline().map(|x| x * 2).filter(|x| *x > 4).collect();
//!
//! assert_eq!(set.len(), 2);
//! assert!(set.contains(&6));
//! assert!(set.contains(&8));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use uniset::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::*;

    #[cfg(feature = "unordered")]
    pub use crate::collections::*;

    #[cfg(feature = "unordered")]
    pub use crate::pipeline::*;

    #[cfg(feature = "concurrent")]
    pub use crate::concurrent::*;
}

pub mod error;

#[cfg(feature = "unordered")]
pub mod collections;

#[cfg(feature = "unordered")]
pub mod pipeline;

#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::{InvalidCapacityError, SetError};

#[cfg(feature = "unordered")]
pub use collections::{DefaultHashBuilder, UnorderedSet};

#[cfg(feature = "ordered")]
pub use collections::InsertionOrderedSet;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentSet;
