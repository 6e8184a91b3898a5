//! Thread-safe sets.
//!
//! - [`Guard`]: a reader-writer lock reachable only through scoped accessors
//! - [`ConcurrentSet`]: an [`UnorderedSet`](crate::UnorderedSet) behind one [`Guard`]
//!
//! # Lock Modes
//!
//! | Operation                                         | Mode      |
//! |---------------------------------------------------|-----------|
//! | `contains`, `len`, `keys`, `for_each`, `snapshot` | shared    |
//! | `insert`, `delete`, `clear`, `replace_with`       | exclusive |
//! | `pipeline` start                                  | shared    |
//! | `pipeline` commit                                 | exclusive |
//! | `pipeline_exclusive`, start to commit             | exclusive |
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use uniset::concurrent::ConcurrentSet;
//!
//! let set = Arc::new(ConcurrentSet::new());
//! let handles: Vec<_> = (0..4)
//!     .map(|worker| {
//!         let set = Arc::clone(&set);
//!         thread::spawn(move || {
//!             for offset in 0..100 {
//!                 set.insert(worker * 100 + offset);
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(set.len(), 400);
//! ```

mod concurrent_set;
mod guard;

pub use concurrent_set::ConcurrentSet;
pub use guard::{Guard, ReadScope, WriteScope};
