//! A reader-writer lock that only hands out scoped access.
//!
//! [`Guard`] owns its value. The value can be reached through a [`ReadScope`]
//! (shared mode), a [`WriteScope`] (exclusive mode) or the closure forms
//! [`Guard::with_read`] and [`Guard::with_write`]. Nothing else exposes it.
//!
//! # Re-entry Detection
//!
//! Acquiring a guard that the calling thread already holds, in either mode,
//! would deadlock (exclusive) or could deadlock behind a queued writer
//! (shared). Every thread records the ids of the guards it holds, and a
//! repeated acquisition panics instead of blocking:
//!
//! ```rust,should_panic
//! use uniset::concurrent::Guard;
//!
//! let guard = Guard::new(0);
//! let _outer = guard.read();
//! let _inner = guard.write(); // panics: re-entrant access
//! ```

use std::cell::RefCell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use smallvec::SmallVec;

static NEXT_GUARD_ID: AtomicUsize = AtomicUsize::new(1);

/// Guards held by the current thread. Nesting deeper than a handful of
/// distinct guards is rare, so the ids live inline.
const INLINE_HELD: usize = 4;

thread_local! {
    static HELD_GUARDS: RefCell<SmallVec<[usize; INLINE_HELD]>> = RefCell::new(SmallVec::new());
}

fn enter(id: usize) {
    let reentered = HELD_GUARDS.with(|held| {
        let mut held = held.borrow_mut();
        if held.contains(&id) {
            true
        } else {
            held.push(id);
            false
        }
    });
    if reentered {
        tracing::error!(guard = id, "re-entrant guard acquisition");
        panic!("re-entrant access to guard {id}: the current thread already holds it");
    }
}

fn leave(id: usize) {
    // Ignored during thread teardown, when the thread-local is already gone.
    let _ = HELD_GUARDS.try_with(|held| {
        let mut held = held.borrow_mut();
        if let Some(position) = held.iter().rposition(|held_id| *held_id == id) {
            held.swap_remove(position);
        }
    });
}

// =============================================================================
// Guard Definition
// =============================================================================

/// An owned value behind a reader-writer lock.
///
/// # Blocking
///
/// | Mode      | Blocks while                        |
/// |-----------|-------------------------------------|
/// | shared    | an exclusive holder is active       |
/// | exclusive | any other holder is active          |
///
/// There is no timeout.
///
/// # Examples
///
/// ```rust
/// use uniset::concurrent::Guard;
///
/// let guard = Guard::new(vec![1, 2]);
/// guard.with_write(|items| items.push(3));
/// assert_eq!(guard.with_read(Vec::len), 3);
/// ```
pub struct Guard<T> {
    id: usize,
    lock: RwLock<T>,
}

impl<T> Guard<T> {
    /// Wraps `value` in a new guard with a fresh id.
    pub fn new(value: T) -> Self {
        Self {
            id: NEXT_GUARD_ID.fetch_add(1, Ordering::Relaxed),
            lock: RwLock::new(value),
        }
    }

    /// Returns the id used for re-entry detection. Ids are unique per process.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Acquires shared mode.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds this guard.
    pub fn read(&self) -> ReadScope<'_, T> {
        enter(self.id);
        ReadScope {
            id: self.id,
            inner: self.lock.read(),
        }
    }

    /// Acquires exclusive mode.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds this guard.
    pub fn write(&self) -> WriteScope<'_, T> {
        enter(self.id);
        WriteScope {
            id: self.id,
            inner: self.lock.write(),
        }
    }

    /// Runs `function` with shared access.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds this guard.
    pub fn with_read<R, F>(&self, function: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let scope = self.read();
        function(&*scope)
    }

    /// Runs `function` with exclusive access.
    ///
    /// # Panics
    ///
    /// Panics if the current thread already holds this guard.
    pub fn with_write<R, F>(&self, function: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut scope = self.write();
        function(&mut *scope)
    }

    /// Returns `true` if the current thread holds this guard in either mode.
    #[must_use]
    pub fn is_held_by_current_thread(&self) -> bool {
        HELD_GUARDS
            .try_with(|held| held.borrow().contains(&self.id))
            .unwrap_or(false)
    }

    /// Returns the value without locking; `&mut self` already proves exclusivity.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.lock.get_mut()
    }

    /// Consumes the guard and returns the value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.lock.into_inner()
    }
}

impl<T: Default> Default for Guard<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Guard")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Scopes
// =============================================================================

/// Shared access to a [`Guard`]'s value. Released on drop.
pub struct ReadScope<'a, T> {
    id: usize,
    inner: RwLockReadGuard<'a, T>,
}

impl<T> Deref for ReadScope<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> Drop for ReadScope<'_, T> {
    fn drop(&mut self) {
        leave(self.id);
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadScope<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, formatter)
    }
}

/// Exclusive access to a [`Guard`]'s value. Released on drop.
pub struct WriteScope<'a, T> {
    id: usize,
    inner: RwLockWriteGuard<'a, T>,
}

impl<T> Deref for WriteScope<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for WriteScope<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T> Drop for WriteScope<'_, T> {
    fn drop(&mut self) {
        leave(self.id);
    }
}

impl<T: fmt::Debug> fmt::Debug for WriteScope<'_, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, formatter)
    }
}

static_assertions::assert_impl_all!(Guard<Vec<i32>>: Send, Sync);
static_assertions::assert_not_impl_any!(ReadScope<'static, i32>: Send);
static_assertions::assert_not_impl_any!(WriteScope<'static, i32>: Send);

// =============================================================================
// Tests
// =============================================================================
