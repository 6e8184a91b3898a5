//! Error types for set construction.
//!
//! Absent elements are never errors: `delete` reports `false` and `contains`
//! reports `false`. The only fallible operation is construction with an
//! explicit capacity hint, which may be negative or too large to reserve.

use std::collections::TryReserveError;

/// Represents a negative capacity hint passed to a `with_capacity` constructor.
///
/// # Examples
///
/// ```rust
/// use uniset::InvalidCapacityError;
///
/// let error = InvalidCapacityError { requested: -4 };
/// assert_eq!(
///     format!("{error}"),
///     "invalid capacity -4: capacity must not be negative"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCapacityError {
    /// The capacity hint that was rejected.
    pub requested: isize,
}

impl std::fmt::Display for InvalidCapacityError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "invalid capacity {}: capacity must not be negative",
            self.requested
        )
    }
}

impl std::error::Error for InvalidCapacityError {}

/// Errors returned while constructing a set.
///
/// A failed construction never yields a partially built set.
///
/// # Examples
///
/// ```rust
/// use uniset::{SetError, UnorderedSet};
///
/// let result = UnorderedSet::<i32>::with_capacity(-1);
/// assert!(matches!(result, Err(SetError::InvalidArgument(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetError {
    /// The capacity hint was negative.
    InvalidArgument(InvalidCapacityError),
    /// The backing store could not reserve the requested capacity.
    AllocationFailed(TryReserveError),
}

impl SetError {
    /// Validates a signed capacity hint, returning it as `usize`.
    ///
    /// # Errors
    ///
    /// Returns [`SetError::InvalidArgument`] when `capacity` is negative.
    pub fn check_capacity(capacity: isize) -> Result<usize, Self> {
        usize::try_from(capacity)
            .map_err(|_| Self::InvalidArgument(InvalidCapacityError { requested: capacity }))
    }
}

impl std::fmt::Display for SetError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(error) => write!(formatter, "{error}"),
            Self::AllocationFailed(error) => {
                write!(formatter, "failed to reserve set capacity: {error}")
            }
        }
    }
}

impl std::error::Error for SetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidArgument(error) => Some(error),
            Self::AllocationFailed(error) => Some(error),
        }
    }
}

impl From<InvalidCapacityError> for SetError {
    fn from(error: InvalidCapacityError) -> Self {
        Self::InvalidArgument(error)
    }
}

impl From<TryReserveError> for SetError {
    fn from(error: TryReserveError) -> Self {
        Self::AllocationFailed(error)
    }
}
