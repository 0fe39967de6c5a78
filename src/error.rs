//! Error types for the ghostcache library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when a cache is constructed with invalid
//!   parameters (zero capacity, out-of-range 2Q ratios).
//! - [`InvariantError`]: Returned by `check_invariants` when the internal
//!   bookkeeping of a policy is inconsistent.
//!
//! ## Example Usage
//!
//! ```
//! use ghostcache::error::ConfigError;
//! use ghostcache::policy::two_q::TwoQCache;
//!
//! let cache: Result<TwoQCache<String>, ConfigError> = TwoQCache::try_with_ratios(100, 0.25, 0.5);
//! assert!(cache.is_ok());
//!
//! let bad = TwoQCache::<String>::try_with_ratios(100, 1.5, 0.5);
//! assert!(matches!(bad, Err(ConfigError::RatioOutOfRange { name: "recent_ratio", .. })));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Construction is the only fallible operation in this crate; every other
/// operation reports absence through `Option`/`bool`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The requested capacity was zero.
    ZeroCapacity,
    /// A ratio was NaN, infinite, or outside `[0.0, 1.0]`.
    RatioOutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl ConfigError {
    /// Validates a ratio parameter, returning it unchanged when it is in range.
    pub(crate) fn check_ratio(name: &'static str, value: f64) -> Result<f64, ConfigError> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::RatioOutOfRange { name, value })
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => f.write_str("cache capacity must be greater than zero"),
            ConfigError::RatioOutOfRange { name, value } => {
                write!(f, "{} must be in [0.0, 1.0], got {}", name, value)
            },
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by `check_invariants` on [`LruCore`](crate::policy::lru::LruCore),
/// [`TwoQCache`](crate::policy::two_q::TwoQCache) and
/// [`ArcCache`](crate::policy::arc::ArcCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

/// Returns `Err(InvariantError)` with a formatted message when `cond` is false.
macro_rules! ensure_invariant {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::InvariantError::new(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_invariant;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
