//! Centralized constants for the aerodex crate.
//!
//! All delays, sizes, and defaults are defined here for easy tuning
//! and consistent behavior across the controller and its collaborators.
//!
//! # Environment Variables
//!
//! Some defaults can be configured via environment variables:
//!
//! | Variable              | Default | Description                         |
//! |-----------------------|---------|-------------------------------------|
//! | `AERODEX_DEBOUNCE_MS` | 500     | Debounce window for query input     |
//! | `AERODEX_PAGE_SIZE`   | 20      | Records per page on the lookup API  |
//!
//! ## Example
//!
//! ```bash
//! # Snappier typeahead
//! AERODEX_DEBOUNCE_MS=250
//!
//! # Bigger pages
//! AERODEX_PAGE_SIZE=50
//! ```

use std::sync::OnceLock;
use std::time::Duration;

// ============================================================================
// DEBOUNCE
// ============================================================================

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

static DEBOUNCE_MS_CACHE: OnceLock<u64> = OnceLock::new();

/// Returns the debounce window used when none is configured explicitly.
///
/// Reads `AERODEX_DEBOUNCE_MS` on first call and falls back to
/// [`DEFAULT_DEBOUNCE_MS`] if it is unset or not a number. The value is
/// cached for the lifetime of the process.
#[inline]
pub fn debounce_delay() -> Duration {
    let ms = *DEBOUNCE_MS_CACHE.get_or_init(|| {
        std::env::var("AERODEX_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DEBOUNCE_MS)
    });
    Duration::from_millis(ms)
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Default number of records per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size accepted from configuration.
pub const MAX_PAGE_SIZE: usize = 1_000;

static PAGE_SIZE_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the page size used when none is configured explicitly.
///
/// Reads `AERODEX_PAGE_SIZE` on first call. Zero, values above
/// [`MAX_PAGE_SIZE`], and unparsable values fall back to [`DEFAULT_PAGE_SIZE`].
#[inline]
pub fn page_size() -> usize {
    *PAGE_SIZE_CACHE.get_or_init(|| {
        std::env::var("AERODEX_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&n| n > 0 && n <= MAX_PAGE_SIZE)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    })
}

// ============================================================================
// PAGER DRIVER
// ============================================================================

/// Capacity of the pager's action queue.
///
/// Actions are tiny and handled immediately; this only bounds a burst of
/// gestures arriving while a completion is being applied.
pub const ACTION_QUEUE_CAPACITY: usize = 64;
