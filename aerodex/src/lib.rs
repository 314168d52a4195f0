// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builder pattern returns Self by design
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::match_same_arms)] // Intentional for clarity

//! aerodex - search-as-you-type pagination
//!
//! # Overview
//!
//! aerodex drives a list view backed by a paginated lookup service. It turns a
//! free-text query and "load more" gestures into page requests, merges the
//! pages into one list, and keeps `loading`, `error`, and `last_page_loaded`
//! consistent when requests fail or are overtaken by a newer query.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  on_change   ┌─────────────┐  start_query   ┌──────────────┐
//! │  List view   │ ───────────▶ │  Debounced  │ ─────────────▶ │    Pager     │
//! │              │ on_load_more └─────────────┘                │  (driver)    │
//! │              │ ────────────────────────────────────────────▶│              │
//! │              │ ◀──────────── PagerSnapshot (watch) ─────────│              │
//! └──────────────┘                                             └──────┬───────┘
//!                                                                     │ fetch_page(n)
//!                                                              ┌──────▼───────┐
//!                                                              │  PageSource  │
//!                                                              └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use aerodex::{Pager, source};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), aerodex::PagerError> {
//! let numbers = source::from_fn(|page| async move {
//!     Ok::<_, aerodex::FetchError>(if page < 3 { vec![page * 2, page * 2 + 1] } else { vec![] })
//! });
//!
//! let pager = Pager::new(numbers).spawn();
//! pager.start_new_query().await?;
//! while !pager.settled().await?.last_page_loaded {
//!     pager.load_next_page().await?;
//! }
//!
//! assert_eq!(pager.snapshot().items, [0, 1, 2, 3, 4, 5]);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`debounce`] - coalesce bursts of calls into one trailing call
//! - [`source`] - the [`PageSource`] contract for fetching pages
//! - [`pager`] - the pagination state machine and its tokio driver
//! - [`session`] - debounced input wired to a pager
//! - [`constants`] - defaults and environment overrides

pub mod constants;
pub mod debounce;
mod error;
pub mod pager;
pub mod session;
pub mod source;

pub use debounce::{Debounced, Invocation};
pub use error::{FetchError, InvocationError, PagerError};
pub use pager::{
    PageLoaded, Pager, PagerCore, PagerHandle, PagerSnapshot, PagerStatus, Resolution, Ticket,
};
pub use session::SearchSession;
pub use source::PageSource;

/// Prelude module for convenient imports.
///
/// ```
/// use aerodex::prelude::*;
/// ```
pub mod prelude {
    pub use crate::source;
    pub use crate::{
        Debounced, FetchError, InvocationError, PageSource, Pager, PagerError, PagerHandle, PagerSnapshot,
        PagerStatus, SearchSession,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
