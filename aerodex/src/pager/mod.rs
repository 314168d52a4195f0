//! Paginated query controller.
//!
//! Turns "start a new query" and "load more" gestures into page fetches,
//! merges the results into one growing list, and keeps the `loading`,
//! `error`, and `last_page_loaded` flags consistent when fetches fail or are
//! superseded by a newer query.
//!
//! # Layers
//!
//! | Type            | Role                                                   |
//! |-----------------|--------------------------------------------------------|
//! | [`PagerCore`]   | Synchronous state machine; actions in, tickets out     |
//! | [`Pager`]       | Builder that spawns the driver task                    |
//! | [`PagerHandle`] | Cloneable handle: actions, snapshots, subscriptions    |
//!
//! # Merge rules
//!
//! - The first page of a query **replaces** the list; later pages **append**.
//! - An empty page ends the query. An empty first page also clears the list,
//!   so a query without matches never shows the previous query's results.
//! - A failed fetch sets `error` and leaves the list alone.
//! - Results from a superseded query are discarded.
//!
//! # Concurrency
//!
//! At most one fetch is outstanding per pager. Starting a new query while a
//! fetch is in flight does not cancel it: the new query's first page is
//! requested as soon as the old fetch completes, and the old result is dropped.

mod driver;
mod state;

pub use driver::{PageLoaded, Pager, PagerHandle};
pub use state::{PagerCore, PagerSnapshot, PagerStatus, Resolution, Ticket};
