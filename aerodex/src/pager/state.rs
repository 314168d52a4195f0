//! The pager state machine, free of any runtime.

use tracing::{debug, warn};

use crate::FetchError;

/// Observable lifecycle of a pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerStatus {
    /// No query has run and nothing was prefetched.
    Idle,
    /// A fetch for the current query is outstanding.
    Loading,
    /// The latest fetch succeeded. `end` is set once an empty page arrived.
    Loaded {
        /// No further pages exist for the current query.
        end: bool,
    },
    /// The latest fetch failed. Items from before the failure are kept.
    Errored,
}

/// A point-in-time copy of the pager state for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerSnapshot<T> {
    /// Records loaded so far, in page order.
    pub items: Vec<T>,
    /// A fetch for the current query is in flight.
    pub loading: bool,
    /// The latest fetch failed.
    pub error: bool,
    /// An empty page arrived; no further page will be requested.
    pub last_page_loaded: bool,
    /// Index of the current page.
    pub page_index: usize,
    /// Summary of the flags above.
    pub status: PagerStatus,
}

/// Identifies one dispatched fetch.
///
/// A resolution is only applied when its ticket still matches the pager's
/// current epoch and dispatched page; anything else is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    epoch: u64,
    page: usize,
    append: bool,
}

impl Ticket {
    /// Query epoch the fetch belongs to.
    #[inline]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Page index to fetch.
    #[inline]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Whether the result is appended (`true`) or replaces the list (`false`).
    #[inline]
    pub const fn append(&self) -> bool {
        self.append
    }
}

/// What applying a fetch result did.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Resolution {
    /// Records were committed. `end` is set when the page was empty.
    Loaded {
        /// Page that was loaded.
        page: usize,
        /// The page was empty and marks the end of data.
        end: bool,
    },
    /// The fetch failed; items are unchanged.
    Failed(FetchError),
    /// The ticket belongs to a superseded query or page and was ignored.
    Stale,
}

/// Pagination state machine.
///
/// Actions ([`start_new_query`](Self::start_new_query),
/// [`load_next_page`](Self::load_next_page)) only change state. The fetch
/// effect is evaluated separately by [`poll_fetch`](Self::poll_fetch), which
/// hands out a [`Ticket`] when the page index differs from the last
/// dispatched one and no fetch is outstanding. The caller performs the fetch
/// and feeds the outcome back through [`resolve`](Self::resolve).
///
/// # Example
///
/// ```
/// # use aerodex::pager::{PagerCore, Resolution};
/// let mut pager = PagerCore::new(0, vec!["A", "B"]);
///
/// assert!(pager.load_next_page());
/// let ticket = pager.poll_fetch().unwrap();
/// assert_eq!(ticket.page(), 1);
/// assert!(pager.poll_fetch().is_none()); // one fetch at a time
///
/// pager.resolve(ticket, Ok(vec!["C", "D"]));
/// assert_eq!(pager.items(), ["A", "B", "C", "D"]);
/// ```
#[derive(Debug, Clone)]
pub struct PagerCore<T> {
    items: Vec<T>,
    loading: bool,
    error: bool,
    last_page_loaded: bool,
    page_index: usize,
    /// Last dispatched page. `None` right after a new query started.
    dispatched: Option<usize>,
    epoch: u64,
    in_flight: Option<Ticket>,
    idle: bool,
}

impl<T> Default for PagerCore<T> {
    /// An idle pager: nothing loaded, nothing fetched until a query starts.
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: false,
            last_page_loaded: false,
            page_index: 0,
            dispatched: Some(0),
            epoch: 0,
            in_flight: None,
            idle: true,
        }
    }
}

impl<T> PagerCore<T> {
    /// A pager seeded with an already loaded page (e.g. rendered server-side).
    ///
    /// The seed page counts as dispatched, so nothing is fetched until the
    /// next action.
    pub fn new(initial_page: usize, initial_items: Vec<T>) -> Self {
        Self {
            items: initial_items,
            page_index: initial_page,
            dispatched: Some(initial_page),
            idle: false,
            ..Self::default()
        }
    }

    /// Begin a new query epoch.
    ///
    /// Resets to page 0 and clears `last_page_loaded` and `error`. Items stay
    /// on screen until page 0 of the new query arrives. If a fetch is still
    /// outstanding, page 0 is dispatched once it resolves; its result will be
    /// discarded as stale.
    pub fn start_new_query(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.page_index = 0;
        self.dispatched = None;
        self.last_page_loaded = false;
        self.error = false;
        self.loading = true;
        self.idle = false;
    }

    /// Advance to the next page of the current query.
    ///
    /// Returns `false` and changes nothing when no next page may be requested:
    /// before any query, while a fetch is outstanding, or after the last page.
    /// After a failed first page the same page is retried instead.
    pub fn load_next_page(&mut self) -> bool {
        if self.idle || self.loading || self.last_page_loaded {
            debug!(
                idle = self.idle,
                loading = self.loading,
                last_page_loaded = self.last_page_loaded,
                "load_next_page ignored"
            );
            return false;
        }
        if self.dispatched.is_some() {
            self.page_index += 1;
        }
        self.loading = true;
        self.error = false;
        true
    }

    /// Evaluate the fetch effect.
    ///
    /// Yields a ticket while loading when the page index differs from the last
    /// dispatched page and no other fetch is outstanding, and marks that page
    /// dispatched.
    pub fn poll_fetch(&mut self) -> Option<Ticket> {
        if !self.loading || self.in_flight.is_some() || self.dispatched == Some(self.page_index) {
            return None;
        }
        let ticket = Ticket {
            epoch: self.epoch,
            page: self.page_index,
            append: self.dispatched.is_some(),
        };
        self.dispatched = Some(self.page_index);
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<Vec<T>, FetchError>) -> Resolution {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        if ticket.epoch != self.epoch || self.dispatched != Some(ticket.page) {
            debug!(
                epoch = ticket.epoch,
                page = ticket.page,
                current_epoch = self.epoch,
                "discarding stale page"
            );
            return Resolution::Stale;
        }

        self.loading = false;
        match outcome {
            Ok(page) if !page.is_empty() => {
                if ticket.append {
                    self.items.extend(page);
                } else {
                    self.items = page;
                }
                Resolution::Loaded {
                    page: ticket.page,
                    end: false,
                }
            },
            Ok(_) => {
                // A fresh query with no matches must not keep the old list.
                if !ticket.append {
                    self.items.clear();
                }
                self.last_page_loaded = true;
                Resolution::Loaded {
                    page: ticket.page,
                    end: true,
                }
            },
            Err(err) => {
                warn!(
                    page = ticket.page,
                    error = %err,
                    retryable = err.is_retryable(),
                    "page fetch failed"
                );
                self.error = true;
                // Step back so the next action re-requests the failed page.
                if ticket.append {
                    self.page_index = ticket.page.saturating_sub(1);
                    self.dispatched = Some(self.page_index);
                } else {
                    self.page_index = 0;
                    self.dispatched = None;
                }
                Resolution::Failed(err)
            },
        }
    }

    /// Records loaded so far.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// A fetch for the current query is outstanding.
    #[inline]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The latest fetch failed.
    #[inline]
    pub const fn has_error(&self) -> bool {
        self.error
    }

    /// The end of data was reached for the current query.
    #[inline]
    pub const fn last_page_loaded(&self) -> bool {
        self.last_page_loaded
    }

    /// Current page index.
    #[inline]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    /// Current query epoch.
    #[inline]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The outstanding fetch, if any. May belong to a superseded epoch.
    #[inline]
    pub const fn in_flight(&self) -> Option<Ticket> {
        self.in_flight
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> PagerStatus {
        if self.loading {
            PagerStatus::Loading
        } else if self.error {
            PagerStatus::Errored
        } else if self.idle {
            PagerStatus::Idle
        } else {
            PagerStatus::Loaded {
                end: self.last_page_loaded,
            }
        }
    }
}

impl<T: Clone> PagerCore<T> {
    /// Copy the observable state.
    pub fn snapshot(&self) -> PagerSnapshot<T> {
        PagerSnapshot {
            items: self.items.clone(),
            loading: self.loading,
            error: self.error,
            last_page_loaded: self.last_page_loaded,
            page_index: self.page_index,
            status: self.status(),
        }
    }
}
