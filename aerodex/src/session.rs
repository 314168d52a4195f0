//! Binds user input to a running pager.
//!
//! A [`SearchSession`] is what a list view talks to: text input goes through
//! [`on_change`](SearchSession::on_change), which is debounced and then starts
//! a new query; the "more" control calls
//! [`on_load_more`](SearchSession::on_load_more). The view renders from
//! [`snapshot`](SearchSession::snapshot) or a [`subscribe`](SearchSession::subscribe)d
//! receiver.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;

use crate::debounce::Debounced;
use crate::pager::{PagerHandle, PagerSnapshot};
use crate::{PageSource, PagerError};

type QueryFuture = Pin<Box<dyn Future<Output = Result<String, PagerError>> + Send>>;
type QueryChange = Box<dyn Fn(String) -> QueryFuture + Send + Sync>;

/// Debounced search input wired to a [`PagerHandle`].
///
/// `factory` turns a query string into the [`PageSource`] for that query.
///
/// # Example
///
/// ```
/// # use aerodex::{Pager, SearchSession, source};
/// # use std::time::Duration;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), aerodex::PagerError> {
/// fn lookup(query: &str) -> impl aerodex::PageSource<String> + use<> {
///     let query = query.to_string();
///     source::from_fn(move |page| {
///         let query = query.clone();
///         async move {
///             Ok::<_, aerodex::FetchError>(if page == 0 { vec![query] } else { vec![] })
///         }
///     })
/// }
///
/// let pager = Pager::new(lookup("")).spawn();
/// let session = SearchSession::new(pager, lookup, Duration::from_millis(5));
///
/// let _ = session.on_change("b");
/// let applied = session.on_change("ber").await?;
/// assert_eq!(applied, "ber");
///
/// let state = session.pager().settled().await?;
/// assert_eq!(state.items, ["ber"]);
/// # Ok(())
/// # }
/// ```
pub struct SearchSession<T, S> {
    pager: PagerHandle<T, S>,
    input: Debounced<String, QueryChange>,
    query: Arc<Mutex<String>>,
}

impl<T, S> std::fmt::Debug for SearchSession<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("pager", &self.pager)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl<T, S> SearchSession<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: PageSource<T>,
{
    /// Wire `pager` to debounced input with the given window.
    pub fn new<F>(pager: PagerHandle<T, S>, factory: F, delay: Duration) -> Self
    where
        F: Fn(&str) -> S + Send + Sync + 'static,
    {
        Self::wire(pager, factory, |on_query| Debounced::new(on_query, delay))
    }

    /// Wire `pager` to debounced input with the default window.
    ///
    /// See [`constants::debounce_delay`](crate::constants::debounce_delay).
    pub fn with_default_delay<F>(pager: PagerHandle<T, S>, factory: F) -> Self
    where
        F: Fn(&str) -> S + Send + Sync + 'static,
    {
        Self::wire(pager, factory, Debounced::with_default_delay)
    }

    fn wire<F>(
        pager: PagerHandle<T, S>,
        factory: F,
        debounce: impl FnOnce(QueryChange) -> Debounced<String, QueryChange>,
    ) -> Self
    where
        F: Fn(&str) -> S + Send + Sync + 'static,
    {
        let query = Arc::new(Mutex::new(String::new()));
        let applied = Arc::clone(&query);
        let target = pager.clone();
        let factory = Arc::new(factory);

        let on_query: QueryChange = Box::new(move |raw: String| -> QueryFuture {
            let target = target.clone();
            let factory = Arc::clone(&factory);
            let applied = Arc::clone(&applied);
            Box::pin(async move {
                let query = raw.trim().to_string();
                debug!(query = %query, "starting new query");
                target.start_query((*factory)(&query)).await?;
                *applied.lock().unwrap_or_else(PoisonError::into_inner) = query.clone();
                Ok(query)
            })
        });

        Self {
            pager,
            input: debounce(on_query),
            query,
        }
    }

    /// Feed one input event.
    ///
    /// The event is scheduled immediately; the returned future only reports
    /// the outcome. It resolves to the query that was started once the
    /// debounce window elapses; superseded events never resolve.
    pub fn on_change<Q>(
        &self,
        query: Q,
    ) -> impl Future<Output = Result<String, PagerError>> + Send + use<T, S, Q>
    where
        Q: Into<String>,
    {
        let invocation = self.input.call(query.into());
        async move { invocation.await? }
    }

    /// Ask for one more page.
    ///
    /// Ignored (returns `Ok(false)`) while a page is loading or once the last
    /// page has arrived, like a disabled "more" button.
    pub async fn on_load_more(&self) -> Result<bool, PagerError> {
        let state = self.pager.snapshot();
        if state.loading || state.last_page_loaded {
            return Ok(false);
        }
        self.pager.load_next_page().await
    }

    /// The query most recently handed to the pager.
    pub fn query(&self) -> String {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether an input event is waiting for its debounce window.
    pub fn is_typing(&self) -> bool {
        self.input.is_pending()
    }

    /// The most recently published pager state.
    pub fn snapshot(&self) -> PagerSnapshot<T> {
        self.pager.snapshot()
    }

    /// A receiver notified on every pager state change.
    pub fn subscribe(&self) -> watch::Receiver<PagerSnapshot<T>> {
        self.pager.subscribe()
    }

    /// The underlying pager.
    pub const fn pager(&self) -> &PagerHandle<T, S> {
        &self.pager
    }
}
