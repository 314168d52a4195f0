//! The query execution channel: how the pager obtains a page of records.
//!
//! The pager never knows how pages are fetched. It calls
//! [`PageSource::fetch_page`] with a zero-based page index and receives either
//! the records of that page or a [`FetchError`]. An empty page means there is
//! no more data.
//!
//! A source is bound to one query. When the user types a new query, the caller
//! builds a new source for it and hands it to
//! [`PagerHandle::start_query`](crate::PagerHandle::start_query).

use std::future::Future;

use crate::FetchError;

/// Asynchronous supplier of result pages for one query.
///
/// # Example
///
/// ```
/// # use aerodex::{FetchError, PageSource};
/// struct Letters;
///
/// impl PageSource<char> for Letters {
///     async fn fetch_page(&self, page: usize) -> Result<Vec<char>, FetchError> {
///         Ok(match page {
///             0 => vec!['a', 'b'],
///             1 => vec!['c'],
///             _ => vec![],
///         })
///     }
/// }
/// ```
pub trait PageSource<T>: Send + Sync + 'static {
    /// Fetch page `page` (zero-based). An empty vector signals end of data.
    fn fetch_page(&self, page: usize) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send;
}

/// A [`PageSource`] backed by a closure.
///
/// Created with [`from_fn`].
#[derive(Clone)]
pub struct FnSource<F> {
    fetch: F,
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

/// Build a [`PageSource`] from a closure returning a future.
///
/// ```
/// # use aerodex::source;
/// let pages = source::from_fn(|page| async move {
///     Ok::<_, aerodex::FetchError>(if page == 0 { vec![1, 2, 3] } else { vec![] })
/// });
/// # let _ = pages;
/// ```
pub fn from_fn<T, F, Fut>(fetch: F) -> FnSource<F>
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send,
{
    FnSource { fetch }
}

impl<T, F, Fut> PageSource<T> for FnSource<F>
where
    F: Fn(usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, FetchError>> + Send,
{
    fn fetch_page(&self, page: usize) -> impl Future<Output = Result<Vec<T>, FetchError>> + Send {
        (self.fetch)(page)
    }
}
