//! Feeds the lookup routes into a pager.

use std::future::Future;
use std::time::Duration;

use aerodex::{FetchError, PageSource};
use tracing::trace;

use crate::directory::Airport;
use crate::routes::{Method, Router, percent_encode};

/// A [`PageSource`] answering one query through a [`Router`].
///
/// Each fetch issues `GET /airports/page/{page}/{query}` in-process and
/// decodes the JSON body, so the pager sees exactly what an HTTP client of the
/// lookup service would. An optional latency is slept before each request.
///
/// ```
/// # use aerodex_directory::{Airport, Directory, DirectorySource, Router};
/// # use aerodex::PageSource;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let router = Router::new(Directory::new(vec![
///     Airport::new("MUC", "Munich Airport", "Munich", "Germany"),
/// ]));
/// let source = DirectorySource::new(router, "munich");
///
/// let page = source.fetch_page(0).await.unwrap();
/// assert_eq!(page[0].iata, "MUC");
/// assert!(source.fetch_page(1).await.unwrap().is_empty());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySource {
    router: Router,
    query: String,
    latency: Duration,
}

impl DirectorySource {
    /// A source for `query` with no added latency.
    pub fn new(router: Router, query: impl Into<String>) -> Self {
        Self {
            router,
            query: query.into(),
            latency: Duration::ZERO,
        }
    }

    /// Sleep `latency` before every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The query this source answers.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Request path for `page`.
    pub fn path(&self, page: usize) -> String {
        if self.query.is_empty() {
            format!("/airports/page/{page}")
        } else {
            format!("/airports/page/{page}/{}", percent_encode(&self.query))
        }
    }
}

impl PageSource<Airport> for DirectorySource {
    fn fetch_page(&self, page: usize) -> impl Future<Output = Result<Vec<Airport>, FetchError>> + Send {
        async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            let path = self.path(page);
            trace!(path = %path, "fetching page");
            let response = self.router.handle(Method::Get, &path);
            if !response.is_success() {
                return Err(FetchError::Status {
                    status: response.status,
                });
            }
            response
                .parse()
                .map_err(|err| FetchError::decode(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Directory;

    fn router() -> Router {
        Router::new(Directory::new(vec![
            Airport::new("BER", "Berlin Brandenburg Airport", "Berlin", "Germany"),
            Airport::new("CDG", "Charles de Gaulle Airport", "Paris", "France"),
            Airport::new("MUC", "Munich Airport", "Munich", "Germany"),
        ]))
        .with_page_size(1)
    }

    #[test]
    fn test_path_encodes_query() {
        let source = DirectorySource::new(router(), "new york");
        assert_eq!(source.path(3), "/airports/page/3/new%20york");
        assert_eq!(DirectorySource::new(router(), "").path(0), "/airports/page/0");
        assert_eq!(DirectorySource::new(router(), "a/b").path(0), "/airports/page/0/a%2Fb");
    }

    #[tokio::test]
    async fn test_pages_follow_router() {
        let source = DirectorySource::new(router(), "germany");
        let first = source.fetch_page(0).await.unwrap();
        let second = source.fetch_page(1).await.unwrap();
        let third = source.fetch_page(2).await.unwrap();
        assert_eq!(first[0].iata, "BER");
        assert_eq!(second[0].iata, "MUC");
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_query_with_slash_stays_one_segment() {
        let source = DirectorySource::new(router(), "paris|a/b");
        assert!(source.fetch_page(0).await.is_ok());
    }

    #[tokio::test]
    async fn test_oversized_query_is_status_error() {
        let source = DirectorySource::new(router(), "x".repeat(crate::routes::MAX_SEGMENT_LEN + 1));
        let err = source.fetch_page(0).await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 400 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_is_slept() {
        let source = DirectorySource::new(router(), "").with_latency(Duration::from_millis(1500));
        let start = tokio::time::Instant::now();
        let page = source.fetch_page(0).await.unwrap();
        assert_eq!(page.len(), 1);
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }
}
