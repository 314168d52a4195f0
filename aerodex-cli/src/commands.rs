//! Subcommand implementations.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use aerodex::{PageLoaded, Pager, PagerHandle, SearchSession};
use aerodex_directory::{Airport, Directory, DirectorySource, Method, Router};
use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::render;

/// Everything a subcommand needs: the router and the tuning knobs.
#[derive(Debug, Clone)]
pub struct App {
    router: Router,
    latency: Duration,
    /// `None` uses the library's default debounce window.
    debounce: Option<Duration>,
}

impl App {
    /// Load the directory named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let data = &config.directory.data;
        let directory = Directory::load(data)
            .with_context(|| format!("loading airports from {}", data.display()))?;
        info!(airports = directory.len(), "directory ready");
        Ok(Self::new(
            Router::new(directory).with_page_size(config.directory.page_size),
            config.directory.latency(),
            config.search.debounce(),
        ))
    }

    pub const fn new(router: Router, latency: Duration, debounce: Option<Duration>) -> Self {
        Self {
            router,
            latency,
            debounce,
        }
    }

    fn source(&self, query: &str) -> DirectorySource {
        DirectorySource::new(self.router.clone(), query).with_latency(self.latency)
    }

    fn factory(&self) -> impl Fn(&str) -> DirectorySource + Send + Sync + 'static {
        let app = self.clone();
        move |query: &str| app.source(query)
    }

    fn session<F>(
        &self,
        pager: PagerHandle<Airport, DirectorySource>,
        factory: F,
    ) -> SearchSession<Airport, DirectorySource>
    where
        F: Fn(&str) -> DirectorySource + Send + Sync + 'static,
    {
        match self.debounce {
            Some(delay) => SearchSession::new(pager, factory, delay),
            None => SearchSession::with_default_delay(pager, factory),
        }
    }

    /// First page of `query`.
    pub async fn search(&self, query: &str) -> Result<String> {
        let query = query.trim();
        let pager = Pager::new(self.source(query)).spawn();
        pager.start_new_query().await?;
        let state = pager.settled().await?;
        if state.error {
            bail!("lookup for {query:?} failed");
        }
        Ok(format!(
            "{}\n{}",
            render::table(&state.items),
            render::summary(query, state.items.len(), state.last_page_loaded)
        ))
    }

    /// Every page of `query`, or the first `max_pages`, each handed to `emit`
    /// as soon as it is committed.
    pub async fn browse(
        &self,
        query: &str,
        max_pages: Option<NonZeroUsize>,
        mut emit: impl FnMut(String),
    ) -> Result<()> {
        let (loaded_tx, mut loaded) = mpsc::unbounded_channel();
        let pager = Pager::new(self.source(""))
            .on_page_loaded(move |page| {
                let _ = loaded_tx.send(page);
            })
            .spawn();
        let session = self.session(pager, self.factory());

        let query = session.on_change(query).await?;
        let mut shown = 0;
        loop {
            let PageLoaded { page, end } = next_page(session.pager(), &mut loaded).await?;
            let items = session.snapshot().items;
            let fresh = items.get(shown..).unwrap_or_default();
            shown = items.len();
            if end {
                emit(render::summary(&query, shown, true));
                break;
            }
            emit(format!("page {page}\n{}", render::table(fresh)));
            if max_pages.is_some_and(|max| page + 1 >= max.get()) {
                emit(render::summary(&query, shown, false));
                break;
            }
            session.on_load_more().await?;
        }
        Ok(())
    }

    /// Replay `prefixes` as keystrokes `interval` apart and report the query
    /// that actually ran.
    pub async fn type_ahead(&self, prefixes: &[String], interval: Duration) -> Result<String> {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let factory = self.factory();
        let pager = Pager::new(self.source("")).spawn();
        let session = self.session(pager, move |query: &str| {
            counter.fetch_add(1, Ordering::Relaxed);
            factory(query)
        });

        let Some((last, earlier)) = prefixes.split_last() else {
            bail!("nothing typed");
        };
        for prefix in earlier {
            drop(session.on_change(prefix.as_str()));
            tokio::time::sleep(interval).await;
        }
        let query = session.on_change(last.as_str()).await?;
        let state = session.pager().settled().await?;
        if state.error {
            bail!("lookup for {query:?} failed");
        }

        Ok(format!(
            "{} keystroke(s), {} lookup(s); ran {query:?}\n{}\n{}",
            prefixes.len(),
            started.load(Ordering::Relaxed),
            render::table(&state.items),
            render::summary(&query, state.items.len(), state.last_page_loaded)
        ))
    }

    /// Body of `path`, pretty-printed. Non-2xx statuses are errors.
    pub fn route(&self, method: Method, path: &str) -> Result<String> {
        let response = self.router.handle(method, path);
        let value: serde_json::Value = response.parse().context("decoding response body")?;
        let body = serde_json::to_string_pretty(&value)?;
        if !response.is_success() {
            bail!("{method} {path} returned {}\n{body}", response.status);
        }
        Ok(body)
    }
}

/// Wait for the next committed page, failing if the fetch errored instead.
async fn next_page(
    pager: &PagerHandle<Airport, DirectorySource>,
    loaded: &mut mpsc::UnboundedReceiver<PageLoaded>,
) -> Result<PageLoaded> {
    let state = pager.settled().await?;
    if state.error {
        bail!("page fetch failed after {} airport(s)", state.items.len());
    }
    loaded.recv().await.context("pager stopped")
}
