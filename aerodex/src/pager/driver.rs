//! Runs a [`PagerCore`] on a tokio task.
//!
//! The driver owns the state machine and the current [`PageSource`]. Actions
//! from [`PagerHandle`]s and fetch completions arrive as messages on the same
//! task, so state is only ever touched from one place. Every applied message
//! publishes a fresh [`PagerSnapshot`] on a watch channel.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::debug;

use super::state::{PagerCore, PagerSnapshot, Resolution, Ticket};
use crate::constants::ACTION_QUEUE_CAPACITY;
use crate::{FetchError, PageSource, PagerError};

/// Notification that a page was committed, delivered on a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLoaded {
    /// Index of the committed page.
    pub page: usize,
    /// The page was empty and ended the query.
    pub end: bool,
}

type PageLoadedHook = Arc<dyn Fn(PageLoaded) + Send + Sync>;

/// Builder for a running pager.
///
/// # Example
///
/// ```
/// # use aerodex::{Pager, source};
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), aerodex::PagerError> {
/// let pages = source::from_fn(|page| async move {
///     Ok::<_, aerodex::FetchError>(match page {
///         1 => vec!["C", "D"],
///         _ => vec![],
///     })
/// });
///
/// let pager = Pager::new(pages).with_initial_page(0, vec!["A", "B"]).spawn();
/// pager.load_next_page().await?;
///
/// let state = pager.settled().await?;
/// assert_eq!(state.items, ["A", "B", "C", "D"]);
/// # Ok(())
/// # }
/// ```
pub struct Pager<T, S> {
    core: PagerCore<T>,
    source: S,
    on_page_loaded: Option<PageLoadedHook>,
}

impl<T, S> std::fmt::Debug for Pager<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("items", &self.core.items().len())
            .field("page_index", &self.core.page_index())
            .field("on_page_loaded", &self.on_page_loaded.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, S> Pager<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: PageSource<T>,
{
    /// An idle pager that fetches nothing until a query starts.
    pub fn new(source: S) -> Self {
        Self {
            core: PagerCore::default(),
            source,
            on_page_loaded: None,
        }
    }

    /// Seed the pager with an already loaded page.
    pub fn with_initial_page(mut self, page: usize, items: Vec<T>) -> Self {
        self.core = PagerCore::new(page, items);
        self
    }

    /// Call `hook` after each successful page, once the new state is published.
    ///
    /// The hook never runs in the same turn as the state update, so observers
    /// reading the snapshot from inside it see the committed items.
    pub fn on_page_loaded(mut self, hook: impl Fn(PageLoaded) + Send + Sync + 'static) -> Self {
        self.on_page_loaded = Some(Arc::new(hook));
        self
    }

    /// Start the driver task and return a handle to it.
    ///
    /// Must be called within a tokio runtime. The task stops once every
    /// handle has been dropped.
    pub fn spawn(self) -> PagerHandle<T, S> {
        let (actions_tx, actions_rx) = mpsc::channel(ACTION_QUEUE_CAPACITY);
        let (state_tx, state_rx) = watch::channel(self.core.snapshot());
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let driver = Driver {
            core: self.core,
            source: Arc::new(self.source),
            on_page_loaded: self.on_page_loaded,
            state: state_tx,
            completions: completions_tx,
        };
        tokio::spawn(driver.run(actions_rx, completions_rx));

        PagerHandle {
            actions: actions_tx,
            state: state_rx,
        }
    }
}

enum Action<S> {
    StartNewQuery(Option<S>),
    LoadNextPage,
}

struct Message<S> {
    action: Action<S>,
    ack: oneshot::Sender<bool>,
}

struct Completion<T> {
    ticket: Ticket,
    outcome: Result<Vec<T>, FetchError>,
}

struct Driver<T, S> {
    core: PagerCore<T>,
    source: Arc<S>,
    on_page_loaded: Option<PageLoadedHook>,
    state: watch::Sender<PagerSnapshot<T>>,
    completions: mpsc::UnboundedSender<Completion<T>>,
}

impl<T, S> Driver<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: PageSource<T>,
{
    async fn run(
        mut self,
        mut actions: mpsc::Receiver<Message<S>>,
        mut completions: mpsc::UnboundedReceiver<Completion<T>>,
    ) {
        loop {
            tokio::select! {
                message = actions.recv() => {
                    let Some(Message { action, ack }) = message else {
                        break;
                    };
                    let accepted = self.apply(action);
                    self.dispatch();
                    self.publish();
                    let _ = ack.send(accepted);
                }
                Some(Completion { ticket, outcome }) = completions.recv() => {
                    let resolution = self.core.resolve(ticket, outcome);
                    self.dispatch();
                    self.publish();
                    if let Resolution::Loaded { page, end } = resolution {
                        self.notify(PageLoaded { page, end });
                    }
                }
            }
        }
        debug!("pager driver stopped");
    }

    fn apply(&mut self, action: Action<S>) -> bool {
        match action {
            Action::StartNewQuery(source) => {
                if let Some(source) = source {
                    self.source = Arc::new(source);
                }
                self.core.start_new_query();
                true
            },
            Action::LoadNextPage => self.core.load_next_page(),
        }
    }

    /// Run the fetch effect if the state machine asks for one.
    fn dispatch(&mut self) {
        let Some(ticket) = self.core.poll_fetch() else {
            return;
        };
        debug!(
            epoch = ticket.epoch(),
            page = ticket.page(),
            append = ticket.append(),
            "dispatching page fetch"
        );
        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let outcome = source.fetch_page(ticket.page()).await;
            let _ = completions.send(Completion { ticket, outcome });
        });
    }

    fn publish(&self) {
        self.state.send_replace(self.core.snapshot());
    }

    fn notify(&self, loaded: PageLoaded) {
        let Some(hook) = &self.on_page_loaded else {
            return;
        };
        let hook = Arc::clone(hook);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            hook(loaded);
        });
    }
}

/// Cloneable handle to a running pager.
///
/// Action methods resolve once the action has been applied and the resulting
/// state published; they do not wait for the fetch itself. Use
/// [`settled`](Self::settled) or [`subscribe`](Self::subscribe) for that.
pub struct PagerHandle<T, S> {
    actions: mpsc::Sender<Message<S>>,
    state: watch::Receiver<PagerSnapshot<T>>,
}

impl<T, S> Clone for PagerHandle<T, S> {
    fn clone(&self) -> Self {
        Self {
            actions: self.actions.clone(),
            state: self.state.clone(),
        }
    }
}

impl<T, S> std::fmt::Debug for PagerHandle<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagerHandle")
            .field("closed", &self.actions.is_closed())
            .finish_non_exhaustive()
    }
}

impl<T, S> PagerHandle<T, S>
where
    T: Clone,
{
    /// Restart pagination for the current source.
    pub async fn start_new_query(&self) -> Result<(), PagerError> {
        self.send(Action::StartNewQuery(None)).await.map(|_| ())
    }

    /// Install `source` (bound to a new query) and restart pagination.
    pub async fn start_query(&self, source: S) -> Result<(), PagerError> {
        self.send(Action::StartNewQuery(Some(source)))
            .await
            .map(|_| ())
    }

    /// Request the next page.
    ///
    /// Returns `Ok(false)` when the request was ignored: while loading, after
    /// the last page, or before any query.
    pub async fn load_next_page(&self) -> Result<bool, PagerError> {
        self.send(Action::LoadNextPage).await
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> PagerSnapshot<T> {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PagerSnapshot<T>> {
        self.state.clone()
    }

    /// Wait until no fetch is in flight and return that state.
    pub async fn settled(&self) -> Result<PagerSnapshot<T>, PagerError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|snapshot| !snapshot.loading)
            .await
            .map_err(|_| PagerError::Closed)?;
        Ok(snapshot.clone())
    }

    async fn send(&self, action: Action<S>) -> Result<bool, PagerError> {
        let (ack, accepted) = oneshot::channel();
        self.actions
            .send(Message { action, ack })
            .await
            .map_err(|_| PagerError::Closed)?;
        accepted.await.map_err(|_| PagerError::Closed)
    }
}
