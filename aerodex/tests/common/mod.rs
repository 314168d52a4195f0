//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use aerodex::{FetchError, PageSource};
use tokio::sync::oneshot;

type Outcome = Result<Vec<&'static str>, FetchError>;

enum Step {
    Now(Outcome),
    Gated(oneshot::Receiver<Outcome>),
}

/// A page source that replays scripted responses and records requested pages.
///
/// Unscripted requests resolve to an empty page.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    steps: Arc<Mutex<VecDeque<Step>>>,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response delivered as soon as it is requested.
    pub fn respond(&self, outcome: Outcome) -> &Self {
        self.steps.lock().unwrap().push_back(Step::Now(outcome));
        self
    }

    /// Queue a response the test releases later through the returned sender.
    pub fn gate(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    /// Pages requested so far, in order.
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageSource<&'static str> for ScriptedSource {
    fn fetch_page(&self, page: usize) -> impl Future<Output = Outcome> + Send {
        self.calls.lock().unwrap().push(page);
        let step = self.steps.lock().unwrap().pop_front();
        async move {
            match step {
                Some(Step::Now(outcome)) => outcome,
                Some(Step::Gated(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(FetchError::transport("gate dropped"))),
                None => Ok(vec![]),
            }
        }
    }
}

/// Let spawned tasks run until they block.
pub async fn settle_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
