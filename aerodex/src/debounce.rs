//! Debounced invocation of an async callback.
//!
//! [`Debounced`] wraps a callback so that a burst of calls collapses into one
//! trailing invocation with the arguments of the last call. Each call returns
//! an [`Invocation`] that resolves to the callback's output once the window
//! elapses; invocations superseded by a newer call never resolve. A callback
//! that panics fails its invocation with [`InvocationError::Panicked`] and
//! leaves later calls unaffected.
//!
//! # Example
//!
//! ```
//! # use aerodex::Debounced;
//! # use std::time::Duration;
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let search = Debounced::new(
//!     |query: String| async move { format!("results for {query}") },
//!     Duration::from_millis(10),
//! );
//!
//! let _ = search.call("b".to_string());
//! let _ = search.call("be".to_string());
//! let last = search.call("ber".to_string());
//!
//! assert_eq!(last.await.unwrap(), "results for ber");
//! # }
//! ```
//!
//! # Timer ownership
//!
//! At most one timer is armed per [`Debounced`]. Every [`call`](Debounced::call)
//! aborts the previous timer before arming a new one. Once a timer has fired,
//! the callback it started runs to completion even if newer calls arrive.
//! The callback runs on its own task so that a panic is reported to the
//! invocation instead of tearing down the timer.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::InvocationError;

/// A callback wrapped so that bursts of calls collapse into one.
///
/// Created with [`Debounced::new`]. Requires a running tokio runtime when
/// [`call`](Self::call) is used. Dropping the wrapper cancels a pending timer.
pub struct Debounced<A, F> {
    inner: Arc<Inner<F>>,
    _args: PhantomData<fn(A)>,
}

struct Inner<F> {
    callback: F,
    delay: Duration,
    slot: Mutex<Slot>,
}

#[derive(Default)]
struct Slot {
    /// Bumped by every call; a timer only fires if it still holds the latest.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl<F> Inner<F> {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A, F, Fut> Debounced<A, F>
where
    A: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    /// Wrap `callback` with a debounce window of `delay`.
    pub fn new(callback: F, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                callback,
                delay,
                slot: Mutex::new(Slot::default()),
            }),
            _args: PhantomData,
        }
    }

    /// Wrap `callback` with the process-wide default window.
    ///
    /// See [`constants::debounce_delay`](crate::constants::debounce_delay).
    pub fn with_default_delay(callback: F) -> Self {
        Self::new(callback, crate::constants::debounce_delay())
    }

    /// Schedule the callback with `args`, replacing any pending schedule.
    ///
    /// The returned [`Invocation`] resolves to the callback's output after the
    /// window elapses with no further call, or to
    /// [`InvocationError::Panicked`] if the callback panics. If another call
    /// arrives first, this invocation is abandoned and never resolves; use
    /// [`Invocation::settled`] to observe that instead of waiting forever.
    pub fn call(&self, args: A) -> Invocation<Fut::Output> {
        let (tx, rx) = oneshot::channel();
        let mut slot = self.inner.slot();

        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        if let Some(previous) = slot.timer.take() {
            previous.abort();
            trace!(generation, "debounce timer rescheduled");
        }

        let inner = Arc::clone(&self.inner);
        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            {
                let mut slot = inner.slot();
                if slot.generation != generation {
                    return;
                }
                // Disarm before running so a newer call cannot abort the callback.
                slot.timer = None;
            }
            trace!(generation, "debounce window elapsed");
            let run = tokio::spawn(async move { (inner.callback)(args).await });
            match run.await {
                Ok(output) => {
                    let _ = tx.send(Ok(output));
                },
                Err(err) if err.is_panic() => {
                    warn!(generation, "debounced callback panicked");
                    let _ = tx.send(Err(InvocationError::Panicked));
                },
                // Cancelled by runtime shutdown; the invocation is abandoned.
                Err(_) => {},
            }
        });
        slot.timer = Some(timer);

        Invocation { rx: Some(rx) }
    }

    /// Drop the pending schedule, if any. Its invocation is abandoned.
    pub fn cancel(&self) {
        let mut slot = self.inner.slot();
        slot.generation = slot.generation.wrapping_add(1);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }

    /// Whether a timer is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.inner.slot().timer.is_some()
    }

    /// The debounce window.
    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

impl<A, F> Drop for Debounced<A, F> {
    fn drop(&mut self) {
        if let Some(timer) = self.inner.slot().timer.take() {
            timer.abort();
        }
    }
}

impl<A, F> std::fmt::Debug for Debounced<A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounced")
            .field("delay", &self.inner.delay)
            .field("pending", &self.inner.slot().timer.is_some())
            .finish_non_exhaustive()
    }
}

/// The eventual result of one [`Debounced::call`].
///
/// Resolves to the callback's output, or to [`InvocationError::Panicked`]
/// when the callback panicked. An invocation superseded by a later call stays
/// pending forever; it is abandoned, not failed.
#[must_use = "an invocation does nothing unless awaited or dropped deliberately"]
#[derive(Debug)]
pub struct Invocation<O> {
    rx: Option<oneshot::Receiver<Result<O, InvocationError>>>,
}

impl<O> Invocation<O> {
    /// Await the outcome without hanging on a superseded call.
    ///
    /// Yields [`InvocationError::Superseded`] for an abandoned call and
    /// [`InvocationError::Panicked`] for a callback that panicked.
    pub async fn settled(mut self) -> Result<O, InvocationError> {
        match self.rx.take() {
            Some(rx) => rx.await.unwrap_or(Err(InvocationError::Superseded)),
            None => Err(InvocationError::Superseded),
        }
    }
}

impl<O> Future for Invocation<O> {
    type Output = Result<O, InvocationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Poll::Pending;
        };
        match Pin::new(rx).poll(cx) {
            Poll::Ready(Ok(output)) => {
                self.rx = None;
                Poll::Ready(output)
            },
            Poll::Ready(Err(_)) => {
                // Superseded: the sender went away with its timer.
                self.rx = None;
                Poll::Pending
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting() -> (Arc<AtomicUsize>, impl Fn(()) -> std::future::Ready<()> + Send + Sync) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let callback = move |()| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        };
        (count, callback)
    }

    fn recording() -> (
        Arc<Mutex<Vec<u32>>>,
        impl Fn(u32) -> std::future::Ready<u32> + Send + Sync,
    ) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |n: u32| {
            sink.lock().unwrap().push(n);
            std::future::ready(n * 10)
        };
        (seen, callback)
    }

    const WINDOW: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_delays_execution() {
        let (count, callback) = counting();
        let debounced = Debounced::new(callback, WINDOW);

        let _ = debounced.call(());
        sleep(Duration::from_millis(400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(debounced.is_pending());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_be_retriggered() {
        let (count, callback) = counting();
        let debounced = Debounced::new(callback, WINDOW);

        let _ = debounced.call(());
        sleep(Duration::from_millis(400)).await;
        let _ = debounced.call(());
        sleep(Duration::from_millis(400)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_uses_last_arguments() {
        let (seen, callback) = recording();
        let debounced = Debounced::new(callback, WINDOW);

        let first = debounced.call(1);
        let second = debounced.call(2);
        let last = debounced.call(3);

        assert_eq!(last.await, Ok(30));
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert_eq!(first.settled().await, Err(InvocationError::Superseded));
        assert_eq!(second.settled().await, Err(InvocationError::Superseded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluates_result() {
        let debounced = Debounced::new(|()| async { "hello world" }, WINDOW);
        let result = debounced.call(());
        assert!(debounced.is_pending());
        assert_eq!(result.await, Ok("hello world"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_run_independently() {
        let (seen, callback) = recording();
        let debounced = Debounced::new(callback, WINDOW);

        let a = debounced.call(1);
        sleep(Duration::from_millis(600)).await;
        let b = debounced.call(2);

        assert_eq!(a.await, Ok(10));
        assert_eq!(b.await, Ok(20));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_does_not_poison_later_calls() {
        let debounced = Debounced::new(
            |n: u32| async move {
                if n == 0 {
                    Err("zero")
                } else {
                    Ok(n)
                }
            },
            WINDOW,
        );

        assert_eq!(debounced.call(0).await, Ok(Err("zero")));
        assert_eq!(debounced.call(7).await, Ok(Ok(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_fails_invocation() {
        let debounced = Debounced::new(
            |n: u32| async move {
                assert!(n != 0, "callback rejected zero");
                n
            },
            WINDOW,
        );

        let awaited = tokio::time::timeout(Duration::from_secs(5), debounced.call(0)).await;
        assert_eq!(awaited, Ok(Err(InvocationError::Panicked)));
        assert_eq!(debounced.call(0).settled().await, Err(InvocationError::Panicked));

        // A superseded call is reported differently from a failed one.
        let superseded = debounced.call(1);
        let last = debounced.call(3);
        assert_eq!(superseded.settled().await, Err(InvocationError::Superseded));
        assert_eq!(last.await, Ok(3));
        assert!(!debounced.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_abandons_pending_call() {
        let (count, callback) = counting();
        let debounced = Debounced::new(callback, WINDOW);

        let pending = debounced.call(());
        debounced.cancel();
        assert!(!debounced.is_pending());

        sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(pending.settled().await, Err(InvocationError::Superseded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_callback_is_not_cancelled_by_newer_call() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debounced = Debounced::new(
            move |n: u32| {
                let sink = Arc::clone(&sink);
                async move {
                    sleep(Duration::from_millis(300)).await;
                    sink.lock().unwrap().push(n);
                    n
                }
            },
            WINDOW,
        );

        let first = debounced.call(1);
        // Timer fires at 500ms; the callback is still sleeping at 600ms.
        sleep(Duration::from_millis(600)).await;
        let second = debounced.call(2);

        assert_eq!(first.await, Ok(1));
        assert_eq!(second.await, Ok(2));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (count, callback) = counting();
        let debounced = Debounced::new(callback, WINDOW);
        let pending = debounced.call(());
        drop(debounced);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(pending.settled().await, Err(InvocationError::Superseded));
    }
}
