//! Fixed-cadence polling of a [`StatusSource`].

use std::sync::Arc;
use std::time::Duration;

use studyspace_occupancy::NodeStatus;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::error::Result;
use crate::source::StatusSource;

/// Time between two poll cycles.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Result of one poll cycle.
pub type PollOutcome = Result<Vec<NodeStatus>>;

/// Polls a status source every [`POLL_INTERVAL`], starting immediately.
pub struct Poller<S> {
    source: Arc<S>,
}

impl<S: StatusSource> Poller<S> {
    /// Creates a poller over `source`.
    #[must_use]
    pub const fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Starts polling and delivers every outcome to `outcomes`.
    ///
    /// Each tick fetches on its own task, so a slow request never holds back
    /// the next tick. Outcomes arrive in the order their requests resolve.
    /// Must be called from within a tokio runtime.
    #[must_use = "dropping the handle stops the poller"]
    pub fn start(self, outcomes: UnboundedSender<PollOutcome>) -> PollerHandle {
        let token = CancellationToken::new();
        let tracker = TaskTracker::new();

        let ticker_token = token.clone();
        let ticker_tracker = tracker.clone();
        let source = self.source;

        tracker.spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    () = ticker_token.cancelled() => break,
                    _ = ticker.tick() => {
                        ticker_tracker.spawn(fetch_once(
                            source.clone(),
                            outcomes.clone(),
                            ticker_token.clone(),
                        ));
                    }
                }
            }

            debug!("status poller stopped");
        });

        PollerHandle { token, tracker }
    }
}

async fn fetch_once<S: StatusSource>(
    source: Arc<S>,
    outcomes: UnboundedSender<PollOutcome>,
    token: CancellationToken,
) {
    tokio::select! {
        biased;
        () = token.cancelled() => {}
        outcome = source.fetch_status() => {
            if token.is_cancelled() {
                return;
            }

            // A closed receiver means the view is gone; the outcome is dropped.
            let _ = outcomes.send(outcome);
        }
    }
}

/// Owned handle to a running [`Poller`].
///
/// Dropping the handle cancels the poller.
#[derive(Debug)]
pub struct PollerHandle {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl PollerHandle {
    /// Stops the timer and abandons in-flight requests.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels and waits until every task of the poller has finished.
    pub async fn shutdown(&self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedReceiver};
    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::error::Error;

    /// Answers call `n` with a single node named `call-n` after `delay(n)`.
    struct ScriptedSource {
        calls: AtomicUsize,
        delay: fn(usize) -> Duration,
        fail: bool,
    }

    impl ScriptedSource {
        fn instant() -> Arc<Self> {
            Self::with_delay(|_| Duration::ZERO)
        }

        fn with_delay(delay: fn(usize) -> Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                delay: |_| Duration::ZERO,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(&self) -> Result<Vec<NodeStatus>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            sleep((self.delay)(call)).await;

            if self.fail {
                return Err(Error::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }

            Ok(vec![NodeStatus {
                node_id: format!("call-{call}"),
                free_seats: Some(1),
                total_seats: Some(2),
                timestamp: String::new(),
            }])
        }
    }

    fn start(source: &Arc<ScriptedSource>) -> (PollerHandle, UnboundedReceiver<PollOutcome>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = Poller::new(source.clone()).start(sender);
        (handle, receiver)
    }

    fn assert_elapsed(started: Instant, expected: Duration) {
        let elapsed = started.elapsed();
        assert!(
            elapsed >= expected && elapsed <= expected + Duration::from_millis(1),
            "expected {expected:?}, elapsed {elapsed:?}"
        );
    }

    fn node_id(outcome: PollOutcome) -> String {
        outcome.unwrap().remove(0).node_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate() {
        let source = ScriptedSource::instant();
        let started = Instant::now();
        let (_handle, mut outcomes) = start(&source);

        let first = outcomes.recv().await.unwrap();

        assert_eq!(node_id(first), "call-1");
        assert_elapsed(started, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_every_five_seconds() {
        let source = ScriptedSource::instant();
        let started = Instant::now();
        let (_handle, mut outcomes) = start(&source);

        outcomes.recv().await.unwrap().unwrap();

        sleep(Duration::from_millis(4_900)).await;
        assert_eq!(source.calls(), 1);
        assert!(outcomes.try_recv().is_err());

        let second = outcomes.recv().await.unwrap();
        assert_eq!(node_id(second), "call-2");
        assert_elapsed(started, POLL_INTERVAL);

        let third = outcomes.recv().await.unwrap();
        assert_eq!(node_id(third), "call-3");
        assert_elapsed(started, POLL_INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_polling() {
        let source = ScriptedSource::failing();
        let (_handle, mut outcomes) = start(&source);

        for _ in 0..3 {
            let outcome = outcomes.recv().await.unwrap();
            assert!(matches!(outcome, Err(Error::Status(_))));
        }

        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_request_does_not_delay_next_tick() {
        // The first request takes 12s; the ticks at 5s and 10s resolve first.
        let source = ScriptedSource::with_delay(|call| {
            if call == 1 {
                Duration::from_secs(12)
            } else {
                Duration::ZERO
            }
        });
        let started = Instant::now();
        let (_handle, mut outcomes) = start(&source);

        assert_eq!(node_id(outcomes.recv().await.unwrap()), "call-2");
        assert_elapsed(started, POLL_INTERVAL);

        assert_eq!(node_id(outcomes.recv().await.unwrap()), "call-3");
        assert_eq!(node_id(outcomes.recv().await.unwrap()), "call-1");
        assert_elapsed(started, Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let source = ScriptedSource::instant();
        let (handle, mut outcomes) = start(&source);

        outcomes.recv().await.unwrap().unwrap();
        handle.cancel();
        assert!(handle.is_cancelled());

        sleep(POLL_INTERVAL * 4).await;

        assert_eq!(source.calls(), 1);
        assert!(outcomes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_teardown_is_discarded() {
        let source = ScriptedSource::with_delay(|_| Duration::from_secs(3));
        let (handle, mut outcomes) = start(&source);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        handle.shutdown().await;
        sleep(Duration::from_secs(10)).await;

        // Every sender is gone and nothing was delivered.
        assert!(outcomes.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels() {
        let source = ScriptedSource::instant();
        let (handle, mut outcomes) = start(&source);

        outcomes.recv().await.unwrap().unwrap();
        drop(handle);

        sleep(POLL_INTERVAL * 3).await;

        assert_eq!(source.calls(), 1);
        assert!(outcomes.recv().await.is_none());
    }
}
