//! Periodic notification refresh.
//!
//! [`NotificationPoller`] reloads the project list on a fixed interval, runs
//! the deadline classifier and publishes the result on a `watch` channel, so
//! a badge or notification view always reads the latest snapshot.
//!
//! The poller runs as a tokio task. It stops when its cancellation token is
//! cancelled or when every snapshot receiver has been dropped. A failing
//! load is logged and the previous snapshot stays published.

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::deadline::classifier::{DeadlineClassifier, DeadlineReport};
use crate::model::project::Project;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// One classifier run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSnapshot {
    pub report: DeadlineReport,
    pub taken_at: DateTime<Utc>,
}

impl NotificationSnapshot {
    pub fn count(&self) -> usize {
        self.report.notification_count()
    }
}

/// Latest snapshot; `None` until the first successful refresh.
pub type SnapshotReceiver = watch::Receiver<Option<NotificationSnapshot>>;

pub struct NotificationPoller<F> {
    source: F,
    cancel: CancellationToken,
    poll_interval: Duration,
    clock: fn() -> DateTime<Utc>,
}

impl<F, E> NotificationPoller<F>
where
    F: FnMut() -> Result<Vec<Project>, E> + Send + 'static,
    E: Display + Send + 'static,
{
    /// Creates a poller that loads projects through `source`.
    pub fn new(source: F, cancel: CancellationToken) -> Self {
        Self {
            source,
            cancel,
            poll_interval: DEFAULT_POLL_INTERVAL,
            clock: Utc::now,
        }
    }

    /// Sets the refresh period. A zero period is ignored and the current
    /// period is kept, since the interval timer cannot tick at zero.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!(
                "event=poller_config module=poller status=rejected reason=zero_interval interval_ms={}",
                self.poll_interval.as_millis()
            );
            return self;
        }
        self.poll_interval = interval;
        self
    }

    /// Overrides the time source used for classification.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Spawns the refresh loop on the current tokio runtime.
    ///
    /// The first refresh happens immediately.
    pub fn spawn(self) -> PollerHandle {
        let (tx, rx) = watch::channel(None);
        let cancel = self.cancel.clone();
        let task = tokio::spawn(self.run(tx));
        PollerHandle {
            receiver: rx,
            cancel,
            task,
        }
    }

    async fn run(mut self, tx: watch::Sender<Option<NotificationSnapshot>>) {
        let cancel = self.cancel.clone();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "event=poller_start module=poller status=ok interval_ms={}",
            self.poll_interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("event=poller_stop module=poller status=ok reason=cancelled");
                    break;
                }
                _ = tx.closed() => {
                    info!("event=poller_stop module=poller status=ok reason=receivers_dropped");
                    break;
                }
                _ = ticker.tick() => self.refresh(&tx),
            }
        }
    }

    fn refresh(&mut self, tx: &watch::Sender<Option<NotificationSnapshot>>) {
        let projects = match (self.source)() {
            Ok(projects) => projects,
            Err(err) => {
                warn!(
                    "event=poller_refresh module=poller status=error error={}",
                    err
                );
                return;
            }
        };

        let taken_at = (self.clock)();
        let report = DeadlineClassifier::new(taken_at).classify(&projects);
        debug!(
            "event=poller_refresh module=poller status=ok overdue={} nearing={}",
            report.overdue.len(),
            report.nearing_deadline.len()
        );
        tx.send_replace(Some(NotificationSnapshot { report, taken_at }));
    }
}

/// Owner side of a running poller.
pub struct PollerHandle {
    receiver: SnapshotReceiver,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Returns a new receiver for snapshot updates.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.receiver.clone()
    }

    pub fn latest(&self) -> Option<NotificationSnapshot> {
        self.receiver.borrow().clone()
    }

    /// Cancels the poller and waits for its task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(err) = self.task.await {
            warn!(
                "event=poller_stop module=poller status=error error={}",
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NotificationPoller;
    use crate::config::DEFAULT_POLL_INTERVAL;
    use crate::model::project::{Priority, Project, Task};
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()
    }

    fn sample_projects() -> Vec<Project> {
        let today = fixed_now().date_naive();
        let mut project = Project::new("launch", today + ChronoDuration::days(30));
        let yesterday = today - ChronoDuration::days(1);
        project.push_task(Task::new("overdue", yesterday, Priority::High));
        project.push_task(Task::new("today", today, Priority::Low));
        vec![project]
    }

    #[tokio::test]
    async fn publishes_snapshot_and_stops_on_shutdown() {
        let poller = NotificationPoller::new(
            || Ok::<_, String>(sample_projects()),
            CancellationToken::new(),
        )
        .with_clock(fixed_now)
        .with_poll_interval(Duration::from_secs(60));

        let handle = poller.spawn();
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(Option::is_some))
            .await
            .expect("first refresh should happen immediately")
            .unwrap();

        let snapshot = handle.latest().unwrap();
        assert_eq!(snapshot.taken_at, fixed_now());
        assert_eq!(snapshot.count(), 2);
        assert_eq!(snapshot.report.overdue[0].title, "overdue");
        assert_eq!(snapshot.report.nearing_deadline[0].title, "today");

        tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
            .await
            .expect("poller should stop after cancel");
    }

    #[tokio::test]
    async fn failed_first_load_publishes_on_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let poller = NotificationPoller::new(
            move || match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Err("store unavailable".to_string()),
                _ => Ok(sample_projects()),
            },
            CancellationToken::new(),
        )
        .with_clock(fixed_now)
        .with_poll_interval(Duration::from_millis(10));

        let handle = poller.spawn();
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(Option::is_some))
            .await
            .expect("second refresh should publish")
            .unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 2);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn failing_refresh_keeps_previous_snapshot() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let poller = NotificationPoller::new(
            move || match counter.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(sample_projects()),
                _ => Err("store unavailable".to_string()),
            },
            CancellationToken::new(),
        )
        .with_clock(fixed_now)
        .with_poll_interval(Duration::from_millis(10));

        let handle = poller.spawn();
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(Option::is_some))
            .await
            .expect("first refresh should publish")
            .unwrap();
        let first = rx.borrow_and_update().clone().unwrap();

        tokio::time::timeout(Duration::from_secs(2), async {
            while calls.load(Ordering::SeqCst) < 4 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("failing refreshes should keep ticking");

        assert!(!rx.has_changed().unwrap());
        let latest = handle.latest().unwrap();
        assert_eq!(latest, first);
        assert_eq!(latest.taken_at, fixed_now());
        assert_eq!(latest.count(), 2);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn zero_interval_keeps_previous_period() {
        let poller = NotificationPoller::new(
            || Ok::<_, String>(sample_projects()),
            CancellationToken::new(),
        )
        .with_clock(fixed_now)
        .with_poll_interval(Duration::from_millis(20))
        .with_poll_interval(Duration::ZERO);
        assert_eq!(poller.poll_interval, Duration::from_millis(20));

        let default =
            NotificationPoller::new(|| Ok::<_, String>(Vec::new()), CancellationToken::new())
                .with_poll_interval(Duration::ZERO);
        assert_eq!(default.poll_interval, DEFAULT_POLL_INTERVAL);

        let handle = poller.spawn();
        let mut rx = handle.subscribe();
        tokio::time::timeout(Duration::from_secs(2), rx.wait_for(Option::is_some))
            .await
            .expect("poller should still refresh")
            .unwrap();
        assert_eq!(handle.latest().unwrap().count(), 2);
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn stops_when_token_is_cancelled_externally() {
        let cancel = CancellationToken::new();
        let poller = NotificationPoller::new(|| Ok::<_, String>(Vec::new()), cancel.child_token())
            .with_poll_interval(Duration::from_secs(60));
        let handle = poller.spawn();

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle.task)
            .await
            .expect("poller task should finish after parent cancel")
            .unwrap();
    }
}
