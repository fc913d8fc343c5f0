//! Location tracking with a push watch and a periodic poll fallback.
//!
//! The tracker owns the user's current position. It subscribes to a
//! [`PositionSource`] watch stream and additionally polls one-shot fixes on
//! an interval, because watch callbacks have been observed to stall silently
//! on some platforms. Consumers subscribe for pushed [`LocationEvent`]s;
//! they never poll the tracker.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam::channel::{Receiver, Sender};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::types::{LocationError, LocationEvent, PermissionState, Position};

/// Handle identifying an active watch on a [`PositionSource`].
pub type WatchId = u64;

/// Abstraction over the platform positioning surface (browser geolocation,
/// OS location services, or a synthetic test source).
pub trait PositionSource: Send + Sync + 'static {
    /// Ask the platform for permission to read location.
    fn request_permission(
        &self,
    ) -> impl std::future::Future<Output = PermissionState> + Send;

    /// Request a single one-shot fix.
    fn current_position(
        &self,
    ) -> impl std::future::Future<Output = Result<Position, LocationError>> + Send;

    /// Begin a continuous watch, pushing results into `sink` until
    /// [`clear_watch`](PositionSource::clear_watch) is called with the
    /// returned id.
    fn watch(&self, sink: mpsc::UnboundedSender<Result<Position, LocationError>>) -> WatchId;

    /// Cancel a watch started with [`watch`](PositionSource::watch).
    fn clear_watch(&self, id: WatchId);
}

/// Tracker state shared with the processing task.
struct Shared {
    last_position: Mutex<Option<Position>>,
    permission: Mutex<PermissionState>,
    tracking: AtomicBool,
    subscribers: Mutex<Vec<Sender<LocationEvent>>>,
}

impl Shared {
    fn broadcast(&self, event: LocationEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Owns the current position and fans fixes out to subscribers.
pub struct LocationTracker<S: PositionSource> {
    source: Arc<S>,
    poll_interval: Duration,
    shared: Arc<Shared>,
    watch_id: Option<WatchId>,
    task: Option<JoinHandle<()>>,
}

impl<S: PositionSource> LocationTracker<S> {
    /// Create a tracker over the given source.
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source: Arc::new(source),
            poll_interval,
            shared: Arc::new(Shared {
                last_position: Mutex::new(None),
                permission: Mutex::new(PermissionState::Unknown),
                tracking: AtomicBool::new(false),
                subscribers: Mutex::new(Vec::new()),
            }),
            watch_id: None,
            task: None,
        }
    }

    /// Register a subscriber. Events arrive in the order fixes are accepted.
    pub fn subscribe(&self) -> Receiver<LocationEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.shared.subscribers.lock().unwrap().push(tx);
        rx
    }

    /// The most recently accepted fix.
    pub fn last_position(&self) -> Option<Position> {
        self.shared.last_position.lock().unwrap().clone()
    }

    pub fn permission(&self) -> PermissionState {
        *self.shared.permission.lock().unwrap()
    }

    pub fn is_tracking(&self) -> bool {
        self.shared.tracking.load(Ordering::Relaxed)
    }

    /// Request permission and begin continuous tracking.
    ///
    /// Starts both the push watch and the periodic poll fallback. Returns
    /// `Err(LocationError::PermissionDenied)` when the platform refuses;
    /// already-running trackers return `Ok` without restarting.
    pub async fn start(&mut self) -> Result<(), LocationError> {
        if self.is_tracking() {
            return Ok(());
        }

        let permission = self.source.request_permission().await;
        if permission == PermissionState::Denied {
            *self.shared.permission.lock().unwrap() = PermissionState::Denied;
            self.shared.tracking.store(false, Ordering::Relaxed);
            self.shared
                .broadcast(LocationEvent::Error(LocationError::PermissionDenied));
            return Err(LocationError::PermissionDenied);
        }
        *self.shared.permission.lock().unwrap() = PermissionState::Granted;

        let (watch_tx, watch_rx) = mpsc::unbounded_channel();
        self.watch_id = Some(self.source.watch(watch_tx));
        self.shared.tracking.store(true, Ordering::Relaxed);

        let source = self.source.clone();
        let shared = self.shared.clone();
        let poll_interval = self.poll_interval;
        self.task = Some(tokio::spawn(async move {
            run_loop(source, shared, watch_rx, poll_interval).await;
        }));

        tracing::info!("Location tracking started");
        Ok(())
    }

    /// Stop tracking: cancels the watch and the poll so no further events
    /// fire. Idempotent.
    pub fn stop(&mut self) {
        if let Some(id) = self.watch_id.take() {
            self.source.clear_watch(id);
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if self.shared.tracking.swap(false, Ordering::Relaxed) {
            tracing::info!("Location tracking stopped");
        }
    }
}

impl<S: PositionSource> Drop for LocationTracker<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop<S: PositionSource>(
    source: Arc<S>,
    shared: Arc<Shared>,
    mut watch_rx: mpsc::UnboundedReceiver<Result<Position, LocationError>>,
    poll_interval: Duration,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the poll fallback
    // waits a full period before its first one-shot fix.
    interval.tick().await;

    loop {
        let flow = tokio::select! {
            fix = watch_rx.recv() => match fix {
                Some(result) => handle_fix(&shared, result),
                None => ControlFlow::Break(()),
            },
            _ = interval.tick() => {
                let result = source.current_position().await;
                handle_fix(&shared, result)
            }
        };
        if flow.is_break() {
            break;
        }
    }

    shared.tracking.store(false, Ordering::Relaxed);
}

fn handle_fix(shared: &Shared, result: Result<Position, LocationError>) -> ControlFlow<()> {
    match result {
        Ok(position) => {
            {
                let mut last = shared.last_position.lock().unwrap();
                if let Some(prev) = last.as_ref() {
                    // A stale poll can resolve after a newer watch push;
                    // out-of-order fixes are discarded, not reordered.
                    if position.timestamp < prev.timestamp {
                        tracing::debug!(
                            "Discarding stale fix from {} (holding {})",
                            position.timestamp,
                            prev.timestamp
                        );
                        return ControlFlow::Continue(());
                    }
                }
                *last = Some(position.clone());
            }
            shared.broadcast(LocationEvent::Fix(position));
            ControlFlow::Continue(())
        }
        Err(LocationError::PermissionDenied) => {
            *shared.permission.lock().unwrap() = PermissionState::Denied;
            shared.broadcast(LocationEvent::Error(LocationError::PermissionDenied));
            tracing::warn!("Location permission revoked; stopping tracking");
            ControlFlow::Break(())
        }
        Err(e) => {
            tracing::debug!("Transient location error: {}", e);
            shared.broadcast(LocationEvent::Error(e));
            ControlFlow::Continue(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::VecDeque;

    /// Scripted source: hands out queued one-shot fixes and exposes the
    /// watch sink so tests can push fixes directly.
    struct ScriptedSource {
        permission: PermissionState,
        one_shot: Mutex<VecDeque<Result<Position, LocationError>>>,
        watch_sink: Mutex<Option<mpsc::UnboundedSender<Result<Position, LocationError>>>>,
    }

    impl ScriptedSource {
        fn granted() -> Arc<Self> {
            Arc::new(Self {
                permission: PermissionState::Granted,
                one_shot: Mutex::new(VecDeque::new()),
                watch_sink: Mutex::new(None),
            })
        }

        fn denied() -> Arc<Self> {
            Arc::new(Self {
                permission: PermissionState::Denied,
                one_shot: Mutex::new(VecDeque::new()),
                watch_sink: Mutex::new(None),
            })
        }

        fn push_watch_fix(&self, result: Result<Position, LocationError>) {
            let sink = self.watch_sink.lock().unwrap();
            sink.as_ref()
                .expect("watch not started")
                .send(result)
                .expect("watch channel closed");
        }
    }

    impl PositionSource for Arc<ScriptedSource> {
        async fn request_permission(&self) -> PermissionState {
            self.permission
        }

        async fn current_position(&self) -> Result<Position, LocationError> {
            self.one_shot
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LocationError::Timeout))
        }

        fn watch(&self, sink: mpsc::UnboundedSender<Result<Position, LocationError>>) -> WatchId {
            *self.watch_sink.lock().unwrap() = Some(sink);
            1
        }

        fn clear_watch(&self, _id: WatchId) {
            *self.watch_sink.lock().unwrap() = None;
        }
    }

    fn ts(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_denied_permission_stops_tracking() {
        let source = ScriptedSource::denied();
        let mut tracker = LocationTracker::new(source, Duration::from_secs(60));
        let events = tracker.subscribe();

        let result = tracker.start().await;
        assert_eq!(result, Err(LocationError::PermissionDenied));
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.permission(), PermissionState::Denied);
        assert_eq!(
            events.try_recv().unwrap(),
            LocationEvent::Error(LocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_watch_fixes_reach_subscribers_in_order() {
        let source = ScriptedSource::granted();
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_secs(60));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        source.push_watch_fix(Ok(Position::at(1.3000, 103.8000, ts(0))));
        source.push_watch_fix(Ok(Position::at(1.3010, 103.8010, ts(10))));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let first = events.try_recv().unwrap();
        let second = events.try_recv().unwrap();
        assert!(matches!(first, LocationEvent::Fix(p) if p.timestamp == ts(0)));
        assert!(matches!(second, LocationEvent::Fix(p) if p.timestamp == ts(10)));
        assert_eq!(tracker.last_position().unwrap().timestamp, ts(10));
    }

    #[tokio::test]
    async fn test_stale_fix_discarded() {
        let source = ScriptedSource::granted();
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_secs(60));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        source.push_watch_fix(Ok(Position::at(1.3010, 103.8010, ts(20))));
        source.push_watch_fix(Ok(Position::at(1.3000, 103.8000, ts(5))));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(matches!(
            events.try_recv().unwrap(),
            LocationEvent::Fix(p) if p.timestamp == ts(20)
        ));
        assert!(events.try_recv().is_err(), "stale fix must not be delivered");
        assert_eq!(tracker.last_position().unwrap().timestamp, ts(20));
    }

    #[tokio::test]
    async fn test_transient_error_keeps_tracking() {
        let source = ScriptedSource::granted();
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_secs(60));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        source.push_watch_fix(Err(LocationError::Timeout));
        source.push_watch_fix(Ok(Position::at(1.3000, 103.8000, ts(0))));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            events.try_recv().unwrap(),
            LocationEvent::Error(LocationError::Timeout)
        );
        assert!(matches!(events.try_recv().unwrap(), LocationEvent::Fix(_)));
        assert!(tracker.is_tracking());
    }

    #[tokio::test]
    async fn test_permission_revocation_halts_stream() {
        let source = ScriptedSource::granted();
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_secs(60));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        source.push_watch_fix(Err(LocationError::PermissionDenied));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(
            events.try_recv().unwrap(),
            LocationEvent::Error(LocationError::PermissionDenied)
        );
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.permission(), PermissionState::Denied);
    }

    #[tokio::test]
    async fn test_poll_fallback_fires() {
        let source = ScriptedSource::granted();
        source
            .one_shot
            .lock()
            .unwrap()
            .push_back(Ok(Position::at(1.3000, 103.8000, ts(0))));
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_millis(20));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(matches!(events.try_recv().unwrap(), LocationEvent::Fix(_)));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent_and_silences_stream() {
        let source = ScriptedSource::granted();
        let mut tracker = LocationTracker::new(source.clone(), Duration::from_secs(60));
        let events = tracker.subscribe();

        tracker.start().await.unwrap();
        tracker.stop();
        tracker.stop();
        assert!(!tracker.is_tracking());
        assert!(source.watch_sink.lock().unwrap().is_none());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(events.try_recv().is_err());
    }
}
