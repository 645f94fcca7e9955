//! Sensor collection and the live snapshot.
//!
//! The collector owns the only writer of the sensor snapshot. Location and
//! orientation deliver through two different idioms (a one-shot future and a
//! continuous stream); both are funneled into one internal event channel
//! consumed by a single task, so every ordering rule lives in one place.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::heading::normalize_heading;
use crate::metadata::LocationSample;
use crate::sensor::{LocationSource, OrientationSource, DEFAULT_FIX_TIMEOUT};

/// The latest known value of each sensor at an arbitrary instant.
///
/// Absence is a valid, distinct state for both fields; a `0` heading is not
/// the same as no heading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    pub location: Option<LocationSample>,
    pub heading: Option<u16>,
}

enum SensorEvent {
    Location(LocationSample),
    Heading(u16),
}

/// Subscribes to the location and orientation sources and holds the latest
/// sample of each.
///
/// `start` spawns the collection tasks; `stop` (or drop) tears them down,
/// after which no sensor callback mutates the snapshot, whenever it fires.
pub struct GeoOrientationCollector {
    location: Arc<dyn LocationSource>,
    orientation: Arc<dyn OrientationSource>,
    fix_timeout: Duration,
    snapshot: Arc<Mutex<SensorSnapshot>>,
    tasks: Vec<JoinHandle<()>>,
    fix_settled: Option<watch::Receiver<bool>>,
}

impl GeoOrientationCollector {
    pub fn new(
        location: Arc<dyn LocationSource>,
        orientation: Arc<dyn OrientationSource>,
    ) -> Self {
        Self {
            location,
            orientation,
            fix_timeout: DEFAULT_FIX_TIMEOUT,
            snapshot: Arc::new(Mutex::new(SensorSnapshot::default())),
            tasks: Vec::new(),
            fix_settled: None,
        }
    }

    pub fn with_fix_timeout(mut self, timeout: Duration) -> Self {
        self.fix_timeout = timeout;
        self
    }

    /// Start collecting. Idempotent while running.
    pub fn start(&mut self) {
        if !self.tasks.is_empty() {
            return;
        }

        let (event_tx, mut event_rx) = mpsc::channel::<SensorEvent>(32);
        let (settle_tx, settle_rx) = watch::channel(false);
        self.fix_settled = Some(settle_rx);

        // Sole writer of the snapshot.
        let snapshot = Arc::clone(&self.snapshot);
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let mut state = snapshot.lock().unwrap_or_else(|e| e.into_inner());
                match event {
                    SensorEvent::Location(sample) => state.location = Some(sample),
                    SensorEvent::Heading(heading) => state.heading = Some(heading),
                }
            }
        }));

        // One-shot location fix. Failure and timeout are logged and leave
        // the location absent; the user can still retry the capture.
        let location = Arc::clone(&self.location);
        let fix_timeout = self.fix_timeout;
        let tx = event_tx.clone();
        self.tasks.push(tokio::spawn(async move {
            match tokio::time::timeout(fix_timeout, location.fix()).await {
                Ok(Ok(sample)) => {
                    debug!(
                        latitude = sample.latitude,
                        longitude = sample.longitude,
                        accuracy = sample.accuracy,
                        "location fix acquired"
                    );
                    let _ = tx.send(SensorEvent::Location(sample)).await;
                }
                Ok(Err(e)) => warn!(error = %e, "location fix failed"),
                Err(_) => warn!(timeout_ms = fix_timeout.as_millis() as u64, "location fix timed out"),
            }
            let _ = settle_tx.send(true);
        }));

        // Orientation stream pump. Every raw event goes through the
        // normalizer; the latest heading overwrites the previous one.
        let orientation = Arc::clone(&self.orientation);
        self.tasks.push(tokio::spawn(async move {
            let mut events = orientation.subscribe();
            while let Some(event) = events.recv().await {
                if let Some(heading) = normalize_heading(&event) {
                    if event_tx.send(SensorEvent::Heading(heading)).await.is_err() {
                        break;
                    }
                }
            }
        }));
    }

    /// The latest known sensor values, possibly stale or absent.
    pub fn snapshot(&self) -> SensorSnapshot {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wait until the one-shot fix has succeeded, failed, or timed out.
    ///
    /// Returns immediately when collection was never started or was stopped.
    pub async fn location_settled(&self) {
        if let Some(rx) = &self.fix_settled {
            let mut rx = rx.clone();
            let _ = rx.wait_for(|settled| *settled).await;
        }
    }

    /// Tear down the collection tasks. After this returns, no sensor event
    /// mutates the snapshot, even when a source fires afterwards.
    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for GeoOrientationCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::heading::RawOrientation;
    use crate::sensor::{
        ScriptedOrientationSource, SilentOrientationSource, StaticLocationSource,
        UnavailableLocationSource,
    };
    use async_trait::async_trait;

    fn chicago() -> LocationSample {
        LocationSample {
            latitude: 41.8781,
            longitude: -87.6298,
            accuracy: 10.0,
        }
    }

    /// Fix that never resolves, for timeout tests.
    struct PendingLocationSource;

    #[async_trait]
    impl LocationSource for PendingLocationSource {
        async fn fix(&self) -> Result<LocationSample> {
            std::future::pending().await
        }
    }

    async fn wait_for(
        collector: &GeoOrientationCollector,
        predicate: impl Fn(&SensorSnapshot) -> bool,
    ) -> SensorSnapshot {
        for _ in 0..200 {
            let snapshot = collector.snapshot();
            if predicate(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("snapshot never reached expected state: {:?}", collector.snapshot());
    }

    #[tokio::test]
    async fn test_collects_location_and_heading() {
        let mut collector = GeoOrientationCollector::new(
            Arc::new(StaticLocationSource::new(chicago())),
            Arc::new(ScriptedOrientationSource::fixed_compass(271.4)),
        );
        collector.start();
        collector.location_settled().await;

        let snapshot =
            wait_for(&collector, |s| s.location.is_some() && s.heading.is_some()).await;
        assert_eq!(snapshot.location, Some(chicago()));
        assert_eq!(snapshot.heading, Some(271));
    }

    #[tokio::test]
    async fn test_latest_heading_overwrites() {
        let mut collector = GeoOrientationCollector::new(
            Arc::new(UnavailableLocationSource::default()),
            Arc::new(ScriptedOrientationSource::new(vec![
                RawOrientation::from_compass(10.0),
                RawOrientation::from_compass(250.0),
            ])),
        );
        collector.start();

        let snapshot = wait_for(&collector, |s| s.heading == Some(250)).await;
        assert_eq!(snapshot.heading, Some(250));
    }

    #[tokio::test]
    async fn test_fix_failure_leaves_location_absent() {
        let mut collector = GeoOrientationCollector::new(
            Arc::new(UnavailableLocationSource::new("permission denied")),
            Arc::new(SilentOrientationSource),
        );
        collector.start();
        collector.location_settled().await;
        assert_eq!(collector.snapshot().location, None);
    }

    #[tokio::test]
    async fn test_fix_timeout_settles_without_location() {
        let mut collector = GeoOrientationCollector::new(
            Arc::new(PendingLocationSource),
            Arc::new(SilentOrientationSource),
        )
        .with_fix_timeout(Duration::from_millis(20));
        collector.start();
        collector.location_settled().await;
        assert_eq!(collector.snapshot().location, None);
    }

    #[tokio::test]
    async fn test_no_mutation_after_stop() {
        let mut collector = GeoOrientationCollector::new(
            Arc::new(UnavailableLocationSource::default()),
            Arc::new(
                ScriptedOrientationSource::new(vec![
                    RawOrientation::from_compass(42.0),
                    RawOrientation::from_compass(43.0),
                ])
                .with_interval(Duration::from_millis(40)),
            ),
        );
        collector.start();
        collector.stop();

        // The scripted source keeps firing well after teardown; none of its
        // events may reach the snapshot.
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(collector.snapshot(), SensorSnapshot::default());
    }

    #[tokio::test]
    async fn test_settled_is_immediate_when_never_started() {
        let collector = GeoOrientationCollector::new(
            Arc::new(StaticLocationSource::new(chicago())),
            Arc::new(SilentOrientationSource),
        );
        // Must not hang.
        collector.location_settled().await;
        assert_eq!(collector.snapshot(), SensorSnapshot::default());
    }
}
