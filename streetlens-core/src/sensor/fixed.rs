//! Flag-backed and scripted sensor sources.
//!
//! These stand in for hardware on platforms without real sensors (the CLI)
//! and drive deterministic orchestrator tests.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{LocationSource, OrientationSource};
use crate::error::{Result, StreetlensError};
use crate::heading::RawOrientation;
use crate::metadata::LocationSample;

/// Location source that resolves immediately with a fixed sample.
pub struct StaticLocationSource {
    sample: LocationSample,
}

impl StaticLocationSource {
    pub fn new(sample: LocationSample) -> Self {
        Self { sample }
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn fix(&self) -> Result<LocationSample> {
        Ok(self.sample)
    }
}

/// Location source standing in for a missing or denied geolocation API.
pub struct UnavailableLocationSource {
    reason: String,
}

impl UnavailableLocationSource {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for UnavailableLocationSource {
    fn default() -> Self {
        Self::new("geolocation not supported")
    }
}

#[async_trait]
impl LocationSource for UnavailableLocationSource {
    async fn fix(&self) -> Result<LocationSample> {
        Err(StreetlensError::SensorUnavailable(self.reason.clone()))
    }
}

/// Orientation source that replays a fixed sequence of raw events, with an
/// optional delay between them.
pub struct ScriptedOrientationSource {
    events: Vec<RawOrientation>,
    interval: Duration,
}

impl ScriptedOrientationSource {
    pub fn new(events: Vec<RawOrientation>) -> Self {
        Self {
            events,
            interval: Duration::ZERO,
        }
    }

    /// Single compass reading, repeated never (the snapshot keeps the last
    /// value, so one event is enough for a fixed heading).
    pub fn fixed_compass(heading: f64) -> Self {
        Self::new(vec![RawOrientation::from_compass(heading)])
    }

    /// Space the replayed events `interval` apart.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl OrientationSource for ScriptedOrientationSource {
    fn subscribe(&self) -> mpsc::Receiver<RawOrientation> {
        let (tx, rx) = mpsc::channel(16);
        let events = self.events.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            for event in events {
                if !interval.is_zero() {
                    tokio::time::sleep(interval).await;
                }
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}

/// Orientation source for platforms without orientation events: the stream
/// ends immediately, so the heading stays absent.
#[derive(Default)]
pub struct SilentOrientationSource;

impl OrientationSource for SilentOrientationSource {
    fn subscribe(&self) -> mpsc::Receiver<RawOrientation> {
        let (_tx, rx) = mpsc::channel(1);
        rx
    }
}
