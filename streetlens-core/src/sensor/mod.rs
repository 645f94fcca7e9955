//! Injected sensor collaborators.
//!
//! The platform's geolocation and orientation APIs are ambient global state;
//! here they are modeled as explicit sources handed to the collector, so the
//! orchestrator runs identically against hardware-backed, flag-backed, or
//! scripted implementations.
//!
//! Platforms expose the orientation stream under two different event names
//! (absolute and relative) and fire whichever they support. That quirk stays
//! behind [`OrientationSource::subscribe`]: a source feeds one channel from
//! whatever the platform delivers, and the collector never knows which.

mod fixed;

pub use fixed::{
    ScriptedOrientationSource, SilentOrientationSource, StaticLocationSource,
    UnavailableLocationSource,
};

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::heading::RawOrientation;
use crate::metadata::LocationSample;

/// Recommended timeout for the one-shot location fix.
pub const DEFAULT_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// One-shot high-accuracy location fix.
///
/// Errors mean the sensor is unavailable or permission was denied; the
/// collector treats both as non-fatal. The collector bounds the call with
/// its fix timeout, so implementations may block indefinitely.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn fix(&self) -> Result<LocationSample>;
}

/// Continuous device-orientation event stream.
///
/// Each call returns an independent receiver; the source stops sending when
/// the stream ends or every receiver is dropped.
pub trait OrientationSource: Send + Sync {
    fn subscribe(&self) -> mpsc::Receiver<RawOrientation>;
}
