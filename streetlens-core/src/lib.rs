//! Streetlens Core - capture-and-submission orchestrator
//!
//! This crate fuses two independent, asynchronous, unreliable sensor streams
//! (geolocation and device orientation) into a single consistent metadata
//! record, gates submission on their availability, packages the multipart
//! request to the matching service, and drives the result-rendering state
//! machine from the response.
//!
//! # Design
//!
//! - Sensors are injected collaborators ([`LocationSource`],
//!   [`OrientationSource`]), so the orchestrator runs against hardware,
//!   flags, or scripted fakes interchangeably.
//! - The collector is the sole writer of the sensor snapshot; submission
//!   reads it once, at submission time.
//! - Attempts carry monotonically increasing tokens; a resolution belonging
//!   to a superseded attempt is discarded, never rendered.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use streetlens_core::{
//!     CaptureSession, ClientConfig, GeoOrientationCollector, LocationSample,
//!     PhotoAsset, ScriptedOrientationSource, StaticLocationSource, SubmissionClient,
//! };
//!
//! # async fn example() -> streetlens_core::Result<()> {
//! let collector = GeoOrientationCollector::new(
//!     Arc::new(StaticLocationSource::new(LocationSample {
//!         latitude: 41.8781,
//!         longitude: -87.6298,
//!         accuracy: 12.0,
//!     })),
//!     Arc::new(ScriptedOrientationSource::fixed_compass(270.0)),
//! );
//! let client = SubmissionClient::new(ClientConfig::from_env()?)?;
//!
//! let mut session = CaptureSession::new(collector, client, "streetlens/0.1");
//! session.start();
//! session.location_settled().await;
//!
//! session.select_photo(PhotoAsset::from_bytes(std::fs::read("street.jpg")
//!     .map_err(|e| streetlens_core::StreetlensError::InvalidPhoto(e.to_string()))?,
//!     "street.jpg")?);
//! session.submit().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collector;
pub mod error;
pub mod heading;
pub mod metadata;
pub mod photo;
pub mod sensor;
pub mod session;
pub mod share;
pub mod state;

// Re-export main types for convenience
pub use client::{ClientConfig, MatchResult, Story, SubmissionClient, SubmissionOutcome};
pub use collector::{GeoOrientationCollector, SensorSnapshot};
pub use error::{ErrorDescriptor, FailureKind, Result, StreetlensError, GENERIC_FAILURE_MESSAGE};
pub use heading::{normalize_heading, CompassPoint, RawOrientation};
pub use metadata::{LocationSample, MetadataAssembler, SubmissionMetadata};
pub use photo::{PhotoAsset, PreviewHandle};
pub use sensor::{
    LocationSource, OrientationSource, ScriptedOrientationSource, SilentOrientationSource,
    StaticLocationSource, UnavailableLocationSource, DEFAULT_FIX_TIMEOUT,
};
pub use session::CaptureSession;
pub use share::{SharePayload, ShareDispatcher, ShareReceipt, ShareTarget, UnsupportedShareTarget};
pub use state::{AttemptToken, ComparePair, RenderPhase, ResultRenderState};
