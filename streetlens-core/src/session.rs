//! Capture orchestration: sensors in, one submission out, state updated.

use crate::client::SubmissionClient;
use crate::collector::{GeoOrientationCollector, SensorSnapshot};
use crate::error::{Result, StreetlensError};
use crate::metadata::MetadataAssembler;
use crate::photo::PhotoAsset;
use crate::state::ResultRenderState;

/// Ties the collector, assembler, client, and render state together into the
/// capture flow: select a photo, submit, render from the resulting phase.
///
/// Sensor collection runs independently of photo selection; it starts when
/// the session starts and keeps updating the live snapshot, which never
/// retroactively alters an already-built metadata record.
pub struct CaptureSession {
    collector: GeoOrientationCollector,
    assembler: MetadataAssembler,
    client: SubmissionClient,
    state: ResultRenderState,
}

impl CaptureSession {
    pub fn new(
        collector: GeoOrientationCollector,
        client: SubmissionClient,
        client_signature: impl Into<String>,
    ) -> Self {
        Self {
            collector,
            assembler: MetadataAssembler::new(client_signature),
            client,
            state: ResultRenderState::new(),
        }
    }

    /// Start sensor collection.
    pub fn start(&mut self) {
        self.collector.start();
    }

    /// Tear down sensor collection.
    pub fn stop(&mut self) {
        self.collector.stop();
    }

    /// Wait until the one-shot location fix has resolved one way or the
    /// other.
    pub async fn location_settled(&self) {
        self.collector.location_settled().await;
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        self.collector.snapshot()
    }

    pub fn select_photo(&mut self, photo: PhotoAsset) {
        self.state.select_photo(photo);
    }

    pub fn state(&self) -> &ResultRenderState {
        &self.state
    }

    /// Submit the selected photo with the current sensor snapshot.
    ///
    /// An `Err` is a local validation prompt (missing photo or location);
    /// no request was made and the render phase is unchanged. On `Ok` the
    /// render phase holds the attempt's outcome.
    pub async fn submit(&mut self) -> Result<()> {
        let snapshot = self.collector.snapshot();
        let token = self.state.begin_attempt(snapshot.location.is_some())?;
        let metadata = self.assembler.assemble(&snapshot)?;

        let outcome = {
            // The guard above guarantees a photo is selected.
            let photo = self.state.photo().ok_or(StreetlensError::MissingPhoto)?;
            self.client.submit(photo, &metadata).await
        };
        self.state.resolve(token, outcome);
        Ok(())
    }
}
