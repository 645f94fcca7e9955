//! The result-rendering state machine.
//!
//! `Idle -> Loading -> Success | Failure`, where the terminal phases are
//! re-enterable: a new submission clears the previous payload and returns to
//! `Loading`. Only the most recently started attempt may resolve the phase;
//! resolutions of superseded attempts are discarded silently.

use tracing::debug;

use crate::client::{MatchResult, SubmissionOutcome};
use crate::error::{ErrorDescriptor, Result, StreetlensError};
use crate::photo::PhotoAsset;

/// What the presentation layer should currently render.
#[derive(Debug)]
pub enum RenderPhase {
    /// No attempt yet.
    Idle,
    /// A submission is in flight; show progress messaging.
    Loading,
    /// Show the comparison pair, the summary, and the optional story.
    Success(MatchResult),
    /// Show the message and allow resubmission.
    Failure(ErrorDescriptor),
}

impl RenderPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Identifies one submission attempt. Tokens are handed out monotonically;
/// only the latest one may resolve the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptToken(u64);

/// Props contract for the side-by-side comparison widget: two image sources
/// and two labels. The widget itself is an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparePair {
    pub before_src: String,
    pub after_src: String,
    pub before_label: String,
    pub after_label: String,
}

/// Drives what is rendered, holding at most one match result and one active
/// photo preview at a time.
pub struct ResultRenderState {
    phase: RenderPhase,
    photo: Option<PhotoAsset>,
    latest_attempt: u64,
}

impl Default for ResultRenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultRenderState {
    pub fn new() -> Self {
        Self {
            phase: RenderPhase::Idle,
            photo: None,
            latest_attempt: 0,
        }
    }

    pub fn phase(&self) -> &RenderPhase {
        &self.phase
    }

    pub fn photo(&self) -> Option<&PhotoAsset> {
        self.photo.as_ref()
    }

    /// Select a photo for the next attempt. Replacing a photo drops the old
    /// asset, which revokes its preview handle; any previous result is
    /// cleared back to `Idle`.
    pub fn select_photo(&mut self, photo: PhotoAsset) {
        self.photo = Some(photo);
        self.phase = RenderPhase::Idle;
    }

    /// Start a new attempt, entering `Loading`.
    ///
    /// Guard: a photo must be selected and a location sample must be
    /// present. A violated guard changes nothing; the error is the
    /// user-visible prompt. Starting a new attempt supersedes any attempt
    /// still in flight.
    pub fn begin_attempt(&mut self, location_present: bool) -> Result<AttemptToken> {
        if self.photo.is_none() {
            return Err(StreetlensError::MissingPhoto);
        }
        if !location_present {
            return Err(StreetlensError::MissingLocation);
        }
        self.latest_attempt += 1;
        self.phase = RenderPhase::Loading;
        Ok(AttemptToken(self.latest_attempt))
    }

    /// Resolve an attempt. A resolution belonging to a superseded attempt
    /// has no observable effect.
    pub fn resolve(&mut self, token: AttemptToken, outcome: SubmissionOutcome) {
        if token.0 != self.latest_attempt {
            debug!(
                attempt = token.0,
                latest = self.latest_attempt,
                "discarding stale resolution"
            );
            return;
        }
        self.phase = match outcome {
            SubmissionOutcome::Success(result) => RenderPhase::Success(result),
            SubmissionOutcome::Failure(descriptor) => RenderPhase::Failure(descriptor),
        };
    }

    /// The comparison widget props, available only in `Success` with a live
    /// preview.
    pub fn compare_pair(&self) -> Option<ComparePair> {
        let RenderPhase::Success(result) = &self.phase else {
            return None;
        };
        let preview = self.photo.as_ref()?.preview();
        let before_src = preview.uri()?.to_string();
        Some(ComparePair {
            before_src,
            after_src: result.historical_url.to_string(),
            before_label: "Today".to_string(),
            after_label: result.year.clone(),
        })
    }
}
