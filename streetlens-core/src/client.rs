//! Multipart submission to the matching service.
//!
//! One request per attempt: the photo binary plus the serialized metadata
//! record. Every failure path funnels into [`SubmissionOutcome::Failure`];
//! nothing escapes this boundary as a panic or a raw transport error.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::{
    ErrorDescriptor, Result, StreetlensError, GENERIC_FAILURE_MESSAGE,
};
use crate::metadata::SubmissionMetadata;
use crate::photo::PhotoAsset;

/// Contextual narrative accompanying a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub quote: String,
    pub fact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A validated match returned by the backend, with the historical image
/// reference already resolved against the backend origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Match confidence, 0-100.
    pub confidence: u8,
    pub year: String,
    pub distance_meters: f64,
    pub historical_url: Url,
    pub story: Option<Story>,
}

/// Outcome of one submission attempt.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Success(MatchResult),
    Failure(ErrorDescriptor),
}

/// Success response body, as the backend sends it. `historical_url` is a
/// path relative to the backend origin.
#[derive(Debug, Deserialize)]
struct MatchResponse {
    confidence: u8,
    year: String,
    distance_meters: f64,
    historical_url: String,
    #[serde(default)]
    story: Option<Story>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Backend endpoint configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; all relative paths in responses resolve against it.
    pub base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url
            .parse::<Url>()
            .map_err(|e| StreetlensError::Config(format!("invalid backend origin: {e}")))?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(30),
        })
    }

    /// Read the backend origin from `STREETLENS_API_URL`, defaulting to the
    /// local development backend.
    pub fn from_env() -> Result<Self> {
        let origin = std::env::var("STREETLENS_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        Self::new(&origin)
    }
}

/// Executes the multipart request/response exchange with the backend.
#[derive(Clone)]
pub struct SubmissionClient {
    client: Client,
    config: ClientConfig,
}

impl SubmissionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StreetlensError::Config(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// The configured backend origin.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Resolve a backend-relative path against the configured origin.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| StreetlensError::Config(format!("invalid backend path {path:?}: {e}")))
    }

    /// Submit one photo with its metadata record.
    ///
    /// Error precedence on failure: the backend's structured error message
    /// verbatim, else the transport-level message, else a generic fallback.
    #[instrument(level = "info", skip_all, fields(file = %photo.file_name(), bytes = photo.bytes().len()))]
    pub async fn submit(
        &self,
        photo: &PhotoAsset,
        metadata: &SubmissionMetadata,
    ) -> SubmissionOutcome {
        match self.try_submit(photo, metadata).await {
            Ok(result) => {
                info!(
                    confidence = result.confidence,
                    year = %result.year,
                    distance_meters = result.distance_meters,
                    "match received"
                );
                SubmissionOutcome::Success(result)
            }
            Err(e) => {
                warn!(error = %e, "submission failed");
                SubmissionOutcome::Failure(e.into())
            }
        }
    }

    async fn try_submit(
        &self,
        photo: &PhotoAsset,
        metadata: &SubmissionMetadata,
    ) -> Result<MatchResult> {
        let file_part = Part::bytes(photo.bytes().to_vec())
            .file_name(photo.file_name().to_string())
            .mime_str(photo.mime())
            .map_err(|e| StreetlensError::Config(format!("invalid photo MIME type: {e}")))?;
        let form = Form::new()
            .part("file", file_part)
            .text("metadata", metadata.to_form_json()?);

        let url = self.resolve("/process-photo")?;
        debug!(url = %url, "submitting photo");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StreetlensError::Transport(transport_message(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StreetlensError::Transport(transport_message(&e)))?;

        if !status.is_success() {
            // Structured error payloads carry the user-facing message.
            return match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(err) => Err(StreetlensError::Application(err.error)),
                Err(_) => Err(StreetlensError::Application(
                    GENERIC_FAILURE_MESSAGE.to_string(),
                )),
            };
        }

        let parsed: MatchResponse = serde_json::from_str(&body)
            .map_err(|e| StreetlensError::MalformedResponse(e.to_string()))?;
        self.validate(parsed)
    }

    fn validate(&self, response: MatchResponse) -> Result<MatchResult> {
        if response.confidence > 100 {
            return Err(StreetlensError::MalformedResponse(format!(
                "confidence {} out of range",
                response.confidence
            )));
        }
        Ok(MatchResult {
            confidence: response.confidence,
            year: response.year,
            distance_meters: response.distance_meters,
            historical_url: self.resolve(&response.historical_url)?,
            story: response.story,
        })
    }

    /// Download the matched historical image.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch_historical(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StreetlensError::Transport(transport_message(&e)))?;

        if !response.status().is_success() {
            return Err(StreetlensError::Application(format!(
                "archive returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StreetlensError::Transport(transport_message(&e)))?;
        Ok(bytes.to_vec())
    }
}

/// User-facing wording for a transport failure.
fn transport_message(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "the matching service took too long to respond".to_string()
    } else if error.is_connect() {
        "could not reach the matching service".to_string()
    } else {
        format!("request failed: {error}")
    }
}
