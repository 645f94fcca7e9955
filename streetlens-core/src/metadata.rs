//! Submission metadata assembly.
//!
//! One [`SubmissionMetadata`] record is built per submission attempt from the
//! sensor snapshot current at that moment. The record is immutable once
//! built; later sensor updates never alter an already-assembled record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::collector::SensorSnapshot;
use crate::error::{Result, StreetlensError};

/// The latest known GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated accuracy radius in meters.
    pub accuracy: f64,
}

/// Positioning context attached to one submission attempt.
///
/// Serialized as the multipart `metadata` field:
/// `{ gps, heading, timestamp, user_agent }`, heading null when absent,
/// timestamp ISO-8601.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionMetadata {
    pub gps: LocationSample,
    pub heading: Option<u16>,
    pub timestamp: DateTime<Utc>,
    pub user_agent: String,
}

impl SubmissionMetadata {
    /// The JSON string sent as the multipart `metadata` field.
    pub fn to_form_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| StreetlensError::Config(format!("failed to serialize metadata: {e}")))
    }
}

/// Builds the metadata record for a submission attempt.
///
/// This is the single gate in front of submission: assembly refuses when the
/// snapshot has no location. Heading may be absent.
pub struct MetadataAssembler {
    client_signature: String,
}

impl MetadataAssembler {
    pub fn new(client_signature: impl Into<String>) -> Self {
        Self {
            client_signature: client_signature.into(),
        }
    }

    /// Snapshot the sensor state into an immutable metadata record.
    ///
    /// The timestamp is taken now, at submission time, not at
    /// sensor-sample time.
    pub fn assemble(&self, snapshot: &SensorSnapshot) -> Result<SubmissionMetadata> {
        let gps = snapshot.location.ok_or(StreetlensError::MissingLocation)?;
        Ok(SubmissionMetadata {
            gps,
            heading: snapshot.heading,
            timestamp: Utc::now(),
            user_agent: self.client_signature.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with_location() -> SensorSnapshot {
        SensorSnapshot {
            location: Some(LocationSample {
                latitude: 41.8781,
                longitude: -87.6298,
                accuracy: 12.0,
            }),
            heading: Some(270),
        }
    }

    #[test]
    fn test_assemble_requires_location() {
        let assembler = MetadataAssembler::new("streetlens-test/1.0");
        let snapshot = SensorSnapshot {
            location: None,
            heading: Some(90),
        };
        assert!(matches!(
            assembler.assemble(&snapshot),
            Err(StreetlensError::MissingLocation)
        ));
    }

    #[test]
    fn test_assemble_allows_absent_heading() {
        let assembler = MetadataAssembler::new("streetlens-test/1.0");
        let mut snapshot = snapshot_with_location();
        snapshot.heading = None;
        let metadata = assembler.assemble(&snapshot).unwrap();
        assert_eq!(metadata.heading, None);
    }

    #[test]
    fn test_wire_shape() {
        let assembler = MetadataAssembler::new("streetlens-test/1.0");
        let metadata = assembler.assemble(&snapshot_with_location()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&metadata.to_form_json().unwrap()).unwrap();

        assert_eq!(value["gps"]["latitude"], 41.8781);
        assert_eq!(value["gps"]["longitude"], -87.6298);
        assert_eq!(value["gps"]["accuracy"], 12.0);
        assert_eq!(value["heading"], 270);
        assert_eq!(value["user_agent"], "streetlens-test/1.0");
        // ISO-8601 timestamp, parseable back.
        let ts = value["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_absent_heading_serializes_as_null() {
        let assembler = MetadataAssembler::new("ua");
        let mut snapshot = snapshot_with_location();
        snapshot.heading = None;
        let metadata = assembler.assemble(&snapshot).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&metadata.to_form_json().unwrap()).unwrap();
        assert!(value["heading"].is_null());
        assert!(value.as_object().unwrap().contains_key("heading"));
    }
}
