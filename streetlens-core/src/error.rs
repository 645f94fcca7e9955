use thiserror::Error;

/// Fallback message shown when a failure carries no usable detail.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong while processing your photo. Please try again.";

#[derive(Error, Debug)]
pub enum StreetlensError {
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("location is not available yet; a GPS fix is required before submitting")]
    MissingLocation,

    #[error("no photo selected")]
    MissingPhoto,

    #[error("invalid photo: {0}")]
    InvalidPhoto(String),

    #[error("network error: {0}")]
    Transport(String),

    #[error("{0}")]
    Application(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StreetlensError>;

/// Broad class of a submission failure, for rendering and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a usable response.
    Transport,
    /// The backend answered with a structured error payload.
    Application,
    /// The backend answered but the body did not match the contract.
    MalformedResponse,
}

/// Human-readable description of a failed submission.
///
/// This is what the `Failure` render phase carries: the message is shown to
/// the user verbatim and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDescriptor {
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self { kind, message }
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<StreetlensError> for ErrorDescriptor {
    fn from(err: StreetlensError) -> Self {
        match err {
            StreetlensError::Transport(msg) => Self::new(FailureKind::Transport, msg),
            StreetlensError::Application(msg) => Self::new(FailureKind::Application, msg),
            StreetlensError::MalformedResponse(msg) => {
                Self::new(FailureKind::MalformedResponse, msg)
            }
            // Local validation and configuration failures are not transport
            // faults.
            other => Self::new(FailureKind::Application, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_never_empty() {
        let desc = ErrorDescriptor::new(FailureKind::Transport, "   ");
        assert_eq!(desc.message, GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_local_errors_are_not_transport_failures() {
        let desc: ErrorDescriptor = StreetlensError::Config("bad origin".into()).into();
        assert_eq!(desc.kind, FailureKind::Application);

        let desc: ErrorDescriptor =
            StreetlensError::InvalidPhoto("unrecognized image format".into()).into();
        assert_eq!(desc.kind, FailureKind::Application);
    }

    #[test]
    fn test_application_error_message_verbatim() {
        let desc: ErrorDescriptor =
            StreetlensError::Application("No historical photo found for this location.".into())
                .into();
        assert_eq!(desc.kind, FailureKind::Application);
        assert_eq!(desc.message, "No historical photo found for this location.");
    }
}
