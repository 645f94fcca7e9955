//! Best-effort sharing of a successful match.
//!
//! Capability absence is an expected branch, not an error: the dispatcher
//! tries the native target, falls back to copying the link, and reports what
//! happened. Nothing here ever returns an error to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::MatchResult;
use crate::error::Result;

/// The title/text/url triple offered to share targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub url: String,
}

impl SharePayload {
    /// Build the share content for a successful match.
    pub fn from_result(result: &MatchResult, page_url: &str) -> Self {
        Self {
            title: "Street Time Machine".to_string(),
            text: format!("I found what this street looked like in {}!", result.year),
            url: page_url.to_string(),
        }
    }
}

/// A sharing capability: native share sheet, clipboard, or whatever the
/// platform offers.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether the capability exists on this platform at all.
    fn available(&self) -> bool;

    async fn share(&self, payload: &SharePayload) -> Result<()>;
}

/// A capability the platform does not provide.
#[derive(Default)]
pub struct UnsupportedShareTarget;

#[async_trait]
impl ShareTarget for UnsupportedShareTarget {
    fn available(&self) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<()> {
        Ok(())
    }
}

/// How a dispatch concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareReceipt {
    /// The native target accepted the payload.
    Shared,
    /// Fell back to copying the link; show a transient confirmation.
    CopiedLink,
    /// Neither capability was usable.
    Unavailable,
}

/// Negotiates between the native share capability and the clipboard
/// fallback.
pub struct ShareDispatcher {
    native: Arc<dyn ShareTarget>,
    clipboard: Arc<dyn ShareTarget>,
}

impl ShareDispatcher {
    pub fn new(native: Arc<dyn ShareTarget>, clipboard: Arc<dyn ShareTarget>) -> Self {
        Self { native, clipboard }
    }

    pub async fn dispatch(&self, payload: &SharePayload) -> ShareReceipt {
        if self.native.available() {
            match self.native.share(payload).await {
                Ok(()) => return ShareReceipt::Shared,
                // A declined or failed native share falls through to the
                // clipboard, same as an absent capability.
                Err(e) => debug!(error = %e, "native share failed, trying clipboard"),
            }
        }
        if self.clipboard.available() && self.clipboard.share(payload).await.is_ok() {
            return ShareReceipt::CopiedLink;
        }
        ShareReceipt::Unavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreetlensError;
    use std::sync::Mutex;

    struct RecordingTarget {
        available: bool,
        fail: bool,
        seen: Mutex<Vec<SharePayload>>,
    }

    impl RecordingTarget {
        fn new(available: bool, fail: bool) -> Self {
            Self {
                available,
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ShareTarget for RecordingTarget {
        fn available(&self) -> bool {
            self.available
        }

        async fn share(&self, payload: &SharePayload) -> Result<()> {
            if self.fail {
                return Err(StreetlensError::SensorUnavailable("share declined".into()));
            }
            self.seen.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    fn payload() -> SharePayload {
        SharePayload {
            title: "Street Time Machine".into(),
            text: "I found what this street looked like in 1953!".into(),
            url: "http://localhost:3000/".into(),
        }
    }

    #[tokio::test]
    async fn test_native_share_preferred() {
        let native = Arc::new(RecordingTarget::new(true, false));
        let clipboard = Arc::new(RecordingTarget::new(true, false));
        let dispatcher = ShareDispatcher::new(native.clone(), clipboard.clone());

        assert_eq!(dispatcher.dispatch(&payload()).await, ShareReceipt::Shared);
        assert_eq!(native.seen.lock().unwrap().len(), 1);
        assert!(clipboard.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clipboard_fallback_when_native_absent() {
        let dispatcher = ShareDispatcher::new(
            Arc::new(UnsupportedShareTarget),
            Arc::new(RecordingTarget::new(true, false)),
        );
        assert_eq!(
            dispatcher.dispatch(&payload()).await,
            ShareReceipt::CopiedLink
        );
    }

    #[tokio::test]
    async fn test_native_failure_falls_back() {
        let dispatcher = ShareDispatcher::new(
            Arc::new(RecordingTarget::new(true, true)),
            Arc::new(RecordingTarget::new(true, false)),
        );
        assert_eq!(
            dispatcher.dispatch(&payload()).await,
            ShareReceipt::CopiedLink
        );
    }

    #[tokio::test]
    async fn test_nothing_available_is_not_an_error() {
        let dispatcher = ShareDispatcher::new(
            Arc::new(UnsupportedShareTarget),
            Arc::new(UnsupportedShareTarget),
        );
        assert_eq!(
            dispatcher.dispatch(&payload()).await,
            ShareReceipt::Unavailable
        );
    }

    #[test]
    fn test_payload_from_result() {
        let result = MatchResult {
            confidence: 87,
            year: "1953".into(),
            distance_meters: 12.4,
            historical_url: "http://localhost:8000/historical/abc.jpg".parse().unwrap(),
            story: None,
        };
        let payload = SharePayload::from_result(&result, "http://localhost:3000/");
        assert!(payload.text.contains("1953"));
        assert_eq!(payload.url, "http://localhost:3000/");
    }
}
