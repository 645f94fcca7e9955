//! The selected photo and its preview handle.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use image::ImageFormat;
use tracing::debug;

use crate::error::{Result, StreetlensError};

static PREVIEW_SEQ: AtomicU64 = AtomicU64::new(0);

/// Revocable, ownership-free reference to the in-memory preview of a photo.
///
/// Stands in for a platform object-URL: cheap to clone, and every clone
/// observes revocation. Revoked when the owning [`PhotoAsset`] is replaced
/// or dropped, so the underlying memory is never referenced past teardown.
#[derive(Debug, Clone)]
pub struct PreviewHandle {
    uri: Arc<str>,
    alive: Arc<AtomicBool>,
}

impl PreviewHandle {
    fn new() -> Self {
        let seq = PREVIEW_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            uri: format!("mem://preview/{seq}").into(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The preview URI, or `None` once revoked.
    pub fn uri(&self) -> Option<&str> {
        if self.is_revoked() {
            None
        } else {
            Some(&self.uri)
        }
    }

    pub fn is_revoked(&self) -> bool {
        !self.alive.load(Ordering::Acquire)
    }

    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// The binary image selected by the user, plus its preview handle.
#[derive(Debug)]
pub struct PhotoAsset {
    bytes: Vec<u8>,
    file_name: String,
    mime: &'static str,
    preview: PreviewHandle,
}

impl PhotoAsset {
    /// Wrap selected bytes, sniffing the content to reject anything outside
    /// the supported image formats before it is ever offered for submission.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self> {
        let format = image::guess_format(&bytes)
            .map_err(|_| StreetlensError::InvalidPhoto("unrecognized image format".into()))?;
        let mime = mime_for(format).ok_or_else(|| {
            StreetlensError::InvalidPhoto(format!("unsupported image format: {format:?}"))
        })?;
        let file_name = file_name.into();
        debug!(file = %file_name, bytes = bytes.len(), mime, "photo selected");
        Ok(Self {
            bytes,
            file_name,
            mime,
            preview: PreviewHandle::new(),
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// A shareable handle to this photo's preview.
    pub fn preview(&self) -> PreviewHandle {
        self.preview.clone()
    }
}

impl Drop for PhotoAsset {
    fn drop(&mut self) {
        self.preview.revoke();
    }
}

fn mime_for(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}
