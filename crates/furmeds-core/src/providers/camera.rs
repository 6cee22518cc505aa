//! Device camera and gallery

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{FurMedsError, FurMedsResult};

/// Camera permission as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
    /// Not decided yet; asking will show the system dialog
    Prompt,
}

/// Captured image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> FurMedsResult<Self> {
        let invalid = || FurMedsError::Upload("not a base64 data URL".to_string());

        let rest = url.strip_prefix("data:").ok_or_else(invalid)?;
        let (meta, data) = rest.split_once(',').ok_or_else(invalid)?;
        let mime = meta.strip_suffix(";base64").ok_or_else(invalid)?;
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| FurMedsError::Upload(format!("invalid base64 payload: {e}")))?;

        Ok(Self::new(mime, bytes))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn check_permission(&self) -> Permission;

    async fn request_permission(&self) -> Permission;

    async fn capture(&self) -> FurMedsResult<ImagePayload>;
}

/// Camera that "captures" an image file from disk
#[derive(Debug, Clone)]
pub struct FileCamera {
    path: PathBuf,
    permission: Permission,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            permission: Permission::Granted,
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permission = permission;
        self
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn check_permission(&self) -> Permission {
        self.permission
    }

    async fn request_permission(&self) -> Permission {
        // A file has no one to ask; an undecided prompt is granted.
        match self.permission {
            Permission::Prompt => Permission::Granted,
            other => other,
        }
    }

    async fn capture(&self) -> FurMedsResult<ImagePayload> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), size = bytes.len(), "Captured image from file");
        Ok(ImagePayload::new(mime_for(&self.path), bytes))
    }
}
