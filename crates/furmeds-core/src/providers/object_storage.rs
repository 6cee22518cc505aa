//! Cloud object storage for pet photos

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{error, info};

use super::camera::ImagePayload;
use crate::error::{FurMedsError, FurMedsResult};
use crate::session::SessionContext;

pub const FIREBASE_STORAGE_URL: &str = "https://firebasestorage.googleapis.com/v0";

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `payload` under `path` and return its public URL.
    async fn upload(&self, path: &str, payload: &ImagePayload) -> FurMedsResult<String>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    name: String,
    #[serde(default)]
    download_tokens: Option<String>,
}

/// Firebase Storage REST client
#[derive(Clone)]
pub struct FirebaseStorage {
    http: Client,
    endpoint: String,
    bucket: String,
    session: SessionContext,
}

impl FirebaseStorage {
    pub fn new(bucket: impl Into<String>, session: SessionContext) -> Self {
        Self::with_endpoint(FIREBASE_STORAGE_URL, bucket, session)
    }

    pub fn with_endpoint(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        session: SessionContext,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            session,
        }
    }

    fn objects_url(&self) -> FurMedsResult<Url> {
        let raw = format!("{}/b/{}/o", self.endpoint, self.bucket);
        Url::parse(&raw).map_err(|e| FurMedsError::Config(format!("invalid storage URL '{raw}': {e}")))
    }

    /// Public download URL of an object. The object name is a single
    /// path segment, so its `/` separators are percent-encoded.
    pub fn download_url(&self, name: &str, token: Option<&str>) -> FurMedsResult<String> {
        let mut url = self.objects_url()?;
        url.path_segments_mut()
            .map_err(|_| FurMedsError::Config("storage URL cannot be a base".to_string()))?
            .push(name);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("alt", "media");
            if let Some(token) = token {
                query.append_pair("token", token);
            }
        }
        Ok(url.into())
    }
}

#[async_trait]
impl ObjectStorage for FirebaseStorage {
    async fn upload(&self, path: &str, payload: &ImagePayload) -> FurMedsResult<String> {
        let mut url = self.objects_url()?;
        url.query_pairs_mut().append_pair("name", path);

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, payload.mime.as_str())
            .body(payload.bytes.clone());
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, path, "Object storage unreachable");
            FurMedsError::Upload(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, path, body = %body, "Upload rejected");
            return Err(FurMedsError::Upload(format!("status {status}: {body}")));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| FurMedsError::Upload(format!("invalid response: {e}")))?;

        let token = uploaded
            .download_tokens
            .as_deref()
            .and_then(|t| t.split(',').next());
        let public = self.download_url(&uploaded.name, token)?;
        info!(path, size = payload.bytes.len(), "Uploaded image");
        Ok(public)
    }
}
