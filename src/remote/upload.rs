use std::path::Path;

use reqwest::blocking::multipart;

use crate::foundation::error::{LayercastError, LayercastResult};
use crate::scene::model::Media;

/// Body returned by the upload service.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct UploadResponse {
    /// Whether the file was stored.
    pub success: bool,
    /// Stored reference; some deployments call it `filename`.
    #[serde(default, alias = "filename")]
    pub path: Option<String>,
    /// Failure reason when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResponse {
    /// Parse a response body.
    pub fn parse(body: &[u8]) -> LayercastResult<Self> {
        serde_json::from_slice(body)
            .map_err(|e| LayercastError::upload(format!("malformed upload response: {e}")))
    }

    /// Stored reference on success, the service's reason otherwise.
    pub fn into_reference(self) -> LayercastResult<String> {
        match (self.success, self.path) {
            (true, Some(path)) if !path.is_empty() => Ok(path),
            (true, _) => Err(LayercastError::upload(
                "upload succeeded but returned no path",
            )),
            (false, _) => Err(LayercastError::upload(
                self.error
                    .unwrap_or_else(|| "upload rejected without a reason".to_string()),
            )),
        }
    }
}

/// Content type declared for a local file, from its extension.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let ct = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        _ => return None,
    };
    Some(ct)
}

/// Multipart client for `<api_base>/api/upload`.
///
/// No retries: a failed upload is reported once and the layer keeps no media.
#[derive(Clone, Debug)]
pub struct UploadClient {
    api_base: String,
    client: reqwest::blocking::Client,
}

impl UploadClient {
    /// Client for the service at `api_base`.
    pub fn new(api_base: impl Into<String>) -> LayercastResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("layercast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LayercastError::upload(format!("failed to build http client: {e}")))?;
        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Service base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Upload `path` and return its media, tagged from the declared content type.
    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    pub fn upload_file(&self, path: &Path) -> LayercastResult<Media> {
        let content_type = content_type_for_path(path).ok_or_else(|| {
            LayercastError::upload(format!(
                "unsupported file type '{}'",
                path.display()
            ))
        })?;
        let bytes = std::fs::read(path).map_err(|e| {
            LayercastError::upload(format!("failed to read '{}': {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(|e| LayercastError::upload(format!("invalid content type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let result = self
            .client
            .post(format!("{}/api/upload", self.api_base))
            .multipart(form)
            .send()
            .and_then(|r| r.bytes());
        let body = match result {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, "upload request failed");
                return Err(LayercastError::upload(format!("upload request failed: {e}")));
            }
        };

        let reference = UploadResponse::parse(&body)
            .and_then(UploadResponse::into_reference)
            .inspect_err(|e| tracing::warn!(error = %e, "upload rejected"))?;
        tracing::info!(reference = %reference, "upload stored");
        Media::from_content_type(content_type, reference)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/upload.rs"]
mod tests;
