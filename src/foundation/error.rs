/// Crate-wide result alias.
pub type LayercastResult<T> = Result<T, LayercastError>;

/// Errors surfaced by the layercast library.
///
/// The render path itself never returns these: a layer that cannot be drawn is skipped.
#[derive(thiserror::Error, Debug)]
pub enum LayercastError {
    /// Invalid layer/template/canvas values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Media fetch, decode or upload-format failure.
    #[error("media error: {0}")]
    Media(String),

    /// Upload service rejected or failed the transfer.
    #[error("upload error: {0}")]
    Upload(String),

    /// Template slot read/write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayercastError {
    /// Build a [`LayercastError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayercastError::Media`].
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`LayercastError::Upload`].
    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    /// Build a [`LayercastError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`LayercastError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for LayercastError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
