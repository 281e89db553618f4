use std::collections::HashMap;
use std::sync::RwLock;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::assets::media::decode_video_clip;
use crate::assets::video::VideoClip;
use crate::foundation::config::LayercastConfig;
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::remote::url::{is_remote, resolve_url};

/// Loads media references into drawable resources.
///
/// Called from loader threads; implementations block.
pub trait MediaSource: Send + Sync {
    /// Fetch and decode a still image.
    fn load_image(&self, reference: &str) -> LayercastResult<PreparedImage>;
    /// Fetch and decode a looping video clip.
    fn load_video(&self, reference: &str) -> LayercastResult<VideoClip>;
}

/// Default source: HTTP(S) through reqwest, everything else from the filesystem.
#[derive(Clone, Debug)]
pub struct NetworkMediaSource {
    api_base: String,
    video_max_frames: u32,
    video_max_edge: u32,
    client: reqwest::blocking::Client,
}

impl NetworkMediaSource {
    /// Source resolving `/uploads/...` against `cfg.api_base`.
    pub fn new(cfg: &LayercastConfig) -> LayercastResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("layercast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LayercastError::media(format!("failed to build http client: {e}")))?;
        Ok(Self {
            api_base: cfg.api_base.clone(),
            video_max_frames: cfg.video_max_frames,
            video_max_edge: cfg.video_max_edge,
            client,
        })
    }

    fn read_bytes(&self, url: &str) -> LayercastResult<Vec<u8>> {
        if is_remote(url) {
            let resp = self
                .client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| LayercastError::media(format!("failed to fetch '{url}': {e}")))?;
            let bytes = resp
                .bytes()
                .map_err(|e| LayercastError::media(format!("failed to read '{url}': {e}")))?;
            return Ok(bytes.to_vec());
        }
        std::fs::read(url).map_err(|e| LayercastError::media(format!("failed to read '{url}': {e}")))
    }
}

impl MediaSource for NetworkMediaSource {
    fn load_image(&self, reference: &str) -> LayercastResult<PreparedImage> {
        let url = resolve_url(&self.api_base, reference);
        let bytes = self.read_bytes(&url)?;
        decode_image(&bytes)
    }

    fn load_video(&self, reference: &str) -> LayercastResult<VideoClip> {
        let url = resolve_url(&self.api_base, reference);
        decode_video_clip(&url, self.video_max_frames, self.video_max_edge)
    }
}

/// In-process source serving pre-decoded media by reference.
///
/// Unknown references fail like a broken download would.
#[derive(Debug, Default)]
pub struct MemoryMediaSource {
    images: RwLock<HashMap<String, PreparedImage>>,
    videos: RwLock<HashMap<String, VideoClip>>,
}

impl MemoryMediaSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `image` for `reference`.
    pub fn insert_image(&self, reference: impl Into<String>, image: PreparedImage) {
        if let Ok(mut images) = self.images.write() {
            images.insert(reference.into(), image);
        }
    }

    /// Serve `clip` for `reference`.
    pub fn insert_video(&self, reference: impl Into<String>, clip: VideoClip) {
        if let Ok(mut videos) = self.videos.write() {
            videos.insert(reference.into(), clip);
        }
    }
}

impl MediaSource for MemoryMediaSource {
    fn load_image(&self, reference: &str) -> LayercastResult<PreparedImage> {
        self.images
            .read()
            .ok()
            .and_then(|m| m.get(reference).cloned())
            .ok_or_else(|| LayercastError::media(format!("unknown image '{reference}'")))
    }

    fn load_video(&self, reference: &str) -> LayercastResult<VideoClip> {
        self.videos
            .read()
            .ok()
            .and_then(|m| m.get(reference).cloned())
            .ok_or_else(|| LayercastError::media(format!("unknown video '{reference}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
