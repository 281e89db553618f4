use std::path::PathBuf;

use crate::foundation::core::Canvas;

/// Runtime knobs shared by the library and the CLI.
///
/// Every field has a default; [`LayercastConfig::from_env`] overlays `LAYERCAST_*` variables.
#[derive(Clone, Debug, PartialEq)]
pub struct LayercastConfig {
    /// Base URL of the upload service, also used to resolve `/uploads/...` references.
    pub api_base: String,
    /// Location of the single persisted template slot.
    pub template_path: PathBuf,
    /// Media loader pool size. `None` lets rayon choose.
    pub loader_threads: Option<usize>,
    /// Upper bound on decoded frames kept per video clip.
    pub video_max_frames: u32,
    /// Longest edge, in pixels, of decoded video frames. Larger sources are scaled down.
    pub video_max_edge: u32,
    /// Resolution used for new templates.
    pub resolution: Canvas,
}

impl Default for LayercastConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080".to_string(),
            template_path: PathBuf::from("layercast-template.json"),
            loader_threads: None,
            video_max_frames: 90,
            video_max_edge: 1280,
            resolution: Canvas::default(),
        }
    }
}

impl LayercastConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unparseable or zero values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(v) = lookup("LAYERCAST_API_BASE").filter(|v| !v.trim().is_empty()) {
            cfg.api_base = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("LAYERCAST_TEMPLATE_PATH").filter(|v| !v.trim().is_empty()) {
            cfg.template_path = PathBuf::from(v);
        }
        cfg.loader_threads = lookup("LAYERCAST_LOADER_THREADS")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .or(cfg.loader_threads);
        if let Some(n) = lookup("LAYERCAST_VIDEO_MAX_FRAMES")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            cfg.video_max_frames = n;
        }
        if let Some(n) = lookup("LAYERCAST_VIDEO_MAX_EDGE")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            cfg.video_max_edge = n;
        }
        cfg
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
