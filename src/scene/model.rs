use crate::foundation::core::{Canvas, LayerId, Vec2};
use crate::foundation::error::{LayercastError, LayercastResult};

/// Semantic layer category. Only [`LayerType::Background`] affects ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    /// Always composited beneath every other layer.
    Background,
    /// Generic overlay content.
    Overlay,
    /// Still picture content.
    Image,
    /// Brand mark.
    Logo,
}

impl LayerType {
    /// Human-facing label used for generated layer names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::Overlay => "Overlay",
            Self::Image => "Image",
            Self::Logo => "Logo",
        }
    }
}

/// Which draw path a piece of media takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Decoded still picture.
    Image,
    /// Looping video clip.
    Video,
}

/// Resolved media reference, tagged once with its kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "src", rename_all = "lowercase")]
pub enum Media {
    /// Still image at the given URL or path.
    Image(String),
    /// Video at the given URL or path.
    Video(String),
}

const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "webm", "mov"];

impl Media {
    /// Kind of this media.
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image(_) => MediaKind::Image,
            Self::Video(_) => MediaKind::Video,
        }
    }

    /// Underlying URL or path.
    pub fn source(&self) -> &str {
        match self {
            Self::Image(s) | Self::Video(s) => s,
        }
    }

    /// Tag a reference using a declared MIME content type (`image/*` or `video/*`).
    pub fn from_content_type(content_type: &str, source: impl Into<String>) -> LayercastResult<Self> {
        let top = content_type
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match top.as_str() {
            "image" => Ok(Self::Image(source.into())),
            "video" => Ok(Self::Video(source.into())),
            _ => Err(LayercastError::media(format!(
                "unsupported content type '{content_type}'"
            ))),
        }
    }

    /// Tag a bare reference by its file extension (`.mp4`, `.webm`, `.mov` are video).
    ///
    /// Only for references that arrive without a declared content type.
    pub fn from_reference(source: impl Into<String>) -> Self {
        let source = source.into();
        if is_video_reference(&source) {
            Self::Video(source)
        } else {
            Self::Image(source)
        }
    }
}

/// Case-insensitive check of the reference's extension against the video set.
pub fn is_video_reference(source: &str) -> bool {
    let path = source.split(['?', '#']).next().unwrap_or(source);
    let Some((_, ext)) = path.rsplit_once('.') else {
        return false;
    };
    if ext.contains('/') {
        return false;
    }
    VIDEO_EXTENSIONS
        .iter()
        .any(|v| ext.eq_ignore_ascii_case(v))
}

/// Optional activity window on the preview timeline, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// First active instant.
    pub start_s: f64,
    /// Length of the window.
    pub duration_s: f64,
}

impl TimeWindow {
    /// Both ends inclusive.
    pub fn contains(self, t: f64) -> bool {
        t >= self.start_s && t <= self.start_s + self.duration_s
    }
}

fn default_unit() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// One positionable, transformable piece of visual content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Stable identity.
    pub id: LayerId,
    /// Semantic category.
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    /// User-facing label.
    pub name: String,
    /// Resolved media; `None` until something is uploaded.
    #[serde(default)]
    pub media: Option<Media>,
    /// Global alpha for this layer's draw, in `[0, 1]`.
    #[serde(default = "default_unit")]
    pub opacity: f64,
    /// Uniform scale applied to the canvas size, `> 0`.
    #[serde(default = "default_unit")]
    pub scale: f64,
    /// Offset from the centered placement, in canvas pixels.
    #[serde(default)]
    pub position: Vec2,
    /// Invisible layers are skipped entirely.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether end users may pick this layer.
    #[serde(default)]
    pub user_selectable: bool,
    /// Preview activity window; absent means always active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

impl Layer {
    /// Layer with default transform and no media.
    pub fn new(id: LayerId, layer_type: LayerType, name: impl Into<String>) -> Self {
        Self {
            id,
            layer_type,
            name: name.into(),
            media: None,
            opacity: 1.0,
            scale: 1.0,
            position: Vec2::ZERO,
            visible: true,
            user_selectable: false,
            window: None,
        }
    }

    /// Builder-style media setter.
    pub fn with_media(mut self, media: Media) -> Self {
        self.media = Some(media);
        self
    }

    /// Whether media has been resolved.
    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    /// Whether the layer is active at `playhead`. `None` means "no timeline": always active.
    pub fn is_active_at(&self, playhead: Option<f64>) -> bool {
        match (self.window, playhead) {
            (Some(w), Some(t)) => w.contains(t),
            _ => true,
        }
    }

    /// Visible, has media, and active at `playhead`.
    pub fn is_drawable(&self, playhead: Option<f64>) -> bool {
        self.visible && self.has_media() && self.is_active_at(playhead)
    }

    /// Check transform ranges.
    pub fn validate(&self) -> LayercastResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(LayercastError::validation(format!(
                "{} opacity must be within [0, 1]",
                self.id
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(LayercastError::validation(format!(
                "{} scale must be finite and > 0",
                self.id
            )));
        }
        if !self.position.is_finite() {
            return Err(LayercastError::validation(format!(
                "{} position must be finite",
                self.id
            )));
        }
        if let Some(w) = self.window
            && (!w.start_s.is_finite()
                || !w.duration_s.is_finite()
                || w.start_s < 0.0
                || w.duration_s < 0.0)
        {
            return Err(LayercastError::validation(format!(
                "{} time window must be finite and non-negative",
                self.id
            )));
        }
        Ok(())
    }
}

/// Persisted snapshot of an arrangement.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Authored layers in list order.
    pub layers: Vec<Layer>,
    /// Output resolution shared by all views.
    #[serde(default)]
    pub resolution: Canvas,
}

impl Template {
    /// Template over `layers` at `resolution`.
    pub fn new(layers: Vec<Layer>, resolution: Canvas) -> Self {
        Self { layers, resolution }
    }

    /// Validate resolution, layer ranges and id uniqueness.
    pub fn validate(&self) -> LayercastResult<()> {
        self.resolution.validate()?;
        let mut seen = std::collections::HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.id) {
                return Err(LayercastError::validation(format!(
                    "duplicate layer id {}",
                    layer.id
                )));
            }
            layer.validate()?;
        }
        Ok(())
    }

    /// Layers end users may pick, in authored order.
    pub fn selectable_layers(&self) -> Vec<Layer> {
        self.layers
            .iter()
            .filter(|l| l.user_selectable)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
