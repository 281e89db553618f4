use crate::assets::decode::PreparedImage;
use crate::assets::store::MediaStore;
use crate::render::placement::layer_rect;
use crate::render::surface::{DrawImage, Surface};
use crate::scene::model::{Layer, Media, MediaKind};
use crate::scene::order::render_order;

/// What one composite pass did. Informational only; drawing is best-effort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Layers that produced a draw call.
    pub drawn: usize,
    /// Drawable layers whose media was not ready (pending or failed).
    pub waiting: usize,
}

/// Composite `layers` onto `surface`.
///
/// Clears the surface, then draws every drawable layer bottom-up in [`render_order`], each with
/// its own opacity. `playhead` gates time-windowed layers; `None` treats every layer as active.
/// Nothing here fails: a layer whose media is missing, still loading or broken is skipped.
pub fn render(
    surface: &mut dyn Surface,
    layers: &[Layer],
    media: &MediaStore,
    playhead: Option<f64>,
) -> FrameStats {
    let canvas = surface.canvas();
    let mut stats = FrameStats::default();
    surface.begin_frame();

    for layer in render_order(layers) {
        if !layer.is_drawable(playhead) {
            continue;
        }
        let Some((kind, image)) = resolve_pixels(layer, media) else {
            stats.waiting += 1;
            continue;
        };
        let cmd = DrawImage {
            layer: layer.id,
            kind,
            image,
            dest: layer_rect(canvas, layer),
            opacity: layer.opacity.clamp(0.0, 1.0) as f32,
        };
        match surface.draw_image(cmd) {
            Ok(()) => stats.drawn += 1,
            Err(e) => tracing::warn!(layer = %layer.id, error = %e, "layer draw failed"),
        }
    }

    if let Err(e) = surface.end_frame() {
        tracing::warn!(error = %e, "frame presentation failed");
    }
    tracing::trace!(drawn = stats.drawn, waiting = stats.waiting, "frame composited");
    stats
}

/// Whether `layer` currently has pixels to present.
pub(crate) fn has_pixels(layer: &Layer, media: &MediaStore) -> bool {
    resolve_pixels(layer, media).is_some()
}

/// Pick the draw path: a presentable video handle first, then a decoded still.
fn resolve_pixels<'a>(
    layer: &Layer,
    media: &'a MediaStore,
) -> Option<(MediaKind, &'a PreparedImage)> {
    let src = match layer.media.as_ref()? {
        Media::Video(src) => {
            if let Some(frame) = media
                .video(layer.id)
                .filter(|h| h.can_present())
                .and_then(|h| h.current_frame())
            {
                return Some((MediaKind::Video, frame));
            }
            src
        }
        Media::Image(src) => src,
    };
    media.image(src).map(|img| (MediaKind::Image, img))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
