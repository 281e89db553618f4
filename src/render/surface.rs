use std::path::Path;

use anyhow::Context as _;

use crate::assets::decode::{PreparedImage, unpremultiply_rgba8_in_place};
use crate::foundation::core::{Canvas, LayerId, Rect};
use crate::foundation::error::LayercastResult;
use crate::scene::model::MediaKind;

/// A composed frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Write the frame as a straight-alpha PNG.
    pub fn write_png(&self, path: &Path) -> LayercastResult<()> {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// One layer draw issued by the compositor.
#[derive(Clone, Copy, Debug)]
pub struct DrawImage<'a> {
    /// Layer the draw belongs to.
    pub layer: LayerId,
    /// Which path produced the pixels.
    pub kind: MediaKind,
    /// Pixels to draw, stretched over `dest`.
    pub image: &'a PreparedImage,
    /// Destination in surface pixels.
    pub dest: Rect,
    /// Global alpha for this draw only.
    pub opacity: f32,
}

/// Fixed-resolution drawable target.
///
/// A frame is `begin_frame` (clears), any number of `draw_image`, then `end_frame`.
/// Opacity is per draw call and must never leak into later draws.
pub trait Surface {
    /// Pixel resolution of the surface.
    fn canvas(&self) -> Canvas;
    /// Start a frame and clear to transparent.
    fn begin_frame(&mut self);
    /// Draw one layer's pixels.
    fn draw_image(&mut self, cmd: DrawImage<'_>) -> LayercastResult<()>;
    /// Finish the frame and make it visible.
    fn end_frame(&mut self) -> LayercastResult<()>;
}
