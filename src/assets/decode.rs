use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{LayercastError, LayercastResult};

/// Decoded picture, ready to draw: premultiplied RGBA8 held as a `vello_cpu` pixmap.
///
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Clone)]
pub struct PreparedImage {
    width: u32,
    height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for PreparedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl PreparedImage {
    /// Wrap tightly packed, row-major premultiplied RGBA8 bytes.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: &[u8]) -> LayercastResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| LayercastError::media("image width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| LayercastError::media("image height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(LayercastError::media("image has zero size"));
        }
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(LayercastError::media("image byte length mismatch"));
        }

        let mut may_have_opacities = false;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for px in rgba8_premul.chunks_exact(4) {
            let a = px[3];
            may_have_opacities |= a != 255;
            pixels.push(vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a,
            });
        }

        Ok(Self {
            width,
            height,
            pixmap: Arc::new(vello_cpu::Pixmap::from_parts_with_opacity(
                pixels,
                w,
                h,
                may_have_opacities,
            )),
        })
    }

    /// Wrap straight-alpha RGBA8 bytes, premultiplying them first.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> LayercastResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, &rgba8)
    }

    /// Solid-colour image; handy for placeholders and tests.
    pub fn solid(width: u32, height: u32, straight_rgba: [u8; 4]) -> LayercastResult<Self> {
        let px = width as usize * height as usize;
        Self::from_straight_rgba8(width, height, straight_rgba.repeat(px))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn premul_bytes(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub(crate) fn pixmap(&self) -> &Arc<vello_cpu::Pixmap> {
        &self.pixmap
    }
}

/// Decode PNG/JPEG/GIF/WebP/... bytes into a [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> LayercastResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
