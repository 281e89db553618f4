use std::sync::Arc;

use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::render::surface::{DrawImage, FrameRGBA, Surface};

/// CPU raster surface powered by `vello_cpu`.
///
/// Draws are recorded into a reusable render context during the frame and rasterized into the
/// backing pixmap by [`Surface::end_frame`].
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    clear_rgba: Option<[u8; 4]>,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    frames_presented: u64,
}

impl CpuSurface {
    /// Transparent surface at `canvas` resolution.
    pub fn new(canvas: Canvas) -> LayercastResult<Self> {
        canvas.validate()?;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| LayercastError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| LayercastError::validation("surface height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            clear_rgba: None,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            frames_presented: 0,
        })
    }

    /// Fill every frame with a straight-alpha RGBA8 colour before the layers.
    pub fn with_clear_color(mut self, rgba: [u8; 4]) -> Self {
        self.clear_rgba = Some(rgba);
        self
    }

    /// Copy of the last presented frame, premultiplied.
    pub fn snapshot(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    /// Number of completed frames.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn begin_frame(&mut self) {
        self.ctx.reset();
        if let Some([r, g, b, a]) = self.clear_rgba {
            self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            self.ctx
                .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(self.width),
                f64::from(self.height),
            ));
        }
    }

    fn draw_image(&mut self, cmd: DrawImage<'_>) -> LayercastResult<()> {
        let iw = f64::from(cmd.image.width());
        let ih = f64::from(cmd.image.height());
        if cmd.dest.width() <= 0.0 || cmd.dest.height() <= 0.0 {
            return Ok(());
        }

        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(cmd.image.pixmap())),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(dest_transform(cmd.dest, iw, ih));
        self.ctx.set_paint(paint);

        let opacity = cmd.opacity.clamp(0.0, 1.0);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity);
        }
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn end_frame(&mut self) -> LayercastResult<()> {
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.frames_presented += 1;
        Ok(())
    }
}

/// Map the image's own pixel space onto `dest`.
fn dest_transform(dest: Rect, image_w: f64, image_h: f64) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::translate((dest.x0, dest.y0))
        * vello_cpu::kurbo::Affine::scale_non_uniform(dest.width() / image_w, dest.height() / image_h)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
