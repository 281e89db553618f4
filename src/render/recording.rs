use crate::foundation::core::{Canvas, LayerId, Rect};
use crate::foundation::error::LayercastResult;
use crate::render::surface::{DrawImage, Surface};
use crate::scene::model::MediaKind;

/// One observed draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// Layer the draw belongs to.
    pub layer: LayerId,
    /// Draw path taken.
    pub kind: MediaKind,
    /// Destination rectangle.
    pub dest: Rect,
    /// Global alpha applied to this draw.
    pub opacity: f32,
    /// Size of the pixels handed over.
    pub source_size: (u32, u32),
}

/// Surface that keeps every frame's draw calls instead of pixels.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    canvas: Canvas,
    current: Option<Vec<DrawRecord>>,
    /// Completed frames, oldest first.
    pub frames: Vec<Vec<DrawRecord>>,
}

impl RecordingSurface {
    /// Recorder at `canvas` resolution.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            current: None,
            frames: Vec::new(),
        }
    }

    /// Draws of the most recent completed frame.
    pub fn last_frame(&self) -> Option<&[DrawRecord]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Number of completed frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Draws for `layer` in the most recent frame.
    pub fn draws_for(&self, layer: LayerId) -> Vec<&DrawRecord> {
        self.last_frame()
            .unwrap_or_default()
            .iter()
            .filter(|d| d.layer == layer)
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn begin_frame(&mut self) {
        self.current = Some(Vec::new());
    }

    fn draw_image(&mut self, cmd: DrawImage<'_>) -> LayercastResult<()> {
        self.current.get_or_insert_with(Vec::new).push(DrawRecord {
            layer: cmd.layer,
            kind: cmd.kind,
            dest: cmd.dest,
            opacity: cmd.opacity,
            source_size: (cmd.image.width(), cmd.image.height()),
        });
        Ok(())
    }

    fn end_frame(&mut self) -> LayercastResult<()> {
        self.frames.push(self.current.take().unwrap_or_default());
        Ok(())
    }
}
