use crate::foundation::core::{Canvas, Point, Rect, Size, Vec2};
use crate::scene::model::Layer;

/// On-surface rectangle of a layer.
///
/// The layer is sized to `canvas * scale`, centered on the canvas, then offset by `position`.
/// Image and video content use the same placement.
pub fn placement_rect(canvas: Canvas, scale: f64, position: Vec2) -> Rect {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let width = cw * scale;
    let height = ch * scale;
    let x = cw / 2.0 - width / 2.0 + position.x;
    let y = ch / 2.0 - height / 2.0 + position.y;
    Rect::from_origin_size(Point::new(x, y), Size::new(width, height))
}

/// [`placement_rect`] for a layer's current transform.
pub fn layer_rect(canvas: Canvas, layer: &Layer) -> Rect {
    placement_rect(canvas, layer.scale, layer.position)
}

#[cfg(test)]
#[path = "../../tests/unit/render/placement.rs"]
mod tests;
