use crate::foundation::core::{Canvas, Point};

/// Where the surface sits on the page and how large it is displayed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceViewport {
    /// Page x of the surface's top-left corner.
    pub left: f64,
    /// Page y of the surface's top-left corner.
    pub top: f64,
    /// Displayed width in page units.
    pub displayed_width: f64,
    /// Displayed height in page units.
    pub displayed_height: f64,
}

impl SurfaceViewport {
    /// Surface shown at its pixel size at the page origin.
    pub fn unscaled(canvas: Canvas) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            displayed_width: f64::from(canvas.width),
            displayed_height: f64::from(canvas.height),
        }
    }

    /// Page coordinates to surface pixels.
    ///
    /// A degenerate displayed size maps with a ratio of 1 on that axis.
    pub fn to_surface_point(&self, canvas: Canvas, page: Point) -> Point {
        let sx = ratio(f64::from(canvas.width), self.displayed_width);
        let sy = ratio(f64::from(canvas.height), self.displayed_height);
        Point::new((page.x - self.left) * sx, (page.y - self.top) * sy)
    }
}

fn ratio(pixels: f64, displayed: f64) -> f64 {
    if displayed.is_finite() && displayed > 0.0 {
        pixels / displayed
    } else {
        1.0
    }
}

/// Pointer event in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerInput {
    /// Press at a point.
    Down(Point),
    /// Motion to a point.
    Move(Point),
    /// Release.
    Up,
    /// Pointer left the surface.
    Leave,
}

/// Touch lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// `touchstart`.
    Start,
    /// `touchmove`.
    Move,
    /// `touchend`.
    End,
    /// `touchcancel`.
    Cancel,
}

/// Map a page-space touch event onto the pointer model using its first touch point.
///
/// Start/move events without any touch point produce nothing.
pub fn touch_input(
    phase: TouchPhase,
    touches: &[Point],
    viewport: &SurfaceViewport,
    canvas: Canvas,
) -> Option<PointerInput> {
    let first = || touches.first().map(|p| viewport.to_surface_point(canvas, *p));
    match phase {
        TouchPhase::Start => first().map(PointerInput::Down),
        TouchPhase::Move => first().map(PointerInput::Move),
        TouchPhase::End => Some(PointerInput::Up),
        TouchPhase::Cancel => Some(PointerInput::Leave),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/pointer.rs"]
mod tests;
