use crate::foundation::core::{Canvas, LayerId, Point, Vec2};
use crate::interaction::pointer::PointerInput;
use crate::render::placement::layer_rect;
use crate::scene::model::Layer;
use crate::scene::order::render_order;

/// Topmost drawable layer whose placed rect contains `point`.
///
/// Uses the same placement and ordering as the compositor, so the pick matches what is on screen.
pub fn hit_test(
    layers: &[Layer],
    canvas: Canvas,
    point: Point,
    playhead: Option<f64>,
) -> Option<LayerId> {
    hit_test_where(layers, canvas, point, playhead, |_| true)
}

/// [`hit_test`] restricted to layers accepted by `pickable`, e.g. those with pixels on screen.
pub fn hit_test_where(
    layers: &[Layer],
    canvas: Canvas,
    point: Point,
    playhead: Option<f64>,
    pickable: impl Fn(&Layer) -> bool,
) -> Option<LayerId> {
    render_order(layers)
        .into_iter()
        .rev()
        .filter(|l| l.is_drawable(playhead) && pickable(l))
        .find(|l| layer_rect(canvas, l).contains(point))
        .map(|l| l.id)
}

/// Result of feeding one pointer event to a [`DragController`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
    /// Press picked a target.
    Picked(LayerId),
    /// Press hit nothing.
    Missed,
    /// The target moved to a new position.
    Moved(LayerId, Vec2),
    /// The active drag ended.
    Released(LayerId),
    /// Nothing to do.
    Idle,
}

impl DragEvent {
    /// Whether the event changed a layer's position.
    pub fn changed_scene(self) -> bool {
        matches!(self, Self::Moved(..))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveDrag {
    layer: LayerId,
    grab_offset: Vec2,
}

/// Drag-to-reposition state machine. At most one target at a time.
#[derive(Clone, Debug, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    /// Idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag target.
    pub fn active_layer(&self) -> Option<LayerId> {
        self.active.map(|a| a.layer)
    }

    /// Pick the topmost layer under `point`, replacing any active target.
    pub fn pointer_down(
        &mut self,
        layers: &[Layer],
        canvas: Canvas,
        point: Point,
        playhead: Option<f64>,
    ) -> DragEvent {
        self.pointer_down_where(layers, canvas, point, playhead, |_| true)
    }

    /// [`DragController::pointer_down`] considering only layers accepted by `pickable`.
    pub fn pointer_down_where(
        &mut self,
        layers: &[Layer],
        canvas: Canvas,
        point: Point,
        playhead: Option<f64>,
        pickable: impl Fn(&Layer) -> bool,
    ) -> DragEvent {
        self.active = hit_test_where(layers, canvas, point, playhead, pickable).and_then(|id| {
            let layer = layers.iter().find(|l| l.id == id)?;
            Some(ActiveDrag {
                layer: id,
                grab_offset: point.to_vec2() - layer.position,
            })
        });
        match self.active {
            Some(a) => {
                tracing::trace!(layer = %a.layer, "drag target picked");
                DragEvent::Picked(a.layer)
            }
            None => DragEvent::Missed,
        }
    }

    /// Move the target so the grab point stays under `point`.
    pub fn pointer_move(&mut self, layers: &mut [Layer], point: Point) -> DragEvent {
        let Some(active) = self.active else {
            return DragEvent::Idle;
        };
        let Some(layer) = layers.iter_mut().find(|l| l.id == active.layer) else {
            self.active = None;
            return DragEvent::Idle;
        };
        let position = point.to_vec2() - active.grab_offset;
        layer.position = position;
        DragEvent::Moved(active.layer, position)
    }

    /// End the drag (pointer-up or pointer-leave).
    pub fn release(&mut self) -> DragEvent {
        match self.active.take() {
            Some(a) => DragEvent::Released(a.layer),
            None => DragEvent::Idle,
        }
    }

    /// Dispatch one pointer event.
    pub fn handle(
        &mut self,
        input: PointerInput,
        layers: &mut [Layer],
        canvas: Canvas,
        playhead: Option<f64>,
    ) -> DragEvent {
        match input {
            PointerInput::Down(p) => self.pointer_down(layers, canvas, p, playhead),
            PointerInput::Move(p) => self.pointer_move(layers, p),
            PointerInput::Up | PointerInput::Leave => self.release(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interaction/drag.rs"]
mod tests;
