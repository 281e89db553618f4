use crate::foundation::core::{Canvas, LayerId, Point};
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::interaction::drag::{DragController, DragEvent};
use crate::interaction::pointer::{PointerInput, SurfaceViewport, TouchPhase, touch_input};
use crate::playback::clock::FrameClock;
use crate::render::compositor::has_pixels;
use crate::render::surface::Surface;
use crate::scene::model::Layer;
use crate::scene::repository::TemplateRepository;
use crate::session::stage::{SceneState, Stage};

/// Read the template slot, treating a broken slot like an empty one.
pub(crate) fn load_template_or_empty(
    repo: &dyn TemplateRepository,
) -> (Vec<Layer>, Option<Canvas>) {
    match repo.load() {
        Ok(Some(t)) => (t.layers, Some(t.resolution)),
        Ok(None) => {
            tracing::info!("no saved template");
            (Vec::new(), None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "template unreadable, starting empty");
            (Vec::new(), None)
        }
    }
}

/// End-user view: pick from the template's selectable layers and drag them around.
pub struct UserView<S: Surface, C: FrameClock> {
    stage: Stage<S, C>,
    options: Vec<Layer>,
    drag: DragController,
    viewport: SurfaceViewport,
}

impl<S: Surface, C: FrameClock> UserView<S, C> {
    /// Read the template once and offer its selectable layers.
    ///
    /// `make_scene` receives the template resolution (or the default canvas when there is no
    /// template). A missing or unreadable template yields no options.
    pub fn load(
        repo: &dyn TemplateRepository,
        make_scene: impl FnOnce(Canvas) -> LayercastResult<SceneState<S>>,
        clock: C,
    ) -> LayercastResult<Self> {
        let (layers, resolution) = load_template_or_empty(repo);
        let options: Vec<Layer> = layers.into_iter().filter(|l| l.user_selectable).collect();
        let scene = make_scene(resolution.unwrap_or_default())?;
        let viewport = SurfaceViewport::unscaled(scene.canvas());
        tracing::debug!(options = options.len(), "user view loaded");
        let mut stage = Stage::new(scene, clock);
        stage.invalidate();
        Ok(Self {
            stage,
            options,
            drag: DragController::new(),
            viewport,
        })
    }

    /// Layers the user may choose from, in template order.
    pub fn available_options(&self) -> &[Layer] {
        &self.options
    }

    /// The user's own scene, in template order.
    pub fn selected(&self) -> &[Layer] {
        self.stage.scene.layers()
    }

    /// Whether option `id` is in the user's scene.
    pub fn is_selected(&self, id: LayerId) -> bool {
        self.selected().iter().any(|l| l.id == id)
    }

    /// Add or remove option `id`. Returns whether it is selected afterwards.
    ///
    /// Layers already in the scene keep their dragged positions.
    pub fn toggle_option(&mut self, id: LayerId) -> LayercastResult<bool> {
        if !self.options.iter().any(|o| o.id == id) {
            return Err(LayercastError::validation(format!(
                "{id} is not a selectable option"
            )));
        }
        let now_selected = !self.is_selected(id);
        let current = self.selected();
        let next: Vec<Layer> = self
            .options
            .iter()
            .filter_map(|o| {
                if o.id == id {
                    now_selected.then(|| o.clone())
                } else {
                    current.iter().find(|l| l.id == o.id).cloned()
                }
            })
            .collect();
        if !now_selected && self.drag.active_layer() == Some(id) {
            self.drag.release();
        }
        self.stage.scene.set_layers(next);
        self.stage.invalidate();
        Ok(now_selected)
    }

    /// Where the surface is displayed on the page.
    pub fn set_viewport(&mut self, viewport: SurfaceViewport) {
        self.viewport = viewport;
    }

    /// Feed a pointer event already in surface pixels.
    pub fn handle_pointer(&mut self, input: PointerInput) -> DragEvent {
        let playhead = self
            .stage
            .scene
            .gate_playhead(self.stage.render_loop.playhead_s());
        let (layers, canvas, media) = self.stage.scene.drag_parts();
        let event = match input {
            PointerInput::Down(p) => self.drag.pointer_down_where(
                layers,
                canvas,
                p,
                playhead,
                |l| has_pixels(l, media),
            ),
            other => self.drag.handle(other, layers, canvas, playhead),
        };
        if event.changed_scene() {
            self.stage.invalidate();
        }
        event
    }

    /// Feed a mouse event in page coordinates.
    pub fn handle_page_pointer(&mut self, input: PointerInput) -> DragEvent {
        let canvas = self.stage.scene.canvas();
        let to_surface = |p: Point| self.viewport.to_surface_point(canvas, p);
        let input = match input {
            PointerInput::Down(p) => PointerInput::Down(to_surface(p)),
            PointerInput::Move(p) => PointerInput::Move(to_surface(p)),
            other => other,
        };
        self.handle_pointer(input)
    }

    /// Feed a touch event in page coordinates; only the first touch point counts.
    pub fn handle_touch(&mut self, phase: TouchPhase, touches: &[Point]) -> DragEvent {
        let canvas = self.stage.scene.canvas();
        match touch_input(phase, touches, &self.viewport, canvas) {
            Some(input) => self.handle_pointer(input),
            None => DragEvent::Idle,
        }
    }

    /// Current drag target.
    pub fn dragging(&self) -> Option<LayerId> {
        self.drag.active_layer()
    }

    /// Scene and loop.
    pub fn stage(&self) -> &Stage<S, C> {
        &self.stage
    }

    /// Mutable scene and loop.
    pub fn stage_mut(&mut self) -> &mut Stage<S, C> {
        &mut self.stage
    }

    /// Start continuous playback.
    pub fn play(&mut self) {
        self.stage.play();
    }

    /// Stop continuous playback.
    pub fn pause(&mut self) {
        self.stage.pause();
    }

    /// Drive readiness and the loop for one refresh.
    pub fn pump(&mut self) -> usize {
        self.stage.pump()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/user.rs"]
mod tests;
