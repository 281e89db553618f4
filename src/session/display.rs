use crate::foundation::core::Canvas;
use crate::foundation::error::LayercastResult;
use crate::playback::clock::FrameClock;
use crate::render::surface::Surface;
use crate::scene::model::Layer;
use crate::scene::repository::TemplateRepository;
use crate::session::stage::{SceneState, Stage};
use crate::session::user::load_template_or_empty;

/// Full-screen presentation of the saved template. Plays from the moment it loads.
pub struct DisplayView<S: Surface, C: FrameClock> {
    stage: Stage<S, C>,
}

impl<S: Surface, C: FrameClock> DisplayView<S, C> {
    /// Read the template once, request its media and start the loop.
    ///
    /// A missing or unreadable template shows an empty scene.
    pub fn load(
        repo: &dyn TemplateRepository,
        make_scene: impl FnOnce(Canvas) -> LayercastResult<SceneState<S>>,
        clock: C,
    ) -> LayercastResult<Self> {
        let (layers, resolution) = load_template_or_empty(repo);
        let mut scene = make_scene(resolution.unwrap_or_default())?;
        tracing::debug!(layers = layers.len(), "display view loaded");
        scene.set_layers(layers);
        let mut stage = Stage::new(scene, clock);
        stage.play();
        Ok(Self { stage })
    }

    /// Template layers being shown.
    pub fn layers(&self) -> &[Layer] {
        self.stage.scene.layers()
    }

    /// Scene and loop.
    pub fn stage(&self) -> &Stage<S, C> {
        &self.stage
    }

    /// Mutable scene and loop.
    pub fn stage_mut(&mut self) -> &mut Stage<S, C> {
        &mut self.stage
    }

    /// Drive readiness and the loop for one refresh.
    pub fn pump(&mut self) -> usize {
        self.stage.pump()
    }

    /// Stop presenting.
    pub fn stop(&mut self) {
        self.stage.pause();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/display.rs"]
mod tests;
