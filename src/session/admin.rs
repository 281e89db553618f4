use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::LayerId;
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::playback::clock::FrameClock;
use crate::remote::upload::UploadClient;
use crate::render::surface::Surface;
use crate::scene::edit::{LayerPatch, MoveDirection};
use crate::scene::model::{Layer, LayerType, Media, Template};
use crate::scene::repository::TemplateRepository;
use crate::session::stage::{SceneState, Stage};

/// Default length of the admin preview timeline.
pub const DEFAULT_PREVIEW_DURATION_S: f64 = 10.0;

/// Authoring view: edits layers, previews them and saves the template.
///
/// Every edit made while stopped is redrawn once; while playing the next tick shows it.
pub struct AdminView<S: Surface, C: FrameClock> {
    stage: Stage<S, C>,
    repo: Arc<dyn TemplateRepository>,
}

impl<S: Surface, C: FrameClock> AdminView<S, C> {
    /// Empty authoring scene with a [`DEFAULT_PREVIEW_DURATION_S`] preview.
    pub fn new(mut scene: SceneState<S>, clock: C, repo: Arc<dyn TemplateRepository>) -> Self {
        scene.set_timeline(true);
        let mut stage = Stage::new(scene, clock);
        stage
            .render_loop
            .set_duration(Some(DEFAULT_PREVIEW_DURATION_S));
        Self { stage, repo }
    }

    /// Continue editing the saved template, if there is one. Returns whether one was loaded.
    pub fn open_saved(&mut self) -> LayercastResult<bool> {
        let Some(template) = self.repo.load()? else {
            return Ok(false);
        };
        if template.resolution != self.stage.scene.canvas() {
            tracing::warn!(
                saved = ?template.resolution,
                surface = ?self.stage.scene.canvas(),
                "saved template resolution differs from the admin surface"
            );
        }
        self.stage.scene.set_layers(template.layers);
        self.stage.invalidate();
        Ok(true)
    }

    /// Scene and loop.
    pub fn stage(&self) -> &Stage<S, C> {
        &self.stage
    }

    /// Mutable scene and loop.
    pub fn stage_mut(&mut self) -> &mut Stage<S, C> {
        &mut self.stage
    }

    /// Authored layers.
    pub fn layers(&self) -> &[Layer] {
        self.stage.scene.layers()
    }

    /// Append a default layer.
    pub fn add_layer(&mut self, layer_type: LayerType) -> LayerId {
        let id = self.stage.scene.layer_list_mut().add(layer_type);
        tracing::debug!(%id, ?layer_type, "layer added");
        self.stage.invalidate();
        id
    }

    /// Remove a layer and destroy its video handle.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let removed = self.stage.scene.layer_list_mut().remove(id)?;
        self.stage.scene.media_mut().release(id);
        self.stage.scene.sync_media();
        self.stage.invalidate();
        Some(removed)
    }

    /// Swap a layer with its neighbour.
    pub fn move_layer(&mut self, id: LayerId, dir: MoveDirection) -> bool {
        let moved = self.stage.scene.layer_list_mut().move_layer(id, dir);
        if moved {
            self.stage.invalidate();
        }
        moved
    }

    /// Apply a validated partial update.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) -> LayercastResult<()> {
        self.stage.scene.layer_list_mut().update(id, patch)?;
        self.stage.invalidate();
        Ok(())
    }

    /// Point a layer at resolved media and start loading it.
    pub fn attach_media(&mut self, id: LayerId, media: Media) -> LayercastResult<()> {
        self.stage.scene.layer_list_mut().set_media(id, Some(media))?;
        self.stage.scene.sync_media();
        self.stage.invalidate();
        Ok(())
    }

    /// Upload `path` and attach the result. On failure the layer keeps its current media.
    pub fn upload_and_attach(
        &mut self,
        id: LayerId,
        path: &Path,
        client: &UploadClient,
    ) -> LayercastResult<Media> {
        if !self.layers().iter().any(|l| l.id == id) {
            return Err(LayercastError::validation(format!("unknown {id}")));
        }
        let media = client.upload_file(path)?;
        self.attach_media(id, media.clone())?;
        Ok(media)
    }

    /// Start the preview.
    pub fn play(&mut self) {
        self.stage.play();
    }

    /// Stop the preview.
    pub fn pause(&mut self) {
        self.stage.pause();
    }

    /// Flip between playing and paused.
    pub fn toggle_play(&mut self) {
        if self.stage.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the preview playhead.
    pub fn seek(&mut self, playhead_s: f64) {
        self.stage.seek(playhead_s);
    }

    /// Drive readiness and the loop for one refresh.
    pub fn pump(&mut self) -> usize {
        self.stage.pump()
    }

    /// Snapshot the current layers into the repository slot.
    #[tracing::instrument(skip(self), fields(layers = self.layers().len()))]
    pub fn save_template(&self) -> LayercastResult<Template> {
        let template = Template::new(self.layers().to_vec(), self.stage.scene.canvas());
        template.validate()?;
        self.repo.save(&template)?;
        tracing::info!("template saved");
        Ok(template)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/admin.rs"]
mod tests;
