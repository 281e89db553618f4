use std::path::Path;

use crate::assets::store::MediaStore;
use crate::foundation::core::Canvas;
use crate::foundation::error::LayercastResult;
use crate::playback::clock::FrameClock;
use crate::playback::render_loop::{Redraw, RenderLoop, Tick};
use crate::render::compositor::{FrameStats, render};
use crate::render::cpu::CpuSurface;
use crate::render::surface::Surface;
use crate::scene::edit::LayerList;
use crate::scene::model::Layer;
use crate::scene::order::render_order;

/// Everything one view composites: its layers, its own media handles and its surface.
///
/// Views never share a `SceneState`, so handles are never shared across views.
pub struct SceneState<S: Surface> {
    layers: LayerList,
    media: MediaStore,
    surface: S,
    last_stats: FrameStats,
    redraws: u64,
    timeline: bool,
}

impl<S: Surface> SceneState<S> {
    /// Empty scene drawing into `surface`.
    pub fn new(surface: S, media: MediaStore) -> Self {
        Self {
            layers: LayerList::new(),
            media,
            surface,
            last_stats: FrameStats::default(),
            redraws: 0,
            timeline: false,
        }
    }

    /// Gate layers by their time windows. Off by default: every layer is always active.
    pub fn set_timeline(&mut self, enabled: bool) {
        self.timeline = enabled;
    }

    /// Whether time windows gate drawing and picking.
    pub fn timeline(&self) -> bool {
        self.timeline
    }

    /// Playhead to gate layers with, `None` when windows are ignored.
    pub(crate) fn gate_playhead(&self, playhead_s: f64) -> Option<f64> {
        self.timeline.then_some(playhead_s)
    }

    /// Surface resolution.
    pub fn canvas(&self) -> Canvas {
        self.surface.canvas()
    }

    /// Layers in authored order.
    pub fn layers(&self) -> &[Layer] {
        self.layers.layers()
    }

    /// Editable layer list. Call [`SceneState::sync_media`] after changing media references.
    pub fn layer_list_mut(&mut self) -> &mut LayerList {
        &mut self.layers
    }

    /// Replace every layer and request their media.
    pub fn set_layers(&mut self, layers: Vec<Layer>) {
        self.layers = LayerList::from_layers(layers);
        self.sync_media();
    }

    /// Request media for the current layers and release orphaned video handles.
    pub fn sync_media(&mut self) {
        self.media.sync_layers(self.layers.layers());
    }

    /// This view's media store.
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Mutable media store.
    pub fn media_mut(&mut self) -> &mut MediaStore {
        &mut self.media
    }

    /// Drawing target.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Stats of the latest composite.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Number of composites so far.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    /// Layers in the order they are drawn, bottom first.
    pub fn draw_order(&self) -> Vec<&Layer> {
        render_order(self.layers.layers())
    }

    /// Split borrow for drag handling.
    pub(crate) fn drag_parts(&mut self) -> (&mut [Layer], Canvas, &MediaStore) {
        let canvas = self.surface.canvas();
        (self.layers.layers_mut(), canvas, &self.media)
    }
}

impl<S: Surface> Redraw for SceneState<S> {
    fn redraw(&mut self, tick: Tick) {
        if let Some(now_ms) = tick.now_ms {
            self.media.advance_videos(now_ms / 1000.0);
        }
        let playhead = self.gate_playhead(tick.playhead_s);
        self.last_stats = render(&mut self.surface, self.layers.layers(), &self.media, playhead);
        self.redraws += 1;
    }
}

impl SceneState<CpuSurface> {
    /// Write the last composited frame as a PNG still.
    pub fn export_png(&self, path: &Path) -> LayercastResult<()> {
        self.surface.snapshot().write_png(path)
    }
}

/// A scene plus the loop that redraws it.
pub struct Stage<S: Surface, C: FrameClock> {
    pub(crate) scene: SceneState<S>,
    pub(crate) render_loop: RenderLoop<C>,
}

impl<S: Surface, C: FrameClock> Stage<S, C> {
    /// Stopped stage.
    pub fn new(scene: SceneState<S>, clock: C) -> Self {
        Self {
            scene,
            render_loop: RenderLoop::new(clock),
        }
    }

    /// The composited scene.
    pub fn scene(&self) -> &SceneState<S> {
        &self.scene
    }

    /// Mutable scene access, e.g. to wait for media.
    pub fn scene_mut(&mut self) -> &mut SceneState<S> {
        &mut self.scene
    }

    /// The loop controller.
    pub fn render_loop(&self) -> &RenderLoop<C> {
        &self.render_loop
    }

    /// Mutable loop access (durations, clock).
    pub fn render_loop_mut(&mut self) -> &mut RenderLoop<C> {
        &mut self.render_loop
    }

    /// Start continuous playback; videos resume.
    pub fn play(&mut self) {
        self.scene.media.set_videos_playing(true);
        self.render_loop.start();
    }

    /// Stop playback; videos freeze and the current state is drawn once.
    pub fn pause(&mut self) {
        self.render_loop.stop();
        self.scene.media.set_videos_playing(false);
        self.render_loop.invalidate(&mut self.scene);
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Move the preview playhead.
    pub fn seek(&mut self, playhead_s: f64) {
        self.render_loop.seek(playhead_s, &mut self.scene);
    }

    /// Scene changed outside the loop.
    pub fn invalidate(&mut self) -> bool {
        self.render_loop.invalidate(&mut self.scene)
    }

    /// Apply finished media loads, then run one clock refresh. Returns redraws performed.
    pub fn pump(&mut self) -> usize {
        let ready = self.scene.media.poll_ready();
        let on_ready = self.render_loop.media_ready(&ready, &mut self.scene);
        on_ready + self.render_loop.pump(&mut self.scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/stage.rs"]
mod tests;
