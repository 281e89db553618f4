use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::foundation::error::{LayercastError, LayercastResult};

/// Decoded video frames at a fixed rate, played back in a loop.
#[derive(Clone, Debug)]
pub struct VideoClip {
    fps: f64,
    frames: Vec<PreparedImage>,
}

impl VideoClip {
    /// Clip over `frames` at `fps`. Needs at least one frame and a positive rate.
    pub fn new(fps: f64, frames: Vec<PreparedImage>) -> LayercastResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(LayercastError::media("video fps must be finite and > 0"));
        }
        if frames.is_empty() {
            return Err(LayercastError::media("video clip has no frames"));
        }
        Ok(Self { fps, frames })
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Number of decoded frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Loop length in seconds.
    pub fn duration_s(&self) -> f64 {
        self.frames.len() as f64 / self.fps
    }

    /// Frame shown at `t` seconds, wrapping around the loop.
    pub fn frame_at(&self, t: f64) -> &PreparedImage {
        let idx = (t.max(0.0) * self.fps).floor() as usize % self.frames.len();
        &self.frames[idx]
    }
}

/// How much of a handle's media is available, mirroring media-element ready states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Nothing loaded (or the handle was destroyed).
    HaveNothing,
    /// Dimensions/rate known, no frame yet.
    HaveMetadata,
    /// The current frame can be presented.
    HaveCurrentData,
    /// The whole loop is buffered.
    HaveEnoughData,
}

/// Live playback handle bound to exactly one layer.
///
/// Handles autoplay muted and loop. Position only moves while playing, driven by
/// [`VideoHandle::advance`].
#[derive(Debug)]
pub struct VideoHandle {
    source: Option<String>,
    clip: Option<Arc<VideoClip>>,
    playing: bool,
    muted: bool,
    position_s: f64,
    last_tick_s: Option<f64>,
}

impl VideoHandle {
    /// Handle for `source` with a finished clip, already playing.
    pub fn new(source: impl Into<String>, clip: Arc<VideoClip>) -> Self {
        Self {
            source: Some(source.into()),
            clip: Some(clip),
            playing: true,
            muted: true,
            position_s: 0.0,
            last_tick_s: None,
        }
    }

    /// Bound source, `None` once destroyed.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Current ready state.
    pub fn ready_state(&self) -> ReadyState {
        match (&self.source, &self.clip) {
            (Some(_), Some(_)) => ReadyState::HaveEnoughData,
            (Some(_), None) => ReadyState::HaveMetadata,
            _ => ReadyState::HaveNothing,
        }
    }

    /// Enough data buffered to present a frame.
    pub fn can_present(&self) -> bool {
        self.ready_state() >= ReadyState::HaveCurrentData
    }

    /// Whether playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Audio stays muted; handles are visual only.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Current position within the loop, in seconds.
    pub fn position_s(&self) -> f64 {
        self.position_s
    }

    /// Resume playback. The next [`VideoHandle::advance`] re-anchors the clock.
    pub fn play(&mut self) {
        if self.source.is_some() {
            self.playing = true;
            self.last_tick_s = None;
        }
    }

    /// Freeze on the current frame.
    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick_s = None;
    }

    /// Move the playhead by the wall time elapsed since the previous call.
    pub fn advance(&mut self, now_s: f64) {
        if !self.playing {
            return;
        }
        let Some(clip) = &self.clip else {
            return;
        };
        if let Some(prev) = self.last_tick_s {
            let dt = (now_s - prev).max(0.0);
            self.position_s = (self.position_s + dt) % clip.duration_s();
        }
        self.last_tick_s = Some(now_s);
    }

    /// Frame at the current position, if presentable.
    pub fn current_frame(&self) -> Option<&PreparedImage> {
        if !self.can_present() {
            return None;
        }
        self.clip.as_ref().map(|c| c.frame_at(self.position_s))
    }

    /// Pause, clear the source and drop decoded frames.
    pub fn destroy(&mut self) {
        self.pause();
        self.source = None;
        self.clip = None;
        self.position_s = 0.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/video.rs"]
mod tests;
