use crate::assets::store::MediaReady;
use crate::playback::clock::{FrameClock, TickHandle};

/// Scheduling state of a [`RenderLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoopState {
    /// No tick outstanding. Initial and resting state.
    #[default]
    Stopped,
    /// One tick chain outstanding.
    Running,
}

/// Time handed to each redraw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Preview playhead in seconds.
    pub playhead_s: f64,
    /// Refresh timestamp for animation ticks; `None` for redraws caused by edits or readiness.
    pub now_ms: Option<f64>,
}

/// Something the loop can redraw, usually a view's scene.
pub trait Redraw {
    /// Composite one frame.
    fn redraw(&mut self, tick: Tick);
}

/// Render Loop Controller for one view.
///
/// While running, every refresh redraws and schedules the next refresh, so at most one tick is
/// ever outstanding. While stopped, edits and media readiness each cause exactly one redraw.
pub struct RenderLoop<C: FrameClock> {
    clock: C,
    state: LoopState,
    pending: Option<TickHandle>,
    origin_ms: Option<f64>,
    playhead_s: f64,
    duration_s: Option<f64>,
}

impl<C: FrameClock> RenderLoop<C> {
    /// Stopped loop scheduling through `clock`.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Stopped,
            pending: None,
            origin_ms: None,
            playhead_s: 0.0,
            duration_s: None,
        }
    }

    /// Stop playback and rewind once the playhead passes `duration_s`.
    pub fn with_duration(mut self, duration_s: f64) -> Self {
        self.set_duration(Some(duration_s));
        self
    }

    /// Set or clear the preview length. Non-positive or non-finite lengths clear it.
    pub fn set_duration(&mut self, duration_s: Option<f64>) {
        self.duration_s = duration_s.filter(|d| d.is_finite() && *d > 0.0);
    }

    /// Current state.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether a tick chain is running.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Playhead in seconds.
    pub fn playhead_s(&self) -> f64 {
        self.playhead_s
    }

    /// Preview length, if any.
    pub fn duration_s(&self) -> Option<f64> {
        self.duration_s
    }

    /// Scheduler access, for hosts that drive the clock themselves.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable scheduler access.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Begin continuous redraws. No-op while already running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            tracing::trace!("render loop already running");
            return;
        }
        self.state = LoopState::Running;
        self.origin_ms = None;
        self.pending = Some(self.clock.request_frame());
        tracing::debug!(playhead_s = self.playhead_s, "render loop started");
    }

    /// Cancel the outstanding tick. No draws happen until [`RenderLoop::start`] or a single
    /// redraw request.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel_frame(handle);
        }
        if self.state == LoopState::Running {
            tracing::debug!(playhead_s = self.playhead_s, "render loop stopped");
        }
        self.state = LoopState::Stopped;
        self.origin_ms = None;
    }

    /// Handle one fired callback. Returns whether a redraw happened.
    ///
    /// Callbacks that are not the outstanding tick (canceled, stale or foreign) do nothing.
    pub fn on_frame(&mut self, handle: TickHandle, now_ms: f64, target: &mut impl Redraw) -> bool {
        if self.state != LoopState::Running || self.pending != Some(handle) {
            tracing::trace!(?handle, "ignoring stale tick");
            return false;
        }
        self.pending = None;

        let origin = *self
            .origin_ms
            .get_or_insert(now_ms - self.playhead_s * 1000.0);
        self.playhead_s = ((now_ms - origin) / 1000.0).max(0.0);

        if let Some(duration) = self.duration_s
            && self.playhead_s > duration
        {
            self.stop();
            self.playhead_s = 0.0;
            target.redraw(Tick {
                playhead_s: 0.0,
                now_ms: None,
            });
            tracing::debug!(duration, "preview reached its end");
            return true;
        }

        target.redraw(Tick {
            playhead_s: self.playhead_s,
            now_ms: Some(now_ms),
        });
        self.pending = Some(self.clock.request_frame());
        true
    }

    /// Run one clock refresh and dispatch whatever came due. Returns the number of redraws.
    pub fn pump(&mut self, target: &mut impl Redraw) -> usize {
        let due = self.clock.due_frames();
        due.into_iter()
            .filter(|(handle, now_ms)| self.on_frame(*handle, *now_ms, target))
            .count()
    }

    /// Scene changed. Redraws once when stopped; a running loop picks it up on its next tick.
    pub fn invalidate(&mut self, target: &mut impl Redraw) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        target.redraw(Tick {
            playhead_s: self.playhead_s,
            now_ms: None,
        });
        true
    }

    /// One redraw per readiness transition while stopped. Returns the number of redraws.
    pub fn media_ready(&mut self, events: &[MediaReady], target: &mut impl Redraw) -> usize {
        events
            .iter()
            .filter(|ev| {
                tracing::trace!(source = %ev.source, kind = ?ev.kind, "media ready");
                self.invalidate(target)
            })
            .count()
    }

    /// Move the playhead, clamped to `[0, duration]`. Redraws once when stopped.
    pub fn seek(&mut self, playhead_s: f64, target: &mut impl Redraw) {
        let upper = self.duration_s.unwrap_or(f64::INFINITY);
        self.playhead_s = if playhead_s.is_finite() {
            playhead_s.clamp(0.0, upper)
        } else {
            0.0
        };
        self.origin_ms = None;
        self.invalidate(target);
    }
}

impl<C: FrameClock> Drop for RenderLoop<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.clock.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/render_loop.rs"]
mod tests;
