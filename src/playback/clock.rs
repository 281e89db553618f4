use std::time::{Duration, Instant};

/// Opaque id of one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

/// Display-refresh scheduler, modelled on `requestAnimationFrame`.
///
/// A requested frame fires at most once, on the next refresh, unless canceled first.
pub trait FrameClock {
    /// Schedule a callback for the next refresh.
    fn request_frame(&mut self) -> TickHandle;
    /// Drop a scheduled callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: TickHandle);
    /// Run one refresh: return every callback that came due, with the refresh timestamp in ms.
    fn due_frames(&mut self) -> Vec<(TickHandle, f64)>;
}

impl<T: FrameClock + ?Sized> FrameClock for &mut T {
    fn request_frame(&mut self) -> TickHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: TickHandle) {
        (**self).cancel_frame(handle);
    }

    fn due_frames(&mut self) -> Vec<(TickHandle, f64)> {
        (**self).due_frames()
    }
}

/// Deterministic clock; every [`FrameClock::due_frames`] call is one refresh of `frame_ms`.
#[derive(Debug)]
pub struct SimulatedClock {
    frame_ms: f64,
    now_ms: f64,
    next_id: u64,
    pending: Vec<TickHandle>,
    refreshes: u64,
}

impl SimulatedClock {
    /// Clock refreshing every `frame_ms` milliseconds, starting at 0.
    pub fn new(frame_ms: f64) -> Self {
        Self {
            frame_ms,
            now_ms: 0.0,
            next_id: 1,
            pending: Vec::new(),
            refreshes: 0,
        }
    }

    /// 60 Hz.
    pub fn sixty_hz() -> Self {
        Self::new(1000.0 / 60.0)
    }

    /// Timestamp of the last refresh.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Callbacks scheduled and not yet fired.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Refreshes run so far.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl FrameClock for SimulatedClock {
    fn request_frame(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: TickHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn due_frames(&mut self) -> Vec<(TickHandle, f64)> {
        self.now_ms += self.frame_ms;
        self.refreshes += 1;
        let now = self.now_ms;
        self.pending.drain(..).map(|h| (h, now)).collect()
    }
}

/// Wall-clock scheduler that sleeps until the next refresh boundary.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Duration,
    origin: Instant,
    last_refresh: Option<Instant>,
    next_id: u64,
    pending: Vec<TickHandle>,
}

impl IntervalClock {
    /// Clock refreshing at `fps` (clamped to at least 1).
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() { fps.max(1.0) } else { 60.0 };
        Self {
            interval: Duration::from_secs_f64(1.0 / fps),
            origin: Instant::now(),
            last_refresh: None,
            next_id: 1,
            pending: Vec::new(),
        }
    }
}

impl FrameClock for IntervalClock {
    fn request_frame(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: TickHandle) {
        self.pending.retain(|h| *h != handle);
    }

    fn due_frames(&mut self) -> Vec<(TickHandle, f64)> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        if let Some(last) = self.last_refresh {
            let next = last + self.interval;
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            }
        }
        let now = Instant::now();
        self.last_refresh = Some(now);
        let ts = now.duration_since(self.origin).as_secs_f64() * 1000.0;
        self.pending.drain(..).map(|h| (h, ts)).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
