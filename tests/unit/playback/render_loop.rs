use super::*;
use crate::playback::clock::SimulatedClock;
use crate::scene::model::MediaKind;

#[derive(Default)]
struct Counter {
    ticks: Vec<Tick>,
}

impl Redraw for Counter {
    fn redraw(&mut self, tick: Tick) {
        self.ticks.push(tick);
    }
}

fn ready(src: &str) -> MediaReady {
    MediaReady {
        kind: MediaKind::Image,
        source: src.to_string(),
        layer: None,
    }
}

#[test]
fn double_start_keeps_a_single_tick_chain() {
    let mut lp = RenderLoop::new(SimulatedClock::sixty_hz());
    let mut target = Counter::default();
    lp.start();
    lp.start();
    assert_eq!(lp.clock().pending_count(), 1);

    let n = 30;
    for _ in 0..n {
        lp.pump(&mut target);
    }
    assert_eq!(target.ticks.len(), n);
    assert_eq!(lp.clock().pending_count(), 1);
}

#[test]
fn stop_cancels_the_scheduled_tick() {
    let mut lp = RenderLoop::new(SimulatedClock::sixty_hz());
    let mut target = Counter::default();
    lp.start();
    lp.pump(&mut target);
    lp.stop();
    assert_eq!(lp.clock().pending_count(), 0);

    for _ in 0..5 {
        assert_eq!(lp.pump(&mut target), 0);
    }
    assert_eq!(target.ticks.len(), 1);
    assert_eq!(lp.state(), LoopState::Stopped);
}

#[test]
fn stale_handles_are_ignored() {
    let mut clock = SimulatedClock::new(10.0);
    let foreign = clock.request_frame();
    let mut lp = RenderLoop::new(clock);
    let mut target = Counter::default();
    lp.start();
    assert!(!lp.on_frame(foreign, 10.0, &mut target));
    assert!(target.ticks.is_empty());
}

#[test]
fn playhead_follows_refresh_time() {
    let mut lp = RenderLoop::new(SimulatedClock::new(100.0));
    let mut target = Counter::default();
    lp.start();
    for _ in 0..4 {
        lp.pump(&mut target);
    }
    let heads: Vec<f64> = target.ticks.iter().map(|t| t.playhead_s).collect();
    assert_eq!(heads, vec![0.0, 0.1, 0.2, 0.3]);
    assert!(target.ticks.iter().all(|t| t.now_ms.is_some()));
}

#[test]
fn restart_resumes_from_the_paused_playhead() {
    let mut lp = RenderLoop::new(SimulatedClock::new(500.0));
    let mut target = Counter::default();
    lp.start();
    lp.pump(&mut target);
    lp.pump(&mut target);
    lp.stop();
    let paused_at = lp.playhead_s();
    assert_eq!(paused_at, 0.5);

    lp.pump(&mut target);
    lp.start();
    lp.pump(&mut target);
    assert_eq!(target.ticks.last().unwrap().playhead_s, paused_at);
}

#[test]
fn stopped_loop_redraws_once_per_change() {
    let mut lp = RenderLoop::new(SimulatedClock::sixty_hz());
    let mut target = Counter::default();
    assert!(lp.invalidate(&mut target));
    assert_eq!(lp.media_ready(&[ready("a"), ready("b")], &mut target), 2);
    assert_eq!(target.ticks.len(), 3);
    assert!(target.ticks.iter().all(|t| t.now_ms.is_none()));

    lp.start();
    assert!(!lp.invalidate(&mut target));
    assert_eq!(lp.media_ready(&[ready("c")], &mut target), 0);
    assert_eq!(target.ticks.len(), 3);
}

#[test]
fn reaching_the_duration_stops_and_rewinds() {
    let mut lp = RenderLoop::new(SimulatedClock::new(400.0)).with_duration(1.0);
    let mut target = Counter::default();
    lp.start();
    for _ in 0..5 {
        lp.pump(&mut target);
    }
    assert_eq!(lp.state(), LoopState::Stopped);
    assert_eq!(lp.playhead_s(), 0.0);
    let last = target.ticks.last().unwrap();
    assert_eq!(last.playhead_s, 0.0);
    assert!(last.now_ms.is_none());
    assert_eq!(lp.clock().pending_count(), 0);
    // 0.0, 0.4, 0.8, then 1.2 overshoots and rewinds.
    assert_eq!(target.ticks.len(), 4);
}

#[test]
fn seek_clamps_and_redraws_when_stopped() {
    let mut lp = RenderLoop::new(SimulatedClock::sixty_hz()).with_duration(3.0);
    let mut target = Counter::default();
    lp.seek(10.0, &mut target);
    assert_eq!(lp.playhead_s(), 3.0);
    lp.seek(-1.0, &mut target);
    assert_eq!(lp.playhead_s(), 0.0);
    lp.seek(f64::NAN, &mut target);
    assert_eq!(lp.playhead_s(), 0.0);
    assert_eq!(target.ticks.len(), 3);
}

#[test]
fn dropping_the_loop_cancels_its_tick() {
    let mut clock = SimulatedClock::sixty_hz();
    {
        let mut lp = RenderLoop::new(&mut clock);
        lp.start();
    }
    assert_eq!(clock.pending_count(), 0);
    assert!(clock.due_frames().is_empty());
}
