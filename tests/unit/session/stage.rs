use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::source::MemoryMediaSource;
use crate::foundation::core::LayerId;
use crate::playback::clock::SimulatedClock;
use crate::render::recording::RecordingSurface;
use crate::scene::model::{LayerType, Media};

fn stage_with(source: MemoryMediaSource) -> Stage<RecordingSurface, SimulatedClock> {
    let media = MediaStore::new(Arc::new(source), Some(1)).unwrap();
    let scene = SceneState::new(RecordingSurface::new(Canvas::new(320, 180).unwrap()), media);
    Stage::new(scene, SimulatedClock::sixty_hz())
}

fn image_layer(id: u64, src: &str) -> Layer {
    Layer::new(LayerId(id), LayerType::Image, "pic").with_media(Media::Image(src.to_string()))
}

#[test]
fn readiness_triggers_exactly_one_redraw_per_transition_while_stopped() {
    let source = MemoryMediaSource::new();
    source.insert_image("a.png", PreparedImage::solid(2, 2, [9, 9, 9, 255]).unwrap());
    source.insert_image("b.png", PreparedImage::solid(2, 2, [9, 9, 9, 255]).unwrap());
    let mut stage = stage_with(source);
    stage
        .scene
        .set_layers(vec![image_layer(1, "a.png"), image_layer(2, "b.png")]);

    let ready = stage.scene.media_mut().wait_idle(Duration::from_secs(5));
    assert_eq!(ready.len(), 2);
    let redraws = stage.render_loop.media_ready(&ready, &mut stage.scene);

    assert_eq!(redraws, 2);
    assert_eq!(stage.scene().surface().frame_count(), 2);
    assert_eq!(stage.scene().last_stats().drawn, 2);
    assert_eq!(stage.pump(), 0);
}

#[test]
fn failed_media_never_redraws() {
    let mut stage = stage_with(MemoryMediaSource::new());
    stage.scene.set_layers(vec![image_layer(1, "missing.png")]);

    let ready = stage.scene.media_mut().wait_idle(Duration::from_secs(5));
    assert!(ready.is_empty());
    assert!(stage.scene().media().image_failed("missing.png"));
    assert_eq!(stage.pump(), 0);
    assert_eq!(stage.scene().redraws(), 0);
}

#[test]
fn play_pause_cycle() {
    let mut stage = stage_with(MemoryMediaSource::new());
    stage.play();
    assert!(stage.is_playing());
    assert_eq!(stage.pump(), 1);
    assert_eq!(stage.pump(), 1);

    stage.pause();
    assert!(!stage.is_playing());
    assert_eq!(stage.scene().redraws(), 3);
    assert_eq!(stage.pump(), 0);
}

#[test]
fn draw_order_puts_backgrounds_first() {
    let mut stage = stage_with(MemoryMediaSource::new());
    let bg = Layer::new(LayerId(7), LayerType::Background, "bg");
    stage.scene.set_layers(vec![image_layer(1, "x"), bg]);
    let ids: Vec<u64> = stage.scene().draw_order().iter().map(|l| l.id.0).collect();
    assert_eq!(ids, vec![7, 1]);
}
