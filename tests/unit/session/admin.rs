use std::time::Duration;

use super::*;
use crate::assets::decode::PreparedImage;
use crate::assets::source::MemoryMediaSource;
use crate::assets::store::MediaStore;
use crate::assets::video::VideoClip;
use crate::foundation::core::{Canvas, Vec2};
use crate::playback::clock::SimulatedClock;
use crate::render::recording::RecordingSurface;
use crate::scene::model::TimeWindow;
use crate::scene::repository::InMemoryTemplateRepository;

fn admin(
    source: MemoryMediaSource,
) -> (
    AdminView<RecordingSurface, SimulatedClock>,
    Arc<InMemoryTemplateRepository>,
) {
    let repo = Arc::new(InMemoryTemplateRepository::new());
    let media = MediaStore::new(Arc::new(source), Some(1)).unwrap();
    let scene = SceneState::new(RecordingSurface::new(Canvas::new(640, 360).unwrap()), media);
    let view = AdminView::new(scene, SimulatedClock::new(100.0), repo.clone());
    (view, repo)
}

fn frames(view: &AdminView<RecordingSurface, SimulatedClock>) -> usize {
    view.stage().scene().surface().frame_count()
}

#[test]
fn edits_while_stopped_redraw_once_each() {
    let (mut view, _) = admin(MemoryMediaSource::new());
    let a = view.add_layer(LayerType::Background);
    let b = view.add_layer(LayerType::Overlay);
    assert_eq!(frames(&view), 2);

    assert!(view.move_layer(b, MoveDirection::Up));
    assert!(!view.move_layer(b, MoveDirection::Up));
    assert_eq!(frames(&view), 3);

    view.update_layer(
        a,
        LayerPatch {
            opacity: Some(0.5),
            ..LayerPatch::default()
        },
    )
    .unwrap();
    assert_eq!(frames(&view), 4);

    assert!(
        view.update_layer(
            a,
            LayerPatch {
                scale: Some(0.0),
                ..LayerPatch::default()
            }
        )
        .is_err()
    );
    assert_eq!(frames(&view), 4);
    assert_eq!(view.layers()[1].opacity, 0.5);
    assert_eq!(view.layers()[0].name, "Overlay 2");
}

#[test]
fn attached_media_appears_after_readiness() {
    let source = MemoryMediaSource::new();
    source.insert_image("/uploads/p.png", PreparedImage::solid(2, 2, [0, 255, 0, 255]).unwrap());
    let (mut view, _) = admin(source);
    let id = view.add_layer(LayerType::Image);
    view.attach_media(id, Media::Image("/uploads/p.png".into()))
        .unwrap();
    assert!(view.stage().scene().surface().last_frame().unwrap().is_empty());

    let ready = view
        .stage_mut()
        .scene
        .media_mut()
        .wait_idle(Duration::from_secs(5));
    let stage = view.stage_mut();
    stage.render_loop.media_ready(&ready, &mut stage.scene);

    let last = view.stage().scene().surface().last_frame().unwrap();
    assert_eq!(last.len(), 1);
    assert_eq!(last[0].layer, id);
}

#[test]
fn preview_gates_layers_by_time_window() {
    let source = MemoryMediaSource::new();
    source.insert_image("/uploads/p.png", PreparedImage::solid(2, 2, [0, 255, 0, 255]).unwrap());
    let (mut view, _) = admin(source);
    assert!(view.stage().scene().timeline());
    let id = view.add_layer(LayerType::Image);
    view.attach_media(id, Media::Image("/uploads/p.png".into()))
        .unwrap();
    view.stage_mut()
        .scene
        .media_mut()
        .wait_idle(Duration::from_secs(5));
    view.update_layer(
        id,
        LayerPatch {
            window: Some(Some(TimeWindow {
                start_s: 3.0,
                duration_s: 2.0,
            })),
            ..LayerPatch::default()
        },
    )
    .unwrap();
    assert!(view.stage().scene().surface().draws_for(id).is_empty());

    view.seek(4.0);
    assert_eq!(view.stage().scene().surface().draws_for(id).len(), 1);
}

#[test]
fn removing_a_video_layer_destroys_its_handle() {
    let source = MemoryMediaSource::new();
    let frame = PreparedImage::solid(2, 2, [0, 0, 255, 255]).unwrap();
    source.insert_video("/uploads/v.mp4", VideoClip::new(24.0, vec![frame]).unwrap());
    let (mut view, _) = admin(source);
    let id = view.add_layer(LayerType::Overlay);
    view.attach_media(id, Media::Video("/uploads/v.mp4".into()))
        .unwrap();
    view.stage_mut()
        .scene
        .media_mut()
        .wait_idle(Duration::from_secs(5));
    assert!(view.stage().scene().media().video(id).is_some());

    assert!(view.remove_layer(id).is_some());
    assert_eq!(view.stage().scene().media().video_binding_count(), 0);
    assert!(view.remove_layer(id).is_none());
}

#[test]
fn failed_upload_leaves_layer_without_media() {
    let (mut view, _) = admin(MemoryMediaSource::new());
    let id = view.add_layer(LayerType::Logo);
    let client = UploadClient::new("http://127.0.0.1:9").unwrap();

    let err = view
        .upload_and_attach(id, Path::new("target/definitely-missing.png"), &client)
        .unwrap_err();
    assert!(matches!(err, LayercastError::Upload(_)));
    assert!(!view.layers()[0].has_media());

    let err = view
        .upload_and_attach(LayerId(999), Path::new("x.png"), &client)
        .unwrap_err();
    assert!(matches!(err, LayercastError::Validation(_)));
}

#[test]
fn preview_stops_and_rewinds_at_its_duration() {
    let (mut view, _) = admin(MemoryMediaSource::new());
    view.stage_mut().render_loop_mut().set_duration(Some(0.25));
    view.play();
    for _ in 0..5 {
        view.pump();
    }
    assert!(!view.stage().is_playing());
    assert_eq!(view.stage().render_loop().playhead_s(), 0.0);

    view.toggle_play();
    assert!(view.stage().is_playing());
    view.toggle_play();
    assert!(!view.stage().is_playing());
}

#[test]
fn save_and_reopen_round_trip() {
    let (mut view, repo) = admin(MemoryMediaSource::new());
    let bg = view.add_layer(LayerType::Background);
    let ov = view.add_layer(LayerType::Overlay);
    view.update_layer(
        ov,
        LayerPatch {
            user_selectable: Some(true),
            scale: Some(1.5),
            position: Some(Vec2::new(10.0, -5.0)),
            ..LayerPatch::default()
        },
    )
    .unwrap();

    let saved = view.save_template().unwrap();
    assert_eq!(saved.resolution, Canvas::new(640, 360).unwrap());
    assert_eq!(repo.load().unwrap(), Some(saved));

    let (mut fresh, _) = admin(MemoryMediaSource::new());
    let fresh_repo: Arc<dyn TemplateRepository> = repo;
    fresh.repo = fresh_repo;
    assert!(fresh.open_saved().unwrap());
    let ids: Vec<LayerId> = fresh.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![bg, ov]);
    assert!(fresh.add_layer(LayerType::Image).0 > ov.0);
}
