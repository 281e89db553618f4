use super::*;

fn overlay(id: u64) -> Layer {
    Layer::new(LayerId(id), LayerType::Overlay, format!("Overlay {id}"))
}

#[test]
fn video_extensions_are_detected_case_insensitively() {
    assert!(is_video_reference("clip.mp4"));
    assert!(is_video_reference("/uploads/CLIP.MOV"));
    assert!(is_video_reference("https://cdn.example.com/a.webm?sig=abc"));
    assert!(!is_video_reference("photo.png"));
    assert!(!is_video_reference("https://example.mp4/image"));
    assert!(!is_video_reference("noext"));
}

#[test]
fn media_tag_follows_declared_content_type() {
    assert_eq!(
        Media::from_content_type("video/mp4", "a.bin").unwrap(),
        Media::Video("a.bin".to_string())
    );
    assert_eq!(
        Media::from_content_type("image/png", "a.mp4").unwrap(),
        Media::Image("a.mp4".to_string())
    );
    assert!(Media::from_content_type("application/pdf", "a.pdf").is_err());
}

#[test]
fn layer_deserializes_with_defaults() {
    let json = r#"{"id": 7, "type": "logo", "name": "Logo 1"}"#;
    let layer: Layer = serde_json::from_str(json).unwrap();
    assert_eq!(layer.layer_type, LayerType::Logo);
    assert_eq!(layer.opacity, 1.0);
    assert_eq!(layer.scale, 1.0);
    assert_eq!(layer.position, Vec2::ZERO);
    assert!(layer.visible);
    assert!(!layer.user_selectable);
    assert!(layer.media.is_none());
    assert!(layer.window.is_none());
}

#[test]
fn layer_json_uses_camel_case_and_tagged_media() {
    let mut layer = overlay(3).with_media(Media::Video("/uploads/a.mp4".to_string()));
    layer.user_selectable = true;
    let v = serde_json::to_value(&layer).unwrap();
    assert_eq!(v["type"], "overlay");
    assert_eq!(v["userSelectable"], true);
    assert_eq!(v["media"]["kind"], "video");
    assert_eq!(v["media"]["src"], "/uploads/a.mp4");
    assert_eq!(v["position"]["x"], 0.0);
}

#[test]
fn validate_rejects_out_of_range_transforms() {
    let mut l = overlay(1);
    l.opacity = 1.5;
    assert!(l.validate().is_err());

    let mut l = overlay(1);
    l.scale = 0.0;
    assert!(l.validate().is_err());

    let mut l = overlay(1);
    l.position = Vec2::new(f64::NAN, 0.0);
    assert!(l.validate().is_err());

    let mut l = overlay(1);
    l.window = Some(TimeWindow {
        start_s: -1.0,
        duration_s: 2.0,
    });
    assert!(l.validate().is_err());
}

#[test]
fn drawable_requires_visible_media_and_active_window() {
    let mut l = overlay(1);
    assert!(!l.is_drawable(None));

    l.media = Some(Media::Image("a.png".to_string()));
    assert!(l.is_drawable(None));

    l.window = Some(TimeWindow {
        start_s: 2.0,
        duration_s: 3.0,
    });
    assert!(!l.is_drawable(Some(1.0)));
    assert!(l.is_drawable(Some(2.0)));
    assert!(l.is_drawable(Some(5.0)));
    assert!(!l.is_drawable(Some(5.5)));
    assert!(l.is_drawable(None));

    l.visible = false;
    assert!(!l.is_drawable(Some(3.0)));
}

#[test]
fn template_selectable_subset_keeps_order() {
    let mut a = overlay(1);
    a.user_selectable = true;
    let b = Layer::new(LayerId(2), LayerType::Background, "Background 2");
    let mut c = overlay(3);
    c.user_selectable = true;
    let t = Template::new(vec![a, b, c], Canvas::default());
    let ids: Vec<_> = t.selectable_layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![LayerId(1), LayerId(3)]);
}

#[test]
fn template_rejects_duplicate_ids() {
    let t = Template::new(vec![overlay(1), overlay(1)], Canvas::default());
    assert!(t.validate().is_err());
}
