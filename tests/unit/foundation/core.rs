use super::*;

#[test]
fn canvas_defaults_to_full_hd() {
    let c = Canvas::default();
    assert_eq!((c.width, c.height), (1920, 1080));
    assert_eq!(c.center(), Point::new(960.0, 540.0));
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(1, 1).is_ok());
}

#[test]
fn layer_ids_are_unique_and_continue_after_existing() {
    let ids = [LayerId(4), LayerId(9), LayerId(2)];
    let id_gen = LayerIdGen::after(ids.iter());
    assert_eq!(id_gen.next_id(), LayerId(10));
    assert_eq!(id_gen.next_id(), LayerId(11));

    let fresh = LayerIdGen::new();
    assert_eq!(fresh.next_id(), LayerId(1));
}

#[test]
fn layer_id_serializes_as_plain_number() {
    let s = serde_json::to_string(&LayerId(42)).unwrap();
    assert_eq!(s, "42");
}
