use super::*;
use crate::foundation::core::LayerId;

fn layer(id: u64, ty: LayerType) -> Layer {
    Layer::new(LayerId(id), ty, format!("{} {id}", ty.label()))
}

fn ids(layers: Vec<&Layer>) -> Vec<u64> {
    layers.into_iter().map(|l| l.id.0).collect()
}

#[test]
fn background_moves_to_bottom() {
    let layers = vec![
        layer(1, LayerType::Overlay),
        layer(2, LayerType::Logo),
        layer(3, LayerType::Background),
    ];
    assert_eq!(ids(render_order(&layers)), vec![3, 1, 2]);
}

#[test]
fn relative_order_is_preserved_within_groups() {
    let layers = vec![
        layer(1, LayerType::Image),
        layer(2, LayerType::Background),
        layer(3, LayerType::Overlay),
        layer(4, LayerType::Background),
        layer(5, LayerType::Logo),
    ];
    assert_eq!(ids(render_order(&layers)), vec![2, 4, 1, 3, 5]);
}

#[test]
fn no_background_keeps_authored_order() {
    let layers = vec![layer(1, LayerType::Logo), layer(2, LayerType::Image)];
    assert_eq!(render_order_indices(&layers), vec![0, 1]);
    assert!(render_order(&[]).is_empty());
}
