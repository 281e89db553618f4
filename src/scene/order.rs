use crate::scene::model::{Layer, LayerType};

/// Indices of `layers` in composite order, bottom first.
///
/// Background layers come first, keeping their relative order; every other layer follows in
/// authored order. This is the only ordering rule; there is no explicit z-index.
pub fn render_order_indices(layers: &[Layer]) -> Vec<usize> {
    let backgrounds = layers
        .iter()
        .enumerate()
        .filter(|(_, l)| l.layer_type == LayerType::Background)
        .map(|(i, _)| i);
    let rest = layers
        .iter()
        .enumerate()
        .filter(|(_, l)| l.layer_type != LayerType::Background)
        .map(|(i, _)| i);
    backgrounds.chain(rest).collect()
}

/// `layers` in composite order, bottom first.
pub fn render_order(layers: &[Layer]) -> Vec<&Layer> {
    render_order_indices(layers)
        .into_iter()
        .map(|i| &layers[i])
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/order.rs"]
mod tests;
