use crate::foundation::core::{LayerId, LayerIdGen, Vec2};
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::scene::model::{Layer, LayerType, Media, TimeWindow};

/// Direction for [`LayerList::move_layer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    /// Towards the start of the list.
    Up,
    /// Towards the end of the list.
    Down,
}

/// Partial update applied by [`LayerList::update`]. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerPatch {
    /// New label.
    pub name: Option<String>,
    /// New opacity in `[0, 1]`.
    pub opacity: Option<f64>,
    /// New scale, `> 0`.
    pub scale: Option<f64>,
    /// New offset.
    pub position: Option<Vec2>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New selectability flag.
    pub user_selectable: Option<bool>,
    /// New time window; `Some(None)` clears it.
    pub window: Option<Option<TimeWindow>>,
}

/// Authored, ordered layer list with id allocation.
#[derive(Debug)]
pub struct LayerList {
    layers: Vec<Layer>,
    ids: LayerIdGen,
}

impl Default for LayerList {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerList {
    /// Empty list.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            ids: LayerIdGen::new(),
        }
    }

    /// Adopt existing layers; new ids continue after the largest present.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let ids = LayerIdGen::after(layers.iter().map(|l| &l.id));
        Self { layers, ids }
    }

    /// Layers in authored order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable access for in-place edits such as dragging.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Lookup by id.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Append a default layer of `layer_type`, named `"<Label> <n>"`.
    pub fn add(&mut self, layer_type: LayerType) -> LayerId {
        let id = self.ids.next_id();
        let name = format!("{} {}", layer_type.label(), self.layers.len() + 1);
        self.layers.push(Layer::new(id, layer_type, name));
        id
    }

    /// Remove and return a layer.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let idx = self.index_of(id)?;
        Some(self.layers.remove(idx))
    }

    /// Swap with the neighbour in `dir`. Returns `false` at the ends or for unknown ids.
    pub fn move_layer(&mut self, id: LayerId, dir: MoveDirection) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        match dir {
            MoveDirection::Up if idx > 0 => {
                self.layers.swap(idx, idx - 1);
                true
            }
            MoveDirection::Down if idx + 1 < self.layers.len() => {
                self.layers.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Apply `patch` atomically: on validation failure the layer is unchanged.
    pub fn update(&mut self, id: LayerId, patch: LayerPatch) -> LayercastResult<&Layer> {
        let idx = self.require(id)?;
        let mut next = self.layers[idx].clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(v) = patch.opacity {
            next.opacity = v;
        }
        if let Some(v) = patch.scale {
            next.scale = v;
        }
        if let Some(v) = patch.position {
            next.position = v;
        }
        if let Some(v) = patch.visible {
            next.visible = v;
        }
        if let Some(v) = patch.user_selectable {
            next.user_selectable = v;
        }
        if let Some(v) = patch.window {
            next.window = v;
        }
        next.validate()?;
        self.layers[idx] = next;
        Ok(&self.layers[idx])
    }

    /// Set or clear the resolved media of a layer.
    pub fn set_media(&mut self, id: LayerId, media: Option<Media>) -> LayercastResult<()> {
        let idx = self.require(id)?;
        self.layers[idx].media = media;
        Ok(())
    }

    /// Replace the position of a layer. Returns `false` for unknown ids.
    pub fn set_position(&mut self, id: LayerId, position: Vec2) -> bool {
        match self.index_of(id) {
            Some(idx) => {
                self.layers[idx].position = position;
                true
            }
            None => false,
        }
    }

    fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    fn require(&self, id: LayerId) -> LayercastResult<usize> {
        self.index_of(id)
            .ok_or_else(|| LayercastError::validation(format!("unknown {id}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/edit.rs"]
mod tests;
