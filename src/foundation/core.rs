use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{LayercastError, LayercastResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Output surface resolution in pixels.
///
/// Shared by every view rendering the same template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> LayercastResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    /// Reject zero-sized canvases.
    pub fn validate(self) -> LayercastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(LayercastError::validation(
                "canvas width/height must be > 0",
            ));
        }
        Ok(())
    }

    /// Center point of the canvas in surface pixels.
    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Opaque layer identity, stable for the layer's lifetime.
///
/// Used as the key of per-view video handles and as the drag target key.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Monotonic [`LayerId`] source.
///
/// Seeded past the largest id already in use so ids stay unique after a template reload.
#[derive(Debug)]
pub struct LayerIdGen {
    next: AtomicU64,
}

impl Default for LayerIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerIdGen {
    /// Start allocating at `1`.
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Start allocating after the largest id in `existing`.
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a LayerId>) -> Self {
        let max = existing.into_iter().map(|id| id.0).max().unwrap_or(0);
        Self {
            next: AtomicU64::new(max + 1),
        }
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> LayerId {
        LayerId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
