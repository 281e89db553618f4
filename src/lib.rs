//! Layercast is a layered scene compositor with a preview render loop and direct manipulation.
//!
//! Authors arrange background, overlay, image and logo layers, preview them, and save the
//! arrangement as a single template. End users pick from the template's selectable layers and
//! drag them into place; a display view presents the template on its own.
//!
//! - [`render`](fn@render) composites a layer list onto a [`Surface`]
//! - [`RenderLoop`] schedules redraws against a [`FrameClock`]
//! - [`DragController`] turns pointer input into layer positions
//! - [`AdminView`], [`UserView`] and [`DisplayView`] tie these to a [`TemplateRepository`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod interaction;
pub(crate) mod playback;
pub(crate) mod remote;
pub(crate) mod render;
pub(crate) mod scene;
pub(crate) mod session;

pub use crate::foundation::config::LayercastConfig;
pub use crate::foundation::core::{Canvas, LayerId, LayerIdGen, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{LayercastError, LayercastResult};

pub use crate::assets::decode::{PreparedImage, decode_image};
pub use crate::assets::media::{
    VideoSourceInfo, decode_video_clip, fit_decode_size, probe_video, rgba_frame_len,
};
pub use crate::assets::source::{MediaSource, MemoryMediaSource, NetworkMediaSource};
pub use crate::assets::store::{MediaReady, MediaStore};
pub use crate::assets::video::{ReadyState, VideoClip, VideoHandle};

pub use crate::scene::edit::{LayerList, LayerPatch, MoveDirection};
pub use crate::scene::model::{
    Layer, LayerType, Media, MediaKind, Template, TimeWindow, is_video_reference,
};
pub use crate::scene::order::{render_order, render_order_indices};
pub use crate::scene::repository::{
    InMemoryTemplateRepository, JsonFileTemplateRepository, TemplateRepository,
};

pub use crate::remote::upload::{UploadClient, UploadResponse, content_type_for_path};
pub use crate::remote::url::{is_remote, resolve_url};

pub use crate::render::compositor::{FrameStats, render};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::placement::{layer_rect, placement_rect};
pub use crate::render::recording::{DrawRecord, RecordingSurface};
pub use crate::render::surface::{DrawImage, FrameRGBA, Surface};

pub use crate::playback::clock::{FrameClock, IntervalClock, SimulatedClock, TickHandle};
pub use crate::playback::render_loop::{LoopState, Redraw, RenderLoop, Tick};

pub use crate::interaction::drag::{DragController, DragEvent, hit_test, hit_test_where};
pub use crate::interaction::pointer::{PointerInput, SurfaceViewport, TouchPhase, touch_input};

pub use crate::session::admin::{AdminView, DEFAULT_PREVIEW_DURATION_S};
pub use crate::session::display::DisplayView;
pub use crate::session::stage::{SceneState, Stage};
pub use crate::session::user::UserView;
