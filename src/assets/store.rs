use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::assets::decode::PreparedImage;
use crate::assets::source::MediaSource;
use crate::assets::video::{VideoClip, VideoHandle};
use crate::foundation::core::LayerId;
use crate::foundation::error::{LayercastError, LayercastResult};
use crate::scene::model::{Layer, Media, MediaKind};

/// One Pending -> Ready transition, reported by [`MediaStore::poll_ready`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaReady {
    /// Which draw path became available.
    pub kind: MediaKind,
    /// Reference that finished loading.
    pub source: String,
    /// Owning layer for video handles; images are shared by source.
    pub layer: Option<LayerId>,
}

#[derive(Debug)]
enum Slot<T> {
    Pending,
    Ready(T),
    Failed,
}

#[derive(Debug)]
struct VideoBinding {
    source: String,
    slot: Slot<VideoHandle>,
}

enum Completion {
    Image {
        source: String,
        result: LayercastResult<PreparedImage>,
    },
    Video {
        layer: LayerId,
        source: String,
        result: LayercastResult<VideoClip>,
    },
}

/// Per-view media cache with asynchronous readiness.
///
/// Loads run on a rayon pool and report back over a channel; all state changes happen on the
/// caller's thread inside [`MediaStore::poll_ready`] / [`MediaStore::wait_idle`]. Images are keyed
/// by source and kept only while some layer references them. Video handles are keyed by layer id
/// and never shared, not even across views showing the same template.
pub struct MediaStore {
    source: Arc<dyn MediaSource>,
    pool: Option<rayon::ThreadPool>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    images: HashMap<String, Slot<PreparedImage>>,
    videos: HashMap<LayerId, VideoBinding>,
    in_flight: usize,
}

impl MediaStore {
    /// Store loading through `source`. `threads = None` uses rayon's global pool.
    pub fn new(source: Arc<dyn MediaSource>, threads: Option<usize>) -> LayercastResult<Self> {
        let pool = match threads {
            Some(0) => {
                return Err(LayercastError::validation(
                    "media loader threads must be >= 1 when set",
                ));
            }
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("layercast-loader-{i}"))
                    .build()
                    .map_err(|e| {
                        LayercastError::media(format!("failed to build loader pool: {e}"))
                    })?,
            ),
            None => None,
        };
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            source,
            pool,
            tx,
            rx,
            images: HashMap::new(),
            videos: HashMap::new(),
            in_flight: 0,
        })
    }

    /// Request everything `layers` reference and drop images and video handles nobody
    /// references anymore.
    #[tracing::instrument(skip_all, fields(layers = layers.len()))]
    pub fn sync_layers(&mut self, layers: &[Layer]) {
        let mut wanted_images: HashSet<&str> = HashSet::new();
        let mut wanted_videos: HashMap<LayerId, &str> = HashMap::new();
        for layer in layers {
            match &layer.media {
                Some(Media::Image(src)) => {
                    wanted_images.insert(src);
                    self.request_image(src);
                }
                Some(Media::Video(src)) => {
                    wanted_videos.insert(layer.id, src);
                }
                None => {}
            }
        }

        let before = self.images.len();
        self.images.retain(|src, _| wanted_images.contains(src.as_str()));
        let evicted = before - self.images.len();
        if evicted > 0 {
            tracing::debug!(evicted, "unreferenced images dropped");
        }

        let stale: Vec<LayerId> = self
            .videos
            .iter()
            .filter(|(id, b)| wanted_videos.get(id).is_none_or(|src| *src != b.source))
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.release(id);
        }

        for (id, src) in wanted_videos {
            self.bind_video(id, src);
        }
    }

    /// Start loading an image unless it is already known.
    pub fn request_image(&mut self, source: &str) {
        if self.images.contains_key(source) {
            return;
        }
        self.images.insert(source.to_string(), Slot::Pending);
        let loader = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let source = source.to_string();
        tracing::debug!(source = %source, "image load requested");
        self.spawn(move || {
            let result = loader.load_image(&source);
            let _ = tx.send(Completion::Image { source, result });
        });
    }

    /// Bind a video source to `layer`, replacing any handle bound to another source.
    pub fn bind_video(&mut self, layer: LayerId, source: &str) {
        if self.videos.get(&layer).is_some_and(|b| b.source == source) {
            return;
        }
        self.release(layer);
        self.videos.insert(
            layer,
            VideoBinding {
                source: source.to_string(),
                slot: Slot::Pending,
            },
        );
        let loader = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let source = source.to_string();
        tracing::debug!(%layer, source = %source, "video load requested");
        self.spawn(move || {
            let result = loader.load_video(&source);
            let _ = tx.send(Completion::Video {
                layer,
                source,
                result,
            });
        });
    }

    /// Destroy the video handle owned by `layer`, if any.
    pub fn release(&mut self, layer: LayerId) {
        if let Some(mut binding) = self.videos.remove(&layer) {
            if let Slot::Ready(handle) = &mut binding.slot {
                handle.destroy();
            }
            tracing::debug!(%layer, source = %binding.source, "video handle released");
        }
    }

    /// Apply finished loads without blocking.
    pub fn poll_ready(&mut self) -> Vec<MediaReady> {
        let mut ready = Vec::new();
        while let Ok(c) = self.rx.try_recv() {
            ready.extend(self.apply(c));
        }
        ready
    }

    /// Block until nothing is in flight or `timeout` elapses, applying loads as they land.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<MediaReady> {
        let deadline = Instant::now() + timeout;
        let mut ready = self.poll_ready();
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(c) => ready.extend(self.apply(c)),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(pending = self.in_flight, "media still loading at timeout");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        ready
    }

    /// Install an already-decoded image.
    pub fn insert_image(&mut self, source: impl Into<String>, image: PreparedImage) -> MediaReady {
        let source = source.into();
        self.images.insert(source.clone(), Slot::Ready(image));
        MediaReady {
            kind: MediaKind::Image,
            source,
            layer: None,
        }
    }

    /// Install an already-decoded clip as `layer`'s handle.
    pub fn insert_video(
        &mut self,
        layer: LayerId,
        source: impl Into<String>,
        clip: VideoClip,
    ) -> MediaReady {
        let source = source.into();
        self.release(layer);
        self.videos.insert(
            layer,
            VideoBinding {
                source: source.clone(),
                slot: Slot::Ready(VideoHandle::new(source.clone(), Arc::new(clip))),
            },
        );
        MediaReady {
            kind: MediaKind::Video,
            source,
            layer: Some(layer),
        }
    }

    /// Decoded image for `source`, if ready.
    pub fn image(&self, source: &str) -> Option<&PreparedImage> {
        match self.images.get(source) {
            Some(Slot::Ready(img)) => Some(img),
            _ => None,
        }
    }

    /// Whether `source` failed to load. Failed media never becomes ready.
    pub fn image_failed(&self, source: &str) -> bool {
        matches!(self.images.get(source), Some(Slot::Failed))
    }

    /// Ready video handle owned by `layer`.
    pub fn video(&self, layer: LayerId) -> Option<&VideoHandle> {
        match self.videos.get(&layer) {
            Some(VideoBinding {
                slot: Slot::Ready(h),
                ..
            }) => Some(h),
            _ => None,
        }
    }

    /// Number of layers currently owning a video binding (any state).
    pub fn video_binding_count(&self) -> usize {
        self.videos.len()
    }

    /// Loads requested but not yet applied.
    pub fn pending_count(&self) -> usize {
        self.in_flight
    }

    /// Advance every playing video handle to `now_s`.
    pub fn advance_videos(&mut self, now_s: f64) {
        for binding in self.videos.values_mut() {
            if let Slot::Ready(h) = &mut binding.slot {
                h.advance(now_s);
            }
        }
    }

    /// Pause or resume every video handle.
    pub fn set_videos_playing(&mut self, playing: bool) {
        for binding in self.videos.values_mut() {
            if let Slot::Ready(h) = &mut binding.slot {
                if playing {
                    h.play();
                } else {
                    h.pause();
                }
            }
        }
    }

    fn spawn(&mut self, job: impl FnOnce() + Send + 'static) {
        self.in_flight += 1;
        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    fn apply(&mut self, completion: Completion) -> Option<MediaReady> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Image { source, result } => {
                let slot = self.images.get_mut(&source)?;
                if !matches!(slot, Slot::Pending) {
                    return None;
                }
                match result {
                    Ok(img) => {
                        *slot = Slot::Ready(img);
                        Some(MediaReady {
                            kind: MediaKind::Image,
                            source,
                            layer: None,
                        })
                    }
                    Err(e) => {
                        tracing::warn!(source = %source, error = %e, "image failed to load");
                        *slot = Slot::Failed;
                        None
                    }
                }
            }
            Completion::Video {
                layer,
                source,
                result,
            } => {
                let Some(binding) = self
                    .videos
                    .get_mut(&layer)
                    .filter(|b| b.source == source && matches!(b.slot, Slot::Pending))
                else {
                    tracing::debug!(%layer, source = %source, "discarding superseded video load");
                    return None;
                };
                match result {
                    Ok(clip) => {
                        binding.slot = Slot::Ready(VideoHandle::new(source.clone(), Arc::new(clip)));
                        Some(MediaReady {
                            kind: MediaKind::Video,
                            source,
                            layer: Some(layer),
                        })
                    }
                    Err(e) => {
                        tracing::warn!(%layer, source = %source, error = %e, "video failed to load");
                        binding.slot = Slot::Failed;
                        None
                    }
                }
            }
        }
    }
}

impl Drop for MediaStore {
    fn drop(&mut self) {
        for binding in self.videos.values_mut() {
            if let Slot::Ready(h) = &mut binding.slot {
                h.destroy();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
