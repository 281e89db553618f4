#[cfg(feature = "media-ffmpeg")]
use crate::assets::decode::PreparedImage;
use crate::assets::video::VideoClip;
use crate::foundation::error::{LayercastError, LayercastResult};

/// Stream facts reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Path or URL handed to ffmpeg.
    pub source: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame-rate numerator.
    pub fps_num: u32,
    /// Frame-rate denominator.
    pub fps_den: u32,
    /// Container duration, `0.0` when unknown.
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    /// Frame rate as a float, `0.0` for a zero denominator.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }
}

/// Probe a video path or URL with `ffprobe`.
#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source: &str) -> LayercastResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source)
        .output()
        .map_err(|e| LayercastError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(LayercastError::media(format!(
            "ffprobe failed for '{source}': {}",
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| LayercastError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| LayercastError::media("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| LayercastError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| LayercastError::media("missing video height from ffprobe"))?;
    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| LayercastError::media("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source: source.to_string(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

/// Probe a video path or URL. Always fails without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source: &str) -> LayercastResult<VideoSourceInfo> {
    Err(LayercastError::media(
        "video layers require the 'media-ffmpeg' feature",
    ))
}

/// Decode size for a `width`x`height` stream with the longer edge capped at `max_edge`.
///
/// Keeps the aspect ratio and never upscales. `max_edge = 0` disables the cap.
pub fn fit_decode_size(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let long = width.max(height);
    if max_edge == 0 || long <= max_edge {
        return (width, height);
    }
    let factor = f64::from(max_edge) / f64::from(long);
    let fit = |v: u32| ((f64::from(v) * factor).round() as u32).clamp(1, max_edge);
    (fit(width), fit(height))
}

/// Bytes in one RGBA8 frame, `None` for an empty or overflowing size.
pub fn rgba_frame_len(width: u32, height: u32) -> Option<usize> {
    let len = (width as usize).checked_mul(height as usize)?.checked_mul(4)?;
    (len > 0).then_some(len)
}

/// Decode up to `max_frames` frames from the start of `source` into a looping clip.
///
/// Frames are scaled so the longer edge is at most `max_edge` and read from the ffmpeg pipe one at
/// a time.
#[cfg(feature = "media-ffmpeg")]
pub fn decode_video_clip(
    source: &str,
    max_frames: u32,
    max_edge: u32,
) -> LayercastResult<VideoClip> {
    use std::io::Read as _;
    use std::process::{Command, Stdio};

    let info = probe_video(source)?;
    let fps = info.source_fps();
    if !(fps.is_finite() && fps > 0.0) {
        return Err(LayercastError::media(format!(
            "video '{source}' reports no usable frame rate"
        )));
    }
    let (width, height) = fit_decode_size(info.width, info.height, max_edge);
    let frame_len = rgba_frame_len(width, height).ok_or_else(|| {
        LayercastError::media("decoded video frame size is zero (invalid source dimensions)")
    })?;

    let mut child = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(source)
        .args(["-an", "-frames:v", &max_frames.max(1).to_string()])
        .arg("-vf")
        .arg(format!("scale={width}:{height}"))
        .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            LayercastError::media(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| LayercastError::media("failed to open ffmpeg stdout (unexpected)"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| LayercastError::media("failed to open ffmpeg stderr (unexpected)"))?;
    let stderr_drain = std::thread::spawn(move || {
        let mut stderr_bytes = Vec::new();
        stderr.read_to_end(&mut stderr_bytes).map(|_| stderr_bytes)
    });

    let mut frames = Vec::new();
    let collected = loop {
        let mut raw = vec![0u8; frame_len];
        match read_frame(&mut stdout, &mut raw) {
            Ok(true) => match PreparedImage::from_straight_rgba8(width, height, raw) {
                Ok(frame) => frames.push(frame),
                Err(e) => break Err(e),
            },
            Ok(false) => break Ok(()),
            Err(e) => {
                break Err(LayercastError::media(format!(
                    "failed to read decoded video from ffmpeg: {e}"
                )));
            }
        }
    };
    drop(stdout);

    let status = child.wait().map_err(|e| {
        LayercastError::media(format!("failed to wait for ffmpeg to finish: {e}"))
    })?;
    let stderr_bytes = stderr_drain
        .join()
        .map_err(|_| LayercastError::media("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| LayercastError::media(format!("ffmpeg stderr read failed: {e}")))?;
    if !status.success() {
        return Err(LayercastError::media(format!(
            "ffmpeg video decode failed for '{source}': {}",
            String::from_utf8_lossy(&stderr_bytes).trim()
        )));
    }
    collected?;

    tracing::debug!(source, frames = frames.len(), width, height, fps, "decoded video clip");
    VideoClip::new(fps, frames)
}

/// Decode a looping clip. Always fails without the `media-ffmpeg` feature.
#[cfg(not(feature = "media-ffmpeg"))]
pub fn decode_video_clip(
    _source: &str,
    _max_frames: u32,
    _max_edge: u32,
) -> LayercastResult<VideoClip> {
    Err(LayercastError::media(
        "video layers require the 'media-ffmpeg' feature",
    ))
}

/// Fill `buf` from `r`. `Ok(false)` when the stream ends before the first byte.
#[cfg(any(feature = "media-ffmpeg", test))]
fn read_frame(r: &mut impl std::io::Read, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("truncated frame: {filled} of {} bytes", buf.len()),
                ));
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
