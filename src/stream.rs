//! Media streams and the per-renderer video sink.

use crate::error::CamspriteResult;
use crate::frame::FrameRgba;

/// A live video source, e.g. a camera capture backend.
///
/// Sources report `(0, 0)` dimensions until they are ready; the renderer
/// handles that defensively and simply produces no frames until dimensions
/// become valid.
pub trait VideoSource: Send {
    /// Begin playback. Failure is non-fatal for the renderer: it stays in
    /// video mode and waits for frames.
    fn start(&mut self) -> CamspriteResult<()>;

    /// Stop playback and release capture resources.
    fn stop(&mut self);

    /// Current source dimensions, `(0, 0)` while not ready.
    fn dimensions(&self) -> (u32, u32);

    /// Copy of the most recent frame, `None` while no frame is available.
    fn current_frame(&self) -> Option<FrameRgba>;
}

/// One track of a media stream. Only video tracks are consumed here; audio
/// tracks are carried opaquely for the host.
pub enum MediaTrack {
    /// A usable video track.
    Video(Box<dyn VideoSource>),
    /// An audio track, ignored by the avatar pipeline.
    Audio,
}

/// A media stream as handed over by the host, inspected only for the presence
/// of a usable video track.
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    /// Convenience constructor for a single-video-track stream.
    pub fn from_video(source: Box<dyn VideoSource>) -> Self {
        Self {
            tracks: vec![MediaTrack::Video(source)],
        }
    }

    /// A stream with no tracks at all.
    pub fn empty() -> Self {
        Self { tracks: Vec::new() }
    }

    /// Whether at least one video track is present.
    pub fn has_video_track(&self) -> bool {
        self.tracks
            .iter()
            .any(|t| matches!(t, MediaTrack::Video(_)))
    }

    /// Extract the first video track, consuming the stream.
    pub(crate) fn take_video_track(self) -> Option<Box<dyn VideoSource>> {
        self.tracks.into_iter().find_map(|t| match t {
            MediaTrack::Video(source) => Some(source),
            MediaTrack::Audio => None,
        })
    }
}

/// The renderer's hidden video sink: owns at most one attached source and
/// mediates playback start/stop.
#[derive(Default)]
pub(crate) struct VideoSink {
    source: Option<Box<dyn VideoSource>>,
}

impl VideoSink {
    /// Attach a source and begin playback. A playback-start failure is logged
    /// and the source stays attached; frames arrive whenever the source
    /// recovers.
    pub(crate) fn attach(&mut self, mut source: Box<dyn VideoSource>) {
        self.detach();
        if let Err(e) = source.start() {
            tracing::warn!(error = %e, "video playback start failed, waiting for frames");
        }
        self.source = Some(source);
    }

    /// Stop and drop the attached source, if any.
    pub(crate) fn detach(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.stop();
        }
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.source.is_some()
    }

    /// Dimensions of the attached source, `(0, 0)` when detached or not ready.
    pub(crate) fn dimensions(&self) -> (u32, u32) {
        self.source.as_ref().map_or((0, 0), |s| s.dimensions())
    }

    pub(crate) fn current_frame(&self) -> Option<FrameRgba> {
        self.source.as_ref().and_then(|s| s.current_frame())
    }
}
