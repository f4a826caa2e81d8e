//! One renderer instance per visible participant: owns a sprite-sized pixel
//! buffer, a named output texture, and a hidden video sink, and decides on
//! each update whether to composite the live video frame, the cached mask
//! image, or the procedural placeholder.

use std::sync::Arc;

use crate::compositor::{draw_mask_image, draw_video_frame};
use crate::config::AvatarConfig;
use crate::error::CamspriteResult;
use crate::frame::{FrameRgba, Rgba8};
use crate::mask::{MaskImage, MaskLoadHandle, MaskLoader};
use crate::silhouette::draw_placeholder;
use crate::stream::{MediaStream, VideoSink};
use crate::texture::{OutputTexture, TextureFactory};

/// Per-participant avatar renderer.
///
/// Rendering mode is derived, not stored: video is active whenever a stream
/// with a video track is attached, and takes priority over a cached mask.
/// After [`destroy`](Self::destroy) every mutator is a silent no-op.
pub struct AvatarRenderer {
    texture_key: String,
    buffer: FrameRgba,
    texture: Box<dyn OutputTexture>,
    sink: VideoSink,
    cached_mask: Option<MaskImage>,
    pending_mask: Option<MaskLoadHandle>,
    loader: Arc<dyn MaskLoader>,
    frame_interval_ms: u64,
    background: Rgba8,
    last_frame_ms: Option<u64>,
    destroyed: bool,
}

impl AvatarRenderer {
    /// Allocate the destination buffer and output texture and draw the
    /// placeholder so the texture is never left undefined.
    ///
    /// Texture allocation failure is fatal: it signals an unrecoverable
    /// environment precondition, not a runtime condition to recover from.
    pub fn new(
        texture_key: impl Into<String>,
        config: &AvatarConfig,
        textures: &dyn TextureFactory,
        loader: Arc<dyn MaskLoader>,
    ) -> CamspriteResult<Self> {
        config.validate()?;
        let texture_key = texture_key.into();
        let texture = textures.create(&texture_key, config.sprite_size)?;

        let mut renderer = Self {
            texture_key,
            buffer: FrameRgba::new(config.sprite_size),
            texture,
            sink: VideoSink::default(),
            cached_mask: None,
            pending_mask: None,
            loader,
            frame_interval_ms: config.frame_interval_ms,
            background: config.background,
            last_frame_ms: None,
            destroyed: false,
        };
        renderer.redraw_placeholder()?;
        tracing::debug!(key = %renderer.texture_key, "avatar renderer created");
        Ok(renderer)
    }

    /// Attach or detach a media stream.
    ///
    /// A stream with at least one video track attaches to the sink and begins
    /// playback (start failure is logged and non-fatal). Anything else
    /// detaches, and the cached mask — or the placeholder — is redrawn
    /// immediately, outside the throttle window.
    pub fn set_stream(&mut self, stream: Option<MediaStream>) -> CamspriteResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.pump_mask_load()?;

        match stream.and_then(MediaStream::take_video_track) {
            Some(source) => {
                self.sink.attach(source);
                Ok(())
            }
            None => {
                self.sink.detach();
                self.redraw_non_video()
            }
        }
    }

    /// Replace or clear the mask image.
    ///
    /// `Some(url)` begins an asynchronous load; the outcome is applied at the
    /// next pump point (`update` tick or `set_stream` call). `None` clears the
    /// cached mask and any in-flight load, and redraws the placeholder when
    /// video is not active.
    pub fn set_mask_image(&mut self, url: Option<&str>) -> CamspriteResult<()> {
        if self.destroyed {
            return Ok(());
        }
        match url {
            Some(url) => {
                // replaces any load still in flight
                self.pending_mask = Some(self.loader.load(url));
                Ok(())
            }
            None => {
                self.cached_mask = None;
                self.pending_mask = None;
                if !self.is_video_active() {
                    self.redraw_placeholder()?;
                }
                Ok(())
            }
        }
    }

    /// Per-tick update with the scene's monotonic timestamp in milliseconds.
    ///
    /// Pumps any completed mask load, then runs the throttled video redraw:
    /// at most one compositor pass per `frame_interval_ms` window, skipped
    /// silently while the source reports zero dimensions or no frame yet.
    pub fn update(&mut self, now_ms: u64) -> CamspriteResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.pump_mask_load()?;

        if !self.is_video_active() {
            return Ok(());
        }
        if let Some(last) = self.last_frame_ms
            && now_ms.saturating_sub(last) < self.frame_interval_ms
        {
            return Ok(());
        }
        self.last_frame_ms = Some(now_ms);

        let (w, h) = self.sink.dimensions();
        if w == 0 || h == 0 {
            // source not ready yet; counted as handled
            return Ok(());
        }
        let Some(frame) = self.sink.current_frame() else {
            return Ok(());
        };
        draw_video_frame(&mut self.buffer, &frame)?;
        self.texture.upload(&self.buffer)
    }

    /// Tear down the instance: detach the sink, drop the cached mask and any
    /// in-flight load, release the texture. Idempotent; every call after the
    /// first is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.sink.detach();
        self.cached_mask = None;
        self.pending_mask = None;
        self.texture.release();
        tracing::debug!(key = %self.texture_key, "avatar renderer destroyed");
    }

    /// Key of the output texture bound to this instance.
    pub fn texture_key(&self) -> &str {
        &self.texture_key
    }

    /// True while a stream with a video track is attached.
    pub fn is_video_active(&self) -> bool {
        !self.destroyed && self.sink.is_attached()
    }

    /// True while a mask load is in flight.
    pub fn is_mask_loading(&self) -> bool {
        self.pending_mask.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Observe a completed mask load, if any. The destroyed check lives here,
    /// so a completion arriving after teardown is discarded without touching
    /// state.
    fn pump_mask_load(&mut self) -> CamspriteResult<()> {
        if self.destroyed {
            self.pending_mask = None;
            return Ok(());
        }
        let Some(result) = self.pending_mask.as_ref().and_then(MaskLoadHandle::poll) else {
            return Ok(());
        };
        self.pending_mask = None;

        match result {
            Ok(img) => {
                self.cached_mask = Some(img);
                if !self.is_video_active() {
                    self.redraw_non_video()?;
                }
            }
            Err(e) => {
                tracing::warn!(key = %self.texture_key, error = %e, "mask load failed");
                self.cached_mask = None;
                if !self.is_video_active() {
                    self.redraw_placeholder()?;
                }
            }
        }
        Ok(())
    }

    /// Redraw the non-video output: cached mask when present, else placeholder.
    fn redraw_non_video(&mut self) -> CamspriteResult<()> {
        match &self.cached_mask {
            Some(mask) => {
                draw_mask_image(&mut self.buffer, mask, self.background);
                self.texture.upload(&self.buffer)
            }
            None => self.redraw_placeholder(),
        }
    }

    fn redraw_placeholder(&mut self) -> CamspriteResult<()> {
        draw_placeholder(&mut self.buffer, self.background);
        self.texture.upload(&self.buffer)
    }
}
