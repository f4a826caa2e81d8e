//! Mask images and their asynchronous loading seam.
//!
//! Loads complete through a pollable [`MaskLoadHandle`] rather than a callback:
//! the owning renderer observes completions at its next pump point, and a
//! handle outliving its renderer is simply dropped. That keeps cancellation
//! cooperative under any concurrency model.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;

use base64::Engine as _;

use crate::error::{CamspriteError, CamspriteResult};
use crate::frame::{Canvas, Rgba8};

/// Decoded mask image in straight RGBA8 form.
#[derive(Clone, Debug)]
pub struct MaskImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight-alpha RGBA8.
    pub rgba8: Arc<Vec<u8>>,
}

impl MaskImage {
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Read one pixel, clamping out-of-range coordinates to the edge.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        let cx = x.min(self.width.saturating_sub(1));
        let cy = y.min(self.height.saturating_sub(1));
        let i = ((cy * self.width + cx) as usize) * 4;
        Rgba8 {
            r: self.rgba8[i],
            g: self.rgba8[i + 1],
            b: self.rgba8[i + 2],
            a: self.rgba8[i + 3],
        }
    }
}

/// Starts asynchronous mask loads identified by URL.
pub trait MaskLoader: Send + Sync {
    /// Begin loading `url`. The returned handle resolves exactly once.
    fn load(&self, url: &str) -> MaskLoadHandle;
}

/// Resolving end of a pending mask load.
pub struct MaskResolver {
    tx: mpsc::Sender<CamspriteResult<MaskImage>>,
}

impl MaskResolver {
    /// Deliver the load outcome. Delivery to an already-dropped handle is a
    /// silent no-op.
    pub fn resolve(self, result: CamspriteResult<MaskImage>) {
        let _ = self.tx.send(result);
    }
}

/// Pollable completion of one mask load.
pub struct MaskLoadHandle {
    rx: mpsc::Receiver<CamspriteResult<MaskImage>>,
}

impl MaskLoadHandle {
    /// A load that is still in flight; resolve it through the returned
    /// [`MaskResolver`].
    pub fn pending() -> (MaskResolver, MaskLoadHandle) {
        let (tx, rx) = mpsc::channel();
        (MaskResolver { tx }, MaskLoadHandle { rx })
    }

    /// A load that already finished with `result`.
    pub fn ready(result: CamspriteResult<MaskImage>) -> Self {
        let (resolver, handle) = Self::pending();
        resolver.resolve(result);
        handle
    }

    /// Non-blocking completion check. Returns `None` while the load is still
    /// in flight. A resolver dropped without resolving reports as a failure.
    pub fn poll(&self) -> Option<CamspriteResult<MaskImage>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(CamspriteError::mask(
                "mask load abandoned before resolving",
            ))),
        }
    }
}

/// Built-in loader for `data:` URLs (in-memory uploaded masks) and filesystem
/// paths. Decoding happens inline; the completion is still observed through
/// the handle at the caller's next pump point.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataUrlLoader;

impl MaskLoader for DataUrlLoader {
    fn load(&self, url: &str) -> MaskLoadHandle {
        MaskLoadHandle::ready(decode_url(url))
    }
}

fn decode_url(url: &str) -> CamspriteResult<MaskImage> {
    if let Some(rest) = url.strip_prefix("data:") {
        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| CamspriteError::mask("data url has no comma separator"))?;
        if !meta.ends_with(";base64") {
            return Err(CamspriteError::mask("data url must be base64-encoded"));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| CamspriteError::mask(format!("data url base64 decode failed: {e}")))?;
        decode_bytes(&bytes)
    } else {
        decode_file(Path::new(url))
    }
}

fn decode_bytes(bytes: &[u8]) -> CamspriteResult<MaskImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CamspriteError::mask(format!("mask image decode failed: {e}")))?;
    Ok(from_dynamic(img))
}

fn decode_file(path: &Path) -> CamspriteResult<MaskImage> {
    let reader = image::ImageReader::open(path)
        .map_err(|e| CamspriteError::mask(format!("mask open failed for '{}': {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| CamspriteError::mask(format!("mask format probe failed: {e}")))?;
    let img = reader
        .decode()
        .map_err(|e| CamspriteError::mask(format!("mask decode failed for '{}': {e}", path.display())))?;
    Ok(from_dynamic(img))
}

fn from_dynamic(img: image::DynamicImage) -> MaskImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    MaskImage {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    }
}
