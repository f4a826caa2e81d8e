//! Engine texture seam: named, fixed-size, CPU-writable output textures.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{CamspriteError, CamspriteResult};
use crate::frame::{Canvas, FrameRgba};

/// One named output texture owned by a single renderer instance.
pub trait OutputTexture: Send {
    /// Stable texture key as allocated.
    fn key(&self) -> &str;

    /// Push a full frame into the texture. The frame must match the allocated
    /// dimensions.
    fn upload(&mut self, frame: &FrameRgba) -> CamspriteResult<()>;

    /// Remove the texture from the engine. Idempotent.
    fn release(&mut self);
}

/// Allocates named output textures. Allocation failure is fatal for renderer
/// construction.
pub trait TextureFactory: Send + Sync {
    /// Allocate a texture under a unique key. A duplicate key is an error.
    fn create(&self, key: &str, canvas: Canvas) -> CamspriteResult<Box<dyn OutputTexture>>;
}

#[derive(Default)]
struct TextureStore {
    slots: HashMap<String, TextureSlot>,
    // Survives release so callers can still inspect redraw counts afterwards.
    upload_counts: HashMap<String, u64>,
}

struct TextureSlot {
    canvas: Canvas,
    pixels: Vec<u8>,
}

/// In-memory CPU texture store.
///
/// Serves as the host binding for engines that consume CPU pixel data and as
/// the observable backend in tests: `snapshot` returns the last-uploaded
/// pixels and `upload_count` the number of redraws pushed to a key.
#[derive(Clone, Default)]
pub struct MemoryTextureFactory {
    store: Arc<Mutex<TextureStore>>,
}

impl MemoryTextureFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a texture currently exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.store
            .lock()
            .map(|s| s.slots.contains_key(key))
            .unwrap_or(false)
    }

    /// Copy of the current pixel contents of `key`, if allocated.
    pub fn snapshot(&self, key: &str) -> Option<FrameRgba> {
        let store = self.store.lock().ok()?;
        let slot = store.slots.get(key)?;
        FrameRgba::from_pixels(slot.canvas, slot.pixels.clone()).ok()
    }

    /// Total uploads ever pushed to `key`, including after release.
    pub fn upload_count(&self, key: &str) -> u64 {
        self.store
            .lock()
            .map(|s| s.upload_counts.get(key).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl TextureFactory for MemoryTextureFactory {
    fn create(&self, key: &str, canvas: Canvas) -> CamspriteResult<Box<dyn OutputTexture>> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| CamspriteError::texture("texture store lock poisoned"))?;
        if store.slots.contains_key(key) {
            return Err(CamspriteError::texture(format!(
                "texture key '{key}' already allocated"
            )));
        }
        store.slots.insert(
            key.to_string(),
            TextureSlot {
                canvas,
                pixels: vec![0u8; canvas.byte_len()],
            },
        );
        Ok(Box::new(MemoryTexture {
            key: key.to_string(),
            canvas,
            store: Arc::clone(&self.store),
            released: false,
        }))
    }
}

struct MemoryTexture {
    key: String,
    canvas: Canvas,
    store: Arc<Mutex<TextureStore>>,
    released: bool,
}

impl OutputTexture for MemoryTexture {
    fn key(&self) -> &str {
        &self.key
    }

    fn upload(&mut self, frame: &FrameRgba) -> CamspriteResult<()> {
        if self.released {
            return Err(CamspriteError::texture("upload to released texture"));
        }
        if frame.canvas() != self.canvas {
            return Err(CamspriteError::texture(format!(
                "upload size {}x{} does not match texture {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        let mut store = self
            .store
            .lock()
            .map_err(|_| CamspriteError::texture("texture store lock poisoned"))?;
        let slot = store
            .slots
            .get_mut(&self.key)
            .ok_or_else(|| CamspriteError::texture("texture slot missing"))?;
        slot.pixels.copy_from_slice(&frame.rgba8);
        *store.upload_counts.entry(self.key.clone()).or_insert(0) += 1;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Ok(mut store) = self.store.lock() {
            store.slots.remove(&self.key);
        }
    }
}
