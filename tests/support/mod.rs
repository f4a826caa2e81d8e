//! Shared test doubles: a scriptable video source and a manually-resolved
//! mask loader.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use camsprite::error::CamspriteResult;
use camsprite::{
    Canvas, FrameRgba, MaskImage, MaskLoadHandle, MaskLoader, MaskResolver, MediaStream, Rgba8,
    VideoSource,
};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Default)]
struct ScriptedState {
    dimensions: (u32, u32),
    frame: Option<FrameRgba>,
    started: u32,
    stopped: u32,
    fail_start: bool,
}

/// Handle to a scriptable video source; the boxed source shares state with the
/// handle so tests can flip dimensions/frames after attachment.
#[derive(Clone, Default)]
pub struct ScriptedSourceHandle {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedSourceHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start() -> Self {
        let handle = Self::default();
        handle.state.lock().unwrap().fail_start = true;
        handle
    }

    /// Install a current frame and report its dimensions as ready.
    pub fn set_frame(&self, frame: FrameRgba) {
        let mut st = self.state.lock().unwrap();
        st.dimensions = (frame.width, frame.height);
        st.frame = Some(frame);
    }

    /// Report dimensions without providing a frame.
    pub fn set_dimensions(&self, width: u32, height: u32) {
        self.state.lock().unwrap().dimensions = (width, height);
    }

    pub fn started(&self) -> u32 {
        self.state.lock().unwrap().started
    }

    pub fn stopped(&self) -> u32 {
        self.state.lock().unwrap().stopped
    }

    pub fn source(&self) -> Box<dyn VideoSource> {
        Box::new(ScriptedSource {
            state: Arc::clone(&self.state),
        })
    }

    pub fn stream(&self) -> MediaStream {
        MediaStream::from_video(self.source())
    }
}

struct ScriptedSource {
    state: Arc<Mutex<ScriptedState>>,
}

impl VideoSource for ScriptedSource {
    fn start(&mut self) -> CamspriteResult<()> {
        let mut st = self.state.lock().unwrap();
        st.started += 1;
        if st.fail_start {
            return Err(camsprite::CamspriteError::stream("scripted start failure"));
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.state.lock().unwrap().stopped += 1;
    }

    fn dimensions(&self) -> (u32, u32) {
        self.state.lock().unwrap().dimensions
    }

    fn current_frame(&self) -> Option<FrameRgba> {
        self.state.lock().unwrap().frame.clone()
    }
}

/// Loader whose loads stay pending until the test resolves them.
#[derive(Clone, Default)]
pub struct ManualMaskLoader {
    pending: Arc<Mutex<Vec<(String, MaskResolver)>>>,
}

impl ManualMaskLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_urls(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Resolve the oldest pending load. Panics when none is pending.
    pub fn resolve_next(&self, result: CamspriteResult<MaskImage>) {
        let (_, resolver) = self.pending.lock().unwrap().remove(0);
        resolver.resolve(result);
    }
}

impl MaskLoader for ManualMaskLoader {
    fn load(&self, url: &str) -> MaskLoadHandle {
        let (resolver, handle) = MaskLoadHandle::pending();
        self.pending.lock().unwrap().push((url.to_string(), resolver));
        handle
    }
}

pub fn solid_frame(width: u32, height: u32, color: Rgba8) -> FrameRgba {
    let mut frame = FrameRgba::new(Canvas::new(width, height).unwrap());
    frame.fill(color);
    frame
}

pub fn solid_mask(width: u32, height: u32, color: Rgba8) -> MaskImage {
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..(width * height) {
        bytes.extend_from_slice(&color.to_array());
    }
    MaskImage {
        width,
        height,
        rgba8: Arc::new(bytes),
    }
}

/// The exact frame a freshly constructed renderer uploads.
pub fn expected_placeholder(sprite: Canvas, background: Rgba8) -> FrameRgba {
    let mut frame = FrameRgba::new(sprite);
    camsprite::silhouette::draw_placeholder(&mut frame, background);
    frame
}
