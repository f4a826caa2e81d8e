use crate::error::{CamspriteError, CamspriteResult};
use crate::frame::{Canvas, Rgba8};

/// Configuration for the avatar rendering pipeline.
///
/// Constructed explicitly by the host and passed to [`crate::AvatarRegistry::new`];
/// there is no module-level or process-wide state in this crate.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct AvatarConfig {
    /// Output sprite size. Matches the scene's character sprite dimensions.
    pub sprite_size: Canvas,
    /// Minimum time between successive video redraws, in milliseconds.
    pub frame_interval_ms: u64,
    /// Soft cap on simultaneously active video instances. Advisory only:
    /// exceeding it logs a warning but never blocks creation or attachment.
    pub max_concurrent_video: usize,
    /// Neutral background behind the placeholder and letterboxed masks.
    pub background: Rgba8,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            sprite_size: Canvas {
                width: 32,
                height: 32,
            },
            // ~15 redraws per second.
            frame_interval_ms: 66,
            max_concurrent_video: 8,
            background: Rgba8::opaque(0x4a, 0x4a, 0x4a),
        }
    }
}

impl AvatarConfig {
    /// Parse a config from JSON text and validate it.
    pub fn from_json(text: &str) -> CamspriteResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| CamspriteError::validation(format!("config json parse failed: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> CamspriteResult<()> {
        if self.sprite_size.width == 0 || self.sprite_size.height == 0 {
            return Err(CamspriteError::validation(
                "sprite_size dimensions must be > 0",
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(CamspriteError::validation("frame_interval_ms must be > 0"));
        }
        Ok(())
    }
}
