//! Registry owning every avatar renderer in the scene: one optional local
//! instance plus one remote instance per participant id.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::AvatarConfig;
use crate::error::{CamspriteError, CamspriteResult};
use crate::instance::AvatarRenderer;
use crate::mask::MaskLoader;
use crate::texture::TextureFactory;

/// Stable participant identifier keying remote instances.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const LOCAL_TEXTURE_KEY: &str = "avatar:local";

fn remote_texture_key(id: &ParticipantId) -> String {
    format!("avatar:remote:{id}")
}

/// Owns the collection of [`AvatarRenderer`] instances, fans out per-tick
/// updates, and tracks the soft cap on concurrently active video instances.
///
/// The cap is advisory only: callers consult
/// [`can_add_video_stream`](Self::can_add_video_stream) before requesting a
/// new stream, but creation and attachment are never refused; exceeding the
/// cap logs a warning at creation time.
pub struct AvatarRegistry {
    config: AvatarConfig,
    textures: Arc<dyn TextureFactory>,
    loader: Arc<dyn MaskLoader>,
    local: Option<AvatarRenderer>,
    remote: HashMap<ParticipantId, AvatarRenderer>,
    destroyed: bool,
}

impl AvatarRegistry {
    pub fn new(
        config: AvatarConfig,
        textures: Arc<dyn TextureFactory>,
        loader: Arc<dyn MaskLoader>,
    ) -> CamspriteResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            textures,
            loader,
            local: None,
            remote: HashMap::new(),
            destroyed: false,
        })
    }

    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }

    /// Idempotent: returns the existing local instance when present, else
    /// constructs one.
    pub fn create_local(&mut self) -> CamspriteResult<&mut AvatarRenderer> {
        if self.destroyed {
            return Err(CamspriteError::validation(
                "cannot create instances on a destroyed registry",
            ));
        }
        if self.local.is_none() {
            self.warn_if_over_cap(LOCAL_TEXTURE_KEY);
            let renderer = AvatarRenderer::new(
                LOCAL_TEXTURE_KEY,
                &self.config,
                self.textures.as_ref(),
                Arc::clone(&self.loader),
            )?;
            self.local = Some(renderer);
        }
        self.local
            .as_mut()
            .ok_or_else(|| CamspriteError::validation("local instance missing after creation"))
    }

    pub fn local(&self) -> Option<&AvatarRenderer> {
        self.local.as_ref()
    }

    pub fn local_mut(&mut self) -> Option<&mut AvatarRenderer> {
        self.local.as_mut()
    }

    /// Idempotent get-or-create keyed by participant id: re-requesting an
    /// existing id returns the same instance.
    pub fn get_or_create_remote(
        &mut self,
        id: impl Into<ParticipantId>,
    ) -> CamspriteResult<&mut AvatarRenderer> {
        if self.destroyed {
            return Err(CamspriteError::validation(
                "cannot create instances on a destroyed registry",
            ));
        }
        let id = id.into();
        if !self.remote.contains_key(&id) {
            self.warn_if_over_cap(id.as_str());
            let renderer = AvatarRenderer::new(
                remote_texture_key(&id),
                &self.config,
                self.textures.as_ref(),
                Arc::clone(&self.loader),
            )?;
            self.remote.insert(id.clone(), renderer);
        }
        self.remote
            .get_mut(&id)
            .ok_or_else(|| CamspriteError::validation("remote instance missing after creation"))
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&AvatarRenderer> {
        self.remote.get(id)
    }

    pub fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut AvatarRenderer> {
        self.remote.get_mut(id)
    }

    /// Destroy and evict exactly one remote instance; no-op when absent.
    pub fn remove(&mut self, id: &ParticipantId) {
        if let Some(mut renderer) = self.remote.remove(id) {
            renderer.destroy();
        }
    }

    pub fn remote_count(&self) -> usize {
        self.remote.len()
    }

    /// Fan out `update` to the local instance and every remote instance.
    ///
    /// Iteration order is unspecified; instances are mutually independent.
    /// Per-instance errors are logged and do not stop the fan-out. No-op once
    /// the registry is destroyed.
    pub fn update_all(&mut self, now_ms: u64) {
        if self.destroyed {
            return;
        }
        if let Some(local) = &mut self.local
            && let Err(e) = local.update(now_ms)
        {
            tracing::warn!(key = %local.texture_key(), error = %e, "avatar update failed");
        }
        for renderer in self.remote.values_mut() {
            if let Err(e) = renderer.update(now_ms) {
                tracing::warn!(key = %renderer.texture_key(), error = %e, "avatar update failed");
            }
        }
    }

    /// Number of owned instances currently in video mode. Recomputed on
    /// demand, never cached.
    pub fn active_video_count(&self) -> usize {
        let local = usize::from(self.local.as_ref().is_some_and(AvatarRenderer::is_video_active));
        local
            + self
                .remote
                .values()
                .filter(|r| r.is_video_active())
                .count()
    }

    /// Advisory check against the soft cap; callers are expected to consult
    /// this before requesting a new stream.
    pub fn can_add_video_stream(&self) -> bool {
        self.active_video_count() < self.config.max_concurrent_video
    }

    /// Destroy the local instance and every remote instance, clear the
    /// mapping, and quiesce the registry. Idempotent.
    pub fn destroy_all(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(mut local) = self.local.take() {
            local.destroy();
        }
        for (_, mut renderer) in self.remote.drain() {
            renderer.destroy();
        }
        tracing::debug!("avatar registry destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn warn_if_over_cap(&self, who: &str) {
        let active = self.active_video_count();
        if active >= self.config.max_concurrent_video {
            tracing::warn!(
                who,
                active,
                cap = self.config.max_concurrent_video,
                "creating avatar renderer past the soft video cap"
            );
        }
    }
}
