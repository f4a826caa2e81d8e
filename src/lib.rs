//! Camsprite substitutes a participant's avatar sprite with a live camera
//! feed (cover fit), a static mask image (contain fit), or a deterministic
//! procedural placeholder, composited into a small fixed-size CPU texture for
//! a multiplayer scene renderer.
//!
//! The host constructs an [`AvatarConfig`], a [`TextureFactory`] bound to its
//! rendering engine, and a [`MaskLoader`], wires them into an
//! [`AvatarRegistry`], and calls [`AvatarRegistry::update_all`] once per
//! rendering tick. Everything runs single-threaded and cooperatively;
//! asynchronous mask loads complete through pollable handles observed on the
//! driving thread.
#![forbid(unsafe_code)]

pub mod compositor;
pub mod config;
pub mod error;
pub mod fit;
pub mod frame;
pub mod instance;
pub mod mask;
pub mod registry;
pub mod silhouette;
pub mod stream;
pub mod texture;

pub use config::AvatarConfig;
pub use error::{CamspriteError, CamspriteResult};
pub use frame::{Canvas, FrameRgba, Rgba8};
pub use instance::AvatarRenderer;
pub use mask::{DataUrlLoader, MaskImage, MaskLoadHandle, MaskLoader, MaskResolver};
pub use registry::{AvatarRegistry, ParticipantId};
pub use stream::{MediaStream, MediaTrack, VideoSource};
pub use texture::{MemoryTextureFactory, OutputTexture, TextureFactory};
