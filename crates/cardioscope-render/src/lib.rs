//! Display backends for cardioscope.
//!
//! The load pipeline talks to a [`Display`]; this crate provides two:
//! - [`RecordingDisplay`], which keeps the scene in memory and logs every call
//! - [`RenderEngine`], a wgpu renderer for a window or an offscreen target
//!
//! plus the [`Camera`] and frame-saving helpers the engine uses.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod camera;
pub mod display;
pub mod engine;
pub mod error;
pub mod mesh_render;
pub mod recording;
pub mod screenshot;

pub use camera::Camera;
pub use display::Display;
pub use engine::{RenderEngine, SceneUniforms, MAX_LIGHTS};
pub use error::{RenderError, RenderResult};
pub use mesh_render::{MeshGeometry, MeshVertex};
pub use recording::{ActorSnapshot, DisplayCall, RecordingDisplay};
pub use screenshot::{save_image, save_to_buffer, ScreenshotError};
