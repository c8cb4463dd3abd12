//! cardioscope: a viewer for cardiac meshes colored by a per-cell scalar field.
//!
//! The [`Viewer`] runs the load pipeline: a mesh id is resolved to a file
//! location, the file is loaded, a color lookup is derived from its first
//! cell array and the result is pushed to a [`Display`]. Files that hold no
//! geometry are replaced by a placeholder cone.
//!
//! # Quick Start
//!
//! ```no_run
//! use cardioscope::{FileLoader, RecordingDisplay, UnavailableXr, Viewer, ViewerConfig};
//!
//! let config = ViewerConfig::default();
//! let loader = FileLoader::new(config.base_dir.clone());
//! let mut viewer = Viewer::new(config, RecordingDisplay::new(), Box::new(UnavailableXr));
//! let outcome = pollster::block_on(viewer.load_mesh(0, true, &loader));
//! println!("{outcome:?}\n{}", viewer.display().summary());
//! ```

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod app;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod ui;
pub mod viewer;
pub mod xr;

pub use cardioscope_core::{MeshDataset, MeshId, Representation, Vec3, ViewerConfig};
pub use cardioscope_io::{DatasetLoader, FileLoader, LoadError, LoadResult};
pub use cardioscope_render::{Display, RecordingDisplay, RenderEngine};

pub use app::{run, AppEvent};
pub use error::{Result, ViewerError};
pub use pipeline::{apply, LoadOutcome};
pub use state::{LoadRequest, LoadTicket, ViewerState};
pub use ui::{key_to_event, UiAction, UiEvent, OPACITY_STEPS, RETURN_FROM_VR, SEND_TO_VR};
pub use viewer::Viewer;
pub use xr::{UnavailableXr, XrError, XrSession, XrSessionKind};
