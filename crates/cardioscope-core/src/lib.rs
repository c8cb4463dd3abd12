//! Core data model for cardioscope.
//!
//! This crate holds everything the mesh-loading pipeline needs that does not
//! touch a file or a GPU:
//! - [`MeshDataset`] with its point/cell topology and named scalar fields
//! - [`MeshTable`], which resolves mesh identifiers to file locations
//! - [`compute_mapping`], the scalar-range color mapper
//! - [`generate_fallback`], the placeholder cone
//! - [`VisualObject`] and [`Light`], the state handed to a display
//! - [`ViewerConfig`], the configuration injected at startup

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
// Mesh sizes and bucket counts convert between usize and float freely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod color;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fallback;
pub mod mapping;
pub mod resolver;
pub mod visual;

pub use color::{ColorTransferFunction, ControlPoint, Rgb, ScalarRange};
pub use config::{ColorPreset, LightPreset, MaterialPreset, ViewerConfig, WindowConfig};
pub use dataset::{
    CellArray, CellKind, DataArray, FieldData, MeshDataset, ScalarType,
};
pub use error::{CoreError, Result};
pub use fallback::{generate_fallback, ConeParams, FALLBACK_SCALARS_NAME};
pub use mapping::{active_cell_scalars, compute_mapping};
pub use resolver::{MeshId, MeshTable};
pub use visual::{DatasetSource, Light, Property, Representation, VisualObject};

// Re-export glam types for convenience
pub use glam::Vec3;
