//! Mesh file loading for cardioscope.
//!
//! [`FileLoader`] resolves a location against a base directory, reads the
//! bytes and hands them to the reader picked by extension:
//! - `.ply` goes to [`ply::read_ply`]
//! - anything else goes to the legacy VTK reader, [`vtk::read_legacy`]
//!
//! A file that parses but holds no geometry is reported as
//! [`LoadError::Empty`], distinct from fetch and parse failures.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod error;
pub mod loader;
pub mod ply;
pub mod vtk;

pub use error::{LoadError, LoadResult, ParseError};
pub use loader::{parse_bytes, DatasetLoader, FileLoader, MeshFormat};
