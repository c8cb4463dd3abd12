//! Asynchronous dataset loading.

use std::future::Future;
use std::path::{Path, PathBuf};

use cardioscope_core::MeshDataset;

use crate::error::{LoadError, LoadResult, ParseError};
use crate::{ply, vtk};

/// File formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    LegacyVtk,
    Ply,
}

impl MeshFormat {
    /// Picks the format from a location's extension. Unknown extensions are
    /// read as legacy VTK.
    pub fn from_location(location: &str) -> Self {
        let ext = Path::new(location)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ply") => Self::Ply,
            _ => Self::LegacyVtk,
        }
    }
}

/// Parses an in-memory file.
///
/// A file that parses but yields no geometry is reported as
/// [`LoadError::Empty`].
pub fn parse_bytes(location: &str, bytes: &[u8]) -> LoadResult<MeshDataset> {
    let parsed = match MeshFormat::from_location(location) {
        MeshFormat::LegacyVtk => vtk::read_legacy(bytes),
        MeshFormat::Ply => ply::read_ply(bytes),
    };
    parsed
        .map_err(|e: ParseError| e.at(location))?
        .ok_or_else(|| LoadError::Empty {
            location: location.to_string(),
        })
}

/// Source of mesh datasets, addressed by location strings.
pub trait DatasetLoader {
    /// Fetches and parses the dataset at `location`.
    fn load(&self, location: &str) -> impl Future<Output = LoadResult<MeshDataset>> + Send;
}

/// Loads mesh files from disk, resolving relative locations against a base
/// directory.
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_dir: PathBuf,
}

impl FileLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path a location resolves to.
    pub fn path_for(&self, location: &str) -> PathBuf {
        self.base_dir.join(location)
    }
}

impl Default for FileLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DatasetLoader for FileLoader {
    async fn load(&self, location: &str) -> LoadResult<MeshDataset> {
        let path = self.path_for(location);
        log::info!("Starting to load {}", path.display());

        let bytes = std::fs::read(&path).map_err(|source| LoadError::Fetch {
            location: location.to_string(),
            source,
        })?;
        let dataset = parse_bytes(location, &bytes)?;

        log::info!(
            "Finished loading {}: {} points, {} cells",
            path.display(),
            dataset.num_points(),
            dataset.num_cells()
        );
        Ok(dataset)
    }
}
