//! The displayed object and scene lights.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::{ColorTransferFunction, Rgb, ScalarRange};
use crate::config::MaterialPreset;
use crate::dataset::MeshDataset;

/// How the visual object's cells are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Representation {
    /// Only the points.
    Points,
    /// Cell edges.
    Wireframe,
    /// Filled polygons.
    #[default]
    Surface,
}

impl Representation {
    /// Converts the representation selector value (0 points, 1 wireframe,
    /// 2 surface). Other values are rejected.
    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Points),
            1 => Some(Self::Wireframe),
            2 => Some(Self::Surface),
            _ => None,
        }
    }

    /// Returns the selector value for this representation.
    pub fn to_index(self) -> u32 {
        match self {
            Self::Points => 0,
            Self::Wireframe => 1,
            Self::Surface => 2,
        }
    }

    /// Returns display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Wireframe => "Wireframe",
            Self::Surface => "Surface",
        }
    }
}

/// Surface appearance of the visual object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Property {
    pub representation: Representation,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Specular coefficient in `[0, 1]`.
    pub specular: f32,
    /// Specular exponent.
    pub specular_power: f32,
    /// Color used when no scalar mapping is installed.
    pub diffuse_color: Rgb,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            representation: Representation::Surface,
            opacity: 1.0,
            specular: 0.0,
            specular_power: 1.0,
            diffuse_color: Vec3::ONE,
        }
    }
}

impl Property {
    /// Sets the opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Copies the specular settings and base color of a material preset.
    pub fn apply_material(&mut self, material: &MaterialPreset) {
        self.specular = material.specular;
        self.specular_power = material.specular_power;
        self.diffuse_color = material.diffuse_color;
    }
}

/// Where the visual object's geometry came from.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetSource {
    /// A dataset read from a mesh file.
    Loaded(MeshDataset),
    /// A placeholder produced by the fallback generator.
    Synthesized(MeshDataset),
}

impl DatasetSource {
    /// Returns the dataset regardless of origin.
    pub fn dataset(&self) -> &MeshDataset {
        match self {
            Self::Loaded(ds) | Self::Synthesized(ds) => ds,
        }
    }

    /// Returns true for the fallback placeholder.
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Self::Synthesized(_))
    }
}

/// A positional light pointed at a focal point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub focal_point: Vec3,
    pub intensity: f32,
    pub color: Rgb,
}

impl Light {
    /// Unit vector from the light toward its focal point.
    pub fn direction(&self) -> Vec3 {
        (self.focal_point - self.position).normalize_or_zero()
    }
}

/// The single displayed object. Mutated in place on every load.
#[derive(Debug, Clone, Default)]
pub struct VisualObject {
    source: Option<DatasetSource>,
    mapping: Option<ColorTransferFunction>,
    position: Vec3,
    property: Property,
    revision: u64,
}

impl VisualObject {
    /// Creates an empty visual object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the geometry source. Bumps the revision.
    pub fn set_source(&mut self, source: DatasetSource) {
        self.source = Some(source);
        self.revision += 1;
    }

    /// Returns the geometry source.
    pub fn source(&self) -> Option<&DatasetSource> {
        self.source.as_ref()
    }

    /// Returns the displayed dataset.
    pub fn dataset(&self) -> Option<&MeshDataset> {
        self.source.as_ref().map(DatasetSource::dataset)
    }

    /// Installs or clears the color lookup. Bumps the revision.
    pub fn set_mapping(&mut self, mapping: Option<ColorTransferFunction>) {
        self.mapping = mapping;
        self.revision += 1;
    }

    /// Returns the installed color lookup.
    pub fn mapping(&self) -> Option<&ColorTransferFunction> {
        self.mapping.as_ref()
    }

    /// Scalar range the display maps colors over, if a lookup is installed.
    pub fn scalar_range(&self) -> Option<ScalarRange> {
        self.mapping.as_ref().map(ColorTransferFunction::range)
    }

    /// Sets the spatial offset.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Returns the spatial offset.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Returns the appearance properties.
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Returns the appearance properties for modification.
    pub fn property_mut(&mut self) -> &mut Property {
        &mut self.property
    }

    /// Counter bumped whenever geometry or color lookup change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Per-cell colors for the current source: mapped through the lookup and
    /// the first cell array when both exist, the diffuse color otherwise.
    pub fn cell_colors(&self) -> Vec<Rgb> {
        let Some(dataset) = self.dataset() else {
            return Vec::new();
        };
        let n_cells = dataset.num_cells();
        let base = self.property.diffuse_color;

        let scalars = crate::mapping::active_cell_scalars(dataset);
        match (&self.mapping, scalars) {
            (Some(lut), Some(array)) => (0..n_cells)
                .map(|i| array.scalar(i).map_or(base, |v| lut.map_value(v)))
                .collect(),
            _ => vec![base; n_cells],
        }
    }

    /// Axis-aligned bounds of the dataset after applying the position offset.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let (lo, hi) = self.dataset()?.bounds()?;
        Some((lo + self.position, hi + self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellArray, CellKind, DataArray};

    fn triangle_pair() -> MeshDataset {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let polys: CellArray = [[0u32, 1, 2].as_slice(), [1, 3, 2].as_slice()]
            .into_iter()
            .collect();
        let mut mesh = MeshDataset::new(points).with_cells(CellKind::Polygon, polys);
        mesh.cell_data_mut()
            .add_array(DataArray::from_f32("region", &[0.0, 4.0]));
        mesh
    }

    #[test]
    fn test_representation_index_round_trip() {
        for index in 0..3 {
            let rep = Representation::from_index(index).unwrap();
            assert_eq!(rep.to_index(), index);
        }
        assert!(Representation::from_index(3).is_none());
    }

    #[test]
    fn test_opacity_clamped() {
        let mut property = Property::default();
        property.set_opacity(1.7);
        assert_eq!(property.opacity, 1.0);
        property.set_opacity(-0.2);
        assert_eq!(property.opacity, 0.0);
    }

    #[test]
    fn test_revision_bumps() {
        let mut obj = VisualObject::new();
        assert_eq!(obj.revision(), 0);
        obj.set_source(DatasetSource::Loaded(triangle_pair()));
        obj.set_mapping(None);
        assert_eq!(obj.revision(), 2);
        obj.set_position(Vec3::Z);
        assert_eq!(obj.revision(), 2);
    }

    #[test]
    fn test_cell_colors_without_mapping_use_diffuse() {
        let mut obj = VisualObject::new();
        obj.property_mut().diffuse_color = Vec3::new(0.2, 0.3, 0.4);
        obj.set_source(DatasetSource::Loaded(triangle_pair()));
        assert_eq!(obj.cell_colors(), vec![Vec3::new(0.2, 0.3, 0.4); 2]);
    }

    #[test]
    fn test_cell_colors_with_mapping() {
        let mut lut = ColorTransferFunction::new(ScalarRange::new(0.0, 4.0));
        lut.add_rgb_point(0.0, Vec3::X);
        lut.add_rgb_point(4.0, Vec3::Z);

        let mut obj = VisualObject::new();
        obj.set_source(DatasetSource::Loaded(triangle_pair()));
        obj.set_mapping(Some(lut));
        assert_eq!(obj.cell_colors(), vec![Vec3::X, Vec3::Z]);
        assert_eq!(obj.scalar_range(), Some(ScalarRange::new(0.0, 4.0)));
    }

    #[test]
    fn test_bounds_follow_position() {
        let mut obj = VisualObject::new();
        assert!(obj.bounds().is_none());
        obj.set_source(DatasetSource::Loaded(triangle_pair()));
        obj.set_position(Vec3::new(0.0, 0.0, -20.0));
        let (lo, hi) = obj.bounds().unwrap();
        assert_eq!(lo.z, -20.0);
        assert_eq!(hi, Vec3::new(1.0, 1.0, -20.0));
    }

    #[test]
    fn test_light_direction() {
        let light = Light {
            position: Vec3::new(0.0, 0.0, 2.0),
            focal_point: Vec3::ZERO,
            intensity: 1.0,
            color: Vec3::ONE,
        };
        assert_eq!(light.direction(), Vec3::NEG_Z);
    }
}
