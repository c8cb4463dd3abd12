//! In-memory mesh datasets.
//!
//! A [`MeshDataset`] mirrors the VTK polydata model: a point list, four cell
//! arrays (vertices, lines, polygons, triangle strips) and two attribute
//! blocks ([`FieldData`]) holding named scalar arrays for points and cells.
//! Cells are numbered across the four arrays in that order, which is also the
//! order cell attributes are indexed in.

use glam::Vec3;

use crate::color::ScalarRange;
use crate::error::{CoreError, Result};

/// Storage type an array was declared with in its source file.
///
/// Values are always held as `f64`; the type is kept so integer fields can be
/// told apart from floating-point ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bit,
    UnsignedChar,
    Char,
    UnsignedShort,
    Short,
    UnsignedInt,
    Int,
    UnsignedLong,
    Long,
    Float,
    Double,
    Int64,
    UInt64,
}

impl ScalarType {
    /// Parses a legacy VTK type name (`float`, `unsigned_int`, `vtktypeint64`, ...).
    pub fn from_vtk_name(name: &str) -> Option<Self> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "bit" => Self::Bit,
            "unsigned_char" => Self::UnsignedChar,
            "char" => Self::Char,
            "unsigned_short" => Self::UnsignedShort,
            "short" => Self::Short,
            "unsigned_int" => Self::UnsignedInt,
            "int" => Self::Int,
            "unsigned_long" => Self::UnsignedLong,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            "vtktypeint64" | "vtkidtype" => Self::Int64,
            "vtktypeuint64" => Self::UInt64,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the legacy VTK type name.
    pub fn vtk_name(self) -> &'static str {
        match self {
            Self::Bit => "bit",
            Self::UnsignedChar => "unsigned_char",
            Self::Char => "char",
            Self::UnsignedShort => "unsigned_short",
            Self::Short => "short",
            Self::UnsignedInt => "unsigned_int",
            Self::Int => "int",
            Self::UnsignedLong => "unsigned_long",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Int64 => "vtktypeint64",
            Self::UInt64 => "vtktypeuint64",
        }
    }

    /// Size of one value in a binary legacy file.
    ///
    /// `long`/`unsigned_long` are written as 4 bytes by the legacy writer.
    /// `bit` is packed and has no whole-byte size.
    pub fn byte_size(self) -> Option<usize> {
        match self {
            Self::Bit => None,
            Self::UnsignedChar | Self::Char => Some(1),
            Self::UnsignedShort | Self::Short => Some(2),
            Self::UnsignedInt | Self::Int | Self::UnsignedLong | Self::Long | Self::Float => {
                Some(4)
            }
            Self::Double | Self::Int64 | Self::UInt64 => Some(8),
        }
    }

    /// Returns true for integer storage types.
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }
}

/// A named attribute array of fixed-width tuples.
#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    name: String,
    components: usize,
    values: Vec<f64>,
    scalar_type: ScalarType,
}

impl DataArray {
    /// Creates a new array. `values.len()` should be a multiple of `components`.
    pub fn new(
        name: impl Into<String>,
        components: usize,
        values: Vec<f64>,
        scalar_type: ScalarType,
    ) -> Self {
        Self {
            name: name.into(),
            components: components.max(1),
            values,
            scalar_type,
        }
    }

    /// Creates a single-component `float` array from `f32` values.
    pub fn from_f32(name: impl Into<String>, values: &[f32]) -> Self {
        Self::new(
            name,
            1,
            values.iter().map(|&v| f64::from(v)).collect(),
            ScalarType::Float,
        )
    }

    /// Returns the array name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of components per tuple.
    pub fn components(&self) -> usize {
        self.components
    }

    /// Returns the flat value buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the declared storage type.
    pub fn scalar_type(&self) -> ScalarType {
        self.scalar_type
    }

    /// Returns the number of tuples.
    pub fn num_tuples(&self) -> usize {
        self.values.len() / self.components
    }

    /// Returns the `i`-th tuple.
    pub fn tuple(&self, i: usize) -> Option<&[f64]> {
        let start = i.checked_mul(self.components)?;
        self.values.get(start..start + self.components)
    }

    /// Scalar value of a tuple: the component itself for single-component
    /// arrays, the Euclidean norm otherwise.
    pub fn scalar(&self, i: usize) -> Option<f64> {
        let tuple = self.tuple(i)?;
        if let [v] = tuple {
            Some(*v)
        } else {
            Some(tuple.iter().map(|c| c * c).sum::<f64>().sqrt())
        }
    }

    /// Computes the range of the tuple scalars, skipping non-finite values.
    ///
    /// Returns `None` when the array holds no finite value.
    pub fn range(&self) -> Option<ScalarRange> {
        ScalarRange::from_values((0..self.num_tuples()).filter_map(|i| self.scalar(i)))
    }
}

/// An ordered collection of attribute arrays.
///
/// Arrays keep their insertion order; the position of an array is the order
/// the source file declared it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldData {
    arrays: Vec<DataArray>,
    active_scalars: Option<usize>,
}

impl FieldData {
    /// Creates an empty attribute block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an array. An existing array with the same name is replaced in place.
    ///
    /// Returns the index of the array.
    pub fn add_array(&mut self, array: DataArray) -> usize {
        if let Some(idx) = self.index_of(array.name()) {
            self.arrays[idx] = array;
            idx
        } else {
            self.arrays.push(array);
            self.arrays.len() - 1
        }
    }

    /// Returns the number of arrays.
    pub fn num_arrays(&self) -> usize {
        self.arrays.len()
    }

    /// Returns true if the block holds no arrays.
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Returns the array at `idx`.
    pub fn array(&self, idx: usize) -> Option<&DataArray> {
        self.arrays.get(idx)
    }

    /// Returns the name of the array at `idx`.
    pub fn array_name(&self, idx: usize) -> Option<&str> {
        self.arrays.get(idx).map(DataArray::name)
    }

    /// Looks up an array by name.
    pub fn get(&self, name: &str) -> Option<&DataArray> {
        self.index_of(name).map(|i| &self.arrays[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.arrays.iter().position(|a| a.name() == name)
    }

    /// Marks the named array as the active scalars. Returns false if absent.
    pub fn set_active_scalars(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(idx) => {
                self.active_scalars = Some(idx);
                true
            }
            None => false,
        }
    }

    /// Returns the active scalars, if one has been selected.
    pub fn active_scalars(&self) -> Option<&DataArray> {
        self.active_scalars.and_then(|i| self.arrays.get(i))
    }

    /// Iterates over arrays in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &DataArray> {
        self.arrays.iter()
    }
}

/// The four polydata cell kinds, in numbering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Vertex,
    Line,
    Polygon,
    TriangleStrip,
}

impl CellKind {
    /// All kinds in cell-numbering order.
    pub const ALL: [CellKind; 4] = [
        CellKind::Vertex,
        CellKind::Line,
        CellKind::Polygon,
        CellKind::TriangleStrip,
    ];
}

/// Variable-size cells stored as offsets plus a flat connectivity list.
#[derive(Debug, Clone, PartialEq)]
pub struct CellArray {
    offsets: Vec<usize>,
    connectivity: Vec<u32>,
}

impl Default for CellArray {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            connectivity: Vec::new(),
        }
    }
}

impl CellArray {
    /// Creates an empty cell array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cell array from explicit offsets (`n + 1` entries starting at 0)
    /// and connectivity. Returns `None` if the offsets are not a valid partition.
    pub fn from_offsets(offsets: Vec<usize>, connectivity: Vec<u32>) -> Option<Self> {
        if offsets.first() != Some(&0) || offsets.last() != Some(&connectivity.len()) {
            return None;
        }
        if offsets.windows(2).any(|w| w[0] > w[1]) {
            return None;
        }
        Some(Self {
            offsets,
            connectivity,
        })
    }

    /// Appends one cell.
    pub fn push(&mut self, cell: &[u32]) {
        self.connectivity.extend_from_slice(cell);
        self.offsets.push(self.connectivity.len());
    }

    /// Returns the number of cells.
    pub fn num_cells(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns true if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.num_cells() == 0
    }

    /// Returns the point ids of cell `i`.
    pub fn cell(&self, i: usize) -> Option<&[u32]> {
        let start = *self.offsets.get(i)?;
        let end = *self.offsets.get(i + 1)?;
        self.connectivity.get(start..end)
    }

    /// Iterates over cells.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.offsets
            .windows(2)
            .map(move |w| &self.connectivity[w[0]..w[1]])
    }

    /// Returns the flat connectivity list.
    pub fn connectivity(&self) -> &[u32] {
        &self.connectivity
    }
}

impl<'a> FromIterator<&'a [u32]> for CellArray {
    fn from_iter<I: IntoIterator<Item = &'a [u32]>>(iter: I) -> Self {
        let mut cells = CellArray::new();
        for cell in iter {
            cells.push(cell);
        }
        cells
    }
}

/// Geometry plus attribute data for one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDataset {
    points: Vec<Vec3>,
    verts: CellArray,
    lines: CellArray,
    polys: CellArray,
    strips: CellArray,
    point_data: FieldData,
    cell_data: FieldData,
}

impl MeshDataset {
    /// Creates a dataset with the given points and no cells.
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    /// Replaces the cells of one kind (builder style).
    #[must_use]
    pub fn with_cells(mut self, kind: CellKind, cells: CellArray) -> Self {
        *self.cells_mut(kind) = cells;
        self
    }

    /// Returns the points.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Returns the number of points.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the total number of cells over all kinds.
    pub fn num_cells(&self) -> usize {
        CellKind::ALL
            .iter()
            .map(|&k| self.cells(k).num_cells())
            .sum()
    }

    /// Returns the cells of one kind.
    pub fn cells(&self, kind: CellKind) -> &CellArray {
        match kind {
            CellKind::Vertex => &self.verts,
            CellKind::Line => &self.lines,
            CellKind::Polygon => &self.polys,
            CellKind::TriangleStrip => &self.strips,
        }
    }

    /// Returns the cells of one kind for modification.
    pub fn cells_mut(&mut self, kind: CellKind) -> &mut CellArray {
        match kind {
            CellKind::Vertex => &mut self.verts,
            CellKind::Line => &mut self.lines,
            CellKind::Polygon => &mut self.polys,
            CellKind::TriangleStrip => &mut self.strips,
        }
    }

    /// Iterates over all cells in numbering order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (CellKind, &[u32])> {
        CellKind::ALL
            .into_iter()
            .flat_map(move |k| self.cells(k).iter().map(move |c| (k, c)))
    }

    /// Returns the point attributes.
    pub fn point_data(&self) -> &FieldData {
        &self.point_data
    }

    /// Returns the point attributes for modification.
    pub fn point_data_mut(&mut self) -> &mut FieldData {
        &mut self.point_data
    }

    /// Returns the cell attributes.
    pub fn cell_data(&self) -> &FieldData {
        &self.cell_data
    }

    /// Returns the cell attributes for modification.
    pub fn cell_data_mut(&mut self) -> &mut FieldData {
        &mut self.cell_data
    }

    /// Returns true if the dataset has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounding box, `None` for an empty dataset.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Checks that every cell references an existing point and every attribute
    /// array has one tuple per point/cell.
    pub fn validate(&self) -> Result<()> {
        let n_points = self.points.len();
        if let Some(&bad) = CellKind::ALL
            .iter()
            .flat_map(|&k| self.cells(k).connectivity())
            .find(|&&id| id as usize >= n_points)
        {
            return Err(CoreError::SizeMismatch {
                name: format!("cell point id {bad}"),
                expected: n_points,
                actual: bad as usize + 1,
            });
        }

        let n_cells = self.num_cells();
        for (block, expected) in [(&self.point_data, n_points), (&self.cell_data, n_cells)] {
            for array in block.iter() {
                if array.num_tuples() != expected {
                    return Err(CoreError::SizeMismatch {
                        name: array.name().to_string(),
                        expected,
                        actual: array.num_tuples(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshDataset {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let polys: CellArray = [[0u32, 1, 2].as_slice(), [0, 2, 3].as_slice()]
            .into_iter()
            .collect();
        MeshDataset::new(points).with_cells(CellKind::Polygon, polys)
    }

    #[test]
    fn test_scalar_type_names() {
        assert_eq!(ScalarType::from_vtk_name("float"), Some(ScalarType::Float));
        assert_eq!(
            ScalarType::from_vtk_name("UNSIGNED_CHAR"),
            Some(ScalarType::UnsignedChar)
        );
        assert_eq!(ScalarType::from_vtk_name("quaternion"), None);
        assert_eq!(ScalarType::Double.byte_size(), Some(8));
        assert_eq!(ScalarType::Bit.byte_size(), None);
        assert!(ScalarType::Int.is_integral());
        assert!(!ScalarType::Float.is_integral());
    }

    #[test]
    fn test_cell_array_offsets() {
        let cells = CellArray::from_offsets(vec![0, 3, 7], vec![0, 1, 2, 0, 1, 2, 3]).unwrap();
        assert_eq!(cells.num_cells(), 2);
        assert_eq!(cells.cell(1), Some([0, 1, 2, 3].as_slice()));
        assert!(CellArray::from_offsets(vec![0, 5], vec![0, 1]).is_none());
        assert!(CellArray::from_offsets(vec![1, 2], vec![0, 1]).is_none());
    }

    #[test]
    fn test_field_data_keeps_order_and_replaces_by_name() {
        let mut fd = FieldData::new();
        fd.add_array(DataArray::from_f32("b", &[1.0]));
        fd.add_array(DataArray::from_f32("a", &[2.0]));
        fd.add_array(DataArray::from_f32("b", &[3.0]));

        assert_eq!(fd.num_arrays(), 2);
        assert_eq!(fd.array_name(0), Some("b"));
        assert_eq!(fd.get("b").unwrap().values(), &[3.0]);
        assert!(fd.active_scalars().is_none());
        assert!(fd.set_active_scalars("a"));
        assert_eq!(fd.active_scalars().unwrap().name(), "a");
        assert!(!fd.set_active_scalars("missing"));
    }

    #[test]
    fn test_array_range_uses_magnitude_for_vectors() {
        let vectors = DataArray::new("v", 2, vec![3.0, 4.0, 0.0, 1.0], ScalarType::Double);
        let range = vectors.range().unwrap();
        assert_eq!(range.min, 1.0);
        assert_eq!(range.max, 5.0);
    }

    #[test]
    fn test_array_range_skips_non_finite() {
        let arr = DataArray::new("s", 1, vec![f64::NAN, 2.0, -1.0], ScalarType::Double);
        let range = arr.range().unwrap();
        assert_eq!((range.min, range.max), (-1.0, 2.0));

        let empty = DataArray::new("e", 1, Vec::new(), ScalarType::Float);
        assert!(empty.range().is_none());
    }

    #[test]
    fn test_dataset_bounds_and_cells() {
        let mesh = quad();
        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_cells(), 2);
        let (lo, hi) = mesh.bounds().unwrap();
        assert_eq!(lo, Vec3::ZERO);
        assert_eq!(hi, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.iter_cells().count(), 2);
        assert!(MeshDataset::default().bounds().is_none());
    }

    #[test]
    fn test_validate_detects_mismatches() {
        let mut mesh = quad();
        assert!(mesh.validate().is_ok());

        mesh.cell_data_mut()
            .add_array(DataArray::from_f32("bad", &[1.0, 2.0, 3.0]));
        assert!(matches!(
            mesh.validate(),
            Err(CoreError::SizeMismatch { expected: 2, actual: 3, .. })
        ));

        let bad_ids = MeshDataset::new(vec![Vec3::ZERO])
            .with_cells(CellKind::Vertex, [[4u32].as_slice()].into_iter().collect());
        assert!(bad_ids.validate().is_err());
    }
}
