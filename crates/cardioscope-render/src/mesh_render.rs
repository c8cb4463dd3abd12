//! Turns a visual object into GPU vertex lists.
//!
//! Every vertex carries its cell's color, so cells are flat-shaded and
//! vertices are not shared between cells.

use cardioscope_core::{CellKind, Representation, Rgb, Vec3, VisualObject};

/// Vertex layout shared by the triangle, line and point pipelines.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    /// Zero for lines and points, which are drawn unlit.
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x4];

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, color: Rgb, opacity: f32) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color: color.extend(opacity).to_array(),
        }
    }

    /// Vertex buffer layout matching `mesh.wgsl`.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Vertex lists for one visual object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub triangles: Vec<MeshVertex>,
    pub lines: Vec<MeshVertex>,
    pub points: Vec<MeshVertex>,
}

impl MeshGeometry {
    /// Builds vertex lists for the object's current representation.
    ///
    /// Positions include the object's offset. Polygons are fan-triangulated
    /// and triangle strips unrolled with alternating winding.
    pub fn build(object: &VisualObject) -> Self {
        let mut geometry = Self::default();
        let Some(dataset) = object.dataset() else {
            return geometry;
        };

        let colors = object.cell_colors();
        let property = object.property();
        let opacity = property.opacity;
        let offset = object.position();
        let points = dataset.points();
        let at = |id: u32| points.get(id as usize).copied().unwrap_or_default() + offset;

        for (index, (kind, cell)) in dataset.iter_cells().enumerate() {
            let color = colors.get(index).copied().unwrap_or(property.diffuse_color);
            match (property.representation, kind) {
                (Representation::Points, _) | (_, CellKind::Vertex) => {
                    for &id in cell {
                        geometry.push_point(at(id), color, opacity);
                    }
                }
                (_, CellKind::Line) => {
                    for pair in cell.windows(2) {
                        geometry.push_line(at(pair[0]), at(pair[1]), color, opacity);
                    }
                }
                (Representation::Wireframe, CellKind::Polygon) => {
                    for (i, &id) in cell.iter().enumerate() {
                        let next = cell[(i + 1) % cell.len()];
                        geometry.push_line(at(id), at(next), color, opacity);
                    }
                }
                (Representation::Wireframe, CellKind::TriangleStrip) => {
                    for pair in cell.windows(2) {
                        geometry.push_line(at(pair[0]), at(pair[1]), color, opacity);
                    }
                    for pair in cell.windows(3) {
                        geometry.push_line(at(pair[0]), at(pair[2]), color, opacity);
                    }
                }
                (Representation::Surface, CellKind::Polygon) => {
                    if cell.len() < 3 {
                        continue;
                    }
                    for i in 1..cell.len() - 1 {
                        geometry.push_triangle(
                            [at(cell[0]), at(cell[i]), at(cell[i + 1])],
                            color,
                            opacity,
                        );
                    }
                }
                (Representation::Surface, CellKind::TriangleStrip) => {
                    for (i, tri) in cell.windows(3).enumerate() {
                        let (b, c) = if i % 2 == 0 { (1, 2) } else { (2, 1) };
                        geometry.push_triangle([at(tri[0]), at(tri[b]), at(tri[c])], color, opacity);
                    }
                }
            }
        }
        geometry
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty() && self.lines.is_empty() && self.points.is_empty()
    }

    fn push_point(&mut self, p: Vec3, color: Rgb, opacity: f32) {
        self.points.push(MeshVertex::new(p, Vec3::ZERO, color, opacity));
    }

    fn push_line(&mut self, a: Vec3, b: Vec3, color: Rgb, opacity: f32) {
        self.lines.push(MeshVertex::new(a, Vec3::ZERO, color, opacity));
        self.lines.push(MeshVertex::new(b, Vec3::ZERO, color, opacity));
    }

    fn push_triangle(&mut self, [a, b, c]: [Vec3; 3], color: Rgb, opacity: f32) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for p in [a, b, c] {
            self.triangles.push(MeshVertex::new(p, normal, color, opacity));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardioscope_core::{
        CellArray, ColorTransferFunction, DataArray, DatasetSource, MeshDataset, ScalarRange,
    };

    fn quad_object() -> VisualObject {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let polys: CellArray = [[0u32, 1, 2, 3].as_slice()].into_iter().collect();
        let mut mesh = MeshDataset::new(points).with_cells(CellKind::Polygon, polys);
        mesh.cell_data_mut().add_array(DataArray::from_f32("v", &[1.0]));

        let mut object = VisualObject::new();
        object.set_source(DatasetSource::Loaded(mesh));
        object
    }

    #[test]
    fn test_surface_fan_triangulation() {
        let object = quad_object();
        let geometry = MeshGeometry::build(&object);
        assert_eq!(geometry.triangles.len(), 6);
        assert!(geometry.lines.is_empty());
        for v in &geometry.triangles {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn test_wireframe_closes_polygon() {
        let mut object = quad_object();
        object.property_mut().representation = Representation::Wireframe;
        let geometry = MeshGeometry::build(&object);
        assert!(geometry.triangles.is_empty());
        assert_eq!(geometry.lines.len(), 8);
        assert_eq!(geometry.lines[7].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_points_and_offset_and_opacity() {
        let mut object = quad_object();
        object.property_mut().representation = Representation::Points;
        object.property_mut().set_opacity(0.3);
        object.set_position(Vec3::new(0.0, 0.0, -20.0));
        let geometry = MeshGeometry::build(&object);
        assert_eq!(geometry.points.len(), 4);
        assert!(geometry.points.iter().all(|v| v.position[2] == -20.0));
        assert!(geometry.points.iter().all(|v| (v.color[3] - 0.3).abs() < 1e-6));
    }

    #[test]
    fn test_mapped_colors_reach_vertices() {
        let mut object = quad_object();
        let mut lut = ColorTransferFunction::new(ScalarRange::new(0.0, 1.0));
        lut.add_rgb_point(0.0, Vec3::X);
        lut.add_rgb_point(1.0, Vec3::Z);
        object.set_mapping(Some(lut));
        let geometry = MeshGeometry::build(&object);
        assert!(geometry.triangles.iter().all(|v| v.color == [0.0, 0.0, 1.0, 1.0]));
    }

    #[test]
    fn test_strip_winding_alternates() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)];
        let strips: CellArray = [[0u32, 1, 2, 3].as_slice()].into_iter().collect();
        let mut object = VisualObject::new();
        object.set_source(DatasetSource::Loaded(
            MeshDataset::new(points).with_cells(CellKind::TriangleStrip, strips),
        ));
        let geometry = MeshGeometry::build(&object);
        assert_eq!(geometry.triangles.len(), 6);
        assert_eq!(geometry.triangles[0].normal, geometry.triangles[3].normal);
    }

    #[test]
    fn test_empty_object() {
        assert!(MeshGeometry::build(&VisualObject::new()).is_empty());
    }
}
