//! PLY reader.
//!
//! `vertex` elements become points, `face` elements become polygons. Every
//! other scalar property on those elements is kept as a point or cell array,
//! in declaration order.

use cardioscope_core::{CellArray, CellKind, DataArray, FieldData, MeshDataset, ScalarType, Vec3};
use ply_rs::{
    parser::Parser,
    ply::{DefaultElement, Property},
};

use crate::error::ParseError;

const POSITION: [&str; 3] = ["x", "y", "z"];
const FACE_LISTS: [&str; 2] = ["vertex_indices", "vertex_index"];

/// Parses a PLY file (ASCII or binary).
///
/// Returns `Ok(None)` when the file has no vertices.
pub fn read_ply(bytes: &[u8]) -> Result<Option<MeshDataset>, ParseError> {
    let mut reader = bytes;
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| ParseError::syntax(0, e.to_string()))?;

    let Some(vertices) = ply.payload.get("vertex").filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let mut points = Vec::with_capacity(vertices.len());
    for (i, vertex) in vertices.iter().enumerate() {
        let mut p = [0.0f32; 3];
        for (slot, name) in p.iter_mut().zip(POSITION) {
            *slot = vertex.get(name).and_then(as_scalar).ok_or_else(|| {
                ParseError::syntax(0, format!("vertex {i} has no numeric '{name}'"))
            })? as f32;
        }
        points.push(Vec3::from(p));
    }

    let mut polys = CellArray::new();
    let faces = ply.payload.get("face").map_or(&[][..], Vec::as_slice);
    let mut ids = Vec::new();
    for (i, face) in faces.iter().enumerate() {
        let list = FACE_LISTS
            .iter()
            .find_map(|name| face.get(*name).and_then(as_index_list))
            .ok_or_else(|| ParseError::syntax(0, format!("face {i} has no index list")))?;
        ids.clear();
        for v in list {
            ids.push(
                u32::try_from(v)
                    .map_err(|_| ParseError::syntax(0, format!("face {i} has index {v}")))?,
            );
        }
        polys.push(&ids);
    }

    let mut mesh = MeshDataset::new(points).with_cells(CellKind::Polygon, polys);
    collect_arrays(vertices, &POSITION, mesh.point_data_mut());
    collect_arrays(faces, &FACE_LISTS, mesh.cell_data_mut());
    mesh.validate()
        .map_err(|e| ParseError::syntax(0, e.to_string()))?;
    Ok(Some(mesh))
}

/// Gathers every scalar property not in `skip` into one array per name.
fn collect_arrays(elements: &[DefaultElement], skip: &[&str], out: &mut FieldData) {
    let Some(first) = elements.first() else {
        return;
    };
    for (name, prop) in first {
        if skip.contains(&name.as_str()) || as_scalar(prop).is_none() {
            continue;
        }
        let values: Option<Vec<f64>> = elements
            .iter()
            .map(|e| e.get(name).and_then(as_scalar))
            .collect();
        match values {
            Some(values) => {
                out.add_array(DataArray::new(name.as_str(), 1, values, scalar_type(prop)));
            }
            None => log::warn!("property '{name}' is missing on some elements; skipped"),
        }
    }
}

fn as_scalar(prop: &Property) -> Option<f64> {
    let v = match prop {
        Property::Char(v) => f64::from(*v),
        Property::UChar(v) => f64::from(*v),
        Property::Short(v) => f64::from(*v),
        Property::UShort(v) => f64::from(*v),
        Property::Int(v) => f64::from(*v),
        Property::UInt(v) => f64::from(*v),
        Property::Float(v) => f64::from(*v),
        Property::Double(v) => *v,
        _ => return None,
    };
    Some(v)
}

fn as_index_list(prop: &Property) -> Option<Vec<i64>> {
    let list = match prop {
        Property::ListChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
        Property::ListUChar(v) => v.iter().map(|&i| i64::from(i)).collect(),
        Property::ListShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
        Property::ListUShort(v) => v.iter().map(|&i| i64::from(i)).collect(),
        Property::ListInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
        Property::ListUInt(v) => v.iter().map(|&i| i64::from(i)).collect(),
        _ => return None,
    };
    Some(list)
}

fn scalar_type(prop: &Property) -> ScalarType {
    match prop {
        Property::Char(_) => ScalarType::Char,
        Property::UChar(_) => ScalarType::UnsignedChar,
        Property::Short(_) => ScalarType::Short,
        Property::UShort(_) => ScalarType::UnsignedShort,
        Property::Int(_) => ScalarType::Int,
        Property::UInt(_) => ScalarType::UnsignedInt,
        Property::Double(_) => ScalarType::Double,
        _ => ScalarType::Float,
    }
}
