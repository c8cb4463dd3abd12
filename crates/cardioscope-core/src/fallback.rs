//! Placeholder geometry shown when a mesh file yields no data.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use crate::dataset::{CellArray, CellKind, DataArray, MeshDataset};

/// Name of the per-cell random scalar field on the placeholder cone.
pub const FALLBACK_SCALARS_NAME: &str = "Random";

/// Cone dimensions. The cone is centered at the origin with its tip on +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeParams {
    pub height: f32,
    pub radius: f32,
    /// Number of facets around the axis (at least 3).
    pub resolution: u32,
    /// Whether to close the base with a polygon.
    pub capping: bool,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            height: 100.0,
            radius: 50.0,
            resolution: 6,
            capping: true,
        }
    }
}

/// Builds the placeholder cone with fresh uniform random cell scalars in `[0, 1)`.
///
/// Every call draws new values; the output is not reproducible.
pub fn generate_fallback() -> MeshDataset {
    generate_cone(&ConeParams::default(), &mut rand::thread_rng())
}

/// Builds a cone and fills the "Random" cell field from `rng`.
pub fn generate_cone<R: Rng + ?Sized>(params: &ConeParams, rng: &mut R) -> MeshDataset {
    let resolution = params.resolution.max(3);
    let half = params.height * 0.5;

    let mut points = Vec::with_capacity(resolution as usize + 1);
    points.push(Vec3::new(half, 0.0, 0.0));
    for i in 0..resolution {
        let angle = TAU * i as f32 / resolution as f32;
        points.push(Vec3::new(
            -half,
            params.radius * angle.cos(),
            params.radius * angle.sin(),
        ));
    }

    let mut polys = CellArray::new();
    for i in 0..resolution {
        let a = i + 1;
        let b = (i + 1) % resolution + 1;
        polys.push(&[0, a, b]);
    }
    if params.capping {
        let cap: Vec<u32> = (1..=resolution).rev().collect();
        polys.push(&cap);
    }

    let n_cells = polys.num_cells();
    let mut mesh = MeshDataset::new(points).with_cells(CellKind::Polygon, polys);

    let values: Vec<f32> = (0..n_cells).map(|_| rng.gen::<f32>()).collect();
    let index = mesh
        .cell_data_mut()
        .add_array(DataArray::from_f32(FALLBACK_SCALARS_NAME, &values));
    debug_assert_eq!(index, 0);
    mesh.cell_data_mut().set_active_scalars(FALLBACK_SCALARS_NAME);

    log::debug!("generated fallback cone with {n_cells} cells");
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_cone_shape() {
        let cone = generate_fallback();
        assert_eq!(cone.num_points(), 7);
        assert_eq!(cone.num_cells(), 7);
        assert!(cone.validate().is_ok());

        let (lo, hi) = cone.bounds().unwrap();
        assert!((hi.x - lo.x - 100.0).abs() < 1e-4);
        assert!((hi.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_random_cell_field() {
        let cone = generate_fallback();
        let cell_data = cone.cell_data();
        assert_eq!(cell_data.num_arrays(), 1);
        assert_eq!(cell_data.array_name(0), Some(FALLBACK_SCALARS_NAME));
        assert_eq!(cell_data.active_scalars().unwrap().name(), FALLBACK_SCALARS_NAME);
        assert!(cone.point_data().is_empty());
        assert!(cell_data
            .array(0)
            .unwrap()
            .values()
            .iter()
            .all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_successive_calls_differ() {
        let a = generate_fallback();
        let b = generate_fallback();
        assert_ne!(
            a.cell_data().array(0).unwrap().values(),
            b.cell_data().array(0).unwrap().values()
        );
    }

    #[test]
    fn test_uncapped_cone() {
        let params = ConeParams {
            capping: false,
            ..ConeParams::default()
        };
        let cone = generate_cone(&params, &mut StdRng::seed_from_u64(1));
        assert_eq!(cone.num_cells(), 6);
        assert!(cone.iter_cells().all(|(_, c)| c.len() == 3));
    }

    proptest! {
        #[test]
        fn random_values_stay_in_unit_interval(seed: u64, resolution in 3u32..64) {
            let params = ConeParams { resolution, ..ConeParams::default() };
            let cone = generate_cone(&params, &mut StdRng::seed_from_u64(seed));
            let array = cone.cell_data().array(0).unwrap();
            prop_assert_eq!(array.num_tuples(), resolution as usize + 1);
            prop_assert!(array.values().iter().all(|v| (0.0..1.0).contains(v)));
            prop_assert!(cone.validate().is_ok());
        }
    }
}
