//! Scalar-range color mapping.

use crate::color::ColorTransferFunction;
use crate::config::ColorPreset;
use crate::dataset::{DataArray, MeshDataset};

/// The cell array used for coloring: the first one in storage order.
pub fn active_cell_scalars(dataset: &MeshDataset) -> Option<&DataArray> {
    dataset.cell_data().array(0)
}

/// Derives a discretized color lookup from the first cell scalar field.
///
/// Returns `None` when the dataset has no cell arrays, or when the first one
/// has no finite values. The result has two control points, `preset.low` at
/// the range minimum and `preset.high` at the maximum, and `max - min + 1`
/// discrete colors.
pub fn compute_mapping(
    dataset: &MeshDataset,
    preset: &ColorPreset,
) -> Option<ColorTransferFunction> {
    let cell_data = dataset.cell_data();
    log::debug!("number of cell data arrays: {}", cell_data.num_arrays());

    let array = active_cell_scalars(dataset)?;
    log::debug!("active cell scalars: '{}'", array.name());

    let Some(range) = array.range() else {
        log::warn!(
            "no active scalar array in the cell data ('{}' has no finite values); {} point data arrays present",
            array.name(),
            dataset.point_data().num_arrays()
        );
        return None;
    };
    log::debug!("scalar range: [{}, {}]", range.min, range.max);

    let mut lut = ColorTransferFunction::new(range);
    lut.add_rgb_point(range.min, preset.low);
    lut.add_rgb_point(range.max, preset.high);
    lut.set_discretize(true);
    lut.set_number_of_values(range.bucket_count());
    Some(lut)
}
