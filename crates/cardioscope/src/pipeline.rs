//! Scene update step of the load pipeline.

use cardioscope_core::{ColorTransferFunction, DatasetSource, Vec3};
use cardioscope_render::Display;

use crate::state::ViewerState;

/// How a completed load changed the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The loaded mesh is displayed. `mapped` is false when it had no usable
    /// cell scalars and is drawn uncolored.
    Applied { mapped: bool },
    /// The file held no geometry and the placeholder cone is displayed.
    Fallback,
    /// Fetching or parsing failed. The scene is unchanged.
    Failed,
    /// A newer load was requested before this one finished. Discarded.
    Stale,
}

impl LoadOutcome {
    /// Returns true if the scene was redrawn.
    pub fn redrew(self) -> bool {
        matches!(self, Self::Applied { .. } | Self::Fallback)
    }
}

/// Attaches `source` to the visual object and pushes it to the display.
///
/// Lights from the configuration are added only when `with_lights` is set
/// and none were installed before. The redraw is always the last call.
pub fn apply<D: Display + ?Sized>(
    state: &mut ViewerState,
    display: &mut D,
    source: DatasetSource,
    mapping: Option<ColorTransferFunction>,
    z_offset: f32,
    with_lights: bool,
) {
    let visual = &mut state.visual;
    visual.set_source(source);
    visual.set_mapping(mapping);
    visual.set_position(Vec3::new(0.0, 0.0, z_offset));
    visual
        .property_mut()
        .apply_material(&state.config.material);

    if with_lights && !state.lights_installed {
        for preset in &state.config.lights {
            display.add_light(&preset.to_light());
        }
        state.lights_installed = true;
        log::debug!("installed {} lights", state.config.lights.len());
    }

    display.add_actor(&state.visual);
    display.reset_camera();
    display.render();
}
