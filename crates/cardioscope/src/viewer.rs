//! The controller tying configuration, loader results and the display together.

use cardioscope_core::{
    compute_mapping, generate_fallback, DatasetSource, MeshDataset, MeshId, ViewerConfig,
};
use cardioscope_io::{DatasetLoader, LoadError, LoadResult};
use cardioscope_render::Display;

use crate::pipeline::{apply, LoadOutcome};
use crate::state::{LoadRequest, LoadTicket, ViewerState};
use crate::xr::XrSession;

/// Owns the viewer state and drives a [`Display`].
///
/// Loading is split in two so the fetch can run anywhere:
/// [`Viewer::begin_load`] hands out a [`LoadRequest`], and
/// [`Viewer::complete_load`] applies its result. Only the most recent
/// request is applied; older completions are dropped.
pub struct Viewer<D: Display> {
    pub(crate) state: ViewerState,
    pub(crate) display: D,
    pub(crate) xr: Box<dyn XrSession>,
}

impl<D: Display> Viewer<D> {
    /// Creates a viewer and paints the configured background.
    pub fn new(config: ViewerConfig, mut display: D, xr: Box<dyn XrSession>) -> Self {
        display.set_background(config.background);
        Self {
            state: ViewerState::new(config),
            display,
            xr,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.state.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Consumes the viewer and returns its display.
    pub fn into_display(self) -> D {
        self.display
    }

    /// Starts a load of mesh `id`, superseding any load still in flight.
    pub fn begin_load(&mut self, id: MeshId, with_lights: bool) -> LoadRequest {
        self.state.generation += 1;
        let meshes = &self.state.config.meshes;
        if !meshes.is_known(id) {
            log::info!("mesh id {id} is unknown, showing the default mesh");
        }
        let location = meshes.resolve(id).to_string();
        log::debug!(
            "load #{} requested: mesh {id} -> {location}",
            self.state.generation
        );
        LoadRequest {
            ticket: LoadTicket {
                generation: self.state.generation,
                mesh: id,
                with_lights,
            },
            location,
        }
    }

    /// Applies the result of a load started with [`Viewer::begin_load`].
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: LoadResult<MeshDataset>,
    ) -> LoadOutcome {
        if !self.state.is_current(&ticket) {
            log::debug!(
                "discarding load #{} of mesh {}: #{} is newer",
                ticket.generation,
                ticket.mesh,
                self.state.generation
            );
            return LoadOutcome::Stale;
        }

        let z_offset = self.state.config.z_offset;
        match result {
            Ok(dataset) => {
                let mapping = compute_mapping(&dataset, &self.state.config.color);
                let mapped = mapping.is_some();
                apply(
                    &mut self.state,
                    &mut self.display,
                    DatasetSource::Loaded(dataset),
                    mapping,
                    z_offset,
                    ticket.with_lights,
                );
                self.state.current_mesh = Some(ticket.mesh);
                LoadOutcome::Applied { mapped }
            }
            Err(LoadError::Empty { location }) => {
                log::warn!("'{location}' contains no geometry, showing a placeholder cone");
                apply(
                    &mut self.state,
                    &mut self.display,
                    DatasetSource::Synthesized(generate_fallback()),
                    None,
                    z_offset,
                    ticket.with_lights,
                );
                self.state.current_mesh = Some(ticket.mesh);
                LoadOutcome::Fallback
            }
            Err(e) => {
                log::error!("Error loading data: {e}");
                LoadOutcome::Failed
            }
        }
    }

    /// Runs a whole load against `loader` on the current task.
    pub async fn load_mesh<L: DatasetLoader>(
        &mut self,
        id: MeshId,
        with_lights: bool,
        loader: &L,
    ) -> LoadOutcome {
        let request = self.begin_load(id, with_lights);
        let result = loader.load(&request.location).await;
        self.complete_load(request.ticket, result)
    }
}
