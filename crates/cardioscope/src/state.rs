//! Application state owned by the viewer.

use cardioscope_core::{MeshId, ViewerConfig, VisualObject};

/// Everything the viewer mutates across loads and UI events.
#[derive(Debug, Clone)]
pub struct ViewerState {
    /// The single displayed object.
    pub visual: VisualObject,
    /// Set once the first populated scene has received its lights.
    pub lights_installed: bool,
    /// Token of the most recent load request.
    pub generation: u64,
    /// Mesh the latest successful load came from.
    pub current_mesh: Option<MeshId>,
    /// Whether an immersive session is running.
    pub vr_active: bool,
    pub config: ViewerConfig,
}

impl ViewerState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            visual: VisualObject::new(),
            lights_installed: false,
            generation: 0,
            current_mesh: None,
            vr_active: false,
            config,
        }
    }

    /// Returns true if `ticket` belongs to the latest load request.
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }
}

/// Identifies one load request. Returned to the viewer with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub mesh: MeshId,
    /// Install the configured lights if none are in the scene yet.
    pub with_lights: bool,
}

/// A load the caller must run: fetch `location`, then hand the result back
/// with `ticket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub location: String,
}
