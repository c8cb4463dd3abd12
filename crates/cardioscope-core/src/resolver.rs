//! Mesh identifier resolution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier of a mesh in the [`MeshTable`], as emitted by the mesh selector.
pub type MeshId = u32;

/// Closed table of known meshes plus the location every other id falls back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshTable {
    /// Known mesh ids and their file locations.
    pub entries: BTreeMap<MeshId, String>,
    /// Location used for any id not in `entries`.
    pub fallback: String,
}

impl Default for MeshTable {
    fn default() -> Self {
        let entries = [
            (0, "data/healthy.vtk"),
            (1, "data/afib.vtk"),
            (2, "data/hr.vtk"),
        ]
        .into_iter()
        .map(|(id, loc)| (id, loc.to_string()))
        .collect();

        Self {
            entries,
            fallback: "data/data_coarse_scaled.vtk".to_string(),
        }
    }
}

impl MeshTable {
    /// Resolves a mesh id to a location.
    ///
    /// Unknown ids are not an error; they resolve to the fallback location.
    pub fn resolve(&self, id: MeshId) -> &str {
        if let Some(location) = self.entries.get(&id) {
            location
        } else {
            log::debug!("mesh id {id} is not in the table, using fallback location");
            &self.fallback
        }
    }

    /// Returns true if `id` is one of the known meshes.
    pub fn is_known(&self, id: MeshId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns an id that is guaranteed to resolve to the fallback location.
    pub fn fallback_id(&self) -> MeshId {
        (0..=MeshId::MAX)
            .rev()
            .find(|id| !self.entries.contains_key(id))
            .unwrap_or(MeshId::MAX)
    }

    /// Iterates over known ids in ascending order.
    pub fn known_ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.entries.keys().copied()
    }
}
