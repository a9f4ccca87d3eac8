//! Mesh displayed by an object.

use bevy_ecs::prelude::Component;

use crate::resources::meshstore::MeshHandle;

/// Which mesh an object shows: its source mesh until a private instance is
/// bound with [`replace_mesh`](Self::replace_mesh).
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct MeshBinding {
    /// Name of the source mesh in [`MeshStore`](crate::resources::meshstore::MeshStore).
    pub source: String,
    /// Duplicated instance currently displayed instead of the source.
    pub instance: Option<MeshHandle>,
}

impl MeshBinding {
    pub fn new(source: impl Into<String>) -> Self {
        MeshBinding {
            source: source.into(),
            instance: None,
        }
    }

    pub fn replace_mesh(&mut self, mesh: MeshHandle) {
        self.instance = Some(mesh);
    }
}
