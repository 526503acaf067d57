//! Scene mutations.
//!
//! Tools never touch the store directly: they describe what should change
//! and the session applies it here. The store enforces the model
//! invariants (minimum size, text height) on every application.

use ovs_core::SceneStore;
use ovs_core::id::OverlayId;
use ovs_core::model::InteractionMode;

/// A single change to the scene store.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneMutation {
    /// Replace the selection (`None` clears it).
    Select { id: Option<OverlayId> },
    /// Enter a new interaction mode, ending any other.
    SetMode { mode: InteractionMode },
    /// Move an overlay's top-left corner to an absolute position.
    MoveOverlay { id: OverlayId, x: f64, y: f64 },
    /// Request a new size; the store floors it and fixes text height.
    ResizeOverlay {
        id: OverlayId,
        width: f64,
        height: f64,
    },
    RemoveOverlay { id: OverlayId },
}

/// Apply one mutation. Returns whether the scene changed.
pub fn apply_mutation(scene: &mut SceneStore, mutation: SceneMutation) -> bool {
    log::trace!("apply {mutation:?}");
    match mutation {
        SceneMutation::Select { id } => scene.select(id),
        SceneMutation::SetMode { mode } => {
            let before = scene.mode();
            scene.set_mode(mode);
            before != scene.mode()
        }
        SceneMutation::MoveOverlay { id, x, y } => {
            let unchanged = scene
                .overlay(id)
                .is_some_and(|o| o.x() == x && o.y() == y);
            scene.move_overlay(id, x, y) && !unchanged
        }
        SceneMutation::ResizeOverlay { id, width, height } => {
            let before = scene.overlay(id).map(|o| o.bounds());
            scene.resize_overlay(id, width, height)
                && before != scene.overlay(id).map(|o| o.bounds())
        }
        SceneMutation::RemoveOverlay { id } => scene.remove_overlay(id).is_some(),
    }
}

/// Apply a batch in order. Returns whether any of them changed anything.
pub fn apply_all(scene: &mut SceneStore, mutations: Vec<SceneMutation>) -> bool {
    mutations
        .into_iter()
        .fold(false, |changed, m| apply_mutation(scene, m) | changed)
}
