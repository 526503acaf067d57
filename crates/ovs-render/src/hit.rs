//! Hit testing: point → overlay lookup.
//!
//! The selected overlay's resize handle is checked first, then every
//! overlay body front-to-back (last added = topmost).

use ovs_core::SceneStore;
use ovs_core::id::OverlayId;

/// Which part of an overlay a point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// The square at the bottom-right corner of the selected overlay.
    ResizeHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: OverlayId,
    pub part: HitPart,
}

/// Find what is under (px, py).
/// Returns `None` over empty canvas.
pub fn hit_test(scene: &SceneStore, px: f64, py: f64) -> Option<Hit> {
    // Only the selected overlay draws a handle, so only it can be resized.
    // The handle wins even when another overlay's body covers it.
    let handle_size = scene.config().handle_size;
    if let Some(selected) = scene.selected_overlay()
        && selected.bounds().handle(handle_size).contains(px, py)
    {
        return Some(Hit {
            id: selected.id(),
            part: HitPart::ResizeHandle,
        });
    }

    scene.overlay_at(px, py).map(|overlay| Hit {
        id: overlay.id(),
        part: HitPart::Body,
    })
}
