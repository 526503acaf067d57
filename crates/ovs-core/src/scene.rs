//! The scene store: single source of truth for an editing session.
//!
//! Holds the base image, the ordered overlay list, the selection, and the
//! session-wide interaction mode. The renderer only reads it; the pointer
//! tools mutate it through the methods here, which keep the model
//! invariants:
//!
//! - ids are never reused;
//! - text overlays are always `font_size * line_height_factor` tall;
//! - resizing never goes below `min_overlay_size` on either axis;
//! - at most one overlay is selected, and the mode targets at most one.

use crate::config::EditorConfig;
use crate::decode::decode_image;
use crate::error::DecodeError;
use crate::id::OverlayId;
use crate::model::{
    BaseImage, Bounds, Color, DecodedImage, FontFamily, InteractionMode, Overlay, OverlayKind,
};

/// The editing session's scene state.
#[derive(Debug, Default)]
pub struct SceneStore {
    config: EditorConfig,
    base: Option<BaseImage>,
    /// Insertion order is z-order (last = topmost).
    overlays: Vec<Overlay>,
    selected: Option<OverlayId>,
    mode: InteractionMode,
}

impl SceneStore {
    /// A store driven by `config`. An invalid config is replaced by the
    /// defaults, so every configured size is a positive number.
    pub fn new(config: EditorConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("{e}; using the default editor config");
                EditorConfig::default()
            }
        };
        Self {
            config,
            ..Self::default()
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn base_image(&self) -> Option<&BaseImage> {
        self.base.as_ref()
    }

    /// Canvas pixel size, fixed by the base image. `None` until one loads.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.base.as_ref().map(BaseImage::dimensions)
    }

    /// All overlays, oldest (bottom) first.
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.id() == id)
    }

    pub fn selected(&self) -> Option<OverlayId> {
        self.selected
    }

    pub fn selected_overlay(&self) -> Option<&Overlay> {
        self.selected.and_then(|id| self.overlay(id))
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Topmost overlay whose box contains the point (inclusive edges).
    pub fn overlay_at(&self, x: f64, y: f64) -> Option<&Overlay> {
        self.overlays.iter().rev().find(|o| o.contains(x, y))
    }

    // ─── Base image ──────────────────────────────────────────────────────

    /// Decode and install a new base image.
    ///
    /// On failure nothing changes. Overlay coordinates are absolute canvas
    /// pixels and are not rescaled to the new dimensions.
    ///
    /// # Errors
    /// Any `DecodeError` from the decode boundary.
    pub fn load_base_image(&mut self, bytes: &[u8]) -> Result<&BaseImage, DecodeError> {
        let image = decode_image(bytes)?;
        Ok(self.set_base_image(image))
    }

    /// Install an already decoded base image, resizing the canvas to it.
    pub fn set_base_image(&mut self, image: DecodedImage) -> &BaseImage {
        log::info!(
            "base image set: {}×{} (was {:?})",
            image.width(),
            image.height(),
            self.canvas_size()
        );
        self.base.insert(BaseImage::from(image))
    }

    // ─── Overlay lifecycle ───────────────────────────────────────────────

    /// Add a text overlay at the spawn position and select it.
    ///
    /// Whitespace-only content, or a font size that is not a positive
    /// number, is ignored and returns `None`. A placement in progress is
    /// confirmed first.
    pub fn add_text_overlay(
        &mut self,
        content: &str,
        font_size: f64,
        font_family: FontFamily,
        color: Color,
    ) -> Option<&Overlay> {
        if content.trim().is_empty() {
            log::debug!("ignoring empty text overlay");
            return None;
        }
        if !(font_size.is_finite() && font_size > 0.0) {
            log::warn!("ignoring text overlay with font size {font_size}");
            return None;
        }

        // Width is a glyph-free estimate over UTF-16 units; the box is only a
        // hit-test and resize bound.
        let units = content.encode_utf16().count() as f64;
        let bounds = Bounds::new(
            self.config.spawn_x,
            self.config.spawn_y,
            units * font_size * self.config.text_width_factor,
            self.config.text_height(font_size),
        );
        let kind = OverlayKind::Text {
            content: content.to_string(),
            font_size,
            font_family,
            color,
        };

        self.mode = InteractionMode::Idle;
        Some(self.push_overlay(OverlayId::next(), bounds, kind))
    }

    /// Add an image overlay, select it, and enter placement mode.
    ///
    /// Width is `min(w, target)`; height is `min(h, target) * (h / w)`.
    /// The two axes are clamped independently, so the aspect ratio only
    /// survives when the source height fits within the target.
    ///
    /// A zero-sized image, or a target that is not a positive number, is
    /// ignored and returns `None`.
    pub fn add_image_overlay(
        &mut self,
        image: DecodedImage,
        target_size: f64,
    ) -> Option<&Overlay> {
        let (w, h) = (f64::from(image.width()), f64::from(image.height()));
        if w == 0.0 || h == 0.0 {
            log::warn!("ignoring {w}×{h} image overlay");
            return None;
        }
        if !(target_size.is_finite() && target_size > 0.0) {
            log::warn!("ignoring image overlay with target size {target_size}");
            return None;
        }
        let bounds = Bounds::new(
            self.config.spawn_x,
            self.config.spawn_y,
            w.min(target_size),
            h.min(target_size) * (h / w),
        );

        let id = OverlayId::next();
        self.mode = InteractionMode::Placing { id };
        log::debug!("placing {id}");
        Some(self.push_overlay(id, bounds, OverlayKind::Image { image }))
    }

    /// Remove an overlay. Clears selection and mode if they referenced it.
    /// Absent ids are a no-op.
    pub fn remove_overlay(&mut self, id: OverlayId) -> Option<Overlay> {
        let pos = self.overlays.iter().position(|o| o.id() == id)?;
        let removed = self.overlays.remove(pos);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.mode.target() == Some(id) {
            self.mode = InteractionMode::Idle;
        }
        log::info!("removed {id}, {} overlays left", self.overlays.len());
        Some(removed)
    }

    /// Remove the selected overlay, if any.
    pub fn remove_selected(&mut self) -> Option<Overlay> {
        let id = self.selected?;
        self.remove_overlay(id)
    }

    fn push_overlay(&mut self, id: OverlayId, bounds: Bounds, kind: OverlayKind) -> &Overlay {
        self.overlays.push(Overlay::new(id, bounds, kind));
        self.selected = Some(id);
        log::info!(
            "added {id} at ({}, {}) size {}×{}",
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
        &self.overlays[self.overlays.len() - 1]
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Hit-test topmost-first and select the result; a miss clears the
    /// selection.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<&Overlay> {
        self.selected = self.overlay_at(x, y).map(Overlay::id);
        self.selected_overlay()
    }

    /// Select an overlay by id, or clear with `None`. Unknown ids clear the
    /// selection. Returns whether the selection changed.
    pub fn select(&mut self, id: Option<OverlayId>) -> bool {
        let next = id.filter(|id| self.overlay(*id).is_some());
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    // ─── Interaction ─────────────────────────────────────────────────────

    /// Replace the session-wide interaction mode. Modes that target a
    /// missing overlay fall back to idle.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        let mode = match mode.target() {
            Some(id) if self.overlay(id).is_none() => InteractionMode::Idle,
            _ => mode,
        };
        if mode != self.mode {
            log::debug!("mode {:?} → {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Move an overlay's top-left corner. Coordinates are not clamped to
    /// the canvas. Returns `false` for unknown ids.
    pub fn move_overlay(&mut self, id: OverlayId, x: f64, y: f64) -> bool {
        match self.overlay_mut(id) {
            Some(overlay) => {
                overlay.set_position(x, y);
                true
            }
            None => false,
        }
    }

    /// Resize an overlay, flooring both axes at `min_overlay_size`.
    /// Text overlays ignore the requested height and keep their line height.
    pub fn resize_overlay(&mut self, id: OverlayId, width: f64, height: f64) -> bool {
        let min = self.config.min_overlay_size;
        let line_height = self.config.line_height_factor;
        match self.overlay_mut(id) {
            Some(overlay) => {
                let height = match overlay.font_size() {
                    Some(font_size) => font_size * line_height,
                    None => height.max(min),
                };
                overlay.set_size(width.max(min), height);
                true
            }
            None => false,
        }
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.iter_mut().find(|o| o.id() == id)
    }
}
