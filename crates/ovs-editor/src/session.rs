//! Editing session: scene store + pointer tool + renderer.
//!
//! The session is the one object a front-end talks to. Every event goes
//! through it, state-affecting events mark the cached frame dirty, and
//! `frame()` re-renders lazily so the surface always reflects settled
//! state.

use crate::input::{Cursor, InputEvent};
use crate::mutation::{SceneMutation, apply_all};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::PointerTool;
use ovs_core::assets::TemplateLibrary;
use ovs_core::decode::{PendingDecode, decode_image, spawn_decode};
use ovs_core::error::{AssetError, DecodeError, RemoteError};
use ovs_core::id::OverlayId;
use ovs_core::model::{Color, DecodedImage, FontFamily, InteractionMode};
use ovs_core::remote::{GenerateOverlayRequest, OverlayGenerator};
use ovs_core::{EditorConfig, RgbaImage, SceneStore};
use ovs_render::{
    FontBook, RenderError, RenderOptions, SelectionTheme, encode_png, hit_test, render_scene,
};

// ─── Background loads ────────────────────────────────────────────────────

/// What a background decode will become once it finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadTarget {
    BaseImage,
    /// An image overlay sized against `target_size`.
    Overlay { target_size: f64 },
}

/// Result of a finished background load, reported by [`EditorSession::poll_loads`].
#[derive(Debug)]
pub enum LoadOutcome {
    BaseImage { width: u32, height: u32 },
    Overlay { id: OverlayId },
    /// Decoding failed; the scene was not touched.
    Failed {
        target: LoadTarget,
        error: DecodeError,
    },
}

struct PendingLoad {
    target: LoadTarget,
    decode: PendingDecode,
}

// ─── Session ─────────────────────────────────────────────────────────────

pub struct EditorSession {
    scene: SceneStore,
    tool: PointerTool,
    fonts: FontBook,
    theme: SelectionTheme,
    frame: Option<RgbaImage>,
    dirty: bool,
    pending: Vec<PendingLoad>,
}

impl EditorSession {
    pub fn new(config: EditorConfig, fonts: FontBook) -> Self {
        Self {
            scene: SceneStore::new(config),
            tool: PointerTool::new(),
            fonts,
            theme: SelectionTheme::default(),
            frame: None,
            dirty: true,
            pending: Vec::new(),
        }
    }

    pub fn scene(&self) -> &SceneStore {
        &self.scene
    }

    pub fn config(&self) -> &EditorConfig {
        self.scene.config()
    }

    /// Make a font available to text overlays.
    pub fn register_font(&mut self, data: Vec<u8>) {
        self.fonts.register_font(data);
        self.dirty = true;
    }

    pub fn set_theme(&mut self, theme: SelectionTheme) {
        self.theme = theme;
        self.dirty = true;
    }

    /// Whether the next `frame()` call will re-render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn touch(&mut self, changed: bool) -> bool {
        self.dirty |= changed;
        changed
    }

    // ─── Content ─────────────────────────────────────────────────────────

    /// Decode and install a base image synchronously.
    ///
    /// # Errors
    /// The decode error; the session is unchanged.
    pub fn load_base_image(&mut self, bytes: &[u8]) -> Result<(u32, u32), DecodeError> {
        let dimensions = self.scene.load_base_image(bytes)?.dimensions();
        self.dirty = true;
        Ok(dimensions)
    }

    /// Add a text overlay; `None` when the input was ignored.
    pub fn add_text_overlay(
        &mut self,
        content: &str,
        font_size: f64,
        font_family: FontFamily,
        color: Color,
    ) -> Option<OverlayId> {
        let id = self
            .scene
            .add_text_overlay(content, font_size, font_family, color)?
            .id();
        self.dirty = true;
        Some(id)
    }

    /// Decode an uploaded image and start placing it.
    ///
    /// # Errors
    /// The decode error; no overlay is added.
    pub fn add_image_overlay(&mut self, bytes: &[u8]) -> Result<OverlayId, DecodeError> {
        let image = decode_image(bytes)?;
        let target = self.scene.config().image_target_size;
        self.place_decoded(image, target)
    }

    /// Add an already decoded image as an overlay at the configured target
    /// size. `None` when the image has a zero dimension.
    pub fn add_decoded_overlay(&mut self, image: DecodedImage) -> Option<OverlayId> {
        let target = self.scene.config().image_target_size;
        self.place_decoded(image, target).ok()
    }

    /// Like `add_decoded_overlay`, reporting a rejected image as empty.
    fn place_decoded(
        &mut self,
        image: DecodedImage,
        target_size: f64,
    ) -> Result<OverlayId, DecodeError> {
        let (width, height) = image.dimensions();
        let id = self
            .scene
            .add_image_overlay(image, target_size)
            .ok_or(DecodeError::Empty { width, height })?
            .id();
        self.dirty = true;
        Ok(id)
    }

    /// Add a default overlay from the template library.
    ///
    /// # Errors
    /// Any `AssetError`; the scene is unchanged.
    pub fn add_template_overlay(
        &mut self,
        library: &mut TemplateLibrary,
        name: &str,
    ) -> Result<OverlayId, AssetError> {
        let image = library.load(name)?;
        let target = self.scene.config().image_target_size;
        self.place_decoded(image, target).map_err(|source| AssetError::Decode {
            name: name.to_string(),
            source,
        })
    }

    /// Ask the generation service for an overlay and add it.
    ///
    /// # Errors
    /// `RemoteError` from the service or from decoding its reply. Nothing is
    /// added on failure.
    pub fn add_generated_overlay(
        &mut self,
        generator: &dyn OverlayGenerator,
        request: &GenerateOverlayRequest,
    ) -> Result<OverlayId, RemoteError> {
        let bytes = generator.generate(request).inspect_err(|e| {
            log::warn!("overlay generation for {:?} failed: {e}", request.text);
        })?;
        let image = decode_image(&bytes)?;
        let target = self.scene.config().image_target_size;
        Ok(self.place_decoded(image, target)?)
    }

    /// Remove the selected overlay. Returns `false` if nothing was selected.
    pub fn delete_selected(&mut self) -> bool {
        let changed = self.scene.remove_selected().is_some();
        self.touch(changed)
    }

    // ─── Background loads ────────────────────────────────────────────────

    /// Start decoding a base image without blocking input handling.
    pub fn begin_base_image_load(&mut self, bytes: Vec<u8>) {
        self.begin_load(LoadTarget::BaseImage, bytes);
    }

    /// Start decoding an overlay image without blocking input handling.
    pub fn begin_overlay_image_load(&mut self, bytes: Vec<u8>) {
        let target_size = self.scene.config().image_target_size;
        self.begin_load(LoadTarget::Overlay { target_size }, bytes);
    }

    fn begin_load(&mut self, target: LoadTarget, bytes: Vec<u8>) {
        log::debug!("queued {target:?} load ({} bytes)", bytes.len());
        self.pending.push(PendingLoad {
            target,
            decode: spawn_decode(bytes),
        });
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    /// Apply every finished load, in the order they were started.
    pub fn poll_loads(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut load in std::mem::take(&mut self.pending) {
            match load.decode.try_take() {
                None => still_pending.push(load),
                Some(Ok(image)) => outcomes.push(self.finish_load(load.target, image)),
                Some(Err(error)) => {
                    log::warn!("{:?} load failed: {error}", load.target);
                    outcomes.push(LoadOutcome::Failed {
                        target: load.target,
                        error,
                    });
                }
            }
        }

        self.pending = still_pending;
        outcomes
    }

    fn finish_load(&mut self, target: LoadTarget, image: DecodedImage) -> LoadOutcome {
        match target {
            LoadTarget::BaseImage => {
                self.dirty = true;
                let (width, height) = self.scene.set_base_image(image).dimensions();
                LoadOutcome::BaseImage { width, height }
            }
            LoadTarget::Overlay { target_size } => match self.place_decoded(image, target_size) {
                Ok(id) => LoadOutcome::Overlay { id },
                Err(error) => LoadOutcome::Failed { target, error },
            },
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Dispatch any input event. Returns whether the scene changed.
    ///
    /// Keys go through the shortcut map; an export shortcut changes nothing
    /// here, use [`handle_key`](Self::handle_key) to learn about it.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Key {
            key,
            ctrl,
            shift,
            alt,
            meta,
        } = event
        {
            return self
                .handle_key(key, *ctrl, *shift, *alt, *meta)
                .is_some_and(|(_, changed)| changed);
        }

        let hit = match *event {
            InputEvent::PointerDown { x, y } => hit_test(&self.scene, x, y),
            _ => None,
        };
        let mutations = self.tool.handle(event, hit, &self.scene);
        let changed = apply_all(&mut self.scene, mutations);
        self.touch(changed)
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_down(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_move(x, y))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_up(x, y))
    }

    /// Resolve and apply a keyboard shortcut. Returns the action and
    /// whether the scene changed, or `None` for an unbound key.
    ///
    /// Delete and deselect act on the session. Export is returned for the
    /// caller to carry out with [`export_png`](Self::export_png).
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<(ShortcutAction, bool)> {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta)?;
        log::debug!("shortcut {key:?} → {action:?}");
        Some((action, self.apply_shortcut(action)))
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Deselect => {
                let changed = apply_all(
                    &mut self.scene,
                    vec![
                        SceneMutation::SetMode {
                            mode: InteractionMode::Idle,
                        },
                        SceneMutation::Select { id: None },
                    ],
                );
                self.touch(changed)
            }
            ShortcutAction::Export => false,
        }
    }

    /// Cursor hint for a hovering pointer. Never mutates state.
    pub fn cursor_at(&self, x: f64, y: f64) -> Cursor {
        let placing = matches!(self.scene.mode(), InteractionMode::Placing { .. });
        if placing || self.scene.overlay_at(x, y).is_some() {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The current on-screen frame, with selection chrome.
    ///
    /// Re-renders only after a state change. `Ok(None)` until a base image
    /// is loaded.
    ///
    /// # Errors
    /// Any `RenderError` from the renderer.
    pub fn frame(&mut self) -> Result<Option<&RgbaImage>, RenderError> {
        if self.dirty {
            self.frame = render_scene(
                &self.scene,
                &mut self.fonts,
                &self.theme,
                RenderOptions::SCREEN,
            )?;
            self.dirty = false;
        }
        Ok(self.frame.as_ref())
    }

    /// Export is available once a base image is loaded.
    pub fn can_export(&self) -> bool {
        self.scene.base_image().is_some()
    }

    /// PNG bytes of the content without selection chrome.
    ///
    /// `Ok(None)` when there is no base image: export is unavailable rather
    /// than failing.
    ///
    /// # Errors
    /// Any `RenderError` from rendering or encoding.
    pub fn export_png(&mut self) -> Result<Option<Vec<u8>>, RenderError> {
        let Some(surface) = render_scene(
            &self.scene,
            &mut self.fonts,
            &self.theme,
            RenderOptions::EXPORT,
        )?
        else {
            log::debug!("export unavailable: no base image");
            return Ok(None);
        };
        encode_png(&surface).map(Some)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default(), FontBook::new())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("scene", &self.scene)
            .field("dirty", &self.dirty)
            .field("pending_loads", &self.pending.len())
            .finish_non_exhaustive()
    }
}
