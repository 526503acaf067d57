//! WASM bridge for Overlay Studio: exposes the editing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the editing page.

use ovs_core::model::{Color, FontFamily, Overlay, OverlayKind};
use ovs_core::{EditorConfig, SceneStore};
use ovs_editor::{EditorSession, LoadOutcome, LoadTarget, ShortcutAction};
use ovs_render::{EXPORT_FILE_NAME, FontBook};
use serde::Serialize;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// The main WASM-facing canvas controller.
///
/// Holds the editing session. All interaction from the page goes through
/// this struct; methods returning `bool` report whether the canvas needs a
/// fresh `render`.
#[wasm_bindgen]
pub struct OverlayCanvas {
    session: EditorSession,
}

#[wasm_bindgen]
impl OverlayCanvas {
    /// Create a controller with the default configuration.
    ///
    /// The browser has no system font database; call `register_font` with
    /// font bytes before text overlays can draw.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self::with(EditorConfig::default())
    }

    /// Create a controller from a JSON configuration document.
    /// Missing fields keep their defaults.
    pub fn with_config(config_json: &str) -> Result<OverlayCanvas, JsValue> {
        console_error_panic_hook_setup();
        let config = EditorConfig::from_json(config_json).map_err(to_js_error)?;
        Ok(Self::with(config))
    }

    /// Add a font face (TTF/OTF bytes) for text rendering.
    pub fn register_font(&mut self, data: Vec<u8>) {
        self.session.register_font(data);
    }

    // ─── Content ─────────────────────────────────────────────────────────

    /// Decode and install the base image. Returns `[width, height]`.
    pub fn load_base_image(&mut self, bytes: &[u8]) -> Result<Vec<u32>, JsValue> {
        let (width, height) = self.session.load_base_image(bytes).map_err(to_js_error)?;
        Ok(vec![width, height])
    }

    /// Decode an uploaded image and start placing it. Returns its id.
    pub fn add_image_overlay(&mut self, bytes: &[u8]) -> Result<String, JsValue> {
        let id = self.session.add_image_overlay(bytes).map_err(to_js_error)?;
        Ok(id.to_string())
    }

    /// Add a text overlay. `family` is a CSS family name, `color` a hex
    /// string; unknown values fall back to Arial and black. Returns the new
    /// id, or `undefined` when the text is blank.
    pub fn add_text_overlay(
        &mut self,
        content: &str,
        font_size: f64,
        family: &str,
        color: &str,
    ) -> Option<String> {
        let font_size = self.session.config().clamp_font_size(font_size);
        let family = family.parse::<FontFamily>().unwrap_or_default();
        let color = Color::from_hex(color).unwrap_or(Color::BLACK);
        self.session
            .add_text_overlay(content, font_size, family, color)
            .map(|id| id.to_string())
    }

    /// Remove the selected overlay.
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    // ─── Background loads ────────────────────────────────────────────────

    pub fn begin_base_image_load(&mut self, bytes: Vec<u8>) {
        self.session.begin_base_image_load(bytes);
    }

    pub fn begin_overlay_image_load(&mut self, bytes: Vec<u8>) {
        self.session.begin_overlay_image_load(bytes);
    }

    pub fn pending_loads(&self) -> usize {
        self.session.pending_loads()
    }

    /// Apply finished loads. Returns a JSON array of outcomes, e.g.
    /// `[{"kind":"base","width":800,"height":600}]`.
    pub fn poll_loads(&mut self) -> String {
        let outcomes: Vec<LoadOutcomeJson> = self
            .session
            .poll_loads()
            .iter()
            .map(LoadOutcomeJson::from)
            .collect();
        serde_json::to_string(&outcomes).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Pointer & Keyboard ──────────────────────────────────────────────

    pub fn handle_pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_down(x, y)
    }

    pub fn handle_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_move(x, y)
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.session.pointer_up(x, y)
    }

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>"}`.
    ///
    /// `"export"` asks the page to call `export_png` and download the result.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let outcome = self.session.handle_key(key, ctrl, shift, alt, meta);
        key_result_json(outcome)
    }

    /// CSS cursor for a hovering pointer.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        self.session.cursor_at(x, y).css_name().to_string()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Paint the current frame into a 2D context, resizing its canvas to
    /// the base image. Draws nothing until a base image is loaded.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
        let Some(frame) = self.session.frame().map_err(to_js_error)? else {
            return Ok(());
        };
        let (width, height) = frame.dimensions();

        if let Some(canvas) = ctx.canvas() {
            if canvas.width() != width || canvas.height() != height {
                canvas.set_width(width);
                canvas.set_height(height);
            }
        }

        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(frame.as_raw().as_slice()),
            width,
            height,
        )?;
        ctx.put_image_data(&data, 0.0, 0.0)
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn can_export(&self) -> bool {
        self.session.can_export()
    }

    /// PNG bytes of the edited image, without selection chrome.
    /// `undefined` when there is no base image.
    pub fn export_png(&mut self) -> Result<Option<js_sys::Uint8Array>, JsValue> {
        let bytes = self.session.export_png().map_err(to_js_error)?;
        Ok(bytes.map(|b| js_sys::Uint8Array::from(b.as_slice())))
    }

    /// Suggested download name for `export_png`.
    pub fn export_file_name() -> String {
        EXPORT_FILE_NAME.to_string()
    }

    // ─── Scene queries ───────────────────────────────────────────────────

    /// All overlays in paint order as a JSON array.
    pub fn get_overlays_json(&self) -> String {
        overlays_json(self.session.scene())
    }

    /// Id of the selected overlay, or empty string.
    pub fn get_selected_id(&self) -> String {
        self.session
            .scene()
            .selected()
            .map(|id| id.to_string())
            .unwrap_or_default()
    }

    /// `[width, height]` of the base image, or empty when none is loaded.
    pub fn canvas_size(&self) -> Vec<u32> {
        self.session
            .scene()
            .canvas_size()
            .map(|(w, h)| vec![w, h])
            .unwrap_or_default()
    }
}

impl OverlayCanvas {
    fn with(config: EditorConfig) -> Self {
        log::debug!("overlay canvas created with {config:?}");
        Self {
            session: EditorSession::new(config, FontBook::empty()),
        }
    }
}

impl Default for OverlayCanvas {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a JSON configuration document. Returns an empty string if valid,
/// otherwise the error message.
#[wasm_bindgen]
pub fn validate_config(config_json: &str) -> String {
    match EditorConfig::from_json(config_json) {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}

// ─── JSON shapes ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlayJson<'a> {
    id: String,
    kind: &'static str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_family: Option<FontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    selected: bool,
}

impl<'a> OverlayJson<'a> {
    fn new(overlay: &'a Overlay, selected: bool) -> Self {
        let mut json = Self {
            id: overlay.id().to_string(),
            kind: "image",
            x: overlay.x(),
            y: overlay.y(),
            width: overlay.width(),
            height: overlay.height(),
            text: None,
            font_size: None,
            font_family: None,
            color: None,
            selected,
        };
        if let OverlayKind::Text {
            content,
            font_size,
            font_family,
            color,
        } = overlay.kind()
        {
            json.kind = "text";
            json.text = Some(content);
            json.font_size = Some(*font_size);
            json.font_family = Some(*font_family);
            json.color = Some(*color);
        }
        json
    }
}

fn overlays_json(scene: &SceneStore) -> String {
    let selected = scene.selected();
    let list: Vec<OverlayJson<'_>> = scene
        .overlays()
        .iter()
        .map(|o| OverlayJson::new(o, Some(o.id()) == selected))
        .collect();
    serde_json::to_string(&list).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum LoadOutcomeJson {
    Base { width: u32, height: u32 },
    Overlay { id: String },
    Failed { target: &'static str, error: String },
}

impl From<&LoadOutcome> for LoadOutcomeJson {
    fn from(outcome: &LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::BaseImage { width, height } => Self::Base {
                width: *width,
                height: *height,
            },
            LoadOutcome::Overlay { id } => Self::Overlay { id: id.to_string() },
            LoadOutcome::Failed { target, error } => Self::Failed {
                target: match target {
                    LoadTarget::BaseImage => "base",
                    LoadTarget::Overlay { .. } => "overlay",
                },
                error: error.to_string(),
            },
        }
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Delete => "delete",
        ShortcutAction::Deselect => "deselect",
        ShortcutAction::Export => "export",
    }
}

fn key_result_json(outcome: Option<(ShortcutAction, bool)>) -> String {
    let (action_name, changed) = outcome.map_or(("none", false), |(action, changed)| {
        (action_to_name(action), changed)
    });
    format!(r#"{{"changed":{changed},"action":"{action_name}"}}"#)
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Set up panic hook for better error messages.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Overlay Studio WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_result_shapes() {
        assert_eq!(
            key_result_json(Some((ShortcutAction::Delete, true))),
            r#"{"changed":true,"action":"delete"}"#
        );
        assert_eq!(
            key_result_json(None),
            r#"{"changed":false,"action":"none"}"#
        );
    }

    #[test]
    fn overlays_json_lists_text_fields_and_selection() {
        let mut scene = SceneStore::default();
        let id = scene
            .add_text_overlay("SALE", 20.0, FontFamily::Arial, Color::rgb(255, 0, 0))
            .unwrap()
            .id();
        scene.select(Some(id));

        let value: serde_json::Value = serde_json::from_str(&overlays_json(&scene)).unwrap();
        let first = &value[0];
        assert_eq!(first["kind"], "text");
        assert_eq!(first["text"], "SALE");
        assert_eq!(first["fontSize"], 20.0);
        assert_eq!(first["width"], 48.0);
        assert_eq!(first["fontFamily"], "Arial");
        assert_eq!(first["selected"], true);
    }

    #[test]
    fn handle_key_reports_action_and_change() {
        let mut canvas = OverlayCanvas::default();
        canvas.add_text_overlay("hi", 20.0, "Arial", "#000");
        assert_eq!(
            canvas.handle_key("Escape", false, false, false, false),
            r#"{"changed":true,"action":"deselect"}"#
        );
        assert_eq!(
            canvas.handle_key("Delete", false, false, false, false),
            r#"{"changed":false,"action":"delete"}"#
        );
        assert_eq!(
            canvas.handle_key("q", false, false, false, false),
            r#"{"changed":false,"action":"none"}"#
        );
    }

    #[test]
    fn empty_scene_lists_nothing() {
        assert_eq!(overlays_json(&SceneStore::default()), "[]");
    }

    #[test]
    fn validate_config_reports_errors() {
        assert_eq!(validate_config(r#"{"handle_size": 10}"#), "");
        assert!(!validate_config("not json").is_empty());
    }
}
