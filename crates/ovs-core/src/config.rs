//! Editor configuration.
//!
//! Every tunable constant of the editing session lives here. All fields
//! default to the values the editing page ships with; a JSON document can
//! override any subset of them.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for a [`SceneStore`](crate::scene::SceneStore) and the
/// pointer tools driving it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Floor for width and height during resize gestures. Default: **30**.
    pub min_overlay_size: f64,

    /// Side of the square resize handle at the bottom-right corner. Default: **8**.
    pub handle_size: f64,

    /// Top-left position of newly added overlays. Default: **(50, 50)**.
    pub spawn_x: f64,
    pub spawn_y: f64,

    /// Target size used for uploaded image overlays. Default: **200**.
    pub image_target_size: f64,

    /// Per-character width estimate, as a fraction of the font size. Default: **0.6**.
    pub text_width_factor: f64,

    /// Text box height as a multiple of the font size. Default: **1.2**.
    pub line_height_factor: f64,

    /// How far the selection highlight extends outside the box. Default: **2**.
    pub selection_outset: f64,

    /// Font-size range offered by the UI controls. Default: **12..=72**.
    pub min_font_size: f64,
    pub max_font_size: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_overlay_size: 30.0,
            handle_size: 8.0,
            spawn_x: 50.0,
            spawn_y: 50.0,
            image_target_size: 200.0,
            text_width_factor: 0.6,
            line_height_factor: 1.2,
            selection_outset: 2.0,
            min_font_size: 12.0,
            max_font_size: 72.0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config; missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` on malformed JSON or non-positive sizes.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every size is usable.
    ///
    /// # Errors
    /// Names the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_overlay_size", self.min_overlay_size),
            ("handle_size", self.handle_size),
            ("image_target_size", self.image_target_size),
            ("text_width_factor", self.text_width_factor),
            ("line_height_factor", self.line_height_factor),
            ("min_font_size", self.min_font_size),
            ("max_font_size", self.max_font_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.min_font_size > self.max_font_size {
            return Err(ConfigError::FontRange {
                min: self.min_font_size,
                max: self.max_font_size,
            });
        }
        Ok(())
    }

    /// Clamp a UI-supplied font size into the configured range.
    pub fn clamp_font_size(&self, size: f64) -> f64 {
        size.clamp(self.min_font_size, self.max_font_size)
    }

    /// Height of a text box for the given font size.
    pub fn text_height(&self, font_size: f64) -> f64 {
        font_size * self.line_height_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_editing_page() {
        let config = EditorConfig::default();
        assert_eq!(config.min_overlay_size, 30.0);
        assert_eq!(config.handle_size, 8.0);
        assert_eq!((config.spawn_x, config.spawn_y), (50.0, 50.0));
        assert_eq!(config.text_height(24.0), 24.0 * 1.2);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "handle_size": 12 }"#).unwrap();
        assert_eq!(
            config,
            EditorConfig {
                handle_size: 12.0,
                ..EditorConfig::default()
            }
        );
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let err = EditorConfig::from_json(r#"{ "min_overlay_size": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                field: "min_overlay_size",
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_font_range() {
        let err =
            EditorConfig::from_json(r#"{ "min_font_size": 80, "max_font_size": 20 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::FontRange { .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            EditorConfig::from_json("{ handle_size: }"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn clamps_font_size() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_font_size(4.0), 12.0);
        assert_eq!(config.clamp_font_size(100.0), 72.0);
        assert_eq!(config.clamp_font_size(30.0), 30.0);
    }
}
