//! Selection chrome colors and per-render options.

use peniko::Color;

/// Colors for the selected overlay's highlight, border and resize handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionTheme {
    /// Translucent fill over the (outset) selection box.
    pub highlight: Color,
    /// 1px outline of the selection box.
    pub border: Color,
    /// Solid resize handle square.
    pub handle: Color,
}

impl SelectionTheme {
    pub const fn new(highlight: Color, border: Color, handle: Color) -> Self {
        Self {
            highlight,
            border,
            handle,
        }
    }
}

impl Default for SelectionTheme {
    fn default() -> Self {
        Self::new(
            Color::from_rgba8(0, 120, 255, 48),
            Color::from_rgba8(0, 120, 255, 255),
            Color::from_rgba8(0, 120, 255, 255),
        )
    }
}

/// Switches that vary between on-screen frames and exported rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_selection: bool,
}

impl RenderOptions {
    /// Interactive frame: selection chrome included.
    pub const SCREEN: RenderOptions = RenderOptions {
        show_selection: true,
    };

    /// Exported raster: content only.
    pub const EXPORT: RenderOptions = RenderOptions {
        show_selection: false,
    };
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::SCREEN
    }
}

/// Straight-alpha RGBA bytes for a theme color.
pub fn color_bytes(color: Color) -> [u8; 4] {
    let c = color.to_rgba8();
    [c.r, c.g, c.b, c.a]
}
