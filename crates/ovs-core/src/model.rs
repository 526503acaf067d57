//! Core data model for the overlay editor.
//!
//! A session owns one base raster and an ordered list of overlays drawn on
//! top of it. Overlays are either text or image; both share a top-left
//! anchored bounding box in canvas pixels (origin top-left, y-down).
//! Z-order is insertion order: later overlays draw on top.

use crate::id::OverlayId;
use image::RgbaImage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ─── Colors ──────────────────────────────────────────────────────────────

/// Opaque RGB text fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string: `#RGB` or `#RRGGBB`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 => {
                let r = hex_val(bytes[0])?;
                let g = hex_val(bytes[1])?;
                let b = hex_val(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Emit as lowercase `#rrggbb`, the form a browser color input produces.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

// ─── Fonts ───────────────────────────────────────────────────────────────

/// The fixed set of font families offered for text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    #[serde(rename = "Arial")]
    Arial,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    #[serde(rename = "Courier New")]
    CourierNew,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [
        FontFamily::Arial,
        FontFamily::TimesNewRoman,
        FontFamily::CourierNew,
    ];

    /// The CSS family name, as used in a `{size}px {family}` font string.
    pub fn css_name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::CourierNew => "Courier New",
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontFamily::ALL
            .into_iter()
            .find(|family| family.css_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown font family {s:?}"))
    }
}

// ─── Rasters ─────────────────────────────────────────────────────────────

/// A decoded raster with known intrinsic dimensions.
///
/// Cloning shares the pixel buffer; nothing in the editor ever writes to it.
#[derive(Clone)]
pub struct DecodedImage {
    pixels: Arc<RgbaImage>,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether both handles point at the same pixel buffer.
    pub fn shares_pixels(&self, other: &DecodedImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecodedImage({}×{})", self.width(), self.height())
    }
}

/// The background raster. Its intrinsic size is the canvas size.
#[derive(Debug, Clone)]
pub struct BaseImage {
    image: DecodedImage,
}

impl BaseImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        self.image.pixels()
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }
}

impl From<DecodedImage> for BaseImage {
    fn from(image: DecodedImage) -> Self {
        Self { image }
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Axis-aligned box in canvas pixels, anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// The `size`×`size` resize handle tucked into the bottom-right corner.
    pub fn handle(&self, size: f64) -> Bounds {
        Bounds::new(self.right() - size, self.bottom() - size, size, size)
    }
}

// ─── Overlays ────────────────────────────────────────────────────────────

/// What an overlay draws.
#[derive(Debug, Clone)]
pub enum OverlayKind {
    Text {
        content: String,
        /// Font size in pixels.
        font_size: f64,
        font_family: FontFamily,
        color: Color,
    },
    Image {
        image: DecodedImage,
    },
}

/// A positioned, resizable object drawn atop the base image.
///
/// Position and size only change through the scene store, which keeps the
/// text-height and minimum-size invariants.
#[derive(Debug, Clone)]
pub struct Overlay {
    id: OverlayId,
    bounds: Bounds,
    kind: OverlayKind,
}

impl Overlay {
    pub(crate) fn new(id: OverlayId, bounds: Bounds, kind: OverlayKind) -> Self {
        Self { id, bounds, kind }
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn kind(&self) -> &OverlayKind {
        &self.kind
    }

    pub fn x(&self) -> f64 {
        self.bounds.x
    }

    pub fn y(&self) -> f64 {
        self.bounds.y
    }

    pub fn width(&self) -> f64 {
        self.bounds.width
    }

    pub fn height(&self) -> f64 {
        self.bounds.height
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, OverlayKind::Text { .. })
    }

    /// Font size for text overlays, `None` for images.
    pub fn font_size(&self) -> Option<f64> {
        match self.kind {
            OverlayKind::Text { font_size, .. } => Some(font_size),
            OverlayKind::Image { .. } => None,
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        self.bounds.contains(px, py)
    }

    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.bounds.x = x;
        self.bounds.y = y;
    }

    pub(crate) fn set_size(&mut self, width: f64, height: f64) {
        self.bounds.width = width;
        self.bounds.height = height;
    }
}

// ─── Interaction mode ────────────────────────────────────────────────────

/// The single session-wide pointer interaction in progress.
///
/// Exactly one variant is active, so two overlays can never both claim a
/// drag or resize.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// A freshly added overlay follows the pointer until the next click.
    Placing { id: OverlayId },
    /// Position follows the pointer minus the grab offset.
    Dragging {
        id: OverlayId,
        offset_x: f64,
        offset_y: f64,
    },
    /// Size follows the pointer relative to the fixed top-left corner.
    Resizing { id: OverlayId },
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// The overlay this interaction operates on.
    pub fn target(&self) -> Option<OverlayId> {
        match *self {
            InteractionMode::Idle => None,
            InteractionMode::Placing { id }
            | InteractionMode::Dragging { id, .. }
            | InteractionMode::Resizing { id } => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_colors() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("FF8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn hex_emit_is_lowercase() {
        assert_eq!(Color::rgb(0xAB, 0x0C, 0xFF).to_hex(), "#ab0cff");
    }

    #[test]
    fn font_family_from_css_name() {
        assert_eq!("Arial".parse::<FontFamily>(), Ok(FontFamily::Arial));
        assert_eq!(
            "times new roman".parse::<FontFamily>(),
            Ok(FontFamily::TimesNewRoman)
        );
        assert!("Comic Sans".parse::<FontFamily>().is_err());
        assert_eq!(FontFamily::CourierNew.to_string(), "Courier New");
    }

    #[test]
    fn bounds_containment_is_inclusive() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert!(b.contains(10.0, 20.0));
        assert!(b.contains(40.0, 60.0));
        assert!(!b.contains(40.1, 60.0));
        assert!(!b.contains(9.9, 30.0));
    }

    #[test]
    fn handle_sits_in_bottom_right_corner() {
        let b = Bounds::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.handle(8.0), Bounds::new(32.0, 52.0, 8.0, 8.0));
    }

    #[test]
    fn cloned_images_share_pixels() {
        let a = DecodedImage::new(RgbaImage::new(2, 2));
        let b = a.clone();
        let c = DecodedImage::new(RgbaImage::new(2, 2));
        assert!(a.shares_pixels(&b));
        assert!(!a.shares_pixels(&c));
    }
}
