//! Scene store → RGBA raster.
//!
//! Composites the base image and every overlay, oldest first, into a fresh
//! surface the size of the base image. Rendering reads the store and writes
//! only the returned surface, so identical state always yields identical
//! pixels.

use crate::error::RenderError;
use crate::text::FontBook;
use crate::theme::{RenderOptions, SelectionTheme, color_bytes};
use image::{Pixel, Rgba, RgbaImage};
use kurbo::Rect;
use ovs_core::SceneStore;
use ovs_core::model::{Bounds, DecodedImage, Overlay, OverlayKind};

/// Largest surface side a browser 2D canvas accepts.
pub const MAX_SURFACE_SIDE: u32 = 32_767;

/// Render the scene.
///
/// Returns `Ok(None)` when no base image is loaded: there is no canvas to
/// draw on yet.
///
/// # Errors
/// `SurfaceTooLarge` when the base image exceeds [`MAX_SURFACE_SIDE`].
pub fn render_scene(
    scene: &SceneStore,
    fonts: &mut FontBook,
    theme: &SelectionTheme,
    options: RenderOptions,
) -> Result<Option<RgbaImage>, RenderError> {
    let Some(base) = scene.base_image() else {
        log::trace!("render skipped: no base image");
        return Ok(None);
    };
    let (width, height) = base.dimensions();
    if width > MAX_SURFACE_SIDE || height > MAX_SURFACE_SIDE {
        return Err(RenderError::SurfaceTooLarge {
            width,
            height,
            max: MAX_SURFACE_SIDE,
        });
    }

    let mut surface = base.pixels().clone();
    let selected = if options.show_selection {
        scene.selected()
    } else {
        None
    };

    for overlay in scene.overlays() {
        paint_overlay(&mut surface, fonts, overlay);
        if selected == Some(overlay.id()) {
            paint_selection(&mut surface, scene, overlay.bounds(), theme);
        }
    }

    log::trace!(
        "rendered {width}×{height}, {} overlays",
        scene.overlays().len()
    );
    Ok(Some(surface))
}

fn paint_overlay(surface: &mut RgbaImage, fonts: &mut FontBook, overlay: &Overlay) {
    match overlay.kind() {
        OverlayKind::Text {
            content,
            font_size,
            font_family,
            color,
        } => {
            // Top-left anchored box, baseline one font size down.
            fonts.draw_text(
                surface,
                content,
                *font_size,
                *font_family,
                *color,
                overlay.x(),
                overlay.y() + font_size,
            );
        }
        OverlayKind::Image { image } => paint_image(surface, image, overlay.bounds()),
    }
}

// ─── Image overlays ──────────────────────────────────────────────────────

/// Draw `image` scaled to fill `bounds`, sampling only the visible part.
///
/// Nearest-pixel sampling keeps the output exact for a given state.
fn paint_image(surface: &mut RgbaImage, image: &DecodedImage, bounds: Bounds) {
    let dest = snap(bounds);
    if dest.width() <= 0.0 || dest.height() <= 0.0 {
        return;
    }
    let Some((x0, y0, x1, y1)) = clip(surface, dest) else {
        return;
    };

    let src = image.pixels();
    let (sw, sh) = src.dimensions();
    let scale_x = f64::from(sw) / dest.width();
    let scale_y = f64::from(sh) / dest.height();

    for py in y0..y1 {
        let sy = source_index(f64::from(py) - dest.y0, scale_y, sh);
        for px in x0..x1 {
            let sx = source_index(f64::from(px) - dest.x0, scale_x, sw);
            let sample = src.get_pixel(sx, sy);
            if sample[3] != 0 {
                surface.get_pixel_mut(px, py).blend(sample);
            }
        }
    }
}

/// Source pixel whose footprint covers the centre of destination pixel `offset`.
fn source_index(offset: f64, scale: f64, len: u32) -> u32 {
    let index = ((offset + 0.5) * scale).floor();
    (index.max(0.0) as u32).min(len.saturating_sub(1))
}

// ─── Selection chrome ────────────────────────────────────────────────────

fn paint_selection(
    surface: &mut RgbaImage,
    scene: &SceneStore,
    bounds: Bounds,
    theme: &SelectionTheme,
) {
    let config = scene.config();
    let outline = snap(bounds).inflate(config.selection_outset, config.selection_outset);

    fill_rect(surface, outline, color_bytes(theme.highlight));
    stroke_rect(surface, outline, color_bytes(theme.border));
    fill_rect(surface, snap(bounds.handle(config.handle_size)), color_bytes(theme.handle));
}

fn fill_rect(surface: &mut RgbaImage, rect: Rect, color: [u8; 4]) {
    let Some((x0, y0, x1, y1)) = clip(surface, rect) else {
        return;
    };
    let src = Rgba(color);
    for py in y0..y1 {
        for px in x0..x1 {
            surface.get_pixel_mut(px, py).blend(&src);
        }
    }
}

/// 1px outline drawn just inside `rect`.
fn stroke_rect(surface: &mut RgbaImage, rect: Rect, color: [u8; 4]) {
    if rect.width() < 1.0 || rect.height() < 1.0 {
        return;
    }
    let Rect { x0, y0, x1, y1 } = rect;
    fill_rect(surface, Rect::new(x0, y0, x1, y0 + 1.0), color);
    fill_rect(surface, Rect::new(x0, y1 - 1.0, x1, y1), color);
    fill_rect(surface, Rect::new(x0, y0 + 1.0, x0 + 1.0, y1 - 1.0), color);
    fill_rect(surface, Rect::new(x1 - 1.0, y0 + 1.0, x1, y1 - 1.0), color);
}

// ─── Geometry helpers ────────────────────────────────────────────────────

/// Overlay box → pixel-grid rectangle.
fn snap(bounds: Bounds) -> Rect {
    Rect::new(bounds.x, bounds.y, bounds.right(), bounds.bottom()).round()
}

/// Intersect with the surface; `None` when nothing is visible.
fn clip(surface: &RgbaImage, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = surface.dimensions();
    let visible = rect.intersect(Rect::new(0.0, 0.0, f64::from(width), f64::from(height)));
    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        return None;
    }
    // Already on the grid and inside the surface.
    Some((
        visible.x0 as u32,
        visible.y0 as u32,
        visible.x1 as u32,
        visible.y1 as u32,
    ))
}
