//! Text rasterization with cosmic-text.
//!
//! Shapes one line of text and composites swash glyph masks straight into
//! the RGBA surface. Text is drawn like a 2D canvas `fillText`: left
//! aligned, no wrapping, baseline at the given y.

use cosmic_text::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, SwashContent, fontdb,
};
use image::{Pixel, Rgba, RgbaImage};
use ovs_core::model::{Color, FontFamily};

/// Font database plus glyph cache shared by every frame of a session.
pub struct FontBook {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl FontBook {
    /// Load the host's installed fonts.
    pub fn new() -> Self {
        Self::from_font_system(FontSystem::new())
    }

    /// No fonts at all; text draws nothing until fonts are registered.
    /// The browser build starts here because it has no system fonts.
    pub fn empty() -> Self {
        Self::from_font_system(FontSystem::new_with_locale_and_db(
            "en-US".to_string(),
            fontdb::Database::new(),
        ))
    }

    fn from_font_system(font_system: FontSystem) -> Self {
        log::debug!("font book ready: {} faces", font_system.db().len());
        Self {
            font_system,
            swash_cache: SwashCache::new(),
        }
    }

    /// Add a TTF/OTF font from raw bytes.
    pub fn register_font(&mut self, data: Vec<u8>) {
        let db = self.font_system.db_mut();
        let before = db.len();
        db.load_font_data(data);
        log::info!("registered {} font face(s)", db.len() - before);
    }

    pub fn face_count(&self) -> usize {
        self.font_system.db().len()
    }

    /// Draw `content` with its baseline at `(x, baseline_y)`.
    ///
    /// Line breaks render as spaces, as on a 2D canvas. Pixels outside the
    /// surface are clipped.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        surface: &mut RgbaImage,
        content: &str,
        font_size: f64,
        family: FontFamily,
        color: Color,
        x: f64,
        baseline_y: f64,
    ) {
        let size = font_size as f32;
        if !(size.is_finite() && size > 0.0) || self.face_count() == 0 {
            return;
        }
        let line: String = content
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();

        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(size, size * 1.2));
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(
            &mut self.font_system,
            &line,
            &attrs(family),
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let (width, height) = surface.dimensions();
        let origin = (x as f32, baseline_y as f32);
        let mut glyphs = 0usize;

        // Single line: run.line_y is the buffer's own baseline, replaced by ours.
        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                let physical = glyph.physical(origin, 1.0);
                let Some(image) = self
                    .swash_cache
                    .get_image(&mut self.font_system, physical.cache_key)
                    .as_ref()
                else {
                    continue;
                };
                glyphs += 1;

                let left = physical.x + image.placement.left;
                let top = physical.y - image.placement.top;
                let (gw, gh) = (image.placement.width, image.placement.height);

                for gy in 0..gh {
                    let py = top + gy as i32;
                    if py < 0 || py >= height as i32 {
                        continue;
                    }
                    for gx in 0..gw {
                        let px = left + gx as i32;
                        if px < 0 || px >= width as i32 {
                            continue;
                        }
                        let i = (gy * gw + gx) as usize;
                        let src = match image.content {
                            SwashContent::Mask => {
                                Rgba([color.r, color.g, color.b, image.data[i]])
                            }
                            SwashContent::Color => {
                                let p = &image.data[i * 4..i * 4 + 4];
                                Rgba([p[0], p[1], p[2], p[3]])
                            }
                            SwashContent::SubpixelMask => {
                                let p = &image.data[i * 3..i * 3 + 3];
                                let sum = u16::from(p[0]) + u16::from(p[1]) + u16::from(p[2]);
                                let coverage = (sum / 3) as u8;
                                Rgba([color.r, color.g, color.b, coverage])
                            }
                        };
                        if src[3] != 0 {
                            surface.get_pixel_mut(px as u32, py as u32).blend(&src);
                        }
                    }
                }
            }
        }
        log::trace!("text {content:?} at ({x}, {baseline_y}): {glyphs} glyphs");
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish_non_exhaustive()
    }
}

/// Map the editor's families onto font database families.
fn attrs(family: FontFamily) -> Attrs<'static> {
    Attrs::new().family(Family::Name(family.css_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_book_draws_nothing() {
        let mut fonts = FontBook::empty();
        assert_eq!(fonts.face_count(), 0);

        let blank = RgbaImage::from_pixel(40, 20, Rgba([255, 255, 255, 255]));
        let mut surface = blank.clone();
        fonts.draw_text(
            &mut surface,
            "Hi",
            16.0,
            FontFamily::Arial,
            Color::BLACK,
            2.0,
            16.0,
        );
        assert_eq!(surface, blank);
    }

    #[test]
    fn garbage_font_bytes_are_ignored() {
        let mut fonts = FontBook::empty();
        fonts.register_font(vec![0, 1, 2, 3]);
        assert_eq!(fonts.face_count(), 0);
    }

    #[test]
    fn invalid_size_is_a_no_op() {
        let mut fonts = FontBook::empty();
        let mut surface = RgbaImage::new(4, 4);
        fonts.draw_text(
            &mut surface,
            "x",
            f64::NAN,
            FontFamily::CourierNew,
            Color::WHITE,
            0.0,
            0.0,
        );
        assert_eq!(surface, RgbaImage::new(4, 4));
    }
}
