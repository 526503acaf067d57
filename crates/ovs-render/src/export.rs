//! Flattened raster export.

use crate::error::RenderError;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// File name offered for the downloaded raster.
pub const EXPORT_FILE_NAME: &str = "edited-image.png";

/// Lossless PNG encoding of `surface` at its native size.
///
/// # Errors
/// `RenderError::Encode` if the encoder fails.
pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut out = Cursor::new(Vec::with_capacity(surface.as_raw().len() / 4));
    surface.write_to(&mut out, ImageFormat::Png)?;
    let bytes = out.into_inner();
    log::info!(
        "exported {}×{} PNG ({} bytes)",
        surface.width(),
        surface.height(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn png_is_lossless() {
        let mut surface = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        surface.put_pixel(2, 1, Rgba([250, 128, 0, 64]));

        let bytes = encode_png(&surface).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let back = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(back, surface);
    }
}
