//! Image decode boundary: raw bytes → `DecodedImage`.
//!
//! Decoding is the only operation in the editor that may take a while, so
//! besides the synchronous [`decode_image`] there is [`spawn_decode`], which
//! runs on a worker thread and hands back a [`PendingDecode`] the event loop
//! polls. Loads are never cancelled; dropping the handle just discards the
//! result.

use crate::error::DecodeError;
use crate::model::DecodedImage;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

type DecodeResult = Result<DecodedImage, DecodeError>;

/// Decode any raster format the `image` crate recognises into RGBA8.
///
/// # Errors
/// `DecodeError::Image` for corrupt or unsupported data,
/// `DecodeError::Empty` for images with a zero dimension.
pub fn decode_image(bytes: &[u8]) -> DecodeResult {
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }
    log::debug!("decoded {width}×{height} image ({} bytes)", bytes.len());
    Ok(DecodedImage::new(decoded.into_rgba8()))
}

/// A decode running in the background.
pub struct PendingDecode {
    receiver: Receiver<DecodeResult>,
    finished: bool,
}

impl PendingDecode {
    /// Non-blocking poll. Yields the result exactly once, then `None`.
    pub fn try_take(&mut self) -> Option<DecodeResult> {
        if self.finished {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(DecodeError::WorkerLost),
        };
        self.finished = true;
        Some(result)
    }

    /// Block until the decode completes.
    ///
    /// # Errors
    /// The decode error, or `WorkerLost` if the result was already taken.
    pub fn wait(mut self) -> DecodeResult {
        if self.finished {
            return Err(DecodeError::WorkerLost);
        }
        self.finished = true;
        self.receiver.recv().map_err(|_| DecodeError::WorkerLost)?
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Start decoding `bytes` off the event loop.
pub fn spawn_decode(bytes: Vec<u8>) -> PendingDecode {
    let (sender, receiver) = mpsc::channel();
    run_decode(sender, bytes);
    PendingDecode {
        receiver,
        finished: false,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run_decode(sender: Sender<DecodeResult>, bytes: Vec<u8>) {
    std::thread::spawn(move || deliver(&sender, &bytes));
}

// No threads in the browser: decode inline, the handle is ready at once.
#[cfg(target_arch = "wasm32")]
fn run_decode(sender: Sender<DecodeResult>, bytes: Vec<u8>) {
    deliver(&sender, &bytes);
}

fn deliver(sender: &Sender<DecodeResult>, bytes: &[u8]) {
    if sender.send(decode_image(bytes)).is_err() {
        log::debug!("decode finished after its handle was dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png_dimensions() {
        let img = decode_image(&png_bytes(7, 3)).unwrap();
        assert_eq!(img.dimensions(), (7, 3));
        assert_eq!(img.pixels().get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn corrupt_bytes_fail() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, DecodeError::Image(_)));
    }

    #[test]
    fn background_decode_delivers_once() {
        let mut pending = spawn_decode(png_bytes(4, 4));
        let result = loop {
            if let Some(result) = pending.try_take() {
                break result;
            }
            std::thread::yield_now();
        };
        assert_eq!(result.unwrap().dimensions(), (4, 4));
        assert!(pending.is_finished());
        assert!(pending.try_take().is_none());
    }

    #[test]
    fn background_decode_reports_failure() {
        let pending = spawn_decode(vec![0, 1, 2, 3]);
        assert!(pending.wait().is_err());
    }
}
