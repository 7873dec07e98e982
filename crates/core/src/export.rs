//! Renders a [`Canvas`] to a grayscale PNG.

use std::io::Write;
use std::path::Path;

use image::{GrayImage, ImageError, Luma};

use crate::canvas::Canvas;

/// Failure while encoding or writing the rendered image.
#[derive(Debug)]
pub enum ExportError {
    /// The underlying `image` crate failed to encode the buffer.
    Encode(ImageError),
    /// Writing the encoded bytes to their destination failed.
    Io(std::io::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Encode(e) => write!(f, "PNG encoding failed: {e}"),
            ExportError::Io(e) => write!(f, "writing image failed: {e}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Encode(e) => Some(e),
            ExportError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

/// Render the canvas to an in-memory 8-bit grayscale image.
///
/// Each cell is clamped to `0..=1` and mapped to a pixel value of
/// `255 - floor(v * 255)`: an unburned cell (`0.0`) renders white, a
/// fully saturated cell (`>= 1.0`) renders black. Canvas row `y0` (the
/// lowest G-code Y) is placed at the bottom of the image. An empty
/// canvas (nothing ever burned) renders as a single white pixel.
#[must_use]
pub fn render(canvas: &Canvas) -> GrayImage {
    let Some((x0, y0, x1, y1)) = canvas.bounds() else {
        return GrayImage::from_pixel(1, 1, Luma([255]));
    };

    let width = (x1 - x0 + 1) as u32;
    let height = (y1 - y0 + 1) as u32;
    let mut img = GrayImage::new(width, height);

    for row in 0..height {
        let y = y0 + i64::from(row);
        // Flip vertically: canvas Y increases upward, image rows increase
        // downward.
        let out_row = height - 1 - row;
        for col in 0..width {
            let x = x0 + i64::from(col);
            let v = canvas.at(x, y).clamp(0.0, 1.0);
            let shade = 255 - (v * 255.0).floor() as u8;
            img.put_pixel(col, out_row, Luma([shade]));
        }
    }

    img
}

/// Render and encode the canvas as PNG bytes in memory.
///
/// # Errors
/// Returns `ExportError::Encode` if the `image` crate fails to encode
/// the buffer.
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>, ExportError> {
    let img = render(canvas);
    let mut buf = Vec::new();
    img.write_with_encoder(image::codecs::png::PngEncoder::new(&mut buf))
        .map_err(ExportError::Encode)?;
    Ok(buf)
}

/// Render and write the canvas as a PNG file at `path`.
///
/// # Errors
/// Returns `ExportError::Encode` on encoding failure, `ExportError::Io`
/// if the file cannot be created or written.
pub fn write_png_file(canvas: &Canvas, path: &Path) -> Result<(), ExportError> {
    let bytes = encode_png(canvas)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Render and write the canvas as PNG bytes to an arbitrary writer
/// (used by the CLI to stream to stdout).
///
/// # Errors
/// Returns `ExportError::Encode` on encoding failure, `ExportError::Io`
/// if writing to `w` fails.
pub fn write_png<W: Write>(canvas: &Canvas, mut w: W) -> Result<(), ExportError> {
    let bytes = encode_png(canvas)?;
    w.write_all(&bytes)?;
    Ok(())
}
