//! Core burn-simulation engine for the laser engraver preview tool.
//!
//! Reads G-code, accumulates beam energy on an auto-extending canvas
//! through the [`burn`] and [`diffusion`] kernels, and renders the
//! result with [`export`]. [`BurnSimulation`] is the single owned
//! struct a caller needs to drive a full run.

pub mod burn;
pub mod canvas;
pub mod diffusion;
pub mod export;
pub mod gcode;
pub mod material;
pub mod rasterizer;

use std::path::Path;

pub use canvas::{Canvas, CanvasError};
pub use export::ExportError;
pub use gcode::Driver;
pub use material::{InvalidMaterial, Material};

/// Ties a [`Canvas`], [`Material`], and [`gcode::Driver`] together for a
/// single end-to-end run: feed a G-code program in, get a PNG out.
pub struct BurnSimulation {
    canvas: Canvas,
    material: Material,
    driver: Driver,
}

impl BurnSimulation {
    /// Start a new simulation over an empty canvas with the given
    /// material and external power multiplier. `min_width`/`min_height`
    /// seed the canvas's initial bounding box at the origin so that, for
    /// example, an empty program with `-W 10 -H 10` still renders a
    /// 10x10 blank preview rather than a single pixel; the canvas still
    /// grows past this seed as needed.
    ///
    /// # Errors
    /// Returns `CanvasError::OutOfMemory` if the seed allocation fails.
    pub fn new(material: Material, multiply: f64, min_width: u32, min_height: u32) -> Result<Self, CanvasError> {
        let mut canvas = Canvas::new(min_width, min_height);
        if min_width > 0 || min_height > 0 {
            let x1 = i64::from(min_width.max(1)) - 1;
            let y1 = i64::from(min_height.max(1)) - 1;
            canvas.extend(0, 0, x1, y1)?;
        }
        Ok(Self {
            canvas,
            material,
            driver: Driver::new(multiply),
        })
    }

    /// Feed a full G-code program to the simulation.
    ///
    /// # Errors
    /// Propagates the first [`CanvasError`] encountered.
    pub fn run_gcode(&mut self, program: &str) -> Result<(), CanvasError> {
        self.driver
            .feed_program(&mut self.canvas, &mut self.material, program)
    }

    /// Bounds of the area touched so far, in pixel coordinates
    /// `(x0, y0, x1, y1)` inclusive, or `None` if nothing has burned yet.
    #[must_use]
    pub fn bounds(&self) -> Option<(i64, i64, i64, i64)> {
        self.canvas.bounds()
    }

    /// Render the simulation's canvas to PNG bytes.
    ///
    /// # Errors
    /// Propagates an [`ExportError`] from the encoder.
    pub fn encode_png(&self) -> Result<Vec<u8>, ExportError> {
        export::encode_png(&self.canvas)
    }

    /// Render and write the simulation's canvas to a PNG file.
    ///
    /// # Errors
    /// Propagates an [`ExportError`] from the encoder or filesystem.
    pub fn write_png_file(&self, path: &Path) -> Result<(), ExportError> {
        export::write_png_file(&self.canvas, path)
    }
}
