//! Beam-material interaction: bilinear footprint, state-dependent
//! absorption, and the energy-threshold gate in front of diffusion.

use crate::canvas::{Canvas, CanvasError};
use crate::diffusion;
use crate::material::Material;

/// Round to the nearest 1/16th. Avoids rounding artifacts (phantom lines
/// or gaps) when the driver uses non-integer `pixel_size` values such as
/// 7/80 mm.
fn quantize(v: f64) -> f64 {
    (v * 16.0).round() / 16.0
}

/// Stamp one beam position into the canvas.
///
/// `x`, `y` are the floating-point beam center in pixel coordinates; `i`
/// is a unit-less intensity multiplier (already folded from spindle PWM
/// and any external power override). Up to four neighboring pixels
/// receive energy through bilinear coverage weighted by their current
/// accumulated burn, each gated by its own marking threshold before being
/// handed to the diffusion kernel.
///
/// # Errors
/// Returns `CanvasError::OutOfMemory` if the canvas cannot be extended to
/// cover this stamp's own footprint. Diffusion deposits beyond that
/// footprint fail silently (see [`diffusion::spread`]).
pub fn burn(canvas: &mut Canvas, material: &Material, x: f64, y: f64, i: f64) -> Result<(), CanvasError> {
    let x = quantize(x);
    let y = quantize(y);

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    canvas.extend(x0, y0, x1, y1)?;

    let dx = x - x0 as f64 - 0.5;
    let dy = y - y0 as f64 - 0.5;

    // Bilinear overlap fractions with the four surrounding pixel centers.
    let neighbors = [
        (x0, y0, dx * (1.0 - dy)),
        (x1, y0, (1.0 - dx) * (1.0 - dy)),
        (x0, y1, dx * dy),
        (x1, y1, (1.0 - dx) * dy),
    ];

    let pix_energy = i * f64::from(material.pixel_energy);

    for (nx, ny, s) in neighbors {
        let a = f64::from(canvas.at(nx, ny));

        let mut weight = s * f64::from(material.absorption) + s * f64::from(material.absorption_factor) * a;
        if material.absorption_factor < 0.0 {
            weight = weight.max(0.0);
        }

        weight *= i;
        weight = weight.min(1.0);

        let threshold = f64::from(material.energy_density) * (1.0 - a.sqrt());
        if pix_energy >= threshold {
            diffusion::spread(canvas, material, nx, ny, weight as f32);
        }
    }

    Ok(())
}
