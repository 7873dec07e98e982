//! Recursive 3x3 energy-spreading kernel invoked on every burn deposit.

use crate::canvas::Canvas;
use crate::material::Material;

/// Magnitude floor below which a deposit is dropped without recursing
/// into neighbors. Bounds both the runtime and the spatial footprint of
/// a single stamp.
const CUTOFF: f32 = 0.05;

/// Deposit energy `v` at `(x, y)` and recursively spread into the 8
/// neighbors, scaled by `diffusion_lin` (orthogonal) or `diffusion_dia`
/// (diagonal). Terminates immediately — only the center is deposited —
/// once the incoming value drops below [`CUTOFF`].
///
/// A deposit that would require growing the canvas beyond what the
/// allocator can provide is dropped silently, along with any of its
/// descendants; this is the one failure mode diffusion swallows rather
/// than propagates, since the dropped energy decays geometrically and is
/// negligible against aborting a long-running simulation.
pub fn spread(canvas: &mut Canvas, material: &Material, x: i64, y: i64, v: f32) {
    if canvas.extend(x, y, x, y).is_err() {
        tracing::trace!(x, y, v, "diffusion deposit dropped: allocation failure");
        return;
    }
    *canvas.at_mut(x, y) += v * material.diffusion;

    if v < CUTOFF {
        return;
    }

    let lin = v * material.diffusion * material.diffusion_lin;
    let dia = v * material.diffusion * material.diffusion_dia;

    spread(canvas, material, x - 1, y, lin);
    spread(canvas, material, x + 1, y, lin);
    spread(canvas, material, x, y - 1, lin);
    spread(canvas, material, x, y + 1, lin);

    spread(canvas, material, x - 1, y - 1, dia);
    spread(canvas, material, x + 1, y - 1, dia);
    spread(canvas, material, x - 1, y + 1, dia);
    spread(canvas, material, x + 1, y + 1, dia);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn material() -> Material {
        Material::new(0.75, 2.0, 0.25, 0.1, 10.0, 0.5).unwrap()
    }

    #[test]
    fn conserves_total_energy_on_virgin_canvas() {
        let m = material();
        let mut c = Canvas::new(0, 0);
        spread(&mut c, &m, 0, 0, 1.0);

        let (x0, y0, x1, y1) = c.bounds().unwrap();
        let mut total = 0.0f64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                total += f64::from(c.at(x, y));
            }
        }
        assert_relative_eq!(total as f32, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn sub_cutoff_deposit_touches_exactly_one_cell() {
        let m = material();
        let mut c = Canvas::new(0, 0);
        spread(&mut c, &m, 0, 0, 0.04);
        let (x0, y0, x1, y1) = c.bounds().unwrap();
        assert_eq!((x0, y0, x1, y1), (0, 0, 0, 0));
    }
}
