//! Material and beam parameters, and the derived coefficients that follow
//! from them.

use std::fmt;

/// Malformed material or beam parameters (non-positive `pixel_size` or
/// `beam_power`).
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidMaterial(pub String);

impl fmt::Display for InvalidMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid material parameter: {}", self.0)
    }
}

impl std::error::Error for InvalidMaterial {}

/// Physical coefficients coupling the beam to the material being
/// engraved, plus the feed-rate-derived quantities needed by the burn
/// kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base coupling coefficient of virgin material, `0..1`.
    pub absorption: f32,
    /// Linear modulation of absorption by local accumulated burn.
    /// Positive: material grows more sensitive as it darkens (wood).
    /// Negative: already-engraved areas stop absorbing (painted metal).
    pub absorption_factor: f32,
    /// Fraction of delivered energy re-emitted to each orthogonal
    /// neighbor during diffusion.
    pub diffusion_lin: f32,
    /// Fraction re-emitted to each diagonal neighbor: `diffusion_lin ^ sqrt(2)`.
    pub diffusion_dia: f32,
    /// Normalization coefficient so that
    /// `diffusion * (1 + 4*diffusion_lin + 4*diffusion_dia) = 1`.
    pub diffusion: f32,
    /// Physical size of one pixel, in mm.
    pub pixel_size: f32,
    /// Joules delivered per pixel-distance of travel at the current feed
    /// rate. Re-derived whenever a feed-rate word is observed.
    pub pixel_energy: f32,
    /// Laser power in Watts.
    pub beam_power: f32,
    /// Minimum energy, in Joules, to visibly mark one pixel at the
    /// current `pixel_size`. Stored as given (J/mm^2): at defaults this
    /// is what keeps the feed-rate gate meaningful — `pixel_size^2` is
    /// on the order of 1e-2, and pre-multiplying by it would shrink the
    /// threshold far below a fast pass's `pixel_energy`, marking
    /// segments that should stay below threshold.
    pub energy_density: f32,
}

impl Material {
    /// Construct a material, deriving `diffusion_dia` and `diffusion`
    /// from `diffusion_lin` so the energy-conservation identity holds
    /// exactly (within float rounding) from the start of simulation.
    ///
    /// `energy_density` is given in J/mm^2 and stored as-is; it is
    /// compared directly against `pixel_energy` (also Joules) in the
    /// burn kernel's marking gate.
    ///
    /// # Errors
    /// Returns `InvalidMaterial` if `pixel_size` or `beam_power` is not
    /// strictly positive.
    pub fn new(
        absorption: f32,
        absorption_factor: f32,
        diffusion_lin: f32,
        pixel_size: f32,
        beam_power: f32,
        energy_density_per_mm2: f32,
    ) -> Result<Self, InvalidMaterial> {
        if !(pixel_size > 0.0) {
            return Err(InvalidMaterial(format!(
                "pixel_size must be > 0, got {pixel_size}"
            )));
        }
        if !(beam_power > 0.0) {
            return Err(InvalidMaterial(format!(
                "beam_power must be > 0, got {beam_power}"
            )));
        }

        let diffusion_dia = diffusion_lin.powf(std::f32::consts::SQRT_2);
        let diffusion = 1.0 / (1.0 + 4.0 * diffusion_lin + 4.0 * diffusion_dia);

        Ok(Self {
            absorption,
            absorption_factor,
            diffusion_lin,
            diffusion_dia,
            diffusion,
            pixel_size,
            pixel_energy: 0.0,
            beam_power,
            energy_density: energy_density_per_mm2,
        })
    }

    /// Recompute `pixel_energy` from an observed feed rate `f_mm_per_min`
    /// (G-code `F` word, mm/min): `pixel_energy = beam_power * pixel_size
    /// * 60 / F`.
    pub fn set_feed_rate(&mut self, f_mm_per_min: f32) {
        if f_mm_per_min > 0.0 {
            self.pixel_energy = self.beam_power * self.pixel_size * 60.0 / f_mm_per_min;
        }
    }
}
