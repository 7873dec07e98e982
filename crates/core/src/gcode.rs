//! G-code word extraction and modal-state tracking.
//!
//! This is the "external collaborator" the distilled specification treats
//! as out of scope for the core engineering effort; it is implemented in
//! full here so the workspace is a runnable preview tool. It is a small,
//! tolerant, line-oriented word lexer — not a general G-code grammar.

use crate::canvas::{Canvas, CanvasError};
use crate::material::Material;
use crate::rasterizer;

/// Modal state carried across G-code lines.
///
/// `cur_x`/`cur_y` are already in the quantized pixel space described by
/// spec.md §4.5 — `X`/`Y` words arrive in mm and are converted once, on
/// the word that sets them, via [`quantize_coord`]. They are never
/// rescaled again before reaching [`rasterizer::draw_vector`].
#[derive(Debug, Clone, Copy)]
struct ModalState {
    drawing: bool,
    spindle_seen: bool,
    spindle_pwm: u8,
    cur_x: f64,
    cur_y: f64,
}

impl Default for ModalState {
    fn default() -> Self {
        Self {
            drawing: false,
            spindle_seen: false,
            spindle_pwm: 0,
            cur_x: 0.0,
            cur_y: 0.0,
        }
    }
}

/// Drives a [`Canvas`] from a G-code program, one line at a time.
///
/// Tracks `G0`/`G1`/`G2`/`G3` motion mode (arcs are treated as linear,
/// per the simulator's non-goals), `M3`/`M4`/`M5` spindle state, and `X`,
/// `Y`, `S`, `F` words. `X`/`Y` values are converted from mm to the
/// quantized pixel coordinate (`⌊v·zoom + zoom/16⌋`, `zoom = 1 /
/// pixel_size`) as each word is parsed. On any line whose final state
/// has motion enabled and a coordinate actually changed, issues one
/// [`rasterizer::draw_vector`] call between the previous and new
/// quantized pixel coordinates.
pub struct Driver {
    state: ModalState,
    /// External power override applied to every stamped segment
    /// (`--multiply`).
    multiply: f64,
}

impl Driver {
    /// Create a driver with the given external power multiplier.
    #[must_use]
    pub fn new(multiply: f64) -> Self {
        Self {
            state: ModalState::default(),
            multiply,
        }
    }

    /// Feed one line of G-code to the driver, updating modal state and
    /// issuing a `draw_vector` call if this line moves the beam while
    /// drawing is enabled.
    ///
    /// # Errors
    /// Propagates a [`CanvasError`] from the underlying rasterizer.
    pub fn feed_line(
        &mut self,
        canvas: &mut Canvas,
        material: &mut Material,
        line: &str,
    ) -> Result<(), CanvasError> {
        let line = match line.split(';').next() {
            Some(code) => code,
            None => return Ok(()),
        };

        let mut drawing = self.state.drawing;
        let mut new_x = self.state.cur_x;
        let mut new_y = self.state.cur_y;
        let mut moved = false;

        for word in line.split_ascii_whitespace() {
            let mut chars = word.chars();
            let Some(letter) = chars.next() else { continue };
            let tail = chars.as_str();
            let letter = letter.to_ascii_uppercase();
            let value = parse_tolerant(tail);

            match letter {
                'G' => match value as i64 {
                    0 => drawing = false,
                    1 | 2 | 3 => drawing = true,
                    _ => {}
                },
                'M' => match value as i64 {
                    3 | 4 => {
                        drawing = true;
                        if !self.state.spindle_seen {
                            self.state.spindle_pwm = 255;
                            self.state.spindle_seen = true;
                        }
                    }
                    5 => drawing = false,
                    _ => {}
                },
                'X' => {
                    new_x = quantize_coord(value, 1.0 / f64::from(material.pixel_size));
                    moved = true;
                }
                'Y' => {
                    new_y = quantize_coord(value, 1.0 / f64::from(material.pixel_size));
                    moved = true;
                }
                'S' => {
                    self.state.spindle_pwm = value.clamp(0.0, 255.0) as u8;
                    self.state.spindle_seen = true;
                }
                'F' => material.set_feed_rate(value as f32),
                _ => {
                    tracing::trace!(word, "unrecognized G-code word, ignored");
                }
            }
        }

        self.state.drawing = drawing;

        if drawing && moved && (new_x != self.state.cur_x || new_y != self.state.cur_y) {
            let intensity = f64::from(self.state.spindle_pwm) / 255.0 * self.multiply;
            rasterizer::draw_vector(
                canvas,
                material,
                self.state.cur_x,
                self.state.cur_y,
                new_x,
                new_y,
                intensity,
            )?;
        }

        self.state.cur_x = new_x;
        self.state.cur_y = new_y;
        Ok(())
    }

    /// Feed an entire G-code program, line by line.
    ///
    /// # Errors
    /// Propagates the first [`CanvasError`] encountered; remaining lines
    /// are not processed.
    pub fn feed_program(
        &mut self,
        canvas: &mut Canvas,
        material: &mut Material,
        program: &str,
    ) -> Result<(), CanvasError> {
        for line in program.lines() {
            self.feed_line(canvas, material, line)?;
        }
        Ok(())
    }
}

/// Convert an `X`/`Y` word's mm value to the quantized pixel coordinate
/// the rasterizer expects: `⌊v·zoom + zoom/16⌋`, per spec.md §4.5.
fn quantize_coord(v_mm: f64, zoom: f64) -> f64 {
    (v_mm * zoom + zoom / 16.0).floor()
}

/// Tolerant decimal parse: a leading sign, digits, an optional `.` and
/// more digits. A non-numeric or empty tail parses as `0.0` rather than
/// failing — malformed G-code words are non-fatal per the error taxonomy.
fn parse_tolerant(tail: &str) -> f64 {
    let mut end = 0;
    let bytes = tail.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return 0.0;
    }
    tail[..end].parse().unwrap_or(0.0)
}
