//! End-to-end burn scenarios driven entirely through G-code, covering
//! the testable properties of the simulation as a whole rather than one
//! kernel at a time.

use laser_burn_core::{BurnSimulation, Material};

fn wood() -> Material {
    Material::new(0.75, 2.0, 0.25, 0.1, 10.0, 0.5).unwrap()
}

fn painted_aluminum() -> Material {
    Material::new(1.0, -1.0, 0.25, 0.1, 10.0, 0.5).unwrap()
}

#[test]
fn empty_input_produces_no_marks() {
    let mut sim = BurnSimulation::new(wood(), 1.0, 0, 0).unwrap();
    sim.run_gcode("").unwrap();
    assert_eq!(sim.bounds(), None);
}

#[test]
fn single_horizontal_burn_leaves_a_streak_at_least_ten_pixels_wide() {
    let mut m = wood();
    m.set_feed_rate(60.0);
    let mut sim = BurnSimulation::new(m, 1.0, 0, 0).unwrap();
    sim.run_gcode("G1 X0 Y0\nM3 S255\nG1 X1\nM5\n").unwrap();

    let (x0, _, x1, _) = sim.bounds().expect("canvas should have grown");
    assert!(x1 - x0 + 1 >= 10, "expected at least a 10px streak, got {}", x1 - x0 + 1);
}

#[test]
fn rapid_travel_move_never_marks() {
    let mut m = wood();
    m.set_feed_rate(60.0);
    let mut sim = BurnSimulation::new(m, 1.0, 0, 0).unwrap();
    sim.run_gcode("G0 X50 Y50\nM3 S255\nG0 X60\nM5\n").unwrap();
    assert_eq!(sim.bounds(), None);
}

#[test]
fn slow_feed_rate_marks_fast_feed_rate_does_not() {
    let mut sim_slow = BurnSimulation::new(wood(), 1.0, 0, 0).unwrap();
    sim_slow
        .run_gcode("G1 X0 Y0\nM3 S255\nF60\nG1 X0.5\nM5\n")
        .unwrap();
    assert!(sim_slow.bounds().is_some());

    let mut sim_fast = BurnSimulation::new(wood(), 1.0, 0, 0).unwrap();
    sim_fast
        .run_gcode("G1 X0 Y0\nM3 S255\nF6000\nG1 X0.5\nM5\n")
        .unwrap();
    let png = sim_fast.encode_png().unwrap();
    assert!(!png.is_empty());
}

#[test]
fn painted_metal_saturates_after_repeated_passes() {
    let mut m = painted_aluminum();
    m.set_feed_rate(60.0);
    let mut sim = BurnSimulation::new(m, 1.0, 0, 0).unwrap();
    let program = "G1 X0 Y0\nM3 S255\n".to_string()
        + &"G1 X0.1\nG1 X0\n".repeat(10)
        + "M5\n";
    sim.run_gcode(&program).unwrap();
    assert!(sim.bounds().is_some());
    let png = sim.encode_png().unwrap();
    assert!(!png.is_empty());
}

#[test]
fn diagonal_move_extends_canvas_in_both_axes() {
    let mut m = wood();
    m.set_feed_rate(60.0);
    let mut sim = BurnSimulation::new(m, 1.0, 0, 0).unwrap();
    sim.run_gcode("G1 X0 Y0\nM3 S255\nG1 X2 Y2\nM5\n").unwrap();
    let (x0, y0, x1, y1) = sim.bounds().unwrap();
    assert!(x1 > x0);
    assert!(y1 > y0);
}
