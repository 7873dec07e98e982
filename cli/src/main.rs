//! Laser engraver burn-simulation preview.
//!
//! Reads a G-code program from standard input, simulates beam-material
//! interaction on an auto-extending energy canvas, and writes a
//! grayscale PNG preview to `--output` or to standard output.

use std::io::Read;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;
use laser_burn_core::{BurnSimulation, Material};

#[derive(Parser, Debug)]
#[command(name = "laser-preview")]
#[command(about = "Simulate laser engraver burn marks from G-code and render a PNG preview", long_about = None)]
struct Args {
    /// Initial canvas minimum width, in pixels.
    #[arg(short = 'W', long, default_value_t = 0)]
    width: u32,

    /// Initial canvas minimum height, in pixels.
    #[arg(short = 'H', long, default_value_t = 0)]
    height: u32,

    /// Material base absorption.
    #[arg(short, long, default_value_t = 0.75)]
    absorption: f32,

    /// Absorption feedback factor.
    #[arg(short = 'A', long = "absorption_mul", default_value_t = 2.0)]
    absorption_mul: f32,

    /// Linear diffusion ratio (orthogonal neighbor re-emission).
    #[arg(short, long, default_value_t = 0.25)]
    diffusion: f32,

    /// Marking threshold, in J/mm².
    #[arg(short = 'e', long = "energy-density", default_value_t = 0.5)]
    energy_density: f32,

    /// Power multiplier applied to every stamped segment.
    #[arg(short, long, default_value_t = 1.0)]
    multiply: f64,

    /// PNG output path; standard output when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pixel size, in mm/px. Must be greater than 0.
    #[arg(short, long = "pixel-size", default_value_t = 0.1)]
    pixel_size: f32,

    /// Laser power, in Watts.
    #[arg(short = 'P', long = "beam-power", default_value_t = 10.0)]
    beam_power: f32,

    /// Enable verbose (debug/trace) logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug)]
enum CliError {
    /// Malformed option or missing argument, from `clap`.
    Arg(clap::Error),
    Material(laser_burn_core::InvalidMaterial),
    Canvas(laser_burn_core::CanvasError),
    Io(std::io::Error),
    Export(laser_burn_core::ExportError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Arg(e) => write!(f, "{e}"),
            CliError::Material(e) => write!(f, "{e}"),
            CliError::Canvas(e) => write!(f, "{e}"),
            CliError::Io(e) => write!(f, "{e}"),
            CliError::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<laser_burn_core::InvalidMaterial> for CliError {
    fn from(e: laser_burn_core::InvalidMaterial) -> Self {
        CliError::Material(e)
    }
}

impl From<laser_burn_core::CanvasError> for CliError {
    fn from(e: laser_burn_core::CanvasError) -> Self {
        CliError::Canvas(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<laser_burn_core::ExportError> for CliError {
    fn from(e: laser_burn_core::ExportError) -> Self {
        CliError::Export(e)
    }
}

impl From<clap::Error> for CliError {
    fn from(e: clap::Error) -> Self {
        CliError::Arg(e)
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let material = Material::new(
        args.absorption,
        args.absorption_mul,
        args.diffusion,
        args.pixel_size,
        args.beam_power,
        args.energy_density,
    )?;

    let mut sim = BurnSimulation::new(material, args.multiply, args.width, args.height)?;

    let mut program = String::new();
    std::io::stdin().read_to_string(&mut program)?;

    sim.run_gcode(&program)?;

    match args.output {
        Some(path) => {
            tracing::debug!(path = %path.display(), "writing PNG output");
            sim.write_png_file(&path)?;
        }
        None => {
            let bytes = sim.encode_png()?;
            std::io::Write::write_all(&mut std::io::stdout(), &bytes)?;
        }
    }

    Ok(())
}

/// Print a `CliError` to stderr with a usage hint and exit with status 1,
/// the one non-zero exit code spec.md §7 defines for every fatal failure
/// class (malformed argument, allocation failure, PNG write failure, ...).
fn report_and_exit(e: CliError) -> ! {
    eprintln!("laser-preview: {e}");
    eprintln!("usage: laser-preview [OPTIONS] < input.gcode > output.png");
    std::process::exit(1);
}

fn main() {
    // `try_parse` instead of `parse`: clap's own default error path exits
    // with status 2 on a malformed option or missing argument, but
    // spec.md §6/§7 require exit code 1 for that failure class. `-h`/
    // `--help` (and `--version`) still exit 0 through clap's own
    // `Error::exit`, which is the documented behavior for those kinds.
    let args = Args::try_parse().unwrap_or_else(|e| {
        if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            e.exit();
        }
        report_and_exit(CliError::from(e));
    });

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        report_and_exit(e);
    }
}
