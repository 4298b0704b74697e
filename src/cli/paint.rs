//! Paint command implementation.
//!
//! Copies the input raster byte-for-byte, then labels and recolours
//! connected shapes in the copy, leaving the input untouched.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::error::{BlotError, Result};
use crate::output::{display_path, plural, Printer};
use crate::paint::{ColourAllocator, Painter, DEFAULT_KERNEL_DIM};
use crate::raster::Ppm;

/// Label connected shapes in a raster and recolour each one
#[derive(Args, Debug)]
pub struct PaintArgs {
    /// Input raster (binary P6 PPM)
    pub input: PathBuf,

    /// Output raster; the input is copied here and painted in place
    pub output: PathBuf,

    /// Tile edge length; values below 2 are clamped to 2
    #[arg(long, short, default_value_t = DEFAULT_KERNEL_DIM)]
    pub kernel: u32,

    /// Seed for shape colours; omit for a different palette each run
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: PaintArgs, printer: &Printer) -> Result<()> {
    fs::copy(&args.input, &args.output).map_err(|e| BlotError::Io {
        path: args.input.clone(),
        message: format!("Failed to copy raster: {}", e),
    })?;

    let mut ppm = Ppm::open(&args.output)?;
    let allocator = match args.seed {
        Some(seed) => ColourAllocator::seeded(seed),
        None => ColourAllocator::from_entropy(),
    };
    let mut painter = Painter::new(args.kernel, allocator);

    printer.status(
        "Painting",
        &format!(
            "{} ({}x{}, kernel {})",
            display_path(&args.output),
            ppm.width(),
            ppm.height(),
            painter.kernel()
        ),
    );

    let shapes = painter.paint(&mut ppm)?;

    printer.success(
        "Painted",
        &format!(
            "{} in {}",
            plural(shapes, "shape", "shapes"),
            display_path(&args.output)
        ),
    );
    println!("shapes: {}", shapes);

    Ok(())
}
