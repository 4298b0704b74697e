//! Generate command implementation.
//!
//! Writes a random square black-and-white raster for exercising the painter.

use std::path::PathBuf;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::raster::Ppm;

/// Generate a random black-and-white square raster
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Edge length of the square raster
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub dim: u32,

    /// Output path for the generated raster
    pub output: PathBuf,

    /// Seed for the pixel coin flips
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ppm::create(&args.output, args.dim, &mut rng)?;

    printer.success(
        "Generated",
        &format!(
            "{} ({}x{})",
            display_path(&args.output),
            args.dim,
            args.dim
        ),
    );

    Ok(())
}
