pub mod completions;
pub mod generate;
pub mod paint;

use clap::{Parser, Subcommand};

/// blot - Connected-shape painter for black-and-white PPM images
#[derive(Parser, Debug)]
#[command(name = "blot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Label connected shapes in a raster and recolour each one
    Paint(paint::PaintArgs),

    /// Generate a random black-and-white square raster
    Generate(generate::GenerateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
