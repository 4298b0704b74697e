//! blot - Connected-shape painter for black-and-white rasters
//!
//! A library for labelling 4-connected regions of marked pixels in large
//! on-disk PPM images and recolouring each region with a distinct colour.
//! The raster is processed through fixed-size tiles with random file access,
//! so memory use stays bounded by one tile regardless of image size.

pub mod cli;
pub mod error;
pub mod output;
pub mod paint;
pub mod raster;
pub mod types;

pub use error::{BlotError, Result};
pub use paint::{ColourAllocator, ColourRegistry, Painter, DEFAULT_KERNEL_DIM, MIN_KERNEL_DIM};
pub use raster::{Ppm, Tile};
pub use types::Colour;
