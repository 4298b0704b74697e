//! Shape labelling and recolouring.
//!
//! This module holds the painting pipeline: a seedable colour allocator, the
//! colour equivalence registry, and the two-pass tiled painter that drives
//! them over an on-disk raster.

mod allocator;
mod painter;
mod registry;

pub use allocator::ColourAllocator;
pub use painter::{Painter, DEFAULT_KERNEL_DIM, MIN_KERNEL_DIM};
pub use registry::ColourRegistry;
