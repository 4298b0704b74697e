//! Shape colour allocation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Colour;

/// Generated channels stay in this range, keeping shape colours clear of the
/// white and black sentinels and visually distinct from the background.
const CHANNEL_MIN: u8 = 50;
const CHANNEL_MAX: u8 = 200;

/// Seedable source of fresh shape colours.
///
/// Every colour handed out is distinct: the allocator tracks what it has
/// issued and redraws on a repeat, so shape identity never collides. A fixed
/// seed reproduces the exact colour sequence run to run.
#[derive(Debug)]
pub struct ColourAllocator {
    rng: StdRng,
    issued: HashSet<Colour>,
}

impl ColourAllocator {
    /// Allocator with a fixed seed, for reproducible output.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    /// Allocator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    /// Draw the next unused shape colour.
    pub fn next_colour(&mut self) -> Colour {
        loop {
            let colour = Colour::rgb(
                self.rng.gen_range(CHANNEL_MIN..CHANNEL_MAX),
                self.rng.gen_range(CHANNEL_MIN..CHANNEL_MAX),
                self.rng.gen_range(CHANNEL_MIN..CHANNEL_MAX),
            );
            if self.issued.insert(colour) {
                return colour;
            }
        }
    }

    /// Forget the issued set so a new painting run starts clean.
    pub fn reset(&mut self) {
        self.issued.clear();
    }
}
