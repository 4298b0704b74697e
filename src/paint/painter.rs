//! Two-pass tiled shape colouring.
//!
//! The first pass walks the raster in tiles that overlap their neighbours by
//! one pixel, colouring marked pixels from their already-processed up/left
//! neighbours and registering equivalences where two colours meet. The
//! overlap means every non-edge tile starts with a resolved top row and left
//! column written by the adjoining tiles, which is what carries shape
//! identity across tile seams. The second pass re-reads the raster at the
//! full tile stride and collapses every pixel to its canonical colour.

use crate::error::Result;
use crate::paint::{ColourAllocator, ColourRegistry};
use crate::raster::{Ppm, Tile};

/// Default tile edge length.
pub const DEFAULT_KERNEL_DIM: u32 = 16;

/// Smallest usable tile edge. Below this the overlapping first-pass stride
/// (kernel minus one) would stop advancing.
pub const MIN_KERNEL_DIM: u32 = 2;

/// Labels connected shapes in a raster and recolours each one.
///
/// A painter is reusable: `paint` resets all run state before returning.
pub struct Painter {
    registry: ColourRegistry,
    kernel: u32,
}

impl Painter {
    /// Create a painter with the given tile edge length, clamped to
    /// [`MIN_KERNEL_DIM`].
    pub fn new(kernel: u32, allocator: ColourAllocator) -> Self {
        Self {
            registry: ColourRegistry::new(allocator),
            kernel: kernel.max(MIN_KERNEL_DIM),
        }
    }

    pub fn kernel(&self) -> u32 {
        self.kernel
    }

    /// Colour every shape in the raster and return how many were found.
    pub fn paint(&mut self, ppm: &mut Ppm) -> Result<usize> {
        // Advancing by kernel - 1 leaves a one-pixel overlap, so each tile's
        // top row and left column already hold colours written by the
        // previous tiles.
        let step = self.kernel - 1;
        let mut y = 0;
        while y < ppm.height() {
            let mut x = 0;
            while x < ppm.width() {
                let mut tile = ppm.read_tile(x, y, self.kernel, self.kernel)?;
                if x == 0 {
                    self.seed_left_column(&mut tile);
                }
                if y == 0 {
                    self.seed_top_row(&mut tile);
                }
                self.colour_tile(&mut tile);
                ppm.write_tile(x, y, &tile)?;
                x += step;
            }
            y += step;
        }

        self.resolve_raster(ppm)?;

        let shapes = self.registry.shapes();
        self.registry.reset();
        Ok(shapes)
    }

    /// Seed the left boundary column of a tile on the raster's left edge.
    ///
    /// Walks the column with a cursor: a marked pixel continues the cursor's
    /// colour when the pixel above it was marked, otherwise it starts a new
    /// shape. A black top-left pixel primes the cursor with a fresh colour
    /// so the walk never propagates the uncoloured sentinel.
    fn seed_left_column(&mut self, tile: &mut Tile) {
        if tile.is_empty() {
            return;
        }
        let mut prev = tile.get(0, 0);
        if prev.is_black() {
            prev = self.registry.allocate();
        }
        for y in 0..tile.height() {
            let mut c = tile.get(0, y);
            if c.is_marked() {
                c = if prev.is_marked() {
                    prev
                } else {
                    self.registry.allocate()
                };
            }
            prev = c;
            tile.set(0, y, c);
        }
    }

    /// Seed the top boundary row of a tile on the raster's top edge.
    fn seed_top_row(&mut self, tile: &mut Tile) {
        if tile.is_empty() {
            return;
        }
        let mut prev = tile.get(0, 0);
        if prev.is_black() {
            prev = self.registry.allocate();
        }
        for x in 0..tile.width() {
            let mut c = tile.get(x, 0);
            if c.is_marked() {
                c = if prev.is_marked() {
                    prev
                } else {
                    self.registry.allocate()
                };
            }
            prev = c;
            tile.set(x, 0, c);
        }
    }

    /// Forward scan over the tile interior.
    ///
    /// Row 0 and column 0 are already coloured, either by edge seeding or by
    /// the one-pixel overlap with previously written tiles. Each marked
    /// pixel inherits from the pixel above when that is marked, else from
    /// the pixel to the left, else starts a new shape; when both neighbours
    /// are marked they belong to the same shape and their colours are
    /// merged.
    fn colour_tile(&mut self, tile: &mut Tile) {
        for y in 1..tile.height() {
            for x in 1..tile.width() {
                if !tile.get(x, y).is_marked() {
                    continue;
                }
                let above = tile.get(x, y - 1);
                let left = tile.get(x - 1, y);
                if above.is_marked() && left.is_marked() {
                    self.registry.merge(left, above);
                }
                let c = if above.is_marked() {
                    above
                } else if left.is_marked() {
                    left
                } else {
                    self.registry.allocate()
                };
                tile.set(x, y, c);
            }
        }
    }

    /// Second full pass: rewrite every pixel as its canonical colour.
    ///
    /// No new equivalences appear here, so tiles advance by the full kernel
    /// with no overlap. White and black have no registry entries and pass
    /// through unchanged.
    fn resolve_raster(&mut self, ppm: &mut Ppm) -> Result<()> {
        let mut y = 0;
        while y < ppm.height() {
            let mut x = 0;
            while x < ppm.width() {
                let mut tile = ppm.read_tile(x, y, self.kernel, self.kernel)?;
                self.resolve_tile(&mut tile);
                ppm.write_tile(x, y, &tile)?;
                x += self.kernel;
            }
            y += self.kernel;
        }
        Ok(())
    }

    fn resolve_tile(&self, tile: &mut Tile) {
        for y in 0..tile.height() {
            for x in 0..tile.width() {
                let resolved = self.registry.resolve(tile.get(x, y));
                tile.set(x, y, resolved);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;

    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    /// Write a raster from a character grid: `#` is black, anything else
    /// white.
    fn write_grid(path: &Path, rows: &[&str]) {
        let width = rows[0].len();
        let height = rows.len();
        let mut bytes = format!("P6\n{} {}\n255\n", width, height).into_bytes();
        for row in rows {
            for ch in row.chars() {
                let colour = if ch == '#' {
                    Colour::BLACK
                } else {
                    Colour::WHITE
                };
                bytes.extend_from_slice(&colour.to_bytes());
            }
        }
        fs::write(path, bytes).unwrap();
    }

    fn paint_grid(rows: &[&str], kernel: u32) -> (usize, Tile) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("grid.ppm");
        write_grid(&path, rows);

        let mut ppm = Ppm::open(&path).unwrap();
        let mut painter = Painter::new(kernel, ColourAllocator::seeded(9));
        let shapes = painter.paint(&mut ppm).unwrap();
        let all = ppm.read_tile(0, 0, ppm.width(), ppm.height()).unwrap();
        (shapes, all)
    }

    /// Distinct non-white colours present in a tile.
    fn shape_colours(tile: &Tile) -> HashSet<Colour> {
        let mut set = HashSet::new();
        for y in 0..tile.height() {
            for x in 0..tile.width() {
                let c = tile.get(x, y);
                if c.is_marked() {
                    set.insert(c);
                }
            }
        }
        set
    }

    #[test]
    fn test_all_white_raster_is_untouched() {
        let (shapes, tile) = paint_grid(&["....", "....", "....", "...."], 4);
        assert_eq!(shapes, 0);
        assert_eq!(tile, Tile::filled(4, 4, Colour::WHITE));
    }

    #[test]
    fn test_single_isolated_pixel() {
        let (shapes, tile) = paint_grid(&["....", ".#..", "....", "...."], 4);
        assert_eq!(shapes, 1);

        let c = tile.get(1, 1);
        assert_ne!(c, Colour::WHITE);
        assert_ne!(c, Colour::BLACK);
        assert_eq!(shape_colours(&tile).len(), 1);
    }

    #[test]
    fn test_black_top_left_pixel() {
        let (shapes, tile) = paint_grid(&["#...", "....", "....", "...."], 4);
        assert_eq!(shapes, 1);
        assert!(!tile.get(0, 0).is_black());
        assert!(tile.get(0, 0).is_marked());
    }

    #[test]
    fn test_single_blob_gets_one_colour() {
        let (shapes, tile) = paint_grid(
            &[
                "........",
                ".###....",
                ".#.#....",
                ".###....",
                "........",
                "........",
                "........",
                "........",
            ],
            8,
        );
        assert_eq!(shapes, 1);
        assert_eq!(shape_colours(&tile).len(), 1);
        // The enclosed hole and the surroundings stay white.
        assert_eq!(tile.get(2, 2), Colour::WHITE);
        assert_eq!(tile.get(0, 0), Colour::WHITE);
    }

    #[test]
    fn test_two_separate_blobs() {
        let (shapes, tile) = paint_grid(
            &[
                "##......",
                "##......",
                "........",
                "......##",
                "......##",
                "........",
                "........",
                "........",
            ],
            8,
        );
        assert_eq!(shapes, 2);
        let colours = shape_colours(&tile);
        assert_eq!(colours.len(), 2);
        assert_ne!(tile.get(0, 0), tile.get(7, 3));
    }

    #[test]
    fn test_diagonal_touch_is_not_connected() {
        let (shapes, tile) = paint_grid(&["#...", ".#..", "....", "...."], 4);
        assert_eq!(shapes, 2);
        assert_ne!(tile.get(0, 0), tile.get(1, 1));
    }

    #[test]
    fn test_u_shape_merges_to_one() {
        // The two arms are discovered separately and meet at the bottom,
        // forcing a registry merge.
        let (shapes, tile) = paint_grid(
            &[
                "#..#",
                "#..#",
                "#..#",
                "####",
            ],
            4,
        );
        assert_eq!(shapes, 1);
        assert_eq!(shape_colours(&tile).len(), 1);
    }

    #[test]
    fn test_horizontal_run_across_tile_boundary() {
        // Kernel 4 on an 8-wide raster puts a tile seam at x = 3/4; the run
        // spans it and must resolve to a single colour.
        let (shapes, tile) = paint_grid(
            &[
                "........",
                "..####..",
                "........",
                "........",
                "........",
                "........",
                "........",
                "........",
            ],
            4,
        );
        assert_eq!(shapes, 1);
        assert_eq!(tile.get(3, 1), tile.get(4, 1));
        assert_eq!(shape_colours(&tile).len(), 1);
    }

    #[test]
    fn test_vertical_run_across_tile_boundary() {
        let (shapes, tile) = paint_grid(
            &[
                "........",
                "..#.....",
                "..#.....",
                "..#.....",
                "..#.....",
                "..#.....",
                "........",
                "........",
            ],
            4,
        );
        assert_eq!(shapes, 1);
        assert_eq!(tile.get(2, 3), tile.get(2, 4));
        assert_eq!(shape_colours(&tile).len(), 1);
    }

    #[test]
    fn test_all_black_raster_collapses_to_one_shape() {
        let rows = vec!["########"; 8];
        let (shapes, tile) = paint_grid(&rows, 4);
        assert_eq!(shapes, 1);
        assert_eq!(shape_colours(&tile).len(), 1);
        assert!(!tile.get(0, 0).is_black());
    }

    #[test]
    fn test_no_black_pixels_survive_painting() {
        let rows = vec![
            "#.#.#.#.",
            ".#.#.#.#",
            "#.#.#.#.",
            ".#.#.#.#",
            "#.#.#.#.",
            ".#.#.#.#",
            "#.#.#.#.",
            ".#.#.#.#",
        ];
        let (shapes, tile) = paint_grid(&rows, 4);
        // A checkerboard has no 4-connected neighbours: every marked pixel
        // is its own shape.
        assert_eq!(shapes, 32);
        for y in 0..tile.height() {
            for x in 0..tile.width() {
                assert!(!tile.get(x, y).is_black());
            }
        }
    }

    #[test]
    fn test_fixed_seed_reproduces_output() {
        let rows = [
            "##..##..",
            "##..##..",
            "........",
            "...##...",
            "...##...",
            "........",
            "#......#",
            "........",
        ];
        let dir = tempdir().unwrap();
        let (a, b) = (dir.path().join("a.ppm"), dir.path().join("b.ppm"));
        write_grid(&a, &rows);
        write_grid(&b, &rows);

        for path in [&a, &b] {
            let mut ppm = Ppm::open(path).unwrap();
            let mut painter = Painter::new(4, ColourAllocator::seeded(123));
            painter.paint(&mut ppm).unwrap();
        }

        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_painter_is_reusable_after_paint() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.ppm");
        let second = dir.path().join("second.ppm");
        write_grid(&first, &["##..", "##..", "....", "...."]);
        write_grid(&second, &["#..#", "....", "....", "#..#"]);

        let mut painter = Painter::new(4, ColourAllocator::seeded(5));

        let mut ppm = Ppm::open(&first).unwrap();
        assert_eq!(painter.paint(&mut ppm).unwrap(), 1);

        let mut ppm = Ppm::open(&second).unwrap();
        assert_eq!(painter.paint(&mut ppm).unwrap(), 4);
    }

    #[test]
    fn test_kernel_below_minimum_is_clamped() {
        let painter = Painter::new(0, ColourAllocator::seeded(1));
        assert_eq!(painter.kernel(), MIN_KERNEL_DIM);

        let (shapes, _) = paint_grid(&["##", "##"], 2);
        assert_eq!(shapes, 1);
    }

    #[test]
    fn test_smallest_kernel_still_connects_shapes() {
        let rows = vec![
            "####....",
            "...#....",
            "...#####",
            "........",
        ];
        let (shapes, tile) = paint_grid(&rows, 2);
        assert_eq!(shapes, 1);
        assert_eq!(shape_colours(&tile).len(), 1);
    }

    #[test]
    fn test_non_square_raster() {
        let rows = vec![
            "###..........###",
            "#..............#",
            "#..............#",
        ];
        let (shapes, tile) = paint_grid(&rows, 4);
        assert_eq!(shapes, 2);
        assert_eq!(shape_colours(&tile).len(), 2);
    }
}
