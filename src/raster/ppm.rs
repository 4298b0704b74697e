//! Random-access storage for P6 rasters.
//!
//! Rasters live on disk and are only ever touched through tile-sized
//! rectangular reads and writes, so memory use stays bounded by one tile
//! regardless of image size.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use rand::Rng;

use crate::error::{BlotError, Result};
use crate::raster::Tile;
use crate::types::Colour;

const BYTES_PER_PIXEL: u64 = 3;

/// An open P6 raster with random tile access.
///
/// The header is parsed once on open; tile reads and writes seek directly
/// into the pixel body. Dimensions are immutable for the life of the file.
pub struct Ppm {
    file: File,
    width: u32,
    height: u32,
    data_offset: u64,
}

impl Ppm {
    /// Open an existing raster for painting.
    ///
    /// Fails fast on a malformed header rather than carrying garbage
    /// dimensions into the tile math.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| BlotError::Io {
                path: path.to_path_buf(),
                message: format!("Failed to open raster: {}", e),
            })?;

        let magic = next_token(&mut file)?;
        if magic != "P6" {
            return Err(BlotError::Format {
                message: format!("Unsupported raster magic: {:?}", magic),
                help: Some("Only binary P6 PPM rasters are supported".to_string()),
            });
        }
        let width = parse_dimension(&next_token(&mut file)?, "width")?;
        let height = parse_dimension(&next_token(&mut file)?, "height")?;
        let maxval = next_token(&mut file)?;
        if maxval != "255" {
            return Err(BlotError::Format {
                message: format!("Unsupported channel depth: {}", maxval),
                help: Some("Only 8-bit channels (maxval 255) are supported".to_string()),
            });
        }
        // The token scan consumed the single whitespace byte after the
        // maxval, so the stream now sits on the first pixel.
        let data_offset = file.stream_position()?;

        Ok(Self {
            file,
            width,
            height,
            data_offset,
        })
    }

    /// Write a fresh `dim` x `dim` raster where each pixel is black or white
    /// by a fair coin flip. Test-fixture generation, driven by `generate`.
    pub fn create(path: &Path, dim: u32, rng: &mut impl Rng) -> Result<()> {
        let file = File::create(path).map_err(|e| BlotError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to create raster: {}", e),
        })?;
        let mut out = BufWriter::new(file);

        write!(out, "P6\n{} {}\n255\n", dim, dim)?;
        for _ in 0..(dim as u64 * dim as u64) {
            let colour = if rng.gen::<bool>() {
                Colour::BLACK
            } else {
                Colour::WHITE
            };
            out.write_all(&colour.to_bytes())?;
        }
        out.flush()?;

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read the tile anchored at (`x`, `y`), clamped to the raster bounds.
    ///
    /// An anchor outside the raster yields an empty tile; a rectangle that
    /// only partially overlaps is clipped, never an error.
    pub fn read_tile(&mut self, x: u32, y: u32, w: u32, h: u32) -> Result<Tile> {
        if x >= self.width || y >= self.height {
            return Ok(Tile::empty());
        }
        let w = w.min(self.width - x);
        let h = h.min(self.height - y);

        let mut pixels = Vec::with_capacity((w * h) as usize);
        let mut row_buf = vec![0u8; w as usize * BYTES_PER_PIXEL as usize];
        for row in 0..h {
            self.file
                .seek(SeekFrom::Start(self.pixel_offset(x, y + row)))?;
            self.file.read_exact(&mut row_buf)?;
            for px in row_buf.chunks_exact(BYTES_PER_PIXEL as usize) {
                pixels.push(Colour::from_bytes([px[0], px[1], px[2]]));
            }
        }

        Ok(Tile::from_pixels(w, h, pixels))
    }

    /// Write a tile back at (`x`, `y`), clipped the same way as reads.
    ///
    /// A tile whose anchor lies outside the raster is silently dropped.
    pub fn write_tile(&mut self, x: u32, y: u32, tile: &Tile) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Ok(());
        }
        let w = tile.width().min(self.width - x);
        let h = tile.height().min(self.height - y);

        let mut row_buf = Vec::with_capacity(w as usize * BYTES_PER_PIXEL as usize);
        for row in 0..h {
            row_buf.clear();
            for &colour in &tile.row(row)[..w as usize] {
                row_buf.extend_from_slice(&colour.to_bytes());
            }
            self.file
                .seek(SeekFrom::Start(self.pixel_offset(x, y + row)))?;
            self.file.write_all(&row_buf)?;
        }

        Ok(())
    }

    #[inline]
    fn pixel_offset(&self, x: u32, y: u32) -> u64 {
        self.data_offset + (y as u64 * self.width as u64 + x as u64) * BYTES_PER_PIXEL
    }
}

/// Scan the next whitespace-delimited header token, consuming its trailing
/// delimiter byte.
fn next_token(file: &mut File) -> Result<String> {
    let mut byte = read_header_byte(file)?;
    while byte.is_ascii_whitespace() {
        byte = read_header_byte(file)?;
    }
    let mut token = Vec::new();
    while !byte.is_ascii_whitespace() {
        token.push(byte);
        byte = read_header_byte(file)?;
    }
    String::from_utf8(token).map_err(|_| BlotError::Format {
        message: "Raster header is not ASCII".to_string(),
        help: None,
    })
}

fn read_header_byte(file: &mut File) -> Result<u8> {
    let mut buf = [0u8; 1];
    file.read_exact(&mut buf).map_err(|_| BlotError::Format {
        message: "Truncated raster header".to_string(),
        help: Some("Expected P6, dimensions, and maxval before pixel data".to_string()),
    })?;
    Ok(buf[0])
}

fn parse_dimension(token: &str, name: &str) -> Result<u32> {
    token.parse().map_err(|_| BlotError::Format {
        message: format!("Invalid raster {}: {:?}", name, token),
        help: None,
    })
}
