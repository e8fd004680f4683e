//! Ties the LZW and RLE codecs together with a palette into a
//! recoverable paletted bitmap: LZW -> RLE -> row-flip -> indexed image,
//! and the reverse for encoding.

use crate::{lzw, names, rle};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image width {width} does not evenly divide {pixel_count} decoded pixels")]
    WidthMismatch { width: usize, pixel_count: usize },
}

/// 256 RGB8 palette entries: 16 built-in base colors plus up to 112
/// externally supplied ones, each channel already expanded from 6-bit
/// VGA range via `<< 2`. Entries beyond what the source data supplies
/// are left zeroed, per spec.
pub type Palette = [[u8; 3]; 256];

const EXTERNAL_PALETTE_TRIPLES: usize = 112;

/// Builds the 256-entry palette from the fixed base table plus up to
/// 112 RGB triples (336 bytes) read from an external palette buffer.
pub fn load_palette(external: &[u8]) -> Palette {
    let mut palette = [[0u8; 3]; 256];
    for (i, base) in names::BASE_PALETTE.iter().enumerate() {
        palette[i] = [base[0] << 2, base[1] << 2, base[2] << 2];
    }

    let triples = (external.len() / 3).min(EXTERNAL_PALETTE_TRIPLES);
    for i in 0..triples {
        let off = i * 3;
        palette[16 + i] = [external[off] << 2, external[off + 1] << 2, external[off + 2] << 2];
    }
    palette
}

/// A decoded paletted bitmap: a top-down, row-major index buffer plus
/// its 256-color palette.
pub struct DecodedImage {
    pub width: usize,
    pub height: usize,
    pub indices: Vec<u8>,
    pub palette: Palette,
}

fn flip_rows(pixels: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; pixels.len()];
    for y in 0..height {
        for x in 0..width {
            out[(height - 1 - y) * width + x] = pixels[y * width + x];
        }
    }
    out
}

/// Decodes an LZW-compressed, RLE-packed pixel stream into an indexed
/// bitmap, combining it with a palette built from `palette_data`.
pub fn decode(lzw_data: &[u8], width: usize, palette_data: &[u8]) -> Result<DecodedImage, ImageError> {
    let decompressed = lzw::decode(lzw_data);
    let pixels = rle::unpack(&decompressed);

    if width == 0 || pixels.len() % width != 0 {
        return Err(ImageError::WidthMismatch { width, pixel_count: pixels.len() });
    }
    let height = pixels.len() / width;

    // On-disk payload is bottom-up; flip_rows is its own inverse, so the
    // same function recovers the top-down in-memory orientation.
    let indices = flip_rows(&pixels, width, height);

    Ok(DecodedImage { width, height, indices, palette: load_palette(palette_data) })
}

/// Encodes a top-down indexed bitmap back to an LZW-compressed, RLE-packed
/// byte stream, flipping rows to the on-disk bottom-up orientation first.
pub fn encode(indices: &[u8], width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
    if width == 0 || indices.len() != width * height {
        return Err(ImageError::WidthMismatch { width, pixel_count: indices.len() });
    }
    let flipped = flip_rows(indices, width, height);
    let packed = rle::pack(&flipped);
    Ok(lzw::encode(&packed))
}
