//! Thin collaborator around the `png` crate for 8-bit indexed-color PNG
//! with an explicit palette — the one shape `image`'s `DynamicImage`
//! can't express directly (it always expands indexed PNGs to RGB(A) on
//! decode and has no indexed variant to encode from). The image
//! pipeline only ever hands this module raw palette + index buffers.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use crate::image::Palette;

#[derive(Debug, thiserror::Error)]
pub enum PngIoError {
    #[error("failed to open {0}: {1}")]
    Open(String, #[source] io::Error),
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("PNG is not 8-bit indexed color")]
    NotIndexed,
}

/// Writes an indexed bitmap as an 8-bit paletted PNG, preserving the full
/// 256-entry palette even if some colors are unused.
pub fn write_indexed_png(
    path: &Path,
    width: usize,
    height: usize,
    indices: &[u8],
    palette: &Palette,
) -> Result<(), PngIoError> {
    let file = File::create(path).map_err(|e| PngIoError::Open(path.display().to_string(), e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    let plte: Vec<u8> = palette.iter().flat_map(|c| c.iter().copied()).collect();
    encoder.set_palette(plte);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(indices)?;
    Ok(())
}

/// Reads an 8-bit indexed PNG back into raw indices + its palette.
pub fn read_indexed_png(path: &Path) -> Result<(usize, usize, Vec<u8>, Palette), PngIoError> {
    let file = File::open(path).map_err(|e| PngIoError::Open(path.display().to_string(), e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder.read_info()?;

    if reader.output_color_type().0 != png::ColorType::Indexed {
        return Err(PngIoError::NotIndexed);
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let mut palette = [[0u8; 3]; 256];
    if let Some(plte) = reader.info().palette.as_ref() {
        for (i, chunk) in plte.chunks_exact(3).enumerate().take(256) {
            palette[i] = [chunk[0], chunk[1], chunk[2]];
        }
    }

    Ok((info.width as usize, info.height as usize, buf, palette))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_indices_and_palette_through_a_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let width = 4;
        let height = 2;
        let indices: Vec<u8> = vec![0, 1, 2, 3, 3, 2, 1, 0];
        let mut palette = [[0u8; 3]; 256];
        for (i, entry) in palette.iter_mut().enumerate() {
            *entry = [(i as u8).wrapping_mul(3), (i as u8).wrapping_mul(5), (i as u8).wrapping_mul(7)];
        }

        write_indexed_png(&path, width, height, &indices, &palette).unwrap();
        let (read_width, read_height, read_indices, read_palette) = read_indexed_png(&path).unwrap();

        assert_eq!(read_width, width);
        assert_eq!(read_height, height);
        assert_eq!(read_indices, indices);
        assert_eq!(read_palette, palette);
    }
}
