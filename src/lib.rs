//! TD3 asset archive extractor and LZW/RLE image codec.

pub mod archive;
pub mod bitstream;
pub mod error;
pub mod hash;
pub mod lzw;
pub mod names;
pub mod patch;
pub mod rle;

#[cfg(feature = "to_image")]
pub mod image;

#[cfg(feature = "to_image")]
pub mod png_io;

pub use archive::{ArchiveError, PlayDisk, Record};
pub use error::TdExtractError;
pub use patch::PatchError;
