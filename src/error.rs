//! Crate-level error aggregating every component's error type, so the
//! CLI binary has one place to match on for an exit code.

use crate::archive::ArchiveError;
use crate::patch::PatchError;

#[cfg(feature = "to_image")]
use crate::image::ImageError;
#[cfg(feature = "to_image")]
use crate::png_io::PngIoError;

#[derive(Debug, thiserror::Error)]
pub enum TdExtractError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[cfg(feature = "to_image")]
    #[error(transparent)]
    Image(#[from] ImageError),
    #[cfg(feature = "to_image")]
    #[error(transparent)]
    PngIo(#[from] PngIoError),
    #[error("{0}")]
    Other(String),
}
