//! Zeroes out the first record id in `TD3.EXE`'s record table so the
//! game falls back to reading loose files next to itself instead of
//! looking them up in the archives.

use std::fs;
use std::io;
use std::path::Path;

use crate::archive::{self, ArchiveError};

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("failed to read {0}: {1}")]
    Read(String, #[source] io::Error),
    #[error("failed to write {0}: {1}")]
    Write(String, #[source] io::Error),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Patches `exe_path` into `out_path`, returning the table offset found.
pub fn patch_executable(exe_path: &Path, out_path: &Path) -> Result<usize, PatchError> {
    let mut buf = fs::read(exe_path).map_err(|e| PatchError::Read(exe_path.display().to_string(), e))?;
    let offset = archive::find_table_offset(&buf)?;
    buf[offset..offset + 4].fill(0);
    fs::write(out_path, &buf).map_err(|e| PatchError::Write(out_path.display().to_string(), e))?;
    Ok(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::TABLE_MAGIC;

    #[test]
    fn zeroes_the_first_record_id() {
        let dir = tempfile::tempdir().unwrap();
        let exe_path = dir.path().join("TD3.EXE");
        let out_path = dir.path().join("TD3_U.EXE");

        let mut exe = vec![0xAAu8; 100];
        exe[40..44].copy_from_slice(&TABLE_MAGIC.to_be_bytes());
        fs::write(&exe_path, &exe).unwrap();

        let offset = patch_executable(&exe_path, &out_path).unwrap();
        assert_eq!(offset, 40);

        let patched = fs::read(&out_path).unwrap();
        assert_eq!(&patched[40..44], &[0, 0, 0, 0]);
        // everything else is untouched
        assert_eq!(&patched[..40], &exe[..40]);
        assert_eq!(&patched[44..], &exe[44..]);
    }
}
