//! Archive index model: record tables, signature-scanned table discovery,
//! and record-driven extraction from the multiplexed `DATA{A,B,C}.DAT`
//! files and per-car/per-scene `.LST`/`.DAT` pairs.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::hash::filename_hash;
use crate::names;

/// Big-endian signature of the first engine record, used to locate the
/// record table embedded in `TD3.EXE` by scanning byte-by-byte.
pub const TABLE_MAGIC: u32 = 0xEF0E_4D4C;

const ENGINE_RECORD_COUNT: usize = 49;
const CAR_LIST_OFFSET: usize = 0x1D1;
const CAR_RECORD_COUNT: usize = 15;
const SCENE_LIST_OFFSET: usize = 0x4D0;
const SCENE_RECORD_COUNT: usize = 29;

const PLAYDISK_COUNTS_OFFSET: usize = 0xAE;
const PLAYDISK_CAR_NAMES_OFFSET: usize = 0x12;
const PLAYDISK_CAR_NAME_LEN: usize = 6;
const PLAYDISK_SCENE_NAMES_OFFSET: usize = 0x66;
const PLAYDISK_SCENE_NAME_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to read {0}: {1}")]
    Io(String, #[source] io::Error),
    #[error("record table signature not found")]
    TableNotFound,
    #[error("record table offset out of bounds")]
    RecordTableOutOfBounds,
    #[error("record points outside its data file")]
    RecordOutOfBounds,
    #[error("PLAYDISK.DAT too short to contain its name tables")]
    PlayDiskTruncated,
}

/// One 14-byte packed archive record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub archive_file_id: i16,
    pub offset: u32,
    pub size: u32,
}

impl Record {
    const PACKED_SIZE: usize = 14;

    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let id = reader.read_u32::<LittleEndian>()?;
        let archive_file_id = reader.read_i16::<LittleEndian>()?;
        let offset = reader.read_u32::<LittleEndian>()?;
        let size = reader.read_u32::<LittleEndian>()?;
        Ok(Self { id, archive_file_id, offset, size })
    }

    /// Number of bytes this record actually contributes on extraction.
    /// The trailing byte of `size` is a disk terminator and is dropped.
    ///
    /// `size == 0` returns `None` (record skipped) rather than wrapping:
    /// the original computes `size - 1` as an unsigned `int` and reads that
    /// many bytes into a fixed 0xffff-byte stack buffer, which for `size ==
    /// 0` wraps to `UINT_MAX` and overruns it. That's a memory-safety bug in
    /// the source, not a behavior worth reproducing — see DESIGN.md.
    fn copy_len(&self) -> Option<usize> {
        (self.size as usize).checked_sub(1)
    }
}

/// Scans `exe` byte-by-byte for the big-endian `TABLE_MAGIC` signature and
/// returns the offset of the first match.
pub fn find_table_offset(exe: &[u8]) -> Result<usize, ArchiveError> {
    if exe.len() < 4 {
        return Err(ArchiveError::TableNotFound);
    }
    let mut cursor = Cursor::new(exe);
    // Matches `findOffsetOfFileInfoTable`'s `offset < size - 4` bound exactly
    // (not `<=`): the original never probes the last four bytes of the file,
    // so neither do we — see DESIGN.md.
    for offset in 0..exe.len() - 4 {
        cursor.set_position(offset as u64);
        if cursor.read_u32::<BigEndian>().ok() == Some(TABLE_MAGIC) {
            return Ok(offset);
        }
    }
    Err(ArchiveError::TableNotFound)
}

/// Reads `count` packed 14-byte records starting at `offset`.
pub fn read_records(buf: &[u8], offset: usize, count: usize) -> Result<Vec<Record>, ArchiveError> {
    let end = offset
        .checked_add(count * Record::PACKED_SIZE)
        .ok_or(ArchiveError::RecordTableOutOfBounds)?;
    let slice = buf.get(offset..end).ok_or(ArchiveError::RecordTableOutOfBounds)?;
    let mut cursor = Cursor::new(slice);
    (0..count)
        .map(|_| Record::read(&mut cursor).map_err(|e| ArchiveError::Io(String::from("record table"), e)))
        .collect()
}

/// The list of car and scene short names stored in `PLAYDISK.DAT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayDisk {
    pub cars: Vec<String>,
    pub scenes: Vec<String>,
}

fn read_fixed_name(buf: &[u8], offset: usize, len: usize) -> Option<String> {
    let raw = buf.get(offset..offset + len)?;
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    Some(String::from_utf8_lossy(&raw[..end]).into_owned())
}

impl PlayDisk {
    /// Parses `PLAYDISK.DAT`'s counts (at 0xAE) and name tables (cars at
    /// 0x12, scenes at 0x66).
    pub fn parse(buf: &[u8]) -> Result<Self, ArchiveError> {
        let counts = buf
            .get(PLAYDISK_COUNTS_OFFSET..PLAYDISK_COUNTS_OFFSET + 2)
            .ok_or(ArchiveError::PlayDiskTruncated)?;
        let num_cars = counts[0] as usize;
        let num_scenes = counts[1] as usize;

        let mut cars = Vec::with_capacity(num_cars);
        for i in 0..num_cars {
            let offset = PLAYDISK_CAR_NAMES_OFFSET + i * PLAYDISK_CAR_NAME_LEN;
            cars.push(read_fixed_name(buf, offset, PLAYDISK_CAR_NAME_LEN).ok_or(ArchiveError::PlayDiskTruncated)?);
        }

        let mut scenes = Vec::with_capacity(num_scenes);
        for i in 0..num_scenes {
            let offset = PLAYDISK_SCENE_NAMES_OFFSET + i * PLAYDISK_SCENE_NAME_LEN;
            scenes.push(read_fixed_name(buf, offset, PLAYDISK_SCENE_NAME_LEN).ok_or(ArchiveError::PlayDiskTruncated)?);
        }

        Ok(Self { cars, scenes })
    }
}

/// Maps `archive_file_id` to the concrete data filename a record lives
/// in. Returns `None` for an id the format doesn't recognize, which
/// means "skip this record" per the archive's own semantics.
fn data_filename(archive_file_id: i16, alt_filename: &str) -> Option<String> {
    match archive_file_id {
        x if x == b'a' as i16 => Some("DATAA.DAT".to_string()),
        x if x == b'b' as i16 => Some("DATAB.DAT".to_string()),
        x if x == b'c' as i16 => Some("DATAC.DAT".to_string()),
        x if x == b'd' as i16 || x == b'e' as i16 => Some(alt_filename.to_string()),
        _ => None,
    }
}

/// Builds a reverse-hash lookup table from a set of candidate filenames.
pub fn build_name_map<I: IntoIterator<Item = String>>(names: I) -> HashMap<u32, String> {
    names.into_iter().map(|n| (filename_hash(&n), n)).collect()
}

/// Caches whole data files in memory, keyed by filename, so a campaign
/// with many records against the same archive only reads it once.
pub struct DataFileCache {
    base_dir: PathBuf,
    cache: HashMap<String, Vec<u8>>,
}

impl DataFileCache {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), cache: HashMap::new() }
    }

    fn load(&mut self, filename: &str) -> Result<&[u8], ArchiveError> {
        if !self.cache.contains_key(filename) {
            let data = fs::read(self.base_dir.join(filename))
                .map_err(|e| ArchiveError::Io(filename.to_string(), e))?;
            self.cache.insert(filename.to_string(), data);
        }
        Ok(self.cache.get(filename).expect("just inserted").as_slice())
    }
}

/// Reverse-hash-looks-up a record's id, falling back to lowercase hex.
fn output_name(name_map: &HashMap<u32, String>, id: u32) -> String {
    name_map.get(&id).cloned().unwrap_or_else(|| format!("{:x}", id))
}

/// Extracts every record in `records` whose `archive_file_id` resolves
/// to a data file, writing each one to `out_dir` under its reverse-hash
/// (or hex-fallback) name. Unmapped ids are skipped silently.
pub fn extract_records(
    records: &[Record],
    data_files: &mut DataFileCache,
    alt_filename: &str,
    name_map: &HashMap<u32, String>,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, ArchiveError> {
    let mut written = Vec::new();
    for record in records {
        let Some(filename) = data_filename(record.archive_file_id, alt_filename) else {
            continue;
        };
        let Some(copy_len) = record.copy_len() else {
            continue;
        };
        let data = data_files.load(&filename)?;
        let start = record.offset as usize;
        let end = start.checked_add(copy_len).ok_or(ArchiveError::RecordOutOfBounds)?;
        let slice = data.get(start..end).ok_or(ArchiveError::RecordOutOfBounds)?;

        let name = output_name(name_map, record.id);
        let out_path = out_dir.join(&name);
        fs::write(&out_path, slice).map_err(|e| ArchiveError::Io(name, e))?;
        log::info!("extracted {} ({} bytes)", out_path.display(), slice.len());
        written.push(out_path);
    }
    Ok(written)
}

/// Locates and reads the 49-record engine table embedded in `exe`, then
/// extracts every engine asset (from `DATAA/B/C.DAT` in `data_dir`) into
/// `out_dir`.
pub fn extract_engine_files(exe: &[u8], data_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let offset = find_table_offset(exe)?;
    let records = read_records(exe, offset, ENGINE_RECORD_COUNT)?;
    let name_map = build_name_map(names::ENGINE_FILENAMES.iter().map(|s| s.to_string()));
    let mut cache = DataFileCache::new(data_dir);
    // Engine records only ever reference DATAA/B/C.DAT, never 'd'/'e'.
    extract_records(&records, &mut cache, "", &name_map, out_dir)
}

/// Reads the 15-record table at offset 0x1D1 in `<car>.LST` and extracts
/// every per-car asset (from `<car>.DAT` for archive ids `'d'`/`'e'`).
pub fn extract_car_files(car: &str, base_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let lst_path = base_dir.join(format!("{car}.LST"));
    let lst = fs::read(&lst_path).map_err(|e| ArchiveError::Io(lst_path.display().to_string(), e))?;
    let records = read_records(&lst, CAR_LIST_OFFSET, CAR_RECORD_COUNT)?;
    let name_map = build_name_map(names::CAR_SUFFIXES.iter().map(|suffix| format!("{car}{suffix}")));
    let mut cache = DataFileCache::new(base_dir);
    let alt_filename = format!("{car}.DAT");
    extract_records(&records, &mut cache, &alt_filename, &name_map, out_dir)
}

/// Reads the 29-record table at offset 0x4D0 in `<scene>.LST` and
/// extracts every per-scene asset (from `<scene>.DAT` for ids `'d'`/`'e'`).
pub fn extract_scene_files(scene: &str, base_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>, ArchiveError> {
    let lst_path = base_dir.join(format!("{scene}.LST"));
    let lst = fs::read(&lst_path).map_err(|e| ArchiveError::Io(lst_path.display().to_string(), e))?;
    let records = read_records(&lst, SCENE_LIST_OFFSET, SCENE_RECORD_COUNT)?;
    let name_map = build_name_map(names::SCENE_SUFFIXES.iter().map(|suffix| format!("{scene}{suffix}")));
    let mut cache = DataFileCache::new(base_dir);
    let alt_filename = format!("{scene}.DAT");
    extract_records(&records, &mut cache, &alt_filename, &name_map, out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_record(buf: &mut Vec<u8>, record: Record) {
        buf.extend_from_slice(&record.id.to_le_bytes());
        buf.extend_from_slice(&record.archive_file_id.to_le_bytes());
        buf.extend_from_slice(&record.offset.to_le_bytes());
        buf.extend_from_slice(&record.size.to_le_bytes());
    }

    #[test]
    fn finds_table_by_signature() {
        let mut buf = vec![0u8; 10000];
        // deterministic filler, not random: the test only cares about the
        // inserted magic being found, not about realism of the noise.
        for (i, b) in buf.iter_mut().enumerate() {
            *b = (i * 37 + 11) as u8;
        }
        buf[1234..1238].copy_from_slice(&TABLE_MAGIC.to_be_bytes());
        assert_eq!(find_table_offset(&buf).unwrap(), 1234);
    }

    #[test]
    fn missing_signature_is_an_error() {
        let buf = vec![0u8; 256];
        assert!(find_table_offset(&buf).is_err());
    }

    #[test]
    fn reads_packed_records() {
        let mut buf = Vec::new();
        let r = Record { id: 0x11223344, archive_file_id: b'a' as i16, offset: 0x100, size: 0x10 };
        push_record(&mut buf, r);
        let records = read_records(&buf, 0, 1).unwrap();
        assert_eq!(records, vec![r]);
    }

    #[test]
    fn unmapped_archive_file_id_is_skipped() {
        assert_eq!(data_filename(0, ""), None);
        assert_eq!(data_filename(b'a' as i16, ""), Some("DATAA.DAT".to_string()));
        assert_eq!(data_filename(b'd' as i16, "CAR1.DAT"), Some("CAR1.DAT".to_string()));
    }

    #[test]
    fn playdisk_parses_counts_and_names() {
        let mut buf = vec![0u8; 0x200];
        buf[PLAYDISK_COUNTS_OFFSET] = 2;
        buf[PLAYDISK_COUNTS_OFFSET + 1] = 1;
        buf[PLAYDISK_CAR_NAMES_OFFSET..PLAYDISK_CAR_NAMES_OFFSET + 6].copy_from_slice(b"CAR1\0\0");
        buf[PLAYDISK_CAR_NAMES_OFFSET + 6..PLAYDISK_CAR_NAMES_OFFSET + 12].copy_from_slice(b"CAR2\0\0");
        buf[PLAYDISK_SCENE_NAMES_OFFSET..PLAYDISK_SCENE_NAMES_OFFSET + 8].copy_from_slice(b"SCENE1\0\0");

        let playdisk = PlayDisk::parse(&buf).unwrap();
        assert_eq!(playdisk.cars, vec!["CAR1", "CAR2"]);
        assert_eq!(playdisk.scenes, vec!["SCENE1"]);
    }

    #[test]
    fn extraction_drops_the_trailing_terminator_byte() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DATAA.DAT"), b"0123456789").unwrap();

        let record = Record { id: filename_hash("X.LZ"), archive_file_id: b'a' as i16, offset: 2, size: 5 };
        let name_map = build_name_map(["X.LZ".to_string()]);
        let mut cache = DataFileCache::new(dir.path());
        let written = extract_records(&[record], &mut cache, "", &name_map, dir.path()).unwrap();

        assert_eq!(written.len(), 1);
        let contents = std::fs::read(&written[0]).unwrap();
        // size=5 -> copies size-1=4 bytes starting at offset 2: "2345"
        assert_eq!(contents, b"2345");
    }

    #[test]
    fn unknown_record_id_falls_back_to_hex_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("DATAA.DAT"), b"0123456789").unwrap();

        let record = Record { id: 0xDEADBEEF, archive_file_id: b'a' as i16, offset: 0, size: 2 };
        let name_map: HashMap<u32, String> = HashMap::new();
        let mut cache = DataFileCache::new(dir.path());
        let written = extract_records(&[record], &mut cache, "", &name_map, dir.path()).unwrap();

        assert_eq!(written[0].file_name().unwrap().to_str().unwrap(), "deadbeef");
    }
}
