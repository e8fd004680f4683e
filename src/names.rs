//! Fixed filename tables used for reverse hash lookup, and the built-in
//! base palette. Order is immaterial; only membership (for the filename
//! tables) matters.

/// The 48 engine asset filenames stored in `TD3.EXE`'s record table.
pub const ENGINE_FILENAMES: &[&str] = &[
    "COMPASS.LZ",
    "WATER.LZ",
    "WATEREGA.LZ",
    "CHASE.LZ",
    "BROKE.LZ",
    "BROKEGA.LZ",
    "ACCOCOLR.BIN",
    "ACCO.LZ",
    "TITLCOLR.BIN",
    "TITLE2.LZ",
    "TITLE1.LZ",
    "TITL2COL.BIN",
    "TITLEANI.LZ",
    "TITLELET.LZ",
    "TITLEL2.LZ",
    "TITLECAR.LZ",
    "CREDCOLR.BIN",
    "CREDITC.LZ",
    "CREDITB.LZ",
    "CREDITA.LZ",
    "TOPCOLR.BIN",
    "TOPSCORC.LZ",
    "TOPSCORB.LZ",
    "TOPSCORA.LZ",
    "SELCOLR.BIN",
    "OTWCOL.BIN",
    "THEME.MUS",
    "COPCOLR.BIN",
    "COPB.LZ",
    "COPA.LZ",
    "COPSEQ.LZ",
    "KEYCOLR.BIN",
    "KEYS.LZ",
    "MASTERQ.BIN",
    "DIFFCOLR.BIN",
    "DETAIL1.LZ",
    "DETAIL2.LZ",
    "SELECT.LZ",
    "DIFFLEVA.LZ",
    "DIFFLEVB.LZ",
    "DIFFLEVC.LZ",
    "SSBJ.LZ",
    "SCENETTT.BIN",
    "NEWWAVE.MUS",
    "SCENETTO.BIN",
    "SCENETTP.BIN",
    "SCENETTA.DAT",
    "SCENETT1.DAT",
];

/// The 15 per-car filename suffixes, appended to the car's short name.
pub const CAR_SUFFIXES: &[&str] = &[
    "SIC.BIN", ".SIC", ".SID", "SC.BIN", "FL1.LZ", "FL2.LZ", ".BIC", ".ICN", "1.BOT", "2.BOT",
    "L.BOT", "R.BOT", ".TOP", ".ETC", "COL.BIN",
];

/// The 29 per-scene filename suffixes, appended to the scene's short name.
pub const SCENE_SUFFIXES: &[&str] = &[
    ".ICN", ".SIC", "1.ALZ", "1.BLZ", "1.COL", "1.DAT", "2.ALZ", "2.BLZ", "2.COL", "3.ALZ",
    "3.BLZ", "3.COL", "4.ALZ", "4.BLZ", "4.COL", "5.ALZ", "5.BLZ", "5.COL", "A.DAT", "A.MUS",
    "B.DAT", "B.MUS", "C.DAT", "C.MUS", "D.DAT", "E.DAT", "O.BIN", "P.BIN", "T.BIN",
];

/// The 16-entry built-in base palette (pre-`<<2` shift), RGB triples.
pub const BASE_PALETTE: [[u8; 3]; 16] = [
    [0x00, 0x00, 0x00],
    [0x00, 0x00, 0x28],
    [0x00, 0x28, 0x00],
    [0x00, 0x28, 0x28],
    [0x28, 0x00, 0x00],
    [0x28, 0x00, 0x28],
    [0x28, 0x14, 0x00],
    [0x28, 0x28, 0x28],
    [0x14, 0x14, 0x14],
    [0x14, 0x14, 0x3c],
    [0x14, 0x3c, 0x14],
    [0x14, 0x3c, 0x3c],
    [0x3c, 0x14, 0x14],
    [0x3c, 0x14, 0x3c],
    [0x3c, 0x3c, 0x14],
    [0x3c, 0x3c, 0x3c],
];
