//! Variable-width LZW codec matching the game's native bitstream.
//!
//! Codes run 9..=12 bits. `RESET` (0x100) discards the dictionary and
//! restarts at width 9; `EOS` (0x101) ends the stream. Both directions
//! are pure functions over byte buffers — no file handles, no shared
//! state across calls.

use std::collections::HashMap;

use crate::bitstream::{BitReader, BitWriter};

pub const RESET: u16 = 0x100;
pub const EOS: u16 = 0x101;

const FIRST_USER_CODE: usize = 0x102;
const INITIAL_WIDTH: u32 = 9;
const INITIAL_GROW_THRESHOLD: usize = 0x200;
const MAX_WIDTH: u32 = 12;

/// Entries beyond this are never addressable by a 12-bit code; capping
/// growth here bounds memory on a stream that never emits `RESET`.
const MAX_DYNAMIC_ENTRIES: usize = 1 << 20;

struct Dictionary {
    singles: Vec<Vec<u8>>,
    dynamic: Vec<Vec<u8>>,
}

impl Dictionary {
    fn new() -> Self {
        Self {
            singles: (0u16..256).map(|b| vec![b as u8]).collect(),
            dynamic: Vec::new(),
        }
    }

    fn get(&self, code: u16) -> Option<&[u8]> {
        match code {
            c if (c as usize) < 256 => Some(self.singles[c as usize].as_slice()),
            RESET | EOS => None,
            c => self.dynamic.get(c as usize - FIRST_USER_CODE).map(Vec::as_slice),
        }
    }

    fn next_code(&self) -> usize {
        FIRST_USER_CODE + self.dynamic.len()
    }

    fn insert(&mut self, sequence: Vec<u8>) {
        if self.dynamic.len() < MAX_DYNAMIC_ENTRIES - FIRST_USER_CODE {
            self.dynamic.push(sequence);
        }
    }
}

struct DecoderState {
    dict: Dictionary,
    width: u32,
    grow_threshold: usize,
    prev: Vec<u8>,
}

impl DecoderState {
    fn new() -> Self {
        Self {
            dict: Dictionary::new(),
            width: INITIAL_WIDTH,
            grow_threshold: INITIAL_GROW_THRESHOLD,
            prev: Vec::new(),
        }
    }

    fn grow(&mut self, sequence: Vec<u8>) {
        self.dict.insert(sequence);
        if self.dict.next_code() >= self.grow_threshold && self.width < MAX_WIDTH {
            self.width += 1;
            self.grow_threshold <<= 1;
        }
    }
}

/// Decompresses a stream of 9-12 bit LZW codes to bytes.
///
/// An unrecognized code with an empty `prev` (desync, or malformed input
/// that never received an initial `RESET`) ends decoding without
/// emitting further data, per the decoder-desync handling in the spec.
pub fn decode(data: &[u8]) -> Vec<u8> {
    let mut reader = BitReader::new(data);
    let mut state = DecoderState::new();
    let mut out = Vec::new();

    loop {
        let code = reader.read_code(state.width);
        if code == EOS {
            break;
        }
        if code == RESET {
            state = DecoderState::new();
            let k = reader.read_code(state.width);
            let seq = vec![k as u8];
            out.extend_from_slice(&seq);
            state.prev = seq;
            continue;
        }

        if let Some(seq) = state.dict.get(code).map(<[u8]>::to_vec) {
            out.extend_from_slice(&seq);
            let mut grown = state.prev.clone();
            grown.push(seq[0]);
            state.grow(grown);
            state.prev = seq;
        } else if !state.prev.is_empty() {
            let mut grown = state.prev.clone();
            grown.push(state.prev[0]);
            out.extend_from_slice(&grown);
            state.grow(grown.clone());
            state.prev = grown;
        } else {
            break;
        }
    }

    out
}

struct EncoderState {
    dict: HashMap<Vec<u8>, u16>,
    next_code: u16,
    width: u32,
    grow_threshold: usize,
}

impl EncoderState {
    fn new() -> Self {
        let mut dict = HashMap::with_capacity(256);
        for b in 0u16..256 {
            dict.insert(vec![b as u8], b);
        }
        Self {
            dict,
            next_code: FIRST_USER_CODE as u16,
            width: INITIAL_WIDTH,
            grow_threshold: INITIAL_GROW_THRESHOLD,
        }
    }

    fn grow(&mut self, sequence: Vec<u8>, writer: &mut BitWriter) {
        self.dict.insert(sequence, self.next_code);
        self.next_code += 1;
        if self.next_code as usize >= self.grow_threshold + 1 {
            if self.width == MAX_WIDTH {
                writer.write_code(RESET, self.width);
                *self = Self::new();
            } else {
                self.width += 1;
                self.grow_threshold <<= 1;
            }
        }
    }
}

/// Compresses bytes to a stream of 9-12 bit LZW codes, greedy-longest-match.
///
/// Always opens with an explicit `RESET` and closes with `EOS`, matching
/// the reference encoder's framing.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut state = EncoderState::new();
    writer.write_code(RESET, state.width);

    let mut pos = 0usize;
    while pos < data.len() {
        let mut sequence = vec![data[pos]];
        pos += 1;
        let mut probe = sequence.clone();
        while state.dict.contains_key(&probe) && pos < data.len() {
            probe.push(data[pos]);
            pos += 1;
            if state.dict.contains_key(&probe) {
                sequence = probe.clone();
            }
        }

        let code = *state
            .dict
            .get(&sequence)
            .expect("sequence was just confirmed present in the dictionary");
        writer.write_code(code, state.width);

        if sequence.len() != probe.len() {
            state.grow(probe, &mut writer);
            pos -= 1;
        }
    }

    writer.write_code(EOS, state.width);
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let input: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        let encoded = encode(&input);
        assert_eq!(decode(&encoded), input);
    }

    #[test]
    fn round_trips_empty_input() {
        let encoded = encode(&[]);
        assert_eq!(decode(&encoded), Vec::<u8>::new());
    }

    #[test]
    fn single_byte_emits_reset_code_eos() {
        // width 9, 3 codes: RESET(0x100), code 0x00, EOS(0x101)
        let encoded = encode(&[0x00]);
        let mut r = BitReader::new(&encoded);
        assert_eq!(r.read_code(9), RESET);
        assert_eq!(r.read_code(9), 0x00);
        assert_eq!(r.read_code(9), EOS);
        assert_eq!(decode(&encoded), vec![0x00]);
    }

    #[test]
    fn highly_repetitive_data_compresses() {
        let input = vec![0x42u8; 1024];
        let encoded = encode(&input);
        assert!(encoded.len() <= 1024);
        assert_eq!(decode(&encoded), input);
    }

    #[test]
    fn decoder_honors_reset_mid_stream() {
        let mut w = BitWriter::new();
        w.write_code(RESET, 9);
        w.write_code(0x41, 9);
        w.write_code(RESET, 9);
        w.write_code(0x42, 9);
        w.write_code(EOS, 9);
        let bytes = w.into_bytes();
        assert_eq!(decode(&bytes), vec![0x41, 0x42]);
    }

    #[test]
    fn encoder_resets_before_exceeding_twelve_bit_ceiling() {
        // Force a long-running dictionary to grow up to the 12-bit ceiling
        // on genuinely novel data and confirm decode still round-trips.
        let mut input = Vec::new();
        for i in 0..20000u32 {
            input.push((i % 251) as u8);
            input.push((i / 251) as u8);
        }
        let encoded = encode(&input);
        assert_eq!(decode(&encoded), input);
    }
}
