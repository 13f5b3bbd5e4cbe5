// src/volume.rs

//! Pre-rendered volume bar for the compact display mode.
//!
//! The receiver reports volume as an attenuation in dB formatted with six
//! decimals. AirPlay senders step through 16 levels between -30 dB and 0 dB, plus
//! `-144` for mute, so the bar has 17 rungs. The bar occupies exactly one bank
//! (84 columns) and needs no rasterization.

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Number of segments in the bar.
pub const SEGMENTS: usize = 16;

/// Encoded bar length: head, 16 segments, tail.
pub const BAR_LEN: usize = HEAD.len() + SEGMENTS * SEGMENT_WIDTH + TAIL.len();

const SEGMENT_WIDTH: usize = 5;

// One byte per column, bit 0 = top row. Rows 1 and 6 form the outline.
const HEAD: [u8; 2] = [0x7E, 0x42];
const FULL_BLOCK: [u8; SEGMENT_WIDTH] = [0x7E, 0x7E, 0x7E, 0x7E, 0x42];
const BLANK_BLOCK: [u8; SEGMENT_WIDTH] = [0x42, 0x42, 0x42, 0x42, 0x42];
const TAIL: [u8; 2] = [0x42, 0x7E];

/// Attenuation reported for a muted output.
pub const MUTE_KEY: &str = "-144.000000";

/// Exact-match table from the reported attenuation string to a rung.
static LEVELS: Lazy<HashMap<String, u8>> = Lazy::new(|| {
    let mut levels = HashMap::with_capacity(SEGMENTS + 1);
    levels.insert(MUTE_KEY.to_string(), 0);
    for rung in 1..=SEGMENTS as u8 {
        let db = -30.0 + 1.875 * f64::from(rung);
        levels.insert(format!("{:.6}", db), rung);
    }
    levels
});

/// One of the 17 fill levels of the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct VolumeLevel(u8);

impl VolumeLevel {
    /// Looks up a reported attenuation. Unknown strings are silence.
    pub fn from_key(key: &str) -> Self {
        match LEVELS.get(key.trim()) {
            Some(&rung) => VolumeLevel(rung),
            None => {
                debug!("Volume key '{}' not in table, using rung 0", key);
                VolumeLevel(0)
            }
        }
    }

    /// Number of filled segments (0..=16).
    pub fn rung(self) -> u8 {
        self.0
    }
}

/// Encodes the bar for a reported attenuation string.
pub fn encode(level_key: &str) -> [u8; BAR_LEN] {
    encode_level(VolumeLevel::from_key(level_key))
}

/// Encodes the bar for an already-resolved level.
pub fn encode_level(level: VolumeLevel) -> [u8; BAR_LEN] {
    let mut bar = [0u8; BAR_LEN];
    let filled = level.rung() as usize;

    bar[..HEAD.len()].copy_from_slice(&HEAD);
    for segment in 0..SEGMENTS {
        let start = HEAD.len() + segment * SEGMENT_WIDTH;
        let block = if segment < filled {
            &FULL_BLOCK
        } else {
            &BLANK_BLOCK
        };
        bar[start..start + SEGMENT_WIDTH].copy_from_slice(block);
    }
    bar[BAR_LEN - TAIL.len()..].copy_from_slice(&TAIL);

    bar
}

/// The 17 recognized keys in rung order.
pub fn known_keys() -> Vec<String> {
    let mut keys: Vec<(String, u8)> = LEVELS.iter().map(|(k, &v)| (k.clone(), v)).collect();
    keys.sort_by_key(|&(_, rung)| rung);
    keys.into_iter().map(|(k, _)| k).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(bar: &[u8; BAR_LEN]) -> Vec<&[u8]> {
        bar[HEAD.len()..BAR_LEN - TAIL.len()]
            .chunks(SEGMENT_WIDTH)
            .collect()
    }

    #[test]
    fn table_has_seventeen_rungs() {
        let keys = known_keys();
        assert_eq!(keys.len(), 17);
        assert_eq!(keys[0], "-144.000000");
        assert_eq!(keys[1], "-28.125000");
        assert_eq!(keys[8], "-15.000000");
        assert_eq!(keys[16], "0.000000");
    }

    #[test]
    fn every_known_key_has_matching_composition() {
        for (rung, key) in known_keys().iter().enumerate() {
            let bar = encode(key);
            assert_eq!(bar.len(), 84);
            assert_eq!(&bar[..2], &HEAD);
            assert_eq!(&bar[82..], &TAIL);
            let segs = segments(&bar);
            assert_eq!(segs.len(), SEGMENTS);
            for (i, seg) in segs.iter().enumerate() {
                let expected: &[u8] = if i < rung { &FULL_BLOCK } else { &BLANK_BLOCK };
                assert_eq!(*seg, expected, "key {} segment {}", key, i);
            }
        }
    }

    #[test]
    fn full_and_mute_extremes() {
        assert_eq!(VolumeLevel::from_key("0.000000").rung(), 16);
        assert_eq!(VolumeLevel::from_key("-144.000000").rung(), 0);
        assert!(segments(&encode("0.000000")).iter().all(|s| *s == FULL_BLOCK));
        assert!(segments(&encode("-144.000000")).iter().all(|s| *s == BLANK_BLOCK));
    }

    #[test]
    fn unknown_key_is_silence() {
        assert_eq!(encode("-99.000000"), encode("-144.000000"));
        assert_eq!(encode(""), encode(MUTE_KEY));
        assert_eq!(encode("loud"), encode(MUTE_KEY));
        // Exact match only: same value, different formatting.
        assert_eq!(VolumeLevel::from_key("0.0").rung(), 0);
    }
}
