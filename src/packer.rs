// src/packer.rs

//! Converts a `DisplaySurface` into the controller's native byte layout.
//!
//! The PCD8544 addresses RAM one byte per column per 8-row bank. Within a byte,
//! bit 0 is the topmost row of the bank and bit 7 the bottommost. Banks are sent
//! top to bottom, columns left to right inside each bank.

use crate::surface::{DisplaySurface, BACKGROUND, BANK_HEIGHT};

/// Packed bytes ready for `DisplaySink::data`.
pub type PackedFrame = Vec<u8>;

/// Packs `surface` bank by bank.
///
/// Any intensity above zero counts as a lit pixel, so antialiased or multi-level
/// source values normalize to `1`. The output length is always
/// `surface.width() * surface.banks()`.
pub fn pack(surface: &DisplaySurface) -> PackedFrame {
    let width = surface.width();
    let mut frame = Vec::with_capacity(width * surface.banks());

    for bank in 0..surface.banks() {
        let top = bank * BANK_HEIGHT;
        for x in 0..width {
            frame.push(pack_column(surface, x, top));
        }
    }

    frame
}

/// Gathers 8 rows of one column starting at `top` into a byte.
fn pack_column(surface: &DisplaySurface, x: usize, top: usize) -> u8 {
    (0..BANK_HEIGHT).fold(0u8, |byte, row| {
        let lit = surface.get(x, top + row) != BACKGROUND;
        byte | ((lit as u8) << row)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DisplayMode, DISPLAY_WIDTH};

    #[test]
    fn blank_surface_packs_to_zeros() {
        for mode in [DisplayMode::Tall, DisplayMode::Compact] {
            let surface = DisplaySurface::new(DISPLAY_WIDTH, mode.height());
            let frame = pack(&surface);
            assert_eq!(frame.len(), mode.frame_len());
            assert!(frame.iter().all(|&b| b == 0x00));
        }
    }

    #[test]
    fn full_surface_packs_to_ones() {
        for mode in [DisplayMode::Tall, DisplayMode::Compact] {
            let mut surface = DisplaySurface::new(DISPLAY_WIDTH, mode.height());
            surface.fill(1);
            let frame = pack(&surface);
            assert_eq!(frame.len(), mode.frame_len());
            assert!(frame.iter().all(|&b| b == 0xFF));
        }
    }

    #[test]
    fn top_row_is_low_bit() {
        let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 48);
        surface.set(0, 0, 1);
        surface.set(1, 7, 1);
        surface.set(2, 8, 1);
        let frame = pack(&surface);
        assert_eq!(frame[0], 0b0000_0001);
        assert_eq!(frame[1], 0b1000_0000);
        // Row 8 is the top of bank 1, which starts one full panel width later.
        assert_eq!(frame[DISPLAY_WIDTH + 2], 0b0000_0001);
        assert_eq!(frame[2], 0);
    }

    #[test]
    fn multi_level_values_are_normalized() {
        let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 8);
        let mut raw = vec![0u8; DISPLAY_WIDTH * 8];
        raw[0] = 255; // (0, 0)
        raw[DISPLAY_WIDTH * 3] = 17; // (0, 3)
        surface.load_raw(&raw);
        let frame = pack(&surface);
        assert_eq!(frame[0], 0b0000_1001);
    }

    #[test]
    fn last_column_of_last_bank() {
        let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 32);
        surface.set(83, 31, 1);
        let frame = pack(&surface);
        assert_eq!(*frame.last().unwrap(), 0b1000_0000);
        assert_eq!(frame.iter().filter(|&&b| b != 0).count(), 1);
    }
}
