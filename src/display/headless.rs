//! Headless controller emulation.
//!
//! Mirrors the PCD8544 display RAM and its horizontal addressing so tests can
//! check exactly which pixels a render lit.

use crate::display::{DisplaySink, RAM_BANKS, RAM_COLUMNS};
use anyhow::{bail, Result};
use log::trace;

#[derive(Debug, Clone)]
pub struct HeadlessDisplay {
    ram: Vec<u8>,
    column: usize,
    bank: usize,
    contrast: Option<u8>,
    backlight: bool,
    /// Data bytes received since creation.
    bytes_written: usize,
    /// When set, every `data` call fails.
    fail_writes: bool,
}

impl Default for HeadlessDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self {
            ram: vec![0; RAM_COLUMNS * RAM_BANKS],
            column: 0,
            bank: 0,
            contrast: None,
            backlight: false,
            bytes_written: 0,
            fail_writes: false,
        }
    }

    /// Makes subsequent `data` calls fail, to exercise error paths.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw RAM, bank-major like a packed frame.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// RAM for the first `banks` banks.
    pub fn frame(&self, banks: usize) -> &[u8] {
        &self.ram[..RAM_COLUMNS * banks.min(RAM_BANKS)]
    }

    /// Whether pixel `(x, y)` is lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= RAM_COLUMNS || y >= RAM_BANKS * 8 {
            return false;
        }
        self.ram[(y / 8) * RAM_COLUMNS + x] & (1 << (y % 8)) != 0
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.column, self.bank)
    }

    pub fn contrast(&self) -> Option<u8> {
        self.contrast
    }

    pub fn is_backlit(&self) -> bool {
        self.backlight
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

impl DisplaySink for HeadlessDisplay {
    fn init(&mut self, contrast: u8) -> Result<()> {
        self.contrast = Some(contrast);
        self.cls()
    }

    fn locate(&mut self, column: usize, bank: usize) -> Result<()> {
        if column >= RAM_COLUMNS || bank >= RAM_BANKS {
            bail!("Cursor ({}, {}) outside display RAM", column, bank);
        }
        self.column = column;
        self.bank = bank;
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            bail!("HeadlessDisplay: simulated write failure");
        }
        trace!(
            "HeadlessDisplay: {} bytes at ({}, {})",
            bytes.len(),
            self.column,
            self.bank
        );
        for &byte in bytes {
            self.ram[self.bank * RAM_COLUMNS + self.column] = byte;
            self.column += 1;
            if self.column == RAM_COLUMNS {
                self.column = 0;
                self.bank = (self.bank + 1) % RAM_BANKS;
            }
        }
        self.bytes_written += bytes.len();
        Ok(())
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        self.backlight = on;
        Ok(())
    }

    fn cls(&mut self) -> Result<()> {
        self.ram.fill(0);
        self.column = 0;
        self.bank = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_addressing_wraps_banks() {
        let mut display = HeadlessDisplay::new();
        display.locate(82, 1).unwrap();
        display.data(&[0x01, 0x02, 0x80]).unwrap();
        assert_eq!(display.ram()[RAM_COLUMNS + 82], 0x01);
        assert_eq!(display.ram()[RAM_COLUMNS + 83], 0x02);
        assert_eq!(display.ram()[2 * RAM_COLUMNS], 0x80);
        assert_eq!(display.cursor(), (1, 2));
        assert!(display.pixel(82, 8));
        assert!(display.pixel(0, 23));
    }

    #[test]
    fn full_ram_write_returns_home() {
        let mut display = HeadlessDisplay::new();
        display.data(&vec![0xFF; RAM_COLUMNS * RAM_BANKS]).unwrap();
        assert_eq!(display.cursor(), (0, 0));
        assert!(display.ram().iter().all(|&b| b == 0xFF));
        display.cls().unwrap();
        assert!(display.ram().iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_cursor_outside_ram() {
        let mut display = HeadlessDisplay::new();
        assert!(display.locate(84, 0).is_err());
        assert!(display.locate(0, 6).is_err());
    }

    #[test]
    fn records_state() {
        let mut display = HeadlessDisplay::new();
        display.init(0xBB).unwrap();
        display.backlight(true).unwrap();
        assert_eq!(display.contrast(), Some(0xBB));
        assert!(display.is_backlit());
        display.fail_writes(true);
        assert!(display.data(&[1]).is_err());
        assert_eq!(display.bytes_written(), 0);
    }
}
