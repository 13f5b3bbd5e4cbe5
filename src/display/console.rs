//! Console preview sink.
//!
//! Keeps an emulated controller RAM and prints the visible banks with
//! half-block characters whenever a frame is flushed. Lets the whole pipeline
//! run on a development machine without the panel attached.

use crate::display::{DisplaySink, HeadlessDisplay, RAM_COLUMNS};
use anyhow::{Context, Result};
use std::io::Write;

pub struct ConsoleDisplay<W: Write> {
    ram: HeadlessDisplay,
    out: W,
    /// Banks the attached panel actually shows.
    visible_banks: usize,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W, visible_banks: usize) -> Self {
        Self {
            ram: HeadlessDisplay::new(),
            out,
            visible_banks,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self) -> Result<()> {
        let mut frame = String::new();
        let border = "─".repeat(RAM_COLUMNS);
        frame.push_str(&format!(
            "┌{}┐ backlight {}\n",
            border,
            if self.ram.is_backlit() { "on" } else { "off" }
        ));
        // Two pixel rows per text line.
        for y in (0..self.visible_banks * 8).step_by(2) {
            frame.push('│');
            for x in 0..RAM_COLUMNS {
                frame.push(match (self.ram.pixel(x, y), self.ram.pixel(x, y + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            frame.push_str("│\n");
        }
        frame.push_str(&format!("└{}┘\n", border));

        self.out
            .write_all(frame.as_bytes())
            .and_then(|_| self.out.flush())
            .context("Failed to write console preview")
    }
}

impl<W: Write> DisplaySink for ConsoleDisplay<W> {
    fn init(&mut self, contrast: u8) -> Result<()> {
        self.ram.init(contrast)
    }

    fn locate(&mut self, column: usize, bank: usize) -> Result<()> {
        self.ram.locate(column, bank)
    }

    fn data(&mut self, bytes: &[u8]) -> Result<()> {
        self.ram.data(bytes)
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        self.ram.backlight(on)
    }

    fn cls(&mut self) -> Result<()> {
        self.ram.cls()
    }

    fn flush(&mut self) -> Result<()> {
        self.draw()
    }
}
