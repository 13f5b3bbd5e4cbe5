// src/display/mod.rs
//! Display controller interface and its implementations.
//!
//! - DisplaySink: the five primitives the renderer needs (init, locate, data,
//!   backlight, cls) plus an optional end-of-frame hook
//! - Pcd8544: real controller over embedded-hal SPI and GPIO
//! - HeadlessDisplay: in-memory emulation of the controller RAM
//! - ConsoleDisplay: HeadlessDisplay that prints each frame to a terminal

pub mod console;
pub mod headless;
pub mod pcd8544;

pub use console::ConsoleDisplay;
pub use headless::HeadlessDisplay;
pub use pcd8544::Pcd8544;

use anyhow::Result;

/// Columns in the controller's display RAM.
pub const RAM_COLUMNS: usize = 84;
/// 8-row banks in the controller's display RAM. Panels with fewer rows simply
/// do not show the remaining banks.
pub const RAM_BANKS: usize = 6;

/// Minimal display controller interface.
///
/// Data bytes are column bytes (bit 0 = top row of the bank) written at the
/// cursor. The cursor advances one column per byte and wraps to column 0 of the
/// next bank at the right edge.
pub trait DisplaySink {
    /// Resets the controller and programs `contrast` (operating voltage byte).
    fn init(&mut self, contrast: u8) -> Result<()>;

    /// Moves the write cursor to `column` of `bank`.
    fn locate(&mut self, column: usize, bank: usize) -> Result<()>;

    /// Writes packed column bytes at the cursor.
    fn data(&mut self, bytes: &[u8]) -> Result<()>;

    fn backlight(&mut self, on: bool) -> Result<()>;

    /// Blanks the whole RAM and homes the cursor.
    fn cls(&mut self) -> Result<()>;

    /// Called once a complete frame has been written.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
