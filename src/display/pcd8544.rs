// src/display/pcd8544.rs

//! PCD8544 (Nokia 5110 class) controller driver over embedded-hal 1.0.
//!
//! Commands and data share the SPI bus; the D/C pin selects which one the
//! controller latches (low = command, high = data).

use crate::display::{DisplaySink, RAM_BANKS, RAM_COLUMNS};
use anyhow::{anyhow, bail, Result};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use log::*;

/// Function set, basic instruction set, horizontal addressing, chip active.
pub const FUNCTION_SET_BASIC: u8 = 0x20;
/// Function set with the extended instruction set selected.
pub const FUNCTION_SET_EXTENDED: u8 = 0x21;
/// Extended: temperature coefficient 0.
pub const TEMPERATURE_COEFFICIENT: u8 = 0x04;
/// Extended: bias system 1:48.
pub const BIAS_1_48: u8 = 0x14;
/// Extended: operating voltage, OR'd with the 7-bit Vop value.
pub const SET_VOP: u8 = 0x80;
/// Basic: display control, normal mode.
pub const DISPLAY_NORMAL: u8 = 0x0C;
/// Basic: set Y address (bank), OR'd with 0..=5.
pub const SET_Y_ADDRESS: u8 = 0x40;
/// Basic: set X address (column), OR'd with 0..=83.
pub const SET_X_ADDRESS: u8 = 0x80;

/// Reset pulse width. The datasheet minimum is 100 ns.
const RESET_PULSE_US: u32 = 100;

/// Driver errors.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Error<SpiErr, PinErr> {
    /// SPI transfer failed.
    Spi(SpiErr),
    /// D/C, reset or backlight pin operation failed.
    Pin(PinErr),
}

pub struct Pcd8544<SPI, DC, RST, BL, D> {
    spi: SPI,
    dc: DC,
    rst: RST,
    backlight: BL,
    delay: D,
}

impl<SPI, DC, RST, BL, D> Pcd8544<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    BL: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, backlight: BL, delay: D) -> Self {
        Self {
            spi,
            dc,
            rst,
            backlight,
            delay,
        }
    }

    /// Pulses the reset line.
    pub fn reset(&mut self) -> Result<(), Error<SPI::Error, DC::Error>> {
        self.rst.set_low().map_err(Error::Pin)?;
        self.delay.delay_us(RESET_PULSE_US);
        self.rst.set_high().map_err(Error::Pin)
    }

    /// Sends command bytes (D/C low).
    pub fn command(&mut self, bytes: &[u8]) -> Result<(), Error<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(Error::Pin)?;
        self.spi.write(bytes).map_err(Error::Spi)
    }

    /// Sends display data bytes (D/C high).
    pub fn write_data(&mut self, bytes: &[u8]) -> Result<(), Error<SPI::Error, DC::Error>> {
        self.dc.set_high().map_err(Error::Pin)?;
        self.spi.write(bytes).map_err(Error::Spi)
    }

    /// Resets the controller and runs the power-up command sequence.
    pub fn power_up(&mut self, contrast: u8) -> Result<(), Error<SPI::Error, DC::Error>> {
        self.reset()?;
        self.command(&[
            FUNCTION_SET_EXTENDED,
            SET_VOP | (contrast & 0x7F),
            TEMPERATURE_COEFFICIENT,
            BIAS_1_48,
            FUNCTION_SET_BASIC,
            DISPLAY_NORMAL,
        ])
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error<SPI::Error, DC::Error>> {
        if on {
            self.backlight.set_high().map_err(Error::Pin)
        } else {
            self.backlight.set_low().map_err(Error::Pin)
        }
    }
}

fn driver_error<E: core::fmt::Debug>(op: &'static str) -> impl FnOnce(E) -> anyhow::Error {
    move |e| anyhow!("PCD8544 {} failed: {:?}", op, e)
}

impl<SPI, DC, RST, BL, D> DisplaySink for Pcd8544<SPI, DC, RST, BL, D>
where
    SPI: SpiDevice<u8>,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    BL: OutputPin<Error = DC::Error>,
    D: DelayNs,
{
    fn init(&mut self, contrast: u8) -> Result<()> {
        info!("Pcd8544: init with contrast 0x{:02X}", contrast);
        self.power_up(contrast).map_err(driver_error("init"))?;
        self.cls()
    }

    fn locate(&mut self, column: usize, bank: usize) -> Result<()> {
        if column >= RAM_COLUMNS || bank >= RAM_BANKS {
            bail!("Cursor ({}, {}) outside display RAM", column, bank);
        }
        self.command(&[SET_X_ADDRESS | column as u8, SET_Y_ADDRESS | bank as u8])
            .map_err(driver_error("locate"))
    }

    fn data(&mut self, bytes: &[u8]) -> Result<()> {
        trace!("Pcd8544: writing {} data bytes", bytes.len());
        self.write_data(bytes).map_err(driver_error("data write"))
    }

    fn backlight(&mut self, on: bool) -> Result<()> {
        debug!("Pcd8544: backlight {}", if on { "on" } else { "off" });
        self.set_backlight(on).map_err(driver_error("backlight"))
    }

    fn cls(&mut self) -> Result<()> {
        self.locate(0, 0)?;
        self.data(&[0u8; RAM_COLUMNS * RAM_BANKS])?;
        self.locate(0, 0)
    }
}
