// src/surface.rs

//! Defines the `DisplaySurface` canvas and the fixed panel geometries.
//!
//! A `DisplaySurface` is a row-major grid of pixel intensities owned by one render
//! call. Every write is clamped so a cell only ever holds `0` or `1`, which is the
//! only distinction the display controller can show.

use serde::{Deserialize, Serialize};

/// Width of the panel in pixels. Both supported modes share it.
pub const DISPLAY_WIDTH: usize = 84;

/// Number of pixel rows addressed by one packed byte.
pub const BANK_HEIGHT: usize = 8;

/// Intensity written for lit pixels.
pub const FOREGROUND: u8 = 1;

/// Intensity of unlit pixels (the canvas default).
pub const BACKGROUND: u8 = 0;

/// The two panel geometries the renderer knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// 84×48, six banks. Song metadata only.
    #[default]
    Tall,
    /// 84×32, four banks. Metadata line, volume bar and banner.
    Compact,
}

impl DisplayMode {
    /// Panel height in pixels.
    pub const fn height(self) -> usize {
        match self {
            DisplayMode::Tall => 48,
            DisplayMode::Compact => 32,
        }
    }

    /// Number of 8-row banks on the panel.
    pub const fn banks(self) -> usize {
        self.height() / BANK_HEIGHT
    }

    /// Size of a full-panel packed frame in bytes.
    pub const fn frame_len(self) -> usize {
        DISPLAY_WIDTH * self.banks()
    }
}

/// In-memory canvas that glyphs are painted onto before packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySurface {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl DisplaySurface {
    /// Creates a blank surface. `height` is rounded up to a whole bank so the
    /// packer never reads past the end of the buffer.
    pub fn new(width: usize, height: usize) -> Self {
        let height = height.div_ceil(BANK_HEIGHT) * BANK_HEIGHT;
        Self {
            width,
            height,
            cells: vec![BACKGROUND; width * height],
        }
    }

    /// Creates a blank surface covering `banks` banks of the full panel width.
    pub fn for_banks(banks: usize) -> Self {
        Self::new(DISPLAY_WIDTH, banks * BANK_HEIGHT)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of 8-row banks covered by this surface.
    pub fn banks(&self) -> usize {
        self.height / BANK_HEIGHT
    }

    /// Reads a pixel. Out-of-bounds coordinates read as background.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return BACKGROUND;
        }
        self.cells[y * self.width + x]
    }

    /// Writes a pixel, clamping the intensity to `{0, 1}`.
    ///
    /// Returns `false` when the coordinate is outside the surface (the write is
    /// dropped, matching how glyph edges are clipped at the panel border).
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.cells[y * self.width + x] = value.min(FOREGROUND);
        true
    }

    /// Fills every cell with `value` (clamped).
    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value.min(FOREGROUND));
    }

    /// Overwrites the raw cell buffer without clamping, so tests can feed the
    /// packer multi-level images.
    #[cfg(test)]
    pub fn load_raw(&mut self, cells: &[u8]) {
        let len = self.cells.len().min(cells.len());
        self.cells[..len].copy_from_slice(&cells[..len]);
    }

    /// Row-major view of the cells.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[cfg(test)]
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != BACKGROUND).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_geometry() {
        assert_eq!(DisplayMode::Tall.banks(), 6);
        assert_eq!(DisplayMode::Compact.banks(), 4);
        assert_eq!(DisplayMode::Tall.frame_len(), 504);
        assert_eq!(DisplayMode::Compact.frame_len(), 336);
    }

    #[test]
    fn writes_are_clamped() {
        let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 48);
        assert!(surface.set(3, 4, 255));
        assert_eq!(surface.get(3, 4), 1);
        surface.fill(200);
        assert!(surface.cells().iter().all(|&c| c == 1));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 48);
        assert!(!surface.set(-1, 0, 1));
        assert!(!surface.set(0, -1, 1));
        assert!(!surface.set(84, 0, 1));
        assert!(!surface.set(0, 48, 1));
        assert_eq!(surface.lit_count(), 0);
        assert_eq!(surface.get(100, 100), BACKGROUND);
    }

    #[test]
    fn height_rounds_up_to_bank() {
        let surface = DisplaySurface::new(DISPLAY_WIDTH, 12);
        assert_eq!(surface.height(), 16);
        assert_eq!(surface.banks(), 2);
    }
}
