//! Font backend primitives used by the layout and paint stages.
//!
//! This module defines the `GlyphSource` trait, a thin wrapper around one font at
//! one pixel size. The `FontSet` owns two of them (narrow Latin and wide CJK) and
//! implements per-character dispatch and caching on top.

/// Horizontal metrics needed by the line breaker.
///
/// All values are whole pixels; fractional font metrics are rounded the way the
/// glyphs end up on the panel.
pub trait GlyphMetrics {
    /// Horizontal pixels `ch` consumes before the next glyph starts.
    fn advance_width(&self, ch: char) -> i32;

    /// Adjustment applied before `ch` when it directly follows `prev`.
    fn kerning(&self, prev: char, ch: char) -> i32;
}

/// A single font backend.
///
/// Implementors provide:
/// - Horizontal metrics (advance, kerning)
/// - The height of one text line
/// - Glyph coverage masks positioned relative to the line top
pub trait GlyphSource: GlyphMetrics {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Height of one line of text (ascent to descent) in pixels.
    fn line_height(&self) -> i32;

    /// Whether the font has a real glyph for `ch` (not the `.notdef` box).
    fn has_glyph(&self, ch: char) -> bool;

    /// Rasterize `ch`.
    ///
    /// # Returns
    /// The coverage mask, or `None` when the font has no glyph for `ch`.
    /// Whitespace yields an empty mask rather than `None`.
    fn rasterize(&self, ch: char) -> Option<GlyphMask>;
}

/// Coverage mask for one glyph, row-major, 0-255 per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphMask {
    /// Mask width in pixels.
    pub width: usize,
    /// Mask height in pixels.
    pub height: usize,
    /// Horizontal offset of the mask's left edge from the pen position.
    pub left: i32,
    /// Vertical offset of the mask's top edge from the top of the text line.
    pub top: i32,
    /// `width * height` coverage values.
    pub coverage: Vec<u8>,
}

impl GlyphMask {
    /// Coverage at `(x, y)` inside the mask.
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.coverage[y * self.width + x]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
