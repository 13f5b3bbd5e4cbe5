//! Headless fixed-cell glyph source.
//!
//! Every glyph is a solid block one pixel narrower than its advance, so layouts
//! can be checked pixel by pixel without shipping font files.

use crate::rasterizer::glyph_source::{GlyphMask, GlyphMetrics, GlyphSource};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct HeadlessSource {
    name: String,
    advance: i32,
    height: i32,
    wide_advance: Option<i32>,
    kerning: HashMap<(char, char), i32>,
    missing: HashSet<char>,
}

impl HeadlessSource {
    pub fn new(advance: i32, height: i32) -> Self {
        Self {
            name: format!("headless-{}x{}", advance, height),
            advance,
            height,
            wide_advance: None,
            kerning: HashMap::new(),
            missing: HashSet::new(),
        }
    }

    /// Uses `advance` for every character outside ASCII, mimicking a CJK font
    /// whose ideographs are full-width.
    pub fn with_wide_advance(mut self, advance: i32) -> Self {
        self.wide_advance = Some(advance);
        self
    }

    /// Adds a kerning pair.
    pub fn with_kerning(mut self, prev: char, ch: char, offset: i32) -> Self {
        self.kerning.insert((prev, ch), offset);
        self
    }

    /// Marks `ch` as absent from the font.
    pub fn without_glyph(mut self, ch: char) -> Self {
        self.missing.insert(ch);
        self
    }
}

impl GlyphMetrics for HeadlessSource {
    fn advance_width(&self, ch: char) -> i32 {
        match self.wide_advance {
            Some(wide) if !ch.is_ascii() => wide,
            _ => self.advance,
        }
    }

    fn kerning(&self, prev: char, ch: char) -> i32 {
        self.kerning.get(&(prev, ch)).copied().unwrap_or(0)
    }
}

impl GlyphSource for HeadlessSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_height(&self) -> i32 {
        self.height
    }

    fn has_glyph(&self, ch: char) -> bool {
        !self.missing.contains(&ch)
    }

    fn rasterize(&self, ch: char) -> Option<GlyphMask> {
        if !self.has_glyph(ch) {
            return None;
        }
        if ch.is_whitespace() {
            return Some(GlyphMask::default());
        }
        let width = (self.advance_width(ch) - 1).max(0) as usize;
        let height = self.height.max(0) as usize;
        Some(GlyphMask {
            width,
            height,
            left: 0,
            top: 0,
            coverage: vec![u8::MAX; width * height],
        })
    }
}
