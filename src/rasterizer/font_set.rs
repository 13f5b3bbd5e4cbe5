//! Per-character font dispatch and glyph caching.
//!
//! The `FontSet` owns the two backends and decides, per character, which one
//! measures and draws it:
//! - printable ASCII (letters, digits, punctuation, ASCII whitespace) → narrow
//! - everything else → wide (CJK-capable)
//!
//! Rasterized masks are cached for the life of the set, including negative
//! results for characters the chosen font cannot draw.

use crate::rasterizer::glyph_source::{GlyphMask, GlyphMetrics, GlyphSource};
use log::*;
use std::collections::HashMap;
use std::rc::Rc;

/// Which backend a character is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontClass {
    /// Monospace Latin font.
    Narrow,
    /// CJK-capable font.
    Wide,
}

/// Classifies `ch` by membership in the printable-ASCII repertoire.
pub fn classify(ch: char) -> FontClass {
    if ch.is_ascii_graphic() || matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') {
        FontClass::Narrow
    } else {
        FontClass::Wide
    }
}

/// Narrow and wide glyph sources plus a shared mask cache.
pub struct FontSet<N: GlyphSource, W: GlyphSource> {
    narrow: N,
    wide: W,
    /// (class, char) → mask, `None` when the font lacks the glyph.
    glyph_cache: HashMap<(FontClass, char), Option<Rc<GlyphMask>>>,
}

impl<N: GlyphSource, W: GlyphSource> FontSet<N, W> {
    pub fn new(narrow: N, wide: W) -> Self {
        info!(
            "FontSet: narrow='{}' (line {}px), wide='{}' (line {}px)",
            narrow.name(),
            narrow.line_height(),
            wide.name(),
            wide.line_height()
        );
        Self {
            narrow,
            wide,
            glyph_cache: HashMap::new(),
        }
    }

    /// Line height shared by both fonts, so mixed lines stack evenly.
    pub fn line_height(&self) -> i32 {
        self.narrow.line_height().max(self.wide.line_height())
    }

    /// Get the mask for `ch` from the backend its class selects.
    ///
    /// # Returns
    /// Some(mask) if the backend can draw `ch`, None if the cell must stay blank
    pub fn glyph(&mut self, ch: char) -> Option<Rc<GlyphMask>> {
        let class = classify(ch);
        if let Some(cached) = self.glyph_cache.get(&(class, ch)) {
            trace!("FontSet: Cache hit for '{}' (U+{:X})", ch, ch as u32);
            return cached.clone();
        }

        let mask = match class {
            FontClass::Narrow => self.narrow.rasterize(ch),
            FontClass::Wide => self.wide.rasterize(ch),
        }
        .map(Rc::new);

        if mask.is_none() {
            warn!(
                "FontSet: No {:?} glyph for '{}' (U+{:X}), leaving cell blank",
                class, ch, ch as u32
            );
        }
        self.glyph_cache.insert((class, ch), mask.clone());
        mask
    }

    /// Number of cached entries (hits and misses).
    pub fn cached_glyphs(&self) -> usize {
        self.glyph_cache.len()
    }
}

impl<N: GlyphSource, W: GlyphSource> GlyphMetrics for FontSet<N, W> {
    fn advance_width(&self, ch: char) -> i32 {
        match classify(ch) {
            FontClass::Narrow => self.narrow.advance_width(ch),
            FontClass::Wide => self.wide.advance_width(ch),
        }
    }

    fn kerning(&self, prev: char, ch: char) -> i32 {
        // Pairs that straddle the two fonts have no kerning data.
        match (classify(prev), classify(ch)) {
            (FontClass::Narrow, FontClass::Narrow) => self.narrow.kerning(prev, ch),
            (FontClass::Wide, FontClass::Wide) => self.wide.kerning(prev, ch),
            _ => 0,
        }
    }
}
