//! Places characters on the panel: soft wrap on overflow, hard wrap on `\n`,
//! and a vertical clip once a line would no longer fit.

use crate::rasterizer::font_set::{classify, FontClass};
use crate::rasterizer::glyph_source::GlyphMetrics;
use log::*;

/// Where one character lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub ch: char,
    /// Left edge in pixels, always within `0..max_width`.
    pub column: i32,
    /// Top of the text line in pixels.
    pub row: i32,
    /// 1-based line number.
    pub line: u32,
    /// Backend that will draw the glyph.
    pub class: FontClass,
}

/// Computes placements for `text`.
///
/// The running cursor carries the wrapped character's own width onto the new
/// line, and kerning keeps using the previous input character across a soft
/// wrap. Only an explicit newline clears the kerning predecessor. Processing
/// stops at the first line whose bottom would pass `max_height`.
pub fn layout<M: GlyphMetrics + ?Sized>(
    text: &str,
    max_width: i32,
    line_height: i32,
    max_height: i32,
    metrics: &M,
) -> Vec<GlyphPlacement> {
    let mut placements = Vec::with_capacity(text.len());
    let mut previous: Option<char> = None;
    let mut line_start: i32 = 0;
    let mut line: u32 = 1;

    for ch in text.chars() {
        let mut char_left = line_start;

        let kerning = previous.map(|prev| metrics.kerning(prev, ch)).unwrap_or(0);
        let advance = metrics.advance_width(ch);
        line_start += kerning + advance;
        previous = Some(ch);

        if line_start > max_width || char_left >= max_width || ch == '\n' {
            line_start = kerning + advance;
            line += 1;
            char_left = 0;
        }

        if ch == '\n' {
            line_start = 0;
            previous = None;
            continue;
        }

        let row = (line as i32 - 1) * (line_height + 1);
        if row + line_height > max_height {
            debug!(
                "layout: clipped at '{}' on line {} (row {} + {} > {})",
                ch, line, row, line_height, max_height
            );
            break;
        }

        placements.push(GlyphPlacement {
            ch,
            column: char_left.max(0),
            row,
            line,
            class: classify(ch),
        });
    }

    placements
}
