//! Text-to-bitmap rasterization.
//!
//! The pipeline for one string:
//!
//! ```text
//! &str  →  [line_breaker::layout]  →  GlyphPlacement[]  →  [paint]  →  DisplaySurface
//!            (metrics only)                                  (FontSet masks)
//! ```
//!
//! Metrics and masks both come from the `FontSet`, which routes every character
//! to the narrow Latin or the wide CJK backend.

pub mod font_set;
pub mod glyph_source;
pub mod headless_source;
pub mod line_breaker;
pub mod truetype_source;


use crate::rasterizer::font_set::FontSet;
use crate::rasterizer::glyph_source::GlyphSource;
use crate::rasterizer::line_breaker::{layout, GlyphPlacement};
use crate::surface::{DisplaySurface, FOREGROUND};
use log::trace;

/// Coverage at or above this value lights a pixel. The panel has no grey levels.
pub const COVERAGE_THRESHOLD: u8 = 128;

/// Paints one placed glyph onto `surface`.
///
/// Pixels that fall outside the surface are dropped. A character its backend
/// cannot draw leaves the cell blank.
///
/// # Returns
/// `true` if a glyph mask was found for the character
pub fn paint<N: GlyphSource, W: GlyphSource>(
    surface: &mut DisplaySurface,
    placement: &GlyphPlacement,
    fonts: &mut FontSet<N, W>,
) -> bool {
    let Some(mask) = fonts.glyph(placement.ch) else {
        return false;
    };
    if mask.is_empty() {
        return true;
    }

    let origin_x = placement.column + mask.left;
    let origin_y = placement.row + mask.top;
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.at(x, y) >= COVERAGE_THRESHOLD {
                surface.set(origin_x + x as i32, origin_y + y as i32, FOREGROUND);
            }
        }
    }
    true
}

/// Lays out `text` across the full width of `surface` and paints every glyph
/// that fits.
///
/// # Returns
/// The placements that survived vertical clipping
pub fn render_text<N: GlyphSource, W: GlyphSource>(
    surface: &mut DisplaySurface,
    text: &str,
    fonts: &mut FontSet<N, W>,
) -> Vec<GlyphPlacement> {
    let placements = layout(
        text,
        surface.width() as i32,
        fonts.line_height(),
        surface.height() as i32,
        &*fonts,
    );
    trace!(
        "render_text: {} of {} chars placed",
        placements.len(),
        text.chars().count()
    );

    for placement in &placements {
        paint(surface, placement, fonts);
    }
    placements
}
