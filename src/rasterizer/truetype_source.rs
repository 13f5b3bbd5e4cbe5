//! TrueType/OpenType glyph source backed by `fontdue`.

use crate::rasterizer::glyph_source::{GlyphMask, GlyphMetrics, GlyphSource};
use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use log::*;
use std::path::Path;

/// One font file rendered at one pixel size.
#[derive(Clone)]
pub struct TrueTypeSource {
    name: String,
    font: Font,
    px: f32,
    /// Baseline distance from the top of the line, in whole pixels.
    ascent: i32,
    line_height: i32,
}

impl TrueTypeSource {
    /// Load a font file from disk.
    ///
    /// # Arguments
    /// * `path` - Path to a `.ttf`/`.otf` file
    /// * `px` - Pixel size (em height) to render at
    pub fn load(path: &Path, px: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font file '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(&name, bytes, px)
    }

    /// Parse a font from memory.
    pub fn from_bytes(name: &str, bytes: Vec<u8>, px: f32) -> Result<Self> {
        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let font = Font::from_bytes(bytes, settings)
            .map_err(|e| anyhow!("Failed to parse font '{}': {}", name, e))?;
        let source = Self::with_font(name, font, px);
        info!(
            "TrueTypeSource: Loaded '{}' at {}px (ascent {}, line height {})",
            source.name, px, source.ascent, source.line_height
        );
        Ok(source)
    }

    /// Same font rendered at a different pixel size.
    pub fn resized(&self, px: f32) -> Self {
        Self::with_font(&self.name, self.font.clone(), px)
    }

    fn with_font(name: &str, font: Font, px: f32) -> Self {
        let (ascent, line_height) = match font.horizontal_line_metrics(px) {
            Some(lm) => (
                lm.ascent.round() as i32,
                (lm.ascent - lm.descent).ceil() as i32,
            ),
            None => {
                warn!(
                    "TrueTypeSource: '{}' has no horizontal line metrics, using em size",
                    name
                );
                (px.round() as i32, px.ceil() as i32)
            }
        };
        Self {
            name: name.to_string(),
            font,
            px,
            ascent,
            line_height,
        }
    }
}

impl GlyphMetrics for TrueTypeSource {
    fn advance_width(&self, ch: char) -> i32 {
        self.font.metrics(ch, self.px).advance_width.round() as i32
    }

    fn kerning(&self, prev: char, ch: char) -> i32 {
        self.font
            .horizontal_kern(prev, ch, self.px)
            .map(|k| k.round() as i32)
            .unwrap_or(0)
    }
}

impl GlyphSource for TrueTypeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn rasterize(&self, ch: char) -> Option<GlyphMask> {
        if !self.has_glyph(ch) {
            return None;
        }
        if ch.is_whitespace() {
            return Some(GlyphMask::default());
        }
        let (metrics, coverage) = self.font.rasterize(ch, self.px);
        // fontdue measures ymin upward from the baseline; the mask's first row is
        // its topmost one.
        let top = self.ascent - (metrics.ymin + metrics.height as i32);
        Some(GlyphMask {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin,
            top,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

    fn mono(px: f32) -> TrueTypeSource {
        TrueTypeSource::from_bytes("DejaVuSansMono.ttf", FONT_DATA.to_vec(), px).unwrap()
    }

    /// Last row a glyph covers, measured from the line top.
    fn bottom(mask: &GlyphMask) -> i32 {
        mask.top + mask.height as i32
    }

    #[test]
    fn printable_ascii_stays_inside_the_line() {
        let font = mono(12.0);
        let line_height = font.line_height();
        assert!(line_height > 0);
        for ch in ' '..='~' {
            let mask = font.rasterize(ch).unwrap();
            if mask.is_empty() {
                continue;
            }
            assert!(mask.top >= 0, "{:?} starts above the line (top {})", ch, mask.top);
            assert!(
                bottom(&mask) <= line_height,
                "{:?} ends below the line ({} > {})",
                ch,
                bottom(&mask),
                line_height
            );
            assert_eq!(mask.coverage.len(), mask.width * mask.height);
        }
    }

    #[test]
    fn descender_reaches_below_the_baseline() {
        let font = mono(12.0);
        let cap = font.rasterize('H').unwrap();
        let descender = font.rasterize('y').unwrap();
        assert!(bottom(&descender) > bottom(&cap));
        assert!(bottom(&descender) > font.ascent);
    }

    #[test]
    fn missing_codepoint_has_no_mask() {
        let font = mono(12.0);
        assert!(font.has_glyph('A'));
        assert!(!font.has_glyph('晴'));
        assert!(font.rasterize('晴').is_none());
    }

    #[test]
    fn whitespace_mask_is_empty() {
        let font = mono(12.0);
        let space = font.rasterize(' ').unwrap();
        assert!(space.is_empty());
        assert!(font.advance_width(' ') > 0);
    }

    #[test]
    fn monospaced_advances_match() {
        let font = mono(12.0);
        assert_eq!(font.advance_width('i'), font.advance_width('W'));
    }

    #[test]
    fn resized_scales_metrics() {
        let body = mono(12.0);
        let banner = body.resized(8.0);
        assert_eq!(banner.name(), body.name());
        assert!(banner.line_height() < body.line_height());
        assert!(banner.advance_width('A') < body.advance_width('A'));
        assert!(banner.rasterize('A').unwrap().height < body.rasterize('A').unwrap().height);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrueTypeSource::load(&dir.path().join("Zpix.ttf"), 12.0)
            .err()
            .unwrap();
        assert!(format!("{:#}", err).contains("Failed to read font file"));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = TrueTypeSource::from_bytes("junk.ttf", vec![0u8; 64], 12.0)
            .err()
            .unwrap();
        assert!(err.to_string().contains("junk.ttf"));
    }
}
