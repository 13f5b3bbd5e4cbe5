// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` turns a `NowPlaying` record into bank writes for a
//! `DisplaySink`. The panel is split into regions, each a run of whole banks:
//!
//! | mode    | banks | content                                    |
//! |---------|-------|--------------------------------------------|
//! | tall    | 0-5   | `artist\ntitle`                            |
//! | compact | 0-1   | title, one line                            |
//! | compact | 2     | volume bar                                 |
//! | compact | 3     | banner text in the smaller banner font     |
//!
//! Text regions get a fresh `DisplaySurface`, are rasterized and packed, and the
//! packed bytes are written starting at the region's first bank.

use crate::config::LocationConfig;
use crate::daylight;
use crate::display::DisplaySink;
use crate::metadata::NowPlaying;
use crate::packer::{pack, PackedFrame};
use crate::rasterizer::font_set::FontSet;
use crate::rasterizer::glyph_source::GlyphSource;
use crate::rasterizer::render_text;
use crate::surface::{DisplayMode, DisplaySurface, BANK_HEIGHT, DISPLAY_WIDTH};
use crate::volume;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, trace, warn};

/// What a region shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionContent {
    /// Song text in the main fonts.
    Metadata,
    /// Pre-rendered volume bar, exactly one bank.
    VolumeBar,
    /// Fixed banner text in the banner fonts.
    Banner,
}

/// A horizontal strip of whole banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub content: RegionContent,
    pub first_bank: usize,
    pub banks: usize,
}

const TALL_REGIONS: &[Region] = &[Region {
    content: RegionContent::Metadata,
    first_bank: 0,
    banks: 6,
}];

const COMPACT_REGIONS: &[Region] = &[
    Region {
        content: RegionContent::Metadata,
        first_bank: 0,
        banks: 2,
    },
    Region {
        content: RegionContent::VolumeBar,
        first_bank: 2,
        banks: 1,
    },
    Region {
        content: RegionContent::Banner,
        first_bank: 3,
        banks: 1,
    },
];

/// Region layout for `mode`. Regions are disjoint and cover every bank.
pub fn regions(mode: DisplayMode) -> &'static [Region] {
    match mode {
        DisplayMode::Tall => TALL_REGIONS,
        DisplayMode::Compact => COMPACT_REGIONS,
    }
}

/// Packed bytes destined for `first_bank` onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankWrite {
    pub first_bank: usize,
    pub bytes: PackedFrame,
}

pub struct Renderer<N: GlyphSource, W: GlyphSource> {
    mode: DisplayMode,
    fonts: FontSet<N, W>,
    banner_fonts: FontSet<N, W>,
    banner: String,
    location: LocationConfig,
}

impl<N: GlyphSource, W: GlyphSource> Renderer<N, W> {
    pub fn new(
        mode: DisplayMode,
        fonts: FontSet<N, W>,
        banner_fonts: FontSet<N, W>,
        banner: String,
        location: LocationConfig,
    ) -> Self {
        Self {
            mode,
            fonts,
            banner_fonts,
            banner,
            location,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Rasterizes and packs `text` into a strip of `banks` banks.
    ///
    /// A strip shorter than one text line still shows the top rows of the
    /// first line instead of nothing.
    pub fn text_strip(&mut self, text: &str, banks: usize, banner: bool) -> PackedFrame {
        let fonts = if banner {
            &mut self.banner_fonts
        } else {
            &mut self.fonts
        };
        let line_banks = (fonts.line_height().max(0) as usize).div_ceil(BANK_HEIGHT);
        let mut surface = DisplaySurface::for_banks(banks.max(line_banks));
        render_text(&mut surface, text, fonts);

        let mut bytes = pack(&surface);
        bytes.truncate(DISPLAY_WIDTH * banks);
        bytes
    }

    /// Builds every bank write for `song`.
    pub fn compose(&mut self, song: &NowPlaying) -> Vec<BankWrite> {
        regions(self.mode)
            .iter()
            .map(|region| {
                let bytes = match region.content {
                    RegionContent::Metadata => {
                        let text = match self.mode {
                            DisplayMode::Tall => song.artist_and_title(),
                            DisplayMode::Compact => song.title.clone(),
                        };
                        self.text_strip(&text, region.banks, false)
                    }
                    RegionContent::VolumeBar => {
                        let key = song.volume.as_deref().unwrap_or(volume::MUTE_KEY);
                        volume::encode(key).to_vec()
                    }
                    RegionContent::Banner => {
                        let banner = self.banner.clone();
                        self.text_strip(&banner, region.banks, true)
                    }
                };
                trace!("Renderer: {:?} -> {} bytes", region, bytes.len());
                BankWrite {
                    first_bank: region.first_bank,
                    bytes,
                }
            })
            .collect()
    }

    /// Splash frame: the banner across the whole panel in the main fonts.
    pub fn compose_splash(&mut self) -> Vec<BankWrite> {
        let banner = self.banner.clone();
        vec![BankWrite {
            first_bank: 0,
            bytes: self.text_strip(&banner, self.mode.banks(), false),
        }]
    }

    /// Backlight state for `now`: on unless it is dark outside. Falls back to on
    /// when the day/night computation fails.
    pub fn backlight_for(&self, now: DateTime<Utc>) -> bool {
        match daylight::is_dark(now, &self.location) {
            Ok(dark) => !dark,
            Err(e) => {
                warn!("Renderer: day/night check failed, backlight on: {:#}", e);
                true
            }
        }
    }

    /// Renders `song` and sends it to `sink`.
    pub fn show<S: DisplaySink + ?Sized>(
        &mut self,
        sink: &mut S,
        song: &NowPlaying,
        now: DateTime<Utc>,
    ) -> Result<()> {
        debug!(
            "Renderer: showing '{}' / '{}' (volume {:?})",
            song.artist, song.title, song.volume
        );
        let writes = self.compose(song);
        let backlight = self.backlight_for(now);
        present(sink, &writes, backlight)
    }

    /// Sends the splash frame to `sink`.
    pub fn show_splash<S: DisplaySink + ?Sized>(
        &mut self,
        sink: &mut S,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let writes = self.compose_splash();
        let backlight = self.backlight_for(now);
        present(sink, &writes, backlight)
    }
}

/// Backlight, clear, then each bank write at column 0 of its first bank.
pub fn present<S: DisplaySink + ?Sized>(
    sink: &mut S,
    writes: &[BankWrite],
    backlight: bool,
) -> Result<()> {
    sink.backlight(backlight)?;
    sink.cls()?;
    for write in writes {
        sink.locate(0, write.first_bank)?;
        sink.data(&write.bytes)?;
    }
    sink.flush()
}

#[cfg(test)]
mod tests;
