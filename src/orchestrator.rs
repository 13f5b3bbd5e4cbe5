// src/orchestrator.rs
//! Orchestrates the main application flow: records from the pipe go through the
//! renderer to the display sink, one at a time, until the pipe closes. Display
//! and clock are injected so the whole loop runs against the headless sink in
//! tests.

use crate::{
    config::IngestConfig,
    display::DisplaySink,
    ingest::{pump, RecordReader},
    metadata::{MetadataRecord, NowPlaying},
    rasterizer::glyph_source::GlyphSource,
    renderer::Renderer,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::BufRead;

/// What happened to one record.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RecordOutcome {
    /// Rendered and written to the display.
    Shown,
    /// Missing artist or title.
    Skipped,
    /// The display rejected the write; the loop carries on.
    DisplayFailed,
}

/// Per-run counters, reported at shutdown.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RunSummary {
    pub shown: usize,
    pub skipped: usize,
    pub display_failures: usize,
}

pub struct AppOrchestrator<'a, N: GlyphSource, W: GlyphSource, S: DisplaySink + ?Sized> {
    renderer: &'a mut Renderer<N, W>,
    sink: &'a mut S,
    keys: &'a IngestConfig,
    clock: Box<dyn Fn() -> DateTime<Utc> + 'a>,
}

impl<'a, N: GlyphSource, W: GlyphSource, S: DisplaySink + ?Sized> AppOrchestrator<'a, N, W, S> {
    /// Creates an orchestrator reading wall-clock time from `Utc::now`.
    pub fn new(renderer: &'a mut Renderer<N, W>, sink: &'a mut S, keys: &'a IngestConfig) -> Self {
        Self::with_clock(renderer, sink, keys, Utc::now)
    }

    pub fn with_clock(
        renderer: &'a mut Renderer<N, W>,
        sink: &'a mut S,
        keys: &'a IngestConfig,
        clock: impl Fn() -> DateTime<Utc> + 'a,
    ) -> Self {
        AppOrchestrator {
            renderer,
            sink,
            keys,
            clock: Box::new(clock),
        }
    }

    /// Renders one record.
    pub fn handle_record(&mut self, record: &MetadataRecord) -> RecordOutcome {
        let Some(song) = NowPlaying::from_record(record, self.keys) else {
            return RecordOutcome::Skipped;
        };
        let now = (self.clock)();
        match self.renderer.show(&mut *self.sink, &song, now) {
            Ok(()) => {
                log::info!("Orchestrator: now playing '{}' - '{}'", song.artist, song.title);
                RecordOutcome::Shown
            }
            Err(e) => {
                log::error!("Orchestrator: display write failed: {:#}", e);
                RecordOutcome::DisplayFailed
            }
        }
    }

    /// Shows the splash frame. A failure here is logged, not fatal.
    pub fn splash(&mut self) {
        let now = (self.clock)();
        if let Err(e) = self.renderer.show_splash(&mut *self.sink, now) {
            log::warn!("Orchestrator: splash failed: {:#}", e);
        }
    }

    /// Processes records until the pipe ends, then blanks the display.
    pub fn run<R: BufRead>(&mut self, reader: &mut RecordReader<R>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        pump(reader, |record| match self.handle_record(&record) {
            RecordOutcome::Shown => summary.shown += 1,
            RecordOutcome::Skipped => summary.skipped += 1,
            RecordOutcome::DisplayFailed => summary.display_failures += 1,
        });
        log::info!("Orchestrator: input finished, {:?}", summary);
        self.shutdown()?;
        Ok(summary)
    }

    /// Clears the panel and switches the backlight off.
    pub fn shutdown(&mut self) -> Result<()> {
        self.sink.cls().context("Failed to clear display")?;
        self.sink
            .backlight(false)
            .context("Failed to switch backlight off")?;
        self.sink.flush().context("Failed to flush display")
    }
}
