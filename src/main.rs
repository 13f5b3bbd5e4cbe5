// In src/main.rs

// Declare modules
pub mod config;
pub mod daylight;
pub mod display;
pub mod ingest;
pub mod metadata;
pub mod orchestrator;
pub mod packer;
pub mod rasterizer;
pub mod renderer;
pub mod surface;
pub mod volume;

use crate::{
    config::{Config, DisplayConfig},
    display::DisplaySink,
    orchestrator::AppOrchestrator,
    rasterizer::{font_set::FontSet, truetype_source::TrueTypeSource},
    renderer::Renderer,
};

use anyhow::Context;
use log::{info, warn};
use std::time::Duration;

/// Main entry point for the `nowplaying-lcd` service.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting nowplaying-lcd...");

    // --- Configuration ---
    let config = Config::load()?;

    if config.startup_delay_secs > 0 {
        info!("Waiting {}s before starting", config.startup_delay_secs);
        std::thread::sleep(Duration::from_secs(config.startup_delay_secs));
    }

    // --- Fonts ---
    let narrow = TrueTypeSource::load(&config.fonts.narrow_path, config.fonts.size_px)
        .context("Failed to load narrow (Latin) font")?;
    let wide = TrueTypeSource::load(&config.fonts.wide_path, config.fonts.size_px)
        .context("Failed to load wide (CJK) font")?;
    let banner_fonts = FontSet::new(
        narrow.resized(config.fonts.banner_size_px),
        wide.resized(config.fonts.banner_size_px),
    );
    let mut renderer = Renderer::new(
        config.display.mode,
        FontSet::new(narrow, wide),
        banner_fonts,
        config.banner.clone(),
        config.location.clone(),
    );
    info!("Renderer initialized for {:?} mode", renderer.mode());

    // --- Display ---
    let mut sink = open_display(&config.display)?;
    sink.init(config.display.contrast)
        .context("Failed to initialize display")?;
    info!("Display initialized (contrast 0x{:02X})", config.display.contrast);

    // --- Metadata pipe ---
    ingest::ensure_fifo(&config.ingest.pipe_path)?;

    let mut app = AppOrchestrator::new(&mut renderer, sink.as_mut(), &config.ingest);
    app.splash();

    let mut reader = ingest::open_pipe(&config.ingest.pipe_path)?;
    let summary = app.run(&mut reader)?;
    if summary.display_failures > 0 {
        warn!("{} records could not be written to the display", summary.display_failures);
    }

    info!("nowplaying-lcd exited successfully.");
    Ok(())
}

/// PCD8544 on the Raspberry Pi SPI bus and sysfs GPIO.
#[cfg(feature = "rpi")]
fn open_display(config: &DisplayConfig) -> anyhow::Result<Box<dyn DisplaySink>> {
    use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
    use linux_embedded_hal::sysfs_gpio::Direction;
    use linux_embedded_hal::{Delay, SpidevDevice, SysfsPin};

    /// The controller tops out at 4 MHz.
    const SPI_SPEED_HZ: u32 = 4_000_000;

    let mut spi = SpidevDevice::open(&config.spi_device).map_err(|e| {
        anyhow::anyhow!("Failed to open '{}': {:?}", config.spi_device.display(), e)
    })?;
    spi.0
        .configure(
            &SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(SPI_SPEED_HZ)
                .mode(SpiModeFlags::SPI_MODE_0)
                .build(),
        )
        .context("Failed to configure SPI")?;

    let output_pin = |number: u64| -> anyhow::Result<SysfsPin> {
        let pin = SysfsPin::new(number);
        pin.export()
            .with_context(|| format!("Failed to export GPIO {}", number))?;
        pin.set_direction(Direction::Out)
            .with_context(|| format!("Failed to set GPIO {} as output", number))?;
        Ok(pin)
    };

    info!(
        "Opening PCD8544 on {} (DC {}, RST {}, BL {})",
        config.spi_device.display(),
        config.dc_pin,
        config.rst_pin,
        config.backlight_pin
    );
    Ok(Box::new(display::Pcd8544::new(
        spi,
        output_pin(config.dc_pin)?,
        output_pin(config.rst_pin)?,
        output_pin(config.backlight_pin)?,
        Delay,
    )))
}

/// Terminal preview when built without hardware support.
#[cfg(not(feature = "rpi"))]
fn open_display(config: &DisplayConfig) -> anyhow::Result<Box<dyn DisplaySink>> {
    info!("Built without the `rpi` feature, previewing on stdout");
    Ok(Box::new(display::ConsoleDisplay::new(
        std::io::stdout(),
        config.mode.banks(),
    )))
}
