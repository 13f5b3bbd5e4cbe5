// src/config.rs

//! Defines the configuration structures for the now-playing display.
//!
//! Every section deserializes with `#[serde(default)]`, so a configuration file
//! only needs the keys it wants to change. Defaults describe the stock setup:
//! an 84×48 PCD8544 on a Raspberry Pi, shairport writing metadata to a FIFO in
//! the `pi` user's home, and Beijing as the backlight location.

use anyhow::{Context, Result};
use log::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::surface::DisplayMode;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "NOWPLAYING_CONFIG";

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Panel geometry and controller wiring.
    pub display: DisplayConfig,
    /// Font files and pixel sizes.
    pub fonts: FontConfig,
    /// Where the backlight day/night decision is computed for.
    pub location: LocationConfig,
    /// Metadata pipe and field names.
    pub ingest: IngestConfig,
    /// Seconds to wait before touching the display, so the receiver can settle.
    pub startup_delay_secs: u64,
    /// Splash text, also drawn in the compact mode's bottom bank.
    pub banner: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display: DisplayConfig::default(),
            fonts: FontConfig::default(),
            location: LocationConfig::default(),
            ingest: IngestConfig::default(),
            startup_delay_secs: 10,
            banner: "AirPlay".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration named by `NOWPLAYING_CONFIG`, or the defaults when
    /// the variable is unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                info!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        info!("Configuration loaded from '{}'", path.display());
        debug!("{:?}", config);
        Ok(config)
    }
}

// --- Display Configuration ---

/// Panel geometry and the pins the controller hangs off.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Operating voltage byte sent at init (bit 7 set, as the controller expects).
    pub contrast: u8,
    /// spidev node the controller is attached to.
    pub spi_device: PathBuf,
    /// BCM GPIO numbers.
    pub dc_pin: u64,
    pub rst_pin: u64,
    pub backlight_pin: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            mode: DisplayMode::Tall,
            contrast: 0xBB,
            spi_device: PathBuf::from("/dev/spidev0.0"),
            dc_pin: 23,
            rst_pin: 24,
            backlight_pin: 18,
        }
    }
}

// --- Font Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Monospace Latin font, used for printable ASCII.
    pub narrow_path: PathBuf,
    /// CJK-capable bitmap-style font, used for everything else.
    pub wide_path: PathBuf,
    /// Pixel size for metadata text.
    pub size_px: f32,
    /// Pixel size for the compact mode's banner bank.
    pub banner_size_px: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            narrow_path: PathBuf::from("DejaVuSansMono.ttf"),
            wide_path: PathBuf::from("Zpix.ttf"),
            size_px: 12.0,
            banner_size_px: 8.0,
        }
    }
}

// --- Location Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocationConfig {
    /// Only used in log output.
    pub name: String,
    /// Degrees, north positive.
    pub latitude: f64,
    /// Degrees, east positive.
    pub longitude: f64,
    /// Offset of local civil time from UTC, used to pick the local date.
    pub utc_offset_minutes: i32,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            name: "Beijing".to_string(),
            latitude: 39.9042,
            longitude: 116.4074,
            utc_offset_minutes: 8 * 60,
        }
    }
}

// --- Ingest Configuration ---

/// Metadata pipe location and the key names looked up in each record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    pub pipe_path: PathBuf,
    pub artist_key: String,
    pub title_key: String,
    pub album_key: String,
    pub volume_key: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            pipe_path: PathBuf::from("/home/pi/shairport/now_playing"),
            artist_key: "artist".to_string(),
            title_key: "title".to_string(),
            album_key: "album".to_string(),
            volume_key: "volume".to_string(),
        }
    }
}
