// src/renderer/tests.rs

use super::*;
use crate::display::HeadlessDisplay;
use crate::rasterizer::headless_source::HeadlessSource;
use chrono::TimeZone;
use test_log::test;

type TestRenderer = Renderer<HeadlessSource, HeadlessSource>;

fn fonts(height: i32) -> FontSet<HeadlessSource, HeadlessSource> {
    FontSet::new(
        HeadlessSource::new(6, height),
        HeadlessSource::new(6, height).with_wide_advance(12),
    )
}

fn renderer(mode: DisplayMode) -> TestRenderer {
    Renderer::new(
        mode,
        fonts(12),
        fonts(8),
        "AirPlay".to_string(),
        LocationConfig::default(),
    )
}

fn song(volume: Option<&str>) -> NowPlaying {
    NowPlaying {
        artist: "A".to_string(),
        title: "T".to_string(),
        album: None,
        volume: volume.map(str::to_string),
    }
}

/// 12:00 in Beijing.
fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 4, 0, 0).unwrap()
}

/// 23:00 in Beijing.
fn night() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 21, 15, 0, 0).unwrap()
}

#[test]
fn regions_tile_the_panel() {
    for mode in [DisplayMode::Tall, DisplayMode::Compact] {
        let mut next = 0;
        for region in regions(mode) {
            assert_eq!(region.first_bank, next, "{:?}", mode);
            next += region.banks;
        }
        assert_eq!(next, mode.banks(), "{:?}", mode);
    }
}

#[test]
fn tall_frame_matches_direct_render() {
    let mut renderer = renderer(DisplayMode::Tall);
    let writes = renderer.compose(&song(None));
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].first_bank, 0);
    assert_eq!(writes[0].bytes.len(), DisplayMode::Tall.frame_len());

    let mut surface = DisplaySurface::new(DISPLAY_WIDTH, 48);
    render_text(&mut surface, "A\nT", &mut fonts(12));
    assert_eq!(writes[0].bytes, pack(&surface));
}

#[test]
fn compact_frame_has_three_regions() {
    let mut renderer = renderer(DisplayMode::Compact);
    let writes = renderer.compose(&song(Some("-15.000000")));
    let layout: Vec<_> = writes.iter().map(|w| (w.first_bank, w.bytes.len())).collect();
    assert_eq!(layout, vec![(0, 168), (2, 84), (3, 84)]);

    // Title only, rows 0-11 of column 0.
    assert_eq!(writes[0].bytes[0], 0xFF);
    assert_eq!(writes[0].bytes[DISPLAY_WIDTH], 0x0F);
    // The artist's second line does not exist in compact mode.
    assert!(writes[0].bytes[6..DISPLAY_WIDTH].iter().all(|&b| b == 0));

    assert_eq!(writes[1].bytes, volume::encode("-15.000000").to_vec());
    // Banner font is 8px tall and fills its bank.
    assert_eq!(writes[2].bytes[0], 0xFF);
}

#[test]
fn missing_volume_draws_muted_bar() {
    let mut renderer = renderer(DisplayMode::Compact);
    let writes = renderer.compose(&song(None));
    assert_eq!(writes[1].bytes, volume::encode(volume::MUTE_KEY).to_vec());
}

#[test]
fn short_region_shows_top_of_tall_line() {
    let mut renderer = Renderer::new(
        DisplayMode::Compact,
        fonts(12),
        fonts(12),
        "X".to_string(),
        LocationConfig::default(),
    );
    let writes = renderer.compose(&song(None));
    assert_eq!(writes[2].bytes.len(), DISPLAY_WIDTH);
    assert_eq!(writes[2].bytes[0], 0xFF);
    assert_eq!(writes[2].bytes[5], 0x00);
}

#[test]
fn show_writes_frame_and_sets_backlight() {
    let mut renderer = renderer(DisplayMode::Tall);
    let mut display = HeadlessDisplay::new();
    display.init(0xBB).unwrap();

    renderer.show(&mut display, &song(None), noon()).unwrap();
    assert!(display.is_backlit());
    let expected = renderer.compose(&song(None));
    assert_eq!(display.frame(6), expected[0].bytes.as_slice());

    renderer.show(&mut display, &song(None), night()).unwrap();
    assert!(!display.is_backlit());
}

#[test]
fn compact_show_lands_in_the_right_banks() {
    let mut renderer = renderer(DisplayMode::Compact);
    let mut display = HeadlessDisplay::new();
    renderer
        .show(&mut display, &song(Some("0.000000")), noon())
        .unwrap();
    let ram = display.frame(4);
    assert_eq!(&ram[2 * DISPLAY_WIDTH..3 * DISPLAY_WIDTH], &volume::encode("0.000000")[..]);
    // Banks 4 and 5 exist in RAM but are left blank.
    assert!(display.ram()[4 * DISPLAY_WIDTH..].iter().all(|&b| b == 0));
}

#[test]
fn broken_location_keeps_backlight_on() {
    let mut renderer = Renderer::new(
        DisplayMode::Tall,
        fonts(12),
        fonts(8),
        "AirPlay".to_string(),
        LocationConfig {
            latitude: 123.0,
            ..LocationConfig::default()
        },
    );
    assert!(renderer.backlight_for(night()));
    let mut display = HeadlessDisplay::new();
    renderer.show(&mut display, &song(None), night()).unwrap();
    assert!(display.is_backlit());
}

#[test]
fn each_show_replaces_the_previous_frame() {
    let mut renderer = renderer(DisplayMode::Tall);
    let mut display = HeadlessDisplay::new();
    let long = NowPlaying {
        artist: "Long artist name".to_string(),
        title: "Long title".to_string(),
        album: None,
        volume: None,
    };
    renderer.show(&mut display, &long, noon()).unwrap();
    renderer.show(&mut display, &song(None), noon()).unwrap();
    assert_eq!(display.frame(6), renderer.compose(&song(None))[0].bytes.as_slice());
}

#[test]
fn splash_shows_banner() {
    let mut renderer = renderer(DisplayMode::Tall);
    let mut display = HeadlessDisplay::new();
    renderer.show_splash(&mut display, noon()).unwrap();
    // "AirPlay" is seven 6px cells on the first line.
    assert!(display.pixel(0, 0));
    assert!(display.pixel(40, 11));
    assert!(!display.pixel(42, 0));
    assert!(!display.pixel(0, 13));
}

#[test]
fn write_failure_is_reported() {
    let mut renderer = renderer(DisplayMode::Tall);
    let mut display = HeadlessDisplay::new();
    display.fail_writes(true);
    assert!(renderer.show(&mut display, &song(None), noon()).is_err());
}
