// src/daylight.rs

//! Day/night gate for the backlight.
//!
//! Civil dawn and dusk (sun 6° below the horizon) come from the standard
//! sunrise equation: mean solar anomaly, equation of center, ecliptic longitude,
//! solar transit, declination and hour angle. The result is good to a couple of
//! minutes, which is plenty for deciding whether to light a backlight.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use log::*;

use crate::config::LocationConfig;

/// Solar altitude at civil twilight, degrees.
const CIVIL_TWILIGHT_DEG: f64 = -6.0;
/// Julian date of 2000-01-01 12:00 TT.
const J2000: f64 = 2_451_545.0;
/// Julian date of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Axial tilt, degrees.
const OBLIQUITY_DEG: f64 = 23.4397;

/// Twilight situation for one local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Twilight {
    /// Normal day with a civil dawn and dusk.
    Cycle {
        dawn: DateTime<Utc>,
        dusk: DateTime<Utc>,
    },
    /// The sun never gets 6° below the horizon (white nights, midnight sun).
    AlwaysLight,
    /// The sun never climbs above -6° (polar night).
    AlwaysDark,
}

/// Whether it is dark outside at `location` at instant `now`.
///
/// Dark means at or after civil dusk, or at or before civil dawn, on the
/// location's local date.
pub fn is_dark(now: DateTime<Utc>, location: &LocationConfig) -> Result<bool> {
    let offset = local_offset(location)?;
    let date = now.with_timezone(&offset).date_naive();
    let dark = match twilight(date, location)? {
        Twilight::Cycle { dawn, dusk } => now >= dusk || now <= dawn,
        Twilight::AlwaysLight => false,
        Twilight::AlwaysDark => true,
    };
    debug!(
        "is_dark: {} at {} ({}) -> {}",
        now, location.name, date, dark
    );
    Ok(dark)
}

/// Computes civil dawn and dusk for `date` (a local calendar date) at `location`.
pub fn twilight(date: NaiveDate, location: &LocationConfig) -> Result<Twilight> {
    validate(location)?;

    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(|| anyhow!("bad epoch"))?;
    let n = date.signed_duration_since(epoch).num_days() as f64;

    // Mean solar noon in days since J2000, longitude east positive.
    let mean_noon = n - location.longitude / 360.0;
    let anomaly = (357.5291 + 0.985_600_28 * mean_noon).rem_euclid(360.0);
    let m = anomaly.to_radians();
    let center = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic = (anomaly + center + 180.0 + 102.9372).rem_euclid(360.0).to_radians();
    let transit = J2000 + mean_noon + 0.0053 * m.sin() - 0.0069 * (2.0 * ecliptic).sin();

    let sin_decl = ecliptic.sin() * OBLIQUITY_DEG.to_radians().sin();
    let cos_decl = (1.0 - sin_decl * sin_decl).sqrt();
    let phi = location.latitude.to_radians();
    let cos_hour_angle = (CIVIL_TWILIGHT_DEG.to_radians().sin() - phi.sin() * sin_decl)
        / (phi.cos() * cos_decl);

    if cos_hour_angle < -1.0 {
        return Ok(Twilight::AlwaysLight);
    }
    if cos_hour_angle > 1.0 {
        return Ok(Twilight::AlwaysDark);
    }

    let half_day = cos_hour_angle.acos().to_degrees() / 360.0;
    let dawn = julian_to_utc(transit - half_day)?;
    let dusk = julian_to_utc(transit + half_day)?;
    trace!(
        "twilight: {} at {}: dawn {}, dusk {}",
        date,
        location.name,
        dawn,
        dusk
    );
    Ok(Twilight::Cycle { dawn, dusk })
}

fn local_offset(location: &LocationConfig) -> Result<FixedOffset> {
    FixedOffset::east_opt(location.utc_offset_minutes * 60).ok_or_else(|| {
        anyhow!(
            "Invalid UTC offset {} minutes for '{}'",
            location.utc_offset_minutes,
            location.name
        )
    })
}

fn validate(location: &LocationConfig) -> Result<()> {
    if !location.latitude.is_finite() || !(-90.0..=90.0).contains(&location.latitude) {
        bail!(
            "Invalid latitude {} for '{}'",
            location.latitude,
            location.name
        );
    }
    if !location.longitude.is_finite() || !(-180.0..=180.0).contains(&location.longitude) {
        bail!(
            "Invalid longitude {} for '{}'",
            location.longitude,
            location.name
        );
    }
    Ok(())
}

fn julian_to_utc(jd: f64) -> Result<DateTime<Utc>> {
    let millis = ((jd - UNIX_EPOCH_JD) * 86_400_000.0).round() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| anyhow!("Julian date {} out of range", jd))
}
