//! Sun position from an instant and an observer location.
//!
//! Both models end in the same horizontal-coordinate conversion, so altitude and
//! azimuth follow one convention: radians, azimuth clockwise from north.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};

use crate::types::{SolarModel, SunAngles};

pub const J1970: f64 = 2_440_587.5;
pub const J2000: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Obliquity of the ecliptic, degrees.
pub const EARTH_OBLIQUITY: f64 = 23.4397;
/// Declination amplitude of the day-of-year model, degrees.
pub const EARTH_AXIAL_TILT: f64 = 23.45;
pub const PERIHELION_LONGITUDE: f64 = 102.9372;
pub const DEGREES_PER_HOUR: f64 = 15.0;

pub fn julian_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let utc = instant.with_timezone(&Utc);
    let seconds = utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 * 1e-9;
    seconds / SECONDS_PER_DAY + J1970
}

pub fn days_since_j2000<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    julian_day(instant) - J2000
}

// ── Ecliptic model ──

pub fn mean_anomaly(days: f64) -> f64 {
    (357.5291 + 0.985_600_28 * days).to_radians()
}

pub fn equation_of_center(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin()).to_radians()
}

/// Ecliptic longitude of the sun, radians (not wrapped).
pub fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    mean_anomaly
        + equation_of_center(mean_anomaly)
        + PERIHELION_LONGITUDE.to_radians()
        + std::f64::consts::PI
}

pub fn declination(ecliptic_longitude: f64) -> f64 {
    let e = EARTH_OBLIQUITY.to_radians();
    (e.sin() * ecliptic_longitude.sin()).clamp(-1.0, 1.0).asin()
}

pub fn right_ascension(ecliptic_longitude: f64) -> f64 {
    let e = EARTH_OBLIQUITY.to_radians();
    (ecliptic_longitude.sin() * e.cos()).atan2(ecliptic_longitude.cos())
}

/// Local sidereal time, radians; `longitude` in degrees, east positive.
pub fn sidereal_time(days: f64, longitude: f64) -> f64 {
    (280.16 + 360.985_623_5 * days).to_radians() + longitude.to_radians()
}

pub fn ecliptic_angles<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    latitude: f64,
    longitude: f64,
) -> SunAngles {
    let d = days_since_j2000(instant);
    let l = ecliptic_longitude(mean_anomaly(d));
    let dec = declination(l);
    let hour_angle = sidereal_time(d, longitude) - right_ascension(l);
    horizontal_angles(latitude.to_radians(), dec, hour_angle)
}

// ── Day-of-year model ──

pub fn intermediate_angle_b(n: u32) -> f64 {
    ((n as f64 - 1.0) * (360.0 / 365.0)).to_radians()
}

/// Equation of time in minutes.
pub fn equation_of_time(n: u32) -> f64 {
    let b = intermediate_angle_b(n);
    229.18
        * (0.000075 + 0.001868 * b.cos()
            - 0.032077 * b.sin()
            - 0.014615 * (2.0 * b).cos()
            - 0.040849 * (2.0 * b).sin())
}

/// Declination in degrees.
pub fn solar_declination(n: u32) -> f64 {
    EARTH_AXIAL_TILT * (360.0 * ((284 + n) as f64 / 365.0)).to_radians().sin()
}

/// Local solar time in hours, wrapped into [0, 24).
pub fn local_solar_time(utc_hours: f64, longitude: f64, eot_minutes: f64) -> f64 {
    (utc_hours + (4.0 * longitude + eot_minutes) / 60.0).rem_euclid(24.0)
}

/// Hour angle in degrees, negative before solar noon.
pub fn hour_angle(local_solar_time: f64) -> f64 {
    DEGREES_PER_HOUR * (local_solar_time - 12.0)
}

pub fn day_of_year_angles<Tz: TimeZone>(
    instant: &DateTime<Tz>,
    latitude: f64,
    longitude: f64,
) -> SunAngles {
    let utc = instant.with_timezone(&Utc);
    let utc_hours =
        utc.hour() as f64 + utc.minute() as f64 / 60.0 + utc.second() as f64 / 3600.0;
    let n = utc.ordinal();
    let lst = local_solar_time(utc_hours, longitude, equation_of_time(n));
    horizontal_angles(
        latitude.to_radians(),
        solar_declination(n).to_radians(),
        hour_angle(lst).to_radians(),
    )
}

// ── Shared ──

/// Equatorial to horizontal coordinates. All inputs in radians.
pub fn horizontal_angles(latitude: f64, declination: f64, hour_angle: f64) -> SunAngles {
    let (sin_lat, cos_lat) = latitude.sin_cos();
    let (sin_dec, cos_dec) = declination.sin_cos();
    let (sin_ha, cos_ha) = hour_angle.sin_cos();

    let sin_alt = sin_lat * sin_dec + cos_lat * cos_dec * cos_ha;
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let sin_az = -cos_dec * sin_ha;
    let cos_az = sin_dec * cos_lat - cos_dec * sin_lat * cos_ha;
    SunAngles::new(altitude, sin_az.atan2(cos_az))
}

/// Sun angles for `instant` at (`latitude`, `longitude`) in degrees, using the ecliptic model.
pub fn sun_angles<Tz: TimeZone>(instant: &DateTime<Tz>, latitude: f64, longitude: f64) -> SunAngles {
    sun_angles_with(SolarModel::Ecliptic, instant, latitude, longitude)
}

pub fn sun_angles_with<Tz: TimeZone>(
    model: SolarModel,
    instant: &DateTime<Tz>,
    latitude: f64,
    longitude: f64,
) -> SunAngles {
    match model {
        SolarModel::Ecliptic => ecliptic_angles(instant, latitude, longitude),
        SolarModel::DayOfYear => day_of_year_angles(instant, latitude, longitude),
    }
}
