use std::f64::consts::{FRAC_PI_2, PI, TAU};

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Chicago;

use solar_panel_sim::angles::*;
use solar_panel_sim::types::{SolarModel, SunAngles};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}

const MODELS: [SolarModel; 2] = [SolarModel::Ecliptic, SolarModel::DayOfYear];

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

// ── Ranges ──

#[test]
fn test_angles_always_in_range() {
    let latitudes = [-90.0, -66.5, -33.9, 0.0, 23.4, 39.8, 70.0, 89.9, 90.0];
    let longitudes = [-180.0, -89.6, 0.0, 15.0, 151.2, 180.0];
    for model in MODELS {
        for month in [1, 3, 6, 9, 12] {
            for hour in (0..24).step_by(3) {
                let t = utc(2026, month, 21, hour, 0);
                for &lat in &latitudes {
                    for &lon in &longitudes {
                        let a = sun_angles_with(model, &t, lat, lon);
                        assert!(
                            (-FRAC_PI_2..=FRAC_PI_2).contains(&a.altitude),
                            "{:?} altitude={} at ({}, {}) {}",
                            model, a.altitude, lat, lon, t
                        );
                        assert!(
                            a.azimuth >= 0.0 && a.azimuth < TAU,
                            "{:?} azimuth={} at ({}, {}) {}",
                            model, a.azimuth, lat, lon, t
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_sun_angles_new_wraps_azimuth() {
    assert_approx!(SunAngles::new(0.0, -FRAC_PI_2).azimuth, 1.5 * PI, 1e-12);
    assert_approx!(SunAngles::new(0.0, TAU + 0.5).azimuth, 0.5, 1e-12);
    assert!(SunAngles::new(0.0, -1e-18).azimuth < TAU);
    assert_approx!(SunAngles::new(2.0, 0.0).altitude, FRAC_PI_2, 0.0);
}

// ── Equator, equinox, solar noon ──

#[test]
fn test_equator_equinox_noon_near_zenith() {
    let t = utc(2026, 3, 20, 12, 0);
    for model in MODELS {
        let a = sun_angles_with(model, &t, 0.0, 0.0);
        assert_approx!(a.altitude, FRAC_PI_2, 0.06);
        assert!(a.altitude_deg() > 85.0, "{:?} altitude={}", model, a.altitude_deg());
    }
}

// ── Daily cycle ──

#[test]
fn test_altitude_single_peaked_over_day() {
    for model in MODELS {
        let altitudes: Vec<f64> = (0..48)
            .map(|i| sun_angles_with(model, &utc(2026, 6, 21, i / 2, 30 * (i % 2)), 40.0, 0.0))
            .map(|a| a.altitude)
            .collect();
        let peak = altitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert!((22..=26).contains(&peak), "{:?} peak at index {}", model, peak);
        for i in 0..peak {
            assert!(altitudes[i] < altitudes[i + 1], "{:?} not rising at {}", model, i);
        }
        for i in peak..altitudes.len() - 1 {
            assert!(altitudes[i] > altitudes[i + 1], "{:?} not falling at {}", model, i);
        }
    }
}

#[test]
fn test_midnight_below_horizon() {
    let a = sun_angles(&utc(2026, 6, 21, 0, 0), 45.0, 0.0);
    assert!(!a.is_above_horizon());
    assert_approx!(a.altitude_deg(), -21.56, 1.0);
}

#[test]
fn test_morning_east_afternoon_west() {
    for model in MODELS {
        let am = sun_angles_with(model, &utc(2026, 3, 20, 9, 0), 40.0, 0.0);
        let pm = sun_angles_with(model, &utc(2026, 3, 20, 15, 0), 40.0, 0.0);
        assert!(am.azimuth > 0.0 && am.azimuth < PI, "am azimuth={}", am.azimuth_deg());
        assert!(pm.azimuth > PI && pm.azimuth < TAU, "pm azimuth={}", pm.azimuth_deg());
        assert_approx!(am.altitude, pm.altitude, 0.1);
    }
}

#[test]
fn test_noon_sun_due_south_in_north() {
    let a = sun_angles(&utc(2026, 6, 21, 12, 0), 45.0, 0.0);
    assert_approx!(a.azimuth, PI, 0.05);
    assert_approx!(a.altitude_deg(), 68.4, 1.0);
}

// ── Local time zones ──

#[test]
fn test_springfield_equinox_local_noon() {
    let t = Chicago.with_ymd_and_hms(2026, 3, 21, 12, 0, 0).unwrap();
    for model in MODELS {
        let a = sun_angles_with(model, &t, 39.8, -89.6);
        assert_approx!(a.altitude_deg(), 47.5, 2.5);
        assert!(
            a.azimuth_deg() > 140.0 && a.azimuth_deg() < 170.0,
            "azimuth={}",
            a.azimuth_deg()
        );
    }
}

#[test]
fn test_same_instant_any_zone_same_angles() {
    let local = Chicago.with_ymd_and_hms(2026, 7, 4, 9, 30, 0).unwrap();
    let as_utc = local.with_timezone(&Utc);
    assert_eq!(sun_angles(&local, 39.8, -89.6), sun_angles(&as_utc, 39.8, -89.6));
}

// ── Southern hemisphere ──

#[test]
fn test_southern_hemisphere_reversed_seasons() {
    let jun = sun_angles(&utc(2026, 6, 21, 2, 0), -33.9, 151.2);
    let dec = sun_angles(&utc(2026, 12, 21, 2, 0), -33.9, 151.2);
    assert!(jun.altitude < dec.altitude);
    // Noon sun stands to the north
    let from_north = jun.azimuth.min(TAU - jun.azimuth);
    assert!(from_north < 0.1, "azimuth={}", jun.azimuth_deg());
}

// ── Polar day and night ──

#[test]
fn test_polar_day_never_sets() {
    for model in MODELS {
        for hour in 0..24 {
            let a = sun_angles_with(model, &utc(2026, 6, 21, hour, 0), 80.0, 0.0);
            assert!(a.altitude > 0.0, "{:?} hour {} altitude={}", model, hour, a.altitude);
        }
    }
}

#[test]
fn test_polar_night_never_rises() {
    for model in MODELS {
        for hour in 0..24 {
            let a = sun_angles_with(model, &utc(2026, 12, 21, hour, 0), 80.0, 0.0);
            assert!(a.altitude < 0.0, "{:?} hour {} altitude={}", model, hour, a.altitude);
        }
    }
}

#[test]
fn test_poles_are_finite() {
    for lat in [90.0, -90.0] {
        for hour in 0..24 {
            let a = sun_angles(&utc(2026, 3, 20, hour, 0), lat, 0.0);
            assert!(a.is_finite(), "lat {} hour {}", lat, hour);
        }
    }
}

// ── Purity ──

#[test]
fn test_sun_angles_deterministic() {
    let t = utc(2026, 10, 16, 14, 45);
    assert_eq!(sun_angles(&t, 52.52, 13.4), sun_angles(&t, 52.52, 13.4));
}

// ── Ecliptic model pieces ──

#[test]
fn test_ecliptic_declination_solstices() {
    for (month, expected) in [(6, 23.44), (12, -23.44)] {
        let d = days_since_j2000(&utc(2026, month, 21, 12, 0));
        let dec = declination(ecliptic_longitude(mean_anomaly(d)));
        assert_approx!(dec.to_degrees(), expected, 0.5);
    }
}

#[test]
fn test_days_since_j2000() {
    assert_approx!(days_since_j2000(&utc(2000, 1, 1, 12, 0)), 0.0, 1e-9);
    assert_approx!(days_since_j2000(&utc(2000, 1, 2, 0, 0)), 0.5, 1e-9);
}

// ── Day-of-year model pieces ──

#[test]
fn test_solar_declination_solstices_equinoxes() {
    assert_approx!(solar_declination(172), 23.45, 0.5);
    assert_approx!(solar_declination(355), -23.45, 0.5);
    assert_approx!(solar_declination(80), 0.0, 1.0);
    assert_approx!(solar_declination(264), 0.0, 1.0);
}

#[test]
fn test_solar_declination_bounded_all_days() {
    for n in 1..=366 {
        let decl = solar_declination(n);
        assert!((-23.45..=23.45).contains(&decl), "Day {}: {}", n, decl);
    }
}

#[test]
fn test_equation_of_time_bounded() {
    for n in 1..=366 {
        let eot = equation_of_time(n);
        assert!((-15.0..=17.0).contains(&eot), "Day {}: {}", n, eot);
    }
}

#[test]
fn test_hour_angle_known_values() {
    assert_approx!(hour_angle(12.0), 0.0, 1e-12);
    assert_approx!(hour_angle(13.0), 15.0, 1e-12);
    assert_approx!(hour_angle(9.0), -45.0, 1e-12);
}

#[test]
fn test_local_solar_time_wraps() {
    assert_approx!(local_solar_time(23.5, 15.0, 0.0), 0.5, 1e-12);
    assert_approx!(local_solar_time(0.5, -15.0, 0.0), 23.5, 1e-12);
}
