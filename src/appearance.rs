//! Sun angles to scene-space light position and altitude-driven colors.
//!
//! Scene frame: +Y up, +Z north, +X east.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec3;

use crate::types::{Appearance, AppearanceMode, Hsl, Rgb, Sky, SunAngles};

pub const MIN_AMBIENT: f64 = 0.1;
pub const AMBIENT_SCALE: f64 = 0.5;

/// Altitude mapped from [-π/2, π/2] onto [0, 1]. Non-finite input maps to 0.
pub fn normalized_altitude(altitude: f64) -> f64 {
    if !altitude.is_finite() {
        return 0.0;
    }
    ((altitude + FRAC_PI_2) / PI).clamp(0.0, 1.0)
}

pub fn ambient_intensity(altitude: f64) -> f64 {
    (normalized_altitude(altitude) * AMBIENT_SCALE).max(MIN_AMBIENT)
}

/// Sun position on a sphere of radius `distance` around the origin.
pub fn sun_direction(angles: &SunAngles, distance: f64) -> DVec3 {
    let (sin_alt, cos_alt) = angles.altitude.sin_cos();
    let (sin_az, cos_az) = angles.azimuth.sin_cos();
    distance * DVec3::new(cos_alt * sin_az, sin_alt, cos_alt * cos_az)
}

pub fn sun_hsl(altitude: f64) -> Hsl {
    let n = normalized_altitude(altitude);
    Hsl {
        hue: (n * 0.1).clamp(0.0, 0.1),
        saturation: 1.0 - n * 0.5,
        lightness: 0.5,
    }
}

pub fn sky_hsl(altitude: f64) -> Hsl {
    let n = normalized_altitude(altitude);
    Hsl {
        hue: 0.6 - n * 0.1,
        saturation: 0.7 - n * 0.3,
        lightness: 0.5 + n * 0.3,
    }
}

fn hue_channel(low: f64, high: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        low + (high - low) * 6.0 * t
    } else if t < 0.5 {
        high
    } else if t < 2.0 / 3.0 {
        low + (high - low) * 6.0 * (2.0 / 3.0 - t)
    } else {
        low
    }
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Hue wraps into [0, 1); saturation and lightness are clamped to [0, 1].
    pub fn to_rgb(&self) -> Rgb {
        let h = self.hue.rem_euclid(1.0);
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);
        if s == 0.0 {
            return Rgb::new(l, l, l);
        }
        let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let low = 2.0 * l - high;
        Rgb::new(
            hue_channel(low, high, h + 1.0 / 3.0),
            hue_channel(low, high, h),
            hue_channel(low, high, h - 1.0 / 3.0),
        )
    }
}

pub fn appearance(angles: &SunAngles, mode: AppearanceMode) -> Appearance {
    let ambient_intensity = ambient_intensity(angles.altitude);
    match mode {
        AppearanceMode::Simple => Appearance {
            ambient_intensity,
            sun_color: Rgb::WHITE,
            background_color: Rgb::SKY_BLUE,
        },
        AppearanceMode::Rich => Appearance {
            ambient_intensity,
            sun_color: sun_hsl(angles.altitude).to_rgb(),
            background_color: sky_hsl(angles.altitude).to_rgb(),
        },
    }
}

/// Full sky state for one set of angles. Always recomputed from scratch.
pub fn to_scene(angles: &SunAngles, distance: f64, mode: AppearanceMode) -> Sky {
    Sky {
        angles: *angles,
        direction: sun_direction(angles, distance),
        appearance: appearance(angles, mode),
    }
}
