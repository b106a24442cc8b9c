use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    pub fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => f.write_str("latitude"),
            Axis::Longitude => f.write_str("longitude"),
        }
    }
}

/// Observer location in degrees. Construct through [`GeoCoordinate::new`] to keep
/// non-finite or out-of-range values out of the trig pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            latitude: check_degrees(Axis::Latitude, latitude)?,
            longitude: check_degrees(Axis::Longitude, longitude)?,
        })
    }
}

pub(crate) fn check_degrees(axis: Axis, value: f64) -> Result<f64> {
    if value.is_finite() && value.abs() <= axis.limit() {
        Ok(value)
    } else {
        Err(SimError::InvalidCoordinate { axis, value })
    }
}

/// Sun altitude and azimuth in radians. Azimuth runs clockwise from north
/// (0 = N, π/2 = E, π = S, 3π/2 = W).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunAngles {
    pub altitude: f64,
    pub azimuth: f64,
}

impl SunAngles {
    /// Clamps altitude into [-π/2, π/2] and wraps azimuth into [0, 2π).
    pub fn new(altitude: f64, azimuth: f64) -> Self {
        let mut azimuth = azimuth.rem_euclid(TAU);
        // rem_euclid rounds tiny negatives up to exactly TAU
        if azimuth >= TAU {
            azimuth = 0.0;
        }
        Self {
            altitude: altitude.clamp(-FRAC_PI_2, FRAC_PI_2),
            azimuth,
        }
    }

    pub fn altitude_deg(&self) -> f64 {
        self.altitude.to_degrees()
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth.to_degrees()
    }

    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.altitude.is_finite() && self.azimuth.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SolarModel {
    /// Julian day, mean anomaly and ecliptic longitude, hour angle from sidereal time.
    #[default]
    Ecliptic,
    /// Declination and equation of time from the day of year, hour angle from local solar time.
    DayOfYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    /// `#87ceeb`
    pub const SKY_BLUE: Rgb = Rgb {
        r: 135.0 / 255.0,
        g: 206.0 / 255.0,
        b: 235.0 / 255.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub ambient_intensity: f64,
    pub sun_color: Rgb,
    pub background_color: Rgb,
}

/// Everything the renderer and the panel engine need from one sun computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sky {
    pub angles: SunAngles,
    /// Simulated sun position in scene space, `sun_distance` away from the origin.
    pub direction: DVec3,
    pub appearance: Appearance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OcclusionResult {
    pub hit: bool,
    /// Distance to the nearest blocking surface, infinite when nothing blocks.
    pub distance: f64,
}

impl OcclusionResult {
    pub fn clear() -> Self {
        Self {
            hit: false,
            distance: f64::INFINITY,
        }
    }

    pub fn blocked(distance: f64) -> Self {
        Self {
            hit: true,
            distance,
        }
    }

    pub fn shadow_factor(&self) -> f64 {
        if self.hit {
            0.0
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(pub usize);

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host-side identifier of a scene object (mesh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Timing handed to the per-frame callback, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    pub delta: f64,
    pub elapsed: f64,
}

impl FrameTime {
    pub fn new(delta: f64, elapsed: f64) -> Self {
        Self { delta, elapsed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OcclusionPolicy {
    /// A failed scene query counts as an unobstructed sun.
    #[default]
    FailOpen,
    /// A failed scene query counts as shadow.
    FailClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppearanceMode {
    /// Ambient intensity only; white sun over a fixed sky blue.
    Simple,
    /// Ambient intensity plus altitude-driven sun and sky colors.
    #[default]
    Rich,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub sun_distance: f64,
    /// Fraction of the remaining rotation a panel closes each frame, in (0, 1].
    pub smoothing: f64,
    /// When set, `smoothing` is the per-frame factor at this frame rate and is rescaled
    /// by each frame's delta time.
    pub reference_frame_rate: Option<f64>,
    pub occlusion_policy: OcclusionPolicy,
    pub horizon_occludes: bool,
    pub ray_bias: f64,
    pub utc_offset_minutes: i32,
    pub solar_model: SolarModel,
    pub appearance_mode: AppearanceMode,
    pub default_location: GeoCoordinate,
    pub panel_up: DVec3,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            sun_distance: 100.0,
            smoothing: 0.1,
            reference_frame_rate: None,
            occlusion_policy: OcclusionPolicy::FailOpen,
            horizon_occludes: true,
            ray_bias: 1e-6,
            utc_offset_minutes: 0,
            solar_model: SolarModel::Ecliptic,
            appearance_mode: AppearanceMode::Rich,
            default_location: GeoCoordinate::default(),
            panel_up: DVec3::Y,
        }
    }
}

impl SimulationConfig {
    pub fn with_sun_distance(mut self, distance: f64) -> Self {
        self.sun_distance = distance;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_reference_frame_rate(mut self, fps: f64) -> Self {
        self.reference_frame_rate = Some(fps);
        self
    }

    pub fn with_occlusion_policy(mut self, policy: OcclusionPolicy) -> Self {
        self.occlusion_policy = policy;
        self
    }

    pub fn with_horizon_occludes(mut self, enabled: bool) -> Self {
        self.horizon_occludes = enabled;
        self
    }

    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    pub fn with_solar_model(mut self, model: SolarModel) -> Self {
        self.solar_model = model;
        self
    }

    pub fn with_appearance_mode(mut self, mode: AppearanceMode) -> Self {
        self.appearance_mode = mode;
        self
    }

    pub fn with_default_location(mut self, location: GeoCoordinate) -> Self {
        self.default_location = location;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));
        if !(self.sun_distance.is_finite() && self.sun_distance > 0.0) {
            return invalid(format!("sun_distance must be positive, got {}", self.sun_distance));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return invalid(format!("smoothing must be in (0, 1], got {}", self.smoothing));
        }
        if let Some(fps) = self.reference_frame_rate {
            if !(fps.is_finite() && fps > 0.0) {
                return invalid(format!("reference_frame_rate must be positive, got {fps}"));
            }
        }
        if !(self.ray_bias.is_finite() && self.ray_bias >= 0.0) {
            return invalid(format!("ray_bias must be non-negative, got {}", self.ray_bias));
        }
        // Real-world offsets span UTC-12:00 to UTC+14:00
        if !(-12 * 60..=14 * 60).contains(&self.utc_offset_minutes) {
            return invalid(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ));
        }
        if !self.panel_up.is_finite() || self.panel_up.length_squared() < 1e-12 {
            return invalid("panel_up must be a non-zero vector".to_string());
        }
        GeoCoordinate::new(self.default_location.latitude, self.default_location.longitude)
            .map_err(|e| SimError::InvalidConfig(format!("default_location: {e}")))?;
        Ok(())
    }
}
