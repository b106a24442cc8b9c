//! Simulation state: the current date, time and location, the derived sky, and the
//! placed panels.
//!
//! Every accepted edit recomputes the sky immediately, so the next [`Simulation::frame`]
//! sees it. Rejected edits leave all state untouched.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use glam::DVec3;

use crate::angles::sun_angles_with;
use crate::appearance::to_scene;
use crate::error::{Result, SimError};
use crate::occlusion::RayCaster;
use crate::panel::{update_panel, Panel};
use crate::render::{self, RenderSink};
use crate::types::{
    check_degrees, Axis, FrameTime, GeoCoordinate, ObjectId, PanelId, SimulationConfig, Sky,
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Who last wrote the location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationSource {
    Default,
    /// At least one coordinate came from a device fix.
    Geolocated,
    /// Set once the user edits either coordinate; geolocation is ignored from then on.
    User,
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| SimError::InvalidDate(input.to_string()))
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input_trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(input_trimmed, fmt).ok())
        .ok_or_else(|| SimError::InvalidTime(input.to_string()))
}

pub fn parse_degrees(axis: Axis, input: &str) -> Result<f64> {
    let value: f64 = input.trim().parse().map_err(|_| SimError::NonNumeric {
        axis,
        input: input.to_string(),
    })?;
    check_degrees(axis, value)
}

/// Coordinates already supplied by geolocation. Each is written at most once.
#[derive(Debug, Clone, Copy, Default)]
struct SeededFields {
    latitude: bool,
    longitude: bool,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    date: NaiveDate,
    time: NaiveTime,
    location: GeoCoordinate,
    location_source: LocationSource,
    seeded: SeededFields,
    sky: Sky,
    panels: Vec<Panel>,
    frames: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig, date: NaiveDate, time: NaiveTime) -> Result<Self> {
        config.validate()?;
        let offset = utc_offset(&config)?;
        let location = config.default_location;
        let instant = local_instant(offset, date, time)?;
        let sky = compute_sky(&config, &instant, location);
        if !sky.angles.is_finite() {
            return Err(SimError::InvalidConfig(
                "initial sun position is not finite".to_string(),
            ));
        }
        log::debug!(
            "simulation starts at {instant} ({}, {})",
            location.latitude,
            location.longitude
        );
        Ok(Self {
            config,
            date,
            time,
            location,
            location_source: LocationSource::Default,
            seeded: SeededFields::default(),
            sky,
            panels: Vec::new(),
            frames: 0,
        })
    }

    pub fn from_inputs(config: SimulationConfig, date: &str, time: &str) -> Result<Self> {
        Self::new(config, parse_date(date)?, parse_time(time)?)
    }

    /// Starts at the wall-clock time, read in the configured UTC offset.
    pub fn starting_now(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let now = Utc::now().with_timezone(&utc_offset(&config)?);
        Self::new(config, now.date_naive(), now.time())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn location(&self) -> GeoCoordinate {
        self.location
    }

    pub fn location_source(&self) -> LocationSource {
        self.location_source
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.0)
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn instant(&self) -> Result<DateTime<FixedOffset>> {
        local_instant(utc_offset(&self.config)?, self.date, self.time)
    }

    // ── Edits ──

    pub fn set_date(&mut self, input: &str) -> Result<()> {
        let date = parse_date(input).inspect_err(|e| log::warn!("rejected date edit: {e}"))?;
        self.apply_instant(date, self.time)
    }

    pub fn set_time(&mut self, input: &str) -> Result<()> {
        let time = parse_time(input).inspect_err(|e| log::warn!("rejected time edit: {e}"))?;
        self.apply_instant(self.date, time)
    }

    /// Jumps to `instant`, expressed in the configured UTC offset.
    pub fn set_instant<Tz: TimeZone>(&mut self, instant: &DateTime<Tz>) -> Result<()> {
        let local = instant.with_timezone(&utc_offset(&self.config)?);
        self.apply_instant(local.date_naive(), local.time())
    }

    pub fn set_latitude(&mut self, degrees: f64) -> Result<()> {
        let latitude = check_degrees(Axis::Latitude, degrees)
            .inspect_err(|e| log::warn!("rejected latitude edit: {e}"))?;
        self.apply_user_location(GeoCoordinate {
            latitude,
            ..self.location
        })
    }

    pub fn set_longitude(&mut self, degrees: f64) -> Result<()> {
        let longitude = check_degrees(Axis::Longitude, degrees)
            .inspect_err(|e| log::warn!("rejected longitude edit: {e}"))?;
        self.apply_user_location(GeoCoordinate {
            longitude,
            ..self.location
        })
    }

    /// Latitude edit straight from a text field.
    pub fn set_latitude_input(&mut self, input: &str) -> Result<()> {
        let degrees = parse_degrees(Axis::Latitude, input)
            .inspect_err(|e| log::warn!("rejected latitude edit: {e}"))?;
        self.set_latitude(degrees)
    }

    pub fn set_longitude_input(&mut self, input: &str) -> Result<()> {
        let degrees = parse_degrees(Axis::Longitude, input)
            .inspect_err(|e| log::warn!("rejected longitude edit: {e}"))?;
        self.set_longitude(degrees)
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> Result<()> {
        let location = GeoCoordinate::new(latitude, longitude)
            .inspect_err(|e| log::warn!("rejected location edit: {e}"))?;
        self.apply_user_location(location)
    }

    // ── Geolocation ──

    /// Applies a device fix once, and only while neither coordinate has been provided.
    /// Returns whether the fix was applied.
    pub fn seed_geolocation(&mut self, latitude: f64, longitude: f64) -> bool {
        if self.seeded.latitude || self.seeded.longitude {
            log::debug!("geolocation ignored, location already seeded");
            return false;
        }
        let applied = self.seed(|_| GeoCoordinate::new(latitude, longitude));
        if applied {
            self.seeded = SeededFields {
                latitude: true,
                longitude: true,
            };
        }
        applied
    }

    /// Latitude half of a split fix. Applies only if no latitude was seeded before.
    pub fn seed_latitude(&mut self, latitude: f64) -> bool {
        if self.seeded.latitude {
            log::debug!("geolocated latitude ignored, already seeded");
            return false;
        }
        let applied = self.seed(|loc| {
            Ok(GeoCoordinate {
                latitude: check_degrees(Axis::Latitude, latitude)?,
                ..loc
            })
        });
        self.seeded.latitude |= applied;
        applied
    }

    pub fn seed_longitude(&mut self, longitude: f64) -> bool {
        if self.seeded.longitude {
            log::debug!("geolocated longitude ignored, already seeded");
            return false;
        }
        let applied = self.seed(|loc| {
            Ok(GeoCoordinate {
                longitude: check_degrees(Axis::Longitude, longitude)?,
                ..loc
            })
        });
        self.seeded.longitude |= applied;
        applied
    }

    fn seed<F>(&mut self, update: F) -> bool
    where
        F: FnOnce(GeoCoordinate) -> Result<GeoCoordinate>,
    {
        if self.location_source == LocationSource::User {
            log::debug!("geolocation ignored, location was set by the user");
            return false;
        }
        let applied = update(self.location).and_then(|location| {
            let sky = self.sky_for(self.date, self.time, location)?;
            Ok((location, sky))
        });
        match applied {
            Ok((location, sky)) => {
                log::debug!(
                    "geolocation applied ({}, {})",
                    location.latitude,
                    location.longitude
                );
                self.location = location;
                self.location_source = LocationSource::Geolocated;
                self.sky = sky;
                true
            }
            Err(e) => {
                log::warn!("geolocation ignored: {e}");
                false
            }
        }
    }

    // ── Panels ──

    /// Places a panel at a picked ground point, untilted and at zero efficiency.
    pub fn place_panel(&mut self, point: DVec3) -> Result<PanelId> {
        if !point.is_finite() {
            return Err(SimError::InvalidPlacement);
        }
        let id = PanelId(self.panels.len());
        self.panels.push(Panel::new(id, point));
        log::info!("placed panel {id} at {point}");
        Ok(id)
    }

    pub fn bind_panel_mesh(&mut self, id: PanelId, mesh: ObjectId) -> Result<()> {
        let panel = self
            .panels
            .get_mut(id.0)
            .ok_or(SimError::UnknownPanel(id))?;
        panel.mesh = Some(mesh);
        Ok(())
    }

    // ── Frame loop ──

    /// Per-frame callback: re-aims and re-scores every panel against the current sky.
    pub fn frame<S: RayCaster + ?Sized>(&mut self, time: FrameTime, scene: &S) -> &[Panel] {
        let sun = self.sky.direction;
        for panel in &mut self.panels {
            update_panel(panel, sun, scene, &self.config, time);
        }
        self.frames += 1;
        &self.panels
    }

    pub fn present<R: RenderSink + ?Sized>(&self, sink: &mut R) {
        render::present(sink, &self.sky, &self.panels);
    }

    // ── Internals ──

    fn apply_instant(&mut self, date: NaiveDate, time: NaiveTime) -> Result<()> {
        let sky = self
            .sky_for(date, time, self.location)
            .inspect_err(|e| log::warn!("rejected instant edit: {e}"))?;
        self.date = date;
        self.time = time;
        self.sky = sky;
        Ok(())
    }

    fn apply_user_location(&mut self, location: GeoCoordinate) -> Result<()> {
        let sky = self
            .sky_for(self.date, self.time, location)
            .inspect_err(|e| log::warn!("rejected location edit: {e}"))?;
        self.location = location;
        self.location_source = LocationSource::User;
        self.sky = sky;
        Ok(())
    }

    /// Sky for candidate inputs. Callers store the inputs only when this succeeds.
    fn sky_for(&self, date: NaiveDate, time: NaiveTime, location: GeoCoordinate) -> Result<Sky> {
        let instant = local_instant(utc_offset(&self.config)?, date, time)?;
        let sky = compute_sky(&self.config, &instant, location);
        if !sky.angles.is_finite() || !sky.direction.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "sun position is not finite at {instant}"
            )));
        }
        log::debug!(
            "sky at {instant}: altitude {:.2}° azimuth {:.2}° ambient {:.3}",
            sky.angles.altitude_deg(),
            sky.angles.azimuth_deg(),
            sky.appearance.ambient_intensity
        );
        Ok(sky)
    }
}

fn utc_offset(config: &SimulationConfig) -> Result<FixedOffset> {
    FixedOffset::east_opt(config.utc_offset_minutes * 60).ok_or_else(|| {
        SimError::InvalidConfig(format!(
            "utc_offset_minutes out of range: {}",
            config.utc_offset_minutes
        ))
    })
}

fn local_instant(
    offset: FixedOffset,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::new(date, time);
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| SimError::InvalidDate(naive.to_string()))
}

/// Sky for `instant` at `location`: angles, then scene position and colors.
pub fn compute_sky<Tz: TimeZone>(
    config: &SimulationConfig,
    instant: &DateTime<Tz>,
    location: GeoCoordinate,
) -> Sky {
    let angles = sun_angles_with(
        config.solar_model,
        instant,
        location.latitude,
        location.longitude,
    );
    to_scene(&angles, config.sun_distance, config.appearance_mode)
}
