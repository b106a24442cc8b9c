pub mod angles;
pub mod appearance;
pub mod driver;
pub mod error;
pub mod occlusion;
pub mod panel;
pub mod render;
pub mod scene;
pub mod types;

pub use angles::{
    day_of_year_angles, ecliptic_angles, horizontal_angles, julian_day, sun_angles,
    sun_angles_with,
};

pub use appearance::{
    ambient_intensity, appearance, normalized_altitude, sun_direction, to_scene, MIN_AMBIENT,
};

pub use driver::{compute_sky, parse_date, parse_degrees, parse_time, LocationSource, Simulation};

pub use error::{Result, SimError};

pub use occlusion::{query_occlusion, Candidates, OcclusionQuery, Ray, RayCaster, RayHit};

pub use panel::{alignment, efficiency, smoothing_factor, update_panel, Panel, PanelSample};

pub use render::RenderSink;

pub use scene::{compass_markers, BoxScene, Compass, SceneObject, Shape};

pub use types::{
    Appearance, AppearanceMode, Axis, FrameTime, GeoCoordinate, Hsl, ObjectId, OcclusionPolicy,
    OcclusionResult, PanelId, Rgb, SimulationConfig, Sky, SolarModel, SunAngles,
};

pub use glam::{DQuat, DVec3};
