//! Per-frame panel tracking and efficiency.
//!
//! Each frame a panel turns a fixed fraction of the way toward the sun, then scores
//! `max(0, toSun · up) × shadow` with `up` taken from its new orientation.

use glam::{DQuat, DVec3};

use crate::occlusion::{query_occlusion, Candidates, OcclusionQuery, Ray, RayCaster};
use crate::types::{FrameTime, Hsl, ObjectId, OcclusionResult, PanelId, Rgb, SimulationConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub position: DVec3,
    pub orientation: DQuat,
    pub efficiency: f64,
    /// Host mesh of this panel, skipped by its own occlusion ray.
    pub mesh: Option<ObjectId>,
}

impl Panel {
    pub fn new(id: PanelId, position: DVec3) -> Self {
        Self {
            id,
            position,
            orientation: DQuat::IDENTITY,
            efficiency: 0.0,
            mesh: None,
        }
    }

    pub fn with_orientation(mut self, orientation: DQuat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    pub fn up(&self, reference_up: DVec3) -> DVec3 {
        self.orientation * unit_or_y(reference_up)
    }

    pub fn material_color(&self) -> Rgb {
        Hsl::new(0.3, 1.0, 0.5 + 0.5 * self.efficiency).to_rgb()
    }

    pub fn efficiency_label(&self) -> String {
        format!("Efficiency: {:.2}%", self.efficiency * 100.0)
    }
}

/// Degenerate reference axes fall back to +Y.
fn unit_or_y(v: DVec3) -> DVec3 {
    v.try_normalize().unwrap_or(DVec3::Y)
}

/// What one frame computed for one panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSample {
    pub to_sun: DVec3,
    pub occlusion: OcclusionResult,
    pub alignment: f64,
    pub efficiency: f64,
}

/// Fraction of the remaining rotation to close this frame.
pub fn smoothing_factor(config: &SimulationConfig, time: FrameTime) -> f64 {
    match config.reference_frame_rate {
        Some(fps) if time.delta.is_finite() && time.delta > 0.0 => {
            1.0 - (1.0 - config.smoothing).powf(time.delta * fps)
        }
        _ => config.smoothing,
    }
    .clamp(0.0, 1.0)
}

/// Rotation taking `reference_up` onto `to_sun`. Both must be unit length.
pub fn target_orientation(reference_up: DVec3, to_sun: DVec3) -> DQuat {
    DQuat::from_rotation_arc(reference_up, to_sun)
}

pub fn alignment(to_sun: DVec3, up: DVec3) -> f64 {
    to_sun.dot(up).clamp(0.0, 1.0)
}

pub fn efficiency(alignment: f64, shadow_factor: f64) -> f64 {
    (alignment * shadow_factor).clamp(0.0, 1.0)
}

/// Advances one panel by one frame. `sun` is the simulated sun position.
pub fn update_panel<S: RayCaster + ?Sized>(
    panel: &mut Panel,
    sun: DVec3,
    scene: &S,
    config: &SimulationConfig,
    time: FrameTime,
) -> PanelSample {
    let reference_up = unit_or_y(config.panel_up);

    let Some(ray) = Ray::from_points(panel.position, sun) else {
        // Panel sits on the sun itself; nothing to aim at
        panel.efficiency = 0.0;
        return PanelSample {
            to_sun: DVec3::ZERO,
            occlusion: OcclusionResult::clear(),
            alignment: 0.0,
            efficiency: 0.0,
        };
    };
    let to_sun = ray.direction;

    let target = target_orientation(reference_up, to_sun);
    panel.orientation = panel
        .orientation
        .slerp(target, smoothing_factor(config, time))
        .normalize();

    let occlusion = if config.horizon_occludes && sun.y <= 0.0 {
        OcclusionResult::blocked(0.0)
    } else {
        let candidates = match panel.mesh {
            Some(mesh) => Candidates::Excluding(mesh),
            None => Candidates::All,
        };
        query_occlusion(
            scene,
            &OcclusionQuery {
                ray,
                sun_distance: panel.position.distance(sun),
                bias: config.ray_bias,
                candidates,
                policy: config.occlusion_policy,
            },
        )
    };

    let alignment = alignment(to_sun, panel.up(reference_up));
    let efficiency = efficiency(alignment, occlusion.shadow_factor());
    panel.efficiency = efficiency;

    log::trace!(
        "panel {} alignment {:.4} shadowed {} efficiency {:.4}",
        panel.id,
        alignment,
        occlusion.hit,
        efficiency
    );

    PanelSample {
        to_sun,
        occlusion,
        alignment,
        efficiency,
    }
}
