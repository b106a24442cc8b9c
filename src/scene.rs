//! A minimal ray-castable scene of boxes over a ground plane.
//!
//! Surfaces are single-sided: a ray starting inside a box, or below the ground,
//! passes through it.

use glam::DVec3;

use crate::error::Result;
use crate::occlusion::{Candidates, Ray, RayCaster, RayHit};
use crate::types::ObjectId;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by its center and full extents.
    Cuboid { center: DVec3, size: DVec3 },
    /// Horizontal square facing +Y.
    Ground { center: DVec3, size: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Shape,
}

#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    objects: Vec<SceneObject>,
    next_id: u64,
}

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Three buildings of different heights on a 10×10 lot.
    pub fn toy_city() -> Self {
        let mut scene = Self::new();
        scene.add_cuboid(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 2.0, 1.0));
        scene.add_cuboid(DVec3::new(2.0, 0.0, 2.0), DVec3::new(1.0, 3.0, 1.0));
        scene.add_cuboid(DVec3::new(-2.0, 0.0, -2.0), DVec3::new(1.0, 1.5, 1.0));
        scene.add_ground(DVec3::new(0.0, -0.5, 0.0), 10.0);
        scene
    }

    pub fn add_cuboid(&mut self, center: DVec3, size: DVec3) -> ObjectId {
        self.push(Shape::Cuboid { center, size })
    }

    pub fn add_ground(&mut self, center: DVec3, size: f64) -> ObjectId {
        self.push(Shape::Ground { center, size })
    }

    fn push(&mut self, shape: Shape) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(SceneObject { id, shape });
        id
    }

    /// Where a downward pick ray at (`x`, `z`) first touches the scene.
    pub fn pick(&self, x: f64, z: f64) -> Option<DVec3> {
        let top = self
            .objects
            .iter()
            .map(|o| match o.shape {
                Shape::Cuboid { center, size } => center.y + size.y * 0.5,
                Shape::Ground { center, .. } => center.y,
            })
            .fold(0.0, f64::max);
        let ray = Ray::new(DVec3::new(x, top + 1.0, z), DVec3::NEG_Y)?;
        self.hits(&ray, Candidates::All).first().map(|h| h.point)
    }

    fn hits(&self, ray: &Ray, candidates: Candidates<'_>) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = self
            .objects
            .iter()
            .filter(|o| candidates.admits(o.id))
            .filter_map(|o| {
                let t = match o.shape {
                    Shape::Cuboid { center, size } => {
                        intersect_cuboid(ray, center - size * 0.5, center + size * 0.5)
                    }
                    Shape::Ground { center, size } => intersect_ground(ray, center, size),
                }?;
                Some(RayHit {
                    distance: t,
                    point: ray.point_at(t),
                    object: o.id,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl RayCaster for BoxScene {
    fn intersect(&self, ray: &Ray, candidates: Candidates<'_>) -> Result<Vec<RayHit>> {
        Ok(self.hits(ray, candidates))
    }
}

/// Slab test. Returns the entry distance of a ray that starts outside the box.
fn intersect_cuboid(ray: &Ray, min: DVec3, max: DVec3) -> Option<f64> {
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;

    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < EPS {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - o) / d;
        let t2 = (max[axis] - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
        if t_near > t_far {
            return None;
        }
    }

    (t_near > EPS).then_some(t_near)
}

fn intersect_ground(ray: &Ray, center: DVec3, size: f64) -> Option<f64> {
    // Back faces are not hit
    if ray.direction.y > -EPS {
        return None;
    }
    let t = (center.y - ray.origin.y) / ray.direction.y;
    if t <= EPS {
        return None;
    }
    let p = ray.point_at(t);
    let half = size * 0.5;
    ((p.x - center.x).abs() <= half && (p.z - center.z).abs() <= half).then_some(t)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    pub const ALL: [Compass; 4] = [Compass::North, Compass::East, Compass::South, Compass::West];

    pub fn label(self) -> &'static str {
        match self {
            Compass::North => "N",
            Compass::East => "E",
            Compass::South => "S",
            Compass::West => "W",
        }
    }

    pub fn direction(self) -> DVec3 {
        match self {
            Compass::North => DVec3::Z,
            Compass::East => DVec3::X,
            Compass::South => DVec3::NEG_Z,
            Compass::West => DVec3::NEG_X,
        }
    }
}

/// Label anchor points around the lot, `radius` from the origin at `height`.
pub fn compass_markers(radius: f64, height: f64) -> [(Compass, DVec3); 4] {
    Compass::ALL.map(|c| (c, c.direction() * radius + DVec3::Y * height))
}
