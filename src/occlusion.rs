//! Occlusion queries against a host-provided scene.

use glam::DVec3;

use crate::error::Result;
use crate::types::{ObjectId, OcclusionPolicy, OcclusionResult};

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Normalizes `direction`. Returns `None` for a zero or non-finite direction.
    pub fn new(origin: DVec3, direction: DVec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        origin.is_finite().then_some(Self { origin, direction })
    }

    pub fn from_points(origin: DVec3, target: DVec3) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    pub fn point_at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f64,
    pub point: DVec3,
    pub object: ObjectId,
}

/// Restricts which scene objects a ray is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Candidates<'a> {
    #[default]
    All,
    Only(&'a [ObjectId]),
    Excluding(ObjectId),
}

impl Candidates<'_> {
    pub fn admits(&self, object: ObjectId) -> bool {
        match self {
            Candidates::All => true,
            Candidates::Only(ids) => ids.contains(&object),
            Candidates::Excluding(id) => *id != object,
        }
    }
}

/// The scene's ray-intersection capability.
pub trait RayCaster {
    /// All hits along `ray`, ordered by increasing distance.
    fn intersect(&self, ray: &Ray, candidates: Candidates<'_>) -> Result<Vec<RayHit>>;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn intersect(&self, ray: &Ray, candidates: Candidates<'_>) -> Result<Vec<RayHit>> {
        (**self).intersect(ray, candidates)
    }
}

/// Parameters of one occlusion query.
#[derive(Debug, Clone, Copy)]
pub struct OcclusionQuery<'a> {
    pub ray: Ray,
    /// Distance from the ray origin to the simulated sun position.
    pub sun_distance: f64,
    /// Hits nearer than this are treated as the query's own surface.
    pub bias: f64,
    pub candidates: Candidates<'a>,
    pub policy: OcclusionPolicy,
}

/// Nearest-hit occlusion test. Only hits between `bias` and the sun count; a failed
/// query resolves through the policy.
pub fn query_occlusion<S: RayCaster + ?Sized>(scene: &S, query: &OcclusionQuery<'_>) -> OcclusionResult {
    let hits = match scene.intersect(&query.ray, query.candidates) {
        Ok(hits) => hits,
        Err(e) => {
            log::warn!("occlusion query failed ({e}), applying {:?}", query.policy);
            return match query.policy {
                OcclusionPolicy::FailOpen => OcclusionResult::clear(),
                OcclusionPolicy::FailClosed => OcclusionResult::blocked(0.0),
            };
        }
    };

    let nearest = hits
        .iter()
        .map(|hit| hit.distance)
        .filter(|d| d.is_finite() && *d > query.bias)
        .fold(f64::INFINITY, f64::min);

    if nearest < query.sun_distance {
        OcclusionResult::blocked(nearest)
    } else {
        OcclusionResult::clear()
    }
}
