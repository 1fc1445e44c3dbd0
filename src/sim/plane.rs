//! Detected surfaces and the play area
//!
//! Every horizontal plane the host detects becomes a candidate. The one the
//! player taps turns into the lava floor that cubes and fires spawn on.

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layer::{BodyConfig, BodyKind, CollisionLayer, Shape};
use super::state::EntityId;
use super::timer::{Scheduler, TimerEvent};

/// Host handle of a detected surface anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// One measurement of a surface, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMeasurement {
    pub anchor: AnchorId,
    /// Anchor position in world space
    pub origin: Vec3,
    /// Surface center relative to the anchor
    pub center: Vec3,
    /// Width (x) and depth (z)
    pub extent: Vec2,
}

/// Surface look
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceMaterial {
    /// Grid texture shown on candidates
    CandidateGrid,
    /// Lava floor of the selected play area
    LavaFloor,
}

/// A detected surface, candidate or selected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneCandidate {
    pub anchor: AnchorId,
    pub origin: Vec3,
    pub center: Vec3,
    pub extent: Vec2,
    pub material: SurfaceMaterial,
    /// Fire marker floating above the candidate
    pub decorated: bool,
}

impl PlaneCandidate {
    pub fn new(measurement: &SurfaceMeasurement) -> Self {
        Self {
            anchor: measurement.anchor,
            origin: measurement.origin,
            center: measurement.center,
            extent: sanitize_extent(measurement.extent),
            material: SurfaceMaterial::CandidateGrid,
            decorated: true,
        }
    }

    /// Apply a re-measurement and rebuild the collision body
    pub fn update(&mut self, measurement: &SurfaceMeasurement) -> BodyConfig {
        self.origin = measurement.origin;
        self.center = measurement.center;
        self.extent = sanitize_extent(measurement.extent);
        self.body()
    }

    pub fn is_play_area(&self) -> bool {
        self.material == SurfaceMaterial::LavaFloor
    }

    /// One-time switch to play area: lava texture, no marker, spawners running.
    /// Returns false if it already was the play area.
    pub fn select_as_play_area(
        &mut self,
        timers: &mut Scheduler,
        now: u64,
        cube_interval_ticks: u64,
        fire_interval_ticks: u64,
    ) -> bool {
        if self.is_play_area() {
            return false;
        }
        self.material = SurfaceMaterial::LavaFloor;
        self.decorated = false;
        timers.schedule_repeating(now, fire_interval_ticks, TimerEvent::FireSpawner);
        timers.schedule_repeating(now, cube_interval_ticks, TimerEvent::CubeSpawner);
        true
    }

    /// Center of the surface in world space
    pub fn world_center(&self) -> Vec3 {
        self.origin + self.center
    }

    /// Uniform point on the surface, `height` above it
    pub fn random_world_point<R: Rng>(&self, rng: &mut R, height: f32) -> Vec3 {
        let local = random_point_in_extent(rng, self.extent);
        self.world_center() + Vec3::new(local.x, height, local.y)
    }

    pub fn body(&self) -> BodyConfig {
        BodyConfig {
            layer: CollisionLayer::Plane,
            kind: BodyKind::Static,
            shape: Shape::Plane {
                extent: self.extent,
            },
            affected_by_gravity: false,
            impulse: Vec3::ZERO,
        }
    }
}

/// Two independent uniform draws, centered on the surface center:
/// x in [-w/2, w/2], y (depth) in [-d/2, d/2]
pub fn random_point_in_extent<R: Rng>(rng: &mut R, extent: Vec2) -> Vec2 {
    let half = sanitize_extent(extent) / 2.0;
    Vec2::new(
        rng.random_range(-half.x..=half.x),
        rng.random_range(-half.y..=half.y),
    )
}

/// Negative or non-finite measurements collapse to zero
fn sanitize_extent(extent: Vec2) -> Vec2 {
    let clean = |v: f32| if v.is_finite() { v.abs() } else { 0.0 };
    Vec2::new(clean(extent.x), clean(extent.y))
}

/// Cosmetic fire burning on the play area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbientFire {
    pub id: EntityId,
    pub pos: Vec3,
    pub lifetime_ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn measurement(extent: Vec2) -> SurfaceMeasurement {
        SurfaceMeasurement {
            anchor: AnchorId(7),
            origin: Vec3::new(1.0, -0.5, 2.0),
            center: Vec3::new(0.25, 0.0, -0.25),
            extent,
        }
    }

    #[test]
    fn test_update_rebuilds_body() {
        let mut plane = PlaneCandidate::new(&measurement(Vec2::new(0.5, 0.5)));
        let body = plane.update(&measurement(Vec2::new(2.0, 1.5)));
        assert_eq!(plane.extent, Vec2::new(2.0, 1.5));
        assert_eq!(
            body.shape,
            Shape::Plane {
                extent: Vec2::new(2.0, 1.5)
            }
        );
        assert_eq!(body.kind, BodyKind::Static);
    }

    #[test]
    fn test_select_once() {
        let mut timers = Scheduler::new();
        let mut plane = PlaneCandidate::new(&measurement(Vec2::ONE));
        assert!(plane.decorated);

        assert!(plane.select_as_play_area(&mut timers, 0, 240, 240));
        assert_eq!(plane.material, SurfaceMaterial::LavaFloor);
        assert!(!plane.decorated);
        assert_eq!(timers.len(), 2);

        assert!(!plane.select_as_play_area(&mut timers, 5, 240, 240));
        assert_eq!(timers.len(), 2);
    }

    #[test]
    fn test_world_point_on_surface() {
        let mut rng = Pcg32::seed_from_u64(3);
        let plane = PlaneCandidate::new(&measurement(Vec2::new(2.0, 1.5)));
        let center = plane.world_center();
        for _ in 0..200 {
            let p = plane.random_world_point(&mut rng, 0.8);
            assert!((p.x - center.x).abs() <= 1.0 + 1e-6);
            assert!((p.z - center.z).abs() <= 0.75 + 1e-6);
            assert!((p.y - (center.y + 0.8)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_extent() {
        let mut rng = Pcg32::seed_from_u64(1);
        let p = random_point_in_extent(&mut rng, Vec2::new(0.0, f32::NAN));
        assert_eq!(p, Vec2::ZERO);
        let p = random_point_in_extent(&mut rng, Vec2::new(-2.0, 0.0));
        assert!(p.x.abs() <= 1.0);
    }
}
