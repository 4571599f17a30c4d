//! Burst description and the pure planning step.
//!
//! Planning turns a [`SpawnFragments`] request into a list of
//! [`FragmentSpec`]s without touching the world, so the sampling rules can be
//! checked without a physics backend.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of hue buckets used by [`FragmentColor::RandomHue`].
///
/// Random colors are snapped to a bucket so the material cache stays bounded.
pub const HUE_BUCKETS: u32 = 24;

/// World-space box fragments are sampled from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceBounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl SourceBounds {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    /// A zero-volume box at `center`.
    pub fn point(center: Vec3) -> Self {
        Self::new(center, Vec3::ZERO)
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
    }

    /// Uniform sample inside the box.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Vec3 {
        let x = (rng.f32() * 2.0 - 1.0) * self.half_extents.x;
        let y = (rng.f32() * 2.0 - 1.0) * self.half_extents.y;
        let z = (rng.f32() * 2.0 - 1.0) * self.half_extents.z;
        self.center + Vec3::new(x, y, z)
    }
}

/// Physical tunables shared by every fragment of a burst.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentConfig {
    /// Uniform edge length of each cube
    pub scale: f32,
    pub mass: f32,
    /// Impulse magnitude applied along the outward direction
    pub explosion_force: f32,
    /// Linear damping (air resistance)
    pub drag: f32,
    pub gravity_scale: f32,
    /// Base time-to-live in seconds
    pub lifetime: f32,
    /// Upper bound of the random extra time-to-live
    pub lifetime_jitter: f32,
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            scale: 0.08,
            mass: 0.05,
            explosion_force: 0.3,
            drag: 0.5,
            gravity_scale: 1.0,
            lifetime: 3.0,
            lifetime_jitter: 1.0,
        }
    }
}

/// How fragments are colored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FragmentColor {
    /// Every fragment takes the source object's color
    Inherit(Color),
    /// Each fragment gets a random, fully saturated hue
    RandomHue,
}

impl Default for FragmentColor {
    fn default() -> Self {
        Self::Inherit(Color::WHITE)
    }
}

/// Request to spawn a batch of debris bodies.
///
/// Fire-and-forget: nothing is returned and the spawned bodies remove
/// themselves when their lifetime runs out.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct SpawnFragments {
    pub count: u32,
    pub bounds: SourceBounds,
    pub color: FragmentColor,
    pub config: FragmentConfig,
}

/// Everything needed to create one fragment body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentSpec {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub color: Color,
    pub mass: f32,
    /// Unit direction times the configured explosion force
    pub impulse: Vec3,
    pub lifetime: f32,
}

impl FragmentSpec {
    /// Velocity change produced by applying [`Self::impulse`] to a body of [`Self::mass`].
    pub fn initial_velocity(&self) -> Vec3 {
        self.impulse / self.mass.max(1e-4)
    }
}

/// Plans one fragment per `count`, sampling positions inside `bounds` and
/// pushing each one away from the bounds center.
pub fn plan_burst(burst: &SpawnFragments, rng: &mut fastrand::Rng) -> Vec<FragmentSpec> {
    let config = &burst.config;
    (0..burst.count)
        .map(|_| {
            let position = burst.bounds.sample(rng);
            let offset = position - burst.bounds.center;
            // Degenerate offsets (flat or zero-volume bounds) fall back to a random direction.
            let direction = if offset.length_squared() > 1e-8 {
                offset.normalize()
            } else {
                random_unit_sphere(rng)
            };
            let color = match burst.color {
                FragmentColor::Inherit(color) => color,
                FragmentColor::RandomHue => random_hue(rng),
            };
            FragmentSpec {
                position,
                rotation: random_quat(rng),
                scale: config.scale,
                color,
                mass: config.mass,
                impulse: direction * config.explosion_force,
                lifetime: config.lifetime + rng.f32() * config.lifetime_jitter.max(0.0),
            }
        })
        .collect()
}

fn random_hue(rng: &mut fastrand::Rng) -> Color {
    let bucket = rng.u32(0..HUE_BUCKETS);
    Color::hsv(bucket as f32 / HUE_BUCKETS as f32 * 360.0, 0.9, 1.0)
}

fn random_unit_sphere(rng: &mut fastrand::Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 0.001 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

fn random_quat(rng: &mut fastrand::Rng) -> Quat {
    loop {
        let q = Quat::from_xyzw(
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
        );
        if q.length_squared() > 0.001 {
            return q.normalize();
        }
    }
}
