//! # bevy_fragments
//!
//! Fire-and-forget debris bursts for Bevy + Avian3D.
//!
//! Write a [`SpawnFragments`] message and the plugin spawns `count` small
//! dynamic cubes inside the given bounds, each pushed outward from the bounds
//! center and despawned after its own randomized lifetime. Nothing tracks the
//! fragments after they are spawned.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_fragments::{FragmentColor, FragmentConfig, FragmentsPlugin, SourceBounds, SpawnFragments};
//!
//! fn explode(mut bursts: MessageWriter<SpawnFragments>) {
//!     bursts.write(SpawnFragments {
//!         count: 40,
//!         bounds: SourceBounds::new(Vec3::Y, Vec3::splat(0.5)),
//!         color: FragmentColor::RandomHue,
//!         config: FragmentConfig::default(),
//!     });
//! }
//! ```

pub mod burst;
pub mod spawn;

pub use burst::{
    FragmentColor, FragmentConfig, FragmentSpec, HUE_BUCKETS, SourceBounds, SpawnFragments,
    plan_burst,
};
pub use spawn::{Fragment, FragmentAssets, FragmentLifetime, FragmentRng};

use bevy::prelude::*;

/// System set for fragment spawning and expiry, for ordering against callers.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FragmentSystems;

/// Registers the [`SpawnFragments`] message and the spawn/expire systems.
///
/// Expects Avian's `PhysicsPlugins` to be added by the application.
pub struct FragmentsPlugin;

impl Plugin for FragmentsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SpawnFragments>()
            .init_resource::<FragmentRng>()
            .init_resource::<FragmentAssets>()
            .add_systems(
                Update,
                (spawn::spawn_fragments, spawn::expire_fragments).in_set(FragmentSystems),
            );
    }
}
