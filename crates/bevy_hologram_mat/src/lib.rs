//! # bevy_hologram_mat
//!
//! A Bevy material extension layering glitch, chroma split, inversion and
//! noise dissolve on top of `StandardMaterial`, with PBR lighting intact.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_hologram_mat::{HologramFx, HologramMaterial, HologramMaterialPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, HologramMaterialPlugin))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<HologramMaterial>>,
//! ) {
//!     let mut material = HologramFx::wrap(&StandardMaterial::from(Color::srgb(0.2, 0.8, 1.0)));
//!     material.extension.uniform.glitch_amount = 0.4;
//!     commands.spawn((
//!         Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
//!         MeshMaterial3d(materials.add(material)),
//!     ));
//! }
//! ```

mod material;

pub use bevy::pbr::{ExtendedMaterial, StandardMaterial};
pub use material::{HologramFlags, HologramFx, HologramFxUniform, HologramMaterial, HologramMaterialPlugin};
