//! Demo helpers: an orbiting camera and a one-at-a-time object carousel.

pub mod cycle;
pub mod orbit;

use bevy::prelude::*;

pub use cycle::SelectionCycle;
pub use orbit::OrbitCamera;

pub struct ShowcasePlugin;

impl Plugin for ShowcasePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (orbit::orbit_cameras, cycle::cycle_selection));
    }
}
