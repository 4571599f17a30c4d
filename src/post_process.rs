//! The one piece of global state effects touch: a chromatic-aberration
//! intensity shared by every camera.

use bevy::post_process::effect_stack::ChromaticAberration;
use bevy::prelude::*;

use crate::{HologramFxSystems, configure_sets};

/// Shared post-process intensity, mirrored onto every camera's
/// [`ChromaticAberration`].
///
/// Writers save the value with [`capture`](Self::capture) before modifying it
/// and hand the token back to [`restore`](Self::restore) when done. Two
/// overlapping writers are last-writer-wins.
///
/// The default value adopts the intensity of the first camera seen, so a
/// camera's own setting is the baseline effects restore to.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PostProcessOverride {
    intensity: f32,
    baseline_known: bool,
}

impl Default for PostProcessOverride {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            baseline_known: false,
        }
    }
}

/// Saved intensity returned by [`PostProcessOverride::capture`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityToken {
    value: f32,
}

impl IntensityToken {
    pub fn value(&self) -> f32 {
        self.value
    }
}

impl PostProcessOverride {
    /// Start from an explicit baseline instead of a camera's.
    pub fn new(intensity: f32) -> Self {
        Self {
            intensity: intensity.max(0.0),
            baseline_known: true,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
        self.baseline_known = true;
    }

    pub fn capture(&self) -> IntensityToken {
        IntensityToken {
            value: self.intensity,
        }
    }

    /// Put back exactly the captured value.
    pub fn restore(&mut self, token: IntensityToken) {
        self.intensity = token.value;
    }
}

/// Take the first camera's intensity as the shared value without marking the
/// resource changed, so nothing is written back to the cameras.
fn adopt_camera_baseline(
    mut post_process: ResMut<PostProcessOverride>,
    added: Query<&ChromaticAberration, Added<ChromaticAberration>>,
) {
    if post_process.baseline_known {
        return;
    }
    let Some(aberration) = added.iter().next() else {
        return;
    };
    let post_process = post_process.bypass_change_detection();
    post_process.intensity = aberration.intensity.max(0.0);
    post_process.baseline_known = true;
    debug!(
        "Chromatic aberration baseline adopted from camera: {}",
        post_process.intensity
    );
}

fn sync_chromatic_aberration(
    post_process: Res<PostProcessOverride>,
    mut cameras: Query<&mut ChromaticAberration>,
) {
    // Inserting the resource is not a write.
    if !post_process.is_changed() || post_process.is_added() {
        return;
    }
    for mut aberration in &mut cameras {
        aberration.intensity = post_process.intensity();
    }
}

/// Keeps camera chromatic aberration in step with [`PostProcessOverride`].
pub struct PostProcessPlugin;

impl Plugin for PostProcessPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);
        app.init_resource::<PostProcessOverride>().add_systems(
            Update,
            (
                adopt_camera_baseline.before(HologramFxSystems::Mode),
                sync_chromatic_aberration.after(HologramFxSystems::Apply),
            ),
        );
    }
}
