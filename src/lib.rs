//! # Bevy Hologram FX
//!
//! Point at objects, hover to make them glitch, click or press keys to fire
//! one-shot and toggled effects: noise dissolves that end in a burst of
//! physics fragments, chromatic-aberration pulses, hue cycling, inversion.
//!
//! ## Quick Start
//!
//! ```no_run
//! use avian3d::prelude::*;
//! use bevy::prelude::*;
//! use bevy_hologram_fx::HologramFxPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PhysicsPlugins::default())
//!         .add_plugins(HologramFxPlugin::default())
//!         .run();
//! }
//! ```
//!
//! ## Making Entities Interactive
//!
//! Give the camera an [`InteractionCamera`] and give objects a collider.
//! Objects with an [`EffectHandle`] use that effect; anything else that gets
//! hovered receives the configured default (a highlight):
//!
//! ```ignore
//! commands.spawn((
//!     Name::new("Crate"),
//!     Mesh3d(mesh),
//!     MeshMaterial3d(material),
//!     Collider::cuboid(1.0, 1.0, 1.0),
//!     EffectHandle::from_kind(EffectKind::Disintegrate, &config),
//! ));
//! ```
//!
//! ## Controls
//!
//! - `M` toggles interaction mode (cursor shown, hover tracking on)
//! - Left click: click + interact on the hovered object
//! - Right click, `N`, `B`: secondary toggles
//!
//! Bindings and every effect tunable live in `assets/hologram_fx.ron`.

pub mod config;
pub mod effects;
pub mod hud;
pub mod interaction;
pub mod post_process;
pub mod showcase;

use std::path::PathBuf;

use bevy::prelude::*;
use bevy_fragments::{FragmentSystems, FragmentsPlugin};
use bevy_hologram_mat::HologramMaterialPlugin;

pub use config::{ConfigError, FxConfig, InteractionConfig};
pub use effects::{
    EffectFrame, EffectHandle, EffectKey, EffectKind, EffectPhase, EffectRegistry, EffectsPlugin,
};
pub use interaction::{
    AimRay, AimSource, AimTarget, DispatcherPlugin, InteractionCamera, InteractionDispatcher,
    InteractionEvent, InteractionIgnored, InteractionKind, InteractionMode, TargetResolverPlugin,
};
pub use post_process::{PostProcessOverride, PostProcessPlugin};
pub use showcase::{OrbitCamera, SelectionCycle, ShowcasePlugin};

/// Per-frame ordering of the interaction pipeline, all in `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HologramFxSystems {
    /// Interaction mode toggle
    Mode,
    /// Aim ray from the interaction camera
    Aim,
    /// Raycast into the physics world
    Resolve,
    /// Hover enter/exit
    Hover,
    /// Clicks and keys
    Dispatch,
    /// Events handed to effect handles
    Route,
    /// Effect timers
    Animate,
    /// Materials, transforms, bursts and despawns
    Apply,
}

pub(crate) fn configure_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            HologramFxSystems::Mode,
            HologramFxSystems::Aim,
            HologramFxSystems::Resolve,
            HologramFxSystems::Hover,
            HologramFxSystems::Dispatch,
            HologramFxSystems::Route,
            HologramFxSystems::Animate,
            HologramFxSystems::Apply,
        )
            .chain(),
    );
}

/// Everything except physics: add Avian's `PhysicsPlugins` yourself.
pub struct HologramFxPlugin {
    /// RON file with [`FxConfig`]; `None` uses the built-in defaults
    pub config_path: Option<PathBuf>,
}

impl Default for HologramFxPlugin {
    fn default() -> Self {
        Self {
            config_path: Some(PathBuf::from(config::DEFAULT_CONFIG_PATH)),
        }
    }
}

impl Plugin for HologramFxPlugin {
    fn build(&self, app: &mut App) {
        let config = match &self.config_path {
            Some(path) => FxConfig::load_or_default(path),
            None => FxConfig::default(),
        };

        configure_sets(app);
        app.insert_resource(config)
            .add_plugins((HologramMaterialPlugin, FragmentsPlugin))
            .configure_sets(Update, FragmentSystems.after(HologramFxSystems::Apply))
            .add_plugins((
                PostProcessPlugin,
                DispatcherPlugin,
                TargetResolverPlugin,
                EffectsPlugin,
                ShowcasePlugin,
            ));
    }
}
