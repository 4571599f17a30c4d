//! Per-object effect state machines.
//!
//! Every interactive entity carries one [`EffectHandle`]. The dispatcher's
//! [`InteractionEvent`]s are routed to it, and once per frame the handle is
//! animated into an [`EffectFrame`] describing what the world should look
//! like: which material to bind, shader parameters, an optional scale,
//! fragment bursts to spawn and whether the host should be destroyed.

pub mod disintegrate;
pub mod highlight;
pub mod material;
pub mod timer;
pub mod tint;
pub mod visualizer;

use bevy::camera::primitives::Aabb;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_fragments::{SourceBounds, SpawnFragments};
use serde::{Deserialize, Serialize};

pub use disintegrate::{DisintegrateConfig, DisintegrateEffect};
pub use highlight::{HighlightConfig, HighlightEffect};
pub use material::{EffectMaterialState, FxParams, MaterialBinding};
pub use timer::AnimationTimer;
pub use tint::{TintConfig, TintEffect};
pub use visualizer::{VisualizerConfig, VisualizerEffect};

use crate::config::FxConfig;
use crate::interaction::resolver::world_bounds;
use crate::interaction::{InteractionEvent, InteractionKind};
use crate::post_process::PostProcessOverride;
use crate::{HologramFxSystems, configure_sets};

/// Secondary toggle keys forwarded to the hovered effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKey {
    A,
    B,
}

/// Effect variant tag, used for configuration and auto-injection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    #[default]
    Highlight,
    Disintegrate,
    Visualizer,
    Tint,
}

/// One-shot animation an effect can be busy with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    Flash,
    Disintegrate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    Idle,
    Animating(AnimationKind),
    Destroyed,
}

/// Callback set shared by every effect variant.
///
/// Callbacks only record intent; all time-based work happens in
/// [`Effect::animate`]. Variants leave unsupported callbacks as no-ops.
pub trait Effect {
    fn on_hover_start(&mut self) {}
    fn on_hover_end(&mut self) {}
    fn on_click(&mut self) {}
    fn on_interact(&mut self) {}
    fn on_secondary(&mut self) {}
    fn on_key(&mut self, _key: EffectKey) {}

    /// Advance timers by `cx.dt` and describe this frame in `cx.frame`.
    fn animate(&mut self, cx: &mut EffectCx);

    fn phase(&self) -> EffectPhase;
}

/// Per-frame inputs and outputs of [`Effect::animate`].
pub struct EffectCx<'a> {
    pub dt: f32,
    /// Seconds since startup
    pub time: f32,
    /// Current local scale of the host
    pub scale: Vec3,
    /// World-space mesh bounds of the host, when it has a mesh
    pub bounds: Option<SourceBounds>,
    /// Base color of the host's original material
    pub base_color: Color,
    pub post_process: &'a mut PostProcessOverride,
    pub frame: &'a mut EffectFrame,
}

/// What an effect wants applied to its host this frame.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct EffectFrame {
    pub binding: MaterialBinding,
    pub params: FxParams,
    pub scale: Option<Vec3>,
    pub bursts: Vec<SpawnFragments>,
    pub destroy: bool,
}

/// The interactive capability of an entity.
#[derive(Component, Clone, Debug, PartialEq)]
#[require(EffectFrame)]
pub enum EffectHandle {
    Highlight(HighlightEffect),
    Disintegrate(DisintegrateEffect),
    Visualizer(VisualizerEffect),
    Tint(TintEffect),
}

impl Default for EffectHandle {
    fn default() -> Self {
        Self::Highlight(HighlightEffect::default())
    }
}

impl EffectHandle {
    /// Builds a variant with the tunables from `config`.
    pub fn from_kind(kind: EffectKind, config: &FxConfig) -> Self {
        match kind {
            EffectKind::Highlight => Self::Highlight(HighlightEffect::new(config.highlight)),
            EffectKind::Disintegrate => {
                Self::Disintegrate(DisintegrateEffect::new(config.disintegrate))
            }
            EffectKind::Visualizer => Self::Visualizer(VisualizerEffect::new(config.visualizer)),
            EffectKind::Tint => Self::Tint(TintEffect::new(config.tint)),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Highlight(_) => EffectKind::Highlight,
            Self::Disintegrate(_) => EffectKind::Disintegrate,
            Self::Visualizer(_) => EffectKind::Visualizer,
            Self::Tint(_) => EffectKind::Tint,
        }
    }

    pub fn effect(&self) -> &dyn Effect {
        match self {
            Self::Highlight(effect) => effect,
            Self::Disintegrate(effect) => effect,
            Self::Visualizer(effect) => effect,
            Self::Tint(effect) => effect,
        }
    }

    pub fn effect_mut(&mut self) -> &mut dyn Effect {
        match self {
            Self::Highlight(effect) => effect,
            Self::Disintegrate(effect) => effect,
            Self::Visualizer(effect) => effect,
            Self::Tint(effect) => effect,
        }
    }

    pub fn phase(&self) -> EffectPhase {
        self.effect().phase()
    }

    /// Forward one interaction to the matching callback.
    ///
    /// A primary press is a click followed by an interact.
    pub fn handle(&mut self, kind: InteractionKind) {
        let effect = self.effect_mut();
        match kind {
            InteractionKind::HoverStart => effect.on_hover_start(),
            InteractionKind::HoverEnd => effect.on_hover_end(),
            InteractionKind::Primary => {
                effect.on_click();
                effect.on_interact();
            }
            InteractionKind::Secondary => effect.on_secondary(),
            InteractionKind::Key(key) => effect.on_key(key),
        }
    }
}

/// Outcome of [`EffectRegistry::get_or_create_default`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEntry {
    Existing(EffectKind),
    Created(EffectKind),
    /// The entity has no handle and auto-injection is turned off
    Disabled,
}

/// Looks up effect handles and injects the configured default on demand.
#[derive(SystemParam)]
pub struct EffectRegistry<'w, 's> {
    commands: Commands<'w, 's>,
    handles: Query<'w, 's, &'static EffectHandle>,
    config: Res<'w, FxConfig>,
}

impl EffectRegistry<'_, '_> {
    pub fn get_or_create_default(&mut self, entity: Entity) -> RegistryEntry {
        if let Ok(handle) = self.handles.get(entity) {
            return RegistryEntry::Existing(handle.kind());
        }
        let Some(kind) = self.config.interaction.auto_inject else {
            return RegistryEntry::Disabled;
        };
        self.commands
            .entity(entity)
            .try_insert(EffectHandle::from_kind(kind, &self.config));
        RegistryEntry::Created(kind)
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn route_interaction_events(
    mut events: MessageReader<InteractionEvent>,
    mut handles: Query<&mut EffectHandle>,
) {
    for event in events.read() {
        let Ok(mut handle) = handles.get_mut(event.target) else {
            continue;
        };
        handle.handle(event.kind);
    }
}

pub fn animate_effects(
    time: Res<Time>,
    mut post_process: ResMut<PostProcessOverride>,
    materials: Res<Assets<StandardMaterial>>,
    mut effects: Query<(
        &mut EffectHandle,
        &mut EffectFrame,
        Option<&Transform>,
        Option<&EffectMaterialState>,
        Option<(&Aabb, &GlobalTransform)>,
    )>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    let before = post_process.intensity();
    let shared = post_process.bypass_change_detection();

    for (mut handle, mut frame, transform, material, aabb) in &mut effects {
        *frame = EffectFrame::default();
        let mut cx = EffectCx {
            dt,
            time: now,
            scale: transform.map_or(Vec3::ONE, |t| t.scale),
            bounds: aabb.map(|(aabb, global)| world_bounds(aabb, global)),
            base_color: material::original_base_color(material, &materials),
            post_process: &mut *shared,
            frame: &mut frame,
        };
        handle.effect_mut().animate(&mut cx);
    }

    if post_process.intensity() != before {
        post_process.set_changed();
    }
}

/// Push each frame's scale, bursts and destruction into the world.
pub fn flush_effect_frames(
    mut commands: Commands,
    mut bursts: MessageWriter<SpawnFragments>,
    mut effects: Query<(Entity, &mut EffectFrame, Option<&mut Transform>, Option<&Name>)>,
) {
    for (entity, mut frame, transform, name) in &mut effects {
        if !frame.bursts.is_empty() {
            bursts.write_batch(frame.bursts.drain(..));
        }

        if let (Some(scale), Some(mut transform)) = (frame.scale, transform) {
            transform.scale = scale;
        }

        if frame.destroy {
            info!("Destroyed {}", material::display_name(entity, name));
            commands.entity(entity).try_despawn();
        }
    }
}

/// Registers effect routing, animation and application.
pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);
        app.init_resource::<FxConfig>()
            .init_resource::<PostProcessOverride>()
            .add_message::<InteractionEvent>()
            .add_message::<SpawnFragments>()
            .add_systems(
                Update,
                (
                    route_interaction_events.in_set(HologramFxSystems::Route),
                    (material::capture_original_materials, animate_effects)
                        .chain()
                        .in_set(HologramFxSystems::Animate),
                    (flush_effect_frames, material::apply_effect_materials)
                        .chain()
                        .in_set(HologramFxSystems::Apply),
                ),
            );
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Drives an effect frame by frame without an `App`.
    pub struct Harness {
        pub time: f32,
        pub scale: Vec3,
        pub bounds: Option<SourceBounds>,
        pub base_color: Color,
        pub post_process: PostProcessOverride,
    }

    impl Default for Harness {
        fn default() -> Self {
            Self {
                time: 0.0,
                scale: Vec3::ONE,
                bounds: None,
                base_color: Color::WHITE,
                post_process: PostProcessOverride::default(),
            }
        }
    }

    impl Harness {
        pub fn step(&mut self, effect: &mut impl Effect, dt: f32) -> EffectFrame {
            self.time += dt;
            let mut frame = EffectFrame::default();
            let mut cx = EffectCx {
                dt,
                time: self.time,
                scale: self.scale,
                bounds: self.bounds,
                base_color: self.base_color,
                post_process: &mut self.post_process,
                frame: &mut frame,
            };
            effect.animate(&mut cx);
            if let Some(scale) = frame.scale {
                self.scale = scale;
            }
            frame
        }
    }
}
