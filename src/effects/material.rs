//! Working-material bookkeeping.
//!
//! Every effect entity keeps its original `StandardMaterial` handle untouched.
//! When an effect needs shader parameters it gets a lazily created
//! [`HologramMaterial`] copy, and the apply step swaps `MeshMaterial3d`
//! components between the two.

use bevy::prelude::*;
use bevy_hologram_mat::{HologramFlags, HologramFx, HologramFxUniform, HologramMaterial};

use super::EffectFrame;

/// Which material an effect wants bound this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterialBinding {
    #[default]
    Original,
    Working,
}

/// Shader parameters an effect writes into its working material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FxParams {
    pub glitch_amount: f32,
    pub chroma_offset: f32,
    pub rgb_offset: f32,
    pub blur_amount: f32,
    pub invert: f32,
    pub tint: Color,
    pub edge_color: Color,
    pub edge_width: f32,
    /// Dissolve progress, only used when `dissolve` is set
    pub cutoff: f32,
    pub dissolve: bool,
    pub emission: Color,
}

impl Default for FxParams {
    fn default() -> Self {
        Self {
            glitch_amount: 0.0,
            chroma_offset: 0.0,
            rgb_offset: 0.0,
            blur_amount: 0.0,
            invert: 0.0,
            tint: Color::WHITE,
            edge_color: Color::srgb(0.0, 1.0, 1.0),
            edge_width: 0.1,
            cutoff: 0.0,
            dissolve: false,
            emission: Color::BLACK,
        }
    }
}

impl FxParams {
    pub fn to_uniform(&self) -> HologramFxUniform {
        let mut flags = HologramFlags::SCANLINES;
        flags.set(HologramFlags::DISSOLVE, self.dissolve);
        HologramFxUniform {
            tint: self.tint.to_linear(),
            edge_color: self.edge_color.to_linear(),
            emission: self.emission.to_linear(),
            glitch_amount: self.glitch_amount,
            chroma_offset: self.chroma_offset,
            rgb_offset: self.rgb_offset,
            blur_amount: self.blur_amount,
            invert: self.invert,
            cutoff: self.cutoff.clamp(0.0, 1.0),
            edge_width: self.edge_width,
            flags: flags.bits(),
        }
    }

    pub fn write_to(&self, fx: &mut HologramFx) {
        fx.uniform = self.to_uniform();
    }
}

/// Original and working material handles of one effect entity.
#[derive(Component, Debug)]
pub struct EffectMaterialState {
    /// Never mutated; restoring binds exactly this handle again
    pub original: Handle<StandardMaterial>,
    pub working: Option<Handle<HologramMaterial>>,
    pub bound: MaterialBinding,
}

impl EffectMaterialState {
    pub fn new(original: Handle<StandardMaterial>) -> Self {
        Self {
            original,
            working: None,
            bound: MaterialBinding::Original,
        }
    }
}

/// Marks effect entities that have no `StandardMaterial` to work on.
#[derive(Component)]
pub struct WithoutMaterial;

/// Remember the original material of every new effect entity.
pub fn capture_original_materials(
    mut commands: Commands,
    with_material: Query<
        (Entity, &MeshMaterial3d<StandardMaterial>),
        (With<EffectFrame>, Without<EffectMaterialState>),
    >,
    without_material: Query<
        (Entity, Option<&Name>),
        (
            With<EffectFrame>,
            Without<EffectMaterialState>,
            Without<MeshMaterial3d<StandardMaterial>>,
            Without<WithoutMaterial>,
        ),
    >,
) {
    for (entity, material) in &with_material {
        commands
            .entity(entity)
            .insert(EffectMaterialState::new(material.0.clone()));
    }

    for (entity, name) in &without_material {
        warn!(
            "Effect target {} has no StandardMaterial; material effects are skipped",
            display_name(entity, name)
        );
        commands.entity(entity).insert(WithoutMaterial);
    }
}

/// Bind the material each effect asked for and push its parameters.
pub fn apply_effect_materials(
    mut commands: Commands,
    standard: Res<Assets<StandardMaterial>>,
    mut hologram: ResMut<Assets<HologramMaterial>>,
    mut effects: Query<(Entity, &EffectFrame, &mut EffectMaterialState)>,
) {
    for (entity, frame, mut state) in &mut effects {
        if frame.destroy {
            continue;
        }

        match frame.binding {
            MaterialBinding::Working => {
                let handle = match &state.working {
                    Some(handle) => handle.clone(),
                    None => {
                        let Some(base) = standard.get(&state.original) else {
                            continue;
                        };
                        let handle = hologram.add(HologramFx::wrap(base));
                        state.working = Some(handle.clone());
                        handle
                    }
                };

                let uniform = frame.params.to_uniform();
                let stale = hologram
                    .get(&handle)
                    .is_some_and(|material| material.extension.uniform != uniform);
                if stale && let Some(mut material) = hologram.get_mut(&handle) {
                    material.extension.uniform = uniform;
                }

                if state.bound != MaterialBinding::Working {
                    commands
                        .entity(entity)
                        .remove::<MeshMaterial3d<StandardMaterial>>()
                        .insert(MeshMaterial3d(handle));
                    state.bound = MaterialBinding::Working;
                }
            }
            MaterialBinding::Original => {
                if state.bound != MaterialBinding::Original {
                    commands
                        .entity(entity)
                        .remove::<MeshMaterial3d<HologramMaterial>>()
                        .insert(MeshMaterial3d(state.original.clone()));
                    state.bound = MaterialBinding::Original;
                }
            }
        }
    }
}

/// Base color of the original material, used to tint inherited fragments.
pub fn original_base_color(
    state: Option<&EffectMaterialState>,
    materials: &Assets<StandardMaterial>,
) -> Color {
    state
        .and_then(|state| materials.get(&state.original))
        .map(|material| material.base_color)
        .unwrap_or(Color::WHITE)
}

pub(crate) fn display_name(entity: Entity, name: Option<&Name>) -> String {
    match name {
        Some(name) => format!("'{}'", name.as_str()),
        None => format!("{entity}"),
    }
}
