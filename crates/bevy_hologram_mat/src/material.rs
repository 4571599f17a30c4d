use bevy::{
    asset::embedded_asset,
    pbr::{MaterialExtension, MaterialPlugin, StandardMaterial},
    prelude::*,
    render::render_resource::{AsBindGroup, ShaderType},
    shader::ShaderRef,
};
use bitflags::bitflags;

pub use bevy::pbr::ExtendedMaterial;

/// The full material type: a `StandardMaterial` base plus the hologram extension.
pub type HologramMaterial = ExtendedMaterial<StandardMaterial, HologramFx>;

/// Plugin that registers the [`HologramMaterial`] with Bevy's rendering system.
pub struct HologramMaterialPlugin;

impl Plugin for HologramMaterialPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "hologram_fx.wgsl");
        app.add_plugins(MaterialPlugin::<HologramMaterial>::default());
    }
}

bitflags! {
    /// Shader feature switches packed into the uniform.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HologramFlags: u32 {
        /// Discard fragments below the dissolve cutoff and glow along the edge
        const DISSOLVE = 0b01;
        /// Horizontal scanline banding
        const SCANLINES = 0b10;
    }
}

/// Uniform data sent to the GPU for the hologram shader.
#[derive(Clone, Copy, ShaderType, Debug, PartialEq)]
pub struct HologramFxUniform {
    /// Multiplied into the lit base color
    pub tint: LinearRgba,
    /// Glow color along the dissolve edge
    pub edge_color: LinearRgba,
    /// Added emission on top of the base material
    pub emission: LinearRgba,
    /// Strength of the horizontal slice displacement (0..1)
    pub glitch_amount: f32,
    /// UV offset of the red/blue channel split
    pub chroma_offset: f32,
    /// Screen-independent RGB split in world units
    pub rgb_offset: f32,
    /// Softening applied to the lit color
    pub blur_amount: f32,
    /// Color inversion blend (0 = none, 1 = fully inverted)
    pub invert: f32,
    /// Dissolve progress (0 = intact, 1 = gone)
    pub cutoff: f32,
    /// Width of the glowing dissolve edge
    pub edge_width: f32,
    /// [`HologramFlags`] bits
    pub flags: u32,
}

impl Default for HologramFxUniform {
    fn default() -> Self {
        Self {
            tint: LinearRgba::WHITE,
            edge_color: LinearRgba::new(0.0, 1.0, 1.0, 1.0),
            emission: LinearRgba::BLACK,
            glitch_amount: 0.0,
            chroma_offset: 0.0,
            rgb_offset: 0.0,
            blur_amount: 0.0,
            invert: 0.0,
            cutoff: 0.0,
            edge_width: 0.1,
            flags: HologramFlags::SCANLINES.bits(),
        }
    }
}

/// Glitch / chroma split / dissolve extension for `StandardMaterial`.
///
/// The extension never owns textures; everything it needs is procedural, so a
/// working copy can be built from any existing `StandardMaterial` with
/// [`HologramFx::wrap`].
#[derive(Asset, AsBindGroup, TypePath, Debug, Clone, Default)]
pub struct HologramFx {
    #[uniform(100)]
    pub uniform: HologramFxUniform,
}

impl HologramFx {
    /// Creates an extension with neutral parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a hologram material that copies every property of `base`.
    pub fn wrap(base: &StandardMaterial) -> HologramMaterial {
        let mut base = base.clone();
        // The dissolve discards fragments, which needs a mask-capable pass.
        if matches!(base.alpha_mode, AlphaMode::Opaque) {
            base.alpha_mode = AlphaMode::Mask(0.5);
        }
        ExtendedMaterial {
            base,
            extension: Self::new(),
        }
    }

    /// Returns the active feature flags.
    pub fn flags(&self) -> HologramFlags {
        HologramFlags::from_bits_truncate(self.uniform.flags)
    }

    /// Enables or disables the given feature flags.
    pub fn set_flags(&mut self, flags: HologramFlags, enabled: bool) {
        let mut current = self.flags();
        current.set(flags, enabled);
        self.uniform.flags = current.bits();
    }
}

impl MaterialExtension for HologramFx {
    fn fragment_shader() -> ShaderRef {
        "embedded://bevy_hologram_mat/hologram_fx.wgsl".into()
    }

    fn deferred_fragment_shader() -> ShaderRef {
        "embedded://bevy_hologram_mat/hologram_fx.wgsl".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_copies_base_properties() {
        let base = StandardMaterial {
            base_color: Color::srgb(0.2, 0.4, 0.6),
            perceptual_roughness: 0.3,
            ..default()
        };
        let wrapped = HologramFx::wrap(&base);
        assert_eq!(wrapped.base.base_color, base.base_color);
        assert_eq!(wrapped.base.perceptual_roughness, 0.3);
        assert_eq!(wrapped.extension.uniform, HologramFxUniform::default());
    }

    #[test]
    fn flags_toggle_independently() {
        let mut fx = HologramFx::new();
        assert!(fx.flags().contains(HologramFlags::SCANLINES));
        fx.set_flags(HologramFlags::DISSOLVE, true);
        assert!(fx.flags().contains(HologramFlags::DISSOLVE | HologramFlags::SCANLINES));
        fx.set_flags(HologramFlags::SCANLINES, false);
        assert_eq!(fx.flags(), HologramFlags::DISSOLVE);
    }
}
