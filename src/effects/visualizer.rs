use bevy::color::Mix;
use bevy::prelude::*;
use bevy_fragments::{FragmentColor, FragmentConfig, SpawnFragments};
use serde::{Deserialize, Serialize};

use super::material::MaterialBinding;
use super::timer::ping_pong;
use super::{Effect, EffectCx, EffectKey, EffectPhase};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub hover_glitch_amount: f32,
    pub hover_rgb_offset: f32,
    /// Radians per second of the hover scale pulse
    pub pulse_speed: f32,
    /// Relative scale amplitude of the hover pulse
    pub pulse_intensity: f32,
    /// Rate at which scale returns to the original after hover ends
    pub scale_return_speed: f32,
    pub key_a_blur: f32,
    pub key_b_invert: f32,
    pub hue_from: Color,
    pub hue_to: Color,
    /// Seconds for one leg of the hue ping-pong
    pub hue_period: f32,
    pub splash_count: u32,
    pub splash: FragmentConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            hover_glitch_amount: 0.3,
            hover_rgb_offset: 0.1,
            pulse_speed: 5.0,
            pulse_intensity: 0.2,
            scale_return_speed: 5.0,
            key_a_blur: 0.02,
            key_b_invert: 1.0,
            hue_from: Color::srgb(1.0, 0.0, 0.0),
            hue_to: Color::srgb(0.0, 0.0, 1.0),
            hue_period: 1.0,
            splash_count: 500,
            splash: FragmentConfig {
                scale: 0.05,
                mass: 0.01,
                explosion_force: 0.04,
                drag: 1.0,
                gravity_scale: 1.0,
                lifetime: 5.0,
                lifetime_jitter: 0.0,
            },
        }
    }
}

/// Independent hover/right-click/key toggles layered on one working material,
/// plus a repeatable random-hue fragment splash on click.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualizerEffect {
    pub config: VisualizerConfig,
    hovering: bool,
    hue_cycle: bool,
    blur: bool,
    invert: bool,
    original_scale: Option<Vec3>,
    pending_splashes: u32,
}

impl VisualizerEffect {
    pub fn new(config: VisualizerConfig) -> Self {
        Self {
            config,
            hovering: false,
            hue_cycle: false,
            blur: false,
            invert: false,
            original_scale: None,
            pending_splashes: 0,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn hue_cycle(&self) -> bool {
        self.hue_cycle
    }

    pub fn blur(&self) -> bool {
        self.blur
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    fn any_active(&self) -> bool {
        self.hovering || self.hue_cycle || self.blur || self.invert
    }

    fn animate_scale(&mut self, cx: &mut EffectCx) {
        let original = *self.original_scale.get_or_insert(cx.scale);

        if self.hovering {
            let pulse = 1.0 + (cx.time * self.config.pulse_speed).sin() * self.config.pulse_intensity;
            cx.frame.scale = Some(original * pulse);
        } else if cx.scale != original {
            let t = (self.config.scale_return_speed * cx.dt).clamp(0.0, 1.0);
            let scale = cx.scale.lerp(original, t);
            let settled = (scale - original).length_squared() < 1e-8;
            cx.frame.scale = Some(if settled { original } else { scale });
        }
    }
}

impl Default for VisualizerEffect {
    fn default() -> Self {
        Self::new(VisualizerConfig::default())
    }
}

impl Effect for VisualizerEffect {
    fn on_hover_start(&mut self) {
        self.hovering = true;
    }

    fn on_hover_end(&mut self) {
        self.hovering = false;
    }

    fn on_interact(&mut self) {
        self.pending_splashes += 1;
    }

    fn on_secondary(&mut self) {
        self.hue_cycle = !self.hue_cycle;
    }

    fn on_key(&mut self, key: EffectKey) {
        match key {
            EffectKey::A => self.blur = !self.blur,
            EffectKey::B => self.invert = !self.invert,
        }
    }

    fn animate(&mut self, cx: &mut EffectCx) {
        self.animate_scale(cx);

        for _ in 0..std::mem::take(&mut self.pending_splashes) {
            match cx.bounds {
                Some(bounds) => cx.frame.bursts.push(SpawnFragments {
                    count: self.config.splash_count,
                    bounds,
                    color: FragmentColor::RandomHue,
                    config: self.config.splash,
                }),
                None => warn!("Visualizer target has no mesh bounds; skipping splash"),
            }
        }

        if !self.any_active() {
            cx.frame.binding = MaterialBinding::Original;
            return;
        }

        let params = &mut cx.frame.params;
        if self.hovering {
            params.glitch_amount = self.config.hover_glitch_amount;
            params.rgb_offset = self.config.hover_rgb_offset;
        }
        if self.blur {
            params.blur_amount = self.config.key_a_blur;
        }
        if self.invert {
            params.invert = self.config.key_b_invert;
        }
        if self.hue_cycle {
            let t = ping_pong(cx.time, self.config.hue_period);
            params.tint = self.config.hue_from.mix(&self.config.hue_to, t);
        }
        cx.frame.binding = MaterialBinding::Working;
    }

    fn phase(&self) -> EffectPhase {
        EffectPhase::Idle
    }
}
