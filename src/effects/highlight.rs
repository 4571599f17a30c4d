use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::material::MaterialBinding;
use super::timer::AnimationTimer;
use super::{AnimationKind, Effect, EffectCx, EffectPhase};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Glitch amount blended toward while hovered
    pub hover_glitch_amount: f32,
    pub hover_chroma_offset: f32,
    /// Blend rate per second
    pub lerp_speed: f32,
    /// Below this the working material is released
    pub epsilon: f32,
    pub flash_color: Color,
    pub flash_duration: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            hover_glitch_amount: 0.5,
            hover_chroma_offset: 0.05,
            lerp_speed: 5.0,
            epsilon: 0.01,
            flash_color: Color::WHITE,
            flash_duration: 0.15,
        }
    }
}

/// Hover glitch blend plus a short full-glitch flash on click.
#[derive(Clone, Debug, PartialEq)]
pub struct HighlightEffect {
    pub config: HighlightConfig,
    hovering: bool,
    current: f32,
    flash: Option<AnimationTimer>,
}

impl HighlightEffect {
    pub fn new(config: HighlightConfig) -> Self {
        Self {
            config,
            hovering: false,
            current: 0.0,
            flash: None,
        }
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some()
    }

    /// Current blended glitch amount.
    pub fn amount(&self) -> f32 {
        self.current
    }

    fn target(&self) -> f32 {
        if self.hovering {
            self.config.hover_glitch_amount
        } else {
            0.0
        }
    }
}

impl Default for HighlightEffect {
    fn default() -> Self {
        Self::new(HighlightConfig::default())
    }
}

impl Effect for HighlightEffect {
    fn on_hover_start(&mut self) {
        self.hovering = true;
    }

    fn on_hover_end(&mut self) {
        self.hovering = false;
    }

    fn on_click(&mut self) {
        if self.flash.is_none() {
            self.flash = Some(AnimationTimer::new(self.config.flash_duration));
        }
    }

    fn animate(&mut self, cx: &mut EffectCx) {
        let frame = &mut *cx.frame;

        if let Some(timer) = &mut self.flash {
            frame.binding = MaterialBinding::Working;
            frame.params.glitch_amount = 1.0;
            frame.params.chroma_offset = self.config.hover_chroma_offset;
            frame.params.tint = self.config.flash_color;
            frame.params.emission = self.config.flash_color;
            timer.tick(cx.dt);
            if timer.is_finished() {
                self.flash = None;
            }
            return;
        }

        let t = (self.config.lerp_speed * cx.dt).clamp(0.0, 1.0);
        self.current += (self.target() - self.current) * t;

        if self.current > self.config.epsilon {
            frame.binding = MaterialBinding::Working;
            frame.params.glitch_amount = self.current;
            frame.params.chroma_offset = self.config.hover_chroma_offset;
        } else {
            frame.binding = MaterialBinding::Original;
        }
    }

    fn phase(&self) -> EffectPhase {
        if self.flash.is_some() {
            EffectPhase::Animating(AnimationKind::Flash)
        } else {
            EffectPhase::Idle
        }
    }
}
