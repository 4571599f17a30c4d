use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::material::MaterialBinding;
use super::{Effect, EffectCx, EffectPhase};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TintConfig {
    pub color: Color,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            color: Color::srgb(0.0, 1.0, 1.0),
        }
    }
}

/// Interact flips a flat tint on and off.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TintEffect {
    pub config: TintConfig,
    enabled: bool,
}

impl TintEffect {
    pub fn new(config: TintConfig) -> Self {
        Self {
            config,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Effect for TintEffect {
    fn on_interact(&mut self) {
        self.enabled = !self.enabled;
        debug!("Tint {}", if self.enabled { "on" } else { "off" });
    }

    fn animate(&mut self, cx: &mut EffectCx) {
        if self.enabled {
            cx.frame.binding = MaterialBinding::Working;
            cx.frame.params.tint = self.config.color;
        } else {
            cx.frame.binding = MaterialBinding::Original;
        }
    }

    fn phase(&self) -> EffectPhase {
        EffectPhase::Idle
    }
}
