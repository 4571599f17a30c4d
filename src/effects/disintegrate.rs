use bevy::prelude::*;
use bevy_fragments::{FragmentColor, FragmentConfig, SpawnFragments};
use serde::{Deserialize, Serialize};

use super::material::MaterialBinding;
use super::timer::{AnimationTimer, sine_bump};
use super::{AnimationKind, Effect, EffectCx, EffectPhase};
use crate::post_process::IntensityToken;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisintegrateConfig {
    pub dissolve_duration: f32,
    pub edge_color: Color,
    pub edge_width: f32,
    /// Post-process intensity at the top of the pulse
    pub pulse_peak: f32,
    pub pulse_duration: f32,
    pub fragment_count: u32,
    pub fragments: FragmentConfig,
}

impl Default for DisintegrateConfig {
    fn default() -> Self {
        Self {
            dissolve_duration: 2.0,
            edge_color: Color::srgb(0.0, 1.0, 1.0),
            edge_width: 0.1,
            pulse_peak: 0.15,
            pulse_duration: 0.5,
            fragment_count: 60,
            fragments: FragmentConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pulse {
    timer: AnimationTimer,
    token: IntensityToken,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Ready,
    /// Interact was received; the burst and timers start on the next animate
    Triggered,
    Running {
        dissolve: AnimationTimer,
        pulse: Option<Pulse>,
    },
    Destroyed,
}

/// Single-use effect: fragments, a post-process pulse and a dissolve that ends
/// by destroying the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DisintegrateEffect {
    pub config: DisintegrateConfig,
    stage: Stage,
}

impl DisintegrateEffect {
    pub fn new(config: DisintegrateConfig) -> Self {
        Self {
            config,
            stage: Stage::Ready,
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.stage, Stage::Ready)
    }

    /// Dissolve progress, 0 before triggering and 1 once destroyed.
    pub fn cutoff(&self) -> f32 {
        match &self.stage {
            Stage::Ready | Stage::Triggered => 0.0,
            Stage::Running { dissolve, .. } => dissolve.progress(),
            Stage::Destroyed => 1.0,
        }
    }

    fn start(&mut self, cx: &mut EffectCx) {
        match cx.bounds {
            Some(bounds) => cx.frame.bursts.push(SpawnFragments {
                count: self.config.fragment_count,
                bounds,
                color: FragmentColor::Inherit(cx.base_color),
                config: self.config.fragments,
            }),
            None => warn!("Disintegrate target has no mesh bounds; skipping fragments"),
        }

        let token = cx.post_process.capture();
        self.stage = Stage::Running {
            dissolve: AnimationTimer::new(self.config.dissolve_duration),
            pulse: Some(Pulse {
                timer: AnimationTimer::new(self.config.pulse_duration),
                token,
            }),
        };
    }

    fn step(&mut self, cx: &mut EffectCx, dt: f32) {
        let Stage::Running { dissolve, pulse } = &mut self.stage else {
            return;
        };

        if let Some(active) = pulse {
            let progress = active.timer.tick(dt);
            if active.timer.is_finished() {
                cx.post_process.restore(active.token);
                *pulse = None;
            } else {
                let original = active.token.value();
                let value = original + (self.config.pulse_peak - original) * sine_bump(progress);
                cx.post_process.set_intensity(value);
            }
        }

        let cutoff = dissolve.tick(dt);
        let frame = &mut *cx.frame;
        frame.binding = MaterialBinding::Working;
        frame.params.dissolve = true;
        frame.params.cutoff = cutoff;
        frame.params.edge_color = self.config.edge_color;
        frame.params.edge_width = self.config.edge_width;

        if dissolve.is_finished() {
            // Never leave the shared post-process value altered past destruction.
            if let Some(active) = pulse.take() {
                cx.post_process.restore(active.token);
            }
            frame.destroy = true;
            self.stage = Stage::Destroyed;
        }
    }
}

impl Default for DisintegrateEffect {
    fn default() -> Self {
        Self::new(DisintegrateConfig::default())
    }
}

impl Effect for DisintegrateEffect {
    fn on_interact(&mut self) {
        if !self.is_busy() {
            self.stage = Stage::Triggered;
        }
    }

    fn animate(&mut self, cx: &mut EffectCx) {
        match self.stage {
            Stage::Ready => cx.frame.binding = MaterialBinding::Original,
            Stage::Triggered => {
                self.start(cx);
                self.step(cx, 0.0);
            }
            Stage::Running { .. } => {
                let dt = cx.dt;
                self.step(cx, dt);
            }
            Stage::Destroyed => cx.frame.destroy = true,
        }
    }

    fn phase(&self) -> EffectPhase {
        match self.stage {
            Stage::Ready => EffectPhase::Idle,
            Stage::Triggered | Stage::Running { .. } => {
                EffectPhase::Animating(AnimationKind::Disintegrate)
            }
            Stage::Destroyed => EffectPhase::Destroyed,
        }
    }
}
