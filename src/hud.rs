//! egui status overlay for the showcase.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};

use crate::config::FxConfig;
use crate::effects::{EffectHandle, EffectPhase, VisualizerEffect};
use crate::interaction::{AimSource, InteractionDispatcher, InteractionMode};
use crate::post_process::PostProcessOverride;

/// Draws the interaction status panel. Needs `EguiPlugin`.
pub struct HologramHudPlugin;

impl Plugin for HologramHudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, (draw_status_hud, draw_crosshair));
    }
}

fn visualizer_toggles(visualizer: &VisualizerEffect) -> String {
    let on: Vec<&str> = [
        (visualizer.hue_cycle(), "hue"),
        (visualizer.blur(), "blur"),
        (visualizer.invert(), "invert"),
    ]
    .into_iter()
    .filter_map(|(enabled, label)| enabled.then_some(label))
    .collect();
    if on.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", on.join(", "))
    }
}

fn hover_line(entity: Entity, name: Option<&Name>, handle: Option<&EffectHandle>) -> String {
    let label = name.map_or_else(|| entity.to_string(), |name| name.to_string());
    match handle {
        Some(handle) => {
            let phase = match handle.phase() {
                EffectPhase::Idle => String::new(),
                EffectPhase::Animating(kind) => format!(" ({kind:?})"),
                EffectPhase::Destroyed => " (destroyed)".to_string(),
            };
            let toggles = match handle {
                EffectHandle::Visualizer(visualizer) => visualizer_toggles(visualizer),
                _ => String::new(),
            };
            format!("{label} [{:?}]{phase}{toggles}", handle.kind())
        }
        None => label,
    }
}

fn draw_status_hud(
    mut contexts: EguiContexts,
    dispatcher: Res<InteractionDispatcher>,
    config: Res<FxConfig>,
    post_process: Res<PostProcessOverride>,
    targets: Query<(Option<&Name>, Option<&EffectHandle>)>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let bindings = &config.interaction;

    egui::Area::new(egui::Id::new("hologram_hud"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style())
                .fill(egui::Color32::from_rgba_unmultiplied(20, 24, 30, 220))
                .corner_radius(4)
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(200.0);

                    let (label, color) = match dispatcher.mode() {
                        InteractionMode::Active => ("INTERACTING", egui::Color32::from_rgb(80, 220, 230)),
                        InteractionMode::Idle => ("IDLE", egui::Color32::GRAY),
                    };
                    ui.label(egui::RichText::new(label).strong().color(color));
                    ui.separator();

                    let hovered = dispatcher
                        .hover()
                        .map(|entity| match targets.get(entity) {
                            Ok((name, handle)) => hover_line(entity, name, handle),
                            Err(_) => entity.to_string(),
                        })
                        .unwrap_or_else(|| "-".to_string());
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Target:").color(egui::Color32::GRAY));
                        ui.label(egui::RichText::new(hovered).strong());
                    });
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("Aberration:").color(egui::Color32::GRAY));
                        ui.label(format!("{:.3}", post_process.intensity()));
                    });

                    ui.separator();
                    let muted = |text: String| egui::RichText::new(text).small().color(egui::Color32::GRAY);
                    ui.label(muted(format!("{:?}  toggle interaction", bindings.toggle_key)));
                    ui.label(muted(format!("{:?} click  interact", bindings.primary_button)));
                    ui.label(muted(format!("{:?} click  hue cycle", bindings.secondary_button)));
                    ui.label(muted(format!("{:?} / {:?}  blur / invert", bindings.key_a, bindings.key_b)));
                    ui.label(muted("Arrows  cycle showcase".to_string()));
                });
        });

    Ok(())
}

fn draw_crosshair(
    mut contexts: EguiContexts,
    dispatcher: Res<InteractionDispatcher>,
    config: Res<FxConfig>,
) -> Result {
    if config.interaction.aim != AimSource::ViewportCenter || !dispatcher.is_active() {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    let color = if dispatcher.hover().is_some() {
        egui::Color32::from_rgb(80, 220, 230)
    } else {
        egui::Color32::WHITE
    };
    egui::Area::new(egui::Id::new("hologram_crosshair"))
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("+").size(20.0).color(color));
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{Effect, EffectKey};

    #[test]
    fn hover_line_lists_visualizer_toggles() {
        let entity = Entity::PLACEHOLDER;
        let name = Name::new("Column");
        let mut visualizer = VisualizerEffect::default();
        visualizer.on_secondary();
        visualizer.on_key(EffectKey::B);
        let handle = EffectHandle::Visualizer(visualizer);
        assert_eq!(
            hover_line(entity, Some(&name), Some(&handle)),
            "Column [Visualizer] {hue, invert}"
        );

        let plain = EffectHandle::Visualizer(VisualizerEffect::default());
        assert_eq!(hover_line(entity, Some(&name), Some(&plain)), "Column [Visualizer]");
    }
}
