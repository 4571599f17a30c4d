//! Aiming, hover tracking and input dispatch.

pub mod dispatcher;
pub mod resolver;

use bevy::prelude::*;

pub use dispatcher::{CursorPolicy, InteractionDispatcher, InteractionMode};
pub use resolver::{AimSource, TargetHit, TargetResolver};

use crate::config::FxConfig;
use crate::effects::EffectKey;
use crate::{HologramFxSystems, configure_sets};

/// Camera the aim ray is cast from.
#[derive(Component, Default)]
pub struct InteractionCamera;

/// Colliders that the aim ray passes through.
#[derive(Component, Default)]
pub struct InteractionIgnored;

/// Ray cast from the [`InteractionCamera`] this frame, while Active.
#[derive(Resource, Default, Debug)]
pub struct AimRay(pub Option<Ray3d>);

/// Result of resolving [`AimRay`] against the physics world.
#[derive(Resource, Default, Debug)]
pub struct AimTarget(pub Option<TargetHit>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    HoverStart,
    HoverEnd,
    Primary,
    Secondary,
    Key(EffectKey),
}

/// An interaction addressed to one entity.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct InteractionEvent {
    pub target: Entity,
    pub kind: InteractionKind,
}

/// Mode toggle, hover tracking and click/key dispatch.
///
/// Reads [`AimTarget`] rather than casting rays itself, so it runs without a
/// physics backend.
pub struct DispatcherPlugin;

impl Plugin for DispatcherPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);

        let mode = match app.world().get_resource::<FxConfig>() {
            Some(config) if config.interaction.start_active => InteractionMode::Active,
            _ => InteractionMode::Idle,
        };

        app.init_resource::<FxConfig>()
            .init_resource::<AimTarget>()
            .insert_resource(InteractionDispatcher::new(mode))
            .add_message::<InteractionEvent>()
            .add_systems(Startup, dispatcher::apply_initial_cursor)
            .add_systems(
                Update,
                (
                    dispatcher::toggle_interaction_mode.in_set(HologramFxSystems::Mode),
                    (dispatcher::forget_destroyed_targets, dispatcher::update_hover)
                        .chain()
                        .in_set(HologramFxSystems::Hover),
                    (
                        dispatcher::dispatch_pointer_input,
                        dispatcher::flush_interaction_events,
                    )
                        .chain()
                        .in_set(HologramFxSystems::Dispatch),
                ),
            );
    }
}

/// Aim ray and raycast resolution. Needs Avian's `PhysicsPlugins`.
pub struct TargetResolverPlugin;

impl Plugin for TargetResolverPlugin {
    fn build(&self, app: &mut App) {
        configure_sets(app);
        app.init_resource::<AimRay>()
            .init_resource::<AimTarget>()
            .add_systems(
                Update,
                (
                    resolver::update_aim_ray.in_set(HologramFxSystems::Aim),
                    resolver::resolve_aim_target.in_set(HologramFxSystems::Resolve),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use bevy_hologram_mat::HologramMaterial;

    use super::*;
    use crate::effects::{EffectHandle, EffectsPlugin};

    #[derive(Resource, Default)]
    struct Recorded(Vec<InteractionEvent>);

    fn record(mut reader: MessageReader<InteractionEvent>, mut recorded: ResMut<Recorded>) {
        recorded.0.extend(reader.read().copied());
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<Recorded>()
            .add_plugins(DispatcherPlugin)
            .add_systems(Update, record.after(HologramFxSystems::Dispatch));
        app
    }

    fn hit(entity: Entity) -> Option<TargetHit> {
        Some(TargetHit {
            entity,
            collider: entity,
            point: Vec3::ZERO,
            distance: 1.0,
            bounds: None,
        })
    }

    fn tap_key(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.release(key);
        keys.clear();
    }

    fn click(app: &mut App, button: MouseButton) {
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(button);
        app.update();
        let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        mouse.release(button);
        mouse.clear();
    }

    fn take(app: &mut App) -> Vec<(Entity, InteractionKind)> {
        std::mem::take(&mut app.world_mut().resource_mut::<Recorded>().0)
            .into_iter()
            .map(|event| (event.target, event.kind))
            .collect()
    }

    fn aim_at(app: &mut App, target: Option<Entity>) {
        app.world_mut().resource_mut::<AimTarget>().0 = target.and_then(hit);
    }

    #[test]
    fn mode_scenario() {
        let mut app = app();
        let x = app.world_mut().spawn(EffectHandle::default()).id();
        app.update();
        assert_eq!(
            app.world().resource::<InteractionDispatcher>().mode(),
            InteractionMode::Idle
        );

        // Hits are ignored while Idle.
        aim_at(&mut app, Some(x));
        app.update();
        assert!(take(&mut app).is_empty());

        tap_key(&mut app, KeyCode::KeyM);
        assert_eq!(
            app.world().resource::<InteractionDispatcher>().mode(),
            InteractionMode::Active
        );
        assert_eq!(take(&mut app), vec![(x, InteractionKind::HoverStart)]);

        app.update();
        assert!(take(&mut app).is_empty());

        aim_at(&mut app, None);
        app.update();
        assert_eq!(take(&mut app), vec![(x, InteractionKind::HoverEnd)]);
        app.update();
        assert!(take(&mut app).is_empty());

        click(&mut app, MouseButton::Left);
        assert!(take(&mut app).is_empty());
    }

    #[test]
    fn clicks_and_keys_reach_hovered_entity() {
        let mut app = app();
        let x = app.world_mut().spawn(EffectHandle::default()).id();
        tap_key(&mut app, KeyCode::KeyM);
        aim_at(&mut app, Some(x));
        app.update();
        take(&mut app);

        click(&mut app, MouseButton::Left);
        click(&mut app, MouseButton::Right);
        tap_key(&mut app, KeyCode::KeyN);
        tap_key(&mut app, KeyCode::KeyB);
        assert_eq!(
            take(&mut app),
            vec![
                (x, InteractionKind::Primary),
                (x, InteractionKind::Secondary),
                (x, InteractionKind::Key(EffectKey::A)),
                (x, InteractionKind::Key(EffectKey::B)),
            ]
        );
    }

    #[test]
    fn switching_hover_orders_exit_before_enter() {
        let mut app = app();
        let a = app.world_mut().spawn(EffectHandle::default()).id();
        let b = app.world_mut().spawn(EffectHandle::default()).id();
        tap_key(&mut app, KeyCode::KeyM);
        aim_at(&mut app, Some(a));
        app.update();
        take(&mut app);

        aim_at(&mut app, Some(b));
        app.update();
        assert_eq!(
            take(&mut app),
            vec![(a, InteractionKind::HoverEnd), (b, InteractionKind::HoverStart)]
        );
    }

    #[test]
    fn hovering_plain_entity_injects_default_handle() {
        let mut app = app();
        let plain = app.world_mut().spawn(Name::new("Crate")).id();
        tap_key(&mut app, KeyCode::KeyM);
        aim_at(&mut app, Some(plain));
        app.update();
        assert!(matches!(
            app.world().get::<EffectHandle>(plain),
            Some(EffectHandle::Highlight(_))
        ));
    }

    #[test]
    fn injected_handle_sees_hover_start_on_first_frame() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<StandardMaterial>()
            .init_asset::<HologramMaterial>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_plugins((DispatcherPlugin, EffectsPlugin));
        let plain = app.world_mut().spawn(Name::new("Crate")).id();
        tap_key(&mut app, KeyCode::KeyM);

        aim_at(&mut app, Some(plain));
        app.update();
        let Some(EffectHandle::Highlight(highlight)) = app.world().get::<EffectHandle>(plain)
        else {
            panic!("default handle was not injected");
        };
        assert!(highlight.is_hovering());
    }

    #[test]
    fn auto_inject_can_be_disabled() {
        let mut config = FxConfig::default();
        config.interaction.auto_inject = None;
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(config)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_plugins(DispatcherPlugin);
        let plain = app.world_mut().spawn_empty().id();
        tap_key(&mut app, KeyCode::KeyM);
        aim_at(&mut app, Some(plain));
        app.update();
        assert!(app.world().get::<EffectHandle>(plain).is_none());
    }

    #[test]
    fn despawned_hover_target_is_forgotten() {
        let mut app = app();
        let x = app.world_mut().spawn(EffectHandle::default()).id();
        tap_key(&mut app, KeyCode::KeyM);
        aim_at(&mut app, Some(x));
        app.update();
        take(&mut app);

        app.world_mut().despawn(x);
        aim_at(&mut app, None);
        app.update();
        assert!(take(&mut app).is_empty());
        assert_eq!(app.world().resource::<InteractionDispatcher>().hover(), None);
    }

    #[test]
    fn start_active_config_skips_toggle() {
        let mut config = FxConfig::default();
        config.interaction.start_active = true;
        let mut app = App::new();
        app.insert_resource(config).add_plugins(DispatcherPlugin);
        assert!(app.world().resource::<InteractionDispatcher>().is_active());
    }
}
