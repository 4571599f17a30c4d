//! Hover tracking and event dispatch.
//!
//! [`InteractionDispatcher`] is a plain state machine: callers feed it mode
//! toggles, per-frame hits and button presses, and it queues the resulting
//! [`InteractionEvent`]s in order. The systems at the bottom of this file are
//! thin adapters between it and Bevy's input resources.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};
use serde::{Deserialize, Serialize};

use super::{AimTarget, InteractionEvent, InteractionKind};
use crate::config::FxConfig;
use crate::effects::{EffectKey, EffectRegistry, RegistryEntry};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    /// Hover tracking off; the cursor belongs to the game
    #[default]
    Idle,
    /// Hover tracking on; clicks and keys go to the hovered object
    Active,
}

/// Cursor state for one interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorPolicy {
    pub visible: bool,
    pub grab_mode: CursorGrabMode,
}

impl CursorPolicy {
    /// Active shows and frees the cursor, Idle hides and locks it.
    /// `invert` swaps the two.
    pub fn for_mode(mode: InteractionMode, invert: bool) -> Self {
        let free = (mode == InteractionMode::Active) != invert;
        if free {
            Self {
                visible: true,
                grab_mode: CursorGrabMode::None,
            }
        } else {
            Self {
                visible: false,
                grab_mode: CursorGrabMode::Locked,
            }
        }
    }

    pub fn apply(&self, cursor: &mut CursorOptions) {
        cursor.visible = self.visible;
        cursor.grab_mode = self.grab_mode;
    }
}

/// Tracks the interaction mode and the hovered entity, and queues the events
/// that changes to either produce.
#[derive(Resource, Debug, Default)]
pub struct InteractionDispatcher {
    mode: InteractionMode,
    hover: Option<Entity>,
    pending: Vec<InteractionEvent>,
}

impl InteractionDispatcher {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            ..default()
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == InteractionMode::Active
    }

    pub fn hover(&self) -> Option<Entity> {
        self.hover
    }

    /// Flip the mode. Leaving Active ends the current hover.
    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.mode = match self.mode {
            InteractionMode::Idle => InteractionMode::Active,
            InteractionMode::Active => {
                self.clear_hover();
                InteractionMode::Idle
            }
        };
        self.mode
    }

    /// Feed this frame's hit. Returns the entity when it became the new hover
    /// target.
    pub fn tick(&mut self, hit: Option<Entity>) -> Option<Entity> {
        if !self.is_active() {
            return None;
        }
        match hit {
            Some(entity) if self.hover == Some(entity) => None,
            Some(entity) => {
                self.clear_hover();
                self.hover = Some(entity);
                self.push(entity, InteractionKind::HoverStart);
                Some(entity)
            }
            None => {
                self.clear_hover();
                None
            }
        }
    }

    pub fn clear_hover(&mut self) {
        if let Some(entity) = self.hover.take() {
            self.push(entity, InteractionKind::HoverEnd);
        }
    }

    pub fn dispatch_primary(&mut self) -> bool {
        self.dispatch(InteractionKind::Primary)
    }

    pub fn dispatch_secondary(&mut self) -> bool {
        self.dispatch(InteractionKind::Secondary)
    }

    pub fn dispatch_key(&mut self, key: EffectKey) -> bool {
        self.dispatch(InteractionKind::Key(key))
    }

    /// Drop the binding to a destroyed entity without emitting events to it.
    pub fn forget(&mut self, entity: Entity) {
        if self.hover == Some(entity) {
            self.hover = None;
        }
        self.pending.retain(|event| event.target != entity);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.pending)
    }

    fn dispatch(&mut self, kind: InteractionKind) -> bool {
        let Some(target) = self.hover else {
            debug!("{kind:?} with nothing hovered");
            return false;
        };
        self.push(target, kind);
        true
    }

    fn push(&mut self, target: Entity, kind: InteractionKind) {
        self.pending.push(InteractionEvent { target, kind });
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub(crate) fn apply_initial_cursor(
    dispatcher: Res<InteractionDispatcher>,
    config: Res<FxConfig>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    let policy = CursorPolicy::for_mode(dispatcher.mode(), config.interaction.invert_cursor);
    for mut cursor in &mut cursors {
        policy.apply(&mut cursor);
    }
}

pub(crate) fn toggle_interaction_mode(
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<FxConfig>,
    mut dispatcher: ResMut<InteractionDispatcher>,
    mut cursors: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    if !keys.just_pressed(config.interaction.toggle_key) {
        return;
    }

    let mode = dispatcher.toggle_mode();
    info!("Interaction mode: {mode:?}");

    let policy = CursorPolicy::for_mode(mode, config.interaction.invert_cursor);
    for mut cursor in &mut cursors {
        policy.apply(&mut cursor);
    }
}

pub(crate) fn forget_destroyed_targets(
    mut removed: RemovedComponents<crate::effects::EffectHandle>,
    mut dispatcher: ResMut<InteractionDispatcher>,
) {
    for entity in removed.read() {
        dispatcher.forget(entity);
    }
}

pub(crate) fn update_hover(
    aim: Res<AimTarget>,
    mut dispatcher: ResMut<InteractionDispatcher>,
    mut registry: EffectRegistry,
    names: Query<&Name>,
) {
    let hit = aim.0.map(|hit| hit.entity);
    let Some(entity) = dispatcher.tick(hit) else {
        return;
    };

    match registry.get_or_create_default(entity) {
        RegistryEntry::Created(kind) => info!(
            "Added default {kind:?} effect to {}",
            crate::effects::material::display_name(entity, names.get(entity).ok())
        ),
        RegistryEntry::Existing(kind) => debug!("Hovering {entity} ({kind:?})"),
        RegistryEntry::Disabled => debug!("Hovering {entity} (no effect)"),
    }
}

pub(crate) fn dispatch_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    config: Res<FxConfig>,
    mut dispatcher: ResMut<InteractionDispatcher>,
) {
    if !dispatcher.is_active() {
        return;
    }

    let bindings = &config.interaction;
    if mouse.just_pressed(bindings.primary_button) {
        dispatcher.dispatch_primary();
    }
    if mouse.just_pressed(bindings.secondary_button) {
        dispatcher.dispatch_secondary();
    }
    if keys.just_pressed(bindings.key_a) {
        dispatcher.dispatch_key(EffectKey::A);
    }
    if keys.just_pressed(bindings.key_b) {
        dispatcher.dispatch_key(EffectKey::B);
    }
}

pub(crate) fn flush_interaction_events(
    mut dispatcher: ResMut<InteractionDispatcher>,
    mut events: MessageWriter<InteractionEvent>,
) {
    if dispatcher.pending.is_empty() {
        return;
    }
    events.write_batch(dispatcher.drain());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    fn active() -> InteractionDispatcher {
        let mut dispatcher = InteractionDispatcher::default();
        dispatcher.toggle_mode();
        dispatcher
    }

    fn kinds(events: &[InteractionEvent]) -> Vec<(Entity, InteractionKind)> {
        events.iter().map(|e| (e.target, e.kind)).collect()
    }

    #[test]
    fn idle_dispatcher_ignores_hits() {
        let (a, _) = entities();
        let mut dispatcher = InteractionDispatcher::default();
        assert_eq!(dispatcher.tick(Some(a)), None);
        assert!(!dispatcher.dispatch_primary());
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn hover_enters_once_and_exits_once() {
        let (a, _) = entities();
        let mut dispatcher = active();
        assert_eq!(dispatcher.tick(Some(a)), Some(a));
        assert_eq!(dispatcher.tick(Some(a)), None);
        assert_eq!(kinds(&dispatcher.drain()), vec![(a, InteractionKind::HoverStart)]);

        dispatcher.tick(None);
        dispatcher.tick(None);
        assert_eq!(kinds(&dispatcher.drain()), vec![(a, InteractionKind::HoverEnd)]);
        assert_eq!(dispatcher.hover(), None);
    }

    #[test]
    fn switching_targets_exits_before_entering() {
        let (a, b) = entities();
        let mut dispatcher = active();
        dispatcher.tick(Some(a));
        dispatcher.drain();
        assert_eq!(dispatcher.tick(Some(b)), Some(b));
        assert_eq!(
            kinds(&dispatcher.drain()),
            vec![(a, InteractionKind::HoverEnd), (b, InteractionKind::HoverStart)]
        );
    }

    #[test]
    fn leaving_active_mode_clears_hover() {
        let (a, _) = entities();
        let mut dispatcher = active();
        dispatcher.tick(Some(a));
        dispatcher.drain();
        assert_eq!(dispatcher.toggle_mode(), InteractionMode::Idle);
        assert_eq!(kinds(&dispatcher.drain()), vec![(a, InteractionKind::HoverEnd)]);
        dispatcher.clear_hover();
        assert!(dispatcher.drain().is_empty());
    }

    #[test]
    fn clicks_and_keys_go_to_hover_target() {
        let (a, _) = entities();
        let mut dispatcher = active();
        assert!(!dispatcher.dispatch_primary());
        assert!(!dispatcher.dispatch_key(EffectKey::A));
        assert!(dispatcher.drain().is_empty());

        dispatcher.tick(Some(a));
        dispatcher.drain();
        assert!(dispatcher.dispatch_primary());
        assert!(dispatcher.dispatch_secondary());
        assert!(dispatcher.dispatch_key(EffectKey::B));
        assert_eq!(
            kinds(&dispatcher.drain()),
            vec![
                (a, InteractionKind::Primary),
                (a, InteractionKind::Secondary),
                (a, InteractionKind::Key(EffectKey::B)),
            ]
        );
    }

    #[test]
    fn forget_drops_binding_silently() {
        let (a, b) = entities();
        let mut dispatcher = active();
        dispatcher.tick(Some(a));
        dispatcher.forget(a);
        assert_eq!(dispatcher.hover(), None);
        assert!(dispatcher.drain().is_empty());

        dispatcher.tick(Some(b));
        assert_eq!(kinds(&dispatcher.drain()), vec![(b, InteractionKind::HoverStart)]);
    }

    #[test]
    fn cursor_policy_follows_mode() {
        let active = CursorPolicy::for_mode(InteractionMode::Active, false);
        assert!(active.visible);
        assert_eq!(active.grab_mode, CursorGrabMode::None);

        let idle = CursorPolicy::for_mode(InteractionMode::Idle, false);
        assert!(!idle.visible);
        assert_eq!(idle.grab_mode, CursorGrabMode::Locked);

        assert_eq!(CursorPolicy::for_mode(InteractionMode::Idle, true), active);
    }
}
