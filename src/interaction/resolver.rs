//! Aim ray construction and hit resolution.

use avian3d::prelude::*;
use bevy::camera::primitives::Aabb;
use bevy::ecs::system::SystemParam;
use bevy::math::Vec3A;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_fragments::{Fragment, SourceBounds};
use serde::{Deserialize, Serialize};

use super::dispatcher::InteractionDispatcher;
use super::{AimRay, AimTarget, InteractionCamera, InteractionIgnored};
use crate::config::FxConfig;
use crate::effects::EffectHandle;

/// Where the aim ray leaves the camera.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AimSource {
    /// Through the mouse cursor
    #[default]
    Cursor,
    /// Through the middle of the viewport (crosshair)
    ViewportCenter,
}

/// The resolved object under the aim ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetHit {
    /// Effect owner: the nearest ancestor with an [`EffectHandle`], or the
    /// collider entity itself
    pub entity: Entity,
    pub collider: Entity,
    pub point: Vec3,
    pub distance: f32,
    /// World-space mesh bounds of `entity`
    pub bounds: Option<SourceBounds>,
}

/// World-space box enclosing a local `Aabb` under `transform`.
pub fn world_bounds(aabb: &Aabb, transform: &GlobalTransform) -> SourceBounds {
    let affine = transform.affine();
    let m = affine.matrix3;
    let abs = bevy::math::Mat3A::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs());
    let half: Vec3A = abs * aabb.half_extents;
    let center = affine.transform_point3a(aabb.center);
    SourceBounds::new(center.into(), half.into())
}

/// Walk up the hierarchy from `entity` to the first entity `owns` accepts.
/// Falls back to `entity` itself.
pub fn find_owner(
    entity: Entity,
    owns: impl Fn(Entity) -> bool,
    parent_of: impl Fn(Entity) -> Option<Entity>,
) -> Entity {
    let mut current = entity;
    loop {
        if owns(current) {
            return current;
        }
        match parent_of(current) {
            Some(parent) => current = parent,
            None => return entity,
        }
    }
}

/// Read-only raycast against colliders, resolved to effect owners.
#[derive(SystemParam)]
pub struct TargetResolver<'w, 's> {
    spatial_query: SpatialQuery<'w, 's>,
    ignored: Query<'w, 's, (), Or<(With<InteractionIgnored>, With<Fragment>)>>,
    visibility: Query<'w, 's, &'static InheritedVisibility>,
    handles: Query<'w, 's, (), With<EffectHandle>>,
    parents: Query<'w, 's, &'static ChildOf>,
    bounds: Query<'w, 's, (&'static Aabb, &'static GlobalTransform)>,
}

impl TargetResolver<'_, '_> {
    /// Nearest hit within `max_distance` on colliders in `mask`.
    pub fn resolve(
        &self,
        origin: Vec3,
        direction: Dir3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<TargetHit> {
        let filter = SpatialQueryFilter::from_mask(mask);
        let hit = self.spatial_query.cast_ray_predicate(
            origin,
            direction,
            max_distance,
            true,
            &filter,
            &|entity| self.is_targetable(entity),
        )?;

        let entity = find_owner(
            hit.entity,
            |e| self.handles.contains(e),
            |e| self.parents.get(e).ok().map(|child_of| child_of.parent()),
        );

        Some(TargetHit {
            entity,
            collider: hit.entity,
            point: origin + *direction * hit.distance,
            distance: hit.distance,
            bounds: self
                .bounds
                .get(entity)
                .ok()
                .map(|(aabb, transform)| world_bounds(aabb, transform)),
        })
    }

    fn is_targetable(&self, entity: Entity) -> bool {
        if self.ignored.contains(entity) {
            return false;
        }
        self.visibility
            .get(entity)
            .map_or(true, |visibility| visibility.get())
    }
}

pub(crate) fn update_aim_ray(
    dispatcher: Res<InteractionDispatcher>,
    config: Res<FxConfig>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<InteractionCamera>>,
    mut aim: ResMut<AimRay>,
    mut warned: Local<bool>,
) {
    if !dispatcher.is_active() {
        aim.0 = None;
        return;
    }

    let Ok((camera, camera_transform)) = cameras.single() else {
        if !*warned {
            warn!("No single InteractionCamera found; aiming is disabled");
            *warned = true;
        }
        aim.0 = None;
        return;
    };

    let point = match config.interaction.aim {
        AimSource::Cursor => windows.single().ok().and_then(Window::cursor_position),
        AimSource::ViewportCenter => camera.logical_viewport_size().map(|size| size / 2.0),
    };

    aim.0 = point.and_then(|point| camera.viewport_to_world(camera_transform, point).ok());
}

pub(crate) fn resolve_aim_target(
    dispatcher: Res<InteractionDispatcher>,
    config: Res<FxConfig>,
    aim: Res<AimRay>,
    resolver: TargetResolver,
    mut target: ResMut<AimTarget>,
) {
    let hit = match (dispatcher.is_active(), aim.0) {
        (true, Some(ray)) => resolver.resolve(
            ray.origin,
            ray.direction,
            config.interaction.max_distance,
            LayerMask(config.interaction.layer_mask),
        ),
        _ => None,
    };

    if target.0 != hit {
        target.0 = hit;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn owner_is_nearest_ancestor_with_handle() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let middle = world.spawn_empty().id();
        let leaf = world.spawn_empty().id();
        let parents = HashMap::from([(leaf, middle), (middle, root)]);

        let parent_of = |e: Entity| parents.get(&e).copied();
        assert_eq!(find_owner(leaf, |e| e == root, parent_of), root);
        assert_eq!(find_owner(leaf, |e| e == middle || e == root, parent_of), middle);
        assert_eq!(find_owner(leaf, |_| false, parent_of), leaf);
        assert_eq!(find_owner(root, |e| e == root, parent_of), root);
    }

    #[test]
    fn world_bounds_follow_translation_and_scale() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 2.0, 1.0));
        let transform = GlobalTransform::from(
            Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)),
        );
        let bounds = world_bounds(&aabb, &transform);
        assert!((bounds.center - Vec3::new(5.0, 2.0, 0.0)).length() < 1e-5);
        assert!((bounds.half_extents - Vec3::splat(2.0)).length() < 1e-5);
    }

    #[test]
    fn world_bounds_grow_under_rotation() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, -0.5, -0.5), Vec3::new(1.0, 0.5, 0.5));
        let transform = GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_y(
            std::f32::consts::FRAC_PI_2,
        )));
        let bounds = world_bounds(&aabb, &transform);
        assert!((bounds.half_extents - Vec3::new(0.5, 0.5, 1.0)).length() < 1e-5);
    }
}
