use bevy::prelude::*;

/// Circles the entity around `target`'s vertical axis while looking at it.
#[derive(Component, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Entity,
    /// Degrees per second, positive is counter-clockwise seen from above
    pub speed_degrees: f32,
    pub paused: bool,
}

impl OrbitCamera {
    pub fn new(target: Entity, speed_degrees: f32) -> Self {
        Self {
            target,
            speed_degrees,
            paused: false,
        }
    }
}

/// Rotate `transform` by `angle` radians around the vertical axis through
/// `pivot`, then face the pivot.
pub fn orbit_step(transform: &mut Transform, pivot: Vec3, angle: f32) {
    transform.rotate_around(pivot, Quat::from_rotation_y(angle));
    transform.look_at(pivot, Vec3::Y);
}

pub(crate) fn orbit_cameras(
    time: Res<Time>,
    targets: Query<&GlobalTransform>,
    mut orbiters: Query<(&OrbitCamera, &mut Transform)>,
) {
    for (orbit, mut transform) in &mut orbiters {
        if orbit.paused {
            continue;
        }
        let Ok(target) = targets.get(orbit.target) else {
            continue;
        };
        let angle = orbit.speed_degrees.to_radians() * time.delta_secs();
        orbit_step(&mut transform, target.translation(), angle);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn orbit_keeps_radius_and_faces_pivot() {
        let pivot = Vec3::new(1.0, 0.0, 1.0);
        let mut transform = Transform::from_xyz(1.0, 2.0, 6.0);
        orbit_step(&mut transform, pivot, FRAC_PI_2);

        assert!((transform.translation - Vec3::new(6.0, 2.0, 1.0)).length() < 1e-4);
        let to_pivot = (pivot - transform.translation).normalize();
        assert!(transform.forward().dot(to_pivot) > 0.9999);
    }

    #[test]
    fn missing_target_is_skipped() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, orbit_cameras);
        let gone = app.world_mut().spawn_empty().id();
        app.world_mut().despawn(gone);
        let camera = app
            .world_mut()
            .spawn((OrbitCamera::new(gone, 90.0), Transform::from_xyz(0.0, 0.0, 5.0)))
            .id();
        app.update();
        app.update();
        assert_eq!(
            app.world().get::<Transform>(camera).unwrap().translation,
            Vec3::new(0.0, 0.0, 5.0)
        );
    }
}
