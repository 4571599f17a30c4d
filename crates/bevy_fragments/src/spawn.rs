//! World-side systems: turn planned fragments into Avian rigid bodies and
//! despawn them when their lifetime runs out.

use avian3d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::burst::{FragmentSpec, SpawnFragments, plan_burst};

/// Marker for debris bodies spawned by [`spawn_fragments`].
#[derive(Component)]
pub struct Fragment;

/// Self-destruct countdown carried by every fragment.
#[derive(Component, Debug)]
pub struct FragmentLifetime {
    /// Seconds left before the fragment is despawned
    pub remaining: f32,
}

impl FragmentLifetime {
    pub fn from_seconds(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
        }
    }
}

/// Random source used for burst planning. Replace it with a seeded generator
/// for reproducible bursts.
#[derive(Resource)]
pub struct FragmentRng(pub fastrand::Rng);

impl Default for FragmentRng {
    fn default() -> Self {
        Self(fastrand::Rng::new())
    }
}

/// Cached mesh and per-color material handles shared by all fragments.
#[derive(Resource, Default)]
pub struct FragmentAssets {
    pub mesh: Option<Handle<Mesh>>,
    pub materials: HashMap<u64, Handle<StandardMaterial>>,
}

/// Spawn one rigid body per planned fragment for every queued burst.
pub fn spawn_fragments(
    mut commands: Commands,
    mut bursts: MessageReader<SpawnFragments>,
    mut rng: ResMut<FragmentRng>,
    mut assets: ResMut<FragmentAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for burst in bursts.read() {
        let specs = plan_burst(burst, &mut rng.0);
        if specs.is_empty() {
            continue;
        }

        let mesh = assets
            .mesh
            .get_or_insert_with(|| meshes.add(Cuboid::from_size(Vec3::ONE)))
            .clone();

        for spec in &specs {
            let material = get_or_create_color_material(&mut assets, &mut materials, spec.color);
            spawn_fragment(&mut commands, spec, mesh.clone(), material, burst);
        }

        debug!(
            "Spawned {} fragments around {:?}",
            specs.len(),
            burst.bounds.center
        );
    }
}

fn spawn_fragment(
    commands: &mut Commands,
    spec: &FragmentSpec,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    burst: &SpawnFragments,
) {
    commands.spawn((
        Fragment,
        FragmentLifetime::from_seconds(spec.lifetime),
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::from_translation(spec.position)
            .with_rotation(spec.rotation)
            .with_scale(Vec3::splat(spec.scale)),
        RigidBody::Dynamic,
        Collider::cuboid(1.0, 1.0, 1.0),
        Mass(spec.mass),
        LinearDamping(burst.config.drag),
        GravityScale(burst.config.gravity_scale),
        // Avian has no one-shot impulse component; apply the velocity change directly.
        LinearVelocity(spec.initial_velocity()),
    ));
}

/// Tick fragment lifetimes and despawn the expired ones.
pub fn expire_fragments(
    mut commands: Commands,
    time: Res<Time>,
    mut fragments: Query<(Entity, &mut FragmentLifetime)>,
) {
    let dt = time.delta_secs();
    for (entity, mut lifetime) in &mut fragments {
        lifetime.remaining -= dt;
        if lifetime.remaining <= 0.0 {
            commands.entity(entity).try_despawn();
        }
    }
}

fn get_or_create_color_material(
    assets: &mut FragmentAssets,
    materials: &mut Assets<StandardMaterial>,
    color: Color,
) -> Handle<StandardMaterial> {
    let linear = color.to_linear();
    let key = linear.red.to_bits() as u64
        ^ (linear.green.to_bits() as u64).rotate_left(16)
        ^ (linear.blue.to_bits() as u64).rotate_left(32)
        ^ (linear.alpha.to_bits() as u64).rotate_left(48);

    assets
        .materials
        .entry(key)
        .or_insert_with(|| {
            materials.add(StandardMaterial {
                base_color: color,
                emissive: linear * 0.5,
                ..default()
            })
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::burst::{FragmentColor, FragmentConfig, SourceBounds};

    #[test]
    fn fragments_despawn_after_lifetime() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_systems(Update, expire_fragments);

        let short = app
            .world_mut()
            .spawn((Fragment, FragmentLifetime::from_seconds(0.25)))
            .id();
        let long = app
            .world_mut()
            .spawn((Fragment, FragmentLifetime::from_seconds(10.0)))
            .id();

        // First update has a zero delta; two more only reach 0.2s.
        for _ in 0..3 {
            app.update();
        }
        assert!(app.world().get_entity(short).is_ok());

        for _ in 0..3 {
            app.update();
        }
        assert!(app.world().get_entity(short).is_err());
        assert!(app.world().get_entity(long).is_ok());
    }

    fn burst_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .add_plugins(crate::FragmentsPlugin)
            .insert_resource(FragmentRng(fastrand::Rng::with_seed(7)));
        app
    }

    fn burst(count: u32) -> SpawnFragments {
        SpawnFragments {
            count,
            bounds: SourceBounds::new(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(0.5)),
            color: FragmentColor::Inherit(Color::srgb(0.8, 0.3, 0.1)),
            config: FragmentConfig {
                mass: 0.2,
                explosion_force: 1.0,
                drag: 0.7,
                gravity_scale: 0.5,
                lifetime: 4.0,
                lifetime_jitter: 0.0,
                ..default()
            },
        }
    }

    fn fragment_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Fragment>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn empty_burst_spawns_nothing() {
        let mut app = burst_app();
        app.world_mut().write_message(burst(0));
        app.update();

        assert_eq!(fragment_count(&mut app), 0);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 0);
        assert!(app.world().resource::<FragmentAssets>().mesh.is_none());
    }

    #[test]
    fn burst_spawns_one_body_per_fragment() {
        let mut app = burst_app();
        app.world_mut().write_message(burst(12));
        app.update();

        let mut fragments = app.world_mut().query_filtered::<(
            &Mass,
            &LinearDamping,
            &GravityScale,
            &LinearVelocity,
            &FragmentLifetime,
            &RigidBody,
        ), With<Fragment>>();
        let mut seen = 0;
        for (mass, damping, gravity, velocity, lifetime, body) in fragments.iter(app.world()) {
            seen += 1;
            assert_eq!(mass.0, 0.2);
            assert_eq!(damping.0, 0.7);
            assert_eq!(gravity.0, 0.5);
            assert!(matches!(body, RigidBody::Dynamic));
            // |impulse| == force, so |v| * mass == force.
            assert!((velocity.0.length() * mass.0 - 1.0).abs() < 1e-4);
            assert_eq!(lifetime.remaining, 4.0);
        }
        assert_eq!(seen, 12);

        // One shared cube mesh and one material for the inherited color.
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        assert_eq!(app.world().resource::<Assets<StandardMaterial>>().len(), 1);

        app.world_mut().write_message(burst(5));
        app.update();
        assert_eq!(fragment_count(&mut app), 17);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
    }

    #[test]
    fn zero_lifetime_expires_on_first_tick() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, expire_fragments);
        let entity = app
            .world_mut()
            .spawn((Fragment, FragmentLifetime::from_seconds(0.0)))
            .id();
        app.update();
        assert!(app.world().get_entity(entity).is_err());
    }
}
