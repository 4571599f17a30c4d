//! Showcase scene: a ring of objects, one per effect, plus a carousel.
//!
//! Press `M` to start interacting, then hover and click.

use avian3d::prelude::*;
use bevy::post_process::bloom::Bloom;
use bevy::post_process::effect_stack::ChromaticAberration;
use bevy::prelude::*;
use bevy::render::view::Hdr;
use bevy_egui::EguiPlugin;
use bevy_hologram_fx::hud::HologramHudPlugin;
use bevy_hologram_fx::{
    EffectHandle, EffectKind, FxConfig, HologramFxPlugin, InteractionCamera, InteractionIgnored,
    OrbitCamera, SelectionCycle,
};

const RING_RADIUS: f32 = 3.5;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hologram FX Showcase".to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(PhysicsPlugins::default())
        .add_plugins(HologramFxPlugin::default())
        .add_plugins(HologramHudPlugin)
        .add_systems(Startup, (setup_lighting, setup_scene))
        .add_systems(Update, toggle_orbit)
        .run();
}

fn setup_lighting(mut commands: Commands) {
    commands.spawn(AmbientLight {
        color: Color::WHITE,
        brightness: 250.0,
        affects_lightmapped_meshes: true,
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

struct Showpiece {
    name: &'static str,
    mesh: Mesh,
    collider: Collider,
    color: Color,
    effect: Option<EffectKind>,
}

fn showpieces() -> Vec<Showpiece> {
    vec![
        Showpiece {
            name: "Glitch Cube",
            mesh: Cuboid::new(1.0, 1.0, 1.0).into(),
            collider: Collider::cuboid(1.0, 1.0, 1.0),
            color: Color::srgb(0.2, 0.7, 0.9),
            effect: Some(EffectKind::Highlight),
        },
        Showpiece {
            name: "Fragile Sphere",
            mesh: Sphere::new(0.6).mesh().uv(32, 18),
            collider: Collider::sphere(0.6),
            color: Color::srgb(0.9, 0.4, 0.2),
            effect: Some(EffectKind::Disintegrate),
        },
        Showpiece {
            name: "Visualizer Column",
            mesh: Cylinder::new(0.5, 1.2).into(),
            collider: Collider::cylinder(0.5, 1.2),
            color: Color::srgb(0.6, 0.3, 0.9),
            effect: Some(EffectKind::Visualizer),
        },
        Showpiece {
            name: "Tint Capsule",
            mesh: Capsule3d::new(0.4, 0.8).into(),
            collider: Collider::capsule(0.4, 0.8),
            color: Color::srgb(0.8, 0.8, 0.8),
            effect: Some(EffectKind::Tint),
        },
        Showpiece {
            name: "Fragile Crate",
            mesh: Cuboid::new(0.9, 0.9, 0.9).into(),
            collider: Collider::cuboid(0.9, 0.9, 0.9),
            color: Color::srgb(0.75, 0.6, 0.35),
            effect: Some(EffectKind::Disintegrate),
        },
        // Gets the default effect on first hover.
        Showpiece {
            name: "Plain Block",
            mesh: Cuboid::new(0.6, 1.4, 0.6).into(),
            collider: Collider::cuboid(0.6, 1.4, 0.6),
            color: Color::srgb(0.4, 0.8, 0.4),
            effect: None,
        },
    ]
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<FxConfig>,
) {
    let pivot = commands
        .spawn((Name::new("Orbit Pivot"), Transform::from_xyz(0.0, 0.5, 0.0)))
        .id();

    commands.spawn((
        Name::new("Camera"),
        Camera3d::default(),
        Hdr,
        InteractionCamera,
        OrbitCamera::new(pivot, 6.0),
        ChromaticAberration::default(),
        Bloom::NATURAL,
        Transform::from_xyz(0.0, 4.0, 10.0).looking_at(Vec3::new(0.0, 0.5, 0.0), Vec3::Y),
    ));

    commands.spawn((
        Name::new("Floor"),
        InteractionIgnored,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(30.0, 30.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.12, 0.13, 0.16),
            perceptual_roughness: 0.9,
            ..default()
        })),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
    ));

    let pieces = showpieces();
    let count = pieces.len() as f32;
    for (i, piece) in pieces.into_iter().enumerate() {
        let angle = i as f32 / count * std::f32::consts::TAU;
        let position = Vec3::new(angle.cos() * RING_RADIUS, 0.8, angle.sin() * RING_RADIUS);
        let mut entity = commands.spawn((
            Name::new(piece.name),
            Mesh3d(meshes.add(piece.mesh)),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: piece.color,
                perceptual_roughness: 0.4,
                ..default()
            })),
            Transform::from_translation(position),
            RigidBody::Static,
            piece.collider,
        ));
        if let Some(kind) = piece.effect {
            entity.insert(EffectHandle::from_kind(kind, &config));
        }
    }

    spawn_carousel(&mut commands, &mut meshes, &mut materials, &config);
}

/// Three disintegrating objects on a pedestal, shown one at a time.
fn spawn_carousel(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    config: &FxConfig,
) {
    let center = Vec3::new(0.0, 0.0, 0.0);
    commands.spawn((
        Name::new("Pedestal"),
        InteractionIgnored,
        Mesh3d(meshes.add(Cylinder::new(0.8, 0.3))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.3, 0.35))),
        Transform::from_translation(center + Vec3::Y * 0.15),
        RigidBody::Static,
        Collider::cylinder(0.8, 0.3),
    ));

    let shapes: [(&str, Mesh, Collider, Color); 3] = [
        (
            "Carousel Cube",
            Cuboid::new(0.7, 0.7, 0.7).into(),
            Collider::cuboid(0.7, 0.7, 0.7),
            Color::srgb(0.9, 0.2, 0.5),
        ),
        (
            "Carousel Sphere",
            Sphere::new(0.45).mesh().uv(32, 18),
            Collider::sphere(0.45),
            Color::srgb(0.2, 0.9, 0.6),
        ),
        (
            "Carousel Cone",
            Cone::new(0.45, 0.9).into(),
            Collider::cone(0.45, 0.9),
            Color::srgb(0.95, 0.8, 0.2),
        ),
    ];

    let objects = shapes
        .into_iter()
        .map(|(name, mesh, collider, color)| {
            commands
                .spawn((
                    Name::new(name),
                    Mesh3d(meshes.add(mesh)),
                    MeshMaterial3d(materials.add(color)),
                    Transform::from_translation(center + Vec3::Y * 0.8),
                    Visibility::Hidden,
                    RigidBody::Static,
                    collider,
                    EffectHandle::from_kind(EffectKind::Disintegrate, config),
                ))
                .id()
        })
        .collect();

    commands.spawn((Name::new("Carousel"), SelectionCycle::new(objects)));
}

fn toggle_orbit(keys: Res<ButtonInput<KeyCode>>, mut orbits: Query<&mut OrbitCamera>) {
    if !keys.just_pressed(KeyCode::KeyO) {
        return;
    }
    for mut orbit in &mut orbits {
        orbit.paused = !orbit.paused;
        info!("Camera orbit {}", if orbit.paused { "paused" } else { "resumed" });
    }
}
