//! Gizmo demo entry point
//!
//! Drives the gizmo with a scripted pointer sequence against an in-memory
//! scene and logs what happens. Pass a RON config path as the first
//! argument to override the defaults.

use glam::{Vec2, Vec3};
use gz_core::constants::handle;
use gz_core::{Aabb, GizmoConfig, PointerButton, Scene, TargetId, TargetScene, ToolModes, Transform};
use gz_gizmo::{Camera, Gizmo, GizmoCamera, InstanceRecorder};

type DemoGizmo = Gizmo<InstanceRecorder>;

fn main() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gz_demo=info,gz_gizmo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting gizmo demo");

    let config = match std::env::args().nth(1) {
        Some(path) => GizmoConfig::load(&path).unwrap_or_else(|e| {
            tracing::error!("Failed to load config {}: {}", path, e);
            GizmoConfig::default()
        }),
        None => GizmoConfig::default(),
    };

    let mut scene = Scene::new();
    let crate_id = scene.add_node("crate", Transform::IDENTITY);
    scene.set_bounds(crate_id, Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5)));
    let shelf = scene.add_node("shelf", Transform::from_translation(Vec3::new(3.0, 0.0, -1.0)));
    let barrel = scene.add_child(shelf, "barrel", Transform::from_translation(Vec3::Y));
    scene.set_bounds(barrel, Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 0.8, 0.3)));

    let mut camera = Camera::looking_at(Vec3::new(4.0, 3.0, 8.0), Vec3::ZERO, Vec2::new(1280.0, 720.0));
    let recorder = InstanceRecorder::new(
        config.colors.clone(),
        config.selection_box_color,
        config.opacity,
    );
    let mut gizmo = Gizmo::with_renderer(config, recorder);

    // Move the crate two units along X
    gizmo.select(&scene, crate_id);
    gizmo.update(&scene, &camera);
    let placement = *gizmo.placement();
    let arrow = placement.origin
        + placement.axis(0) * placement.scale * (handle::ARROW_OFFSET + handle::ARROW_SIZE * 0.5);
    drag(&mut gizmo, &mut scene, &camera, arrow, arrow + Vec3::X * 2.0);
    log_target(&scene, "crate", crate_id);

    // Rotate both objects a quarter turn around the shared Y ring
    gizmo.select(&scene, barrel);
    gizmo.update(&scene, &camera);
    let placement = *gizmo.placement();
    let radius = placement.scale * handle::CIRCLE_SIZE;
    let toward_camera = (camera.position - placement.origin) * Vec3::new(1.0, 0.0, 1.0);
    let start = placement.origin + toward_camera.normalize_or_zero() * radius;
    let end = placement.origin
        + glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2) * (start - placement.origin);
    drag(&mut gizmo, &mut scene, &camera, start, end);
    log_target(&scene, "crate", crate_id);
    log_target(&scene, "barrel", barrel);

    // Snapped scale on the barrel alone
    gizmo.deselect(crate_id);
    gizmo.set_modes(ToolModes::SCALE);
    gizmo.update(&scene, &camera);
    gizmo.on_modifier_changed(true, false);
    let placement = *gizmo.placement();
    let cube = placement.origin + placement.axis(1) * placement.scale * handle::SCALE_OFFSET;
    drag(&mut gizmo, &mut scene, &camera, cube, cube + Vec3::Y * placement.scale);
    gizmo.on_modifier_changed(false, false);
    log_target(&scene, "barrel", barrel);

    // The handles keep their on-screen size while the camera moves
    camera.orbit(0.4, 0.1);
    camera.zoom(-3.0);
    gizmo.update(&scene, &camera);
    tracing::info!(
        "After orbit: gizmo scale {:.3}, {} visible instances ({} bytes)",
        gizmo.placement().scale,
        gizmo.renderer().instances().len(),
        gizmo.renderer().instance_bytes().len()
    );

    gizmo.clear_selection();
    tracing::info!("Demo finished");
}

/// Press at `from`, drag to `to` in a few steps, release
fn drag(gizmo: &mut DemoGizmo, scene: &mut Scene, camera: &Camera, from: Vec3, to: Vec3) {
    let start = camera.world_to_screen(from);
    gizmo.on_pointer_move(scene, camera, start, false);
    gizmo.on_pointer_down(&*scene, camera, start, PointerButton::Left);

    if !gizmo.is_editing() {
        tracing::warn!("No handle under {:?}", start);
        return;
    }
    tracing::info!("Grabbed {:?}", gizmo.hovered());

    const STEPS: usize = 4;
    for step in 1..=STEPS {
        let t = step as f32 / STEPS as f32;
        let pos = camera.world_to_screen(from.lerp(to, t));
        gizmo.on_pointer_move(scene, camera, pos, true);
        tracing::info!("{}", gizmo.message());
    }

    gizmo.on_pointer_up(PointerButton::Left);
    for event in gizmo.drain_events() {
        tracing::debug!("{} event: {:?}", event.mode(), event);
    }
}

fn log_target(scene: &Scene, name: &str, id: TargetId) {
    if let Some(t) = scene.global_transform(id) {
        tracing::info!(
            "{}: origin ({:.3}, {:.3}, {:.3}), det {:.3}",
            name,
            t.origin.x,
            t.origin.y,
            t.origin.z,
            t.determinant()
        );
    }
}
