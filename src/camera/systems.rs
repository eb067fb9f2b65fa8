use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::input::mouse::MouseScrollUnit;
use bevy::post_process::bloom::{Bloom, BloomCompositeMode};
use bevy::prelude::*;
use bevy::render::view::Hdr;

use super::ViewConfig;
use super::entities::{CameraInput, MapCamera};

/// Eye transform for a camera looking at `focus` from `height`.
pub fn camera_pose(focus: Vec2, height: f32, tilt: f32) -> Transform {
    let target = Vec3::new(focus.x, 0.0, focus.y);
    Transform::from_translation(target + Vec3::new(0.0, height, height * tilt))
        .looking_at(target, Vec3::Y)
}

/// Spawns the Camera3d entity with HDR, bloom and the [`MapCamera`] marker.
pub fn spawn_camera(mut commands: Commands, cfg: Res<ViewConfig>) {
    commands.spawn((
        Name::new("MapCamera"),
        Camera3d::default(),
        Hdr,
        Tonemapping::TonyMcMapface,
        Bloom {
            intensity: cfg.bloom_intensity,
            composite_mode: BloomCompositeMode::Additive,
            ..Bloom::NATURAL
        },
        camera_pose(Vec2::ZERO, cfg.start_height, cfg.tilt),
        MapCamera {
            focus: Vec2::ZERO,
            height: cfg.start_height,
        },
    ));
}

/// WASD / arrows pan the focus point, the wheel zooms. Pan speed scales
/// with height so the map moves at the same screen speed at every zoom.
pub fn pan_and_zoom(mut input: CameraInput, mut query: Query<(&mut Transform, &mut MapCamera)>) {
    let Ok((mut transform, mut camera)) = query.single_mut() else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if input.keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        direction.y -= 1.0;
    }
    if input.keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        direction.y += 1.0;
    }
    if input.keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        direction.x -= 1.0;
    }
    if input.keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        direction.x += 1.0;
    }

    let mut lines = 0.0;
    for ev in input.scroll.read() {
        lines += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
    }
    // The panel scrolls its own content.
    if input.ui.pointer_over_panel {
        lines = 0.0;
    }

    if direction == Vec2::ZERO && lines == 0.0 {
        return;
    }

    let cfg = &input.cfg;
    if direction != Vec2::ZERO {
        let speed = cfg.pan_speed * camera.height / 10.0;
        camera.focus += direction.normalize() * speed * input.time.delta_secs();
    }
    if lines != 0.0 {
        let factor = (1.0 - cfg.zoom_step).powf(lines);
        camera.height = (camera.height * factor).clamp(cfg.min_height, cfg.max_height);
    }
    *transform = camera_pose(camera.focus, camera.height, cfg.tilt);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_looks_at_the_focus_point() {
        let pose = camera_pose(Vec2::new(4.0, -2.0), 10.0, 0.5);
        assert!((pose.translation - Vec3::new(4.0, 10.0, 3.0)).length() < 1e-5);
        let target = Vec3::new(4.0, 0.0, -2.0);
        let ahead = pose.translation + pose.forward() * pose.translation.distance(target);
        assert!((ahead - target).length() < 1e-3);
    }

    #[test]
    fn tilt_moves_the_eye_back() {
        let steep = camera_pose(Vec2::ZERO, 20.0, 0.2);
        let shallow = camera_pose(Vec2::ZERO, 20.0, 1.0);
        assert!(shallow.translation.z > steep.translation.z);
        assert_eq!(steep.translation.y, 20.0);
    }
}
