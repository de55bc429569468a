//! Scene math tests: orbit periodicity, matrix derivations, bias mapping.

use glam::{Mat4, Vec3, Vec4};
use umbra_renderer::scene::{
    bias_matrix, frustum_rh, normal_matrix, orbit_angle_degrees, SceneState,
    LIGHT_BASE_POSITION, LIGHT_ORBIT_PERIOD_MS,
};

const EPSILON: f32 = 1e-5;

fn mat_approx(a: Mat4, b: Mat4, eps: f32) -> bool {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| (x - y).abs() < eps)
}

#[test]
fn orbit_angle_is_periodic() {
    for t in [0u64, 1, 999, 5_000, 11_999, 123_456_789] {
        assert_eq!(
            orbit_angle_degrees(t),
            orbit_angle_degrees(t + LIGHT_ORBIT_PERIOD_MS),
            "t = {t}"
        );
    }
}

#[test]
fn orbit_angle_advances_linearly() {
    assert_eq!(orbit_angle_degrees(0), 0.0);
    assert!((orbit_angle_degrees(3_000) - 90.0).abs() < EPSILON);
    assert!((orbit_angle_degrees(6_000) - 180.0).abs() < EPSILON);
    assert!(orbit_angle_degrees(11_999) < 360.0);
}

#[test]
fn normal_matrix_is_inverse_transpose() {
    // Non-uniform scale breaks naive MV application to normals; the inverse
    // transpose must still satisfy N^T * M == I.
    let mv = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
        * Mat4::from_rotation_y(0.7)
        * Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5));
    let n = normal_matrix(mv);
    assert!(mat_approx(n.transpose() * mv, Mat4::IDENTITY, EPSILON));
    assert!(mat_approx(n, mv.inverse().transpose(), EPSILON));
}

#[test]
fn symmetric_frustum_matches_perspective() {
    // left = -aspect, right = aspect, top = near * tan(45deg) = 1 is a
    // 90-degree vertical field of view.
    let aspect = 800.0 / 600.0;
    let frustum = frustum_rh(-aspect, aspect, -1.0, 1.0, 1.0, 1000.0);
    let perspective = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, aspect, 1.0, 1000.0);
    assert!(mat_approx(frustum, perspective, 1e-4));
}

#[test]
fn frustum_depth_maps_to_zero_one() {
    let m = frustum_rh(-1.0, 1.0, -1.0, 1.0, 1.0, 1000.0);
    let near = m * Vec4::new(0.0, 0.0, -1.0, 1.0);
    let far = m * Vec4::new(0.0, 0.0, -1000.0, 1.0);
    assert!((near.z / near.w).abs() < EPSILON);
    assert!((far.z / far.w - 1.0).abs() < 1e-3);
}

#[test]
fn bias_maps_clip_corners_to_texture_space() {
    let m = bias_matrix();
    let lower_left = m * Vec4::new(-1.0, -1.0, 0.25, 1.0);
    assert!((lower_left.x - 0.0).abs() < EPSILON);
    assert!((lower_left.y - 1.0).abs() < EPSILON);
    assert!((lower_left.z - 0.25).abs() < EPSILON);
    let upper_right = m * Vec4::new(1.0, 1.0, 0.75, 1.0);
    assert!((upper_right.x - 1.0).abs() < EPSILON);
    assert!((upper_right.y - 0.0).abs() < EPSILON);
    assert!((upper_right.z - 0.75).abs() < EPSILON);
}

#[test]
fn light_starts_at_base_position() {
    let state = SceneState::compute(0, (0.0, 0.0), 1.0);
    assert!((state.light_world - LIGHT_BASE_POSITION).length() < EPSILON);
}

#[test]
fn light_orbits_around_y() {
    // Quarter period: 90 degrees about +Y takes (3, 5, 0) to (0, 5, -3).
    let state = SceneState::compute(3_000, (0.0, 0.0), 1.0);
    let expected = Vec4::new(0.0, 5.0, -3.0, 1.0);
    assert!(
        (state.light_world - expected).length() < 1e-4,
        "got {:?}",
        state.light_world
    );
    // Height is constant over the whole orbit.
    for t in (0..12_000).step_by(500) {
        let s = SceneState::compute(t, (0.0, 0.0), 1.0);
        assert!((s.light_world.y - 5.0).abs() < 1e-4);
    }
}

#[test]
fn light_view_centers_the_light() {
    let state = SceneState::compute(4_321, (0.0, 0.0), 1.0);
    let eye = state.light_view * Vec4::new(state.light_world.x, state.light_world.y, state.light_world.z, 1.0);
    assert!(eye.truncate().length() < 1e-4, "light eye at {eye:?}");
}

#[test]
fn zero_rotation_keeps_static_and_dynamic_mvps_equal() {
    let state = SceneState::compute(1_000, (0.0, 0.0), 1.5);
    assert!(mat_approx(
        state.light_mvp_static,
        state.light_mvp_dynamic,
        EPSILON
    ));
    assert!(mat_approx(state.object_rotation, Mat4::IDENTITY, EPSILON));
}

#[test]
fn dynamic_mvp_folds_in_object_rotation() {
    let state = SceneState::compute(1_000, (30.0, -45.0), 1.5);
    assert!(mat_approx(
        state.light_mvp_dynamic,
        state.light_mvp_static * state.object_rotation,
        1e-4
    ));
    // X drag first (yaw about +Y), then Y drag (tilt about +X).
    let expected = Mat4::from_rotation_y(30f32.to_radians())
        * Mat4::from_rotation_x((-45f32).to_radians());
    assert!(mat_approx(state.object_rotation, expected, EPSILON));
}

#[test]
fn light_eye_is_view_transformed() {
    let state = SceneState::compute(2_500, (10.0, 20.0), 4.0 / 3.0);
    let expected = (state.view * state.light_world).truncate();
    assert!((state.light_eye() - expected).length() < EPSILON);
}
