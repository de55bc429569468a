//! Per-frame scene state: light orbit, camera matrices and the light-space
//! MVPs shared between the depth and lit passes. Pure math, recomputed from
//! scratch every frame; nothing here touches the GPU.

use glam::{Mat4, Vec3, Vec4};

/// Base light position in model space, orbited about +Y.
pub const LIGHT_BASE_POSITION: Vec4 = Vec4::new(3.0, 5.0, 0.0, 1.0);

/// One full light orbit takes this long.
pub const LIGHT_ORBIT_PERIOD_MS: u64 = 12_000;

const CAMERA_EYE: Vec3 = Vec3::new(0.0, 3.0, 5.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 0.0, -5.0);
const NEAR: f32 = 1.0;
const FAR: f32 = 1000.0;

/// The light frustum is slightly wider than the camera frustum so casters
/// near the view edges still land on the shadow map.
const LIGHT_FRUSTUM_SCALE: f32 = 1.1;

/// Light orbit angle in degrees for a given elapsed time; wraps every
/// [`LIGHT_ORBIT_PERIOD_MS`].
pub fn orbit_angle_degrees(elapsed_ms: u64) -> f32 {
    (360.0 / LIGHT_ORBIT_PERIOD_MS as f32) * (elapsed_ms % LIGHT_ORBIT_PERIOD_MS) as f32
}

/// Normal matrix for a model-view matrix: transpose of the inverse. Normals
/// transform covariantly, so applying MV directly breaks under non-orthogonal
/// transforms.
pub fn normal_matrix(mv: Mat4) -> Mat4 {
    mv.inverse().transpose()
}

/// Off-axis perspective frustum, right-handed, depth mapped to [0, 1]
/// (wgpu clip conventions).
pub fn frustum_rh(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let two_n = 2.0 * near;
    Mat4::from_cols(
        Vec4::new(two_n / (right - left), 0.0, 0.0, 0.0),
        Vec4::new(0.0, two_n / (top - bottom), 0.0, 0.0),
        Vec4::new(
            (right + left) / (right - left),
            (top + bottom) / (top - bottom),
            far / (near - far),
            -1.0,
        ),
        Vec4::new(0.0, 0.0, near * far / (near - far), 0.0),
    )
}

/// Clip-space xy [-1, 1] to texture space [0, 1], y flipped into texture
/// rows; z passes through since wgpu depth is already [0, 1].
pub fn bias_matrix() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.5, 0.0, 0.0, 0.0),
        Vec4::new(0.0, -0.5, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.5, 0.5, 0.0, 1.0),
    )
}

/// All transforms consumed by the two passes, derived once per frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneState {
    /// Light position in world space after the orbit rotation.
    pub light_world: Vec4,
    pub light_view: Mat4,
    pub light_proj: Mat4,
    pub view: Mat4,
    pub proj: Mat4,
    /// Accumulated touch rotation applied to the dynamic mesh.
    pub object_rotation: Mat4,
    /// Light-space MVP for the static plane, captured for the depth pass and
    /// reused by the lit pass shadow lookup.
    pub light_mvp_static: Mat4,
    /// Same, with the object rotation folded in, for the dynamic mesh.
    pub light_mvp_dynamic: Mat4,
}

impl SceneState {
    /// Derive the frame's transforms from elapsed wall-clock time, the two
    /// externally accumulated rotation angles (degrees) and the surface
    /// aspect ratio.
    pub fn compute(elapsed_ms: u64, rotation_deg: (f32, f32), aspect: f32) -> Self {
        let orbit = Mat4::from_rotation_y(orbit_angle_degrees(elapsed_ms).to_radians());
        let light_world = orbit * LIGHT_BASE_POSITION;
        let (lx, ly, lz) = (light_world.x, light_world.y, light_world.z);

        // The light looks straight down at the point below itself; the up
        // vector leans back along the orbit radius to keep the basis stable.
        let light_view = Mat4::look_at_rh(
            Vec3::new(lx, ly, lz),
            Vec3::new(lx, -ly, lz),
            Vec3::new(-lx, 0.0, -lz),
        );

        let view = Mat4::look_at_rh(CAMERA_EYE, CAMERA_TARGET, Vec3::Y);
        let proj = frustum_rh(-aspect, aspect, -1.0, 1.0, NEAR, FAR);
        let s = LIGHT_FRUSTUM_SCALE;
        let light_proj = frustum_rh(-aspect * s, aspect * s, -s, s, NEAR, FAR);

        // X drag yaws about +Y, Y drag tilts about +X, composed in that order.
        let object_rotation = Mat4::from_rotation_y(rotation_deg.0.to_radians())
            * Mat4::from_rotation_x(rotation_deg.1.to_radians());

        let light_vp = light_proj * light_view;
        Self {
            light_world,
            light_view,
            light_proj,
            view,
            proj,
            object_rotation,
            light_mvp_static: light_vp,
            light_mvp_dynamic: light_vp * object_rotation,
        }
    }

    /// Light position in eye space, as consumed by the lit fragment stage.
    pub fn light_eye(&self) -> Vec3 {
        (self.view * self.light_world).truncate()
    }
}
