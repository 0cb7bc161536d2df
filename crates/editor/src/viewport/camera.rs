use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;
use super::projection::{self, Viewport};

/// Arc-ball camera for the 3D viewport. The orbit controller that drives
/// yaw/pitch/distance lives outside the engine; the editor only consumes
/// the view and projection matrices and toggles whether the controller is
/// allowed to run.
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 10.0,
            target: Vec3::ZERO,
            fov: 40.0_f32.to_radians(),
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 200.0);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 500.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, vp: &Viewport) -> Mat4 {
        self.projection_matrix(vp.aspect()) * self.view_matrix()
    }

    /// Project a world-space point to viewport pixels. Divides by w
    /// unconditionally: the broad-phase corner path accepts points behind
    /// the eye (they project mirrored).
    pub fn world_to_viewport(&self, point: Vec3, vp: &Viewport) -> Vec2 {
        let clip = self.view_projection(vp) * Vec4::new(point.x, point.y, point.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        projection::ndc_to_viewport(ndc.truncate(), vp)
    }

    /// Cast a ray from a viewport position into the scene
    pub fn screen_ray(&self, screen_pos: Vec2, vp: &Viewport) -> Ray {
        let ndc = projection::viewport_to_ndc(screen_pos, vp);
        let vp_inv = self.view_projection(vp).inverse();

        // unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray {
            origin: self.eye_position(),
            direction: (far - near).normalize_or_zero(),
        }
    }
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}
