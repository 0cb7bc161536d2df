//! World → clip → viewport coordinate transforms.
//!
//! Pure functions of their inputs; the selection code funnels every
//! point it tests through here.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Viewport size in device pixels, origin top-left
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

/// Combined model-to-clip matrix: projection · view · world
pub fn model_to_clip(projection: &Mat4, view: &Mat4, world: &Mat4) -> Mat4 {
    *projection * *view * *world
}

/// Near/far clip test on a homogeneous clip-space position.
/// Points failing it are excluded from all selection tests.
pub fn clip_visible(clip: Vec4) -> bool {
    clip.z >= -clip.w && clip.z <= clip.w
}

/// Perspective divide plus NDC→viewport mapping; `None` when the point
/// fails the near/far test.
pub fn clip_to_viewport(clip: Vec4, vp: &Viewport) -> Option<Vec3> {
    if !clip_visible(clip) {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let pt = ndc_to_viewport(ndc.truncate(), vp);
    Some(Vec3::new(pt.x, pt.y, ndc.z))
}

/// NDC ([-1,1], y up) → viewport pixels (origin top-left, y down)
pub fn ndc_to_viewport(ndc: Vec2, vp: &Viewport) -> Vec2 {
    Vec2::new(
        (ndc.x + 1.0) / 2.0 * vp.width,
        (1.0 - ndc.y) / 2.0 * vp.height,
    )
}

/// Viewport pixels → NDC; used to turn pointer coordinates into rays
pub fn viewport_to_ndc(pt: Vec2, vp: &Viewport) -> Vec2 {
    Vec2::new(
        (pt.x / vp.width) * 2.0 - 1.0,
        -(pt.y / vp.height) * 2.0 + 1.0,
    )
}
