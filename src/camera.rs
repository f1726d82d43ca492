//! Orbit camera driven by the frame tick.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat4, Quat, Vec3};

use crate::params::{OrbitParams, TextParams};

/// Camera circling a fixed center. Every matrix is a pure function of the tick.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    params: OrbitParams,
}

impl OrbitCamera {
    pub fn new(params: OrbitParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &OrbitParams {
        &self.params
    }

    /// Orbit angle in [0, 2π) for a tick
    ///
    /// Computed in f64 so long runs keep their precision.
    pub fn angle(&self, tick: u64) -> f32 {
        (tick as f64 * self.params.speed as f64).rem_euclid(TAU) as f32
    }

    /// Eye position: `center + (r·cos t, height, r·sin t)`
    pub fn eye(&self, tick: u64) -> Vec3 {
        let t = self.angle(tick);
        let p = &self.params;
        Vec3::from_array(p.center) + Vec3::new(p.radius * t.cos(), p.height, p.radius * t.sin())
    }

    pub fn view(&self, tick: u64) -> Mat4 {
        Mat4::look_at_rh(self.eye(tick), Vec3::from_array(self.params.center), Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.params.fov_radians,
            aspect,
            self.params.near_plane,
            self.params.far_plane,
        )
    }

    /// True for the half of the orbit where upright text would be mirrored
    pub fn is_behind(&self, tick: u64) -> bool {
        let t = self.angle(tick) as f64;
        (t + FRAC_PI_2).rem_euclid(TAU) > PI
    }

    /// Model matrix for the text overlay: `T(position) · R_y(π/2 + flip) · S(size)`.
    ///
    /// The flip is a discrete half-turn while the camera is behind the text.
    pub fn text_model(&self, text: &TextParams, tick: u64) -> Mat4 {
        let flip = if self.is_behind(tick) { PI } else { 0.0 };
        let rotation = Quat::from_rotation_y((FRAC_PI_2 + flip) as f32);
        Mat4::from_scale_rotation_translation(
            Vec3::splat(text.size),
            rotation,
            Vec3::from_array(text.position),
        )
    }
}
