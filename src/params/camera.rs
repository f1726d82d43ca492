//! Orbit camera configuration.

use std::f32::consts::FRAC_PI_2;

/// Camera circling a fixed center at constant radius and height
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Look-at target and orbit center (world units)
    pub center: [f32; 3],

    /// Horizontal distance from the center (world units)
    pub radius: f32,

    /// Eye height above the center (world units)
    pub height: f32,

    /// Orbit speed (radians per frame tick)
    pub speed: f32,

    /// Vertical field of view (radians)
    pub fov_radians: f32,

    /// Near clipping plane (world units)
    pub near_plane: f32,

    /// Far clipping plane (world units)
    pub far_plane: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            center: [25.0, 0.0, 25.0], // Middle of the default 50x50 grid
            radius: 25.0,
            height: 5.0,
            speed: 0.001, // ~105 s per orbit at 60 fps
            fov_radians: FRAC_PI_2,
            near_plane: 0.01,
            far_plane: 1000.0,
        }
    }
}

impl OrbitParams {
    /// Ticks needed for one full orbit
    pub fn period_ticks(&self) -> f32 {
        std::f32::consts::TAU / self.speed
    }
}
