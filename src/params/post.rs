//! Scanline post-process configuration.

use std::f32::consts::TAU;

use super::WaveRanges;

/// Full-screen pixelation + scanline pass
#[derive(Debug, Clone)]
pub struct PostParams {
    /// Edge length of one fake pixel (screen pixels)
    pub pixel_size: f32,

    /// Blend between raw and filtered color; `None` always shows the filter
    pub blend: Option<PostBlendParams>,
}

impl Default for PostParams {
    fn default() -> Self {
        Self {
            pixel_size: 5.0,
            blend: None,
        }
    }
}

/// Time-varying visibility of the filter
#[derive(Debug, Clone)]
pub struct PostBlendParams {
    /// Waves over UV space (u drives the primary axis, v the secondary)
    pub waves: WaveRanges,

    /// Angular frequency of the global cosine fade (radians per second)
    pub fade_frequency: f32,
}

impl Default for PostBlendParams {
    fn default() -> Self {
        Self {
            waves: WaveRanges {
                count: 4,
                amplitude: 0.0..0.25,
                spatial_frequency: 2.0..8.0,
                temporal_frequency: 0.2..0.6,
                phase: 0.0..TAU,
                space_window: None,
                time_window: None,
            },
            fade_frequency: 0.25,
        }
    }
}
