//! Ocean mesh and wave generation parameters.

use std::ops::Range;

use rand::Rng;

use crate::waves::{WaveDescriptor, WaveletEnvelope, MAX_WAVES};

/// Ocean wireframe parameters
#[derive(Debug, Clone)]
pub struct OceanParams {
    /// Grid resolution (vertices per side, unit spacing)
    pub grid_size: u32,

    /// Line color (RGBA, straight alpha)
    pub color: [f32; 4],

    /// Line width factor in clip space (0.02 = about 1% of the viewport height)
    pub thickness: f32,

    /// Ranges the startup wave table is drawn from
    pub waves: WaveRanges,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            grid_size: 50,
            color: [0.0, 0.7, 0.8, 1.0],
            thickness: 0.02,
            waves: WaveRanges::default(),
        }
    }
}

/// Sampling ranges for randomly generated waves.
///
/// Each range is half-open; `None` for a window disables that envelope.
#[derive(Debug, Clone)]
pub struct WaveRanges {
    /// Slots filled per axis (capped at [`MAX_WAVES`])
    pub count: usize,

    /// Wave height (world units)
    pub amplitude: Range<f32>,

    /// Radians per world unit
    pub spatial_frequency: Range<f32>,

    /// Radians per second
    pub temporal_frequency: Range<f32>,

    /// Radians
    pub phase: Range<f32>,

    /// (start range, end range) of the spatial window
    pub space_window: Option<(Range<f32>, Range<f32>)>,

    /// (start range, end range) of the temporal window (seconds)
    pub time_window: Option<(Range<f32>, Range<f32>)>,
}

impl Default for WaveRanges {
    fn default() -> Self {
        Self {
            count: MAX_WAVES,
            amplitude: 0.0..0.5,
            spatial_frequency: 0.3..0.6,
            temporal_frequency: 0.5..1.0,
            phase: 0.0..1.0,
            // Fade waves out near the edges of the 50x50 grid
            space_window: Some((0.0..5.0, 45.0..50.0)),
            time_window: None,
        }
    }
}

impl WaveRanges {
    pub fn sample_descriptor<R: Rng + ?Sized>(&self, rng: &mut R) -> WaveDescriptor {
        WaveDescriptor::new(
            rng.gen_range(self.amplitude.clone()),
            rng.gen_range(self.spatial_frequency.clone()),
            rng.gen_range(self.temporal_frequency.clone()),
            rng.gen_range(self.phase.clone()),
        )
    }

    pub fn sample_envelope<R: Rng + ?Sized>(&self, rng: &mut R) -> WaveletEnvelope {
        let (space_start, space_end) = sample_window(rng, self.space_window.as_ref());
        let (time_start, time_end) = sample_window(rng, self.time_window.as_ref());
        WaveletEnvelope {
            space_start,
            space_end,
            time_start,
            time_end,
        }
    }
}

fn sample_window<R: Rng + ?Sized>(
    rng: &mut R,
    window: Option<&(Range<f32>, Range<f32>)>,
) -> (f32, f32) {
    match window {
        Some((start, end)) => (rng.gen_range(start.clone()), rng.gen_range(end.clone())),
        None => (0.0, 0.0),
    }
}
