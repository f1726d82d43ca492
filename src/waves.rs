//! Procedural wave field: sums of traveling cosine waves, each windowed by a
//! half-sine "wavelet" envelope in space and time.
//!
//! The same math runs in `rendering/wireframe_wave.wgsl` (per vertex) and in
//! `rendering/post_scanline.wgsl` (per fragment, over UV space). The CPU
//! versions here are the reference the shaders are kept in step with.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::params::WaveRanges;

/// Wave slots per axis. Unused slots are all zero and contribute nothing.
pub const MAX_WAVES: usize = 8;

/// One traveling wave: `amplitude * cos(spatial * pos + temporal * t + phase)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveDescriptor {
    pub amplitude: f32,
    /// Radians per world (or UV) unit
    pub spatial_frequency: f32,
    /// Radians per second
    pub temporal_frequency: f32,
    pub phase: f32,
}

impl WaveDescriptor {
    pub fn new(amplitude: f32, spatial_frequency: f32, temporal_frequency: f32, phase: f32) -> Self {
        Self {
            amplitude,
            spatial_frequency,
            temporal_frequency,
            phase,
        }
    }

    /// Wave height at `position` along this wave's axis and `time` seconds
    pub fn evaluate(&self, position: f32, time: f32) -> f32 {
        self.amplitude
            * (self.spatial_frequency * position + self.temporal_frequency * time + self.phase)
                .cos()
    }

    fn to_array(self) -> [f32; 4] {
        [
            self.amplitude,
            self.spatial_frequency,
            self.temporal_frequency,
            self.phase,
        ]
    }
}

/// Half-sine window over `[start, end]`.
///
/// * `start == end == 0` disables the window (always 1).
/// * Outside `[start, end]` the window is 0.
/// * A non-zero empty window (`start == end`, or `end < start`) is 0 everywhere
///   instead of dividing by zero.
pub fn envelope(start: f32, end: f32, position: f32) -> f32 {
    if start == 0.0 && end == 0.0 {
        return 1.0;
    }
    if end <= start || position < start || position > end {
        return 0.0;
    }
    ((position - start) / (end - start) * PI).sin()
}

/// Spatial and temporal bounds for one wave. All zeros means always on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveletEnvelope {
    pub space_start: f32,
    pub space_end: f32,
    pub time_start: f32,
    pub time_end: f32,
}

impl WaveletEnvelope {
    pub const ALWAYS_ON: Self = Self {
        space_start: 0.0,
        space_end: 0.0,
        time_start: 0.0,
        time_end: 0.0,
    };

    pub fn spatial(start: f32, end: f32) -> Self {
        Self {
            space_start: start,
            space_end: end,
            ..Self::ALWAYS_ON
        }
    }

    /// Product of the spatial and temporal windows
    pub fn evaluate(&self, position: f32, time: f32) -> f32 {
        envelope(self.space_start, self.space_end, position)
            * envelope(self.time_start, self.time_end, time)
    }

    fn to_array(self) -> [f32; 4] {
        [self.space_start, self.space_end, self.time_start, self.time_end]
    }
}

/// A wave paired 1:1 with its envelope
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Wave {
    pub descriptor: WaveDescriptor,
    pub envelope: WaveletEnvelope,
}

impl Wave {
    pub fn evaluate(&self, position: f32, time: f32) -> f32 {
        self.descriptor.evaluate(position, time) * self.envelope.evaluate(position, time)
    }
}

/// Fixed table of waves driven by one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveAxis {
    pub waves: [Wave; MAX_WAVES],
}

impl WaveAxis {
    pub fn sum(&self, position: f32, time: f32) -> f32 {
        self.waves.iter().map(|w| w.evaluate(position, time)).sum()
    }

    fn descriptor_table(&self) -> [[f32; 4]; MAX_WAVES] {
        self.waves.map(|w| w.descriptor.to_array())
    }

    fn envelope_table(&self) -> [[f32; 4]; MAX_WAVES] {
        self.waves.map(|w| w.envelope.to_array())
    }
}

/// Two independent wave axes that add into one scalar.
///
/// The ocean drives it with world (x, z) and displaces y; the post-process
/// blend drives it with (u, v) and reads the scalar as a visibility offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WaveField {
    pub primary: WaveAxis,
    pub secondary: WaveAxis,
}

impl WaveField {
    /// A field with every slot zeroed (no displacement anywhere)
    pub fn flat() -> Self {
        Self::default()
    }

    /// Draw a field from `rng`.
    ///
    /// Slot i draws, in order: primary wave, secondary wave, primary
    /// envelope, secondary envelope.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, ranges: &WaveRanges) -> Self {
        let mut field = Self::flat();
        for i in 0..ranges.count.min(MAX_WAVES) {
            field.primary.waves[i].descriptor = ranges.sample_descriptor(rng);
            field.secondary.waves[i].descriptor = ranges.sample_descriptor(rng);
            field.primary.waves[i].envelope = ranges.sample_envelope(rng);
            field.secondary.waves[i].envelope = ranges.sample_envelope(rng);
        }
        field
    }

    /// Sum of all waves at (`u`, `v`) and `time`
    pub fn sample(&self, u: f32, v: f32, time: f32) -> f32 {
        self.primary.sum(u, time) + self.secondary.sum(v, time)
    }

    /// Lift a point on the XZ plane by the field evaluated at its (x, z)
    pub fn displace(&self, position: Vec3, time: f32) -> Vec3 {
        position + Vec3::Y * self.sample(position.x, position.z, time)
    }

    pub fn uniforms(&self) -> WaveUniforms {
        WaveUniforms {
            primary_waves: self.primary.descriptor_table(),
            secondary_waves: self.secondary.descriptor_table(),
            primary_wavelets: self.primary.envelope_table(),
            secondary_wavelets: self.secondary.envelope_table(),
        }
    }
}

/// GPU layout of a [`WaveField`]: four `array<vec4<f32>, 8>` tables
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct WaveUniforms {
    pub primary_waves: [[f32; 4]; MAX_WAVES],
    pub secondary_waves: [[f32; 4]; MAX_WAVES],
    pub primary_wavelets: [[f32; 4]; MAX_WAVES],
    pub secondary_wavelets: [[f32; 4]; MAX_WAVES],
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_zero_amplitude_contributes_nothing() {
        let mut field = WaveField::flat();
        for (i, wave) in field.primary.waves.iter_mut().enumerate() {
            wave.descriptor = WaveDescriptor::new(0.0, 0.4 + i as f32, 0.7, 1.3);
        }
        for x in [-100.0, -1.5, 0.0, 3.25, 49.0] {
            for t in [0.0, 0.5, 123.0] {
                assert_eq!(field.sample(x, x * 0.5, t), 0.0);
                assert_eq!(field.displace(Vec3::new(x, 2.0, -x), t).y, 2.0);
            }
        }
    }

    #[test]
    fn test_disabled_envelope_is_one() {
        for x in [-1e6, -3.0, 0.0, 0.25, 7.0, 1e6] {
            assert_eq!(envelope(0.0, 0.0, x), 1.0);
        }
    }

    #[test]
    fn test_envelope_outside_window_is_zero() {
        assert_eq!(envelope(2.0, 8.0, 1.999), 0.0);
        assert_eq!(envelope(2.0, 8.0, 8.001), 0.0);
        assert_eq!(envelope(0.0, 8.0, -0.5), 0.0);
        assert_eq!(envelope(-4.0, 0.0, 0.5), 0.0);
    }

    #[test]
    fn test_envelope_ramp_shape() {
        assert!(envelope(2.0, 8.0, 2.0).abs() < EPS);
        assert!(envelope(2.0, 8.0, 8.0).abs() < EPS);
        assert!((envelope(2.0, 8.0, 5.0) - 1.0).abs() < EPS);
        let quarter = envelope(2.0, 8.0, 3.5);
        assert!((quarter - (PI / 4.0).sin()).abs() < EPS);
    }

    #[test]
    fn test_empty_window_is_zero_not_nan() {
        assert_eq!(envelope(3.0, 3.0, 3.0), 0.0);
        assert_eq!(envelope(3.0, 3.0, 2.0), 0.0);
        assert_eq!(envelope(5.0, 1.0, 3.0), 0.0);
    }

    #[test]
    fn test_wavelet_multiplies_space_and_time() {
        let wavelet = WaveletEnvelope {
            space_start: 0.0,
            space_end: 10.0,
            time_start: 0.0,
            time_end: 4.0,
        };
        assert!((wavelet.evaluate(5.0, 2.0) - 1.0).abs() < EPS);
        assert_eq!(wavelet.evaluate(5.0, 4.5), 0.0);
        assert_eq!(wavelet.evaluate(11.0, 2.0), 0.0);

        let spatial_only = WaveletEnvelope::spatial(0.0, 10.0);
        assert!((spatial_only.evaluate(5.0, 1e4) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_axes_add_independently() {
        let mut field = WaveField::flat();
        field.primary.waves[0].descriptor = WaveDescriptor::new(1.0, 0.0, 0.0, 0.0);
        field.secondary.waves[3].descriptor = WaveDescriptor::new(0.5, 0.0, 0.0, PI);
        // cos(0) * 1 + cos(PI) * 0.5
        assert!((field.sample(12.0, -4.0, 9.0) - 0.5).abs() < EPS);

        let lifted = field.displace(Vec3::new(1.0, 1.0, 1.0), 0.0);
        assert!((lifted.y - 1.5).abs() < EPS);
        assert_eq!(lifted.x, 1.0);
        assert_eq!(lifted.z, 1.0);
    }

    #[test]
    fn test_generate_respects_ranges() {
        let ranges = WaveRanges::default();
        let mut rng = StdRng::seed_from_u64(7);
        let field = WaveField::generate(&mut rng, &ranges);

        for axis in [&field.primary, &field.secondary] {
            for wave in &axis.waves {
                let d = wave.descriptor;
                assert!(ranges.amplitude.contains(&d.amplitude));
                assert!(ranges.spatial_frequency.contains(&d.spatial_frequency));
                assert!(ranges.temporal_frequency.contains(&d.temporal_frequency));
                assert!(ranges.phase.contains(&d.phase));
                assert!(wave.envelope.space_start < wave.envelope.space_end);
                assert_eq!(wave.envelope.time_start, 0.0);
                assert_eq!(wave.envelope.time_end, 0.0);
            }
        }
    }

    #[test]
    fn test_generate_leaves_extra_slots_flat() {
        let ranges = WaveRanges {
            count: 3,
            ..WaveRanges::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let field = WaveField::generate(&mut rng, &ranges);
        assert_ne!(field.primary.waves[2], Wave::default());
        for i in 3..MAX_WAVES {
            assert_eq!(field.primary.waves[i], Wave::default());
            assert_eq!(field.secondary.waves[i], Wave::default());
        }
    }

    #[test]
    fn test_uniform_tables_match_field() {
        let mut field = WaveField::flat();
        field.secondary.waves[5] = Wave {
            descriptor: WaveDescriptor::new(0.1, 0.2, 0.3, 0.4),
            envelope: WaveletEnvelope::spatial(1.0, 46.0),
        };
        let uniforms = field.uniforms();
        assert_eq!(uniforms.secondary_waves[5], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(uniforms.secondary_wavelets[5], [1.0, 46.0, 0.0, 0.0]);
        assert_eq!(uniforms.primary_waves[5], [0.0; 4]);
        assert_eq!(std::mem::size_of::<WaveUniforms>(), 4 * MAX_WAVES * 16);
    }
}
