//! Making Waves - animated wireframe ocean with a retro scanline filter

pub mod camera;
pub mod cli;
pub mod clock;
pub mod error;
pub mod mesh;
pub mod params;
pub mod rendering;
pub mod sketch;
pub mod waves;
