//! Parameter definitions with units and documented semantics.
//!
//! Every constant a sketch variant can change lives here.

mod camera;
mod ocean;
mod post;
mod render;
mod text;

// Re-export all types
pub use camera::OrbitParams;
pub use ocean::{OceanParams, WaveRanges};
pub use post::{PostBlendParams, PostParams};
pub use render::{RecordingConfig, RenderConfig};
pub use text::TextParams;
