//! Sketch variants and the startup step that turns a configuration plus a
//! seed into immutable GPU-ready data.

use std::path::PathBuf;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::SketchError;
use crate::mesh::{self, BitmapFont, Mesh, WireframeMesh};
use crate::params::{
    OceanParams, OrbitParams, PostBlendParams, PostParams, RenderConfig, TextParams,
};
use crate::waves::WaveField;

/// Seed used when none is given, so runs are reproducible by default
pub const DEFAULT_SEED: u64 = 0x4d61_6b69_6e67; // "Making"

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// Wave mesh only, drawn straight to the screen
    Ocean,
    /// Ocean through the scanline filter
    #[default]
    Crt,
    /// Ocean plus floating title text, through the scanline filter
    Title,
    /// Like `title`, with the filter fading in and out over a wave field
    Fade,
}

/// Everything that distinguishes one sketch from another
#[derive(Debug, Clone)]
pub struct SketchConfig {
    pub ocean: OceanParams,
    pub camera: OrbitParams,
    /// `None` renders the scene straight to the screen
    pub post: Option<PostParams>,
    pub text: Option<TextParams>,
    pub render: RenderConfig,
}

impl SketchConfig {
    pub fn preset(variant: Variant) -> Self {
        let base = Self {
            ocean: OceanParams::default(),
            camera: OrbitParams::default(),
            post: None,
            text: None,
            render: RenderConfig::default(),
        };
        match variant {
            Variant::Ocean => base,
            Variant::Crt => Self {
                post: Some(PostParams::default()),
                ..base
            },
            Variant::Title => Self {
                post: Some(PostParams::default()),
                text: Some(TextParams::default()),
                ..base
            },
            Variant::Fade => Self {
                post: Some(PostParams {
                    blend: Some(PostBlendParams::default()),
                    ..PostParams::default()
                }),
                text: Some(TextParams::default()),
                ..base
            },
        }
    }

    /// Change the grid resolution, scaling everything laid out on the grid
    /// (orbit, text anchor, spatial wave windows) to match.
    pub fn with_grid_size(mut self, size: u32) -> Self {
        let scale = size as f32 / self.ocean.grid_size.max(1) as f32;
        self.ocean.grid_size = size;
        if let Some((start, end)) = &mut self.ocean.waves.space_window {
            *start = start.start * scale..start.end * scale;
            *end = end.start * scale..end.end * scale;
        }
        self.camera.center = self.camera.center.map(|c| c * scale);
        self.camera.radius *= scale;
        if let Some(text) = &mut self.text {
            text.position[0] *= scale;
            text.position[2] *= scale;
        }
        self
    }
}

/// Where wave parameters get their randomness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    Fixed(u64),
    /// Different waves every run
    Entropy,
}

impl Default for Seed {
    fn default() -> Self {
        Seed::Fixed(DEFAULT_SEED)
    }
}

impl Seed {
    /// Concrete seed for this run; `Entropy` draws a fresh one
    pub fn resolve(self) -> u64 {
        match self {
            Seed::Fixed(seed) => seed,
            Seed::Entropy => rand::random(),
        }
    }
}

/// Where the text outline comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextSource {
    /// Rasterize and trace with the built-in font at startup
    #[default]
    Generate,
    /// Load a pre-baked outline file
    Baked(PathBuf),
}

/// Outline mesh for a text overlay, traced with the built-in font
pub fn text_outline(params: &TextParams) -> Mesh {
    let font = BitmapFont {
        scale: params.raster_scale,
    };
    mesh::generate_text_outline(&params.text, params.layout, &font)
}

/// Immutable per-run data: configuration, wave tables and wireframes
#[derive(Debug, Clone)]
pub struct Sketch {
    pub config: SketchConfig,
    pub ocean_waves: WaveField,
    /// Seed the wave tables were drawn from; `Seed::Fixed` of it rebuilds them
    pub seed: u64,
    pub ocean_mesh: WireframeMesh,
    pub text_mesh: Option<WireframeMesh>,
    /// Present only when the post pass blends
    pub post_waves: Option<WaveField>,
}

impl Sketch {
    /// Draw the wave tables and build every mesh.
    ///
    /// Ocean waves are drawn before post-process waves, so the ocean of a
    /// given seed looks the same in every variant.
    pub fn build(
        config: SketchConfig,
        seed: Seed,
        text_source: &TextSource,
    ) -> Result<Self, SketchError> {
        let seed = seed.resolve();
        log::info!("Wave seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let ocean_waves = WaveField::generate(&mut rng, &config.ocean.waves);
        let post_waves = config
            .post
            .as_ref()
            .and_then(|post| post.blend.as_ref())
            .map(|blend| WaveField::generate(&mut rng, &blend.waves));

        let grid = mesh::generate_grid(config.ocean.grid_size);
        let ocean_mesh = WireframeMesh::from_mesh(&grid);
        log::info!(
            "Ocean grid: {} positions, {} segments",
            grid.positions.len(),
            ocean_mesh.segment_count()
        );

        let text_mesh = match &config.text {
            Some(text) => {
                let outline = match text_source {
                    TextSource::Generate => text_outline(text),
                    TextSource::Baked(path) => mesh::load_mesh(path)?,
                };
                let wire = WireframeMesh::from_mesh(&outline);
                log::info!(
                    "Text outline {:?}: {} positions, {} segments",
                    text.text,
                    outline.positions.len(),
                    wire.segment_count()
                );
                if wire.is_empty() {
                    log::warn!("Text outline is empty; nothing will be drawn");
                }
                Some(wire)
            }
            None => None,
        };

        Ok(Self {
            config,
            ocean_waves,
            seed,
            ocean_mesh,
            text_mesh,
            post_waves,
        })
    }
}
