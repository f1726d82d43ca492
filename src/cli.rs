//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{RecordingConfig, TextParams};
use crate::sketch::{Seed, SketchConfig, TextSource, Variant};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "making-waves")]
#[command(about = "Animated wireframe ocean with a retro scanline filter", long_about = None)]
pub struct Args {
    /// Sketch variant to run
    #[arg(long, value_enum, default_value_t = Variant::Crt)]
    pub variant: Variant,

    /// Seed for the wave tables (defaults to a fixed seed)
    #[arg(long, value_name = "SEED", conflicts_with = "unseeded")]
    pub seed: Option<u64>,

    /// Draw different waves on every run
    #[arg(long)]
    pub unseeded: bool,

    /// Ocean grid resolution (vertices per side)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(2..))]
    pub grid_size: Option<u32>,

    /// Text to float over the ocean (adds an overlay to any variant)
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Load the text outline from a pre-baked mesh file
    #[arg(long, value_name = "PATH")]
    pub text_mesh: Option<PathBuf>,

    /// Write the text outline to a mesh file and exit
    #[arg(long, value_name = "PATH")]
    pub bake_text: Option<PathBuf>,

    /// Record frames to disk (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,
}

impl Args {
    /// Variant preset with the overrides from the command line applied
    pub fn sketch_config(&self) -> SketchConfig {
        let mut config = SketchConfig::preset(self.variant);
        if let Some(text) = &self.text {
            let params = config.text.get_or_insert_with(TextParams::default);
            params.text = text.clone();
        }
        if let Some(size) = self.grid_size {
            config = config.with_grid_size(size);
        }
        config
    }

    pub fn seed(&self) -> Seed {
        match (self.unseeded, self.seed) {
            (true, _) => Seed::Entropy,
            (false, Some(seed)) => Seed::Fixed(seed),
            (false, None) => Seed::default(),
        }
    }

    pub fn text_source(&self) -> TextSource {
        match &self.text_mesh {
            Some(path) => TextSource::Baked(path.clone()),
            None => TextSource::Generate,
        }
    }

    /// Text parameters for `--bake-text`
    pub fn bake_params(&self) -> TextParams {
        self.sketch_config().text.unwrap_or_default()
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.map(RecordingConfig::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::DEFAULT_SEED;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("making-waves").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.variant, Variant::Crt);
        assert_eq!(args.seed(), Seed::Fixed(DEFAULT_SEED));
        assert_eq!(args.text_source(), TextSource::Generate);
        assert!(args.recording_config().is_none());
        let config = args.sketch_config();
        assert!(config.post.is_some());
        assert!(config.text.is_none());
    }

    #[test]
    fn test_seed_options() {
        assert_eq!(parse(&["--seed", "42"]).seed(), Seed::Fixed(42));
        assert_eq!(parse(&["--unseeded"]).seed(), Seed::Entropy);
        assert!(Args::try_parse_from(["making-waves", "--seed", "1", "--unseeded"]).is_err());
    }

    #[test]
    fn test_text_adds_overlay() {
        let config = parse(&["--variant", "ocean", "--text", "Hello"]).sketch_config();
        assert_eq!(config.text.map(|t| t.text), Some("Hello".to_string()));
        assert!(config.post.is_none());
    }

    #[test]
    fn test_grid_size_bounds() {
        assert!(Args::try_parse_from(["making-waves", "--grid-size", "1"]).is_err());
        let config = parse(&["--grid-size", "20"]).sketch_config();
        assert_eq!(config.ocean.grid_size, 20);
    }

    #[test]
    fn test_bake_and_load_paths() {
        let args = parse(&["--variant", "title", "--bake-text", "out.json"]);
        assert_eq!(args.bake_text, Some(PathBuf::from("out.json")));
        assert_eq!(args.bake_params().text, TextParams::default().text);

        let args = parse(&["--text-mesh", "text.json"]);
        assert_eq!(args.text_source(), TextSource::Baked(PathBuf::from("text.json")));
    }

    #[test]
    fn test_record() {
        let config = parse(&["--record", "2"]).recording_config().unwrap();
        assert_eq!(config.total_frames(), 120);
    }
}
