//! Text overlay configuration.

use crate::mesh::TextLayout;

/// Outline text floating over the ocean
#[derive(Debug, Clone)]
pub struct TextParams {
    /// String to outline
    pub text: String,

    /// Horizontal alignment and baseline of the outline
    pub layout: TextLayout,

    /// Raster samples per font pixel (higher = finer outline corners)
    pub raster_scale: usize,

    /// Anchor of the text in world space
    pub position: [f32; 3],

    /// World units per glyph row
    pub size: f32,

    /// Line color (RGBA)
    pub color: [f32; 4],

    /// Line width factor in clip space
    pub thickness: f32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            text: "Reticulating Splines".to_string(),
            layout: TextLayout::default(),
            raster_scale: 2,
            position: [25.0, 4.0, 25.0],
            size: 2.0,
            color: [1.0, 1.0, 1.0, 1.0],
            thickness: 0.01,
        }
    }
}
