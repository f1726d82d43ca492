//! Text to outline mesh: rasterize, trace contours with marching squares,
//! then normalize and align.

use std::collections::HashMap;

use super::{Cell, Mesh, Plane};

/// Binary coverage image, row-major, y down
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Coverage at (x, y); anything outside the image is empty
    pub fn get(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.pixels[y as usize * self.width + x as usize]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }
}

/// Turns a string into a coverage bitmap
pub trait GlyphRaster {
    fn rasterize(&self, text: &str) -> Bitmap;

    /// Bitmap rows covered by one line of glyphs
    fn row_height(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Where the outline sits relative to its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextLayout {
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Contour crossings for a 2x2 sample cell. Bits: tl=8, tr=4, br=2, bl=1.
/// Saddles (5, 10) are split so the two filled corners stay separate.
fn case_segments(case: u8) -> &'static [(Edge, Edge)] {
    use Edge::*;
    match case {
        1 | 14 => &[(Left, Bottom)],
        2 | 13 => &[(Bottom, Right)],
        3 | 12 => &[(Left, Right)],
        4 | 11 => &[(Top, Right)],
        5 => &[(Top, Right), (Left, Bottom)],
        6 | 9 => &[(Top, Bottom)],
        7 | 8 => &[(Left, Top)],
        10 => &[(Left, Top), (Bottom, Right)],
        _ => &[],
    }
}

/// Edge midpoint of cell (cx, cy) in doubled integer coordinates
fn edge_key(edge: Edge, cx: isize, cy: isize) -> (isize, isize) {
    match edge {
        Edge::Top => (2 * cx, 2 * cy - 1),
        Edge::Right => (2 * cx + 1, 2 * cy),
        Edge::Bottom => (2 * cx, 2 * cy + 1),
        Edge::Left => (2 * cx - 1, 2 * cy),
    }
}

/// Trace the boundary of every filled region as line segments.
///
/// Output is on the XY plane in bitmap units with y up (row 0 at the top maps
/// to the largest y). Segment endpoints on a shared edge midpoint share one
/// position.
pub fn trace_outline(bitmap: &Bitmap) -> Mesh {
    let mut lookup: HashMap<(isize, isize), u32> = HashMap::new();
    let mut positions: Vec<[f32; 2]> = Vec::new();
    let mut cells = Vec::new();

    let mut index_of = |key: (isize, isize), positions: &mut Vec<[f32; 2]>| -> u32 {
        *lookup.entry(key).or_insert_with(|| {
            positions.push([key.0 as f32 / 2.0, -(key.1 as f32) / 2.0]);
            (positions.len() - 1) as u32
        })
    };

    for cy in 0..=bitmap.height() as isize {
        for cx in 0..=bitmap.width() as isize {
            let case = (bitmap.get(cx - 1, cy - 1) as u8) << 3
                | (bitmap.get(cx, cy - 1) as u8) << 2
                | (bitmap.get(cx, cy) as u8) << 1
                | bitmap.get(cx - 1, cy) as u8;

            for &(from, to) in case_segments(case) {
                let a = index_of(edge_key(from, cx, cy), &mut positions);
                let b = index_of(edge_key(to, cx, cy), &mut positions);
                cells.push(Cell::Line([a, b]));
            }
        }
    }

    Mesh::from_planar(&positions, cells, Plane::Xy)
}

/// Outline `text` on the XY plane (y up), one glyph row tall, positioned by
/// `layout` around the origin.
pub fn generate_text_outline<R: GlyphRaster + ?Sized>(
    text: &str,
    layout: TextLayout,
    raster: &R,
) -> Mesh {
    let mut mesh = trace_outline(&raster.rasterize(text));
    if mesh.positions.is_empty() {
        return mesh;
    }

    let unit = 1.0 / raster.row_height().max(1) as f32;
    let (mut min, mut max) = ([f32::MAX; 2], [f32::MIN; 2]);
    for p in &mut mesh.positions {
        p[0] *= unit;
        p[1] *= unit;
        for axis in 0..2 {
            min[axis] = min[axis].min(p[axis]);
            max[axis] = max[axis].max(p[axis]);
        }
    }

    let dx = match layout.align {
        TextAlign::Start => -min[0],
        TextAlign::Center => -(min[0] + max[0]) / 2.0,
        TextAlign::End => -max[0],
    };
    let dy = match layout.baseline {
        TextBaseline::Top => -max[1],
        TextBaseline::Middle => -(min[1] + max[1]) / 2.0,
        TextBaseline::Bottom => -min[1],
    };
    for p in &mut mesh.positions {
        p[0] += dx;
        p[1] += dy;
    }
    mesh
}
