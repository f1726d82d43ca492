//! Mesh generation: planar grids, text outlines, and the thick-line
//! wireframe encoding the renderer draws.

mod font;
mod grid;
mod io;
mod text;
mod wireframe;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::MeshError;

pub use font::BitmapFont;
pub use grid::generate_grid;
pub use io::{load_mesh, save_mesh};
pub use text::{
    generate_text_outline, trace_outline, Bitmap, GlyphRaster, TextAlign, TextBaseline,
    TextLayout,
};
pub use wireframe::{line_offset, WireVertex, WireframeMesh};

/// A cell references positions by index: a line segment or a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Line([u32; 2]),
    Triangle([u32; 3]),
}

impl Cell {
    pub fn indices(&self) -> &[u32] {
        match self {
            Cell::Line(idx) => idx,
            Cell::Triangle(idx) => idx,
        }
    }

    /// Edges of this cell in winding order
    fn edges(&self) -> Vec<[u32; 2]> {
        match *self {
            Cell::Line([a, b]) => vec![[a, b]],
            Cell::Triangle([a, b, c]) => vec![[a, b], [b, c], [c, a]],
        }
    }
}

/// Plane a 2-D point set is lifted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// (u, v) -> (u, 0, v); ground plane with Y up
    Xz,
    /// (u, v) -> (u, v, 0); upright, facing +Z
    Xy,
}

impl Plane {
    pub fn lift(self, [u, v]: [f32; 2]) -> [f32; 3] {
        match self {
            Plane::Xz => [u, 0.0, v],
            Plane::Xy => [u, v, 0.0],
        }
    }
}

/// Positions plus cells. Every cell index must be in range of `positions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub cells: Vec<Cell>,
}

impl Mesh {
    /// Lift a planar mesh into 3-D
    pub fn from_planar(positions: &[[f32; 2]], cells: Vec<Cell>, plane: Plane) -> Self {
        Self {
            positions: positions.iter().map(|&p| plane.lift(p)).collect(),
            cells,
        }
    }

    /// Check the index invariant
    pub fn validate(&self) -> Result<(), MeshError> {
        let len = self.positions.len();
        for (cell, c) in self.cells.iter().enumerate() {
            if let Some(&index) = c.indices().iter().find(|&&i| i as usize >= len) {
                return Err(MeshError::IndexOutOfRange { cell, index, len });
            }
        }
        Ok(())
    }

    /// Unique line segments, in first-seen order.
    ///
    /// Triangles contribute their three edges. An edge shared by two cells is
    /// kept once, with the endpoint order of its first appearance.
    pub fn segments(&self) -> Vec<[u32; 2]> {
        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for cell in &self.cells {
            for [a, b] in cell.edges() {
                if seen.insert((a.min(b), a.max(b))) {
                    segments.push([a, b]);
                }
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_lift() {
        assert_eq!(Plane::Xz.lift([1.0, 2.0]), [1.0, 0.0, 2.0]);
        assert_eq!(Plane::Xy.lift([1.0, 2.0]), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_segments_drop_shared_edges() {
        let mesh = Mesh {
            positions: vec![[0.0; 3]; 4],
            cells: vec![Cell::Triangle([0, 2, 1]), Cell::Triangle([1, 2, 3])],
        };
        assert_eq!(
            mesh.segments(),
            vec![[0, 2], [2, 1], [1, 0], [2, 3], [3, 1]]
        );
    }

    #[test]
    fn test_segments_keep_lines() {
        let mesh = Mesh {
            positions: vec![[0.0; 3]; 3],
            cells: vec![Cell::Line([0, 1]), Cell::Line([1, 0]), Cell::Line([1, 2])],
        };
        assert_eq!(mesh.segments(), vec![[0, 1], [1, 2]]);
    }

    #[test]
    fn test_validate_reports_first_bad_index() {
        let mesh = Mesh {
            positions: vec![[0.0; 3]; 3],
            cells: vec![Cell::Line([0, 1]), Cell::Triangle([0, 2, 3])],
        };
        assert_eq!(
            mesh.validate(),
            Err(MeshError::IndexOutOfRange {
                cell: 1,
                index: 3,
                len: 3
            })
        );
    }
}
