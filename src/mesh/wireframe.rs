//! Screen-space thick-line encoding.
//!
//! Every segment becomes two entries, one per endpoint. Each entry carries its
//! own position, the opposite endpoint, and a direction sign. The vertex stage
//! projects both, takes the screen-space perpendicular and pushes the vertex
//! out by `direction * side * thickness`. Because the two entries of a segment
//! have swapped endpoints and opposite signs, they agree on which side is which.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use super::Mesh;

/// Below this, projected lengths and `w` count as zero
const EPSILON: f32 = 1e-6;

/// One endpoint of a wireframe segment
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct WireVertex {
    pub position: [f32; 3],
    pub next_position: [f32; 3],
    pub direction: f32,
}

/// Segments of a mesh as consecutive (+1, -1) endpoint pairs.
///
/// Built once at startup and never modified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireframeMesh {
    vertices: Vec<WireVertex>,
}

impl WireframeMesh {
    /// Expand every unique segment of `mesh`, keeping segment order
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let segments = mesh.segments();
        let mut vertices = Vec::with_capacity(segments.len() * 2);
        for [a, b] in segments {
            let pa = mesh.positions[a as usize];
            let pb = mesh.positions[b as usize];
            vertices.push(WireVertex {
                position: pa,
                next_position: pb,
                direction: 1.0,
            });
            vertices.push(WireVertex {
                position: pb,
                next_position: pa,
                direction: -1.0,
            });
        }
        Self { vertices }
    }

    /// All endpoint entries, `2 * segment_count()` long
    pub fn vertices(&self) -> &[WireVertex] {
        &self.vertices
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Clip-space offset that widens a projected segment from `p` toward `n`.
///
/// `aspect` is viewport width / height. The result is scaled by `p.w` so the
/// width is constant after the perspective divide. Degenerate input (zero
/// projected length, or a point on the camera plane) gives a zero offset.
pub fn line_offset(p: Vec4, n: Vec4, direction: f32, aspect: f32) -> Vec4 {
    if p.w.abs() < EPSILON || n.w.abs() < EPSILON {
        return Vec4::ZERO;
    }
    let scale = Vec2::new(aspect, 1.0);
    let sp = Vec2::new(p.x, p.y) / p.w * scale;
    let sn = Vec2::new(n.x, n.y) / n.w * scale;
    let delta = sn - sp;
    let length = delta.length();
    if length < EPSILON {
        return Vec4::ZERO;
    }
    let dir = delta / length;
    let normal = Vec2::new(-dir.y, dir.x) / scale * direction * p.w;
    Vec4::new(normal.x, normal.y, 0.0, 0.0)
}
