//! Planar grid mesh for the ocean surface.

use super::{Cell, Mesh, Plane};

/// Build a `size x size` grid of points at integer coordinates on the XZ
/// plane (Y up), two triangles per quad.
///
/// `size` is caller-controlled and expected to be at least 1.
pub fn generate_grid(size: u32) -> Mesh {
    let mut positions = Vec::with_capacity((size * size) as usize);
    for z in 0..size {
        for x in 0..size {
            positions.push([x as f32, z as f32]);
        }
    }

    let quads = size.saturating_sub(1);
    let mut cells = Vec::with_capacity((quads * quads * 2) as usize);
    for z in 0..quads {
        for x in 0..quads {
            let top_left = z * size + x;
            let top_right = top_left + 1;
            let bottom_left = (z + 1) * size + x;
            let bottom_right = bottom_left + 1;

            // Counter-clockwise winding seen from +Y
            cells.push(Cell::Triangle([top_left, bottom_left, top_right]));
            cells.push(Cell::Triangle([top_right, bottom_left, bottom_right]));
        }
    }

    Mesh::from_planar(&positions, cells, Plane::Xz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = generate_grid(50);
        assert_eq!(grid.positions.len(), 50 * 50);
        assert_eq!(grid.cells.len(), 49 * 49 * 2);
        assert!(grid.validate().is_ok());
    }

    #[test]
    fn test_grid_size_two() {
        let grid = generate_grid(2);
        assert_eq!(grid.positions.len(), 4);
        assert!(!grid.cells.is_empty());
        for cell in &grid.cells {
            assert!(cell.indices().iter().all(|&i| i <= 3));
        }
        // Four outer edges plus one diagonal
        assert_eq!(grid.segments().len(), 5);
    }

    #[test]
    fn test_grid_lies_in_xz_plane() {
        let grid = generate_grid(4);
        assert!(grid.positions.iter().all(|p| p[1] == 0.0));
        assert_eq!(grid.positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(grid.positions[15], [3.0, 0.0, 3.0]);
    }

    #[test]
    fn test_single_point_grid_has_no_cells() {
        let grid = generate_grid(1);
        assert_eq!(grid.positions.len(), 1);
        assert!(grid.cells.is_empty());
    }
}
