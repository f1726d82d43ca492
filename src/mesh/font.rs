//! Built-in 5x7 bitmap font used to rasterize text before outlining.

use super::text::{Bitmap, GlyphRaster};

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
const GLYPH_ADVANCE: usize = GLYPH_WIDTH + 1;
const LINE_ADVANCE: usize = GLYPH_HEIGHT + 2;

/// Rows top to bottom; bit 4 is the leftmost column.
fn glyph(c: char) -> [u8; GLYPH_HEIGHT] {
    match c.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; GLYPH_HEIGHT],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        // '?' and anything the font lacks
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}

/// Fixed-pitch 5x7 font. Lowercase renders as uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    /// Raster samples per font pixel along each axis
    pub scale: usize,
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self { scale: 1 }
    }
}

impl GlyphRaster for BitmapFont {
    fn rasterize(&self, text: &str) -> Bitmap {
        let scale = self.scale.max(1);
        let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
        let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Bitmap::new(0, 0);
        }

        let width = (columns * GLYPH_ADVANCE - 1) * scale;
        let height = ((lines.len() - 1) * LINE_ADVANCE + GLYPH_HEIGHT) * scale;
        let mut bitmap = Bitmap::new(width, height);

        for (line_idx, line) in lines.iter().enumerate() {
            for (col, &c) in line.iter().enumerate() {
                let rows = glyph(c);
                for (gy, bits) in rows.iter().enumerate() {
                    for gx in 0..GLYPH_WIDTH {
                        if bits & (0x10 >> gx) == 0 {
                            continue;
                        }
                        let px = col * GLYPH_ADVANCE + gx;
                        let py = line_idx * LINE_ADVANCE + gy;
                        for sy in 0..scale {
                            for sx in 0..scale {
                                bitmap.set(px * scale + sx, py * scale + sy, true);
                            }
                        }
                    }
                }
            }
        }
        bitmap
    }

    fn row_height(&self) -> usize {
        GLYPH_HEIGHT * self.scale.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_glyph_dimensions() {
        let bitmap = BitmapFont::default().rasterize("I");
        assert_eq!((bitmap.width(), bitmap.height()), (5, 7));
        // Serif bar on top, stem in the middle column
        assert!(bitmap.get(1, 0) && bitmap.get(2, 0) && bitmap.get(3, 0));
        assert!(!bitmap.get(0, 0));
        assert!(bitmap.get(2, 3) && !bitmap.get(1, 3));
    }

    #[test]
    fn test_advance_and_scale() {
        let bitmap = BitmapFont { scale: 3 }.rasterize("HI");
        assert_eq!(bitmap.width(), (2 * 6 - 1) * 3);
        assert_eq!(bitmap.height(), 7 * 3);
        // The gap column between glyphs stays empty
        assert!((0..bitmap.height() as isize).all(|y| !bitmap.get(5 * 3 + 1, y)));
    }

    #[test]
    fn test_lowercase_matches_uppercase() {
        let font = BitmapFont::default();
        assert_eq!(font.rasterize("waves"), font.rasterize("WAVES"));
    }

    #[test]
    fn test_multiple_lines() {
        let bitmap = BitmapFont::default().rasterize("AB\nC");
        assert_eq!(bitmap.width(), 11);
        assert_eq!(bitmap.height(), 9 + 7);
    }

    #[test]
    fn test_empty_text() {
        let bitmap = BitmapFont::default().rasterize("");
        assert_eq!((bitmap.width(), bitmap.height()), (0, 0));
    }
}
