/// Dot bit for each `(x, y)` position inside one 2x4 braille cell,
/// indexed as `DOTS[y][x]`.
const DOTS: [[u8; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// First code point of the Unicode braille block; the empty pattern
const BLANK: u32 = 0x2800;

/// Off-screen drawing surface where each terminal cell holds 2x4 dots.
#[derive(Clone)]
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl BrailleCanvas {
    /// Canvas of `cols` x `rows` terminal cells, `cols*2` x `rows*4` dots.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![0; cols * rows],
        }
    }

    /// Light the dot at `(x, y)`; out-of-range dots are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (col, row) = (x / 2, y / 4);
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] |= DOTS[y % 4][x % 2];
    }

    /// Signed variant for projected coordinates, which may fall left of or
    /// above the canvas
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) {
            self.set_pixel(x, y);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&bits| bits == 0)
    }

    /// Glyph for one terminal cell; `None` outside the canvas or when no
    /// dot is lit
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        match self.cells[row * self.cols + col] {
            0 => None,
            bits => char::from_u32(BLANK + u32::from(bits)),
        }
    }

    /// Every row rendered as braille text, blank cells included
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        self.cells.chunks(self.cols.max(1)).take(self.rows).map(|row| {
            row.iter()
                .map(|&bits| char::from_u32(BLANK + u32::from(bits)).unwrap_or(' '))
                .collect()
        })
    }
}
