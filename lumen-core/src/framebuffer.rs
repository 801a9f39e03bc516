//! Column-addressed framebuffer
//!
//! The display is stored as one byte per column, bit `y` = pixel row `y`
//! (0 = top). Columns are independent of chip boundaries; the driver slices
//! them into groups of eight when encoding rows for the chain.

/// Pixel rows per column (and per MAX7219)
pub const ROWS: usize = 8;

/// Columns driven by one chip
pub const COLUMNS_PER_CHIP: usize = 8;

/// Longest supported chain
pub const MAX_CHIPS: usize = 16;

/// Storage capacity in columns
pub const MAX_COLUMNS: usize = MAX_CHIPS * COLUMNS_PER_CHIP;

/// Column framebuffer for a chain of `chip_count` chips
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    columns: [u8; MAX_COLUMNS],
    width: usize,
}

impl FrameBuffer {
    /// Create an all-dark framebuffer sized for `chip_count` chips
    ///
    /// `chip_count` is clamped into `1..=MAX_CHIPS`; a validated
    /// configuration never hits the clamp.
    pub fn new(chip_count: usize) -> Self {
        let chips = chip_count.clamp(1, MAX_CHIPS);
        Self {
            columns: [0; MAX_COLUMNS],
            width: chips * COLUMNS_PER_CHIP,
        }
    }

    /// Display width in pixels (chip_count × 8)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of chips this buffer covers
    pub fn chip_count(&self) -> usize {
        self.width / COLUMNS_PER_CHIP
    }

    /// Turn every pixel off
    pub fn clear(&mut self) {
        self.columns[..self.width].fill(0);
    }

    /// Set or clear a single pixel
    ///
    /// Coordinates outside the display are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        let (Some(x), Some(y)) = (self.column_index(x), row_index(y)) else {
            return;
        };
        if on {
            self.columns[x] |= 1 << y;
        } else {
            self.columns[x] &= !(1 << y);
        }
    }

    /// Read a single pixel (false outside the display)
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        match (self.column_index(x), row_index(y)) {
            (Some(x), Some(y)) => self.columns[x] & (1 << y) != 0,
            _ => false,
        }
    }

    /// Overwrite a whole column, ignoring columns outside the display
    pub fn set_column(&mut self, x: i32, bits: u8) {
        if let Some(x) = self.column_index(x) {
            self.columns[x] = bits;
        }
    }

    /// Read one column
    pub fn column(&self, x: i32) -> Option<u8> {
        self.column_index(x).map(|x| self.columns[x])
    }

    /// All visible columns, left to right
    pub fn columns(&self) -> &[u8] {
        &self.columns[..self.width]
    }

    /// The eight columns driven by logical chip `chip`
    pub fn chip_columns(&self, chip: usize) -> Option<&[u8]> {
        let start = chip.checked_mul(COLUMNS_PER_CHIP)?;
        self.columns().get(start..start + COLUMNS_PER_CHIP)
    }

    fn column_index(&self, x: i32) -> Option<usize> {
        usize::try_from(x).ok().filter(|&x| x < self.width)
    }
}

fn row_index(y: i32) -> Option<usize> {
    usize::try_from(y).ok().filter(|&y| y < ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_follows_chip_count() {
        assert_eq!(FrameBuffer::new(4).width(), 32);
        assert_eq!(FrameBuffer::new(1).width(), 8);
        assert_eq!(FrameBuffer::new(0).width(), 8);
        assert_eq!(FrameBuffer::new(64).width(), MAX_COLUMNS);
        assert_eq!(FrameBuffer::new(4).chip_count(), 4);
    }

    #[test]
    fn test_new_is_dark() {
        let fb = FrameBuffer::new(4);
        assert!(fb.columns().iter().all(|&c| c == 0));
        assert_eq!(fb.columns().len(), 32);
    }

    #[test]
    fn test_set_and_clear_pixel() {
        let mut fb = FrameBuffer::new(4);

        fb.set_pixel(3, 2, true);
        assert_eq!(fb.column(3), Some(0b0000_0100));
        assert!(fb.pixel(3, 2));

        fb.set_pixel(3, 7, true);
        assert_eq!(fb.column(3), Some(0b1000_0100));

        fb.set_pixel(3, 2, false);
        assert_eq!(fb.column(3), Some(0b1000_0000));
        assert!(!fb.pixel(3, 2));
    }

    #[test]
    fn test_out_of_range_pixels_are_ignored() {
        let mut fb = FrameBuffer::new(4);
        let before = fb.clone();

        fb.set_pixel(32, 0, true);
        fb.set_pixel(0, 8, true);
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(0, -1, true);

        assert_eq!(fb, before);
        assert!(!fb.pixel(32, 0));
        assert_eq!(fb.column(32), None);
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new(2);
        fb.set_column(0, 0xFF);
        fb.set_column(15, 0x81);

        fb.clear();
        assert!(fb.columns().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_chip_columns() {
        let mut fb = FrameBuffer::new(4);
        fb.set_column(8, 0xAA);
        fb.set_column(15, 0x55);

        let chip1 = fb.chip_columns(1).unwrap();
        assert_eq!(chip1.len(), 8);
        assert_eq!(chip1[0], 0xAA);
        assert_eq!(chip1[7], 0x55);

        assert!(fb.chip_columns(4).is_none());
    }
}
