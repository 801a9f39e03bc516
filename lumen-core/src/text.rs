//! Text rendering into the framebuffer
//!
//! Glyphs may start off-screen on either side; columns that fall outside
//! the display are dropped, which is what makes scroll-in/out work.

use crate::font::{glyph, GLYPH_SPACING, GLYPH_WIDTH};
use crate::framebuffer::FrameBuffer;

/// Pixel width of `text` when drawn with [`FrameBuffer::draw_string`]
///
/// Every character advances by glyph width plus spacing; the trailing
/// spacing after the last character is not counted.
pub fn string_width(text: &str) -> usize {
    let count = text.chars().count();
    (count * (GLYPH_WIDTH + GLYPH_SPACING)).saturating_sub(GLYPH_SPACING)
}

impl FrameBuffer {
    /// Draw one character with its left edge at column `x`
    ///
    /// Overwrites the five columns it covers and returns the glyph width.
    pub fn draw_char(&mut self, x: i32, c: char) -> usize {
        for (offset, &bits) in glyph(c).iter().enumerate() {
            self.set_column(x.saturating_add(offset as i32), bits);
        }
        GLYPH_WIDTH
    }

    /// Clear the display and draw `text` starting at column `x`
    pub fn draw_string(&mut self, x: i32, text: &str) {
        self.clear();

        let mut x = x;
        for c in text.chars() {
            let advance = self.draw_char(x, c) + GLYPH_SPACING;
            x = x.saturating_add(advance as i32);
        }
    }
}
