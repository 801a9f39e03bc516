//! Right-to-left marquee position

/// Scroll position for a message moving right to left across the display
///
/// The message enters from the right edge, moves one column per tick and
/// restarts at the right edge once its last column has left on the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scroller {
    position: i32,
    display_width: i32,
    text_width: i32,
}

impl Scroller {
    /// Start a scroll with the message just beyond the right edge
    pub fn new(display_width: usize, text_width: usize) -> Self {
        let display_width = i32::try_from(display_width).unwrap_or(i32::MAX);
        Self {
            position: display_width,
            display_width,
            text_width: i32::try_from(text_width).unwrap_or(i32::MAX),
        }
    }

    /// Column where the message should be drawn this tick
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Move one column left, wrapping once the message is fully off-screen
    pub fn advance(&mut self) {
        self.position -= 1;
        if self.position < -self.text_width {
            self.position = self.display_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_at_right_edge() {
        let scroller = Scroller::new(32, 11);
        assert_eq!(scroller.position(), 32);
    }

    #[test]
    fn test_wraps_exactly_past_text_width() {
        let mut scroller = Scroller::new(32, 11);

        // 32 down to -11 inclusive is 44 positions
        for expected in (-11..=32).rev() {
            assert_eq!(scroller.position(), expected);
            scroller.advance();
        }
        assert_eq!(scroller.position(), 32);
    }

    #[test]
    fn test_empty_message_wraps_after_zero() {
        let mut scroller = Scroller::new(8, 0);
        for _ in 0..8 {
            scroller.advance();
        }
        assert_eq!(scroller.position(), 0);
        scroller.advance();
        assert_eq!(scroller.position(), 8);
    }

    proptest! {
        #[test]
        fn prop_loop_period(display in 1usize..128, text in 0usize..600) {
            let mut scroller = Scroller::new(display, text);
            let period = display + text + 1;

            for _ in 0..period {
                prop_assert!(scroller.position() >= -(text as i32));
                prop_assert!(scroller.position() <= display as i32);
                scroller.advance();
            }
            prop_assert_eq!(scroller.position(), display as i32);
        }
    }
}
