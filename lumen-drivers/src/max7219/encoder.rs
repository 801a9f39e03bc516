//! Chain wire encoding
//!
//! Every chip in the chain takes a 16-bit frame (register, data), MSB
//! first. A transaction for N chips is N frames back to back inside one
//! select pulse; on the rising edge of select each chip latches the frame
//! currently sitting in its shift register.
//!
//! ```text
//!  select ‾‾\________________________________________/‾‾
//!  DIN        [reg₀ data₀][reg₁ data₁] ... [regₙ dataₙ]
//!              frame 0     frame 1          frame N-1
//! ```
//!
//! Frame 0 is shifted furthest down the chain. Which logical chip that is
//! depends on the wiring, hence [`ChainOrder`].

use heapless::Vec;
use lumen_core::config::ChainOrder;
use lumen_core::framebuffer::{FrameBuffer, COLUMNS_PER_CHIP, MAX_CHIPS};

use super::registers::Register;

/// Bytes per chip frame
pub const FRAME_LEN: usize = 2;

/// Largest transaction (one frame per chip of the longest chain)
pub const MAX_TRANSACTION_LEN: usize = MAX_CHIPS * FRAME_LEN;

/// Encoded bytes for one chain transaction
pub type Transaction = Vec<u8, MAX_TRANSACTION_LEN>;

/// Builds chain transactions for a fixed chip count and order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChainEncoder {
    chip_count: usize,
    order: ChainOrder,
}

impl ChainEncoder {
    /// `chip_count` is clamped into `1..=MAX_CHIPS`
    pub fn new(chip_count: usize, order: ChainOrder) -> Self {
        Self {
            chip_count: chip_count.clamp(1, MAX_CHIPS),
            order,
        }
    }

    pub fn chip_count(&self) -> usize {
        self.chip_count
    }

    pub fn order(&self) -> ChainOrder {
        self.order
    }

    /// Same register write on every chip
    pub fn broadcast(&self, register: Register, value: u8) -> Transaction {
        self.per_chip(register, |_| value)
    }

    /// One register write per chip, `data(chip)` giving logical chip's value
    pub fn per_chip(&self, register: Register, data: impl Fn(usize) -> u8) -> Transaction {
        let mut tx = Transaction::new();
        for frame in 0..self.chip_count {
            let chip = self.chip_for_frame(frame);
            // chip_count <= MAX_CHIPS, so the buffer never fills
            let _ = tx.push(register.addr());
            let _ = tx.push(data(chip));
        }
        tx
    }

    /// Row `row` of the framebuffer as one transaction
    ///
    /// Returns `None` for rows outside `0..8`.
    pub fn row(&self, fb: &FrameBuffer, row: usize) -> Option<Transaction> {
        let register = Register::digit(row)?;
        Some(self.per_chip(register, |chip| {
            fb.chip_columns(chip)
                .map(|columns| row_byte(columns, row))
                .unwrap_or(0)
        }))
    }

    /// Logical chip that receives frame `frame`
    pub fn chip_for_frame(&self, frame: usize) -> usize {
        match self.order {
            ChainOrder::Forward => frame,
            ChainOrder::Reversed => self.chip_count - 1 - frame,
        }
    }
}

/// Pack bit `row` of up to eight columns into one byte, column 0 in the MSB
pub fn row_byte(columns: &[u8], row: usize) -> u8 {
    columns
        .iter()
        .take(COLUMNS_PER_CHIP)
        .enumerate()
        .fold(0, |byte, (col, &bits)| {
            if bits & (1 << row) != 0 {
                byte | (0x80 >> col)
            } else {
                byte
            }
        })
}
