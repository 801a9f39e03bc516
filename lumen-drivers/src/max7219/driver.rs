//! MAX7219 chain driver

use lumen_core::config::ChainOrder;
use lumen_core::framebuffer::{FrameBuffer, ROWS};
use lumen_core::traits::EnableLine;

use super::encoder::ChainEncoder;
use super::registers::Register;
use super::transport::{BufferedTransport, RawTransport};

/// Transmit attempts per transaction after init
pub const MAX_ATTEMPTS: u8 = 3;

/// Intensity programmed by the init sequence
pub const INIT_INTENSITY: u8 = 8;

/// Highest intensity register value
pub const MAX_INTENSITY: u8 = 15;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<E> {
    /// Transport failed during init (never retried)
    Transport(E),
    /// Every attempt of a runtime transaction failed
    RetriesExhausted,
}

/// Chain of MAX7219 8x8 matrix drivers behind a buffered transport
///
/// Owns the framebuffer. Drawing happens through [`Self::framebuffer_mut`];
/// nothing reaches the chips until [`Self::refresh`].
pub struct Max7219<B> {
    bus: B,
    encoder: ChainEncoder,
    framebuffer: FrameBuffer,
    faults: u32,
}

impl<B: BufferedTransport> Max7219<B> {
    /// Create a driver for `chip_count` chips (clamped into `1..=MAX_CHIPS`)
    ///
    /// Nothing is sent until [`Self::init`].
    pub fn new(bus: B, chip_count: usize, order: ChainOrder) -> Self {
        let encoder = ChainEncoder::new(chip_count, order);
        Self {
            bus,
            framebuffer: FrameBuffer::new(encoder.chip_count()),
            encoder,
            faults: 0,
        }
    }

    /// Program every chip for raw 8x8 matrix use and blank the display
    ///
    /// Any transport failure here is returned immediately.
    pub fn init(&mut self) -> Result<(), DriverError<B::Error>> {
        let sequence = [
            (Register::DisplayTest, 0),
            (Register::ScanLimit, 7),
            (Register::DecodeMode, 0),
            (Register::Intensity, INIT_INTENSITY),
            (Register::Shutdown, 1),
        ];
        for (register, value) in sequence {
            let tx = self.encoder.broadcast(register, value);
            self.bus.transmit(&tx).map_err(DriverError::Transport)?;
        }

        self.framebuffer.clear();
        for row in 0..ROWS {
            if let Some(tx) = self.encoder.row(&self.framebuffer, row) {
                self.bus.transmit(&tx).map_err(DriverError::Transport)?;
            }
        }
        Ok(())
    }

    /// Set hardware intensity on every chip (clamped to 15)
    pub fn set_intensity(&mut self, level: u8) -> Result<(), DriverError<B::Error>> {
        self.broadcast(Register::Intensity, level.min(MAX_INTENSITY))
    }

    /// Leave or enter shutdown through the buffered path
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), DriverError<B::Error>> {
        self.broadcast(Register::Shutdown, u8::from(enabled))
    }

    /// Light every LED (hardware test mode) or return to normal
    pub fn display_test(&mut self, enable: bool) -> Result<(), DriverError<B::Error>> {
        self.broadcast(Register::DisplayTest, u8::from(enable))
    }

    /// Blank the framebuffer and the chips
    pub fn clear(&mut self) -> Result<(), DriverError<B::Error>> {
        self.framebuffer.clear();
        self.refresh()
    }

    /// Send the framebuffer to the chips, one transaction per row
    ///
    /// Stops at the first row that cannot be sent.
    pub fn refresh(&mut self) -> Result<(), DriverError<B::Error>> {
        for row in 0..ROWS {
            if let Some(tx) = self.encoder.row(&self.framebuffer, row) {
                self.send(&tx)?;
            }
        }
        Ok(())
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.framebuffer
    }

    pub fn encoder(&self) -> &ChainEncoder {
        &self.encoder
    }

    /// Failed transmit attempts since creation
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// Give the transport back
    pub fn release(self) -> B {
        self.bus
    }

    fn broadcast(&mut self, register: Register, value: u8) -> Result<(), DriverError<B::Error>> {
        let tx = self.encoder.broadcast(register, value);
        self.send(&tx)
    }

    fn send(&mut self, tx: &[u8]) -> Result<(), DriverError<B::Error>> {
        for _ in 0..MAX_ATTEMPTS {
            if self.bus.transmit(tx).is_ok() {
                return Ok(());
            }
            self.faults = self.faults.saturating_add(1);
        }
        Err(DriverError::RetriesExhausted)
    }
}

/// Display enable through the raw transport
///
/// Broadcasts SHUTDOWN 1/0 as one burst. Used by the PWM interrupt.
pub struct ShutdownLine<R> {
    raw: R,
    encoder: ChainEncoder,
}

impl<R: RawTransport> ShutdownLine<R> {
    pub fn new(raw: R, encoder: ChainEncoder) -> Self {
        Self { raw, encoder }
    }
}

impl<R: RawTransport> EnableLine for ShutdownLine<R> {
    fn set_enabled_isr(&mut self, enabled: bool) {
        let tx = self.encoder.broadcast(Register::Shutdown, u8::from(enabled));
        self.raw.burst(&tx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::max7219::encoder::Transaction;
    use heapless::Vec;

    #[derive(Default)]
    struct MockBus {
        sent: Vec<Transaction, 32>,
        failures: u32,
    }

    impl BufferedTransport for MockBus {
        type Error = ();

        fn transmit(&mut self, bytes: &[u8]) -> Result<(), ()> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(());
            }
            let _ = self.sent.push(Transaction::from_slice(bytes).unwrap());
            Ok(())
        }
    }

    impl RawTransport for MockBus {
        fn burst(&mut self, bytes: &[u8]) {
            let _ = self.sent.push(Transaction::from_slice(bytes).unwrap());
        }
    }

    fn driver(chips: usize) -> Max7219<MockBus> {
        Max7219::new(MockBus::default(), chips, ChainOrder::Forward)
    }

    #[test]
    fn test_init_sequence() {
        let mut drv = driver(2);
        drv.init().unwrap();

        let sent = &drv.bus.sent;
        assert_eq!(sent.len(), 5 + ROWS);
        assert_eq!(sent[0].as_slice(), &[0x0F, 0, 0x0F, 0]);
        assert_eq!(sent[1].as_slice(), &[0x0B, 7, 0x0B, 7]);
        assert_eq!(sent[2].as_slice(), &[0x09, 0, 0x09, 0]);
        assert_eq!(sent[3].as_slice(), &[0x0A, 8, 0x0A, 8]);
        assert_eq!(sent[4].as_slice(), &[0x0C, 1, 0x0C, 1]);
        for row in 0..ROWS {
            let digit = row as u8 + 1;
            assert_eq!(sent[5 + row].as_slice(), &[digit, 0, digit, 0]);
        }
    }

    #[test]
    fn test_init_failure_is_not_retried() {
        let mut drv = driver(4);
        drv.bus.failures = 1;

        assert_eq!(drv.init(), Err(DriverError::Transport(())));
        assert!(drv.bus.sent.is_empty());
        assert_eq!(drv.fault_count(), 0);
    }

    #[test]
    fn test_set_intensity_clamps() {
        let mut drv = driver(4);
        drv.set_intensity(3).unwrap();
        drv.set_intensity(200).unwrap();

        assert_eq!(
            drv.bus.sent[0].as_slice(),
            &[0x0A, 0x03, 0x0A, 0x03, 0x0A, 0x03, 0x0A, 0x03]
        );
        assert_eq!(drv.bus.sent[1].as_slice(), &[0x0A, 15, 0x0A, 15, 0x0A, 15, 0x0A, 15]);
    }

    #[test]
    fn test_enable_and_display_test() {
        let mut drv = driver(1);
        drv.set_enabled(false).unwrap();
        drv.set_enabled(true).unwrap();
        drv.display_test(true).unwrap();

        assert_eq!(drv.bus.sent[0].as_slice(), &[0x0C, 0]);
        assert_eq!(drv.bus.sent[1].as_slice(), &[0x0C, 1]);
        assert_eq!(drv.bus.sent[2].as_slice(), &[0x0F, 1]);
    }

    #[test]
    fn test_refresh_sends_rows() {
        let mut drv = driver(1);
        drv.framebuffer_mut().set_column(0, 0xFF);
        drv.refresh().unwrap();

        assert_eq!(drv.bus.sent.len(), ROWS);
        for (row, tx) in drv.bus.sent.iter().enumerate() {
            assert_eq!(tx.as_slice(), &[row as u8 + 1, 0x80]);
        }
    }

    #[test]
    fn test_clear_zeroes_framebuffer() {
        let mut drv = driver(1);
        drv.framebuffer_mut().set_column(3, 0xFF);
        drv.clear().unwrap();

        assert!(drv.framebuffer().columns().iter().all(|&c| c == 0));
        assert!(drv.bus.sent.iter().all(|tx| tx[1] == 0));
    }

    #[test]
    fn test_transient_failure_is_retried() {
        let mut drv = driver(1);
        drv.bus.failures = 2;

        drv.set_intensity(1).unwrap();
        assert_eq!(drv.fault_count(), 2);
        assert_eq!(drv.bus.sent.len(), 1);
    }

    #[test]
    fn test_retries_exhausted_abandons_refresh() {
        let mut drv = driver(1);
        drv.bus.failures = MAX_ATTEMPTS as u32;

        assert_eq!(drv.refresh(), Err(DriverError::RetriesExhausted));
        assert_eq!(drv.fault_count(), 3);
        assert!(drv.bus.sent.is_empty());
    }

    #[test]
    fn test_shutdown_line_bursts_broadcast() {
        let drv = driver(3);
        let mut line = ShutdownLine::new(MockBus::default(), *drv.encoder());

        line.set_enabled_isr(false);
        line.set_enabled_isr(true);

        assert_eq!(line.raw.sent[0].as_slice(), &[0x0C, 0, 0x0C, 0, 0x0C, 0]);
        assert_eq!(line.raw.sent[1].as_slice(), &[0x0C, 1, 0x0C, 1, 0x0C, 1]);
    }
}
