//! Bus mocks shared by the driver tests
//!
//! One `RefCell<Bus>` is shared between the SPI device and the control pins
//! so tests can see which DC level each transfer went out with.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, ErrorKind, Operation, SpiDevice};

/// One chip-select-framed write as seen on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// DC level during the transfer (true = data)
    pub data: bool,
    pub bytes: heapless::Vec<u8, 128>,
}

/// Shared bus state
#[derive(Debug, Default)]
pub struct Bus {
    pub dc_high: bool,
    pub backlight: bool,
    pub frames: heapless::Vec<Frame, 64>,
    /// XPT2046 responses: (x, y, z1)
    pub touch: (u16, u16, u16),
    /// Added to a response once per earlier conversion, so repeated
    /// conversions of one channel differ
    pub step: u16,
    /// Conversions answered so far
    pub conversions: u16,
}

impl Bus {
    pub fn commands(&self) -> impl Iterator<Item = u8> + '_ {
        self.frames
            .iter()
            .filter(|f| !f.data)
            .filter_map(|f| f.bytes.first().copied())
    }

    /// Parameter frame following the first occurrence of `cmd`
    pub fn params_of(&self, cmd: u8) -> Option<&[u8]> {
        let pos = self
            .frames
            .iter()
            .position(|f| !f.data && f.bytes.first() == Some(&cmd))?;
        self.frames
            .get(pos + 1)
            .filter(|f| f.data)
            .map(|f| f.bytes.as_slice())
    }

    fn response(&mut self, cmd: u8) -> u16 {
        let base = match cmd {
            0xD0 => self.touch.0,
            0x90 => self.touch.1,
            0xB0 => self.touch.2,
            _ => 0,
        };
        let value = base + self.step * self.conversions;
        self.conversions += 1;
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSpiError;

impl spi::Error for MockSpiError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockSpi<'a> {
    pub bus: &'a RefCell<Bus>,
    pub fail: bool,
}

impl<'a> MockSpi<'a> {
    pub fn new(bus: &'a RefCell<Bus>) -> Self {
        Self { bus, fail: false }
    }
}

impl spi::ErrorType for MockSpi<'_> {
    type Error = MockSpiError;
}

impl SpiDevice for MockSpi<'_> {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockSpiError);
        }
        let mut bus = self.bus.borrow_mut();
        for op in operations.iter_mut() {
            match op {
                Operation::Write(buf) => {
                    let frame = Frame {
                        data: bus.dc_high,
                        bytes: heapless::Vec::from_slice(buf).unwrap_or_default(),
                    };
                    let _ = bus.frames.push(frame);
                }
                Operation::Transfer(read, write) => {
                    let value = write.first().map(|&c| bus.response(c)).unwrap_or(0);
                    let shifted = (value << 3).to_be_bytes();
                    read.fill(0);
                    if read.len() >= 3 {
                        read[1] = shifted[0];
                        read[2] = shifted[1];
                    }
                    let frame = Frame {
                        data: bus.dc_high,
                        bytes: heapless::Vec::from_slice(write).unwrap_or_default(),
                    };
                    let _ = bus.frames.push(frame);
                }
                Operation::Read(buf) | Operation::TransferInPlace(buf) => buf.fill(0),
                Operation::DelayNs(_) => {}
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    Dc,
    Backlight,
}

pub struct MockPin<'a> {
    pub bus: &'a RefCell<Bus>,
    pub role: PinRole,
}

impl digital::ErrorType for MockPin<'_> {
    type Error = Infallible;
}

impl OutputPin for MockPin<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set(true);
        Ok(())
    }
}

impl MockPin<'_> {
    fn set(&mut self, high: bool) {
        let mut bus = self.bus.borrow_mut();
        match self.role {
            PinRole::Dc => bus.dc_high = high,
            PinRole::Backlight => bus.backlight = high,
        }
    }
}

/// Pen interrupt line
pub struct MockIrq {
    pub high: bool,
}

impl digital::ErrorType for MockIrq {
    type Error = Infallible;
}

impl InputPin for MockIrq {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high)
    }
}

pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
