//! XPT2046 resistive touch controller
//!
//! Each conversion is one 3-byte SPI transfer: the control byte goes out
//! first, the 12-bit result comes back left-aligned in the next two bytes.
//! All control bytes select 12-bit differential mode with power-down between
//! conversions, which keeps PENIRQ armed.

use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiDevice;
use zest_display::{RawSample, RawTouchSource};
use zest_hal::ActiveLevel;

use super::Error;

/// Control bytes
mod cmd {
    pub const READ_X: u8 = 0xD0;
    pub const READ_Y: u8 = 0x90;
    pub const READ_Z1: u8 = 0xB0;
    #[allow(dead_code)]
    pub const READ_Z2: u8 = 0xC0;
}

/// Z1 readings below this are contact bounce, not a press
const PEN_FLOOR: u16 = 10;

/// Conversions averaged per axis
const OVERSAMPLE: u32 = 2;

/// XPT2046 driver
pub struct Xpt2046<SPI, IRQ> {
    spi: SPI,
    irq: IRQ,
    irq_level: ActiveLevel,
}

impl<SPI, IRQ> Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    /// Create a driver; PENIRQ is active low on the XPT2046
    pub fn new(spi: SPI, irq: IRQ) -> Self {
        Self {
            spi,
            irq,
            irq_level: ActiveLevel::Low,
        }
    }

    /// Override the PENIRQ polarity (for boards with an inverting buffer)
    pub fn with_irq_level(mut self, level: ActiveLevel) -> Self {
        self.irq_level = level;
        self
    }

    /// Pen interrupt pin, e.g. to await an edge on it
    pub fn irq_mut(&mut self) -> &mut IRQ {
        &mut self.irq
    }

    /// Whether PENIRQ reports a touch
    pub fn is_touched(&mut self) -> Result<bool, Error<SPI::Error>> {
        let high = self.irq.is_high().map_err(|_| Error::Pin)?;
        Ok(self.irq_level.is_active(high))
    }

    /// Run one conversion and return the 12-bit result
    pub fn read_channel(&mut self, command: u8) -> Result<u16, Error<SPI::Error>> {
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &[command, 0, 0])
            .map_err(Error::Spi)?;
        Ok((u16::from_be_bytes([rx[1], rx[2]]) >> 3) & 0x0FFF)
    }

    fn read_averaged(&mut self, command: u8) -> Result<u16, Error<SPI::Error>> {
        let mut sum = 0u32;
        for _ in 0..OVERSAMPLE {
            sum += self.read_channel(command)? as u32;
        }
        Ok((sum / OVERSAMPLE) as u16)
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, IRQ) {
        (self.spi, self.irq)
    }
}

impl<SPI, IRQ> RawTouchSource for Xpt2046<SPI, IRQ>
where
    SPI: SpiDevice,
    IRQ: InputPin,
{
    type Error = Error<SPI::Error>;

    fn sample(&mut self) -> Result<Option<RawSample>, Self::Error> {
        if !self.is_touched()? {
            return Ok(None);
        }

        let z = self.read_channel(cmd::READ_Z1)?;
        if z < PEN_FLOOR {
            return Ok(None);
        }

        let x = self.read_averaged(cmd::READ_X)?;
        let y = self.read_averaged(cmd::READ_Y)?;
        Ok(Some(RawSample { x, y, z }))
    }
}
