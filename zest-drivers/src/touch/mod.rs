//! Touch controllers

pub mod xpt2046;

pub use xpt2046::Xpt2046;

/// Touch driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// Pen interrupt line could not be read
    Pin,
}
