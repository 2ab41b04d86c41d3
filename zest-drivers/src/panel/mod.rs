//! Panel controllers

pub mod ili9163c;

pub use ili9163c::{Ili9163c, Ili9163cConfig, Orientation};

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// Control pin (DC, backlight) could not be driven
    Pin,
}
