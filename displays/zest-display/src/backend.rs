//! Display backend trait
//!
//! Defines the two controller operations a flush needs.

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb565;

use crate::area::Area;
use crate::config::ConfigError;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Buffer overflow
    BufferOverflow,
    /// Rejected runtime configuration
    Config(ConfigError),
}

impl From<ConfigError> for DisplayError {
    fn from(e: ConfigError) -> Self {
        DisplayError::Config(e)
    }
}

/// Panel controller backend
///
/// Provides the hardware-agnostic pair of calls behind every flush: open an
/// address window on the controller's frame memory, then stream pixels into
/// it. Implementations handle command encoding and bus transfers.
pub trait PanelBackend {
    /// Set the controller's write window to `area` (inclusive corners)
    ///
    /// Subsequent [`write_pixels`](Self::write_pixels) calls fill this window
    /// left to right, top to bottom.
    fn set_address_window(&mut self, area: &Area) -> Result<(), DisplayError>;

    /// Write 16-bit pixels into the current window
    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Panel resolution in pixels
    fn resolution(&self) -> Size;

    /// Check if the panel is initialized and accepting data
    fn is_ready(&self) -> bool;
}

impl<T: PanelBackend + ?Sized> PanelBackend for &mut T {
    fn set_address_window(&mut self, area: &Area) -> Result<(), DisplayError> {
        (**self).set_address_window(area)
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        (**self).write_pixels(pixels)
    }

    fn resolution(&self) -> Size {
        (**self).resolution()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
