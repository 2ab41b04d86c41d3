//! Board configuration
//!
//! Constants generated by `build.rs` from `display.toml`.

use embedded_graphics::pixelcolor::Rgb565;
use zest_display::{DisplayConfig, TouchCalibration, TouchConfig};
use zest_drivers::panel::{Ili9163cConfig, Orientation};
use zest_hal::{spi::Mode, ActiveLevel, SpiConfig};

include!(concat!(env!("OUT_DIR"), "/display_config.rs"));
