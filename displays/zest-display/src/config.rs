//! Display and touch configuration
//!
//! Defaults describe the Zest Display LCD: a 128x160 ILI9163C panel with a
//! ten-line partial draw buffer. Board-specific overrides come from the
//! firmware's `display.toml`, validated at build time.

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::touch::TouchCalibration;

/// Panel width in pixels
pub const SCREEN_WIDTH: u16 = 128;

/// Panel height in pixels
pub const SCREEN_HEIGHT: u16 = 160;

/// Rows held by the partial draw buffer
pub const BUFFER_LINES: u16 = 10;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero
    ZeroResolution,
    /// Draw buffer must hold at least one line
    ZeroBufferLines,
    /// Dispatch tick slower than the refresh period
    TickTooSlow,
    /// Period must be non-zero
    ZeroPeriod,
    /// Width/height differ from the panel's resolution
    ResolutionMismatch,
}

/// Display runtime configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Horizontal resolution
    pub width: u16,
    /// Vertical resolution
    pub height: u16,
    /// Maximum rows rendered per flush
    pub buffer_lines: u16,
    /// Minimum time between two refreshes
    pub refresh_period_ms: u32,
    /// Dispatch loop sleep between `timer_handler` calls
    pub tick_period_ms: u32,
    /// Screen background colour
    pub background: Rgb565,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayConfig {
    /// Zest Display LCD defaults
    pub const fn new() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            buffer_lines: BUFFER_LINES,
            refresh_period_ms: 30,
            tick_period_ms: 10,
            background: Rgb565::WHITE,
        }
    }

    /// Resolution as an embedded-graphics size
    pub const fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    /// Check the configuration for values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if self.buffer_lines == 0 {
            return Err(ConfigError::ZeroBufferLines);
        }
        if self.tick_period_ms == 0 || self.refresh_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.tick_period_ms > self.refresh_period_ms {
            return Err(ConfigError::TickTooSlow);
        }
        Ok(())
    }
}

/// Touch input configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchConfig {
    /// Raw-to-screen mapping
    pub calibration: TouchCalibration,
    /// Minimum Z1 reading counted as a press
    pub pressure_threshold: u16,
    /// Minimum time between two input reads
    pub read_period_ms: u32,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchConfig {
    /// Defaults for a 12-bit resistive controller
    pub const fn new() -> Self {
        Self {
            calibration: TouchCalibration::new(),
            pressure_threshold: 100,
            read_period_ms: 30,
        }
    }

    /// Check the configuration for values the runtime cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(DisplayConfig::default().validate(), Ok(()));
        assert_eq!(TouchConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = DisplayConfig::new();
        config.height = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroResolution));

        let mut config = DisplayConfig::new();
        config.buffer_lines = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroBufferLines));

        let mut config = DisplayConfig::new();
        config.tick_period_ms = 50;
        assert_eq!(config.validate(), Err(ConfigError::TickTooSlow));

        let mut touch = TouchConfig::new();
        touch.read_period_ms = 0;
        assert_eq!(touch.validate(), Err(ConfigError::ZeroPeriod));
    }

    #[test]
    fn test_size() {
        assert_eq!(DisplayConfig::new().size(), Size::new(128, 160));
    }
}
