//! ILI9163C TFT controller
//!
//! Driver for the 128x160 RGB565 panel on the Zest Display LCD, over SPI with
//! a separate data/command line. Frame memory is written through an address
//! window, so the panel never needs a full-frame buffer on the MCU side.

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use zest_display::{Area, DisplayError, PanelBackend, SCREEN_HEIGHT, SCREEN_WIDTH};
use zest_hal::ActiveLevel;

use super::Error;

/// ILI9163C commands
#[allow(dead_code)]
mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const PASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// COLMOD value for 16 bits per pixel
const PIXEL_FORMAT_16BIT: u8 = 0x05;

/// MADCTL bit selecting BGR subpixel order
const MADCTL_BGR: u8 = 0x08;

/// Time the controller needs after reset and sleep-out
const WAKE_DELAY_MS: u32 = 120;

/// Pixels sent per SPI write
const CHUNK_PIXELS: usize = 64;

/// Scan direction of frame memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Orientation {
    /// MY/MX/MV bits of MADCTL
    pub const fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => 0x00,
            Orientation::Landscape => 0x60,
            Orientation::PortraitFlipped => 0xC0,
            Orientation::LandscapeFlipped => 0xA0,
        }
    }

    /// Rows and columns are exchanged
    pub const fn is_landscape(self) -> bool {
        matches!(self, Orientation::Landscape | Orientation::LandscapeFlipped)
    }
}

/// Panel geometry and wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ili9163cConfig {
    /// Native (portrait) width
    pub width: u16,
    /// Native (portrait) height
    pub height: u16,
    /// Column of frame memory where the visible glass starts
    pub x_offset: u16,
    /// Row of frame memory where the visible glass starts
    pub y_offset: u16,
    pub orientation: Orientation,
    /// Panel uses BGR subpixel order
    pub bgr: bool,
    pub backlight: ActiveLevel,
}

impl Default for Ili9163cConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Ili9163cConfig {
    /// Zest Display LCD defaults
    pub const fn new() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            x_offset: 0,
            y_offset: 0,
            orientation: Orientation::Portrait,
            bgr: true,
            backlight: ActiveLevel::High,
        }
    }

    /// Visible resolution in the configured orientation
    pub const fn resolution(&self) -> Size {
        if self.orientation.is_landscape() {
            Size::new(self.height as u32, self.width as u32)
        } else {
            Size::new(self.width as u32, self.height as u32)
        }
    }

    fn madctl(&self) -> u8 {
        let bgr = if self.bgr { MADCTL_BGR } else { 0 };
        self.orientation.madctl() | bgr
    }
}

/// ILI9163C driver
pub struct Ili9163c<SPI, DC, BL> {
    spi: SPI,
    dc: DC,
    backlight: BL,
    config: Ili9163cConfig,
    initialized: bool,
}

impl<SPI, DC, BL> Ili9163c<SPI, DC, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    BL: OutputPin,
{
    /// Create a driver; the panel is not touched until [`init`](Self::init)
    pub fn new(spi: SPI, dc: DC, backlight: BL, config: Ili9163cConfig) -> Self {
        Self {
            spi,
            dc,
            backlight,
            config,
            initialized: false,
        }
    }

    /// Reset the controller and turn the display and backlight on
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<SPI::Error>> {
        self.initialized = false;

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(WAKE_DELAY_MS);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(WAKE_DELAY_MS);

        self.command(cmd::COLMOD, &[PIXEL_FORMAT_16BIT])?;
        self.command(cmd::MADCTL, &[self.config.madctl()])?;
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;
        self.set_backlight(true)?;

        self.initialized = true;
        Ok(())
    }

    /// Send a command byte followed by its parameters
    pub fn command(&mut self, command: u8, params: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.dc.set_low().map_err(|_| Error::Pin)?;
        self.spi.write(&[command]).map_err(Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| Error::Pin)?;
            self.spi.write(params).map_err(Error::Spi)?;
        }
        Ok(())
    }

    /// Open a write window (visible coordinates, inclusive) and start RAMWR
    pub fn set_addr(&mut self, x1: u16, y1: u16, x2: u16, y2: u16) -> Result<(), Error<SPI::Error>> {
        // Offsets follow the glass, which rotates with the scan direction
        let (xo, yo) = if self.config.orientation.is_landscape() {
            (self.config.y_offset, self.config.x_offset)
        } else {
            (self.config.x_offset, self.config.y_offset)
        };
        let (x1, x2) = (x1 + xo, x2 + xo);
        let (y1, y2) = (y1 + yo, y2 + yo);

        let [x1h, x1l] = x1.to_be_bytes();
        let [x2h, x2l] = x2.to_be_bytes();
        self.command(cmd::CASET, &[x1h, x1l, x2h, x2l])?;

        let [y1h, y1l] = y1.to_be_bytes();
        let [y2h, y2l] = y2.to_be_bytes();
        self.command(cmd::PASET, &[y1h, y1l, y2h, y2l])?;

        self.command(cmd::RAMWR, &[])
    }

    /// Stream pixels into the open window, high byte first
    pub fn write_data_16(&mut self, pixels: &[Rgb565]) -> Result<(), Error<SPI::Error>> {
        self.dc.set_high().map_err(|_| Error::Pin)?;

        let mut bytes = [0u8; CHUNK_PIXELS * 2];
        for chunk in pixels.chunks(CHUNK_PIXELS) {
            for (dst, px) in bytes.chunks_exact_mut(2).zip(chunk) {
                dst.copy_from_slice(&px.into_storage().to_be_bytes());
            }
            self.spi.write(&bytes[..chunk.len() * 2]).map_err(Error::Spi)?;
        }
        Ok(())
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) -> Result<(), Error<SPI::Error>> {
        let result = if self.config.backlight.level_for(on) {
            self.backlight.set_high()
        } else {
            self.backlight.set_low()
        };
        result.map_err(|_| Error::Pin)
    }

    /// Turn the display output on or off without losing frame memory
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error<SPI::Error>> {
        self.command(if on { cmd::DISPON } else { cmd::DISPOFF }, &[])
    }

    /// Invert all colours
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error<SPI::Error>> {
        self.command(if inverted { cmd::INVON } else { cmd::INVOFF }, &[])
    }

    /// Whether [`init`](Self::init) has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &Ili9163cConfig {
        &self.config
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, BL) {
        (self.spi, self.dc, self.backlight)
    }
}

impl<SPI, DC, BL> PanelBackend for Ili9163c<SPI, DC, BL>
where
    SPI: SpiDevice,
    DC: OutputPin,
    BL: OutputPin,
{
    fn set_address_window(&mut self, area: &Area) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        let size = self.config.resolution();
        if !area.is_valid() || area.x2 as u32 >= size.width || area.y2 as u32 >= size.height {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.set_addr(area.x1, area.y1, area.x2, area.y2)
            .map_err(|_| DisplayError::Communication)
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        if !self.initialized {
            return Err(DisplayError::NotInitialized);
        }
        self.write_data_16(pixels)
            .map_err(|_| DisplayError::Communication)
    }

    fn resolution(&self) -> Size {
        self.config.resolution()
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Bus, MockPin, MockSpi, NoDelay, PinRole};
    use core::cell::RefCell;
    use embedded_graphics::pixelcolor::RgbColor;

    type Panel<'a> = Ili9163c<MockSpi<'a>, MockPin<'a>, MockPin<'a>>;

    fn panel(bus: &RefCell<Bus>, config: Ili9163cConfig) -> Panel<'_> {
        Ili9163c::new(
            MockSpi::new(bus),
            MockPin { bus, role: PinRole::Dc },
            MockPin { bus, role: PinRole::Backlight },
            config,
        )
    }

    #[test]
    fn test_init_sequence() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = panel(&bus, Ili9163cConfig::new());
        assert!(!lcd.is_ready());

        lcd.init(&mut NoDelay).unwrap();
        assert!(lcd.is_initialized());

        let bus = bus.borrow();
        let cmds: heapless::Vec<u8, 16> = bus.commands().collect();
        assert_eq!(
            cmds.as_slice(),
            &[cmd::SWRESET, cmd::SLPOUT, cmd::COLMOD, cmd::MADCTL, cmd::NORON, cmd::DISPON]
        );
        assert_eq!(bus.params_of(cmd::COLMOD), Some(&[0x05][..]));
        assert_eq!(bus.params_of(cmd::MADCTL), Some(&[0x08][..]));
        assert!(bus.backlight);
    }

    #[test]
    fn test_address_window_encoding() {
        let bus = RefCell::new(Bus::default());
        let config = Ili9163cConfig {
            x_offset: 2,
            y_offset: 1,
            ..Ili9163cConfig::new()
        };
        let mut lcd = panel(&bus, config);
        lcd.init(&mut NoDelay).unwrap();
        bus.borrow_mut().frames.clear();

        lcd.set_address_window(&Area::new(0, 150, 127, 159)).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.params_of(cmd::CASET), Some(&[0, 2, 0, 129][..]));
        assert_eq!(bus.params_of(cmd::PASET), Some(&[0, 151, 0, 160][..]));
        assert_eq!(bus.commands().last(), Some(cmd::RAMWR));
    }

    #[test]
    fn test_pixels_are_big_endian_and_chunked() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = panel(&bus, Ili9163cConfig::new());
        lcd.init(&mut NoDelay).unwrap();
        bus.borrow_mut().frames.clear();

        let mut pixels = [Rgb565::WHITE; 70];
        pixels[0] = Rgb565::RED;
        lcd.write_pixels(&pixels).unwrap();

        let bus = bus.borrow();
        assert_eq!(bus.frames.len(), 2);
        assert!(bus.frames.iter().all(|f| f.data));
        assert_eq!(bus.frames[0].bytes.len(), 128);
        assert_eq!(&bus.frames[0].bytes[..4], &[0xF8, 0x00, 0xFF, 0xFF]);
        assert_eq!(bus.frames[1].bytes.len(), 12);
    }

    #[test]
    fn test_rejects_use_before_init() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = panel(&bus, Ili9163cConfig::new());
        assert_eq!(
            lcd.set_address_window(&Area::new(0, 0, 1, 1)),
            Err(DisplayError::NotInitialized)
        );
        assert_eq!(
            lcd.write_pixels(&[Rgb565::BLACK]),
            Err(DisplayError::NotInitialized)
        );
        assert!(bus.borrow().frames.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_window() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = panel(&bus, Ili9163cConfig::new());
        lcd.init(&mut NoDelay).unwrap();
        assert_eq!(
            lcd.set_address_window(&Area::new(0, 0, 128, 10)),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            lcd.set_address_window(&Area::new(10, 0, 5, 10)),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_landscape_swaps_resolution() {
        let bus = RefCell::new(Bus::default());
        let config = Ili9163cConfig {
            orientation: Orientation::Landscape,
            bgr: false,
            ..Ili9163cConfig::new()
        };
        let mut lcd = panel(&bus, config);
        assert_eq!(lcd.resolution(), Size::new(160, 128));

        lcd.init(&mut NoDelay).unwrap();
        assert_eq!(bus.borrow().params_of(cmd::MADCTL), Some(&[0x60][..]));
        assert!(lcd.set_address_window(&Area::new(0, 0, 159, 127)).is_ok());
    }

    #[test]
    fn test_spi_failure_maps_to_communication() {
        let bus = RefCell::new(Bus::default());
        let mut lcd = panel(&bus, Ili9163cConfig::new());
        lcd.init(&mut NoDelay).unwrap();
        lcd.spi.fail = true;
        assert_eq!(
            lcd.write_pixels(&[Rgb565::BLACK]),
            Err(DisplayError::Communication)
        );
    }

    #[test]
    fn test_backlight_active_low() {
        let bus = RefCell::new(Bus::default());
        let config = Ili9163cConfig {
            backlight: ActiveLevel::Low,
            ..Ili9163cConfig::new()
        };
        let mut lcd = panel(&bus, config);
        lcd.init(&mut NoDelay).unwrap();
        assert!(!bus.borrow().backlight);
        lcd.set_backlight(false).unwrap();
        assert!(bus.borrow().backlight);
    }
}
