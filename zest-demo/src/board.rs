//! Zest Core STM32L4A6RG wiring for the Zest Display LCD on connector P1
//!
//! | Signal        | Pin  | Use                          |
//! |---------------|------|------------------------------|
//! | P1_SPI_SCK    | PA5  | SPI1 clock                   |
//! | P1_SPI_MISO   | PA6  | SPI1 data in (touch only)    |
//! | P1_SPI_MOSI   | PA7  | SPI1 data out                |
//! | P1_SPI_CS     | PA4  | LCD chip select              |
//! | P1_DIO2       | PB1  | LCD data/command             |
//! | P1_PWM1       | PA8  | LCD backlight                |
//! | P1_DIO1       | PB0  | touch chip select            |
//! | P1_DIO3       | PB2  | touch PENIRQ (EXTI2)         |
//! | LED1          | PB5  | heartbeat                    |
//!
//! The LCD and the touch controller share SPI1. Each device re-applies its
//! own clock and mode at the start of every transaction.

use core::cell::RefCell;

use embassy_embedded_hal::shared_bus::blocking::spi::SpiDeviceWithConfig;
use embassy_stm32::exti::{self, ExtiInput};
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::mode::Blocking;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, interrupt, Config, Peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use static_cell::StaticCell;
use zest_drivers::panel::Ili9163c;
use zest_drivers::touch::Xpt2046;
use zest_hal::{Mode, SpiConfig};

use crate::config::{LCD_SPI, PANEL_CONFIG, TOUCH_IRQ, TOUCH_SPI};

bind_interrupts!(pub struct Irqs {
    EXTI2 => exti::InterruptHandler<interrupt::typelevel::EXTI2>;
});

/// Blocking SPI1 shared by the LCD and the touch controller
pub type SpiBus = Mutex<CriticalSectionRawMutex, RefCell<Spi<'static, Blocking, spi::mode::Master>>>;

/// One chip select on the shared bus
pub type BusDevice =
    SpiDeviceWithConfig<'static, CriticalSectionRawMutex, Spi<'static, Blocking, spi::mode::Master>, Output<'static>>;

/// ILI9163C panel on P1
pub type Lcd = Ili9163c<BusDevice, Output<'static>, Output<'static>>;

/// XPT2046 touch controller on P1
pub type Touch = Xpt2046<BusDevice, ExtiInput<'static>>;

static SPI_BUS: StaticCell<SpiBus> = StaticCell::new();

/// Chip configuration: 72 MHz from the HSI-driven PLL
pub fn chip_config() -> Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hsi = true;
    config.rcc.pll = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL18,
        divp: None,
        divq: None,
        divr: Some(PllRDiv::DIV4),
    });
    config.rcc.sys = Sysclk::PLL1_R;
    config
}

/// Map a bus-agnostic device configuration onto the STM32 SPI peripheral
pub fn spi_config(device: &SpiConfig) -> spi::Config {
    let mut config = spi::Config::default();
    config.frequency = Hertz(device.frequency);
    config.mode = match device.mode() {
        Mode::Mode0 => spi::MODE_0,
        Mode::Mode1 => spi::MODE_1,
        Mode::Mode2 => spi::MODE_2,
        Mode::Mode3 => spi::MODE_3,
    };
    config
}

/// Devices on the Zest Display LCD board
pub struct Board {
    pub lcd: Lcd,
    pub touch: Touch,
    pub led: Output<'static>,
}

impl Board {
    /// Split the chip peripherals into the P1 devices
    ///
    /// Both chip selects start deasserted. Must be called once.
    pub fn init(p: Peripherals) -> Self {
        let spi = Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config(&LCD_SPI));
        let bus: &'static SpiBus = SPI_BUS.init(Mutex::new(RefCell::new(spi)));

        let lcd_cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
        let lcd_dc = Output::new(p.PB1, Level::Low, Speed::VeryHigh);
        let backlight = Output::new(p.PA8, Level::Low, Speed::Low);
        let lcd = Ili9163c::new(
            SpiDeviceWithConfig::new(bus, lcd_cs, spi_config(&LCD_SPI)),
            lcd_dc,
            backlight,
            PANEL_CONFIG,
        );

        let touch_cs = Output::new(p.PB0, Level::High, Speed::Medium);
        let pen_irq = ExtiInput::new(p.PB2, p.EXTI2, Pull::Up, Irqs);
        let touch = Xpt2046::new(
            SpiDeviceWithConfig::new(bus, touch_cs, spi_config(&TOUCH_SPI)),
            pen_irq,
        )
        .with_irq_level(TOUCH_IRQ);

        let led = Output::new(p.PB5, Level::Low, Speed::Low);

        Self { lcd, touch, led }
    }
}
