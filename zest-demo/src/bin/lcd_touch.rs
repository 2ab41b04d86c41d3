//! Zest Display LCD touch demo
//!
//! Shows the last touched point with a crosshair and a coordinate readout.
//! The pen interrupt wakes the dispatch loop early so a press is picked up
//! on the next due read rather than after a full tick.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::select;
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;
use zest_display::{DrawBuffer, Gui, PanelBackend, PanelFlush, TouchScreen, Touchpad};
use {defmt_rtt as _, panic_probe as _};

use zest_demo::board::Board;
use zest_demo::config::{DISPLAY_CONFIG, DRAW_BUFFER_PIXELS, TOUCH_CONFIG, TOUCH_IRQ};
use zest_demo::tasks::{heartbeat_task, run_tick, wait_for_pen};

static DRAW_BUF: StaticCell<DrawBuffer<DRAW_BUFFER_PIXELS>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Zest Display LCD touch demo");

    let p = embassy_stm32::init(zest_demo::board::chip_config());
    let Board { mut lcd, touch, led } = Board::init(p);

    if let Err(e) = lcd.init(&mut Delay) {
        error!("Failed to initialize display: {:?}", Debug2Format(&e));
    } else {
        info!("Display initialized");
    }

    spawner.must_spawn(heartbeat_task(led));

    let size = lcd.resolution();
    let touchpad = Touchpad::new(touch, TOUCH_CONFIG, size);
    let buffer = DRAW_BUF.init(DrawBuffer::new());
    let screen = TouchScreen::new(size);
    let mut gui = match Gui::new(DISPLAY_CONFIG, buffer, PanelFlush::new(lcd), screen) {
        Ok(gui) => gui.with_input(touchpad, TOUCH_CONFIG.read_period_ms),
        Err(e) => defmt::panic!("Invalid display configuration: {:?}", e),
    };
    info!(
        "Touch calibration x={}..{} y={}..{}",
        TOUCH_CONFIG.calibration.x_min,
        TOUCH_CONFIG.calibration.x_max,
        TOUCH_CONFIG.calibration.y_min,
        TOUCH_CONFIG.calibration.y_max
    );

    let mut ticker = Ticker::every(Duration::from_millis(DISPLAY_CONFIG.tick_period_ms as u64));
    let mut was_pressed = false;
    loop {
        run_tick(&mut gui);

        // Input is read before the refresh, so this holds even if the flush failed
        let pointer = gui.last_pointer();
        let pressed = pointer.is_pressed();
        if pressed && !was_pressed {
            if let Some(raw) = gui.input_mut().last_raw() {
                info!("Touch at {} (raw {})", pointer.point, raw);
            }
        }
        was_pressed = pressed;

        let irq = gui.input_mut().source_mut().irq_mut();
        select(ticker.next(), wait_for_pen(irq, TOUCH_IRQ)).await;
    }
}
