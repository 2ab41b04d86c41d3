//! Zest Display LCD simple demo
//!
//! Shows "Hello from 6TRON!" centred on the panel and keeps the GUI ticking.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use static_cell::StaticCell;
use zest_display::{DrawBuffer, Gui, HelloScreen, PanelFlush, PanelBackend};
use {defmt_rtt as _, panic_probe as _};

use zest_demo::board::Board;
use zest_demo::config::{DISPLAY_CONFIG, DRAW_BUFFER_PIXELS};
use zest_demo::tasks::{dispatch_loop, heartbeat_task};

static DRAW_BUF: StaticCell<DrawBuffer<DRAW_BUFFER_PIXELS>> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Zest Display LCD simple demo");

    let p = embassy_stm32::init(zest_demo::board::chip_config());
    let Board {
        mut lcd,
        touch: _touch,
        led,
    } = Board::init(p);

    if let Err(e) = lcd.init(&mut Delay) {
        error!("Failed to initialize display: {:?}", Debug2Format(&e));
    } else {
        info!("Display initialized");
    }

    spawner.must_spawn(heartbeat_task(led));

    let screen = HelloScreen::new(lcd.resolution());
    let buffer = DRAW_BUF.init(DrawBuffer::new());
    let mut gui = match Gui::new(DISPLAY_CONFIG, buffer, PanelFlush::new(lcd), screen) {
        Ok(gui) => gui,
        Err(e) => defmt::panic!("Invalid display configuration: {:?}", e),
    };

    dispatch_loop(&mut gui).await
}
