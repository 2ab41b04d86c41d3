//! Embassy tasks and the display dispatch loop

use defmt::*;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Instant, Ticker};
use zest_display::{FlushCallback, Gui, InputDevice, Scene, TickReport};
use zest_hal::ActiveLevel;

/// LED1 toggle period
pub const HEARTBEAT_MS: u64 = 500;

/// Heartbeat task - blinks LED1 while the firmware is alive
#[embassy_executor::task]
pub async fn heartbeat_task(mut led: Output<'static>) {
    info!("Heartbeat task started");

    let mut ticker = Ticker::every(Duration::from_millis(HEARTBEAT_MS));
    loop {
        led.toggle();
        ticker.next().await;
    }
}

/// Advance the GUI to the current time and log the outcome
///
/// Flush errors are logged and dropped; the failed areas stay queued and
/// are retried on the next refresh.
pub fn run_tick<F, S, I, const N: usize>(gui: &mut Gui<'_, F, S, I, N>) -> Option<TickReport>
where
    F: FlushCallback,
    S: Scene,
    I: InputDevice,
{
    let now_ms = Instant::now().as_millis();
    match gui.timer_handler(now_ms) {
        Ok(report) => {
            if let Some(pointer) = report.pointer {
                debug!("Pointer {:?}", pointer);
            }
            if report.strips > 0 {
                trace!("Refreshed {} px in {} strips", report.pixels, report.strips);
            }
            Some(report)
        }
        Err(e) => {
            error!("Display refresh failed: {:?}", e);
            None
        }
    }
}

/// Tick the GUI every `tick_period_ms`, forever
pub async fn dispatch_loop<F, S, I, const N: usize>(gui: &mut Gui<'_, F, S, I, N>) -> !
where
    F: FlushCallback,
    S: Scene,
    I: InputDevice,
{
    let period = Duration::from_millis(gui.config().tick_period_ms as u64);
    info!("Dispatch loop started ({} ms tick)", gui.config().tick_period_ms);

    let mut ticker = Ticker::every(period);
    loop {
        run_tick(gui);
        ticker.next().await;
    }
}

/// Wait for the pen to go down
pub async fn wait_for_pen(irq: &mut ExtiInput<'static>, level: ActiveLevel) {
    match level {
        ActiveLevel::Low => irq.wait_for_falling_edge().await,
        ActiveLevel::High => irq.wait_for_rising_edge().await,
    }
}
