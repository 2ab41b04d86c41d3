//! Dispatch runtime
//!
//! [`Gui`] owns the draw buffer, the flush callback, the input device and
//! the scene. The firmware calls [`Gui::timer_handler`] from its dispatch
//! loop; each call may poll the input device and, when a refresh is due,
//! re-render the invalidated regions strip by strip.
//!
//! Timing is driven by the caller's millisecond clock so the runtime has no
//! dependency on a particular timer.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb565;
use heapless::Vec;

use crate::area::Area;
use crate::backend::DisplayError;
use crate::config::{ConfigError, DisplayConfig};
use crate::draw_buf::DrawBuffer;
use crate::flush::FlushCallback;
use crate::input::{InputDevice, NoInput, PointerState};

/// Maximum distinct regions queued for redraw
pub const MAX_INVALID_AREAS: usize = 8;

/// Something that can be rendered and can react to the pointer
pub trait Scene {
    /// Draw the scene
    ///
    /// The target may cover only part of the screen; drawing outside it is
    /// clipped, so scenes simply draw everything.
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    /// React to a pointer update, marking changed regions in `invalid`
    fn handle_pointer(&mut self, pointer: &PointerState, invalid: &mut InvalidAreas) {
        let _ = (pointer, invalid);
    }
}

/// Queue of screen regions waiting to be redrawn
///
/// Areas are clipped to the screen and merged with overlapping or adjacent
/// neighbours when the merge does not redraw more pixels than the two parts.
/// If the queue overflows it collapses into a single full-screen area.
#[derive(Debug, Clone)]
pub struct InvalidAreas {
    screen: Size,
    areas: Vec<Area, MAX_INVALID_AREAS>,
}

impl InvalidAreas {
    /// Empty queue for a screen of `screen` size
    pub fn new(screen: Size) -> Self {
        Self {
            screen,
            areas: Vec::new(),
        }
    }

    /// Mark `area` for redraw
    pub fn invalidate(&mut self, area: Area) {
        let Some(mut merged) = area.clip_to(self.screen) else {
            return;
        };

        loop {
            let mut changed = false;
            let mut i = 0;
            while i < self.areas.len() {
                let other = self.areas[i];
                if other.union(&merged) == other {
                    // Already covered
                    return;
                }
                let union = merged.union(&other);
                if merged.touches(&other)
                    && union.pixel_count() <= merged.pixel_count() + other.pixel_count()
                {
                    merged = union;
                    self.areas.swap_remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
            if !changed {
                break;
            }
        }

        if self.areas.push(merged).is_err() {
            self.invalidate_all();
        }
    }

    /// Mark the whole screen for redraw
    pub fn invalidate_all(&mut self) {
        self.areas.clear();
        if self.screen.width > 0 && self.screen.height > 0 {
            let _ = self.areas.push(Area::full_screen(self.screen));
        }
    }

    /// Queued areas
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    fn first(&self) -> Option<Area> {
        self.areas.first().copied()
    }

    fn pop_first(&mut self) {
        if !self.areas.is_empty() {
            self.areas.remove(0);
        }
    }
}

/// Outcome of one [`Gui::timer_handler`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Strips pushed through the flush callback
    pub strips: u32,
    /// Pixels pushed through the flush callback
    pub pixels: u32,
    /// Pointer state dispatched to the scene, if any
    pub pointer: Option<PointerState>,
    /// Milliseconds until the next read or refresh is due
    pub next_due_ms: u32,
}

/// Dispatch runtime
pub struct Gui<'b, F, S, I, const N: usize> {
    config: DisplayConfig,
    buffer: &'b mut DrawBuffer<N>,
    flush: F,
    scene: S,
    input: I,
    read_period_ms: u32,
    invalid: InvalidAreas,
    last_pointer: PointerState,
    last_read_ms: Option<u64>,
    last_refresh_ms: Option<u64>,
    read_errors: u32,
}

impl<'b, F, S, const N: usize> Gui<'b, F, S, NoInput, N>
where
    F: FlushCallback,
    S: Scene,
{
    /// Create a runtime without pointer input
    ///
    /// The whole screen starts invalidated so the first refresh paints it.
    /// A flush callback with a fixed resolution must match the config size.
    pub fn new(
        config: DisplayConfig,
        buffer: &'b mut DrawBuffer<N>,
        flush: F,
        scene: S,
    ) -> Result<Self, DisplayError> {
        config.validate()?;
        if flush.resolution().is_some_and(|size| size != config.size()) {
            return Err(ConfigError::ResolutionMismatch.into());
        }
        if buffer.lines_for(config.width as u32) == 0 {
            return Err(DisplayError::BufferOverflow);
        }

        let mut invalid = InvalidAreas::new(config.size());
        invalid.invalidate_all();

        Ok(Self {
            read_period_ms: config.refresh_period_ms,
            config,
            buffer,
            flush,
            scene,
            input: NoInput,
            invalid,
            last_pointer: PointerState::default(),
            last_read_ms: None,
            last_refresh_ms: None,
            read_errors: 0,
        })
    }
}

impl<'b, F, S, I, const N: usize> Gui<'b, F, S, I, N>
where
    F: FlushCallback,
    S: Scene,
    I: InputDevice,
{
    /// Register a pointer input device polled every `read_period_ms`
    pub fn with_input<J: InputDevice>(self, input: J, read_period_ms: u32) -> Gui<'b, F, S, J, N> {
        Gui {
            config: self.config,
            buffer: self.buffer,
            flush: self.flush,
            scene: self.scene,
            input,
            read_period_ms: read_period_ms.max(1),
            invalid: self.invalid,
            last_pointer: self.last_pointer,
            last_read_ms: None,
            last_refresh_ms: self.last_refresh_ms,
            read_errors: 0,
        }
    }

    /// Advance the runtime to `now_ms`
    ///
    /// Polls the input device and refreshes the screen when their periods
    /// have elapsed. A flush error stops the refresh; the unfinished areas
    /// stay queued and are retried on the next refresh.
    pub fn timer_handler(&mut self, now_ms: u64) -> Result<TickReport, DisplayError> {
        let mut report = TickReport::default();

        if is_due(self.last_read_ms, now_ms, self.read_period_ms) {
            self.last_read_ms = Some(now_ms);
            self.read_input(&mut report);
        }

        if is_due(self.last_refresh_ms, now_ms, self.config.refresh_period_ms) {
            self.last_refresh_ms = Some(now_ms);
            self.refresh(&mut report)?;
        }

        report.next_due_ms = self.next_due(now_ms);
        Ok(report)
    }

    fn read_input(&mut self, report: &mut TickReport) {
        match self.input.read() {
            Ok(pointer) => {
                if pointer != self.last_pointer || pointer.is_pressed() {
                    self.scene.handle_pointer(&pointer, &mut self.invalid);
                    report.pointer = Some(pointer);
                }
                self.last_pointer = pointer;
            }
            Err(_) => {
                self.read_errors = self.read_errors.wrapping_add(1);
            }
        }
    }

    fn refresh(&mut self, report: &mut TickReport) -> Result<(), DisplayError> {
        let background = self.config.background;

        while let Some(area) = self.invalid.first() {
            let lines = self
                .buffer
                .lines_for(area.width())
                .min(self.config.buffer_lines as u32)
                .max(1) as u16;

            for strip_area in area.rows(lines) {
                let mut strip = self.buffer.strip(strip_area)?;
                infallible(strip.clear(background));
                infallible(self.scene.draw(&mut strip));

                self.flush.flush(&strip_area, strip.pixels())?;

                report.strips += 1;
                report.pixels += strip_area.pixel_count() as u32;
            }

            self.invalid.pop_first();
        }

        Ok(())
    }

    fn next_due(&self, now_ms: u64) -> u32 {
        let remaining = |last: Option<u64>, period: u32| -> u32 {
            match last {
                Some(t) => (t + period as u64).saturating_sub(now_ms) as u32,
                None => 0,
            }
        };
        remaining(self.last_read_ms, self.read_period_ms)
            .min(remaining(self.last_refresh_ms, self.config.refresh_period_ms))
    }

    /// Mark `area` for redraw
    pub fn invalidate(&mut self, area: Area) {
        self.invalid.invalidate(area);
    }

    /// Mark the whole screen for redraw
    pub fn invalidate_all(&mut self) {
        self.invalid.invalidate_all();
    }

    /// Modify the scene and record what changed
    pub fn update_scene<R>(&mut self, f: impl FnOnce(&mut S, &mut InvalidAreas) -> R) -> R {
        f(&mut self.scene, &mut self.invalid)
    }

    /// Current scene
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Flush callback (for statistics)
    pub fn flush(&self) -> &F {
        &self.flush
    }

    /// Mutable flush callback
    pub fn flush_mut(&mut self) -> &mut F {
        &mut self.flush
    }

    /// Mutable input device
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    /// Regions waiting to be redrawn
    pub fn pending(&self) -> &[Area] {
        self.invalid.areas()
    }

    /// Last pointer state read from the input device
    pub fn last_pointer(&self) -> PointerState {
        self.last_pointer
    }

    /// Number of failed input reads
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// Active configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }
}

fn is_due(last: Option<u64>, now_ms: u64, period_ms: u32) -> bool {
    match last {
        Some(t) => now_ms.saturating_sub(t) >= period_ms as u64,
        None => true,
    }
}

fn infallible(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}
