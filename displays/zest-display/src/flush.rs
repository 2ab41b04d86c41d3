//! Flush callback
//!
//! The runtime hands every rendered strip to a [`FlushCallback`]. The
//! panel-backed implementation reproduces the classic two-call sequence:
//! open the address window on the strip's corners, then stream exactly
//! `width * height` 16-bit pixels.
//!
//! Returning from [`FlushCallback::flush`] signals that the pixels have left
//! the draw buffer and it may be reused for the next strip.

use embedded_graphics::geometry::Size;
use embedded_graphics::pixelcolor::Rgb565;

use crate::area::Area;
use crate::backend::{DisplayError, PanelBackend};

/// Receiver of rendered screen regions
pub trait FlushCallback {
    /// Push `pixels` (row-major) to the screen region `area`
    fn flush(&mut self, area: &Area, pixels: &[Rgb565]) -> Result<(), DisplayError>;

    /// Resolution of the screen behind the callback, if it has a fixed one
    fn resolution(&self) -> Option<Size> {
        None
    }
}

impl<F: FlushCallback + ?Sized> FlushCallback for &mut F {
    fn flush(&mut self, area: &Area, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        (**self).flush(area, pixels)
    }

    fn resolution(&self) -> Option<Size> {
        (**self).resolution()
    }
}

/// Flush callback driving a [`PanelBackend`]
pub struct PanelFlush<P> {
    panel: P,
    flushes: u32,
    pixels_written: u32,
}

impl<P: PanelBackend> PanelFlush<P> {
    /// Wrap an initialized panel
    pub fn new(panel: P) -> Self {
        Self {
            panel,
            flushes: 0,
            pixels_written: 0,
        }
    }

    /// Number of successful flushes
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// Total pixels written to the panel
    pub fn pixels_written(&self) -> u32 {
        self.pixels_written
    }

    /// Access the underlying panel
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable access to the underlying panel (backlight, etc.)
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Release the panel
    pub fn into_inner(self) -> P {
        self.panel
    }
}

impl<P: PanelBackend> FlushCallback for PanelFlush<P> {
    fn flush(&mut self, area: &Area, pixels: &[Rgb565]) -> Result<(), DisplayError> {
        if !self.panel.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        let resolution = self.panel.resolution();
        if !area.is_valid()
            || area.x2 as u32 >= resolution.width
            || area.y2 as u32 >= resolution.height
        {
            return Err(DisplayError::InvalidCoordinates);
        }

        let count = area.pixel_count();
        if pixels.len() < count {
            return Err(DisplayError::BufferOverflow);
        }

        self.panel.set_address_window(area)?;
        self.panel.write_pixels(&pixels[..count])?;

        self.flushes = self.flushes.wrapping_add(1);
        self.pixels_written = self.pixels_written.wrapping_add(count as u32);
        Ok(())
    }

    fn resolution(&self) -> Option<Size> {
        Some(self.panel.resolution())
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{MockPanel, PanelCall};
    use super::*;
    use embedded_graphics::pixelcolor::RgbColor;

    #[test]
    fn test_flush_sets_window_then_writes_w_times_h() {
        let mut flush = PanelFlush::new(MockPanel::new(32, 32));
        let area = Area::new(2, 3, 5, 4); // 4 x 2
        let pixels = [Rgb565::RED; 8];

        flush.flush(&area, &pixels).unwrap();

        let calls = &flush.panel().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], PanelCall::Window(area));
        assert_eq!(
            calls[1],
            PanelCall::Pixels {
                count: 8,
                first: Rgb565::RED
            }
        );
        assert_eq!(flush.flushes(), 1);
        assert_eq!(flush.pixels_written(), 8);
        assert_eq!(flush.panel().pixel(5, 4), Rgb565::RED);
        assert_eq!(flush.panel().pixel(6, 4), Rgb565::new(0, 0, 0));
    }

    #[test]
    fn test_flush_only_sends_area_pixels() {
        let mut flush = PanelFlush::new(MockPanel::new(32, 32));
        // Buffer larger than the area: only w*h pixels go out
        let pixels = [Rgb565::GREEN; 64];
        flush.flush(&Area::new(0, 0, 2, 2), &pixels).unwrap();
        assert_eq!(flush.pixels_written(), 9);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let mut flush = PanelFlush::new(MockPanel::new(32, 32));
        let pixels = [Rgb565::BLUE; 3];
        assert_eq!(
            flush.flush(&Area::new(0, 0, 1, 1), &pixels),
            Err(DisplayError::BufferOverflow)
        );
        assert!(flush.panel().calls.is_empty());
    }

    #[test]
    fn test_out_of_bounds_area_is_rejected() {
        let mut flush = PanelFlush::new(MockPanel::new(32, 32));
        let pixels = [Rgb565::BLUE; 4];
        assert_eq!(
            flush.flush(&Area::new(31, 31, 32, 32), &pixels),
            Err(DisplayError::InvalidCoordinates)
        );
        assert_eq!(
            flush.flush(&Area::new(3, 0, 1, 0), &pixels),
            Err(DisplayError::InvalidCoordinates)
        );
        assert!(flush.panel().calls.is_empty());
    }

    #[test]
    fn test_not_ready_panel() {
        let mut panel = MockPanel::new(32, 32);
        panel.ready = false;
        let mut flush = PanelFlush::new(panel);
        assert_eq!(
            flush.flush(&Area::new(0, 0, 0, 0), &[Rgb565::RED]),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_panel_error_propagates() {
        let mut panel = MockPanel::new(32, 32);
        panel.fail_writes = true;
        let mut flush = PanelFlush::new(panel);
        assert_eq!(
            flush.flush(&Area::new(0, 0, 0, 0), &[Rgb565::RED]),
            Err(DisplayError::Communication)
        );
        assert_eq!(flush.flushes(), 0);
    }
}
