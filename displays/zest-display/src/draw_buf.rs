//! Partial draw buffer
//!
//! The demos cannot afford a full 128x160 frame buffer, so scenes are
//! rendered a few rows at a time into a single static buffer and each strip
//! is flushed before the next one is drawn.

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;

use crate::area::Area;
use crate::backend::DisplayError;

/// Static pixel storage for strip rendering
pub struct DrawBuffer<const N: usize> {
    pixels: [Rgb565; N],
}

impl<const N: usize> Default for DrawBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> DrawBuffer<N> {
    /// Create a zeroed buffer
    pub const fn new() -> Self {
        Self {
            pixels: [Rgb565::BLACK; N],
        }
    }

    /// Capacity in pixels
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of complete rows of `width` pixels that fit in the buffer
    pub const fn lines_for(&self, width: u32) -> u32 {
        if width == 0 {
            0
        } else {
            N as u32 / width
        }
    }

    /// Borrow the buffer as a draw target covering `area`
    ///
    /// Fails with [`DisplayError::InvalidCoordinates`] for an inverted area
    /// and with [`DisplayError::BufferOverflow`] if the area has more pixels
    /// than the buffer holds.
    pub fn strip(&mut self, area: Area) -> Result<StripTarget<'_>, DisplayError> {
        if !area.is_valid() {
            return Err(DisplayError::InvalidCoordinates);
        }
        let count = area.pixel_count();
        if count > N {
            return Err(DisplayError::BufferOverflow);
        }
        Ok(StripTarget {
            area,
            pixels: &mut self.pixels[..count],
        })
    }
}

/// Draw target over one strip of the screen
///
/// Coordinates are absolute screen coordinates; anything outside the strip
/// is discarded.
pub struct StripTarget<'a> {
    area: Area,
    pixels: &'a mut [Rgb565],
}

impl StripTarget<'_> {
    /// Screen area this strip covers
    pub fn area(&self) -> Area {
        self.area
    }

    /// Rendered pixels, row-major, `area.pixel_count()` long
    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels[..]
    }

    fn index(&self, point: Point) -> Option<usize> {
        if !self.area.contains(point) {
            return None;
        }
        let col = (point.x - self.area.x1 as i32) as usize;
        let row = (point.y - self.area.y1 as i32) as usize;
        Some(row * self.area.width() as usize + col)
    }
}

impl Dimensions for StripTarget<'_> {
    fn bounding_box(&self) -> Rectangle {
        self.area.to_rectangle()
    }
}

impl DrawTarget for StripTarget<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let Some(i) = self.index(point) {
                self.pixels[i] = color;
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some(clipped) = Area::from_rectangle(area).and_then(|a| a.intersection(&self.area))
        else {
            return Ok(());
        };

        let width = self.area.width() as usize;
        let start_col = (clipped.x1 - self.area.x1) as usize;
        let len = clipped.width() as usize;
        for y in clipped.y1..=clipped.y2 {
            let start = (y - self.area.y1) as usize * width + start_col;
            self.pixels[start..start + len].fill(color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}
