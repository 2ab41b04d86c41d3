//! Demo screens
//!
//! Text is rendered with embedded-graphics mono fonts; each widget reports
//! the screen area it covers so only changed regions are redrawn.

use core::fmt::Write;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point, Size};
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use heapless::String;

use crate::area::Area;
use crate::gui::{InvalidAreas, Scene};
use crate::input::PointerState;

/// Maximum characters in a label
pub const LABEL_LEN: usize = 32;

/// Half-length of the touch crosshair arms
const MARKER_RADIUS: u32 = 6;

/// Single line of text centred on a point
#[derive(Debug, Clone)]
pub struct Label {
    text: String<LABEL_LEN>,
    center: Point,
    style: MonoTextStyle<'static, Rgb565>,
}

impl Label {
    /// Create a label; text beyond [`LABEL_LEN`] characters is dropped
    pub fn new(text: &str, center: Point, style: MonoTextStyle<'static, Rgb565>) -> Self {
        let mut label = Self {
            text: String::new(),
            center,
            style,
        };
        label.replace_text(text);
        label
    }

    /// Current text
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Centre point
    pub fn center(&self) -> Point {
        self.center
    }

    /// Screen area the rendered text covers
    pub fn bounding_area(&self) -> Option<Area> {
        Area::from_rectangle(&self.as_text().bounding_box())
    }

    /// Change the text, returning the region to redraw
    ///
    /// Returns `None` when the text is unchanged.
    pub fn set_text(&mut self, text: &str) -> Option<Area> {
        if self.text.as_str() == text {
            return None;
        }
        let before = self.bounding_area();
        self.replace_text(text);
        let after = self.bounding_area();
        match (before, after) {
            (Some(a), Some(b)) => Some(a.union(&b)),
            (a, b) => a.or(b),
        }
    }

    /// Draw the label
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.as_text().draw(target).map(|_| ())
    }

    fn replace_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
    }

    /// Text placed so the margins on either side differ by at most one
    /// pixel, the extra pixel going right and down
    fn as_text(&self) -> Text<'_, MonoTextStyle<'static, Rgb565>> {
        let size = Text::with_baseline(&self.text, Point::zero(), self.style, Baseline::Top)
            .bounding_box()
            .size;
        let top_left = self.center
            - Point::new((size.width as i32 + 1) / 2, (size.height as i32 + 1) / 2);
        Text::with_baseline(&self.text, top_left, self.style, Baseline::Top)
    }
}

fn screen_center(size: Size) -> Point {
    Point::new(size.width as i32 / 2, size.height as i32 / 2)
}

/// Display-only demo: one greeting centred on screen
pub struct HelloScreen {
    label: Label,
}

impl HelloScreen {
    /// Greeting shown by the display demo
    pub const TEXT: &'static str = "Hello from 6TRON!";

    /// Build the screen for a display of `size`
    pub fn new(size: Size) -> Self {
        Self {
            label: Label::new(
                Self::TEXT,
                screen_center(size),
                MonoTextStyle::new(&FONT_6X10, Rgb565::BLACK),
            ),
        }
    }

    /// The greeting label
    pub fn label(&self) -> &Label {
        &self.label
    }
}

impl Scene for HelloScreen {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.label.draw(target)
    }
}

/// Touch demo: title, live coordinate readout, crosshair at the last press
pub struct TouchScreen {
    title: Label,
    readout: Label,
    marker: Option<Point>,
    pressed: bool,
}

impl TouchScreen {
    /// Title text
    pub const TITLE: &'static str = "Touch the screen";

    /// Readout text before the first press
    pub const NO_TOUCH: &'static str = "x=--- y=---";

    /// Build the screen for a display of `size`
    pub fn new(size: Size) -> Self {
        let style = MonoTextStyle::new(&FONT_6X10, Rgb565::BLACK);
        let x = size.width as i32 / 2;
        Self {
            title: Label::new(Self::TITLE, Point::new(x, 10), style),
            readout: Label::new(Self::NO_TOUCH, Point::new(x, size.height as i32 - 10), style),
            marker: None,
            pressed: false,
        }
    }

    /// Last pressed point, if any
    pub fn marker(&self) -> Option<Point> {
        self.marker
    }

    /// Coordinate readout label
    pub fn readout(&self) -> &Label {
        &self.readout
    }

    fn marker_area(point: Point) -> Option<Area> {
        let side = 2 * MARKER_RADIUS + 1;
        Area::from_rectangle(&Rectangle::with_center(point, Size::new(side, side)))
    }

    fn marker_color(&self) -> Rgb565 {
        if self.pressed {
            Rgb565::RED
        } else {
            Rgb565::BLUE
        }
    }
}

impl Scene for TouchScreen {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        self.title.draw(target)?;
        self.readout.draw(target)?;

        if let Some(p) = self.marker {
            let r = MARKER_RADIUS as i32;
            let style = PrimitiveStyle::with_stroke(self.marker_color(), 1);
            Line::new(p - Point::new(r, 0), p + Point::new(r, 0))
                .into_styled(style)
                .draw(target)?;
            Line::new(p - Point::new(0, r), p + Point::new(0, r))
                .into_styled(style)
                .draw(target)?;
        }
        Ok(())
    }

    fn handle_pointer(&mut self, pointer: &PointerState, invalid: &mut InvalidAreas) {
        let pressed = pointer.is_pressed();
        // Marker colour follows the pen state
        let mut marker_dirty = pressed != self.pressed;
        self.pressed = pressed;

        if pressed && self.marker != Some(pointer.point) {
            if let Some(area) = self.marker.and_then(Self::marker_area) {
                invalid.invalidate(area);
            }
            self.marker = Some(pointer.point);
            marker_dirty = true;

            let mut text: String<LABEL_LEN> = String::new();
            let _ = write!(text, "x={} y={}", pointer.point.x, pointer.point.y);
            if let Some(area) = self.readout.set_text(&text) {
                invalid.invalidate(area);
            }
        }

        if marker_dirty {
            if let Some(area) = self.marker.and_then(Self::marker_area) {
                invalid.invalidate(area);
            }
        }
    }
}
