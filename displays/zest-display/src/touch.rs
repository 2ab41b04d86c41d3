//! Resistive touch mapping
//!
//! A resistive controller reports 12-bit ADC readings for each axis plus a
//! pressure reading. [`TouchCalibration`] maps the raw readings linearly
//! onto screen pixels and [`Touchpad`] turns samples into the pointer state
//! the runtime polls.

use embedded_graphics::geometry::{Point, Size};

use crate::config::TouchConfig;
use crate::input::{InputDevice, InputError, PointerState};

/// Largest reading of a 12-bit converter
pub const ADC_MAX: u16 = 4095;

/// One raw controller sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// X-plate reading
    pub x: u16,
    /// Y-plate reading
    pub y: u16,
    /// Pressure (Z1) reading, higher is firmer
    pub z: u16,
}

/// Source of raw touch samples (the touch controller driver)
pub trait RawTouchSource {
    /// Error type for sampling
    type Error;

    /// Take one sample
    ///
    /// Returns `Ok(None)` when the pen is up.
    fn sample(&mut self) -> Result<Option<RawSample>, Self::Error>;
}

/// Linear raw-to-screen mapping
///
/// Each axis maps `min..=max` onto `0..=len-1`. When `min > max` the axis
/// runs backwards, which covers panels mounted flipped. Readings outside
/// the range are clamped to the screen edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchCalibration {
    /// Raw X reading at the left edge
    pub x_min: u16,
    /// Raw X reading at the right edge
    pub x_max: u16,
    /// Raw Y reading at the top edge
    pub y_min: u16,
    /// Raw Y reading at the bottom edge
    pub y_max: u16,
    /// Controller X axis runs along the screen's Y axis
    pub swap_xy: bool,
}

impl Default for TouchCalibration {
    fn default() -> Self {
        Self::new()
    }
}

impl TouchCalibration {
    /// Typical usable range of a 12-bit resistive panel
    pub const fn new() -> Self {
        Self {
            x_min: 200,
            x_max: 3900,
            y_min: 200,
            y_max: 3900,
            swap_xy: false,
        }
    }

    /// Map a raw sample onto a screen of `size`
    pub fn map(&self, raw: RawSample, size: Size) -> Point {
        let (rx, ry) = if self.swap_xy {
            (raw.y, raw.x)
        } else {
            (raw.x, raw.y)
        };
        Point::new(
            map_axis(rx, self.x_min, self.x_max, size.width),
            map_axis(ry, self.y_min, self.y_max, size.height),
        )
    }
}

/// Map `raw` from `from..=to` onto `0..len`, clamped
fn map_axis(raw: u16, from: u16, to: u16, len: u32) -> i32 {
    if len == 0 || from == to {
        return 0;
    }
    let last = len - 1;
    let (lo, hi, inverted) = if from < to {
        (from, to, false)
    } else {
        (to, from, true)
    };
    let clamped = raw.clamp(lo, hi);
    let offset = (clamped - lo) as u32 * last / (hi - lo) as u32;
    let pos = if inverted { last - offset } else { offset };
    pos as i32
}

/// Touchpad read callback over a raw touch source
pub struct Touchpad<T> {
    source: T,
    config: TouchConfig,
    size: Size,
    last_point: Point,
    last_raw: Option<RawSample>,
    errors: u32,
}

impl<T: RawTouchSource> Touchpad<T> {
    /// Create a touchpad for a screen of `size`
    pub fn new(source: T, config: TouchConfig, size: Size) -> Self {
        Self {
            source,
            config,
            size,
            last_point: Point::zero(),
            last_raw: None,
            errors: 0,
        }
    }

    /// Last raw sample that counted as a press (for calibration logging)
    pub fn last_raw(&self) -> Option<RawSample> {
        self.last_raw
    }

    /// Last pressed screen position
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    /// Number of failed samples
    pub fn errors(&self) -> u32 {
        self.errors
    }

    /// Replace the calibration
    pub fn set_calibration(&mut self, calibration: TouchCalibration) {
        self.config.calibration = calibration;
    }

    /// Access the raw source
    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }
}

impl<T: RawTouchSource> InputDevice for Touchpad<T> {
    fn read(&mut self) -> Result<PointerState, InputError> {
        match self.source.sample() {
            Ok(Some(raw)) if raw.z >= self.config.pressure_threshold => {
                self.last_point = self.config.calibration.map(raw, self.size);
                self.last_raw = Some(raw);
                Ok(PointerState::pressed(self.last_point))
            }
            Ok(_) => Ok(PointerState::released(self.last_point)),
            Err(_) => {
                self.errors = self.errors.wrapping_add(1);
                Err(InputError::Communication)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::TouchState;
    use proptest::prelude::*;

    const SCREEN: Size = Size::new(128, 160);

    /// Replays a fixed list of samples
    struct Script {
        samples: heapless::Deque<Result<Option<RawSample>, ()>, 8>,
    }

    impl Script {
        fn new(items: &[Result<Option<RawSample>, ()>]) -> Self {
            let mut samples = heapless::Deque::new();
            for item in items {
                samples.push_back(*item).unwrap();
            }
            Self { samples }
        }
    }

    impl RawTouchSource for Script {
        type Error = ();

        fn sample(&mut self) -> Result<Option<RawSample>, ()> {
            self.samples.pop_front().unwrap_or(Ok(None))
        }
    }

    fn sample(x: u16, y: u16, z: u16) -> RawSample {
        RawSample { x, y, z }
    }

    #[test]
    fn test_calibration_corners() {
        let cal = TouchCalibration::new();
        assert_eq!(cal.map(sample(200, 200, 0), SCREEN), Point::new(0, 0));
        assert_eq!(cal.map(sample(3900, 3900, 0), SCREEN), Point::new(127, 159));
        // Clamped outside the calibrated range
        assert_eq!(cal.map(sample(0, ADC_MAX, 0), SCREEN), Point::new(0, 159));
    }

    #[test]
    fn test_calibration_inverted_axis() {
        let cal = TouchCalibration {
            x_min: 3900,
            x_max: 200,
            ..TouchCalibration::new()
        };
        assert_eq!(cal.map(sample(3900, 200, 0), SCREEN), Point::new(0, 0));
        assert_eq!(cal.map(sample(200, 200, 0), SCREEN), Point::new(127, 0));
    }

    #[test]
    fn test_calibration_swap_xy() {
        let cal = TouchCalibration {
            swap_xy: true,
            ..TouchCalibration::new()
        };
        // Raw Y at max drives the screen X axis
        assert_eq!(cal.map(sample(200, 3900, 0), SCREEN), Point::new(127, 0));
    }

    #[test]
    fn test_degenerate_range_maps_to_zero() {
        let cal = TouchCalibration {
            x_min: 1000,
            x_max: 1000,
            ..TouchCalibration::new()
        };
        assert_eq!(cal.map(sample(3000, 200, 0), SCREEN).x, 0);
    }

    #[test]
    fn test_touchpad_press_and_release() {
        let script = Script::new(&[
            Ok(Some(sample(2050, 2050, 500))),
            Ok(None),
            Ok(Some(sample(3900, 3900, 20))), // below pressure threshold
        ]);
        let mut pad = Touchpad::new(script, TouchConfig::new(), SCREEN);

        let first = pad.read().unwrap();
        assert_eq!(first.state, TouchState::Pressed);
        assert_eq!(first.point, Point::new(63, 79));

        // Release keeps the last pressed point
        let second = pad.read().unwrap();
        assert_eq!(second, PointerState::released(Point::new(63, 79)));

        let third = pad.read().unwrap();
        assert!(!third.is_pressed());
        assert_eq!(third.point, Point::new(63, 79));
        assert_eq!(pad.last_raw(), Some(sample(2050, 2050, 500)));
    }

    #[test]
    fn test_pressure_threshold_is_inclusive() {
        let threshold = TouchConfig::new().pressure_threshold;
        let script = Script::new(&[
            Ok(Some(sample(2050, 2050, threshold))),
            Ok(Some(sample(2050, 2050, threshold - 1))),
        ]);
        let mut pad = Touchpad::new(script, TouchConfig::new(), SCREEN);

        assert!(pad.read().unwrap().is_pressed());
        assert!(!pad.read().unwrap().is_pressed());
    }

    #[test]
    fn test_touchpad_error_keeps_state() {
        let script = Script::new(&[Ok(Some(sample(3900, 200, 400))), Err(()), Ok(None)]);
        let mut pad = Touchpad::new(script, TouchConfig::new(), SCREEN);

        assert!(pad.read().unwrap().is_pressed());
        assert_eq!(pad.read(), Err(InputError::Communication));
        assert_eq!(pad.errors(), 1);
        assert_eq!(pad.read().unwrap().point, Point::new(127, 0));
    }

    proptest! {
        #[test]
        fn mapped_point_is_on_screen(
            x in 0u16..=ADC_MAX,
            y in 0u16..=ADC_MAX,
            x_min in 0u16..=ADC_MAX,
            x_max in 0u16..=ADC_MAX,
            swap in any::<bool>(),
        ) {
            let cal = TouchCalibration { x_min, x_max, swap_xy: swap, ..TouchCalibration::new() };
            let p = cal.map(sample(x, y, 0), SCREEN);
            prop_assert!(p.x >= 0 && p.x < 128);
            prop_assert!(p.y >= 0 && p.y < 160);
        }
    }
}
