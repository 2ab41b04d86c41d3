//! Pointer input
//!
//! The runtime polls an [`InputDevice`] for the current pointer state, the
//! same way a GUI library polls a touchpad read callback.

use embedded_graphics::geometry::Point;

/// Whether the pointer is down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchState {
    /// Nothing touching the panel
    #[default]
    Released,
    /// Pen or finger down
    Pressed,
}

/// Pointer state reported by an input device
///
/// On release, `point` holds the last pressed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerState {
    /// Pressed or released
    pub state: TouchState,
    /// Screen coordinates
    pub point: Point,
}

impl PointerState {
    /// Pressed at `point`
    pub const fn pressed(point: Point) -> Self {
        Self {
            state: TouchState::Pressed,
            point,
        }
    }

    /// Released, last seen at `point`
    pub const fn released(point: Point) -> Self {
        Self {
            state: TouchState::Released,
            point,
        }
    }

    /// Check if the pointer is down
    pub fn is_pressed(&self) -> bool {
        self.state == TouchState::Pressed
    }
}

/// Input read errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Bus error talking to the controller
    Communication,
    /// Controller not ready
    NotReady,
}

/// Pointer input device (touchpad read callback)
pub trait InputDevice {
    /// Read the current pointer state
    fn read(&mut self) -> Result<PointerState, InputError>;
}

impl<T: InputDevice + ?Sized> InputDevice for &mut T {
    fn read(&mut self) -> Result<PointerState, InputError> {
        (**self).read()
    }
}

/// Input device for screens without touch
///
/// Always reports released at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputDevice for NoInput {
    fn read(&mut self) -> Result<PointerState, InputError> {
        Ok(PointerState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_input_is_released() {
        let state = NoInput.read().unwrap();
        assert!(!state.is_pressed());
        assert_eq!(state.point, Point::zero());
    }

    #[test]
    fn test_constructors() {
        let p = PointerState::pressed(Point::new(4, 5));
        assert!(p.is_pressed());
        let r = PointerState::released(p.point);
        assert_eq!(r.state, TouchState::Released);
        assert_eq!(r.point, Point::new(4, 5));
    }
}
