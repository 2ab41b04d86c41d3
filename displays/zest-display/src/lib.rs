//! Display glue for the Zest Display LCD demos
//!
//! This crate provides:
//! - `Area`, the inclusive rectangle used by flush requests
//! - `PanelBackend` trait for the LCD controller (address window + pixel write)
//! - `FlushCallback` / `PanelFlush`, turning a rendered strip into panel calls
//! - `InputDevice` / `Touchpad`, turning raw touch samples into pointer state
//! - `Gui`, the dispatch runtime ticked from the firmware's main loop
//! - Ready-made screens for both demos
//!
//! # Architecture
//!
//! ```text
//!   firmware loop ──▶ Gui::timer_handler(now)
//!                        │            │
//!            InputDevice::read    Scene::draw ──▶ StripTarget (DrawBuffer)
//!                        │                             │
//!                  Scene::handle_pointer      FlushCallback::flush(area, px)
//!                                                      │
//!                                   PanelBackend::set_address_window
//!                                   PanelBackend::write_pixels
//! ```
//!
//! Rasterization of text and primitives is done by `embedded-graphics`;
//! this crate only decides *which* region to render and where to send it.

#![no_std]
#![deny(unsafe_code)]

pub mod area;
pub mod backend;
pub mod config;
pub mod draw_buf;
pub mod flush;
pub mod gui;
pub mod input;
pub mod screens;
pub mod touch;

// Re-export key types
pub use area::Area;
pub use backend::{DisplayError, PanelBackend};
pub use config::{DisplayConfig, TouchConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use draw_buf::{DrawBuffer, StripTarget};
pub use flush::{FlushCallback, PanelFlush};
pub use gui::{Gui, Scene, TickReport};
pub use input::{InputDevice, InputError, NoInput, PointerState, TouchState};
pub use screens::{HelloScreen, Label, TouchScreen};
pub use touch::{RawSample, RawTouchSource, TouchCalibration, Touchpad};
