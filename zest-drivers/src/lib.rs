//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in zest-display for the parts on the Zest Display LCD board:
//!
//! - Panel controller (ILI9163C over SPI)
//! - Resistive touch controller (XPT2046 over SPI)
//!
//! Both drivers are written against `embedded-hal` 1.0 `SpiDevice`, so the
//! panel and the touch controller can share one bus with separate chip
//! selects.

#![no_std]
#![deny(unsafe_code)]

pub mod panel;
pub mod touch;

#[cfg(test)]
pub(crate) mod mock;
