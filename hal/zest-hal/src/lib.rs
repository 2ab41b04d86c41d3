//! Zest Hardware Abstraction Layer
//!
//! Board-agnostic configuration types shared by the panel and touch drivers
//! and by the firmware that wires them to a chip HAL.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Firmware (zest-demo)                   │
//! └─────────────────────────────────────────┘
//!          │                        │
//!          ▼                        ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │ zest-hal (this)  │    │  embassy-stm32   │
//! │ SpiConfig, pins  │───▶│  spi::Config     │
//! └──────────────────┘    └──────────────────┘
//! ```
//!
//! # Types
//!
//! - [`spi::SpiConfig`], [`spi::Mode`] - per-device SPI settings on a shared bus
//! - [`gpio::ActiveLevel`] - polarity of control lines (pen IRQ, backlight)

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

pub use gpio::ActiveLevel;
pub use spi::{Mode, SpiConfig};
