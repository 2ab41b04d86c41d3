//! Zest Display LCD demo support
//!
//! Board wiring, build-time configuration and the embassy tasks shared by
//! the `lcd-simple` and `lcd-touch` binaries.

#![no_std]

pub mod board;
pub mod config;
pub mod tasks;
