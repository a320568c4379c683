//! ILI9341 TFT Controller Driver
//!
//! Blocking driver for ILI9341-class TFT controllers on a 4-wire SPI link
//! (SCK/MOSI/MISO plus separate chip-select, data/command and reset lines).
//!
//! # Architecture
//!
//! ```text
//! Demo sequence (demo)
//!         ↓
//! Framebuffer addressing + colour codec (driver, color)
//!         ↓
//! Command protocol (command, driver)
//!         ↓
//! Transport (transport) ── SpiTransport / BusTransport / RecordingTransport / VirtualPanel
//!         ↓
//! embedded-hal 1.0 (SpiDevice, SpiBus, OutputPin, DelayNs)
//! ```
//!
//! Every byte on the wire is framed by the [`Transport`]: a register write
//! drives D/C low, a data write drives it high, and chip select wraps each
//! byte unless [`Framing::Burst`] is selected.
//!
//! # Features
//!
//! - `std`: [`mock::RecordingTransport`] and [`sim::VirtualPanel`] for host
//!   testing and tooling
//! - `defmt`: `defmt::Format` derives and init/reset log lines
//!
//! # Example
//!
//! ```no_run
//! use ili9341::{DisplayConfig, Ili9341, Rgb, Transport};
//! use embedded_hal::{delay::DelayNs, digital::OutputPin};
//!
//! fn bring_up<T: Transport, RST: OutputPin, D: DelayNs>(
//!     transport: T,
//!     rst: RST,
//!     delay: D,
//! ) -> Result<(), ili9341::DisplayError> {
//!     let mut lcd = Ili9341::new(transport, rst, delay, DisplayConfig::default())?;
//!     lcd.init()?;
//!     lcd.clear(Rgb::BLACK)?;
//!     lcd.draw_pixel(10, 10, Rgb::RED)
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)] // all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer defmt over println! in lib code
// Pedantic lints suppressed for this driver crate:
#![allow(clippy::doc_markdown)] // opcode and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // every fallible call returns DisplayError

pub mod color;
pub mod command;
pub mod config;
pub mod demo;
pub mod driver;
pub mod error;
pub mod transport;

#[cfg(any(test, feature = "std"))]
pub mod mock;
#[cfg(any(test, feature = "std"))]
pub mod sim;

pub use color::{pack_rgb565, unpack_rgb565, Rgb};
pub use command::Command;
pub use config::{
    DisplayConfig, Geometry, Orientation, PinAssignment, CONTROLLER_COLUMNS, CONTROLLER_PAGES,
};
pub use driver::{AddressWindow, Ili9341};
pub use error::DisplayError;
pub use transport::{BusTransport, Framing, SpiTransport, Transport};
