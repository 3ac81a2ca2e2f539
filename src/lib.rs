//! Drivers for the data logger's measurement peripherals.
//!
//! Two independent components live here:
//!
//! - [`bmp280`] — a forced-mode driver for the Bosch BMP280 pressure +
//!   temperature sensor over SPI (mode 0). The driver is generic over
//!   [`embedded_hal`] bus, chip-select and delay traits, so it runs unchanged
//!   on real hardware and against mocks in tests.
//! - [`caliper`] — a pure decoder for the 24-bit protocol frames emitted by
//!   cheap digital calipers. No I/O; the raw frame is captured elsewhere
//!   (an I²C bridge on the logger) and handed in as a `u32`.
//!
//! The two components share no state.

#![cfg_attr(not(test), no_std)]

pub mod bmp280;
pub mod caliper;
