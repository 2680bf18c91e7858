//! # ws281x-rpi
//!
//! A Rust crate for driving WS2811/WS2812/SK6812 ("NeoPixel") LED strips from a
//! Raspberry Pi through the [`rpi_ws281x`](https://github.com/jgarff/rpi_ws281x)
//! engine, which generates the signal with PWM, PCM or SPI fed by DMA.
//!
//! The crate owns everything between application code and the engine:
//!
//! *   Typed configuration (`DeviceConfig`, `ChannelConfig`, `StripType`) with the
//!     engine's defaults (800kHz, DMA 10, GPIO 18).
//! *   The device lifecycle: `init` → (`set_leds_sync` / `leds_mut` → `render` →
//!     `wait`)* → `finalize`.
//! *   Pixel buffers borrowed straight from engine memory, so writes cost nothing and
//!     can never outlive the device.
//! *   Gamma tables (fixed perceptual curve or generated from an exponent) and
//!     per-channel brightness.
//! *   Engine status codes translated into `Error::HardwareStatus` with a readable
//!     description.
//! *   Hardware detection (`detect_hardware`).
//!
//! ## Backends
//!
//! *   **Simulated** (always available): an in-memory engine that records the bytes it
//!     would transmit. Used on development hosts and in tests.
//! *   **Native** (feature `rpi`): drives `libws2811` through the `ws281x` crate. Run
//!     as root.
//!
//! ```toml
//! [dependencies]
//! ws281x-rpi = { version = "0.1.0", features = ["rpi"] }
//! log = "0.4"          # Optional, for logging
//! ```
//!
//! ## Basic Usage
//!
//! ```no_run
//! use ws281x_rpi::{Backend, ChannelConfig, Device, DeviceConfig, Result, StripType};
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let mut config = DeviceConfig::new(800_000, 10);
//!     config.channels.push(
//!         ChannelConfig::new(18, 3)
//!             .with_strip_type(StripType::WS2812)
//!             .with_brightness(128),
//!     );
//!
//!     let mut device = Device::new(config, Backend::default())?;
//!     device.init()?;
//!
//!     device.set_leds_sync(0, &[0xFF0000, 0x00FF00, 0x0000FF])?;
//!     device.render()?;
//!     device.wait()?;
//!
//!     device.finalize();
//!     Ok(())
//! }
//! ```
//!
//! ## Pixel Format
//!
//! Colors are packed `0x00RRGGBB` (`0xWWRRGGBB` for RGBW strips) whatever the strip's
//! physical ordering; the engine reorders bytes at render time. Each transmitted byte
//! is `gamma[(value * (brightness + 1)) >> 8]`.
//!
//! ## License
//!
//! Licensed under the Apache License, Version 2.0.

// Make internal modules private, re-export public types
mod consts;
mod device;
mod error;
pub mod config;
pub mod engine;
pub mod gamma;
pub mod status;
pub mod strip;

pub use config::{ChannelConfig, DeviceConfig};
pub use device::{Device, DeviceState};
pub use engine::{
    detect_hardware, Backend, BoardType, Engine, Frame, HardwareInfo, SimulatedEngine,
    SimulationMonitor, SimulationOptions,
};
pub use error::{Error, Result};
pub use gamma::GammaTable;
pub use status::{describe, Status};
pub use strip::{ChannelShifts, StripType};
// Re-export only essential public constants
pub use consts::{
    DEFAULT_BRIGHTNESS, DEFAULT_DMA_NUM, DEFAULT_GPIO_PIN, DEFAULT_LED_COUNT, MAX_LED_COUNT,
    RPI_PWM_CHANNELS, TARGET_FREQ,
};

/// Raw engine codes, for use with [`Status::from_code`] and [`describe`].
pub mod codes {
    /// Packed strip-type codes as understood by the engine.
    pub mod strip {
        pub use crate::consts::strip::*;
    }
    /// Engine return codes.
    pub mod status {
        pub use crate::consts::status::*;
    }
}

#[cfg(feature = "rpi")]
pub use engine::NativeEngine;
