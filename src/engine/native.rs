//! Engine backed by `libws2811` through the `ws281x` binding crate.
//!
//! The library is driven as a plain RGB pipe: LED memory handed to callers lives on
//! the Rust side, and `render` writes each LED already corrected (brightness, gamma)
//! and reordered for the strip into the library's buffer. Requires root (or access
//! to `/dev/mem` and the mailbox) at runtime.

use super::channel::ChannelState;
use super::{Engine, HardwareInfo};
use crate::config::{ChannelConfig, DeviceConfig};
use crate::consts::status::{ERROR_GENERIC, ERROR_HW_NOT_SUPPORTED, ERROR_OUT_OF_MEMORY, SUCCESS};
use crate::consts::RPI_PWM_CHANNELS;
use crate::error::{Error, Result};
use crate::gamma::GammaTable;
use crate::status;
use log::{debug, trace, warn};
use std::fmt;
use ws281x::handle::Handle;

const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Describes the board from `/proc/cpuinfo`, the way the engine identifies it.
pub(super) fn detect_hardware() -> Result<HardwareInfo> {
    let not_supported = || Error::HardwareStatus {
        operation: "hw_detect",
        code: ERROR_HW_NOT_SUPPORTED,
        description: status::describe(ERROR_HW_NOT_SUPPORTED),
    };
    let cpuinfo = std::fs::read_to_string(CPUINFO_PATH).map_err(|err| {
        warn!("Unable to read {}: {}", CPUINFO_PATH, err);
        not_supported()
    })?;
    HardwareInfo::from_cpuinfo(&cpuinfo).ok_or_else(|| {
        warn!("Board not recognized");
        not_supported()
    })
}

// Packs the first three encoded bytes so the library, running as RGB, sends them in order.
#[inline]
fn pack_rgb(bytes: [u8; 4]) -> u32 {
    u32::from(bytes[0]) << 16 | u32::from(bytes[1]) << 8 | u32::from(bytes[2])
}

/// Exclusive owner of a `libws2811` handle.
pub struct NativeEngine {
    frequency: u32,
    dma_channel: i32,
    channels: [ChannelState; RPI_PWM_CHANNELS],
    handle: Option<Handle>,
}

// The handle is only reached through `&mut self` and libws2811 keeps no thread-local state.
unsafe impl Send for NativeEngine {}

impl fmt::Debug for NativeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEngine")
            .field("frequency", &self.frequency)
            .field("dma_channel", &self.dma_channel)
            .field("channels", &self.channels)
            .field("initialized", &self.handle.is_some())
            .finish()
    }
}

impl NativeEngine {
    /// Prepares an engine; the library is not touched until `init`.
    pub fn allocate() -> Result<Self> {
        Ok(NativeEngine {
            frequency: 0,
            dma_channel: 0,
            channels: std::array::from_fn(|_| ChannelState::new()),
            handle: None,
        })
    }

    // Opens the library handle with both channels. Brightness stays at 255 in the
    // library; it is applied together with gamma in `render`.
    fn open(&self) -> std::result::Result<Handle, String> {
        let channel = |config: &ChannelConfig| {
            ws281x::channel::new()
                .pin(i32::from(config.gpio_pin))
                .count(config.led_count)
                .invert(config.invert)
                .brightness(255)
                .build()
                .map_err(|err| format!("channel on GPIO {}: {:?}", config.gpio_pin, err))
        };
        let ch0 = channel(&self.channels[0].config)?;
        let ch1 = channel(&self.channels[1].config)?;
        ws281x::handle::new()
            .freq(self.frequency)
            .dma(self.dma_channel)
            .channel(0, ch0)
            .channel(1, ch1)
            .build()
            .map_err(|err| format!("{:?}", err))
    }

    // Writes corrected, reordered LED values into the library's buffers.
    fn stage(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        for (index, state) in self.channels.iter().enumerate() {
            if !state.config.is_used() {
                continue;
            }
            let encoder = state.encoder();
            let out = handle.channel_mut(index).leds_mut();
            for (dst, &led) in out.iter_mut().zip(&state.leds) {
                *dst = pack_rgb(encoder.encode(led));
            }
        }
    }
}

impl Engine for NativeEngine {
    fn configure(&mut self, config: &DeviceConfig) {
        if self.handle.is_some() {
            warn!("configure() on an initialized engine ignored");
            return;
        }
        self.frequency = config.frequency;
        self.dma_channel = config.dma_channel;
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.config = config
                .channel(i)
                .cloned()
                .unwrap_or_else(ChannelConfig::unused);
        }
        trace!(
            "Native engine configured: freq={}Hz, dma={}",
            config.frequency,
            config.dma_channel
        );
    }

    fn init(&mut self) -> i32 {
        if self.handle.is_some() {
            return ERROR_GENERIC;
        }
        if let Some(channel) = self
            .channels
            .iter()
            .find(|c| c.config.is_used() && c.config.strip_type.has_white())
        {
            warn!(
                "GPIO {}: four-color strips cannot be driven through the RGB pipe",
                channel.config.gpio_pin
            );
            return ERROR_GENERIC;
        }
        if !self.channels.iter_mut().all(ChannelState::allocate) {
            self.channels.iter_mut().for_each(ChannelState::release);
            return ERROR_OUT_OF_MEMORY;
        }
        match self.open() {
            Ok(handle) => {
                self.handle = Some(handle);
                debug!("ws2811 handle opened");
                SUCCESS
            }
            Err(err) => {
                warn!("ws2811_init failed: {}", err);
                self.channels.iter_mut().for_each(ChannelState::release);
                ERROR_GENERIC
            }
        }
    }

    fn leds(&self, channel: usize) -> &[u32] {
        self.channels
            .get(channel)
            .map_or(&[][..], |c| c.leds.as_slice())
    }

    fn leds_mut(&mut self, channel: usize) -> &mut [u32] {
        match self.channels.get_mut(channel) {
            Some(c) => c.leds.as_mut_slice(),
            None => &mut [],
        }
    }

    fn render(&mut self) -> i32 {
        self.stage();
        let Some(handle) = self.handle.as_mut() else {
            return ERROR_GENERIC;
        };
        match handle.render() {
            Ok(()) => SUCCESS,
            Err(err) => {
                warn!("ws2811_render failed: {:?}", err);
                ERROR_GENERIC
            }
        }
    }

    fn wait(&mut self) -> i32 {
        let Some(handle) = self.handle.as_mut() else {
            return SUCCESS;
        };
        match handle.wait() {
            Ok(()) => SUCCESS,
            Err(err) => {
                warn!("ws2811_wait failed: {:?}", err);
                ERROR_GENERIC
            }
        }
    }

    fn fini(&mut self) {
        // Dropping the handle runs ws2811_fini.
        if self.handle.take().is_some() {
            debug!("ws2811 handle closed");
        }
        self.channels.iter_mut().for_each(ChannelState::release);
    }

    fn set_brightness(&mut self, channel: usize, brightness: u8) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.config.brightness = brightness;
        }
    }

    fn set_custom_gamma_factor(&mut self, gamma: f64) {
        let table = GammaTable::from_exponent(gamma);
        for channel in self.channels.iter_mut() {
            channel.set_gamma_table(table);
        }
    }

    fn detect_hardware(&self) -> Result<HardwareInfo> {
        detect_hardware()
    }
}

impl Drop for NativeEngine {
    fn drop(&mut self) {
        self.fini();
    }
}
