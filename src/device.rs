//! The LED strip device: engine ownership, lifecycle and pixel buffer access.

use crate::config::{ChannelConfig, DeviceConfig};
use crate::consts::RPI_PWM_CHANNELS;
use crate::engine::{Backend, Engine, HardwareInfo};
use crate::error::{channel_out_of_range, check_status, Error, Result};
use crate::gamma::GammaTable;
use log::{debug, trace, warn};

/// Lifecycle state of a [`Device`].
///
/// `Uninitialized → Initialized → Finalized`; `Finalized` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceState {
    Uninitialized,
    Initialized,
    Finalized,
}

/// A handle to a LED strip output device.
///
/// The device exclusively owns its engine. Pixel buffers are views of memory the
/// engine allocates in [`Device::init`] and frees in [`Device::finalize`]; they are
/// borrowed from the device, so a view can never outlive the memory behind it.
///
/// Typical frame loop: [`set_leds_sync`](Device::set_leds_sync) (which waits for the
/// previous frame), then [`render`](Device::render).
///
/// **Note:** The device is meant to be driven from a single thread; it is `Send` but
/// not `Sync`.
#[derive(Debug)]
pub struct Device {
    engine: Option<Box<dyn Engine>>,
    config: DeviceConfig,
    state: DeviceState,
    led_counts: [usize; RPI_PWM_CHANNELS],
}

impl Device {
    // --- Constructors and Info ---

    /// Builds a device on the given backend.
    ///
    /// Validates the configuration, allocates the engine control structure and hands
    /// it the channel parameters. Nothing is programmed until [`Device::init`].
    pub fn new(config: DeviceConfig, backend: Backend) -> Result<Self> {
        config.validate()?;
        let engine = backend.allocate()?;
        debug!("Allocated {:?} engine", backend);
        Ok(Self::assemble(config, engine))
    }

    /// Builds a device on the default backend (native with the `rpi` feature,
    /// simulated otherwise).
    pub fn open(config: DeviceConfig) -> Result<Self> {
        Self::new(config, Backend::default())
    }

    /// Builds a device on an already allocated engine.
    pub fn with_engine(config: DeviceConfig, engine: Box<dyn Engine>) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, engine))
    }

    // Hands a validated configuration to the engine.
    fn assemble(config: DeviceConfig, mut engine: Box<dyn Engine>) -> Self {
        engine.configure(&config);
        Device {
            engine: Some(engine),
            config,
            state: DeviceState::Uninitialized,
            led_counts: [0; RPI_PWM_CHANNELS],
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == DeviceState::Initialized
    }

    /// Configuration the device was built with, including later brightness and
    /// gamma changes.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Number of LEDs in a channel's buffer (0 for unused channels or outside the
    /// initialized state).
    pub fn led_count(&self, channel: usize) -> usize {
        self.led_counts.get(channel).copied().unwrap_or(0)
    }

    /// Describes the board through this device's engine.
    pub fn hardware_info(&self) -> Result<HardwareInfo> {
        self.engine
            .as_ref()
            .ok_or(Error::NotInitialized)?
            .detect_hardware()
    }

    // --- Lifecycle ---

    /// Programs the engine and maps the pixel buffers. Call once, before any other
    /// buffer operation.
    ///
    /// Fails with [`Error::AlreadyInitialized`] on an initialized or finalized device
    /// (without touching the engine), or with [`Error::HardwareStatus`] when the engine
    /// refuses; the device then stays uninitialized.
    pub fn init(&mut self) -> Result<()> {
        if self.state != DeviceState::Uninitialized {
            return Err(Error::AlreadyInitialized);
        }
        let engine = self.engine.as_mut().ok_or(Error::NotInitialized)?;
        engine.configure(&self.config);
        check_status("init", engine.init())?;

        for (channel, count) in self.led_counts.iter_mut().enumerate() {
            let expected = self.config.led_count(channel);
            let mapped = engine.leds(channel).len();
            if mapped != expected {
                warn!(
                    "Channel {}: engine mapped {} LEDs, {} configured",
                    channel, mapped, expected
                );
            }
            *count = mapped.min(expected);
        }
        self.state = DeviceState::Initialized;
        debug!("Device initialized: LED counts {:?}", self.led_counts);
        Ok(())
    }

    /// Starts transmitting the current buffers. Returns without waiting for the
    /// transmission to complete.
    pub fn render(&mut self) -> Result<()> {
        let engine = self.initialized_engine()?;
        trace!("render");
        check_status("render", engine.render())
    }

    /// Blocks until the last render has been transmitted. Returns at once if nothing
    /// is in flight.
    pub fn wait(&mut self) -> Result<()> {
        let engine = self.initialized_engine()?;
        trace!("wait");
        check_status("wait", engine.wait())
    }

    /// Waits for any transmission in flight, then releases the engine and all pixel
    /// memory. Calling it again does nothing. Never fails.
    pub fn finalize(&mut self) {
        let Some(mut engine) = self.engine.take() else {
            return;
        };
        if self.state == DeviceState::Initialized {
            let res = engine.wait();
            if res != 0 {
                warn!(
                    "wait before finalize returned {} ({})",
                    res,
                    crate::status::describe(res)
                );
            }
        }
        engine.fini();
        drop(engine);
        self.led_counts = [0; RPI_PWM_CHANNELS];
        self.state = DeviceState::Finalized;
        debug!("Device finalized");
    }

    // --- Pixel Buffers ---

    /// Read view of a channel's pixel buffer.
    pub fn leds(&self, channel: usize) -> Result<&[u32]> {
        self.check_channel(channel)?;
        if self.state != DeviceState::Initialized {
            return Err(Error::NotInitialized);
        }
        let engine = self.engine.as_ref().ok_or(Error::NotInitialized)?;
        Ok(&engine.leds(channel)[..self.led_counts[channel]])
    }

    /// Mutable view of a channel's pixel buffer.
    ///
    /// Writes become visible on the strip with the next [`Device::render`]. Writing
    /// while a render is in flight cannot corrupt memory but may show a frame mixing
    /// old and new values; use [`Device::set_leds_sync`] or call [`Device::wait`]
    /// first to avoid that.
    pub fn leds_mut(&mut self, channel: usize) -> Result<&mut [u32]> {
        self.check_channel(channel)?;
        let count = self.led_counts[channel];
        let engine = self.initialized_engine()?;
        Ok(&mut engine.leds_mut(channel)[..count])
    }

    /// Waits for the current transmission, then copies `leds` into the start of the
    /// channel's buffer. LEDs past `leds.len()` keep their values.
    ///
    /// Fails with [`Error::TooManyPixels`] (buffer untouched) if `leds` is longer than
    /// the channel.
    pub fn set_leds_sync(&mut self, channel: usize, leds: &[u32]) -> Result<()> {
        self.check_channel(channel)?;
        self.wait()?;
        let capacity = self.led_counts[channel];
        if leds.len() > capacity {
            return Err(Error::TooManyPixels {
                channel,
                count: leds.len(),
                capacity,
            });
        }
        self.leds_mut(channel)?[..leds.len()].copy_from_slice(leds);
        Ok(())
    }

    /// Sets a single LED.
    pub fn set_led(&mut self, channel: usize, index: usize, color: u32) -> Result<()> {
        let leds = self.leds_mut(channel)?;
        let count = leds.len();
        let led = leds.get_mut(index).ok_or(Error::LedIndexOutOfRange {
            channel,
            index,
            count,
        })?;
        *led = color;
        Ok(())
    }

    /// Turns every LED of a channel off (in the buffer; call render to show it).
    pub fn clear(&mut self, channel: usize) -> Result<()> {
        self.leds_mut(channel)?.fill(0);
        Ok(())
    }

    /// Clears every channel.
    pub fn clear_all(&mut self) -> Result<()> {
        for channel in 0..RPI_PWM_CHANNELS {
            self.clear(channel)?;
        }
        Ok(())
    }

    // --- Correction ---

    /// Changes a channel's brightness ceiling. Takes effect with the next render.
    pub fn set_brightness(&mut self, channel: usize, brightness: u8) -> Result<()> {
        self.check_channel(channel)?;
        if self.state == DeviceState::Finalized {
            return Err(Error::NotInitialized);
        }
        self.channel_config_mut(channel).brightness = brightness;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_brightness(channel, brightness);
        }
        debug!("Channel {} brightness set to {}", channel, brightness);
        Ok(())
    }

    /// Replaces every channel's gamma table with one generated from `gamma`
    /// (see [`GammaTable::from_exponent`]).
    pub fn set_custom_gamma_factor(&mut self, gamma: f64) -> Result<()> {
        if self.state == DeviceState::Finalized {
            return Err(Error::NotInitialized);
        }
        let table = GammaTable::from_exponent(gamma);
        for channel in self.config.channels.iter_mut() {
            channel.gamma = Some(table);
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.set_custom_gamma_factor(gamma);
        }
        debug!("Gamma factor set to {}", gamma);
        Ok(())
    }

    // --- Helpers ---

    fn check_channel(&self, channel: usize) -> Result<()> {
        if channel < RPI_PWM_CHANNELS {
            Ok(())
        } else {
            Err(channel_out_of_range(channel))
        }
    }

    fn initialized_engine(&mut self) -> Result<&mut dyn Engine> {
        if self.state != DeviceState::Initialized {
            return Err(Error::NotInitialized);
        }
        match self.engine.as_mut() {
            Some(engine) => Ok(&mut **engine),
            None => Err(Error::NotInitialized),
        }
    }

    // Channels missing from the list are unused; materialize them on first touch.
    fn channel_config_mut(&mut self, channel: usize) -> &mut ChannelConfig {
        if self.config.channels.len() <= channel {
            self.config
                .channels
                .resize_with(channel + 1, ChannelConfig::unused);
        }
        &mut self.config.channels[channel]
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.finalize();
    }
}
