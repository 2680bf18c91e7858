//! Device and channel options handed to the engine.

use crate::consts::{
    DEFAULT_BRIGHTNESS, DEFAULT_DMA_NUM, DEFAULT_GPIO_PIN, DEFAULT_LED_COUNT, MAX_LED_COUNT,
    RPI_PWM_CHANNELS, TARGET_FREQ,
};
use crate::error::{Error, Result};
use crate::gamma::GammaTable;
use crate::strip::{ChannelShifts, StripType};
use log::debug;

/// Parameters for one physical output channel.
///
/// A channel with `led_count == 0` is unused. Brightness is a ceiling applied by the
/// engine as `value * (brightness + 1) / 256` before the gamma lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// GPIO pin driving the strip. The engine rejects pins it cannot drive.
    pub gpio_pin: u8,
    /// Number of LEDs on the strip.
    pub led_count: usize,
    /// Color ordering of the strip.
    pub strip_type: StripType,
    /// Invert the output signal (for inverting level shifters).
    pub invert: bool,
    /// Brightness ceiling (0-255).
    pub brightness: u8,
    /// Gamma table. `None` transmits values uncorrected.
    pub gamma: Option<GammaTable>,
}

impl ChannelConfig {
    /// A WS2812 channel at full brightness without gamma correction.
    pub fn new(gpio_pin: u8, led_count: usize) -> Self {
        ChannelConfig {
            gpio_pin,
            led_count,
            strip_type: StripType::WS2812,
            invert: false,
            brightness: 255,
            gamma: None,
        }
    }

    /// A channel the engine leaves untouched.
    pub fn unused() -> Self {
        ChannelConfig {
            gpio_pin: 0,
            led_count: 0,
            strip_type: StripType::WS2812,
            invert: false,
            brightness: 0,
            gamma: None,
        }
    }

    pub fn with_strip_type(mut self, strip_type: StripType) -> Self {
        self.strip_type = strip_type;
        self
    }

    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_gamma(mut self, gamma: GammaTable) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn without_gamma(mut self) -> Self {
        self.gamma = None;
        self
    }

    /// Bit shifts of each transmitted component, derived from `strip_type` the way
    /// the engine derives them.
    pub fn shifts(&self) -> ChannelShifts {
        self.strip_type.shifts()
    }

    #[inline]
    pub fn is_used(&self) -> bool {
        self.led_count > 0
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        ChannelConfig::unused()
    }
}

/// Global engine parameters plus the ordered channel list (index = channel id).
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    /// Signal frequency in Hz. Passed to the engine unchecked.
    pub frequency: u32,
    /// DMA engine index. Must not be claimed by anything else on the system.
    pub dma_channel: i32,
    /// Channel options; at most [`RPI_PWM_CHANNELS`] entries.
    pub channels: Vec<ChannelConfig>,
}

impl DeviceConfig {
    /// A configuration with no channels.
    pub fn new(frequency: u32, dma_channel: i32) -> Self {
        DeviceConfig {
            frequency,
            dma_channel,
            channels: Vec::new(),
        }
    }

    /// Appends a channel; its index is the number of channels already present.
    pub fn with_channel(mut self, channel: ChannelConfig) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelConfig> {
        self.channels.get(index)
    }

    pub fn channel_mut(&mut self, index: usize) -> Option<&mut ChannelConfig> {
        self.channels.get_mut(index)
    }

    /// LED count of a channel; channels missing from the list count as unused.
    pub fn led_count(&self, index: usize) -> usize {
        self.channel(index).map_or(0, |c| c.led_count)
    }

    /// Checks what the engine cannot check for itself.
    ///
    /// Frequency, DMA channel and pin numbers are left to the engine, which is the
    /// authority on what the board supports.
    pub fn validate(&self) -> Result<()> {
        if self.channels.len() > RPI_PWM_CHANNELS {
            return Err(Error::TooManyChannels {
                count: self.channels.len(),
            });
        }
        if let Some((channel, c)) = self
            .channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.led_count > MAX_LED_COUNT)
        {
            return Err(Error::TooManyLeds {
                channel,
                count: c.led_count,
            });
        }
        let used: Vec<&ChannelConfig> = self.channels.iter().filter(|c| c.is_used()).collect();
        for (i, a) in used.iter().enumerate() {
            if used[i + 1..].iter().any(|b| b.gpio_pin == a.gpio_pin) {
                return Err(Error::DuplicateGpio { pin: a.gpio_pin });
            }
        }
        debug!(
            "Validated config: freq={}Hz, dma={}, channels={:?}",
            self.frequency,
            self.dma_channel,
            self.channels
                .iter()
                .map(|c| (c.gpio_pin, c.led_count))
                .collect::<Vec<_>>()
        );
        Ok(())
    }
}

impl Default for DeviceConfig {
    /// 800kHz, DMA 10, 16 WS2812 LEDs on GPIO 18 at brightness 64 with the default
    /// gamma curve; channel 1 unused.
    fn default() -> Self {
        DeviceConfig::new(TARGET_FREQ, DEFAULT_DMA_NUM)
            .with_channel(
                ChannelConfig::new(DEFAULT_GPIO_PIN, DEFAULT_LED_COUNT)
                    .with_brightness(DEFAULT_BRIGHTNESS)
                    .with_gamma(GammaTable::default()),
            )
            .with_channel(ChannelConfig::unused())
    }
}
