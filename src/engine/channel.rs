//! Per-channel LED memory and the byte encoding applied at render time.

use crate::config::ChannelConfig;
use crate::gamma::GammaTable;

/// Turns packed `0xWWRRGGBB` values into the bytes a strip receives.
///
/// Brightness is applied first (`(v * (brightness + 1)) >> 8`), then the gamma lookup,
/// and the components are emitted in the order the strip type dictates.
#[derive(Debug, Clone)]
pub(super) struct Encoder {
    gamma: GammaTable,
    scale: u32,
    shifts: [u8; 4],
    bytes_per_led: usize,
}

impl Encoder {
    pub(super) fn new(config: &ChannelConfig, gamma: Option<GammaTable>) -> Self {
        Encoder {
            gamma: gamma.unwrap_or_else(GammaTable::identity),
            scale: u32::from(config.brightness) + 1,
            shifts: config.shifts().in_order(),
            bytes_per_led: config.strip_type.bytes_per_led(),
        }
    }

    #[inline]
    pub(super) fn bytes_per_led(&self) -> usize {
        self.bytes_per_led
    }

    /// Encoded bytes of one LED; only the first `bytes_per_led` are meaningful.
    pub(super) fn encode(&self, led: u32) -> [u8; 4] {
        let mut out = [0u8; 4];
        for (byte, &shift) in out.iter_mut().zip(&self.shifts).take(self.bytes_per_led) {
            // Custom codes may carry shifts past the pixel width; those components read as 0.
            let value = led.checked_shr(u32::from(shift)).unwrap_or(0) & 0xff;
            *byte = self.gamma.apply(((value * self.scale) >> 8) as u8);
        }
        out
    }
}

/// Configuration and LED memory of one output channel.
#[derive(Debug)]
pub(super) struct ChannelState {
    pub(super) config: ChannelConfig,
    pub(super) leds: Vec<u32>,
    /// Table in use while initialized; channels configured without one get the identity.
    pub(super) gamma: Option<GammaTable>,
}

impl ChannelState {
    pub(super) fn new() -> Self {
        ChannelState {
            config: ChannelConfig::unused(),
            leds: Vec::new(),
            gamma: None,
        }
    }

    /// Allocates zeroed LED memory for the configured count. Returns false when the
    /// memory cannot be reserved.
    pub(super) fn allocate(&mut self) -> bool {
        let count = self.config.led_count;
        let mut leds = Vec::new();
        if leds.try_reserve_exact(count).is_err() {
            return false;
        }
        leds.resize(count, 0);
        self.leds = leds;
        self.gamma = Some(self.config.gamma.unwrap_or_else(GammaTable::identity));
        true
    }

    pub(super) fn release(&mut self) {
        self.leds = Vec::new();
        self.gamma = None;
    }

    pub(super) fn encoder(&self) -> Encoder {
        Encoder::new(&self.config, self.gamma)
    }

    pub(super) fn set_gamma_table(&mut self, table: GammaTable) {
        self.config.gamma = Some(table);
        if self.gamma.is_some() {
            self.gamma = Some(table);
        }
    }
}
