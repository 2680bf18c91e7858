//! Color orderings and the bit shifts the engine derives from them.

use crate::consts::strip::*;

/// Byte ordering of the LEDs on a strip.
///
/// The engine receives the packed code; each byte of the code is the shift of the
/// component transmitted in that position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripType {
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
    Rgbw,
    Rbgw,
    Grbw,
    Gbrw,
    Brgw,
    Bgrw,
    /// Raw engine code not covered by the named orderings.
    Custom(u32),
}

impl StripType {
    /// WS2812 strips expect GRB.
    pub const WS2812: StripType = StripType::Grb;
    /// SK6812 (RGB) strips expect GRB.
    pub const SK6812: StripType = StripType::Grb;
    /// SK6812 RGBW strips expect GRBW.
    pub const SK6812W: StripType = StripType::Grbw;

    /// Maps a packed engine code to a `StripType`.
    pub fn from_code(code: u32) -> Self {
        match code {
            WS2811_STRIP_RGB => StripType::Rgb,
            WS2811_STRIP_RBG => StripType::Rbg,
            WS2811_STRIP_GRB => StripType::Grb,
            WS2811_STRIP_GBR => StripType::Gbr,
            WS2811_STRIP_BRG => StripType::Brg,
            WS2811_STRIP_BGR => StripType::Bgr,
            SK6812_STRIP_RGBW => StripType::Rgbw,
            SK6812_STRIP_RBGW => StripType::Rbgw,
            SK6812_STRIP_GRBW => StripType::Grbw,
            SK6812_STRIP_GBRW => StripType::Gbrw,
            SK6812_STRIP_BRGW => StripType::Brgw,
            SK6812_STRIP_BGRW => StripType::Bgrw,
            other => StripType::Custom(other),
        }
    }

    /// Returns the packed engine code.
    pub fn code(&self) -> u32 {
        match *self {
            StripType::Rgb => WS2811_STRIP_RGB,
            StripType::Rbg => WS2811_STRIP_RBG,
            StripType::Grb => WS2811_STRIP_GRB,
            StripType::Gbr => WS2811_STRIP_GBR,
            StripType::Brg => WS2811_STRIP_BRG,
            StripType::Bgr => WS2811_STRIP_BGR,
            StripType::Rgbw => SK6812_STRIP_RGBW,
            StripType::Rbgw => SK6812_STRIP_RBGW,
            StripType::Grbw => SK6812_STRIP_GRBW,
            StripType::Gbrw => SK6812_STRIP_GBRW,
            StripType::Brgw => SK6812_STRIP_BRGW,
            StripType::Bgrw => SK6812_STRIP_BGRW,
            StripType::Custom(raw) => raw,
        }
    }

    /// True for four-color (RGBW) strips.
    #[inline]
    pub fn has_white(&self) -> bool {
        self.code() & SK6812_SHIFT_WMASK != 0
    }

    /// Bytes sent per LED (3, or 4 with a white channel).
    #[inline]
    pub fn bytes_per_led(&self) -> usize {
        if self.has_white() {
            4
        } else {
            3
        }
    }

    /// Bit shifts the engine derives from the packed code. A zero code is sent as RGB.
    pub fn shifts(&self) -> ChannelShifts {
        match self.code() {
            0 => ChannelShifts::from_code(WS2811_STRIP_RGB),
            code => ChannelShifts::from_code(code),
        }
    }
}

impl Default for StripType {
    fn default() -> Self {
        StripType::WS2812
    }
}

/// Bit positions of each transmitted component inside a packed pixel.
///
/// The names follow the engine: `r` is the shift of the byte sent first, `g` second,
/// `b` third and `w` fourth (four-color strips only). For a GRB strip `r == 8`,
/// because green is sent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelShifts {
    pub w: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ChannelShifts {
    pub fn from_code(code: u32) -> Self {
        ChannelShifts {
            w: ((code >> 24) & 0xff) as u8,
            r: ((code >> 16) & 0xff) as u8,
            g: ((code >> 8) & 0xff) as u8,
            b: (code & 0xff) as u8,
        }
    }

    /// Shifts in transmission order.
    pub fn in_order(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grb_sends_green_first() {
        let shifts = StripType::Grb.shifts();
        assert_eq!(shifts.r, 8);
        assert_eq!(shifts.g, 16);
        assert_eq!(shifts.b, 0);
        assert_eq!(shifts.w, 0);
    }

    #[test]
    fn test_zero_code_is_rgb() {
        assert_eq!(StripType::Custom(0).shifts(), StripType::Rgb.shifts());
        assert_eq!(StripType::Custom(0).bytes_per_led(), 3);
    }

    #[test]
    fn test_white_detection() {
        assert!(StripType::SK6812W.has_white());
        assert_eq!(StripType::Bgrw.bytes_per_led(), 4);
        assert!(!StripType::Rgb.has_white());
        assert_eq!(StripType::Rgb.bytes_per_led(), 3);
        assert_eq!(StripType::Rgbw.shifts().w, 24);
    }

    #[test]
    fn test_codes_map_back() {
        let all = [
            StripType::Rgb,
            StripType::Rbg,
            StripType::Grb,
            StripType::Gbr,
            StripType::Brg,
            StripType::Bgr,
            StripType::Rgbw,
            StripType::Rbgw,
            StripType::Grbw,
            StripType::Gbrw,
            StripType::Brgw,
            StripType::Bgrw,
        ];
        for strip in all {
            assert_eq!(StripType::from_code(strip.code()), strip);
        }
        assert_eq!(StripType::from_code(0x1234), StripType::Custom(0x1234));
    }
}
