//! Gamma correction lookup tables.
//!
//! A table maps a linear 8-bit intensity to the byte actually sent to the strip.
//! The same table serves every color component of a channel.

/// Number of entries in a gamma table.
pub const GAMMA_TABLE_LEN: usize = 256;

/// Exponent the default table was generated with.
pub const DEFAULT_GAMMA_FACTOR: f64 = 2.8;

// round(255 * (i / 255) ^ 2.8)
const DEFAULT_GAMMA: [u8; GAMMA_TABLE_LEN] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, //
    1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, //
    2, 3, 3, 3, 3, 3, 3, 3, 4, 4, 4, 4, 4, 5, 5, 5, //
    5, 6, 6, 6, 6, 7, 7, 7, 7, 8, 8, 8, 9, 9, 9, 10, //
    10, 10, 11, 11, 11, 12, 12, 13, 13, 13, 14, 14, 15, 15, 16, 16, //
    17, 17, 18, 18, 19, 19, 20, 20, 21, 21, 22, 22, 23, 24, 24, 25, //
    25, 26, 27, 27, 28, 29, 29, 30, 31, 32, 32, 33, 34, 35, 35, 36, //
    37, 38, 39, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50, 50, //
    51, 52, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 66, 67, 68, //
    69, 70, 72, 73, 74, 75, 77, 78, 79, 81, 82, 83, 85, 86, 87, 89, //
    90, 92, 93, 95, 96, 98, 99, 101, 102, 104, 105, 107, 109, 110, 112, 114, //
    115, 117, 119, 120, 122, 124, 126, 127, 129, 131, 133, 135, 137, 138, 140, 142, //
    144, 146, 148, 150, 152, 154, 156, 158, 160, 162, 164, 167, 169, 171, 173, 175, //
    177, 180, 182, 184, 186, 189, 191, 193, 196, 198, 200, 203, 205, 208, 210, 213, //
    215, 218, 220, 223, 225, 228, 231, 233, 236, 239, 241, 244, 247, 249, 252, 255, //
];

/// A 256-entry gamma correction table.
///
/// `GammaTable` is a plain value: handing one to a [`ChannelConfig`](crate::ChannelConfig)
/// copies it, so later edits to the caller's table never reach a running device.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct GammaTable([u8; GAMMA_TABLE_LEN]);

impl GammaTable {
    /// The uncorrected table (`table[i] == i`).
    pub fn identity() -> Self {
        let mut table = [0u8; GAMMA_TABLE_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        GammaTable(table)
    }

    /// Builds a table from a gamma exponent: `table[i] = round(255 * (i/255)^gamma)`.
    ///
    /// Exponents that are not strictly positive (or not finite) yield the identity
    /// table, which is what the engine does for a zero factor.
    pub fn from_exponent(gamma: f64) -> Self {
        if !(gamma > 0.0) || !gamma.is_finite() {
            return Self::identity();
        }
        let mut table = [0u8; GAMMA_TABLE_LEN];
        for (i, entry) in table.iter_mut().enumerate() {
            let corrected = (i as f64 / 255.0).powf(gamma) * 255.0;
            *entry = corrected.round().clamp(0.0, 255.0) as u8;
        }
        GammaTable(table)
    }

    /// Wraps an existing lookup table.
    pub const fn from_array(table: [u8; GAMMA_TABLE_LEN]) -> Self {
        GammaTable(table)
    }

    /// Corrects a single linear intensity.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.0[value as usize]
    }

    /// Corrects every byte of a packed `0xWWRRGGBB` color.
    pub fn apply_packed(&self, color: u32) -> u32 {
        u32::from_le_bytes(color.to_le_bytes().map(|b| self.apply(b)))
    }

    pub fn as_array(&self) -> &[u8; GAMMA_TABLE_LEN] {
        &self.0
    }

    /// Returns true when every entry is non-decreasing.
    pub fn is_monotonic(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl Default for GammaTable {
    /// The perceptual curve (gamma 2.8) commonly used for WS281x strips.
    fn default() -> Self {
        GammaTable(DEFAULT_GAMMA)
    }
}

impl From<[u8; GAMMA_TABLE_LEN]> for GammaTable {
    fn from(table: [u8; GAMMA_TABLE_LEN]) -> Self {
        GammaTable(table)
    }
}

impl AsRef<[u8]> for GammaTable {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// The full table is noise in debug output.
impl std::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GammaTable([{}, {}, {}, .., {}])",
            self.0[0], self.0[1], self.0[128], self.0[255]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_its_exponent() {
        assert_eq!(GammaTable::default(), GammaTable::from_exponent(DEFAULT_GAMMA_FACTOR));
    }

    #[test]
    fn test_packed_correction_touches_every_byte() {
        let table = GammaTable::default();
        let color = 0x80FF_4000;
        let corrected = table.apply_packed(color);
        assert_eq!(corrected >> 24, table.apply(0x80) as u32);
        assert_eq!((corrected >> 16) & 0xFF, 255);
        assert_eq!((corrected >> 8) & 0xFF, table.apply(0x40) as u32);
        assert_eq!(corrected & 0xFF, 0);
    }
}
