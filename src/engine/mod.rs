//! The hardware engine seam.
//!
//! An [`Engine`] owns the control structure and the LED memory that the transmission
//! hardware reads from. Two implementations exist: [`SimulatedEngine`], an in-memory
//! stand-in that works on any host, and `NativeEngine` (feature `rpi`), which drives
//! the `libws2811` C library through the `ws281x` crate. [`Backend`] picks one at
//! construction time.

use crate::config::DeviceConfig;
use crate::error::Result;
use std::fmt;

mod channel;
mod simulated;
pub use simulated::{Frame, SimulatedEngine, SimulationMonitor, SimulationOptions};

#[cfg(feature = "rpi")]
mod native;
#[cfg(feature = "rpi")]
pub use native::NativeEngine;

/// Narrow call interface to the transmission engine.
///
/// Status-returning calls use the engine's raw codes (0 = success, negative =
/// failure, see [`crate::status`]); translating them into errors is the device's job.
pub trait Engine: fmt::Debug + Send {
    /// Copies device and channel parameters into the control structure.
    /// Gamma tables are copied into engine-owned memory.
    fn configure(&mut self, config: &DeviceConfig);

    /// Programs the hardware and allocates LED memory for every used channel.
    fn init(&mut self) -> i32;

    /// LED memory of a channel. Empty for unused channels or before `init`.
    fn leds(&self, channel: usize) -> &[u32];

    /// Mutable LED memory of a channel. Empty for unused channels or before `init`.
    fn leds_mut(&mut self, channel: usize) -> &mut [u32];

    /// Starts transmitting the current LED memory. Does not wait for completion.
    fn render(&mut self) -> i32;

    /// Blocks until the last transmission is complete.
    fn wait(&mut self) -> i32;

    /// Releases LED memory, gamma tables and hardware resources.
    fn fini(&mut self);

    fn set_brightness(&mut self, channel: usize, brightness: u8);

    /// Regenerates every channel's gamma table from an exponent.
    fn set_custom_gamma_factor(&mut self, gamma: f64);

    /// Describes the board the engine runs on.
    fn detect_hardware(&self) -> Result<HardwareInfo>;
}

/// Board family reported by hardware detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardType {
    Unknown,
    Pi1,
    Pi2,
    Pi4,
    /// Value not known to this crate.
    Other(u32),
}

impl BoardType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => BoardType::Unknown,
            1 => BoardType::Pi1,
            2 => BoardType::Pi2,
            3 => BoardType::Pi4,
            other => BoardType::Other(other),
        }
    }
}

/// Description of the physical board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    /// Raw board type (see [`HardwareInfo::board_type`]).
    pub hw_type: u32,
    /// Hardware revision.
    pub version: u32,
    /// Physical base address of the peripherals.
    pub peripheral_base: u32,
    /// Bus address offset of the VideoCore.
    pub videocore_base: u32,
    /// Human readable board label.
    pub description: String,
}

// Peripheral and VideoCore bus bases per board family.
const PI1_BASES: (u32, u32) = (0x2000_0000, 0x4000_0000);
const PI2_BASES: (u32, u32) = (0x3F00_0000, 0xC000_0000);
const PI4_BASES: (u32, u32) = (0xFE00_0000, 0xC000_0000);

// Revision code flag marking the new-style encoding.
const REVISION_NEW_STYLE: u32 = 1 << 23;

impl HardwareInfo {
    pub fn board_type(&self) -> BoardType {
        BoardType::from_raw(self.hw_type)
    }

    /// Decodes a board revision code (the `Revision` field of `/proc/cpuinfo`).
    ///
    /// Returns `None` for revisions the engine cannot drive.
    pub fn from_revision(revision: u32, description: impl Into<String>) -> Option<Self> {
        let board = if revision & REVISION_NEW_STYLE != 0 {
            match (revision >> 12) & 0xf {
                0 => BoardType::Pi1,
                1 | 2 => BoardType::Pi2,
                3 => BoardType::Pi4,
                _ => return None,
            }
        } else {
            // Old-style codes; bit 24 flags a voided warranty.
            match revision & 0xffff {
                0x0002..=0x0015 => BoardType::Pi1,
                _ => return None,
            }
        };
        let (hw_type, (peripheral_base, videocore_base)) = match board {
            BoardType::Pi1 => (1, PI1_BASES),
            BoardType::Pi2 => (2, PI2_BASES),
            _ => (3, PI4_BASES),
        };
        Some(HardwareInfo {
            hw_type,
            version: revision,
            peripheral_base,
            videocore_base,
            description: description.into(),
        })
    }

    /// Reads the board out of `/proc/cpuinfo` text.
    pub fn from_cpuinfo(cpuinfo: &str) -> Option<Self> {
        let field = |name: &str| {
            cpuinfo.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                (key.trim() == name).then(|| value.trim())
            })
        };
        let revision = u32::from_str_radix(field("Revision")?, 16).ok()?;
        let description = match field("Model") {
            Some(model) => model.to_string(),
            None => format!("Raspberry Pi (revision {:06x})", revision),
        };
        Self::from_revision(revision, description)
    }
}

/// Engine implementation selected when a device is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// In-memory engine; available everywhere.
    Simulated,
    /// `libws2811` binding; requires the `rpi` feature.
    Native,
}

impl Default for Backend {
    /// `Native` when the crate is built with the `rpi` feature, `Simulated` otherwise.
    fn default() -> Self {
        if cfg!(feature = "rpi") {
            Backend::Native
        } else {
            Backend::Simulated
        }
    }
}

impl Backend {
    /// True if this backend was compiled into the crate.
    pub fn is_available(&self) -> bool {
        match self {
            Backend::Simulated => true,
            Backend::Native => cfg!(feature = "rpi"),
        }
    }

    /// Allocates a fresh engine control structure.
    pub fn allocate(self) -> Result<Box<dyn Engine>> {
        match self {
            Backend::Simulated => Ok(Box::new(SimulatedEngine::allocate(
                SimulationOptions::default(),
            )?)),
            #[cfg(feature = "rpi")]
            Backend::Native => Ok(Box::new(NativeEngine::allocate()?)),
            #[cfg(not(feature = "rpi"))]
            Backend::Native => Err(crate::Error::BackendUnavailable(self)),
        }
    }

    /// Queries the board without building a device.
    pub fn detect_hardware(self) -> Result<HardwareInfo> {
        match self {
            Backend::Simulated => Ok(simulated::dummy_hardware()),
            #[cfg(feature = "rpi")]
            Backend::Native => native::detect_hardware(),
            #[cfg(not(feature = "rpi"))]
            Backend::Native => Err(crate::Error::BackendUnavailable(self)),
        }
    }
}

/// Queries the board using the default backend.
pub fn detect_hardware() -> Result<HardwareInfo> {
    Backend::default().detect_hardware()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI3_CPUINFO: &str = "processor\t: 0\nmodel name\t: ARMv7 Processor rev 4 (v7l)\n\
Hardware\t: BCM2835\nRevision\t: a02082\nSerial\t\t: 00000000deadbeef\n\
Model\t\t: Raspberry Pi 3 Model B Rev 1.2\n";

    #[test]
    fn test_cpuinfo_pi3() {
        let info = HardwareInfo::from_cpuinfo(PI3_CPUINFO).unwrap();
        assert_eq!(info.board_type(), BoardType::Pi2);
        assert_eq!(info.version, 0xa02082);
        assert_eq!(info.peripheral_base, 0x3F00_0000);
        assert_eq!(info.description, "Raspberry Pi 3 Model B Rev 1.2");
    }

    #[test]
    fn test_revision_decoding() {
        // Pi 4B, new-style
        let info = HardwareInfo::from_revision(0xc03111, "Pi 4").unwrap();
        assert_eq!(info.board_type(), BoardType::Pi4);
        assert_eq!(info.peripheral_base, 0xFE00_0000);
        // Model B rev 2 with the warranty bit set
        let info = HardwareInfo::from_revision(0x100000e, "Pi 1").unwrap();
        assert_eq!(info.board_type(), BoardType::Pi1);
        assert_eq!(info.videocore_base, 0x4000_0000);
        // Pi 5 (BCM2712) is not driven by the engine
        assert!(HardwareInfo::from_revision(0xc04170, "Pi 5").is_none());
    }

    #[test]
    fn test_cpuinfo_without_revision() {
        assert!(HardwareInfo::from_cpuinfo("processor\t: 0\n").is_none());
    }
}
