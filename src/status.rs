//! Engine return codes and their descriptions.

use crate::consts::status::*;

/// Description returned for codes the table does not know about.
pub const UNKNOWN_STATUS: &str = "Unknown";

static STATUS_DESCRIPTIONS: [(i32, &str); 15] = [
    (SUCCESS, "Success"),
    (ERROR_GENERIC, "Generic failure"),
    (ERROR_OUT_OF_MEMORY, "Out of memory"),
    (ERROR_HW_NOT_SUPPORTED, "Hardware revision is not supported"),
    (ERROR_MEM_LOCK, "Memory lock failed"),
    (ERROR_MMAP, "mmap() failed"),
    (ERROR_MAP_REGISTERS, "Unable to map registers into userspace"),
    (ERROR_GPIO_INIT, "Unable to initialize GPIO"),
    (ERROR_PWM_SETUP, "Unable to initialize PWM"),
    (ERROR_MAILBOX_DEVICE, "Failed to create mailbox device"),
    (ERROR_DMA, "DMA error"),
    (ERROR_ILLEGAL_GPIO, "Selected GPIO not possible"),
    (ERROR_PCM_SETUP, "Unable to initialize PCM"),
    (ERROR_SPI_SETUP, "Unable to initialize SPI"),
    (ERROR_SPI_TRANSFER, "SPI transfer error"),
];

/// Returns the human readable description of an engine status code.
///
/// Codes outside the known set map to `"Unknown"`, so newer engine versions with
/// additional codes still produce a usable message.
pub fn describe(code: i32) -> &'static str {
    STATUS_DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, desc)| *desc)
        .unwrap_or(UNKNOWN_STATUS)
}

/// Typed view of the engine return codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Generic,
    OutOfMemory,
    HwNotSupported,
    MemLock,
    Mmap,
    MapRegisters,
    GpioInit,
    PwmSetup,
    MailboxDevice,
    Dma,
    IllegalGpio,
    PcmSetup,
    SpiSetup,
    SpiTransfer,
    /// Code not in the table (for forward compatibility).
    Unknown(i32),
}

impl Status {
    /// Maps a raw engine code to a `Status`.
    pub fn from_code(code: i32) -> Self {
        match code {
            SUCCESS => Status::Success,
            ERROR_GENERIC => Status::Generic,
            ERROR_OUT_OF_MEMORY => Status::OutOfMemory,
            ERROR_HW_NOT_SUPPORTED => Status::HwNotSupported,
            ERROR_MEM_LOCK => Status::MemLock,
            ERROR_MMAP => Status::Mmap,
            ERROR_MAP_REGISTERS => Status::MapRegisters,
            ERROR_GPIO_INIT => Status::GpioInit,
            ERROR_PWM_SETUP => Status::PwmSetup,
            ERROR_MAILBOX_DEVICE => Status::MailboxDevice,
            ERROR_DMA => Status::Dma,
            ERROR_ILLEGAL_GPIO => Status::IllegalGpio,
            ERROR_PCM_SETUP => Status::PcmSetup,
            ERROR_SPI_SETUP => Status::SpiSetup,
            ERROR_SPI_TRANSFER => Status::SpiTransfer,
            other => Status::Unknown(other),
        }
    }

    /// Returns the raw engine code.
    pub fn code(&self) -> i32 {
        match *self {
            Status::Success => SUCCESS,
            Status::Generic => ERROR_GENERIC,
            Status::OutOfMemory => ERROR_OUT_OF_MEMORY,
            Status::HwNotSupported => ERROR_HW_NOT_SUPPORTED,
            Status::MemLock => ERROR_MEM_LOCK,
            Status::Mmap => ERROR_MMAP,
            Status::MapRegisters => ERROR_MAP_REGISTERS,
            Status::GpioInit => ERROR_GPIO_INIT,
            Status::PwmSetup => ERROR_PWM_SETUP,
            Status::MailboxDevice => ERROR_MAILBOX_DEVICE,
            Status::Dma => ERROR_DMA,
            Status::IllegalGpio => ERROR_ILLEGAL_GPIO,
            Status::PcmSetup => ERROR_PCM_SETUP,
            Status::SpiSetup => ERROR_SPI_SETUP,
            Status::SpiTransfer => ERROR_SPI_TRANSFER,
            Status::Unknown(raw) => raw,
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        *self == Status::Success
    }

    pub fn description(&self) -> &'static str {
        describe(self.code())
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip_through_status() {
        for (code, desc) in STATUS_DESCRIPTIONS.iter() {
            let status = Status::from_code(*code);
            assert!(!matches!(status, Status::Unknown(_)), "code {code} unmapped");
            assert_eq!(status.code(), *code);
            assert_eq!(status.description(), *desc);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let status = Status::from_code(-42);
        assert_eq!(status, Status::Unknown(-42));
        assert_eq!(status.code(), -42);
        assert_eq!(status.description(), UNKNOWN_STATUS);
        assert_eq!(status.to_string(), "-42 (Unknown)");
    }
}
