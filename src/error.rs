use crate::consts::status::SUCCESS;
use crate::engine::Backend;
use crate::status;
use thiserror::Error;

/// Errors that can occur while configuring or driving a LED strip device.
///
/// Engine failures are reported as [`Error::HardwareStatus`] and are never retried
/// by the crate; most of them (unsupported board, illegal GPIO) are not transient.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The engine could not allocate its control structure. The device is unusable.
    #[error("Unable to allocate memory for the engine control structure")]
    AllocationFailure,
    /// `init` was called on a device that is already initialized or finalized.
    #[error("Device already initialized")]
    AlreadyInitialized,
    /// The operation requires an initialized device.
    #[error("Device not initialized (call init() first; finalized devices cannot be reused)")]
    NotInitialized,
    /// A synchronized write carried more values than the channel holds.
    #[error("Too many LEDs for channel {channel}: {count} > {capacity}")]
    TooManyPixels {
        /// The channel that was written.
        channel: usize,
        /// Number of values supplied.
        count: usize,
        /// Number of LEDs configured on the channel.
        capacity: usize,
    },
    /// The engine returned a non-zero status code.
    #[error("error ws2811.{operation}: {code} ({description})")]
    HardwareStatus {
        /// Engine call that failed (`init`, `render` or `wait`).
        operation: &'static str,
        /// Raw engine status code.
        code: i32,
        /// Human readable description from the status table.
        description: &'static str,
    },
    /// Channel index is outside `0..RPI_PWM_CHANNELS`.
    #[error("Channel {channel} argument out of range (0-{max})", max = crate::RPI_PWM_CHANNELS - 1)]
    ChannelOutOfRange {
        /// The invalid channel index.
        channel: usize,
    },
    /// The configuration lists more channels than the engine can drive.
    #[error("Too many channels configured: {count} (max {max})", max = crate::RPI_PWM_CHANNELS)]
    TooManyChannels {
        /// Number of channels in the configuration.
        count: usize,
    },
    /// A channel asks for more LEDs than the engine can address.
    #[error("Channel {channel} has {count} LEDs (max {max})", max = crate::MAX_LED_COUNT)]
    TooManyLeds {
        /// The offending channel.
        channel: usize,
        /// Number of LEDs configured on the channel.
        count: usize,
    },
    /// Two used channels were bound to the same GPIO pin.
    #[error("GPIO pin {pin} is assigned to more than one channel")]
    DuplicateGpio {
        /// The pin claimed twice.
        pin: u8,
    },
    /// Single LED access outside the channel's buffer.
    #[error("LED index {index} out of range for channel {channel} ({count} LEDs)")]
    LedIndexOutOfRange {
        /// The channel that was accessed.
        channel: usize,
        /// The requested index.
        index: usize,
        /// Number of LEDs configured on the channel.
        count: usize,
    },
    /// The requested engine backend was not compiled into this build.
    #[error("Engine backend {0:?} is not available in this build")]
    BackendUnavailable(Backend),
}

/// Result type alias for LED strip operations.
///
/// This is a convenience alias for `std::result::Result<T, Error>` used
/// throughout the crate to reduce boilerplate.
pub type Result<T> = std::result::Result<T, Error>;

// Converts an engine status into a Result, attaching the failing operation.
pub(crate) fn check_status(operation: &'static str, code: i32) -> Result<()> {
    if code == SUCCESS {
        Ok(())
    } else {
        Err(Error::HardwareStatus {
            operation,
            code,
            description: status::describe(code),
        })
    }
}

pub(crate) fn channel_out_of_range(channel: usize) -> Error {
    Error::ChannelOutOfRange { channel }
}
