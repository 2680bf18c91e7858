//! Default options and packed strip-type codes understood by the engine.

/// Number of independent output channels the engine drives.
pub const RPI_PWM_CHANNELS: usize = 2;

/// Default signal frequency. WS281x strips usually run at 800kHz and can go as low as 400kHz.
pub const TARGET_FREQ: u32 = 800_000;
/// Default DMA engine. DMA 5 collides with the SD card driver on recent kernels.
pub const DEFAULT_DMA_NUM: i32 = 10;
/// Default GPIO pin for channel 0 (PWM0).
pub const DEFAULT_GPIO_PIN: u8 = 18;
/// Default number of LEDs on channel 0.
pub const DEFAULT_LED_COUNT: usize = 16;
/// Default brightness ceiling for channel 0.
pub const DEFAULT_BRIGHTNESS: u8 = 64;
/// Largest LED count the engine can represent (its count field is a C `int`).
pub const MAX_LED_COUNT: usize = i32::MAX as usize;

// --- Strip Types ---
pub mod strip {
    // 4 color R, G, B and W ordering
    pub const SK6812_STRIP_RGBW: u32 = 0x1810_0800;
    pub const SK6812_STRIP_RBGW: u32 = 0x1810_0008;
    pub const SK6812_STRIP_GRBW: u32 = 0x1808_1000;
    pub const SK6812_STRIP_GBRW: u32 = 0x1808_0010;
    pub const SK6812_STRIP_BRGW: u32 = 0x1800_1008;
    pub const SK6812_STRIP_BGRW: u32 = 0x1800_0810;
    /// Any code with bits in this mask carries a white channel.
    pub const SK6812_SHIFT_WMASK: u32 = 0xf000_0000;

    // 3 color R, G and B ordering
    pub const WS2811_STRIP_RGB: u32 = 0x0010_0800;
    pub const WS2811_STRIP_RBG: u32 = 0x0010_0008;
    pub const WS2811_STRIP_GRB: u32 = 0x0008_1000;
    pub const WS2811_STRIP_GBR: u32 = 0x0008_0010;
    pub const WS2811_STRIP_BRG: u32 = 0x0000_1008;
    pub const WS2811_STRIP_BGR: u32 = 0x0000_0810;

    // Predefined fixed LED types
    pub const WS2812_STRIP: u32 = WS2811_STRIP_GRB;
    pub const SK6812_STRIP: u32 = WS2811_STRIP_GRB;
    pub const SK6812W_STRIP: u32 = SK6812_STRIP_GRBW;
}

// --- Engine Return Codes ---
pub mod status {
    pub const SUCCESS: i32 = 0;
    pub const ERROR_GENERIC: i32 = -1;
    pub const ERROR_OUT_OF_MEMORY: i32 = -2;
    pub const ERROR_HW_NOT_SUPPORTED: i32 = -3;
    pub const ERROR_MEM_LOCK: i32 = -4;
    pub const ERROR_MMAP: i32 = -5;
    pub const ERROR_MAP_REGISTERS: i32 = -6;
    pub const ERROR_GPIO_INIT: i32 = -7;
    pub const ERROR_PWM_SETUP: i32 = -8;
    pub const ERROR_MAILBOX_DEVICE: i32 = -9;
    pub const ERROR_DMA: i32 = -10;
    pub const ERROR_ILLEGAL_GPIO: i32 = -11;
    pub const ERROR_PCM_SETUP: i32 = -12;
    pub const ERROR_SPI_SETUP: i32 = -13;
    pub const ERROR_SPI_TRANSFER: i32 = -14;
}
