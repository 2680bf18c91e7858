//! In-memory engine used on hosts without the LED hardware and in tests.
//!
//! Transmission is modelled as a snapshot: `render` encodes the LED memory of each
//! used channel into the bytes a real strip would receive and records them as a
//! [`Frame`]. `wait` completes the pending transmission. Nothing changes LED memory
//! except the caller, so buffer contents are deterministic.

use super::channel::ChannelState;
use super::{Engine, HardwareInfo};
use crate::config::{ChannelConfig, DeviceConfig};
use crate::consts::status::{ERROR_GENERIC, ERROR_OUT_OF_MEMORY, SUCCESS};
use crate::consts::RPI_PWM_CHANNELS;
use crate::error::{Error, Result};
use crate::gamma::GammaTable;
use log::{debug, trace};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

// Reset (latch) time appended to every transmission.
const RESET_TIME: Duration = Duration::from_micros(50);

pub(super) fn dummy_hardware() -> HardwareInfo {
    HardwareInfo {
        hw_type: 0,
        version: 0,
        peripheral_base: 0,
        videocore_base: 0,
        description: "DUMMY".to_string(),
    }
}

/// Fault injection and timing knobs for [`SimulatedEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Make allocation of the control structure fail.
    pub fail_allocation: bool,
    /// Status returned by `init`.
    pub init_status: i32,
    /// Status returned by `render`.
    pub render_status: i32,
    /// Status returned by `wait`.
    pub wait_status: i32,
    /// Make `wait` sleep for the time the frame would take on the wire.
    pub realtime: bool,
    /// Board reported by hardware detection.
    pub hardware: HardwareInfo,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        SimulationOptions {
            fail_allocation: false,
            init_status: SUCCESS,
            render_status: SUCCESS,
            wait_status: SUCCESS,
            realtime: false,
            hardware: dummy_hardware(),
        }
    }
}

/// Bytes of one channel as they were put on the wire by a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// 3 for RGB strips, 4 for RGBW strips.
    pub bytes_per_led: usize,
    /// Line-level inversion requested by the channel (the bytes are not inverted).
    pub inverted: bool,
    /// Encoded bytes in transmission order.
    pub bytes: Vec<u8>,
}

impl Frame {
    pub fn led_count(&self) -> usize {
        self.bytes.len() / self.bytes_per_led
    }

    /// Transmitted bytes of one LED.
    pub fn led(&self, index: usize) -> Option<&[u8]> {
        self.bytes.chunks_exact(self.bytes_per_led).nth(index)
    }

    /// Time on the wire: 8 bits per byte at `frequency`, plus the reset pulse.
    pub fn transmit_time(&self, frequency: u32) -> Duration {
        if frequency == 0 {
            return RESET_TIME;
        }
        let bits = self.bytes.len() as u64 * 8;
        Duration::from_nanos(bits * 1_000_000_000 / frequency as u64) + RESET_TIME
    }
}

#[derive(Debug, Default)]
struct Record {
    init_calls: usize,
    render_calls: usize,
    wait_calls: usize,
    fini_calls: usize,
    completed: usize,
    frames: [Option<Frame>; RPI_PWM_CHANNELS],
    brightness: [u8; RPI_PWM_CHANNELS],
    gamma: [Option<GammaTable>; RPI_PWM_CHANNELS],
    initialized: bool,
    released: bool,
}

/// Read-only window into a [`SimulatedEngine`] that survives moving the engine into a
/// device (and the device's finalization).
#[derive(Debug, Clone)]
pub struct SimulationMonitor {
    record: Arc<Mutex<Record>>,
}

impl SimulationMonitor {
    fn record(&self) -> MutexGuard<'_, Record> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn init_calls(&self) -> usize {
        self.record().init_calls
    }

    pub fn render_calls(&self) -> usize {
        self.record().render_calls
    }

    pub fn wait_calls(&self) -> usize {
        self.record().wait_calls
    }

    pub fn fini_calls(&self) -> usize {
        self.record().fini_calls
    }

    /// Number of transmissions that ran to completion.
    pub fn completed_transmissions(&self) -> usize {
        self.record().completed
    }

    /// Last frame rendered on a channel.
    pub fn last_frame(&self, channel: usize) -> Option<Frame> {
        self.record().frames.get(channel).cloned().flatten()
    }

    /// Brightness currently programmed for a channel.
    pub fn brightness(&self, channel: usize) -> Option<u8> {
        self.record().brightness.get(channel).copied()
    }

    /// Gamma table currently held by the engine for a channel (`None` before init).
    pub fn gamma(&self, channel: usize) -> Option<GammaTable> {
        self.record().gamma.get(channel).copied().flatten()
    }

    pub fn is_initialized(&self) -> bool {
        self.record().initialized
    }

    /// True once `fini` released the engine's memory.
    pub fn is_released(&self) -> bool {
        self.record().released
    }
}

impl ChannelState {
    fn frame(&self) -> Frame {
        let encoder = self.encoder();
        let bytes_per_led = encoder.bytes_per_led();
        let mut bytes = Vec::with_capacity(self.leds.len() * bytes_per_led);
        for &led in &self.leds {
            bytes.extend_from_slice(&encoder.encode(led)[..bytes_per_led]);
        }
        Frame {
            bytes_per_led,
            inverted: self.config.invert,
            bytes,
        }
    }
}

/// Engine that keeps LED memory in process and records what it would transmit.
#[derive(Debug)]
pub struct SimulatedEngine {
    options: SimulationOptions,
    frequency: u32,
    channels: [ChannelState; RPI_PWM_CHANNELS],
    initialized: bool,
    // Start time and duration of the transmission in flight.
    in_flight: Option<(Instant, Duration)>,
    record: Arc<Mutex<Record>>,
}

impl SimulatedEngine {
    /// Allocates the control structure, honoring `options.fail_allocation`.
    pub fn allocate(options: SimulationOptions) -> Result<Self> {
        if options.fail_allocation {
            debug!("Simulated engine: refusing allocation");
            return Err(Error::AllocationFailure);
        }
        Ok(Self::build(options))
    }

    /// An engine with default options.
    pub fn new() -> Self {
        Self::build(SimulationOptions::default())
    }

    fn build(options: SimulationOptions) -> Self {
        SimulatedEngine {
            options,
            frequency: 0,
            channels: std::array::from_fn(|_| ChannelState::new()),
            initialized: false,
            in_flight: None,
            record: Arc::new(Mutex::new(Record::default())),
        }
    }

    pub fn monitor(&self) -> SimulationMonitor {
        SimulationMonitor {
            record: Arc::clone(&self.record),
        }
    }

    fn record(&self) -> MutexGuard<'_, Record> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Marks the transmission in flight as done, sleeping out its wire time if asked to.
    fn complete_transmission(&mut self) {
        if let Some((started, duration)) = self.in_flight.take() {
            if self.options.realtime {
                let elapsed = started.elapsed();
                if elapsed < duration {
                    thread::sleep(duration - elapsed);
                }
            }
            self.record().completed += 1;
        }
    }

    fn publish_channel_state(&self) {
        let mut record = self.record();
        for (i, channel) in self.channels.iter().enumerate() {
            record.brightness[i] = channel.config.brightness;
            record.gamma[i] = channel.gamma;
        }
        record.initialized = self.initialized;
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for SimulatedEngine {
    fn configure(&mut self, config: &DeviceConfig) {
        self.frequency = config.frequency;
        for (i, channel) in self.channels.iter_mut().enumerate() {
            channel.config = config
                .channel(i)
                .cloned()
                .unwrap_or_else(ChannelConfig::unused);
        }
        trace!(
            "Simulated engine configured: freq={}Hz, dma={}",
            config.frequency,
            config.dma_channel
        );
    }

    fn init(&mut self) -> i32 {
        self.record().init_calls += 1;
        if self.initialized {
            return ERROR_GENERIC;
        }
        if self.options.init_status != SUCCESS {
            return self.options.init_status;
        }
        if !self.channels.iter_mut().all(ChannelState::allocate) {
            self.channels.iter_mut().for_each(ChannelState::release);
            return ERROR_OUT_OF_MEMORY;
        }
        self.initialized = true;
        self.publish_channel_state();
        debug!(
            "Simulated engine initialized: {:?} LEDs",
            self.channels.iter().map(|c| c.leds.len()).collect::<Vec<_>>()
        );
        SUCCESS
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
        self.record().render_calls += 1;
        if !self.initialized {
            return ERROR_GENERIC;
        }
        if self.options.render_status != SUCCESS {
            return self.options.render_status;
        }
        // A new frame cannot start before the previous one is out.
        self.complete_transmission();

        let frames: Vec<Option<Frame>> = self
            .channels
            .iter()
            .map(|c| c.config.is_used().then(|| c.frame()))
            .collect();
        let duration = frames
            .iter()
            .flatten()
            .map(|f| f.transmit_time(self.frequency))
            .max()
            .unwrap_or(Duration::ZERO);
        self.in_flight = Some((Instant::now(), duration));

        let mut record = self.record();
        for (slot, frame) in record.frames.iter_mut().zip(frames) {
            if frame.is_some() {
                *slot = frame;
            }
        }
        trace!("Simulated render: transmission takes {:?}", duration);
        SUCCESS
    }

    fn wait(&mut self) -> i32 {
        self.record().wait_calls += 1;
        if self.options.wait_status != SUCCESS {
            return self.options.wait_status;
        }
        self.complete_transmission();
        SUCCESS
    }

    fn fini(&mut self) {
        self.complete_transmission();
        for channel in self.channels.iter_mut() {
            channel.release();
        }
        self.initialized = false;
        self.publish_channel_state();
        let mut record = self.record();
        record.fini_calls += 1;
        record.released = true;
        debug!("Simulated engine released");
    }

    fn set_brightness(&mut self, channel: usize, brightness: u8) {
        if let Some(c) = self.channels.get_mut(channel) {
            c.config.brightness = brightness;
        }
        self.publish_channel_state();
    }

    fn set_custom_gamma_factor(&mut self, gamma: f64) {
        let table = GammaTable::from_exponent(gamma);
        for channel in self.channels.iter_mut() {
            channel.set_gamma_table(table);
        }
        self.publish_channel_state();
    }

    fn detect_hardware(&self) -> Result<HardwareInfo> {
        Ok(self.options.hardware.clone())
    }
}
