// tests/hardware_tests.rs
use ws281x_rpi::{detect_hardware, Backend, Result};

#[cfg(feature = "rpi")]
use std::{thread, time::Duration};
#[cfg(feature = "rpi")]
use ws281x_rpi::{ChannelConfig, Device, DeviceConfig, StripType, DEFAULT_DMA_NUM, TARGET_FREQ};

#[test]
fn test_simulated_hardware_detection() -> Result<()> {
    let info = Backend::Simulated.detect_hardware()?;
    assert_eq!(info.description, "DUMMY");
    assert_eq!(info.hw_type, 0);
    Ok(())
}

#[cfg(not(feature = "rpi"))]
#[test]
fn test_default_detection_is_simulated() -> Result<()> {
    assert_eq!(detect_hardware()?.description, "DUMMY");
    Ok(())
}

// Helper to open a single 8-LED strip on GPIO 18 with the native engine
#[cfg(feature = "rpi")]
fn open_test_device(led_count: usize) -> Device {
    let config = DeviceConfig::new(TARGET_FREQ, DEFAULT_DMA_NUM).with_channel(
        ChannelConfig::new(18, led_count)
            .with_strip_type(StripType::WS2812)
            .with_brightness(32),
    );
    Device::new(config, Backend::Native)
        .expect("Failed to allocate the native engine. Is libws2811 installed?")
}

#[cfg(feature = "rpi")]
#[test]
#[ignore] // Ignore by default, requires a Raspberry Pi and root
fn test_native_hardware_detection() -> Result<()> {
    let info = detect_hardware()?;
    println!(
        "Detected board: {} (type {:?}, revision 0x{:08X})",
        info.description,
        info.board_type(),
        info.version
    );
    assert!(!info.description.is_empty());
    assert_ne!(info.peripheral_base, 0);
    Ok(())
}

#[cfg(feature = "rpi")]
#[test]
#[ignore] // Ignore by default, requires a strip on GPIO 18
fn test_native_color_cycle() -> Result<()> {
    let mut device = open_test_device(8);
    device.init()?;
    assert_eq!(device.leds(0)?.len(), 8);

    for color in [0xFF0000, 0x00FF00, 0x0000FF, 0x000000] {
        println!("Showing 0x{color:06X}");
        device.set_leds_sync(0, &[color; 8])?;
        device.render()?;
        thread::sleep(Duration::from_millis(300));
    }
    device.wait()?;
    assert_eq!(device.leds(0)?, &[0; 8]);

    device.finalize();
    Ok(())
}

#[cfg(feature = "rpi")]
#[test]
#[ignore] // Ignore by default, requires a strip on GPIO 18
fn test_native_brightness_and_gamma() -> Result<()> {
    let mut device = open_test_device(8);
    device.init()?;
    device.set_leds_sync(0, &[0xFFFFFF; 8])?;

    for brightness in [8, 64, 255] {
        device.set_brightness(0, brightness)?;
        device.render()?;
        device.wait()?;
        thread::sleep(Duration::from_millis(300));
    }

    device.set_custom_gamma_factor(2.2)?;
    device.set_leds_sync(0, &[0x808080; 8])?;
    device.render()?;
    device.wait()?;

    device.clear_all()?;
    device.render()?;
    device.wait()?;
    Ok(())
}
