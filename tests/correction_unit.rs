//! Unit tests for gamma tables, status codes and strip layouts
//!
//! These tests check the lookup tables and code translations the device relies on,
//! independently of any engine.

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ws281x_rpi::codes::{status, strip};
    use ws281x_rpi::{describe, ChannelShifts, GammaTable, Status, StripType};

    #[test]
    fn test_gamma_one_is_identity() {
        let table = GammaTable::from_exponent(1.0);
        for i in 0..=255u8 {
            assert_eq!(table.apply(i), i, "Entry {i} must be unchanged");
        }
        assert_eq!(table, GammaTable::identity());
    }

    #[test]
    fn test_non_positive_gamma_is_identity() {
        for gamma in [0.0, -1.5, f64::NAN, f64::INFINITY] {
            assert_eq!(
                GammaTable::from_exponent(gamma),
                GammaTable::identity(),
                "Gamma {gamma} must yield the identity table"
            );
        }
    }

    #[test]
    fn test_default_table_shape() {
        let table = GammaTable::default();
        assert!(table.is_monotonic());
        assert_eq!(table.apply(0), 0);
        assert_eq!(table.apply(255), 255);
        // The perceptual curve darkens mid-tones considerably.
        assert!(table.apply(128) < 64);
    }

    #[test]
    fn test_generated_tables_follow_power_law() {
        for gamma in [0.5, 1.8, 2.2, 2.8, 4.0] {
            let table = GammaTable::from_exponent(gamma);
            assert!(table.is_monotonic(), "Gamma {gamma} table must be monotonic");
            assert_eq!(table.apply(0), 0);
            assert_eq!(table.apply(255), 255);
            for i in 0..=255u8 {
                let exact = (i as f64 / 255.0).powf(gamma) * 255.0;
                assert_abs_diff_eq!(table.apply(i) as f64, exact, epsilon = 0.5);
            }
        }
    }

    #[test]
    fn test_status_descriptions() {
        assert_eq!(describe(status::SUCCESS), "Success");
        assert_eq!(describe(-5), "mmap() failed");
        assert_eq!(describe(-11), "Selected GPIO not possible");
        assert_eq!(describe(status::ERROR_SPI_TRANSFER), "SPI transfer error");
        assert_eq!(describe(-999), "Unknown");
        assert_eq!(describe(1), "Unknown");
    }

    #[test]
    fn test_every_known_code_has_a_description() {
        for code in status::ERROR_SPI_TRANSFER..=status::SUCCESS {
            let status = Status::from_code(code);
            assert!(!matches!(status, Status::Unknown(_)), "Code {code} unmapped");
            assert_eq!(status.code(), code);
            assert_ne!(status.description(), "Unknown");
        }
        assert_eq!(Status::from_code(-15), Status::Unknown(-15));
        assert_eq!(Status::from_code(-15).code(), -15);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(Status::from_code(-10).to_string(), "-10 (DMA error)");
        assert!(Status::from_code(0).is_success());
        assert!(!Status::from_code(-1).is_success());
    }

    #[test]
    fn test_strip_codes() {
        // Format: (strip type, engine code, bytes per LED)
        let test_cases = [
            (StripType::Rgb, strip::WS2811_STRIP_RGB, 3),
            (StripType::Grb, strip::WS2811_STRIP_GRB, 3),
            (StripType::Bgr, strip::WS2811_STRIP_BGR, 3),
            (StripType::Rgbw, strip::SK6812_STRIP_RGBW, 4),
            (StripType::Grbw, strip::SK6812_STRIP_GRBW, 4),
        ];
        for (strip_type, code, bytes) in test_cases {
            assert_eq!(strip_type.code(), code);
            assert_eq!(StripType::from_code(code), strip_type);
            assert_eq!(strip_type.bytes_per_led(), bytes);
        }
        assert_eq!(StripType::WS2812, StripType::Grb);
        assert_eq!(StripType::SK6812, StripType::Grb);
        assert_eq!(StripType::SK6812W, StripType::Grbw);
        assert_eq!(StripType::default(), StripType::WS2812);
    }

    #[test]
    fn test_unknown_strip_code_is_kept() {
        let code = 0x0001_0203;
        let strip_type = StripType::from_code(code);
        assert_eq!(strip_type, StripType::Custom(code));
        assert_eq!(strip_type.code(), code);
    }

    #[test]
    fn test_shifts_from_code() {
        // GRB: green goes out first
        let shifts = ChannelShifts::from_code(strip::WS2811_STRIP_GRB);
        assert_eq!((shifts.r, shifts.g, shifts.b), (8, 16, 0));
        assert_eq!(shifts.in_order()[0], 8);

        let shifts = ChannelShifts::from_code(strip::SK6812_STRIP_RGBW);
        assert_eq!(shifts.w, 24);
        assert_eq!(shifts.in_order(), [16, 8, 0, 24]);
    }
}
