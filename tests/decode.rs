//! Decoding tests on literal register frames.

use max318xx::{
    AdcCode, ChannelReading, ChipSelect, CodeLayout, Config, ConfigError, DecodeError,
    DeviceProfile, MathError, RtdCurve, SensorType, classify, decode, fault,
};

fn rtd_profile(reference_ohms: f32) -> DeviceProfile {
    Config::new(SensorType::Rtd, ChipSelect::Ce0)
        .reference_resistance(reference_ohms)
        .profile()
        .unwrap()
}

fn full_range_profile(reference_ohms: f32) -> DeviceProfile {
    Config::new(SensorType::Rtd, ChipSelect::Ce0)
        .reference_resistance(reference_ohms)
        .rtd_curve(RtdCurve::FullRange)
        .profile()
        .unwrap()
}

fn thermocouple_profile() -> DeviceProfile {
    Config::new(SensorType::Thermocouple, ChipSelect::Ce0)
        .profile()
        .unwrap()
}

fn rtd_frame(code: u16, status: u8) -> [u8; 8] {
    let [msb, lsb] = (code << 1).to_be_bytes();
    [0x80, msb, lsb, 0xFF, 0xFF, 0x00, 0x00, status]
}

#[test]
fn extracts_every_rtd_code() {
    let layout = CodeLayout::RTD.at(0);
    for raw in 0..=u16::MAX {
        let bytes = raw.to_be_bytes();
        let expected = i32::from(((u16::from(bytes[0]) << 8) | u16::from(bytes[1])) >> 1);
        assert_eq!(layout.extract(&bytes), Some(AdcCode::new(expected)));
    }
}

#[test]
fn extracts_every_cold_junction_code() {
    for raw in 0..=u16::MAX {
        let shifted = i32::from(raw >> 2);
        let expected = if shifted & 0x2000 != 0 {
            (shifted - 0x4000) as f32 * 0.015_625
        } else {
            shifted as f32 * 0.015_625
        };

        let code = CodeLayout::COLD_JUNCTION.extract(&raw.to_be_bytes()).unwrap();
        assert_eq!(code.value() as f32 * 0.015_625, expected, "raw 0x{raw:04X}");
    }
}

#[test]
fn extracts_known_cold_junction_values() {
    let positive = CodeLayout::COLD_JUNCTION.extract(&[0x40, 0x00]).unwrap();
    assert_eq!(positive.value(), 0x1000);
    assert_eq!(positive.value() as f32 * 0.015_625, 64.0);

    let negative = CodeLayout::COLD_JUNCTION.extract(&[0x80, 0x00]).unwrap();
    assert_eq!(negative.value(), -0x2000);
    assert_eq!(negative.value() as f32 * 0.015_625, -128.0);
}

#[test]
fn extracts_signed_thermocouple_codes() {
    let frame = [0, 0, 0x06, 0x40, 0x00];
    assert_eq!(CodeLayout::THERMOCOUPLE.extract(&frame).unwrap().value(), 12800);

    let frame = [0, 0, 0xFF, 0x60, 0x00];
    assert_eq!(CodeLayout::THERMOCOUPLE.extract(&frame).unwrap().value(), -1280);

    let frame = [0, 0, 0x80, 0x00, 0x00];
    assert_eq!(CodeLayout::THERMOCOUPLE.extract(&frame).unwrap().value(), -0x40000);
}

#[test]
fn extract_rejects_short_input() {
    assert_eq!(CodeLayout::THERMOCOUPLE.extract(&[0x00, 0x00, 0x01]), None);
}

#[test]
fn zero_status_has_no_faults() {
    assert!(classify(0x00, &fault::rtd::TABLE).is_empty());
    assert!(classify(0x00, &fault::thermocouple::TABLE).is_empty());
}

#[test]
fn reports_both_threshold_faults() {
    let faults = classify(0xC0, &fault::rtd::TABLE);
    assert_eq!(faults.len(), 2);
    assert_eq!(
        faults.names().collect::<Vec<_>>(),
        ["High threshold", "Low threshold"]
    );
}

#[test]
fn reports_open_circuit_alone() {
    let faults = fault::thermocouple::TABLE.classify(0x01);
    assert_eq!(faults.names().collect::<Vec<_>>(), ["Open circuit"]);
    assert!(faults.contains(fault::thermocouple::OPEN_CIRCUIT));
}

#[test]
fn reports_every_thermocouple_bit() {
    let faults = classify(0xFF, &fault::thermocouple::TABLE);
    assert_eq!(faults.len(), 8);
    assert_eq!(faults.bits(), 0xFF);
}

#[test]
fn ignores_bits_without_entry() {
    let faults = classify(0x03, &fault::rtd::TABLE);
    assert!(faults.is_empty());
    assert_eq!(fault::rtd::TABLE.name(0x04), Some("Under/Over voltage"));
}

#[test]
fn decodes_rtd_boiling_point() {
    let reading = decode(&rtd_frame(11346, 0x00), &rtd_profile(400.0)).unwrap();
    let celsius = reading.celsius().unwrap();
    assert!((celsius - 100.0).abs() < 0.1, "{celsius}");
}

#[test]
fn falls_back_to_straight_line_below_zero() {
    let reading = decode(&rtd_frame(7000, 0x00), &rtd_profile(400.0)).unwrap();
    assert_eq!(reading.celsius(), Some(7000.0 / 32.0 - 256.0));
}

#[test]
fn full_range_curve_solves_below_zero() {
    // 4936 / 32768 * 400 Ω = 60.25 Ω, about -100 °C
    let profile = Config::new(SensorType::Rtd3Wire, ChipSelect::Ce0)
        .reference_resistance(400.0)
        .profile()
        .unwrap();
    let celsius = decode(&rtd_frame(4936, 0x00), &profile)
        .unwrap()
        .celsius()
        .unwrap();
    assert!((celsius + 100.0).abs() < 0.05, "{celsius}");
}

#[test]
fn curve_override_applies() {
    let profile = Config::new(SensorType::Rtd3Wire, ChipSelect::Ce0)
        .reference_resistance(400.0)
        .rtd_curve(RtdCurve::Quadratic)
        .profile()
        .unwrap();
    let reading = decode(&rtd_frame(4936, 0x00), &profile).unwrap();
    assert_eq!(reading.celsius(), Some(4936.0 / 32.0 - 256.0));
}

#[test]
fn default_rtd_is_continuous_across_zero() {
    let profile = Config::new(SensorType::Rtd, ChipSelect::Ce0).profile().unwrap();

    // 400 Ω reference: R0 = 100 Ω sits at code 8192
    let mut previous = None;
    for code in [8194, 8193, 8192, 8191, 8190] {
        let celsius = decode(&rtd_frame(code, 0x00), &profile)
            .unwrap()
            .celsius()
            .unwrap();
        assert!(celsius.abs() < 1.1, "code {code} -> {celsius}");
        if let Some(previous) = previous {
            assert!(celsius <= previous, "code {code} -> {celsius}");
            assert!(previous - celsius < 0.1, "jump {previous} -> {celsius}");
        }
        previous = Some(celsius);
    }

    let below = decode(&rtd_frame(8160, 0x00), &profile).unwrap();
    assert_eq!(below.celsius(), Some(-1.0));
}

#[test]
fn quadratic_curve_requires_fallback_reference() {
    let config = Config::new(SensorType::Rtd, ChipSelect::Ce0).reference_resistance(430.0);
    assert_eq!(config.profile(), Err(ConfigError::UnsupportedReference));

    let pt1000 = Config::new(SensorType::Rtd, ChipSelect::Ce0).nominal_resistance(1000.0);
    assert_eq!(pt1000.profile(), Err(ConfigError::UnsupportedReference));

    let full_range = config.rtd_curve(RtdCurve::FullRange).profile().unwrap();
    let celsius = decode(&rtd_frame(7620, 0x00), &full_range)
        .unwrap()
        .celsius()
        .unwrap();
    assert!(celsius.abs() < 0.1, "{celsius}");
}

#[test]
fn negative_discriminant_is_an_error() {
    let result = decode(&rtd_frame(0x7FFF, 0x00), &full_range_profile(4300.0));
    assert_eq!(
        result,
        Err(DecodeError::Math(MathError::NegativeDiscriminant))
    );
}

#[test]
fn non_fatal_fault_keeps_value() {
    let reading = decode(&rtd_frame(11346, 0x80), &rtd_profile(400.0)).unwrap();
    assert!(reading.celsius().is_some());
    assert!(reading.faults().contains_name("High threshold"));
}

#[test]
fn fatal_fault_drops_value() {
    let reading = decode(&rtd_frame(0x7FFF, 0x04), &full_range_profile(4300.0)).unwrap();
    assert_eq!(reading.primary(), ChannelReading::Faulted);
    assert_eq!(reading.faults().len(), 1);
}

#[test]
fn over_voltage_faults_both_thermocouple_channels() {
    let frame = [0x19, 0x00, 0x06, 0x40, 0x00, fault::thermocouple::OVER_UNDER_VOLTAGE];
    let reading = decode(&frame, &thermocouple_profile()).unwrap();
    assert_eq!(reading.primary(), ChannelReading::Faulted);
    assert_eq!(reading.cold_junction(), Some(ChannelReading::Faulted));
}

#[test]
fn cold_junction_range_keeps_thermocouple() {
    let frame = [0x19, 0x00, 0x06, 0x40, 0x00, fault::thermocouple::CJ_RANGE];
    let reading = decode(&frame, &thermocouple_profile()).unwrap();
    assert_eq!(reading.celsius(), Some(100.0));
    assert_eq!(reading.cold_junction_celsius(), None);
}

#[test]
fn decoding_is_repeatable() {
    let profile = thermocouple_profile();
    let frame = [0xFF, 0x00, 0xFF, 0x60, 0x00, 0x0C];
    let first = decode(&frame, &profile).unwrap();
    for _ in 0..10 {
        assert_eq!(decode(&frame, &profile).unwrap(), first);
    }
}

#[test]
fn rejects_wrong_frame_length() {
    assert_eq!(
        decode(&[0u8; 6], &rtd_profile(400.0)),
        Err(DecodeError::FrameLength {
            expected: 8,
            actual: 6
        })
    );
}

#[test]
fn rejects_unknown_sensor_type() {
    assert_eq!(
        Config::from_raw(3, 0),
        Err(ConfigError::UnknownSensorType(3))
    );
}

#[test]
fn rejects_unknown_chip_select() {
    assert_eq!(
        Config::from_raw(0, 2),
        Err(ConfigError::UnknownChipSelect(2))
    );
}

#[test]
fn accepts_known_raw_codes() {
    let config = Config::from_raw(2, 1).unwrap();
    assert_eq!(config.sensor(), SensorType::Thermocouple);
    assert_eq!(config.chip_select(), ChipSelect::Ce1);
    assert_eq!(u8::from(config.chip_select()), 1);
}

#[test]
fn rejects_invalid_reference() {
    for ohms in [0.0, -430.0, f32::NAN, f32::INFINITY] {
        let config = Config::new(SensorType::Rtd, ChipSelect::Ce0).reference_resistance(ohms);
        assert_eq!(config.profile(), Err(ConfigError::InvalidResistance));
    }
}

#[test]
fn profiles_describe_their_commands() {
    let rtd = Config::new(SensorType::Rtd, ChipSelect::Ce0).profile().unwrap();
    assert_eq!(rtd.frame_len(), 8);
    assert_eq!(rtd.conversion_command(), &[0x80, 0xA0]);
    assert_eq!(rtd.init_command(), &[0x80, 0x82]);
    assert!(rtd.secondary().is_none());

    let tc = thermocouple_profile();
    assert_eq!(tc.read_address(), 0x0A);
    assert_eq!(tc.conversion_command(), &[0x80, 0x54, 0x03]);
    assert_eq!(tc.clear_faults_command(), &[0x80, 0x16, 0x03]);
    assert_eq!(tc.init_command(), &[0x80, 0x16, 0x03]);

    // CR0 FAULT (bit 2) selects interrupt mode, FAULTCLR (bit 1) only acts there
    let clear = tc.clear_faults_command()[1];
    assert_ne!(clear & 0x04, 0);
    assert_ne!(clear & 0x02, 0);
    assert_ne!(tc.conversion_command()[1] & 0x04, 0);
    assert!(tc.secondary().is_some());
}
