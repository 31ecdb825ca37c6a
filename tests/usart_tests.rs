//! USART Configuration Tests
//!
//! Lifecycle, framing configuration, and baud-divisor programming against
//! the simulated register bus.

use rcu_firmware::usart::registers::{bits, Register};
use rcu_firmware::usart::sim::SimBus;
use rcu_firmware::usart::wait::BoundedSpin;
use rcu_firmware::usart::{ConfigError, Mode, Parity, StopBits, Usart, UsartConfig};

fn usart() -> Usart<SimBus, BoundedSpin> {
    Usart::new(SimBus::new(), BoundedSpin::new(1_000))
}

// ============================================================================
// Configuration Validation Tests
// ============================================================================

#[test]
fn test_default_config_accepted() {
    let mut usart = usart();
    assert!(usart.init(&UsartConfig::default()).is_ok());
}

#[test]
fn test_all_valid_frame_widths_accepted() {
    for frame_bits in 5..=9 {
        let mut usart = usart();
        let config = UsartConfig {
            frame_bits,
            ..UsartConfig::default()
        };
        assert!(usart.init(&config).is_ok(), "width {frame_bits} rejected");
    }
}

#[test]
fn test_frame_width_below_range_rejected() {
    let mut usart = usart();
    let config = UsartConfig {
        frame_bits: 4,
        ..UsartConfig::default()
    };
    assert_eq!(usart.init(&config), Err(ConfigError::InvalidFrameBits(4)));
}

#[test]
fn test_frame_width_above_range_rejected() {
    let mut usart = usart();
    let config = UsartConfig {
        frame_bits: 10,
        ..UsartConfig::default()
    };
    assert_eq!(usart.init(&config), Err(ConfigError::InvalidFrameBits(10)));
}

// ============================================================================
// Framing Register Programming Tests
// ============================================================================

#[test]
fn test_init_programs_eight_bit_frame() {
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();

    let control_c = usart.bus().peek(Register::ControlC);
    assert_ne!(control_c & (1 << bits::REG_SELECT), 0);
    assert_eq!((control_c >> bits::FRAME_SIZE0) & 0x03, 3); // 8 data bits
    assert_eq!(
        usart.bus().peek(Register::ControlB) & (1 << bits::FRAME_SIZE_HIGH),
        0
    );
}

#[test]
fn test_init_programs_nine_bit_frame() {
    let mut usart = usart();
    let config = UsartConfig {
        frame_bits: 9,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    assert_ne!(
        usart.bus().peek(Register::ControlB) & (1 << bits::FRAME_SIZE_HIGH),
        0
    );
    assert_eq!(
        (usart.bus().peek(Register::ControlC) >> bits::FRAME_SIZE0) & 0x03,
        3
    );
}

#[test]
fn test_init_synchronous_mode_select() {
    let mut usart = usart();
    let config = UsartConfig {
        mode: Mode::Synchronous,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    let control_c = usart.bus().peek(Register::ControlC);
    assert_ne!(control_c & (1 << bits::MODE_SELECT), 0);
    assert_ne!(control_c & (1 << bits::REG_SELECT), 0);
}

#[test]
fn test_init_double_speed_flag() {
    let mut usart = usart();
    let config = UsartConfig {
        double_speed: true,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    assert_ne!(
        usart.bus().peek(Register::ControlA) & (1 << bits::DOUBLE_SPEED),
        0
    );
}

#[test]
fn test_init_parity_and_stop_fields_written_together() {
    let mut usart = usart();
    let config = UsartConfig {
        parity: Parity::Even,
        stop_bits: StopBits::Two,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    let control_c = usart.bus().peek(Register::ControlC);
    assert_eq!((control_c >> bits::PARITY_MODE0) & 0x03, 2); // even
    assert_ne!(control_c & (1 << bits::STOP_SELECT), 0); // two stop bits
}

#[test]
fn test_init_no_parity_leaves_stop_field_untouched() {
    // With parity disabled the stop-bit field is not written either; the
    // hardware default stands even when two stop bits were requested.
    let mut usart = usart();
    let config = UsartConfig {
        parity: Parity::None,
        stop_bits: StopBits::Two,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    assert_eq!(
        usart.bus().peek(Register::ControlC) & (1 << bits::STOP_SELECT),
        0
    );
}

#[test]
fn test_init_odd_parity_field() {
    let mut usart = usart();
    let config = UsartConfig {
        parity: Parity::Odd,
        stop_bits: StopBits::One,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();

    let control_c = usart.bus().peek(Register::ControlC);
    assert_eq!((control_c >> bits::PARITY_MODE0) & 0x03, 3); // odd
    assert_eq!(control_c & (1 << bits::STOP_SELECT), 0); // one stop bit
}

// ============================================================================
// Baud Divisor Tests
// ============================================================================

#[test]
fn test_divisor_asynchronous_normal_speed() {
    // 12 MHz / (16 * 38400) = 19.53 -> divisor 18
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();
    usart.set_baud_rate(38_400);

    assert_eq!(usart.bus().peek(Register::BaudHigh), 0);
    assert_eq!(usart.bus().peek(Register::BaudLow), 18);
}

#[test]
fn test_divisor_asynchronous_double_speed() {
    // 12 MHz / (8 * 38400) = 39.06 -> divisor 38
    let mut usart = usart();
    let config = UsartConfig {
        double_speed: true,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();
    usart.set_baud_rate(38_400);

    assert_eq!(usart.bus().peek(Register::BaudHigh), 0);
    assert_eq!(usart.bus().peek(Register::BaudLow), 38);
}

#[test]
fn test_divisor_synchronous() {
    // 12 MHz / (2 * 38400) = 156.25 -> divisor 155
    let mut usart = usart();
    let config = UsartConfig {
        mode: Mode::Synchronous,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();
    usart.set_baud_rate(38_400);

    assert_eq!(usart.bus().peek(Register::BaudHigh), 0);
    assert_eq!(usart.bus().peek(Register::BaudLow), 155);
}

#[test]
fn test_divisor_synchronous_ignores_speed_flag() {
    let mut usart = usart();
    let config = UsartConfig {
        mode: Mode::Synchronous,
        double_speed: true,
        ..UsartConfig::default()
    };
    usart.init(&config).unwrap();
    usart.set_baud_rate(38_400);

    assert_eq!(usart.bus().peek(Register::BaudLow), 155);
}

#[test]
fn test_divisor_spans_both_bytes() {
    // 12 MHz / (16 * 2400) = 312.5 -> divisor 311 = 0x0137
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();
    usart.set_baud_rate(2_400);

    assert_eq!(usart.bus().peek(Register::BaudHigh), 0x01);
    assert_eq!(usart.bus().peek(Register::BaudLow), 0x37);
}

#[test]
fn test_set_baud_rate_disables_both_paths() {
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();
    usart.enable();
    usart.set_baud_rate(38_400);

    let control_b = usart.bus().peek(Register::ControlB);
    assert_eq!(control_b & (1 << bits::TX_ENABLE), 0);
    assert_eq!(control_b & (1 << bits::RX_ENABLE), 0);
}

// ============================================================================
// Enable Tests
// ============================================================================

#[test]
fn test_enable_sets_both_paths() {
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();
    usart.set_baud_rate(38_400);
    usart.enable();

    let control_b = usart.bus().peek(Register::ControlB);
    assert_ne!(control_b & (1 << bits::TX_ENABLE), 0);
    assert_ne!(control_b & (1 << bits::RX_ENABLE), 0);
}

#[test]
fn test_enable_is_idempotent() {
    let mut usart = usart();
    usart.init(&UsartConfig::default()).unwrap();
    usart.set_baud_rate(38_400);

    usart.enable();
    let after_first = usart.bus().peek(Register::ControlB);
    usart.enable();
    let after_second = usart.bus().peek(Register::ControlB);

    assert_eq!(after_first, after_second);
    assert_ne!(after_second & (1 << bits::TX_ENABLE), 0);
    assert_ne!(after_second & (1 << bits::RX_ENABLE), 0);
}
