//! Wire Framing Tests
//!
//! Byte- and line-level transmit/receive behavior: 8- and 9-bit round
//! trips, sentinel framing, truncation reporting, faults, and timeouts.

use rcu_firmware::usart::sim::SimBus;
use rcu_firmware::usart::wait::BoundedSpin;
use rcu_firmware::usart::{LineFault, Usart, UsartConfig, UsartError};

fn loopback_usart(config: &UsartConfig) -> Usart<SimBus, BoundedSpin> {
    let mut usart = Usart::new(SimBus::loopback(), BoundedSpin::new(1_000));
    usart.init(config).unwrap();
    usart.set_baud_rate(38_400);
    usart.enable();
    usart
}

fn capture_usart(config: &UsartConfig) -> Usart<SimBus, BoundedSpin> {
    let mut usart = Usart::new(SimBus::new(), BoundedSpin::new(1_000));
    usart.init(config).unwrap();
    usart.set_baud_rate(38_400);
    usart.enable();
    usart
}

// ============================================================================
// Byte Round-Trip Tests
// ============================================================================

#[test]
fn test_eight_bit_round_trip() {
    let mut usart = loopback_usart(&UsartConfig::default());
    usart.transmit_byte(0x41).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x41);
}

#[test]
fn test_eight_bit_round_trip_independent_of_parity() {
    use rcu_firmware::usart::{Parity, StopBits};

    let config = UsartConfig {
        parity: Parity::Odd,
        stop_bits: StopBits::Two,
        ..UsartConfig::default()
    };
    let mut usart = loopback_usart(&config);
    usart.transmit_byte(0x41).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x41);
}

#[test]
fn test_nine_bit_round_trip_high_bit_set() {
    let config = UsartConfig {
        frame_bits: 9,
        ..UsartConfig::default()
    };
    let mut usart = loopback_usart(&config);
    usart.transmit_byte(0x145).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x145);
}

#[test]
fn test_nine_bit_round_trip_high_bit_clear() {
    let config = UsartConfig {
        frame_bits: 9,
        ..UsartConfig::default()
    };
    let mut usart = loopback_usart(&config);
    usart.transmit_byte(0x041).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x041);
}

#[test]
fn test_nine_bit_survives_back_to_back_frames() {
    let config = UsartConfig {
        frame_bits: 9,
        ..UsartConfig::default()
    };
    let mut usart = loopback_usart(&config);
    usart.transmit_byte(0x145).unwrap();
    usart.transmit_byte(0x041).unwrap();
    usart.transmit_byte(0x1FF).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x145);
    assert_eq!(usart.receive_byte().unwrap(), 0x041);
    assert_eq!(usart.receive_byte().unwrap(), 0x1FF);
}

#[test]
fn test_eight_bit_mode_drops_high_bits() {
    let mut usart = loopback_usart(&UsartConfig::default());
    usart.transmit_byte(0x141).unwrap();
    assert_eq!(usart.receive_byte().unwrap(), 0x41);
}

// ============================================================================
// Line Framing Tests
// ============================================================================

#[test]
fn test_receive_line_stops_at_delimiter() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_bytes(b"RPM#");

    let line = usart.receive_line().unwrap();
    assert_eq!(line.as_str(), Some("RPM"));
    assert_eq!(line.len(), 3);
    assert!(!line.truncated());
    // The delimiter is consumed, not left on the wire.
    assert_eq!(usart.bus().rx_pending(), 0);
}

#[test]
fn test_receive_line_empty_command() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_bytes(b"#");

    let line = usart.receive_line().unwrap();
    assert!(line.is_empty());
    assert!(!line.truncated());
}

#[test]
fn test_receive_line_hard_cap_reports_truncation() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_bytes(b"ABCDEFGHIJKL");

    let line = usart.receive_line().unwrap();
    assert_eq!(line.as_str(), Some("ABCDEFGHI"));
    assert_eq!(line.len(), 9);
    assert!(line.truncated());
    // The overflow tail stays on the wire.
    assert_eq!(usart.bus().rx_pending(), 3);
}

#[test]
fn test_receive_line_exactly_at_cap() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_bytes(b"ABCDEFGHI#");

    let line = usart.receive_line().unwrap();
    assert_eq!(line.as_str(), Some("ABCDEFGHI"));
    // The cap was hit before the delimiter was seen.
    assert!(line.truncated());
    assert_eq!(usart.bus().rx_pending(), 1);
}

#[test]
fn test_transmit_line_appends_no_delimiter() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.transmit_line("OK").unwrap();

    assert_eq!(usart.bus().tx_bytes(), b"OK");
}

#[test]
fn test_transmit_line_empty_sends_nothing() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.transmit_line("").unwrap();
    assert!(usart.bus().tx_frames().is_empty());
}

// ============================================================================
// Fault and Timeout Tests
// ============================================================================

#[test]
fn test_receive_times_out_on_silent_line() {
    let mut usart = capture_usart(&UsartConfig::default());
    assert_eq!(usart.receive_byte(), Err(UsartError::Timeout));
}

#[test]
fn test_receive_line_times_out_without_delimiter() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_bytes(b"RPM");
    assert_eq!(usart.receive_line(), Err(UsartError::Timeout));
}

#[test]
fn test_framing_fault_reported() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_faulted(
        0x41,
        LineFault {
            framing: true,
            ..LineFault::default()
        },
    );

    match usart.receive_byte() {
        Err(UsartError::Fault(fault)) => {
            assert!(fault.framing);
            assert!(!fault.overrun);
            assert!(!fault.parity);
        }
        other => panic!("expected framing fault, got {other:?}"),
    }
    // The faulted frame was consumed.
    assert_eq!(usart.bus().rx_pending(), 0);
}

#[test]
fn test_clean_frame_after_fault() {
    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx_faulted(
        0x00,
        LineFault {
            overrun: true,
            ..LineFault::default()
        },
    );
    usart.bus_mut().push_rx(0x42);

    assert!(matches!(usart.receive_byte(), Err(UsartError::Fault(_))));
    assert_eq!(usart.receive_byte().unwrap(), 0x42);
}

// ============================================================================
// Ecosystem I/O Trait Tests
// ============================================================================

#[test]
fn test_embedded_io_write() {
    use embedded_io::Write;

    let mut usart = capture_usart(&UsartConfig::default());
    assert_eq!(usart.write(b"OK").unwrap(), 2);
    usart.flush().unwrap();
    assert_eq!(usart.bus().tx_bytes(), b"OK");
}

#[test]
fn test_embedded_io_read() {
    use embedded_io::Read;

    let mut usart = capture_usart(&UsartConfig::default());
    usart.bus_mut().push_rx(u16::from(b'A'));

    let mut buf = [0u8; 4];
    assert_eq!(usart.read(&mut buf).unwrap(), 1);
    assert_eq!(buf[0], b'A');
}
