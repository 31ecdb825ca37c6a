//! System configuration and hardware constants
//!
//! Compile-time constants for the remote-control unit: clocking, the
//! companion-link serial settings, sensor scaling, and the output bit map.

/// CPU clock frequency the baud divisors are derived from.
pub const CPU_CLOCK_HZ: u32 = 12_000_000;

/// Companion-link baud rate in bits/second.
pub const DEFAULT_BAUD: u32 = 38_400;

/// ADC full-scale reading (10-bit, right-adjusted).
pub const ADC_FULL_SCALE: u16 = 1023;

/// Battery voltage at ADC full scale, after the divider.
pub const BATTERY_FULL_SCALE_VOLTS: f32 = 60.0;

/// Motor speed at ADC full scale, in RPM.
pub const MOTOR_FULL_SCALE_RPM: f32 = 4900.0;

/// Settle time between engaging the reverse relays and powering the motor.
pub const REVERSE_ENGAGE_DELAY_MS: u32 = 1;

/// Settle time between engaging the brake relay and dropping motor power.
pub const BRAKE_ENGAGE_DELAY_MS: u32 = 1;

/// Hold time on the brake relay after motor power is dropped.
pub const BRAKE_HOLD_DELAY_MS: u32 = 10;

/// Full-scale throttle value from the companion app's slider.
pub const THROTTLE_MAX: u8 = 255;

/// Relay port bit assignments (the main output bank).
pub mod relays {
    /// Motor forward power relay.
    pub const FORWARD: u8 = 0x01;
    /// Motor direction-reversal relay.
    pub const REVERSE: u8 = 0x02;
    /// Motor brake relay.
    pub const BRAKE: u8 = 0x04;
    /// Low-beam headlights.
    pub const LOW_BEAMS: u8 = 0x08;
    /// High-beam headlights.
    pub const HIGH_BEAMS: u8 = 0x10;
    /// Right turn signals.
    pub const RIGHT_SIGNAL: u8 = 0x20;
    /// Left turn signals.
    pub const LEFT_SIGNAL: u8 = 0x40;
    /// Hazard (waiting) signals.
    pub const HAZARD: u8 = 0x80;
}

/// Auxiliary port bit assignments (upper bits; the serial pins share the
/// low end of this port).
pub mod aux {
    /// Roof actuator, lowering direction.
    pub const ROOF_LOWER: u8 = 0x40;
    /// Roof actuator, raising direction.
    pub const ROOF_RAISE: u8 = 0x80;
}
