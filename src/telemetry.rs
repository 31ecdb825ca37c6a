//! Telemetry readings and reply formatting
//!
//! Battery voltage and motor speed arrive as raw 10-bit ADC samples and go
//! back to the companion app as fixed-point ASCII: two decimals, whole part
//! right-aligned to three characters (six characters total for in-range
//! values). Replies carry no trailing delimiter; only the receive direction
//! of the link is sentinel-framed.

use core::fmt::Write as _;

use heapless::String;
#[cfg(not(feature = "std"))]
use micromath::F32Ext;

use crate::config::{ADC_FULL_SCALE, BATTERY_FULL_SCALE_VOLTS, MOTOR_FULL_SCALE_RPM};

/// Capacity of a formatted telemetry reply.
pub const REPLY_LEN: usize = 8;

/// Battery voltage reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatteryVoltage {
    raw: u16,
}

impl BatteryVoltage {
    /// Create from a raw ADC sample. Values above full scale are clamped.
    #[must_use]
    pub fn from_adc(raw: u16) -> Self {
        Self {
            raw: raw.min(ADC_FULL_SCALE),
        }
    }

    /// Voltage in volts, after the divider scaling.
    #[must_use]
    pub fn volts(self) -> f32 {
        (f32::from(self.raw) / f32::from(ADC_FULL_SCALE)) * BATTERY_FULL_SCALE_VOLTS
    }

    /// Formatted reply for the companion app.
    #[must_use]
    pub fn reply(self) -> String<REPLY_LEN> {
        format_fixed(self.volts())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BatteryVoltage {
    fn format(&self, f: defmt::Formatter) {
        let v = self.volts();
        let whole = v as u32;
        let frac = ((v - whole as f32) * 100.0) as u32;
        defmt::write!(f, "{}.{:02}V", whole, frac);
    }
}

/// Motor speed reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotorSpeed {
    raw: u16,
}

impl MotorSpeed {
    /// Create from a raw ADC sample. Values above full scale are clamped.
    #[must_use]
    pub fn from_adc(raw: u16) -> Self {
        Self {
            raw: raw.min(ADC_FULL_SCALE),
        }
    }

    /// Speed in RPM.
    #[must_use]
    pub fn rpm(self) -> f32 {
        (f32::from(self.raw) / f32::from(ADC_FULL_SCALE)) * MOTOR_FULL_SCALE_RPM
    }

    /// Formatted reply for the companion app.
    #[must_use]
    pub fn reply(self) -> String<REPLY_LEN> {
        format_fixed(self.rpm())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotorSpeed {
    fn format(&self, f: defmt::Formatter) {
        let rpm = self.rpm();
        let whole = rpm as u32;
        let frac = ((rpm - whole as f32) * 10.0) as u32;
        defmt::write!(f, "{}.{} RPM", whole, frac);
    }
}

/// Format a non-negative value with two decimals and the whole part
/// right-aligned to three characters, e.g. `" 29.97"` or `"4900.00"`.
///
/// Done by integer splitting rather than float `Display` to keep the float
/// formatting machinery out of the firmware image.
#[must_use]
pub fn format_fixed(value: f32) -> String<REPLY_LEN> {
    let centi = (value * 100.0).round() as u32;
    let whole = centi / 100;
    let frac = centi % 100;

    let mut out = String::new();
    // Capacity covers the full sensor ranges, so this write cannot fail.
    let _ = write!(out, "{whole:>3}.{frac:02}");
    out
}
