//! Analog input capability
//!
//! The dispatch loop only ever needs "read a 10-bit sample from a named
//! channel"; converter internals (reference selection, prescaler, result
//! adjustment) stay behind this seam. The firmware binary binds it to the
//! on-chip converter, tests bind it to fakes.

/// Analog channels wired on the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdcChannel {
    /// Battery voltage, through the divider.
    Battery,
    /// Motor speed sensor.
    MotorSpeed,
}

impl AdcChannel {
    /// Converter mux index for this channel.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Battery => 0,
            Self::MotorSpeed => 1,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AdcChannel {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Battery => defmt::write!(f, "battery"),
            Self::MotorSpeed => defmt::write!(f, "motor-speed"),
        }
    }
}

/// Blocking single-sample read of an analog channel.
pub trait AdcReader {
    /// Sample `channel`, returning the raw right-adjusted 10-bit value.
    fn read(&mut self, channel: AdcChannel) -> u16;
}
