//! Companion-link command protocol
//!
//! The Android companion app sends short ASCII words terminated by a `#`
//! sentinel. [`Command::parse`] maps one delimiter-stripped word to an
//! action; [`CommandParser`] is the byte-fed variant for callers that tap
//! the stream directly instead of going through the transport's line read.

use heapless::Vec;

use crate::usart::{LINE_DELIMITER, MAX_LINE_LEN};

/// One recognized command from the companion app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reply with the scaled battery voltage.
    ReadVoltage,
    /// Reply with the scaled motor speed.
    ReadSpeed,
    /// Engage the forward power relay.
    MotorForward,
    /// Engage reverse: direction relays first, then power.
    MotorReverse,
    /// Brake: engage the brake relay, drop power, release.
    MotorBrake,
    /// Toggle the low-beam headlights.
    LowBeams,
    /// Toggle the high-beam headlights.
    HighBeams,
    /// Toggle the right turn signals.
    RightSignal,
    /// Toggle the left turn signals.
    LeftSignal,
    /// Toggle the hazard signals.
    Hazard,
    /// Toggle the roof actuator, lowering direction.
    RoofLower,
    /// Toggle the roof actuator, raising direction.
    RoofRaise,
    /// Set the throttle output from the app's slider position.
    Throttle(u8),
    /// Unrecognized word; ignored by the dispatch loop.
    Unknown,
}

impl Command {
    /// Parse one delimiter-stripped command word.
    ///
    /// A word of decimal digits is a throttle position; values above 255
    /// wrap to their low byte. Anything else unrecognized is
    /// [`Command::Unknown`].
    #[must_use]
    pub fn parse(word: &[u8]) -> Self {
        let Ok(text) = core::str::from_utf8(word) else {
            return Self::Unknown;
        };

        match text {
            "Voltage" => Self::ReadVoltage,
            "RPM" => Self::ReadSpeed,
            "one" => Self::MotorForward,
            "two" => Self::MotorReverse,
            "three" => Self::MotorBrake,
            "four" => Self::LowBeams,
            "five" => Self::HighBeams,
            "six" => Self::RightSignal,
            "seven" => Self::LeftSignal,
            "eight" => Self::Hazard,
            "nine" => Self::RoofLower,
            "ten" => Self::RoofRaise,
            _ => match text.parse::<u32>() {
                Ok(position) => Self::Throttle(position as u8),
                Err(_) => Self::Unknown,
            },
        }
    }

    /// True for the commands answered with a telemetry reply.
    #[must_use]
    pub const fn is_telemetry(self) -> bool {
        matches!(self, Self::ReadVoltage | Self::ReadSpeed)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ReadVoltage => defmt::write!(f, "ReadVoltage"),
            Self::ReadSpeed => defmt::write!(f, "ReadSpeed"),
            Self::MotorForward => defmt::write!(f, "MotorForward"),
            Self::MotorReverse => defmt::write!(f, "MotorReverse"),
            Self::MotorBrake => defmt::write!(f, "MotorBrake"),
            Self::Throttle(position) => defmt::write!(f, "Throttle({})", position),
            Self::Unknown => defmt::write!(f, "Unknown"),
            _ => defmt::write!(f, "Toggle(...)"),
        }
    }
}

/// Byte-fed command parser.
pub struct CommandParser {
    buffer: Vec<u8, MAX_LINE_LEN>,
    discarding: bool,
}

impl CommandParser {
    /// Create an empty parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feed one byte; returns a command when the delimiter arrives.
    ///
    /// A word longer than [`MAX_LINE_LEN`] is dropped through its closing
    /// delimiter and reported as [`Command::Unknown`]; the word after it
    /// parses normally.
    pub fn feed(&mut self, byte: u8) -> Option<Command> {
        if byte == LINE_DELIMITER {
            let command = if self.discarding {
                Command::Unknown
            } else {
                Command::parse(&self.buffer)
            };
            self.buffer.clear();
            self.discarding = false;
            return Some(command);
        }

        if !self.discarding && self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
        }
        None
    }

    /// Discard any partially accumulated word.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}
