//! Vehicle output state
//!
//! Relay bank, roof actuator, and throttle ladder behind a narrow output
//! capability. Lighting features latch an on/off state and toggle on each
//! command; the motor actions are relay sequences with settle delays so the
//! direction contacts are never switched under load.

use embedded_hal::delay::DelayNs;

use crate::config::{
    aux, relays, BRAKE_ENGAGE_DELAY_MS, BRAKE_HOLD_DELAY_MS, REVERSE_ENGAGE_DELAY_MS,
    THROTTLE_MAX,
};
use crate::protocol::Command;

/// Output ports wired on the unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    /// Relay bank: motor relays and lighting.
    Relays,
    /// Auxiliary bank: roof actuator.
    Auxiliary,
    /// Resistor-ladder DAC driving the throttle.
    Throttle,
}

/// Masked digital output capability.
pub trait OutputBus {
    /// Drive the masked bits of `port` high.
    fn set_bits(&mut self, port: Port, mask: u8);

    /// Drive the masked bits of `port` low.
    fn clear_bits(&mut self, port: Port, mask: u8);

    /// Replace the whole output byte of `port`.
    fn write(&mut self, port: Port, value: u8);
}

/// Latched vehicle outputs.
pub struct Vehicle<O, D> {
    outputs: O,
    delay: D,
    low_beams: bool,
    high_beams: bool,
    right_signal: bool,
    left_signal: bool,
    hazard: bool,
    roof_lowering: bool,
    roof_raising: bool,
}

impl<O: OutputBus, D: DelayNs> Vehicle<O, D> {
    /// Create with every feature off.
    pub fn new(outputs: O, delay: D) -> Self {
        Self {
            outputs,
            delay,
            low_beams: false,
            high_beams: false,
            right_signal: false,
            left_signal: false,
            hazard: false,
            roof_lowering: false,
            roof_raising: false,
        }
    }

    /// Apply one command to the outputs. Telemetry and unknown commands are
    /// no-ops here; the dispatch loop answers those itself.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MotorForward => self.motor_forward(),
            Command::MotorReverse => self.motor_reverse(),
            Command::MotorBrake => self.motor_brake(),
            Command::LowBeams => {
                self.low_beams =
                    toggled(&mut self.outputs, Port::Relays, relays::LOW_BEAMS, self.low_beams);
            }
            Command::HighBeams => {
                self.high_beams =
                    toggled(&mut self.outputs, Port::Relays, relays::HIGH_BEAMS, self.high_beams);
            }
            Command::RightSignal => {
                self.right_signal = toggled(
                    &mut self.outputs,
                    Port::Relays,
                    relays::RIGHT_SIGNAL,
                    self.right_signal,
                );
            }
            Command::LeftSignal => {
                self.left_signal = toggled(
                    &mut self.outputs,
                    Port::Relays,
                    relays::LEFT_SIGNAL,
                    self.left_signal,
                );
            }
            Command::Hazard => {
                self.hazard = toggled(&mut self.outputs, Port::Relays, relays::HAZARD, self.hazard);
            }
            Command::RoofLower => {
                self.roof_lowering = toggled(
                    &mut self.outputs,
                    Port::Auxiliary,
                    aux::ROOF_LOWER,
                    self.roof_lowering,
                );
            }
            Command::RoofRaise => {
                self.roof_raising = toggled(
                    &mut self.outputs,
                    Port::Auxiliary,
                    aux::ROOF_RAISE,
                    self.roof_raising,
                );
            }
            Command::Throttle(position) => self.set_throttle(position),
            Command::ReadVoltage | Command::ReadSpeed | Command::Unknown => {}
        }
    }

    /// Engage the forward power relay.
    pub fn motor_forward(&mut self) {
        self.outputs.set_bits(Port::Relays, relays::FORWARD);
    }

    /// Engage reverse: direction relays first, settle, then power.
    pub fn motor_reverse(&mut self) {
        self.outputs.set_bits(Port::Relays, relays::REVERSE);
        self.delay.delay_ms(REVERSE_ENGAGE_DELAY_MS);
        self.outputs.set_bits(Port::Relays, relays::FORWARD);
    }

    /// Brake: engage the brake relay, settle, drop motor power, hold,
    /// release the brake.
    pub fn motor_brake(&mut self) {
        self.outputs.set_bits(Port::Relays, relays::BRAKE);
        self.delay.delay_ms(BRAKE_ENGAGE_DELAY_MS);
        self.outputs
            .clear_bits(Port::Relays, relays::FORWARD | relays::REVERSE);
        self.delay.delay_ms(BRAKE_HOLD_DELAY_MS);
        self.outputs.clear_bits(Port::Relays, relays::BRAKE);
    }

    /// Drive the throttle ladder. The DAC network is inverted: full slider
    /// deflection writes zero.
    pub fn set_throttle(&mut self, position: u8) {
        self.outputs.write(Port::Throttle, THROTTLE_MAX - position);
    }

    /// Low-beam latch state.
    #[must_use]
    pub const fn low_beams(&self) -> bool {
        self.low_beams
    }

    /// High-beam latch state.
    #[must_use]
    pub const fn high_beams(&self) -> bool {
        self.high_beams
    }

    /// Right-signal latch state.
    #[must_use]
    pub const fn right_signal(&self) -> bool {
        self.right_signal
    }

    /// Left-signal latch state.
    #[must_use]
    pub const fn left_signal(&self) -> bool {
        self.left_signal
    }

    /// Hazard latch state.
    #[must_use]
    pub const fn hazard(&self) -> bool {
        self.hazard
    }

    /// Roof lowering latch state.
    #[must_use]
    pub const fn roof_lowering(&self) -> bool {
        self.roof_lowering
    }

    /// Roof raising latch state.
    #[must_use]
    pub const fn roof_raising(&self) -> bool {
        self.roof_raising
    }

    /// Borrow the underlying output bus.
    pub fn outputs(&self) -> &O {
        &self.outputs
    }
}

fn toggled<O: OutputBus>(outputs: &mut O, port: Port, mask: u8, was_on: bool) -> bool {
    if was_on {
        outputs.clear_bits(port, mask);
    } else {
        outputs.set_bits(port, mask);
    }
    !was_on
}
