//! Command dispatch
//!
//! Ties the serial transport, the command vocabulary, the vehicle outputs,
//! and the analog inputs into the unit's steady-state loop: block on a
//! command line, act on it, reply with telemetry when asked.

use crate::adc::{AdcChannel, AdcReader};
use crate::protocol::Command;
use crate::telemetry::{BatteryVoltage, MotorSpeed};
use crate::usart::registers::RegisterBus;
use crate::usart::wait::WaitStrategy;
use crate::usart::{Usart, UsartError};
use crate::vehicle::{OutputBus, Vehicle};

use embedded_hal::delay::DelayNs;

/// The remote-control unit's dispatch loop state.
pub struct RemoteControl<B, W, O, D, A> {
    usart: Usart<B, W>,
    vehicle: Vehicle<O, D>,
    adc: A,
}

impl<B, W, O, D, A> RemoteControl<B, W, O, D, A>
where
    B: RegisterBus,
    W: WaitStrategy,
    O: OutputBus,
    D: DelayNs,
    A: AdcReader,
{
    /// Assemble the unit from its configured parts. The transport must
    /// already be initialized, programmed with a baud rate, and enabled.
    pub fn new(usart: Usart<B, W>, vehicle: Vehicle<O, D>, adc: A) -> Self {
        Self {
            usart,
            vehicle,
            adc,
        }
    }

    /// Run one command cycle: receive a line, parse it, act on it.
    ///
    /// Telemetry commands sample the matching ADC channel and transmit the
    /// formatted reading; everything else goes to the vehicle outputs.
    /// Returns the command that was handled.
    pub fn poll_once(&mut self) -> Result<Command, UsartError> {
        let line = self.usart.receive_line()?;
        let command = Command::parse(line.as_bytes());

        match command {
            Command::ReadVoltage => {
                let raw = self.adc.read(AdcChannel::Battery);
                let reply = BatteryVoltage::from_adc(raw).reply();
                self.usart.transmit_line(&reply)?;
            }
            Command::ReadSpeed => {
                let raw = self.adc.read(AdcChannel::MotorSpeed);
                let reply = MotorSpeed::from_adc(raw).reply();
                self.usart.transmit_line(&reply)?;
            }
            _ => self.vehicle.apply(command),
        }

        Ok(command)
    }

    /// Borrow the transport.
    pub fn usart(&self) -> &Usart<B, W> {
        &self.usart
    }

    /// Mutably borrow the transport.
    pub fn usart_mut(&mut self) -> &mut Usart<B, W> {
        &mut self.usart
    }

    /// Borrow the vehicle output state.
    pub fn vehicle(&self) -> &Vehicle<O, D> {
        &self.vehicle
    }
}
