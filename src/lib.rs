//! Vehicle Remote-Control Unit Firmware Library
//!
//! This library provides the core functionality for a microcontroller that
//! bridges a serial (USART) link to a set of digital outputs and analog
//! inputs: it receives line-delimited text commands from a companion app,
//! maps each recognized command to a relay/DAC action (lights, turn
//! signals, motor direction, roof actuator) or a sensor-read reply (battery
//! voltage, motor speed), and echoes requested telemetry back as formatted
//! ASCII.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │          Command Dispatch  │  Telemetry Replies              │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     PROTOCOL LAYER                           │
//! │       '#'-framed command words  │  fixed-point ASCII         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     DRIVER LAYER                             │
//! │   USART transport  │  ADC capability  │  Output ports        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   REGISTER CAPABILITY                        │
//! │        MMIO (device)  │  simulated register file (host)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Capability seams**: hardware access goes through narrow traits
//!   (`RegisterBus`, `AdcReader`, `OutputBus`, `WaitStrategy`) so every
//!   driver path runs on a host without the device
//! - **Explicit error handling**: all fallible operations return `Result`;
//!   conditions the hardware would swallow silently are surfaced as errors
//! - **No hidden state**: received lines are returned by value, not through
//!   a shared static buffer
//! - **No unsafe in application code**: all unsafe isolated in the MMIO
//!   binding

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Serial transport over the USART peripheral, the unit's command link.
pub mod usart;

/// Analog input capability consumed by the telemetry replies.
pub mod adc;

/// Sensor scaling and fixed-point ASCII reply formatting.
pub mod telemetry;

/// Companion-link command vocabulary and parsing.
pub mod protocol;

/// Relay bank, roof actuator, and throttle output state.
pub mod vehicle;

/// The steady-state dispatch loop.
pub mod remote;

/// System configuration and hardware constants.
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::adc::{AdcChannel, AdcReader};
    pub use crate::config::*;
    pub use crate::protocol::{Command, CommandParser};
    pub use crate::remote::RemoteControl;
    pub use crate::telemetry::{BatteryVoltage, MotorSpeed};
    pub use crate::usart::registers::RegisterBus;
    pub use crate::usart::wait::{BoundedSpin, Spin, WaitStrategy};
    pub use crate::usart::{
        Mode, Parity, StopBits, Usart, UsartConfig, UsartError, LINE_DELIMITER, MAX_LINE_LEN,
    };
    pub use crate::vehicle::{OutputBus, Port, Vehicle};

    // Common traits
    pub use embedded_hal::delay::DelayNs;

    // Error handling
    pub use core::result::Result;
}
