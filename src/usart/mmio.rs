//! Memory-mapped register bus for the real device.
//!
//! The only unsafe code in the crate lives here: volatile loads and stores
//! at the peripheral's data-space addresses. On the ATmega32A the
//! `ControlC` and `BaudHigh` registers share one physical address; the
//! register-select bit carried in every `ControlC` write (and the divisor's
//! clear top bit) steers each access, so both map to the same pointer.
#![allow(unsafe_code)]

use super::registers::{Register, RegisterBus};

/// Register bus over memory-mapped I/O.
pub struct MmioBus {
    control_a: *mut u8,
    control_b: *mut u8,
    shared_c_baud_high: *mut u8,
    baud_low: *mut u8,
    data: *mut u8,
}

impl MmioBus {
    /// Bus at the ATmega32A USART data-space addresses.
    #[must_use]
    pub const fn atmega32a() -> Self {
        Self {
            control_a: 0x2B as *mut u8,
            control_b: 0x2A as *mut u8,
            shared_c_baud_high: 0x40 as *mut u8,
            baud_low: 0x29 as *mut u8,
            data: 0x2C as *mut u8,
        }
    }

    fn pointer(&self, register: Register) -> *mut u8 {
        match register {
            Register::ControlA => self.control_a,
            Register::ControlB => self.control_b,
            Register::ControlC | Register::BaudHigh => self.shared_c_baud_high,
            Register::BaudLow => self.baud_low,
            Register::Data => self.data,
        }
    }
}

impl RegisterBus for MmioBus {
    fn read(&mut self, register: Register) -> u8 {
        // SAFETY: the pointers name the device's fixed I/O addresses, which
        // are always mapped and valid for volatile access.
        unsafe { self.pointer(register).read_volatile() }
    }

    fn write(&mut self, register: Register, value: u8) {
        // SAFETY: as above.
        unsafe { self.pointer(register).write_volatile(value) }
    }
}
