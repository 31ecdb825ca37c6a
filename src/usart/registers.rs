//! USART register map and the narrow access capability the driver needs.
//!
//! The transport never touches memory-mapped I/O directly; it goes through
//! [`RegisterBus`], an 8-bit read/write surface over the named registers of
//! the peripheral block. Production builds bind it to the real device
//! (`mmio`), host builds bind it to an in-memory register file (`sim`).

/// Named registers of the USART peripheral block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Status flags: ready/complete, line faults, double-speed select.
    ControlA,
    /// Enables, ninth data bit latches, frame-size high bit.
    ControlB,
    /// Mode, parity, stop-bit and frame-size fields.
    ControlC,
    /// Baud divisor, high byte.
    BaudHigh,
    /// Baud divisor, low byte.
    BaudLow,
    /// Transmit/receive data register.
    Data,
}

/// Bit positions within the control registers.
pub mod bits {
    /// `ControlA`: receive-complete flag.
    pub const RX_COMPLETE: u8 = 7;
    /// `ControlA`: transmit-data-register-empty flag.
    pub const DATA_EMPTY: u8 = 5;
    /// `ControlA`: framing-error flag, valid until the data register is read.
    pub const FRAME_ERROR: u8 = 4;
    /// `ControlA`: data-overrun flag.
    pub const DATA_OVERRUN: u8 = 3;
    /// `ControlA`: parity-error flag.
    pub const PARITY_ERROR: u8 = 2;
    /// `ControlA`: double-speed select (asynchronous mode only).
    pub const DOUBLE_SPEED: u8 = 1;

    /// `ControlB`: receive path enable.
    pub const RX_ENABLE: u8 = 4;
    /// `ControlB`: transmit path enable.
    pub const TX_ENABLE: u8 = 3;
    /// `ControlB`: frame-size high bit (set for 9-bit frames).
    pub const FRAME_SIZE_HIGH: u8 = 2;
    /// `ControlB`: ninth received data bit.
    pub const RX_BIT8: u8 = 1;
    /// `ControlB`: ninth data bit to transmit.
    pub const TX_BIT8: u8 = 0;

    /// `ControlC`: register-select bit, must accompany every `ControlC` write
    /// (the ATmega32A shares this address with `BaudHigh`).
    pub const REG_SELECT: u8 = 7;
    /// `ControlC`: clock mode select (set = synchronous).
    pub const MODE_SELECT: u8 = 6;
    /// `ControlC`: parity field, two bits starting here.
    pub const PARITY_MODE0: u8 = 4;
    /// `ControlC`: stop-bit select (set = two stop bits).
    pub const STOP_SELECT: u8 = 3;
    /// `ControlC`: frame-size field, two bits starting here.
    pub const FRAME_SIZE0: u8 = 1;
}

/// 8-bit register access capability.
///
/// Reads take `&mut self` because reading the data register consumes the
/// received byte on the real hardware, and the simulated bus mirrors that.
pub trait RegisterBus {
    /// Read an 8-bit register.
    fn read(&mut self, register: Register) -> u8;

    /// Write an 8-bit register.
    fn write(&mut self, register: Register, value: u8);

    /// OR `mask` into a register.
    fn set_bits(&mut self, register: Register, mask: u8) {
        let value = self.read(register);
        self.write(register, value | mask);
    }

    /// Clear `mask` in a register.
    fn clear_bits(&mut self, register: Register, mask: u8) {
        let value = self.read(register);
        self.write(register, value & !mask);
    }
}
