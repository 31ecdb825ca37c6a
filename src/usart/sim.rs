//! In-memory register bus for host builds.
//!
//! Models the peripheral block closely enough to exercise every driver path
//! without hardware: the transmit register is always empty, the
//! receive-complete flag tracks a scripted queue, the ninth received bit is
//! surfaced through `ControlB` until the data register is read, and written
//! frames are either captured or, in loopback mode, fed straight back into
//! the receive queue.

use std::collections::VecDeque;

use super::registers::{bits, Register, RegisterBus};
use super::LineFault;

/// Simulated USART register file.
#[derive(Debug, Default)]
pub struct SimBus {
    control_a: u8,
    control_b: u8,
    control_c: u8,
    baud_high: u8,
    baud_low: u8,
    rx_queue: VecDeque<(u16, u8)>,
    tx_log: Vec<u16>,
    loopback: bool,
}

impl SimBus {
    /// Create a bus that captures transmitted frames in [`SimBus::tx_frames`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus that feeds transmitted frames back into the receive
    /// queue, ninth bit included.
    #[must_use]
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    /// Queue one frame (up to 9 bits) for the driver to receive.
    pub fn push_rx(&mut self, value: u16) {
        self.rx_queue.push_back((value & 0x1FF, 0));
    }

    /// Queue a sequence of 8-bit frames.
    pub fn push_rx_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.push_rx(u16::from(byte));
        }
    }

    /// Queue a frame whose status read will carry the given fault flags.
    pub fn push_rx_faulted(&mut self, value: u16, fault: LineFault) {
        let mut status = 0;
        if fault.framing {
            status |= 1 << bits::FRAME_ERROR;
        }
        if fault.overrun {
            status |= 1 << bits::DATA_OVERRUN;
        }
        if fault.parity {
            status |= 1 << bits::PARITY_ERROR;
        }
        self.rx_queue.push_back((value & 0x1FF, status));
    }

    /// Frames written to the data register (ninth bit included), oldest first.
    #[must_use]
    pub fn tx_frames(&self) -> &[u16] {
        &self.tx_log
    }

    /// Transmitted frames truncated to their low bytes, for text assertions.
    #[must_use]
    pub fn tx_bytes(&self) -> Vec<u8> {
        self.tx_log.iter().map(|&frame| frame as u8).collect()
    }

    /// Number of frames still waiting in the receive queue.
    #[must_use]
    pub fn rx_pending(&self) -> usize {
        self.rx_queue.len()
    }

    /// Non-consuming register snapshot for assertions. The data register
    /// reads as zero here; use [`RegisterBus::read`] to consume a frame.
    #[must_use]
    pub fn peek(&self, register: Register) -> u8 {
        match register {
            Register::ControlA => self.compose_control_a(),
            Register::ControlB => self.compose_control_b(),
            Register::ControlC => self.control_c,
            Register::BaudHigh => self.baud_high,
            Register::BaudLow => self.baud_low,
            Register::Data => 0,
        }
    }

    fn compose_control_a(&self) -> u8 {
        let mut value = self.control_a | (1 << bits::DATA_EMPTY);
        if let Some(&(_, fault)) = self.rx_queue.front() {
            value |= (1 << bits::RX_COMPLETE) | fault;
        }
        value
    }

    fn compose_control_b(&self) -> u8 {
        let mut value = self.control_b & !(1 << bits::RX_BIT8);
        if let Some(&(frame, _)) = self.rx_queue.front() {
            if frame & 0x100 != 0 {
                value |= 1 << bits::RX_BIT8;
            }
        }
        value
    }
}

impl RegisterBus for SimBus {
    fn read(&mut self, register: Register) -> u8 {
        match register {
            Register::ControlA => self.compose_control_a(),
            Register::ControlB => self.compose_control_b(),
            Register::ControlC => self.control_c,
            Register::BaudHigh => self.baud_high,
            Register::BaudLow => self.baud_low,
            Register::Data => self
                .rx_queue
                .pop_front()
                .map_or(0, |(frame, _)| frame as u8),
        }
    }

    fn write(&mut self, register: Register, value: u8) {
        match register {
            Register::ControlA => self.control_a = value,
            Register::ControlB => self.control_b = value,
            Register::ControlC => self.control_c = value,
            Register::BaudHigh => self.baud_high = value,
            Register::BaudLow => self.baud_low = value,
            Register::Data => {
                let ninth = u16::from(self.control_b & (1 << bits::TX_BIT8) != 0) << 8;
                let frame = ninth | u16::from(value);
                if self.loopback {
                    self.rx_queue.push_back((frame, 0));
                } else {
                    self.tx_log.push(frame);
                }
            }
        }
    }
}
