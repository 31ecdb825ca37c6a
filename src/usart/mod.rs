//! Serial transport over the USART peripheral.
//!
//! The transport owns the framing configuration (mode, oversampling, frame
//! width, parity, stop bits), programs the baud-rate divisor, and exposes
//! blocking byte- and line-oriented I/O. All hardware access goes through
//! the [`RegisterBus`] capability so the same code drives the real device
//! and the in-memory simulation.
//!
//! # Lifecycle
//!
//! Call order is a contract: [`Usart::init`], then [`Usart::set_baud_rate`]
//! (the divisor formula depends on the mode and speed recorded by `init`),
//! then [`Usart::enable`]. Enabling the line before the divisor is
//! programmed is undefined behavior on the ATmega32A. There is no
//! reconfiguration or teardown path; the transport lives for the program.
//!
//! # Wire framing
//!
//! Framing is asymmetric by design: [`Usart::transmit_line`] appends no
//! delimiter, while [`Usart::receive_line`] accumulates bytes until a `#`
//! sentinel (consumed, not stored) or the 9-byte line cap. The companion
//! application depends on exactly this contract.

pub mod registers;
pub mod wait;

#[cfg(feature = "embedded")]
pub mod mmio;
#[cfg(feature = "std")]
pub mod sim;

use core::fmt;

use heapless::Vec;

use crate::config::CPU_CLOCK_HZ;
use registers::{bits, Register, RegisterBus};
use wait::WaitStrategy;

/// Maximum number of characters a received line can carry.
pub const MAX_LINE_LEN: usize = 9;

/// Sentinel byte terminating a received command line.
pub const LINE_DELIMITER: u8 = b'#';

/// Clock-generation scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Internal baud generator, start/stop framing on the wire.
    #[default]
    Asynchronous,
    /// Clock carried on a dedicated line; the speed select is ignored.
    Synchronous,
}

/// Parity scheme for the frame.
///
/// The field encoding on the wire is the register ordinal: disabled = 0,
/// even = 2, odd = 3. Ordinal 1 is reserved by the hardware and has no
/// variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Even parity.
    Even,
    /// Odd parity.
    Odd,
}

impl Parity {
    /// Register field value for this scheme.
    #[must_use]
    pub const fn field_bits(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Even => 2,
            Self::Odd => 3,
        }
    }
}

/// Number of stop bits per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StopBits {
    /// One stop bit.
    #[default]
    One,
    /// Two stop bits.
    Two,
}

impl StopBits {
    /// Stop-bit count as programmed minus one into the stop-select field.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

/// Framing configuration, fixed once [`Usart::init`] has run.
#[derive(Clone, Debug)]
pub struct UsartConfig {
    /// Clock-generation scheme.
    pub mode: Mode,
    /// Halve the oversampling divisor (asynchronous mode only).
    pub double_speed: bool,
    /// Data bits per frame, 5 through 9.
    pub frame_bits: u8,
    /// Parity scheme.
    pub parity: Parity,
    /// Stop bits per frame.
    pub stop_bits: StopBits,
}

impl Default for UsartConfig {
    /// Asynchronous 8N1 at normal speed, the companion-link framing.
    fn default() -> Self {
        Self {
            mode: Mode::Asynchronous,
            double_speed: false,
            frame_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Rejected configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Frame width outside 5..=9. The hardware would silently keep its
    /// default width; rejecting instead is deliberate.
    InvalidFrameBits(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameBits(n) => write!(f, "invalid frame width: {n} data bits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::InvalidFrameBits(n) => defmt::write!(f, "invalid frame width: {} data bits", n),
        }
    }
}

/// Line-fault flags captured from the status register on receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineFault {
    /// Stop bit was not seen where expected.
    pub framing: bool,
    /// A received frame was lost before the data register was read.
    pub overrun: bool,
    /// Parity check failed.
    pub parity: bool,
}

impl LineFault {
    fn from_status(status: u8) -> Self {
        Self {
            framing: status & (1 << bits::FRAME_ERROR) != 0,
            overrun: status & (1 << bits::DATA_OVERRUN) != 0,
            parity: status & (1 << bits::PARITY_ERROR) != 0,
        }
    }

    /// True when no fault bit is set.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        !(self.framing || self.overrun || self.parity)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LineFault {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "fault(framing={} overrun={} parity={})",
            self.framing,
            self.overrun,
            self.parity
        );
    }
}

/// Transport failure on the byte paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UsartError {
    /// The wait strategy gave up before the hardware became ready.
    Timeout,
    /// The status register reported a line fault for the received frame.
    Fault(LineFault),
}

impl fmt::Display for UsartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for the line"),
            Self::Fault(fault) => write!(
                f,
                "line fault (framing={} overrun={} parity={})",
                fault.framing, fault.overrun, fault.parity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UsartError {}

#[cfg(feature = "defmt")]
impl defmt::Format for UsartError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Timeout => defmt::write!(f, "timeout"),
            Self::Fault(fault) => defmt::write!(f, "{}", fault),
        }
    }
}

impl embedded_io::Error for UsartError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Self::Timeout => embedded_io::ErrorKind::TimedOut,
            Self::Fault(_) => embedded_io::ErrorKind::InvalidData,
        }
    }
}

/// A received command line, owned by the caller.
///
/// Returned by value, so no later read can overwrite it behind the caller's
/// back, and hitting the line cap is reported instead of passing unnoticed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReceivedLine {
    bytes: Vec<u8, MAX_LINE_LEN>,
    truncated: bool,
}

impl ReceivedLine {
    /// Line content, delimiter stripped.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line content as text, if it is valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// True when the line cap was hit before a delimiter arrived. The first
    /// [`MAX_LINE_LEN`] bytes are still carried in full.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    /// Number of stored bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no bytes preceded the delimiter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The serial transport.
///
/// Generic over the register access capability and the busy-wait strategy so
/// the identical driver code runs against hardware, the simulated bus, or a
/// bounded-wait test harness.
pub struct Usart<B, W> {
    bus: B,
    wait: W,
    mode: Mode,
    double_speed: bool,
    extended_frame: bool,
}

impl<B: RegisterBus, W: WaitStrategy> Usart<B, W> {
    /// Create a transport over `bus`. The line is not configured or enabled
    /// yet; follow with [`Usart::init`], [`Usart::set_baud_rate`] and
    /// [`Usart::enable`], in that order.
    pub fn new(bus: B, wait: W) -> Self {
        Self {
            bus,
            wait,
            mode: Mode::Asynchronous,
            double_speed: false,
            extended_frame: false,
        }
    }

    /// Program the framing configuration.
    ///
    /// Widths 5 through 8 map directly onto the frame-size field; width 9
    /// additionally sets the high frame-size bit and switches both byte
    /// paths to the extended (ninth-bit) protocol. The parity and stop-bit
    /// fields are written only when parity is enabled; with parity off the
    /// hardware defaults are left untouched, stop-bit setting included.
    pub fn init(&mut self, config: &UsartConfig) -> Result<(), ConfigError> {
        if !(5..=9).contains(&config.frame_bits) {
            return Err(ConfigError::InvalidFrameBits(config.frame_bits));
        }

        self.mode = config.mode;
        self.double_speed = config.double_speed;

        match config.mode {
            Mode::Asynchronous => {
                if config.double_speed {
                    self.bus.set_bits(Register::ControlA, 1 << bits::DOUBLE_SPEED);
                }
            }
            Mode::Synchronous => {
                self.bus.set_bits(
                    Register::ControlC,
                    (1 << bits::REG_SELECT) | (1 << bits::MODE_SELECT),
                );
            }
        }

        if config.frame_bits == 9 {
            self.extended_frame = true;
            self.bus
                .set_bits(Register::ControlB, 1 << bits::FRAME_SIZE_HIGH);
            self.bus.set_bits(
                Register::ControlC,
                (1 << bits::REG_SELECT) | (3 << bits::FRAME_SIZE0),
            );
        } else {
            self.extended_frame = false;
            self.bus.set_bits(
                Register::ControlC,
                (1 << bits::REG_SELECT) | ((config.frame_bits - 5) << bits::FRAME_SIZE0),
            );
        }

        if config.parity != Parity::None {
            self.bus.set_bits(
                Register::ControlC,
                (1 << bits::REG_SELECT)
                    | (config.parity.field_bits() << bits::PARITY_MODE0)
                    | ((config.stop_bits.count() - 1) << bits::STOP_SELECT),
            );
        }

        Ok(())
    }

    /// Compute and program the baud-rate divisor for `baud` bits/second.
    ///
    /// Both hardware paths are disabled first, since reprogramming the
    /// divisor while either is active corrupts frames in flight; the
    /// caller must [`Usart::enable`] again afterward. The divisor is derived
    /// with floating-point division then truncation:
    ///
    /// - asynchronous, normal speed: `clock / (16 * baud) - 1`
    /// - asynchronous, double speed: `clock / (8 * baud) - 1`
    /// - synchronous: `clock / (2 * baud) - 1`
    pub fn set_baud_rate(&mut self, baud: u32) {
        self.bus.clear_bits(
            Register::ControlB,
            (1 << bits::RX_ENABLE) | (1 << bits::TX_ENABLE),
        );

        let clock = CPU_CLOCK_HZ as f32;
        let divisor = match self.mode {
            Mode::Asynchronous if self.double_speed => {
                (clock / (8.0 * baud as f32) - 1.0) as u16
            }
            Mode::Asynchronous => (clock / (16.0 * baud as f32) - 1.0) as u16,
            Mode::Synchronous => (clock / (2.0 * baud as f32) - 1.0) as u16,
        };

        self.bus.write(Register::BaudHigh, (divisor >> 8) as u8);
        self.bus.write(Register::BaudLow, divisor as u8);
    }

    /// Activate both the transmit and receive hardware paths. Idempotent.
    pub fn enable(&mut self) {
        self.bus.set_bits(
            Register::ControlB,
            (1 << bits::TX_ENABLE) | (1 << bits::RX_ENABLE),
        );
    }

    /// Transmit one frame, blocking until the transmit register is free.
    ///
    /// With an extended frame the ninth bit (`0x100`) is latched before the
    /// low byte is written; the hardware double-buffers in that order. In
    /// 8-bit mode only the low 8 bits of `value` are sent.
    pub fn transmit_byte(&mut self, value: u16) -> Result<(), UsartError> {
        let Self { bus, wait, .. } = self;
        wait.wait_until(|| bus.read(Register::ControlA) & (1 << bits::DATA_EMPTY) != 0)
            .map_err(|_| UsartError::Timeout)?;

        if self.extended_frame {
            self.bus.clear_bits(Register::ControlB, 1 << bits::TX_BIT8);
            if value & 0x100 != 0 {
                self.bus.set_bits(Register::ControlB, 1 << bits::TX_BIT8);
            }
        }
        self.bus.write(Register::Data, value as u8);

        Ok(())
    }

    /// Transmit every byte of `text`, in order.
    ///
    /// No delimiter or line ending is appended; whatever framing the peer
    /// expects must already be in `text`. (The receive direction frames on
    /// [`LINE_DELIMITER`]; the asymmetry is part of the wire contract.)
    pub fn transmit_line(&mut self, text: &str) -> Result<(), UsartError> {
        for byte in text.bytes() {
            self.transmit_byte(u16::from(byte))?;
        }
        Ok(())
    }

    /// Receive one frame, blocking until the receive-complete flag is set.
    ///
    /// The status register is sampled before the data register: the fault
    /// flags are only valid until the data read, and in extended mode the
    /// ninth bit would be lost to a fast back-to-back frame otherwise.
    pub fn receive_byte(&mut self) -> Result<u16, UsartError> {
        let Self { bus, wait, .. } = self;
        wait.wait_until(|| bus.read(Register::ControlA) & (1 << bits::RX_COMPLETE) != 0)
            .map_err(|_| UsartError::Timeout)?;

        let fault = LineFault::from_status(self.bus.read(Register::ControlA));

        let value = if self.extended_frame {
            let control = self.bus.read(Register::ControlB);
            let data = self.bus.read(Register::Data);
            let ninth = u16::from((control >> bits::RX_BIT8) & 0x01);
            (ninth << 8) | u16::from(data)
        } else {
            u16::from(self.bus.read(Register::Data))
        };

        if fault.is_clear() {
            Ok(value)
        } else {
            Err(UsartError::Fault(fault))
        }
    }

    /// Receive a command line.
    ///
    /// Accumulates frames until a [`LINE_DELIMITER`] arrives (consumed, not
    /// stored) or [`MAX_LINE_LEN`] bytes have been stored. Hitting the cap
    /// stops the read and is reported through
    /// [`ReceivedLine::truncated`]; the bytes read so far are returned
    /// either way. In extended mode the low 8 bits of each frame are stored.
    pub fn receive_line(&mut self) -> Result<ReceivedLine, UsartError> {
        let mut line = ReceivedLine::default();

        loop {
            let byte = (self.receive_byte()? & 0xFF) as u8;
            if byte == LINE_DELIMITER {
                break;
            }
            // Capacity equals the cap check, so this push cannot fail.
            let _ = line.bytes.push(byte);
            if line.bytes.len() == MAX_LINE_LEN {
                line.truncated = true;
                break;
            }
        }

        Ok(line)
    }

    /// Borrow the underlying register bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutably borrow the underlying register bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

impl<B: RegisterBus, W: WaitStrategy> embedded_io::ErrorType for Usart<B, W> {
    type Error = UsartError;
}

impl<B: RegisterBus, W: WaitStrategy> embedded_io::Write for Usart<B, W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            self.transmit_byte(u16::from(byte))?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<B: RegisterBus, W: WaitStrategy> embedded_io::Read for Usart<B, W> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = (self.receive_byte()? & 0xFF) as u8;
        Ok(1)
    }
}
