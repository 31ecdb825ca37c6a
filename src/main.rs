//! Remote-Control Unit Firmware
//!
//! Entry point for the ATmega32A-based vehicle remote-control unit.
//! Binds the driver seams to the real device: memory-mapped USART
//! registers, the on-chip ADC, and the three output ports, then runs the
//! dispatch loop forever.

#![no_std]
#![no_main]

use panic_halt as _;

use rcu_firmware::prelude::*;
use rcu_firmware::usart::mmio::MmioBus;

/// Data-space addresses of the I/O registers the binary touches directly.
mod io {
    pub const DDRB: *mut u8 = 0x37 as *mut u8;
    pub const DDRC: *mut u8 = 0x34 as *mut u8;
    pub const DDRD: *mut u8 = 0x31 as *mut u8;
    pub const PORTB: *mut u8 = 0x38 as *mut u8;
    pub const PORTC: *mut u8 = 0x35 as *mut u8;
    pub const PORTD: *mut u8 = 0x32 as *mut u8;
    pub const ADMUX: *mut u8 = 0x27 as *mut u8;
    pub const ADCSRA: *mut u8 = 0x26 as *mut u8;
    pub const ADCH: *mut u8 = 0x25 as *mut u8;
    pub const ADCL: *mut u8 = 0x24 as *mut u8;
}

/// ADMUX: reference select, AVCC with external capacitor.
const REF_AVCC: u8 = 1 << 6;
/// ADCSRA: converter enable.
const ADC_ENABLE: u8 = 1 << 7;
/// ADCSRA: start conversion, self-clearing.
const ADC_START: u8 = 1 << 6;
/// ADCSRA: /128 clock prescaler.
const ADC_PRESCALE_128: u8 = 0x07;

/// Output ports bound to the device.
struct AvrOutputs;

impl OutputBus for AvrOutputs {
    fn set_bits(&mut self, port: Port, mask: u8) {
        let reg = port_register(port);
        // SAFETY: fixed, always-mapped I/O address; single execution context.
        unsafe { reg.write_volatile(reg.read_volatile() | mask) }
    }

    fn clear_bits(&mut self, port: Port, mask: u8) {
        let reg = port_register(port);
        // SAFETY: as above.
        unsafe { reg.write_volatile(reg.read_volatile() & !mask) }
    }

    fn write(&mut self, port: Port, value: u8) {
        // SAFETY: as above.
        unsafe { port_register(port).write_volatile(value) }
    }
}

fn port_register(port: Port) -> *mut u8 {
    match port {
        Port::Relays => io::PORTC,
        Port::Auxiliary => io::PORTD,
        Port::Throttle => io::PORTB,
    }
}

/// On-chip converter: AVCC reference, right-adjusted result, /128 prescaler.
struct AvrAdc;

impl AvrAdc {
    fn init() -> Self {
        // SAFETY: fixed I/O addresses, single execution context.
        unsafe {
            io::ADMUX.write_volatile(REF_AVCC);
            io::ADCSRA.write_volatile(ADC_ENABLE | ADC_PRESCALE_128);
        }
        let mut adc = Self;
        // First conversion after enable is an extended dummy on each channel.
        adc.read(AdcChannel::Battery);
        adc.read(AdcChannel::MotorSpeed);
        adc
    }
}

impl AdcReader for AvrAdc {
    fn read(&mut self, channel: AdcChannel) -> u16 {
        // SAFETY: fixed I/O addresses, single execution context.
        unsafe {
            io::ADMUX.write_volatile(REF_AVCC | channel.index());
            io::ADCSRA.write_volatile(ADC_ENABLE | ADC_START | ADC_PRESCALE_128);
            while io::ADCSRA.read_volatile() & ADC_START != 0 {}
            // Low byte first; reading it latches the high byte.
            let low = io::ADCL.read_volatile();
            let high = io::ADCH.read_volatile() & 0x03;
            (u16::from(high) << 8) | u16::from(low)
        }
    }
}

/// Coarse cycle-counting delay for the relay settle times.
struct CycleDelay;

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        // One iteration is a few cycles at 12 MHz; round generously upward.
        let iterations = ns / 250 + 1;
        for _ in 0..iterations {
            avr_device::asm::nop();
        }
    }
}

#[avr_device::entry]
fn main() -> ! {
    // Port directions: throttle and relay banks fully output, auxiliary
    // port only on the roof actuator bits (the serial pins share it).
    // SAFETY: fixed I/O addresses, single execution context.
    unsafe {
        io::DDRB.write_volatile(0xFF);
        io::DDRC.write_volatile(0xFF);
        io::DDRD.write_volatile(0xC0);
    }

    let adc = AvrAdc::init();

    let mut usart = Usart::new(MmioBus::atmega32a(), Spin);
    usart.init(&UsartConfig::default()).unwrap();
    usart.set_baud_rate(DEFAULT_BAUD);
    usart.enable();

    let vehicle = Vehicle::new(AvrOutputs, CycleDelay);
    let mut remote = RemoteControl::new(usart, vehicle, adc);

    loop {
        // Spin waits never time out; a line fault just drops the command.
        let _ = remote.poll_once();
    }
}
