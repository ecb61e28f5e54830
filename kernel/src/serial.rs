/// COM1 serial console
/// Sink for kernel log lines and the panic banner on bare metal
use core::fmt;
use spin::Mutex;
use x86_64::instructions::port::Port;

/// COM1 serial port base address
pub const COM1: u16 = 0x3F8;

// Register offsets from the port base
const DATA: u16 = 0; // divisor low byte while DLAB is set
const INTERRUPT_ENABLE: u16 = 1; // divisor high byte while DLAB is set
const FIFO_CONTROL: u16 = 2;
const LINE_CONTROL: u16 = 3;
const MODEM_CONTROL: u16 = 4;
const LINE_STATUS: u16 = 5;

/// Line control bit that exposes the divisor latch
const LCR_DLAB: u8 = 0x80;

/// Line status bit: transmit holding register empty
const LSR_THR_EMPTY: u8 = 0x20;

/// Register writes that bring the UART up, in order
const INIT_SEQUENCE: [(u16, u8); 7] = [
    // Mask UART interrupts; the console polls
    (INTERRUPT_ENABLE, 0x00),
    // Enable DLAB
    (LINE_CONTROL, LCR_DLAB),
    // Divisor 3 (38400 baud)
    (DATA, 0x03),
    (INTERRUPT_ENABLE, 0x00),
    // 8 bits, no parity, one stop bit; clears DLAB
    (LINE_CONTROL, 0x03),
    // Enable and clear FIFOs, 14-byte threshold
    (FIFO_CONTROL, 0xC7),
    // DTR, RTS and OUT2
    (MODEM_CONTROL, 0x0B),
];

/// Global serial console
pub static SERIAL: Mutex<SerialPort> = Mutex::new(SerialPort::new(COM1));

pub struct SerialPort {
    base: u16,
}

impl SerialPort {
    pub const fn new(base: u16) -> Self {
        Self { base }
    }

    pub fn init(&mut self) {
        for (offset, value) in INIT_SEQUENCE {
            unsafe {
                Port::new(self.base + offset).write(value);
            }
        }
    }

    /// Busy-wait for the transmitter, then send one byte
    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let mut line_status = Port::<u8>::new(self.base + LINE_STATUS);
            while line_status.read() & LSR_THR_EMPTY == 0 {}
            Port::new(self.base + DATA).write(byte);
        }
    }

    /// Send a log line followed by a newline
    pub fn write_line(&mut self, line: &str) {
        for byte in line.bytes() {
            self.write_byte(byte);
        }
        self.write_byte(b'\n');
    }
}

impl fmt::Write for SerialPort {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divisor_written_only_under_dlab() {
        let mut dlab = false;
        let mut divisor = [None; 2];
        for (offset, value) in INIT_SEQUENCE {
            match offset {
                LINE_CONTROL => dlab = value & LCR_DLAB != 0,
                DATA | INTERRUPT_ENABLE if dlab => divisor[offset as usize] = Some(value),
                _ => {}
            }
        }

        assert_eq!(divisor, [Some(0x03), Some(0x00)]);
        // Data traffic must not land in the divisor latch
        assert!(!dlab);
    }
}
