/// Kernel logger for Agave
/// Backs the `log` facade with a ring buffer (read back by dmesg) and the console
/// Line format: [target][LEVEL] message
use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::config::{LOG_BUFFER_SIZE, LOG_LINE_MAX};

/// Fixed-size log buffer; on overflow it restarts from the beginning
pub(crate) struct LogBuffer {
    buffer: [u8; LOG_BUFFER_SIZE],
    write_pos: usize,
    entries: usize,
}

impl LogBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: [0; LOG_BUFFER_SIZE],
            write_pos: 0,
            entries: 0,
        }
    }

    pub(crate) fn add_message(&mut self, message: &str) {
        let bytes = message.as_bytes();
        let len = bytes.len();

        if len >= LOG_BUFFER_SIZE {
            return;
        }

        if self.write_pos + len + 1 > LOG_BUFFER_SIZE {
            self.write_pos = 0;
            self.entries = 0;
        }

        self.buffer[self.write_pos..self.write_pos + len].copy_from_slice(bytes);
        self.buffer[self.write_pos + len] = b'\n';
        self.write_pos += len + 1;
        self.entries += 1;
    }

    pub(crate) fn read_all(&self) -> &[u8] {
        &self.buffer[..self.write_pos]
    }

    pub(crate) fn entries(&self) -> usize {
        self.entries
    }
}

static LOG_BUFFER: Mutex<LogBuffer> = Mutex::new(LogBuffer::new());

/// Stack buffer a single log line is formatted into
///
/// Output past `LOG_LINE_MAX` is dropped at a character boundary so the
/// result is always valid UTF-8.
pub(crate) struct LineWriter {
    buffer: [u8; LOG_LINE_MAX],
    pos: usize,
}

impl LineWriter {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: [0; LOG_LINE_MAX],
            pos: 0,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buffer[..self.pos]).unwrap_or("")
    }
}

impl Write for LineWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.buffer.len() - self.pos;
        let mut take = s.len().min(remaining);
        while !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buffer[self.pos..self.pos + take].copy_from_slice(&s.as_bytes()[..take]);
        self.pos += take;
        Ok(())
    }
}

/// Render a record as `[target][LEVEL] message`
pub(crate) fn format_record(record: &Record) -> LineWriter {
    let mut line = LineWriter::new();
    let _ = write!(
        line,
        "[{}][{}] {}",
        record.target(),
        record.level(),
        record.args()
    );
    line
}

struct KernelLogger;

static LOGGER: KernelLogger = KernelLogger;

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_record(record);
        record_line(line.as_str());
    }

    fn flush(&self) {}
}

/// Append a formatted line to the buffer and echo it to the console
fn record_line(message: &str) {
    without_interrupts(|| {
        LOG_BUFFER.lock().add_message(message);
        console_write(message);
    });
}

/// Run `f` with interrupts masked so an IRQ handler that logs cannot spin
/// on a lock the interrupted context holds
#[cfg(all(target_os = "none", target_arch = "x86_64"))]
fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    x86_64::instructions::interrupts::without_interrupts(f)
}

#[cfg(not(all(target_os = "none", target_arch = "x86_64")))]
fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(all(target_os = "none", target_arch = "x86_64"))]
fn console_init() {
    crate::serial::SERIAL.lock().init();
}

#[cfg(all(target_os = "none", target_arch = "x86_64"))]
fn console_write(message: &str) {
    crate::serial::SERIAL.lock().write_line(message);
}

#[cfg(not(all(target_os = "none", target_arch = "x86_64")))]
fn console_init() {}

#[cfg(not(all(target_os = "none", target_arch = "x86_64")))]
fn console_write(_message: &str) {}

/// Install the kernel logger (call once at boot)
pub fn init(level: LevelFilter) {
    console_init();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
        log::info!(target: "kcore", "kernel logger online at level {}", level);
    }
}

/// Set the global log level
pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}

/// Get the current global log level
pub fn log_level() -> LevelFilter {
    log::max_level()
}

/// Copy the kernel log buffer into `dest`
/// Returns the number of bytes copied
pub fn read_log_buffer(dest: &mut [u8]) -> usize {
    without_interrupts(|| {
        let buffer = LOG_BUFFER.lock();
        let data = buffer.read_all();
        let to_copy = core::cmp::min(data.len(), dest.len());
        dest[..to_copy].copy_from_slice(&data[..to_copy]);
        to_copy
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn test_log_buffer_appends_lines() {
        let mut buffer = LogBuffer::new();
        buffer.add_message("[vfs][INFO] one");
        buffer.add_message("[vfs][INFO] two");

        assert_eq!(buffer.read_all(), b"[vfs][INFO] one\n[vfs][INFO] two\n");
        assert_eq!(buffer.entries(), 2);
    }

    #[test]
    fn test_log_buffer_wraps_when_full() {
        let mut buffer = LogBuffer::new();
        let chunk = "x".repeat(LOG_BUFFER_SIZE / 2);
        buffer.add_message(&chunk);
        buffer.add_message(&chunk);

        // The second message does not fit behind the first one
        assert_eq!(buffer.entries(), 1);
        assert_eq!(buffer.read_all().len(), chunk.len() + 1);
    }

    #[test]
    fn test_log_buffer_drops_oversized_message() {
        let mut buffer = LogBuffer::new();
        buffer.add_message(&"y".repeat(LOG_BUFFER_SIZE));
        assert!(buffer.read_all().is_empty());
    }

    #[test]
    fn test_format_record() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("mounted {}", "ramfs"))
                .level(Level::Info)
                .target("vfs")
                .build(),
        );
        assert_eq!(line.as_str(), "[vfs][INFO] mounted ramfs");
    }

    #[test]
    fn test_record_line_releases_buffer_lock() {
        record_line("[klog][ERROR] lock check");
        assert!(!LOG_BUFFER.is_locked());

        let mut out = [0u8; LOG_BUFFER_SIZE];
        let len = read_log_buffer(&mut out);
        assert!(!LOG_BUFFER.is_locked());
        let text = core::str::from_utf8(&out[..len]).expect("utf8");
        assert!(text.contains("[klog][ERROR] lock check\n"));
    }

    #[test]
    fn test_line_writer_truncates_on_char_boundary() {
        let mut line = LineWriter::new();
        let _ = line.write_str(&"a".repeat(LOG_LINE_MAX - 1));
        let _ = line.write_str("é");
        assert_eq!(line.as_str().len(), LOG_LINE_MAX - 1);
    }
}
