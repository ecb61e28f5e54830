//! Kernel core services consumed by the storage layer
//!
//! Only the fatal-abort path lives here: configuration errors found at mount
//! time and broken internal invariants are not recoverable and halt the kernel.

use core::fmt;

/// Abort the kernel with a formatted message
///
/// Logs the message with its source location at `error` level, then panics.
/// On bare metal the panic handler prints the banner and halts the CPU.
#[macro_export]
macro_rules! kpanic {
    ($($arg:tt)*) => {
        $crate::kcore::kpanic_ex(file!(), line!(), format_args!($($arg)*))
    };
}

#[doc(hidden)]
#[cold]
#[track_caller]
pub fn kpanic_ex(file: &str, line: u32, args: fmt::Arguments) -> ! {
    log::error!(target: "kcore", "KERNEL PANIC at {}:{}: {}", file, line, args);
    panic!("{}", args);
}
