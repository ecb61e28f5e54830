/// Bare-metal panic handler
/// Every fatal abort (`kpanic!`) ends here on the real kernel target
#[cfg(all(target_os = "none", not(test)))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    #[cfg(target_arch = "x86_64")]
    {
        use core::fmt::Write;

        x86_64::instructions::interrupts::disable();

        // The panic may have fired while the console lock was held
        let mut serial = crate::serial::SerialPort::new(crate::serial::COM1);
        let _ = write!(serial, "\nKERNEL PANIC\n============\n\n{}\n\nsystem halted.\n", info.message());

        loop {
            x86_64::instructions::hlt();
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = info;
        loop {
            core::hint::spin_loop();
        }
    }
}
