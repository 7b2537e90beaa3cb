//! # QEMU Debug Console Output
//!
//! Early-boot diagnostics for kernels running under QEMU. Everything written
//! here goes byte by byte to I/O port `0x402`, which QEMU forwards to the host
//! when started with `-debugcon`:
//!
//! ```bash
//! qemu-system-x86_64 ... -debugcon stdio
//! qemu-system-x86_64 ... -debugcon file:debug.log
//! ```
//!
//! ## Output Path
//! ```text
//! log::info!(..)  ──►  QemuLogger (level filter)
//!                           │
//! qemu_trace!(..) ──────────┤
//!                           ▼
//!                  QemuSink (fmt::Write) ──► out 0x402, al
//! ```
//!
//! Nothing allocates: records are formatted straight into the port through
//! `format_args!`.
//!
//! ## Features
//!
//! * `enabled` (default): port I/O is compiled in.
//! * Without `enabled`, [`qemu_trace!`] and the logger still compile but write
//!   nothing, so callers need no `cfg` of their own.
//!
//! ## Usage
//! ```rust,no_run
//! use kernel_qemu::QemuLogger;
//! use log::{LevelFilter, info};
//!
//! QemuLogger::new(LevelFilter::Info).init().expect("first logger");
//! info!("Scanning for the RSDP");
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod logger;

pub use logger::QemuLogger;

#[cfg(feature = "enabled")]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt::{self, Write};

    /// QEMU's debug console port.
    const QEMU_DEBUG_PORT: u16 = 0x402;

    /// Write a single byte to the debug console.
    #[allow(clippy::inline_always)]
    #[inline(always)]
    pub fn dbg_putc(c: u8) {
        // SAFETY: Port 0x402 has no side effects besides QEMU's debug console.
        unsafe { outb(QEMU_DEBUG_PORT, c) }
    }

    #[allow(clippy::inline_always)]
    #[inline(always)]
    unsafe fn outb(port: u16, val: u8) {
        unsafe {
            core::arch::asm!(
            "out dx, al",
            in("dx") port,
            in("al") val,
            options(nomem, nostack, preserves_flags)
            );
        }
    }

    /// `fmt::Write` adapter over the debug console.
    pub struct QemuSink;

    impl Write for QemuSink {
        #[inline]
        fn write_str(&mut self, s: &str) -> fmt::Result {
            s.bytes().for_each(dbg_putc);
            Ok(())
        }
    }

    #[doc(hidden)]
    #[inline(always)]
    #[allow(clippy::inline_always)]
    pub fn qemu_write(args: fmt::Arguments) {
        // Best effort; the sink itself never fails.
        let _ = fmt::write(&mut QemuSink, args);
    }
}

#[cfg(not(feature = "enabled"))]
#[doc(hidden)]
pub mod qemu_fmt {
    use core::fmt;

    #[doc(hidden)]
    #[inline(always)]
    #[allow(clippy::inline_always, clippy::needless_pass_by_value)]
    pub fn qemu_write(_: fmt::Arguments) {}
}

/// `print!`-style output straight to the QEMU debug console.
///
/// No trailing newline is added.
#[macro_export]
macro_rules! qemu_trace {
    ($($arg:tt)*) => {{
        $crate::qemu_fmt::qemu_write(core::format_args!($($arg)*));
    }};
}
