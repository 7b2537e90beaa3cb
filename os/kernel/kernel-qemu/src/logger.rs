use crate::qemu_trace;
use core::sync::atomic::{AtomicBool, Ordering};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// [`Log`] backend that writes `[LEVEL] target: message` lines to the QEMU
/// debug console.
pub struct QemuLogger {
    max_level: LevelFilter,
}

impl QemuLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter) -> Self {
        Self { max_level }
    }

    #[must_use]
    pub const fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Install this logger globally and set the `log` crate's maximum level to
    /// [`QemuLogger::max_level`]. Call once during early init.
    ///
    /// # Errors
    /// Fails if a logger is already installed; the first one stays active.
    pub fn init(self) -> Result<(), SetLoggerError> {
        static mut LOGGER: QemuLogger = QemuLogger::new(LevelFilter::Off);
        static CLAIMED: AtomicBool = AtomicBool::new(false);

        if !CLAIMED.swap(true, Ordering::AcqRel) {
            // SAFETY: Only the first caller writes, before `LOGGER` is shared.
            unsafe {
                LOGGER = self;
            }
        }

        // SAFETY: `LOGGER` is never written again after the first call.
        let logger: &'static Self = unsafe { &*(&raw const LOGGER) };
        log::set_logger(logger)?;
        log::set_max_level(logger.max_level);
        Ok(())
    }
}

impl Log for QemuLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        qemu_trace!(
            "[{}] {}: {}\n",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}
