//! # Boot Logging

use kernel_info::boot::{BootConfig, KernelBootInfo};
use kernel_qemu::QemuLogger;
use log::{SetLoggerError, debug};

/// Install the QEMU debug-console logger at the configured level.
///
/// The bare-metal entry stub calls this before running the boot pipeline.
///
/// # Errors
/// Fails if a logger is already installed.
pub fn init_logging(config: &BootConfig) -> Result<(), SetLoggerError> {
    QemuLogger::new(config.log_level()).init()
}

pub fn trace_boot_info(boot_info: &KernelBootInfo) {
    debug!(
        concat!(
            "Boot Info in Kernel:\n",
            "  BI ptr    = {bi:#018x}\n",
            "  MMAP ptr  = {mmap_ptr:#018x}, len = {mmap_len}, desc size = {mmap_desc_size}, desc ver = {mmap_desc_ver}\n",
            "  RSDP addr = {rsdp_addr:#018x}"
        ),
        bi = core::ptr::from_ref(boot_info) as usize,
        mmap_ptr = boot_info.mmap.mmap_ptr,
        mmap_len = boot_info.mmap.mmap_len,
        mmap_desc_size = boot_info.mmap.mmap_desc_size,
        mmap_desc_ver = boot_info.mmap.mmap_desc_version,
        rsdp_addr = boot_info.rsdp_addr,
    );
}
