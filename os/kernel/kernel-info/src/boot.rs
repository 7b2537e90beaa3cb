//! # Kernel Boot Information

use kernel_memory_addresses::PhysicalAddress;
use log::LevelFilter;

/// Information the kernel receives from the loader.
/// Keep this `#[repr(C)]` and prefer fixed-size integers at the ABI boundary.
#[repr(C)]
#[derive(Clone, Default)]
pub struct KernelBootInfo {
    /// Memory map information.
    pub mmap: MemoryMapInfo,

    /// RSDP physical address from the UEFI configuration table, or 0 if not provided.
    pub rsdp_addr: u64,
}

impl KernelBootInfo {
    /// The loader-provided RSDP address, if any.
    #[must_use]
    pub const fn rsdp_hint(&self) -> Option<PhysicalAddress> {
        if self.rsdp_addr == 0 {
            None
        } else {
            Some(PhysicalAddress::new(self.rsdp_addr))
        }
    }
}

#[repr(C)]
#[derive(Clone, Default)]
pub struct MemoryMapInfo {
    /// Pointer to the raw memory map buffer (array of `EFI_MEMORY_DESCRIPTOR` bytes).
    /// 0 if the loader did not hand over a map.
    pub mmap_ptr: u64,

    /// Length of the memory map buffer in **bytes**.
    pub mmap_len: u64,

    /// Size of a single memory descriptor in bytes.
    pub mmap_desc_size: u64,

    /// Descriptor version.
    pub mmap_desc_version: u32,
}

/// What the boot pipeline does when ACPI discovery fails or finds nothing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AcpiPolicy {
    /// Log the failure and continue booting without ACPI.
    #[default]
    BestEffort,
    /// Abort the boot sequence.
    Required,
}

/// Boot-time configuration of the early kernel.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BootConfig {
    log_level: LevelFilter,
    acpi: AcpiPolicy,
}

impl BootConfig {
    /// Debug logging, best-effort ACPI.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            log_level: LevelFilter::Debug,
            acpi: AcpiPolicy::BestEffort,
        }
    }

    #[must_use]
    pub const fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    #[must_use]
    pub const fn with_acpi_policy(mut self, policy: AcpiPolicy) -> Self {
        self.acpi = policy;
        self
    }

    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    #[must_use]
    pub const fn acpi_policy(&self) -> AcpiPolicy {
        self.acpi
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::new()
    }
}
