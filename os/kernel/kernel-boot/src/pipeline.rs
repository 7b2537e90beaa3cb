//! # Boot Pipeline
//!
//! Early initialization as a chain of typed stages. Each stage consumes the
//! previous one and yields the next, so stages cannot be skipped or
//! reordered:
//!
//! ```text
//! Boot<Start>
//!   └─ init_physical_memory(f) ─► Boot<PhysicalMemoryReady<A>>
//!        └─ init_virtual_memory(f) ─► Boot<VirtualMemoryReady<A, M>>
//!             └─ discover_acpi() ─► Boot<AcpiReady<A, M>>
//!                  └─ finish() ─► BootedKernel<A, M>
//! ```
//!
//! The physical and virtual memory managers are supplied by the caller as
//! closures; this crate only sequences them.

use crate::BootError;
use crate::logging::trace_boot_info;
use kernel_acpi::AcpiRoots;
use kernel_info::boot::{AcpiPolicy, BootConfig, KernelBootInfo};
use kernel_vmem::PageMapper;
use log::{error, info, trace, warn};

/// The boot sequence in stage `S`.
pub struct Boot<S> {
    config: BootConfig,
    info: KernelBootInfo,
    state: S,
}

/// Nothing initialized yet.
pub struct Start;

/// A physical frame allocator `A` exists.
pub struct PhysicalMemoryReady<A> {
    allocator: A,
}

/// The kernel can map pages through `M`.
pub struct VirtualMemoryReady<A, M> {
    allocator: A,
    mapper: M,
}

/// ACPI discovery ran; `acpi` is `None` if it failed under a best-effort policy.
pub struct AcpiReady<A, M> {
    allocator: A,
    mapper: M,
    acpi: Option<AcpiRoots>,
}

/// Everything early boot hands to the rest of the kernel.
pub struct BootedKernel<A, M> {
    pub config: BootConfig,
    pub allocator: A,
    pub mapper: M,
    pub acpi: Option<AcpiRoots>,
}

impl<S> Boot<S> {
    #[must_use]
    pub const fn config(&self) -> &BootConfig {
        &self.config
    }

    #[must_use]
    pub const fn boot_info(&self) -> &KernelBootInfo {
        &self.info
    }
}

impl Boot<Start> {
    #[must_use]
    pub fn new(config: BootConfig, info: &KernelBootInfo) -> Self {
        trace_boot_info(info);
        Self {
            config,
            info: info.clone(),
            state: Start,
        }
    }

    /// Bring up the physical frame allocator.
    ///
    /// # Errors
    /// [`BootError::PhysicalMemory`] with the message `init` failed with.
    pub fn init_physical_memory<A, F>(
        self,
        init: F,
    ) -> Result<Boot<PhysicalMemoryReady<A>>, BootError>
    where
        F: FnOnce(&KernelBootInfo) -> Result<A, &'static str>,
    {
        trace!("Initializing physical memory ...");
        let allocator = init(&self.info).map_err(|e| {
            error!("Physical memory initialization failed: {e}");
            BootError::PhysicalMemory(e)
        })?;

        Ok(Boot {
            config: self.config,
            info: self.info,
            state: PhysicalMemoryReady { allocator },
        })
    }
}

impl<A> Boot<PhysicalMemoryReady<A>> {
    /// Bring up the page mapper on top of the frame allocator.
    ///
    /// # Errors
    /// [`BootError::VirtualMemory`] with the message `init` failed with.
    pub fn init_virtual_memory<M, F>(
        self,
        init: F,
    ) -> Result<Boot<VirtualMemoryReady<A, M>>, BootError>
    where
        M: PageMapper,
        F: FnOnce(&mut A) -> Result<M, &'static str>,
    {
        trace!("Initializing virtual memory ...");
        let PhysicalMemoryReady { mut allocator } = self.state;
        let mapper = init(&mut allocator).map_err(|e| {
            error!("Virtual memory initialization failed: {e}");
            BootError::VirtualMemory(e)
        })?;

        Ok(Boot {
            config: self.config,
            info: self.info,
            state: VirtualMemoryReady { allocator, mapper },
        })
    }
}

impl<A, M: PageMapper> Boot<VirtualMemoryReady<A, M>> {
    /// Locate the ACPI roots, preferring the loader's RSDP address.
    ///
    /// # Errors
    /// [`BootError::Acpi`] if discovery fails and the configured policy is
    /// [`AcpiPolicy::Required`]. Under [`AcpiPolicy::BestEffort`] the failure
    /// is logged and boot continues without ACPI.
    pub fn discover_acpi(self) -> Result<Boot<AcpiReady<A, M>>, BootError> {
        trace!("Discovering ACPI ...");
        let VirtualMemoryReady {
            allocator,
            mut mapper,
        } = self.state;

        let acpi = match kernel_acpi::discover(&mut mapper, self.info.rsdp_hint()) {
            Ok(roots) => {
                info!(
                    "ACPI rev {} from {}: RSDP at {}, root table at {}",
                    roots.revision,
                    roots.oem_id,
                    roots.rsdp_address,
                    roots.preferred_root()
                );
                Some(roots)
            }
            Err(e) => match self.config.acpi_policy() {
                AcpiPolicy::BestEffort => {
                    warn!("ACPI discovery failed: {e}; continuing without ACPI");
                    None
                }
                AcpiPolicy::Required => {
                    error!("ACPI discovery failed: {e}");
                    return Err(BootError::Acpi(e));
                }
            },
        };

        Ok(Boot {
            config: self.config,
            info: self.info,
            state: AcpiReady {
                allocator,
                mapper,
                acpi,
            },
        })
    }
}

impl<A, M> Boot<AcpiReady<A, M>> {
    #[must_use]
    pub const fn acpi(&self) -> Option<&AcpiRoots> {
        self.state.acpi.as_ref()
    }

    #[must_use]
    pub fn finish(self) -> BootedKernel<A, M> {
        trace!("Early boot complete");
        BootedKernel {
            config: self.config,
            allocator: self.state.allocator,
            mapper: self.state.mapper,
            acpi: self.state.acpi,
        }
    }
}

/// Run every boot stage in order.
///
/// # Errors
/// The first [`BootError`] any stage reports.
pub fn boot<A, M, P, V>(
    config: BootConfig,
    info: &KernelBootInfo,
    init_pmm: P,
    init_vmm: V,
) -> Result<BootedKernel<A, M>, BootError>
where
    M: PageMapper,
    P: FnOnce(&KernelBootInfo) -> Result<A, &'static str>,
    V: FnOnce(&mut A) -> Result<M, &'static str>,
{
    Ok(Boot::new(config, info)
        .init_physical_memory(init_pmm)?
        .init_virtual_memory(init_vmm)?
        .discover_acpi()?
        .finish())
}
