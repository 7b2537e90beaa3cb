use kernel_acpi::AcpiError;

/// A boot stage that could not complete.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum BootError {
    #[error("physical memory initialization failed: {0}")]
    PhysicalMemory(&'static str),

    #[error("virtual memory initialization failed: {0}")]
    VirtualMemory(&'static str),

    /// Only raised under [`AcpiPolicy::Required`](kernel_info::boot::AcpiPolicy::Required).
    #[error("ACPI discovery failed: {0}")]
    Acpi(#[from] AcpiError),
}
