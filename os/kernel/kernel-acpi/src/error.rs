use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::WindowError;

/// Errors raised while locating or validating ACPI structures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum AcpiError {
    /// Physical memory could not be mapped for inspection.
    #[error("failed to map ACPI memory: {0}")]
    Window(#[from] WindowError),

    /// No checksum-valid RSDP was found.
    #[error("no valid RSDP found")]
    NotFound,

    /// Fewer bytes were available than the structure requires.
    #[error("truncated ACPI structure: {needed} bytes needed, {available} available")]
    Truncated { needed: usize, available: usize },

    /// The signature bytes did not match the expected table.
    #[error("ACPI signature mismatch")]
    SignatureMismatch,

    /// The bytes of the structure at `address` do not sum to zero.
    #[error("ACPI checksum mismatch at {address}")]
    ChecksumMismatch { address: PhysicalAddress },

    /// `len` bytes at `address` are not covered by the open window.
    #[error("{len} byte(s) at {address} lie outside the mapped window")]
    OutsideWindow { address: PhysicalAddress, len: usize },
}
