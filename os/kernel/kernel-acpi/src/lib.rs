//! # ACPI (Advanced Configuration and Power Interface) Discovery
//!
//! This crate finds and validates the ACPI Root System Description Pointer
//! (RSDP) during early boot, before the kernel has a direct map or any
//! allocator. It also provides the header checksum routine every later ACPI
//! table consumer reuses.
//!
//! ## Architecture
//!
//! The ACPI tables form a hierarchy rooted in the RSDP:
//!
//! ```text
//! BIOS area 0xE0000..=0xFFFFF  (or a loader-provided address)
//!     ↓
//! RSDP/XSDP (Root System Description Pointer)
//!     ↓
//! RSDT/XSDT (Root/Extended System Description Table)
//!     ↓
//! Individual ACPI Tables (FADT, MADT, DSDT, SSDT, etc.)
//! ```
//!
//! ## Key Components
//!
//! ### Physical Memory Access
//! All reads go through a [`PhysWindow`](kernel_vmem::PhysWindow): a scoped,
//! identity-mapped view that is unmapped on drop and only hands out
//! bounds-checked byte slices. The crate never dereferences a raw physical
//! address.
//!
//! ### Checksums ([`checksum`])
//! Byte-sum-to-zero validation, shared by the RSDP and every table header.
//!
//! ### RSDP Records ([`rsdp`])
//! * **RSDP (ACPI 1.0)**: 20-byte record, 32-bit RSDT address
//! * **XSDP (ACPI 2.0+)**: 16-byte extension with a 64-bit XSDT address and a
//!   checksum over all 36 bytes
//!
//! ### Scanner ([`scan`])
//! Walks the BIOS area at 16-byte alignment and reports every signature it
//! finds together with its checksum status.
//!
//! ### Table Headers ([`sdt`])
//! The 36-byte header at the start of every other table, validated over the
//! `length` it declares.
//!
//! ## Usage
//! ```rust
//! use kernel_acpi::{checksum, discover};
//! use kernel_memory_addresses::PhysicalAddress;
//! use kernel_vmem::sim::SimulatedMemory;
//!
//! let mut memory = SimulatedMemory::new(PhysicalAddress::new(0xE_0000), 0x2_0000);
//!
//! let mut rsdp = [0u8; 20];
//! rsdp[..8].copy_from_slice(b"RSD PTR ");
//! rsdp[9..15].copy_from_slice(b"BOCHS ");
//! rsdp[16..20].copy_from_slice(&0x7FE1_4A2Cu32.to_le_bytes());
//! rsdp[8] = checksum::balancing_byte(&rsdp);
//! memory.write(PhysicalAddress::new(0xF_5A30), &rsdp);
//!
//! let roots = discover(&mut memory, None).unwrap();
//! assert_eq!(roots.rsdp_address, PhysicalAddress::new(0xF_5A30));
//! assert_eq!(roots.preferred_root(), PhysicalAddress::new(0x7FE1_4A2C));
//! assert_eq!(memory.mapped_page_count(), 0);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod checksum;
mod error;
mod le;
mod oem;
mod roots;
pub mod rsdp;
pub mod scan;
pub mod sdt;

pub use crate::error::AcpiError;
pub use crate::oem::{OemId, OemTableId};
pub use crate::roots::{AcpiRoots, discover};
pub use crate::rsdp::{RSDP_SIGNATURE, Rsdp, RsdpDescriptor, RsdpExtension};
pub use crate::scan::{MAX_RSDP_MATCHES, RsdpMatch, ScanReport, find_rsdp, scan_region, scan_window};
pub use crate::sdt::{SdtHeader, ValidatedTable, load_table};

use kernel_vmem::MapFlags;

/// Flags for the temporary windows over firmware memory.
pub(crate) const WINDOW_FLAGS: MapFlags = MapFlags::present_rw_nx();
