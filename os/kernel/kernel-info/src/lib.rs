//! # Kernel Configuration and Boot Interface
//!
//! Constants and plain-data structures shared between the boot loader, the
//! early kernel, and the firmware-discovery crates. Everything here is
//! compile-time configuration or `#[repr(C)]` hand-off data; no code in this
//! crate touches memory.
//!
//! ## Modules
//!
//! ### Firmware Layout ([`acpi`])
//! Where legacy BIOS firmware places the ACPI Root System Description
//! Pointer, and the alignment a candidate must have:
//!
//! ```text
//! Physical Memory (first MiB):
//! 0x0000_0000 ┌─────────────────────────────────┐
//!             │  IVT, BDA, conventional memory  │
//! 0x000A_0000 ├─────────────────────────────────┤
//!             │  VGA memory, option ROMs        │
//! 0x000E_0000 ├─────────────────────────────────┤ RSDP_SEARCH_START
//!             │  BIOS read-only area            │
//!             │  (RSDP lives here, 16-aligned)  │
//! 0x000F_FFFF └─────────────────────────────────┘ RSDP_SEARCH_END (inclusive)
//! ```
//!
//! ### Boot Configuration ([`boot`])
//! * [`KernelBootInfo`](boot::KernelBootInfo): what the loader hands over,
//!   including an optional RSDP address from the UEFI configuration table.
//! * [`BootConfig`](boot::BootConfig): log level and the ACPI discovery
//!   policy of the boot pipeline.
//!
//! ## Usage
//! ```rust
//! use kernel_info::acpi::{RSDP_ALIGNMENT, RSDP_SEARCH_END, RSDP_SEARCH_START};
//! use kernel_info::boot::{AcpiPolicy, BootConfig};
//!
//! assert_eq!(RSDP_SEARCH_START, 0xE_0000);
//! assert_eq!(RSDP_SEARCH_END, 0xF_FFFF);
//! assert_eq!(RSDP_ALIGNMENT, 16);
//!
//! let config = BootConfig::new().with_acpi_policy(AcpiPolicy::Required);
//! assert_eq!(config.acpi_policy(), AcpiPolicy::Required);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

pub mod acpi;
pub mod boot;
