//! # Early Kernel Boot
//!
//! Sequences early initialization after the loader hands over control:
//! physical memory, then virtual memory, then ACPI discovery. See
//! [`pipeline`] for the stage types.
//!
//! ```rust
//! use kernel_boot::boot;
//! use kernel_info::boot::{AcpiPolicy, BootConfig, KernelBootInfo};
//! use kernel_memory_addresses::PhysicalAddress;
//! use kernel_vmem::sim::SimulatedMemory;
//!
//! struct Frames;
//!
//! let kernel = boot(
//!     BootConfig::new().with_acpi_policy(AcpiPolicy::BestEffort),
//!     &KernelBootInfo::default(),
//!     |_info| Ok(Frames),
//!     |_frames| Ok(SimulatedMemory::new(PhysicalAddress::new(0xE_0000), 0x2_0000)),
//! )
//! .unwrap();
//!
//! // Blank firmware memory: no RSDP, but boot continues.
//! assert!(kernel.acpi.is_none());
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]
#![deny(unsafe_code)]

mod error;
mod logging;
pub mod pipeline;

pub use crate::error::BootError;
pub use crate::logging::{init_logging, trace_boot_info};
pub use crate::pipeline::{Boot, BootedKernel, boot};
