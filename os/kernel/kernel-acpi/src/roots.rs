//! # ACPI Roots
//!
//! The result of RSDP discovery as handed to later table consumers: where the
//! RSDP lives, which revision it declares, and the RSDT/XSDT addresses.

use crate::rsdp::{Rsdp, RsdpDescriptor};
use crate::scan::{RsdpMatch, ScanReport, find_rsdp};
use crate::sdt::open_span;
use crate::{AcpiError, OemId};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::PageMapper;
use log::{info, warn};

/// Root table addresses from a checksum-valid RSDP.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AcpiRoots {
    pub rsdp_address: PhysicalAddress,
    pub revision: u8,
    pub oem_id: OemId,
    pub rsdt_address: PhysicalAddress,
    /// Present for ACPI 2.0+.
    pub xsdt_address: Option<PhysicalAddress>,
}

impl AcpiRoots {
    #[must_use]
    pub fn from_descriptor(descriptor: &RsdpDescriptor) -> Self {
        Self {
            rsdp_address: descriptor.address(),
            revision: descriptor.revision(),
            oem_id: descriptor.oem_id(),
            rsdt_address: descriptor.rsdt_address(),
            xsdt_address: descriptor.xsdt_address(),
        }
    }

    /// Roots of the lowest-addressed valid match, if any.
    #[must_use]
    pub fn from_report(report: &ScanReport) -> Option<Self> {
        report
            .first_valid()
            .and_then(RsdpMatch::descriptor)
            .map(Self::from_descriptor)
    }

    /// The XSDT if the firmware provides a non-zero one, otherwise the RSDT.
    #[must_use]
    pub fn preferred_root(&self) -> PhysicalAddress {
        self.xsdt_address
            .filter(|xsdt| xsdt.as_u64() != 0)
            .unwrap_or(self.rsdt_address)
    }
}

/// Locate a valid RSDP.
///
/// A loader-provided `hint` is checked first. If it is absent or does not
/// hold a valid RSDP, the BIOS area is scanned.
///
/// # Errors
/// - [`AcpiError::Window`] if the BIOS area cannot be mapped.
/// - [`AcpiError::NotFound`] if neither the hint nor the scan yields a valid RSDP.
pub fn discover<M: PageMapper>(
    mapper: &mut M,
    hint: Option<PhysicalAddress>,
) -> Result<AcpiRoots, AcpiError> {
    if let Some(addr) = hint {
        match roots_at(mapper, addr) {
            Ok(roots) => {
                info!("Using loader-provided RSDP at {addr}");
                return Ok(roots);
            }
            Err(e) => warn!("Loader-provided RSDP at {addr} rejected: {e}; scanning BIOS area"),
        }
    }

    let report = find_rsdp(mapper)?;
    AcpiRoots::from_report(&report).ok_or(AcpiError::NotFound)
}

fn roots_at<M: PageMapper>(mapper: &mut M, addr: PhysicalAddress) -> Result<AcpiRoots, AcpiError> {
    let window = open_span(mapper, addr, Rsdp::EXTENDED_SIZE)?;
    let descriptor = RsdpDescriptor::read(&window, addr)?;
    if !descriptor.is_valid() {
        return Err(AcpiError::ChecksumMismatch { address: addr });
    }
    Ok(AcpiRoots::from_descriptor(&descriptor))
}
