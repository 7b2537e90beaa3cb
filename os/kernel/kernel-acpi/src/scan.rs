//! # RSDP Scanner
//!
//! Legacy BIOS systems place the RSDP on a 16-byte boundary somewhere in the
//! read-only area `0xE0000..=0xFFFFF`. The scanner maps that area through a
//! [`PhysWindow`], compares the eight signature bytes at every aligned
//! candidate, and decodes each hit.
//!
//! ```text
//! Idle ──open──► WindowOpen ──► Scanning ──┬─► Found ──┐
//!   │                              ▲       │           │ (keep going)
//!   │ map failure                  └───────┴───────────┘
//!   ▼                                      │ cursor passes the end
//! Err(Window)                          Exhausted ──drop──► WindowClosed
//! ```
//!
//! Every match is reported, valid or not; scanning does not stop at the first
//! one. Only a mapping failure is an error. An empty [`ScanReport`] simply
//! means the area holds no RSDP.

use crate::rsdp::{RSDP_SIGNATURE, RsdpDescriptor};
use crate::{AcpiError, WINDOW_FLAGS};
use kernel_info::acpi::{RSDP_ALIGNMENT, RSDP_SEARCH_FIRST, RSDP_SEARCH_LAST};
use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::{PageMapper, PhysWindow};
use log::{debug, info, warn};

/// Number of matches a [`ScanReport`] stores; further matches are only counted.
pub const MAX_RSDP_MATCHES: usize = 8;

/// One occurrence of the RSDP signature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RsdpMatch {
    address: PhysicalAddress,
    descriptor: Option<RsdpDescriptor>,
}

impl RsdpMatch {
    const EMPTY: Self = Self {
        address: PhysicalAddress::new(0),
        descriptor: None,
    };

    /// Physical address of the signature.
    #[must_use]
    pub const fn address(&self) -> PhysicalAddress {
        self.address
    }

    /// The decoded record, or `None` if it ran past the end of the window.
    #[must_use]
    pub const fn descriptor(&self) -> Option<&RsdpDescriptor> {
        self.descriptor.as_ref()
    }

    /// Whether the record was cut off by the end of the scanned range.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.descriptor.is_none()
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        match &self.descriptor {
            Some(d) => d.is_valid(),
            None => false,
        }
    }
}

/// Every RSDP signature found by a scan, in ascending address order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScanReport {
    matches: [RsdpMatch; MAX_RSDP_MATCHES],
    len: usize,
    overflowed: usize,
    /// Tracked separately so a valid match past capacity is not lost.
    first_valid: Option<RsdpMatch>,
}

impl ScanReport {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            matches: [RsdpMatch::EMPTY; MAX_RSDP_MATCHES],
            len: 0,
            overflowed: 0,
            first_valid: None,
        }
    }

    fn push(&mut self, m: RsdpMatch) {
        if self.first_valid.is_none() && m.is_valid() {
            self.first_valid = Some(m);
        }
        if let Some(slot) = self.matches.get_mut(self.len) {
            *slot = m;
            self.len += 1;
        } else {
            self.overflowed += 1;
        }
    }

    /// The stored matches.
    #[must_use]
    pub fn matches(&self) -> &[RsdpMatch] {
        &self.matches[..self.len]
    }

    /// Number of stored matches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// `true` if the scan found no signature at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0 && self.overflowed == 0
    }

    /// Matches found after the report was full.
    #[must_use]
    pub const fn overflowed(&self) -> usize {
        self.overflowed
    }

    /// The lowest-addressed match whose checksum holds, including matches
    /// found after the report was full.
    #[must_use]
    pub const fn first_valid(&self) -> Option<&RsdpMatch> {
        self.first_valid.as_ref()
    }
}

impl Default for ScanReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan an open window for RSDP signatures.
///
/// Candidates are the 16-byte aligned addresses inside the window, starting
/// at the first aligned address at or after `window.first()` and ending
/// before `window.last()`. A match whose 20-byte record extends past the
/// window is recorded as truncated.
#[must_use]
pub fn scan_window<M: PageMapper>(window: &PhysWindow<'_, M>) -> ScanReport {
    let mut report = ScanReport::new();
    let end = window.last().as_u64();

    let mut cursor = window.first().as_u64().checked_next_multiple_of(RSDP_ALIGNMENT);
    while let Some(candidate) = cursor
        && candidate < end
    {
        let addr = PhysicalAddress::new(candidate);
        if window.read(addr, RSDP_SIGNATURE.len()) == Some(&RSDP_SIGNATURE[..]) {
            report.push(inspect(window, addr));
        }
        cursor = candidate.checked_add(RSDP_ALIGNMENT);
    }

    report
}

fn inspect<M: PageMapper>(window: &PhysWindow<'_, M>, addr: PhysicalAddress) -> RsdpMatch {
    match RsdpDescriptor::read(window, addr) {
        Ok(descriptor) => {
            info!(
                "Found RSDP at {addr}; ACPI rev: {}",
                descriptor.revision()
            );
            info!("OEM ID: {}", descriptor.oem_id());
            info!("Valid? {}", descriptor.is_valid());
            RsdpMatch {
                address: addr,
                descriptor: Some(descriptor),
            }
        }
        Err(e) => {
            warn!("Found RSDP signature at {addr}, but the record is unreadable: {e}");
            RsdpMatch {
                address: addr,
                descriptor: None,
            }
        }
    }
}

/// Map `[first, last]`, scan it, and unmap it again.
///
/// # Errors
/// [`AcpiError::Window`] if the range cannot be mapped. No scan happens in
/// that case and no page stays mapped.
pub fn scan_region<M: PageMapper>(
    mapper: &mut M,
    first: PhysicalAddress,
    last: PhysicalAddress,
) -> Result<ScanReport, AcpiError> {
    let window = PhysWindow::open(mapper, first, last, WINDOW_FLAGS)?;
    let report = scan_window(&window);
    drop(window);

    if report.overflowed() > 0 {
        warn!(
            "{} more RSDP signature(s) in {first}..={last} were not recorded",
            report.overflowed()
        );
    }
    debug!(
        "Scanned {first}..={last}: {} RSDP signature(s)",
        report.len()
    );
    Ok(report)
}

/// Scan the BIOS read-only area `0xE0000..=0xFFFFF` for the RSDP.
///
/// # Errors
/// [`AcpiError::Window`] if the area cannot be mapped.
pub fn find_rsdp<M: PageMapper>(mapper: &mut M) -> Result<ScanReport, AcpiError> {
    let report = scan_region(mapper, RSDP_SEARCH_FIRST, RSDP_SEARCH_LAST)?;
    if report.is_empty() {
        info!("No RSDP in {RSDP_SEARCH_FIRST}..={RSDP_SEARCH_LAST}");
    }
    Ok(report)
}
