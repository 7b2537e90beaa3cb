//! # ACPI Checksums
//!
//! Every ACPI structure carries a checksum byte chosen so that all bytes of
//! the structure sum to zero modulo 256.
//!
//! ```rust
//! use kernel_acpi::checksum;
//!
//! let mut table = [0x12, 0x34, 0x00, 0x56];
//! assert!(!checksum::is_valid(&table));
//! table[2] = checksum::balancing_byte(&table);
//! assert!(checksum::is_valid(&table));
//! ```

use kernel_memory_addresses::PhysicalAddress;
use kernel_vmem::{PageMapper, PhysWindow};

/// Wrapping 8-bit sum of `bytes`.
#[inline]
#[must_use]
pub fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |a, &b| a.wrapping_add(b))
}

/// Whether `bytes` sum to zero modulo 256.
#[inline]
#[must_use]
pub fn is_valid(bytes: &[u8]) -> bool {
    sum(bytes) == 0
}

/// The byte that makes `bytes` valid when appended, or when written into a
/// checksum slot that currently holds zero.
#[inline]
#[must_use]
pub fn balancing_byte(bytes: &[u8]) -> u8 {
    0u8.wrapping_sub(sum(bytes))
}

/// Validate `length` bytes starting at `base` through an open window.
///
/// Returns `None` if any of those bytes lies outside the window.
#[must_use]
pub fn is_valid_at<M: PageMapper>(
    window: &PhysWindow<'_, M>,
    base: PhysicalAddress,
    length: usize,
) -> Option<bool> {
    window.read(base, length).map(is_valid)
}
