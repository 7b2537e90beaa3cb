//! # ACPI Firmware Layout

use kernel_memory_addresses::PhysicalAddress;

/// First byte of the BIOS read-only area that may hold the RSDP.
pub const RSDP_SEARCH_START: u64 = 0x000E_0000;

/// Last byte (inclusive) of the BIOS read-only area that may hold the RSDP.
pub const RSDP_SEARCH_END: u64 = 0x000F_FFFF;

/// The RSDP always starts on a 16-byte boundary.
pub const RSDP_ALIGNMENT: u64 = 16;

/// [`RSDP_SEARCH_START`] as a typed address.
pub const RSDP_SEARCH_FIRST: PhysicalAddress = PhysicalAddress::new(RSDP_SEARCH_START);

/// [`RSDP_SEARCH_END`] as a typed address.
pub const RSDP_SEARCH_LAST: PhysicalAddress = PhysicalAddress::new(RSDP_SEARCH_END);

const _: () = {
    assert!(RSDP_ALIGNMENT.is_power_of_two());
    assert!(RSDP_SEARCH_START.is_multiple_of(RSDP_ALIGNMENT));
    assert!(RSDP_SEARCH_START < RSDP_SEARCH_END);
    // The whole area sits below 1 MiB and fits 32-bit physical addressing.
    assert!(RSDP_SEARCH_END < 0x0010_0000);
};
